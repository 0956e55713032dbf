use ndarray::{aview1, Array2};
use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::consts::CROSS_POWER_EPSILON;
use crate::error::{MicroedError, Result};
use crate::frame::{AlignmentOffset, Frame};

use super::estimator::ShiftEstimator;
use super::subpixel::refine_peak_paraboloid;

/// FFT phase correlation with a Hann window and paraboloid sub-pixel
/// refinement of the correlation peak.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhaseCorrelation;

impl ShiftEstimator for PhaseCorrelation {
    fn estimate_shift(&self, reference: &Frame, target: &Frame) -> Result<AlignmentOffset> {
        let correction = correction_offset(&reference.data, &target.data)?;
        Ok(correction.negated())
    }

    fn name(&self) -> &str {
        "phase correlation"
    }
}

/// Offset that moves `target` back onto `reference`.
pub fn correction_offset(reference: &Array2<f32>, target: &Array2<f32>) -> Result<AlignmentOffset> {
    let (h, w) = reference.dim();
    let (th, tw) = target.dim();
    if h != th || w != tw {
        return Err(MicroedError::DimensionMismatch {
            width: w,
            height: h,
            actual_width: tw,
            actual_height: th,
        });
    }

    let mut planner = FftPlanner::new();
    let ref_fft = fft2d(&apply_hann(reference), &mut planner);
    let tgt_fft = fft2d(&apply_hann(target), &mut planner);

    let correlation = ifft2d(normalized_cross_power(&ref_fft, &tgt_fft), &mut planner);

    let (peak_row, peak_col, peak_val) = find_peak(&correlation);
    if !(peak_val.is_finite() && peak_val > CROSS_POWER_EPSILON) {
        return Err(MicroedError::AlignmentFailure {
            index: 0,
            reason: "no correlation peak between frames".into(),
        });
    }

    // Peaks past the midpoint wrap around to negative offsets.
    let dy = wrap_signed(peak_row, h);
    let dx = wrap_signed(peak_col, w);
    let (sub_dy, sub_dx) = refine_peak_paraboloid(&correlation, peak_row, peak_col);

    Ok(AlignmentOffset {
        dx: dx + sub_dx,
        dy: dy + sub_dy,
    })
}

fn wrap_signed(peak: usize, len: usize) -> f64 {
    if peak > len / 2 {
        peak as f64 - len as f64
    } else {
        peak as f64
    }
}

/// Resample `frame` translated by `offset` using bilinear interpolation.
///
/// Pixels whose source falls outside the frame are zero-filled.
pub fn shift_frame(frame: &Frame, offset: &AlignmentOffset) -> Frame {
    let shifted = Array2::from_shape_fn(frame.data.dim(), |(row, col)| {
        bilinear_sample(&frame.data, row as f64 - offset.dy, col as f64 - offset.dx)
    });
    frame.with_data(shifted)
}

pub fn bilinear_sample(data: &Array2<f32>, y: f64, x: f64) -> f32 {
    let (h, w) = data.dim();

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let fx = (x - x0 as f64) as f32;
    let fy = (y - y0 as f64) as f32;

    let sample = |r: i64, c: i64| -> f32 {
        if r >= 0 && r < h as i64 && c >= 0 && c < w as i64 {
            data[[r as usize, c as usize]]
        } else {
            0.0
        }
    };

    sample(y0, x0) * (1.0 - fx) * (1.0 - fy)
        + sample(y0, x0 + 1) * fx * (1.0 - fy)
        + sample(y0 + 1, x0) * (1.0 - fx) * fy
        + sample(y0 + 1, x0 + 1) * fx * fy
}

fn apply_hann(data: &Array2<f32>) -> Array2<f64> {
    let (h, w) = data.dim();
    let hann = |i: usize, n: usize| 0.5 * (1.0 - (std::f64::consts::TAU * i as f64 / n as f64).cos());
    Array2::from_shape_fn((h, w), |(row, col)| {
        data[[row, col]] as f64 * hann(row, h) * hann(col, w)
    })
}

fn fft2d(data: &Array2<f64>, planner: &mut FftPlanner<f64>) -> Array2<Complex<f64>> {
    let (h, w) = data.dim();
    let mut spectrum = data.mapv(|v| Complex::new(v, 0.0));
    transform_lanes(
        &mut spectrum,
        planner.plan_fft_forward(w).as_ref(),
        planner.plan_fft_forward(h).as_ref(),
    );
    spectrum
}

/// Inverse 2D FFT, returning the normalized real part.
fn ifft2d(mut spectrum: Array2<Complex<f64>>, planner: &mut FftPlanner<f64>) -> Array2<f64> {
    let (h, w) = spectrum.dim();
    transform_lanes(
        &mut spectrum,
        planner.plan_fft_inverse(w).as_ref(),
        planner.plan_fft_inverse(h).as_ref(),
    );
    let scale = 1.0 / (h * w) as f64;
    spectrum.mapv(|c| c.re * scale)
}

/// Apply `row_fft` to every row, then `col_fft` to every column.
fn transform_lanes(
    data: &mut Array2<Complex<f64>>,
    row_fft: &dyn Fft<f64>,
    col_fft: &dyn Fft<f64>,
) {
    for mut row in data.rows_mut() {
        let mut buf = row.to_vec();
        row_fft.process(&mut buf);
        row.assign(&aview1(&buf));
    }
    for mut col in data.columns_mut() {
        let mut buf = col.to_vec();
        col_fft.process(&mut buf);
        col.assign(&aview1(&buf));
    }
}

fn normalized_cross_power(
    ref_fft: &Array2<Complex<f64>>,
    tgt_fft: &Array2<Complex<f64>>,
) -> Array2<Complex<f64>> {
    let mut cross = ref_fft * &tgt_fft.mapv(|c| c.conj());
    cross.mapv_inplace(|c| {
        let mag = c.norm();
        if mag > CROSS_POWER_EPSILON {
            c / mag
        } else {
            Complex::new(0.0, 0.0)
        }
    });
    cross
}

fn find_peak(data: &Array2<f64>) -> (usize, usize, f64) {
    data.indexed_iter()
        .fold((0, 0, f64::NEG_INFINITY), |best, ((row, col), &v)| {
            if v > best.2 {
                (row, col, v)
            } else {
                best
            }
        })
}

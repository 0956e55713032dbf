use std::f32::consts::PI;

use ndarray::Array2;

use microed_core::frame::{Frame, FrameSequence};

/// Blob centres (row, col) and widths of the synthetic specimen.
const BLOBS: [(f32, f32, f32, f32); 5] = [
    (50.0, 48.0, 4.0, 1.0),
    (62.0, 70.0, 3.0, 0.8),
    (78.0, 55.0, 5.0, 0.6),
    (58.0, 84.0, 3.5, 0.9),
    (84.0, 78.0, 2.5, 0.7),
];

/// A smooth synthetic specimen displaced by (dx, dy) pixels.
pub fn specimen(size: usize, dx: f32, dy: f32) -> Array2<f32> {
    Array2::from_shape_fn((size, size), |(row, col)| {
        let y = row as f32 - dy;
        let x = col as f32 - dx;
        let ripple = 0.05 * ((x / 9.0).sin() * (y / 7.0).cos() + 1.0);
        let window = if (20.0..108.0).contains(&x) && (20.0..108.0).contains(&y) {
            (PI * (x - 20.0) / 88.0).sin() * (PI * (y - 20.0) / 88.0).sin()
        } else {
            0.0
        };
        let blobs: f32 = BLOBS
            .iter()
            .map(|&(cy, cx, sigma, amp)| {
                let r2 = (y - cy).powi(2) + (x - cx).powi(2);
                amp * (-r2 / (2.0 * sigma * sigma)).exp()
            })
            .sum();
        blobs + ripple * window
    })
}

/// A series where frame `i` has drifted by `i * (dx, dy)`.
pub fn drifting_series(frames: usize, size: usize, dx: f32, dy: f32) -> FrameSequence {
    let frames = (0..frames)
        .map(|i| Frame::new(specimen(size, dx * i as f32, dy * i as f32), 32))
        .collect();
    FrameSequence::new(frames).expect("synthetic series is valid")
}

/// Largest absolute difference between two arrays inside `[lo, hi)` on both axes.
pub fn max_abs_diff(a: &Array2<f32>, b: &Array2<f32>, lo: usize, hi: usize) -> f32 {
    let mut worst = 0.0f32;
    for row in lo..hi {
        for col in lo..hi {
            worst = worst.max((a[[row, col]] - b[[row, col]]).abs());
        }
    }
    worst
}

/// Registration by intensity centroid. Exact for content that stays inside
/// the frame and is shifted by whole pixels.
pub struct CentroidEstimator;

impl microed_core::align::ShiftEstimator for CentroidEstimator {
    fn estimate_shift(
        &self,
        reference: &Frame,
        target: &Frame,
    ) -> microed_core::error::Result<microed_core::frame::AlignmentOffset> {
        let (ry, rx) = centroid(&reference.data);
        let (ty, tx) = centroid(&target.data);
        Ok(microed_core::frame::AlignmentOffset::new(tx - rx, ty - ry))
    }
}

fn centroid(data: &Array2<f32>) -> (f64, f64) {
    let mut total = 0.0f64;
    let mut sy = 0.0f64;
    let mut sx = 0.0f64;
    for ((row, col), &v) in data.indexed_iter() {
        let v = v as f64;
        total += v;
        sy += v * row as f64;
        sx += v * col as f64;
    }
    (sy / total, sx / total)
}

//! Compensatory image shifts across a tilt series.
//!
//! Shifts are usually only measured at a handful of sample angles. These
//! helpers spread them over every tilt angle of the acquisition by linear
//! interpolation.

use crate::error::{MicroedError, Result};
use crate::frame::AlignmentOffset;

/// Indices of the samples bracketing `value` in the sorted `samples`.
///
/// Returns `(lower, upper)` with `samples[lower] <= value < samples[upper]`;
/// `None` on either side means `value` lies outside the sampled range.
pub fn find_bound_indices(samples: &[f64], value: f64) -> (Option<usize>, Option<usize>) {
    let insertion = samples.partition_point(|&s| s <= value);
    let lower = insertion.checked_sub(1);
    let upper = (insertion < samples.len()).then_some(insertion);
    (lower, upper)
}

/// Linearly interpolate shifts measured at `samples` onto every angle in `alphas`.
///
/// Angles outside the sampled range take the shift of the nearest sample.
pub fn interpolate_shifts(
    alphas: &[f64],
    samples: &[f64],
    shifts_at_samples: &[AlignmentOffset],
) -> Result<Vec<AlignmentOffset>> {
    if samples.is_empty() {
        return Err(MicroedError::InvalidAcquisitionInput(
            "at least one shift sample is required".into(),
        ));
    }
    if samples.len() != shifts_at_samples.len() {
        return Err(MicroedError::InvalidAcquisitionInput(format!(
            "{} sample angles but {} shifts",
            samples.len(),
            shifts_at_samples.len()
        )));
    }
    if samples.windows(2).any(|w| w[1] <= w[0]) {
        return Err(MicroedError::InvalidAcquisitionInput(
            "sample angles must be strictly increasing".into(),
        ));
    }

    let shifts = alphas
        .iter()
        .map(|&alpha| match find_bound_indices(samples, alpha) {
            (Some(lo), _) if samples[lo] == alpha => shifts_at_samples[lo],
            (Some(lo), Some(hi)) => {
                let t = (alpha - samples[lo]) / (samples[hi] - samples[lo]);
                let a = shifts_at_samples[lo];
                let b = shifts_at_samples[hi];
                AlignmentOffset::new(a.dx + t * (b.dx - a.dx), a.dy + t * (b.dy - a.dy))
            }
            (Some(lo), None) => shifts_at_samples[lo],
            (None, _) => shifts_at_samples[0],
        })
        .collect();

    Ok(shifts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_inside_range() {
        let samples = [-10.0, 0.0, 10.0];
        assert_eq!(find_bound_indices(&samples, 5.0), (Some(1), Some(2)));
        assert_eq!(find_bound_indices(&samples, 0.0), (Some(1), Some(2)));
    }

    #[test]
    fn test_bounds_outside_range() {
        let samples = [-10.0, 0.0, 10.0];
        assert_eq!(find_bound_indices(&samples, -20.0), (None, Some(0)));
        assert_eq!(find_bound_indices(&samples, 10.0), (Some(2), None));
    }
}

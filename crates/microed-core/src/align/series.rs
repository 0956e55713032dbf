use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::{MicroedError, Result};
use crate::frame::{AlignmentOffset, Frame, FrameSequence};

use super::estimator::ShiftEstimator;
use super::phase_correlation::shift_frame;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Register frames on the Rayon pool for long series. Output is identical
    /// to the sequential path.
    #[serde(default)]
    pub parallel: bool,
}

/// Drift-corrected series together with the drift estimated for each frame.
#[derive(Clone, Debug)]
pub struct AlignedSequence {
    pub sequence: FrameSequence,
    /// Drift of each input frame relative to the reference; the reference
    /// itself is `(0, 0)`.
    pub offsets: Vec<AlignmentOffset>,
}

/// Align every frame to the first frame of the series.
///
/// Each frame is registered directly against the reference (never against
/// its predecessor), then resampled by the negated drift with bilinear
/// interpolation. Border pixels uncovered by the shift are zero-filled.
pub fn align_sequence<F>(
    sequence: FrameSequence,
    estimator: &dyn ShiftEstimator,
    config: &AlignmentConfig,
    on_frame_done: F,
) -> Result<AlignedSequence>
where
    F: Fn(usize) + Send + Sync,
{
    let frames = sequence.frames();
    let reference = sequence.reference();
    let counter = AtomicUsize::new(0);
    info!(
        frames = frames.len(),
        estimator = estimator.name(),
        "Aligning series to frame 0"
    );

    let align_one = |i: usize, frame: &Frame| -> Result<(Frame, AlignmentOffset)> {
        let result = if i == 0 {
            (frame.clone(), AlignmentOffset::default())
        } else {
            let drift = estimate_drift(estimator, reference, frame, i)?;
            debug!(frame = i, dx = drift.dx, dy = drift.dy, "Estimated drift");
            (shift_frame(frame, &drift.negated()), drift)
        };
        let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
        on_frame_done(done);
        Ok(result)
    };

    let results: Vec<(Frame, AlignmentOffset)> =
        if config.parallel && frames.len() >= PARALLEL_FRAME_THRESHOLD {
            frames
                .par_iter()
                .enumerate()
                .map(|(i, frame)| align_one(i, frame))
                .collect::<Result<Vec<_>>>()?
        } else {
            frames
                .iter()
                .enumerate()
                .map(|(i, frame)| align_one(i, frame))
                .collect::<Result<Vec<_>>>()?
        };
    let (aligned, offsets): (Vec<Frame>, Vec<AlignmentOffset>) = results.into_iter().unzip();

    Ok(AlignedSequence {
        sequence: FrameSequence::new(aligned)?,
        offsets,
    })
}

/// Align with the default configuration and no progress reporting.
pub fn align_frames(
    sequence: FrameSequence,
    estimator: &dyn ShiftEstimator,
) -> Result<FrameSequence> {
    align_sequence(sequence, estimator, &AlignmentConfig::default(), |_| {})
        .map(|aligned| aligned.sequence)
}

fn estimate_drift(
    estimator: &dyn ShiftEstimator,
    reference: &Frame,
    frame: &Frame,
    index: usize,
) -> Result<AlignmentOffset> {
    let drift = estimator
        .estimate_shift(reference, frame)
        .map_err(|e| MicroedError::AlignmentFailure {
            index,
            reason: match e {
                MicroedError::AlignmentFailure { reason, .. } => reason,
                other => other.to_string(),
            },
        })?;
    if !drift.is_finite() {
        return Err(MicroedError::AlignmentFailure {
            index,
            reason: format!("non-finite shift estimate ({}, {})", drift.dx, drift.dy),
        });
    }
    Ok(drift)
}

mod estimator;
pub mod phase_correlation;
mod series;
pub mod subpixel;

pub use estimator::ShiftEstimator;
pub use phase_correlation::{bilinear_sample, shift_frame, PhaseCorrelation};
pub use series::{align_frames, align_sequence, AlignedSequence, AlignmentConfig};

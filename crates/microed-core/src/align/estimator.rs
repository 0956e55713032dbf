use crate::error::Result;
use crate::frame::{AlignmentOffset, Frame};

/// Registration capability: estimates how far `target` has drifted from
/// `reference`.
///
/// A returned offset of `(dx, dy)` means the content of `target` sits at
/// `reference` coordinates plus `(dx, dy)`.
pub trait ShiftEstimator: Send + Sync {
    fn estimate_shift(&self, reference: &Frame, target: &Frame) -> Result<AlignmentOffset>;

    fn name(&self) -> &str {
        "custom"
    }
}

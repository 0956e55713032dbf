use crate::frame::AlignmentOffset;
use crate::io::OutputFormat;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Reading,
    Alignment,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reading => write!(f, "Reading frames"),
            Self::Alignment => write!(f, "Aligning frames"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Summary of a completed run.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub format: OutputFormat,
    pub frame_count: usize,
    pub width: usize,
    pub height: usize,
    /// Drift estimated for each frame relative to frame 0.
    pub offsets: Vec<AlignmentOffset>,
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars or logging. All methods
/// have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., frame count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{run_pipeline, run_pipeline_guarded};
pub use types::{NoOpReporter, PipelineOutput, PipelineStage, ProgressReporter};

use tracing::info;

use crate::align::{align_sequence, ShiftEstimator};
use crate::error::Result;
use crate::frame::FrameSequence;
use crate::io::{load_sequence_with_progress, save_sequence, FrameDecoder, OutputFormat};
use crate::safe_exit::{ExitStatus, SafeExit};

use super::config::PipelineConfig;
use super::types::{PipelineOutput, PipelineStage, ProgressReporter};

/// Read, align and write one series.
///
/// The output format is checked before any input is read, so an unsupported
/// destination fails without producing an artifact.
pub fn run_pipeline(
    config: &PipelineConfig,
    decoder: &dyn FrameDecoder,
    estimator: &dyn ShiftEstimator,
    reporter: &dyn ProgressReporter,
) -> Result<PipelineOutput> {
    OutputFormat::from_path(&config.output)?;
    let source = config.input_source()?;

    reporter.begin_stage(PipelineStage::Reading, Some(config.input.len()));
    let mut sequence =
        load_sequence_with_progress(&source, decoder, |done| reporter.advance(done))?;
    reporter.finish_stage();
    info!(
        frames = sequence.len(),
        width = sequence.width(),
        height = sequence.height(),
        "Series loaded"
    );

    if config.exposure_s.is_some() || config.sampling.is_some() {
        sequence = annotate(sequence, config)?;
    }

    reporter.begin_stage(PipelineStage::Alignment, Some(sequence.len()));
    let aligned = align_sequence(sequence, estimator, &config.alignment, |done| {
        reporter.advance(done)
    })?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Writing, None);
    let format = save_sequence(&aligned.sequence, &config.output)?;
    reporter.finish_stage();

    Ok(PipelineOutput {
        format,
        frame_count: aligned.sequence.len(),
        width: aligned.sequence.width(),
        height: aligned.sequence.height(),
        offsets: aligned.offsets,
    })
}

/// Run the pipeline inside `exit`, which makes the microscope safe however
/// the run ends.
pub fn run_pipeline_guarded(
    exit: &mut SafeExit,
    config: &PipelineConfig,
    decoder: &dyn FrameDecoder,
    estimator: &dyn ShiftEstimator,
    reporter: &dyn ProgressReporter,
) -> (ExitStatus, Result<PipelineOutput>) {
    exit.run(|_| run_pipeline(config, decoder, estimator, reporter))
}

/// Record the configured exposure and sampling on every frame.
fn annotate(sequence: FrameSequence, config: &PipelineConfig) -> Result<FrameSequence> {
    let frames = sequence
        .into_frames()
        .into_iter()
        .map(|mut frame| {
            frame.metadata.exposure_s = config.exposure_s.or(frame.metadata.exposure_s);
            frame.metadata.sampling = config.sampling.or(frame.metadata.sampling);
            frame
        })
        .collect();
    FrameSequence::new(frames)
}

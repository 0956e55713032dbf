use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use microed_core::acquisition::Sampling;
use microed_core::align::{AlignmentConfig, PhaseCorrelation};
use microed_core::io::FileCodec;
use microed_core::pipeline::config::PipelineConfig;
use microed_core::pipeline::run_pipeline_guarded;
use microed_core::safe_exit::SafeExit;

use crate::progress::BarReporter;
use crate::summary::{print_offsets, print_pipeline_summary};

#[derive(Args)]
pub struct AlignArgs {
    /// One stack file (.mrc, .tif), or several single-image files in acquisition order
    #[arg(required_unless_present = "config")]
    pub inputs: Vec<PathBuf>,

    /// Pipeline config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file path (.mrc, .tif or .tiff)
    #[arg(short, long, default_value = "aligned.mrc")]
    pub output: PathBuf,

    /// Register frames in parallel for long series
    #[arg(long)]
    pub parallel: bool,

    /// Exposure time per frame in seconds, recorded as frame metadata
    #[arg(long)]
    pub exposure: Option<f64>,

    /// Camera sampling the frames were taken with (4k, 2k, 1k, 0.5k)
    #[arg(long)]
    pub sampling: Option<String>,

    /// Print the estimated drift of every frame
    #[arg(long)]
    pub show_offsets: bool,
}

/// Runs inside `exit`, so the instrument is made safe however alignment ends.
pub fn run(args: &AlignArgs, exit: &mut SafeExit) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid pipeline config")?
    } else {
        build_config_from_args(args)?
    };

    print_pipeline_summary(&config);

    let estimator = PhaseCorrelation;
    let reporter = BarReporter::new();
    let (_, result) = run_pipeline_guarded(exit, &config, &FileCodec, &estimator, &reporter);
    reporter.clear();
    let output = result?;

    if args.show_offsets {
        print_offsets(&output.offsets);
    }
    println!(
        "Aligned {} frames ({}x{}), saved {} to {}",
        output.frame_count,
        output.width,
        output.height,
        output.format,
        config.output.display()
    );

    Ok(())
}

fn build_config_from_args(args: &AlignArgs) -> Result<PipelineConfig> {
    let sampling = args
        .sampling
        .as_deref()
        .map(|s| s.parse::<Sampling>())
        .transpose()?;

    Ok(PipelineConfig {
        input: args.inputs.clone(),
        output: args.output.clone(),
        alignment: AlignmentConfig {
            parallel: args.parallel,
        },
        exposure_s: args.exposure,
        sampling,
    })
}

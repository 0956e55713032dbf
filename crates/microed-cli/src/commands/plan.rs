use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use microed_core::acquisition::{alpha_range, AcquisitionProperties};

use crate::summary::print_plan;

#[derive(Args)]
pub struct PlanArgs {
    /// Name of the camera used for the acquisition
    #[arg(long, default_value = "BM-Ceta")]
    pub camera: String,

    /// First tilt boundary in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub start: f64,

    /// Last tilt boundary in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub stop: f64,

    /// Tilt step between images in degrees
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub step: f64,

    /// Exposure time per image in seconds
    #[arg(long, default_value = "3")]
    pub integration_time: f64,

    /// Camera sampling (4k, 2k, 1k, 0.5k)
    #[arg(long, default_value = "1k")]
    pub sampling: String,

    /// Where the acquired series will be saved
    #[arg(long)]
    pub out_file: Option<PathBuf>,
}

pub fn run(args: &PlanArgs) -> Result<()> {
    let alpha_arr = alpha_range(args.start, args.stop, args.step)?;
    let properties = AcquisitionProperties::builder(args.camera.as_str(), alpha_arr)
        .integration_time(args.integration_time)
        .sampling(&args.sampling)
        .out_file(args.out_file.clone())
        .build()?;

    print_plan(&properties);
    Ok(())
}

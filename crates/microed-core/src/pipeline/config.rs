use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::acquisition::Sampling;
use crate::align::AlignmentConfig;
use crate::error::Result;
use crate::io::InputSource;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// One stack file, or several single-image files in acquisition order.
    pub input: Vec<PathBuf>,
    /// Destination; `.mrc`, `.tif` or `.tiff`.
    pub output: PathBuf,
    #[serde(default)]
    pub alignment: AlignmentConfig,
    /// Exposure per frame in seconds, recorded on every frame when set.
    #[serde(default)]
    pub exposure_s: Option<f64>,
    #[serde(default)]
    pub sampling: Option<Sampling>,
}

impl PipelineConfig {
    pub fn new(input: Vec<PathBuf>, output: PathBuf) -> Self {
        Self {
            input,
            output,
            alignment: AlignmentConfig::default(),
            exposure_s: None,
            sampling: None,
        }
    }

    pub fn input_source(&self) -> Result<InputSource> {
        InputSource::from_paths(self.input.clone())
    }
}

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MicroedError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid acquisition input: {0}")]
    InvalidAcquisitionInput(String),

    #[error("Unknown sampling mode '{0}' (expected one of 4k, 2k, 1k, 0.5k)")]
    UnknownSamplingMode(String),

    #[error("Unrecognized input shape: {0}")]
    UnrecognizedInputShape(String),

    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Alignment failed for frame {index}: {reason}")]
    AlignmentFailure { index: usize, reason: String },

    #[error("Unsupported output format: {0}")]
    UnsupportedOutputFormat(PathBuf),

    #[error("Invalid MRC file: {0}")]
    InvalidMrc(String),

    #[error("Frame dimensions {actual_width}x{actual_height} do not match series {width}x{height}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    #[error("Unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("Empty frame sequence")]
    EmptySequence,

    #[error("Microscope error: {0}")]
    Hardware(String),

    #[error("Cancelled")]
    Cancelled,
}

impl MicroedError {
    /// Wrap any codec failure for `path` as a decode error.
    pub fn decode(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MicroedError>;

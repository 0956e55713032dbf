use std::fmt;
use std::path::Path;

use tracing::info;

use crate::error::{MicroedError, Result};
use crate::frame::FrameSequence;
use crate::io::mrc_writer::save_mrc_stack;
use crate::io::tiff_stack::save_tiff_stack;

/// Persistence format of an aligned series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Mrc,
    Tiff,
}

impl OutputFormat {
    /// Pick the format from the trailing characters of `path`.
    ///
    /// Matching is case-sensitive: `result.MRC` is rejected.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path.to_string_lossy();
        if name.ends_with(".mrc") {
            Ok(Self::Mrc)
        } else if name.ends_with(".tif") || name.ends_with(".tiff") {
            Ok(Self::Tiff)
        } else {
            Err(MicroedError::UnsupportedOutputFormat(path.to_path_buf()))
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mrc => write!(f, "MRC stack"),
            Self::Tiff => write!(f, "TIFF stack"),
        }
    }
}

/// Write the series to `path` with the encoder its suffix selects.
pub fn save_sequence(sequence: &FrameSequence, path: &Path) -> Result<OutputFormat> {
    let format = OutputFormat::from_path(path)?;
    info!(path = %path.display(), %format, frames = sequence.len(), "Writing output");
    match format {
        OutputFormat::Mrc => save_mrc_stack(sequence, path)?,
        OutputFormat::Tiff => save_tiff_stack(sequence, path)?,
    }
    Ok(format)
}

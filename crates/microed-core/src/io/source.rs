use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{MicroedError, Result};
use crate::frame::{Frame, FrameSequence};
use crate::io::image_io::load_image;
use crate::io::mrc::MrcReader;
use crate::io::tiff_stack::load_tiff_stack;

/// Where the frames of a series come from.
#[derive(Clone, Debug, PartialEq)]
pub enum InputSource {
    /// One file holding every frame.
    Stack(PathBuf),
    /// One file per frame, in acquisition order.
    Files(Vec<PathBuf>),
}

impl InputSource {
    /// A single path is read as a stack, several paths as single images.
    pub fn from_paths(mut paths: Vec<PathBuf>) -> Result<Self> {
        match paths.len() {
            0 => Err(MicroedError::UnrecognizedInputShape(
                "no input files given".into(),
            )),
            1 => Ok(Self::Stack(paths.remove(0))),
            _ => Ok(Self::Files(paths)),
        }
    }
}

/// Decoding capability used to turn files into frames.
pub trait FrameDecoder {
    /// Decode every frame of a multi-frame file, in on-disk order.
    fn decode_stack(&self, path: &Path) -> Result<Vec<Frame>>;

    /// Decode a file holding exactly one image.
    fn decode_image(&self, path: &Path) -> Result<Frame>;
}

/// File decoder keyed by suffix: MRC and TIFF stacks, and any single image
/// format the `image` crate reads. Suffixes are matched case-insensitively.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileCodec;

impl FrameDecoder for FileCodec {
    fn decode_stack(&self, path: &Path) -> Result<Vec<Frame>> {
        let frames = match lowercase_extension(path).as_deref() {
            Some("mrc" | "mrcs") => read_mrc(path),
            Some("tif" | "tiff") => load_tiff_stack(path),
            _ => Err(MicroedError::decode(
                path,
                "not a stack format (expected .mrc or .tif)",
            )),
        };
        frames.map_err(|e| as_decode_error(path, e))
    }

    fn decode_image(&self, path: &Path) -> Result<Frame> {
        let frame = match lowercase_extension(path).as_deref() {
            Some("mrc" | "mrcs") => read_mrc(path).and_then(|f| single(path, f)),
            Some("tif" | "tiff") => load_tiff_stack(path).and_then(|f| single(path, f)),
            _ => load_image(path),
        };
        frame.map_err(|e| as_decode_error(path, e))
    }
}

/// Build one ordered frame sequence from either input shape.
pub fn load_sequence(source: &InputSource, decoder: &dyn FrameDecoder) -> Result<FrameSequence> {
    load_sequence_with_progress(source, decoder, |_| {})
}

/// Like [`load_sequence`], calling `on_file_done` with the number of input
/// files decoded so far.
///
/// Single images are checked against the series dimensions as they arrive,
/// so a mismatching file stops the load before later files are decoded.
pub fn load_sequence_with_progress<F>(
    source: &InputSource,
    decoder: &dyn FrameDecoder,
    on_file_done: F,
) -> Result<FrameSequence>
where
    F: Fn(usize),
{
    match source {
        InputSource::Stack(path) => {
            info!(path = %path.display(), "Reading stack");
            let frames = decoder.decode_stack(path)?;
            debug!(frames = frames.len(), "Stack decoded");
            on_file_done(1);
            FrameSequence::new(frames)
        }
        InputSource::Files(paths) => {
            let Some((first, rest)) = paths.split_first() else {
                return Err(MicroedError::UnrecognizedInputShape(
                    "empty list of image files".into(),
                ));
            };
            info!(files = paths.len(), "Reading single-image files");
            let mut sequence = FrameSequence::new(vec![decode_one(decoder, first)?])?;
            on_file_done(1);
            for path in rest {
                sequence.push(decode_one(decoder, path)?)?;
                on_file_done(sequence.len());
            }
            Ok(sequence)
        }
    }
}

fn decode_one(decoder: &dyn FrameDecoder, path: &Path) -> Result<Frame> {
    debug!(path = %path.display(), "Decoding image");
    decoder.decode_image(path)
}

fn read_mrc(path: &Path) -> Result<Vec<Frame>> {
    let reader = MrcReader::open(path)?;
    reader
        .frames()
        .map(|frame| {
            frame.map(|mut f| {
                f.metadata.source = Some(path.to_path_buf());
                f
            })
        })
        .collect()
}

fn single(path: &Path, mut frames: Vec<Frame>) -> Result<Frame> {
    if frames.len() != 1 {
        return Err(MicroedError::decode(
            path,
            format!("expected a single image, found {} frames", frames.len()),
        ));
    }
    Ok(frames.remove(0))
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn as_decode_error(path: &Path, err: MicroedError) -> MicroedError {
    match err {
        MicroedError::Decode { .. } => err,
        other => MicroedError::decode(path, other),
    }
}

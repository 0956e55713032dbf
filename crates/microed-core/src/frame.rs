use ndarray::Array2;
use std::path::PathBuf;

use crate::acquisition::Sampling;
use crate::error::{MicroedError, Result};

/// A single grayscale image frame.
/// Pixel values are raw detector intensities stored as f32.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
    /// Bit depth of the source pixels (8, 16 or 32)
    pub original_bit_depth: u8,
    /// Optional per-frame metadata
    pub metadata: FrameMetadata,
}

impl Frame {
    pub fn new(data: Array2<f32>, bit_depth: u8) -> Self {
        Self {
            data,
            original_bit_depth: bit_depth,
            metadata: FrameMetadata::default(),
        }
    }

    /// Build a frame carrying the same metadata as `self` but new pixel data.
    pub fn with_data(&self, data: Array2<f32>) -> Self {
        Self {
            data,
            original_bit_depth: self.original_bit_depth,
            metadata: self.metadata.clone(),
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameMetadata {
    /// Position of the frame in acquisition order.
    pub frame_index: usize,
    /// Exposure time in seconds, when known.
    pub exposure_s: Option<f64>,
    pub sampling: Option<Sampling>,
    /// File the frame was decoded from.
    pub source: Option<PathBuf>,
}

/// Drift offset of a frame relative to the reference, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AlignmentOffset {
    pub dx: f64,
    pub dy: f64,
}

impl AlignmentOffset {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn negated(&self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.dx.is_finite() && self.dy.is_finite()
    }
}

/// Ordered, non-empty series of equally sized frames.
///
/// Frame order is significant: frames are renumbered to their position when
/// the sequence is built.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    frames: Vec<Frame>,
}

impl FrameSequence {
    pub fn new(frames: Vec<Frame>) -> Result<Self> {
        let Some(first) = frames.first() else {
            return Err(MicroedError::EmptySequence);
        };
        let (height, width) = first.data.dim();
        for frame in &frames[1..] {
            check_dimensions(width, height, frame)?;
        }

        let mut frames = frames;
        for (i, frame) in frames.iter_mut().enumerate() {
            frame.metadata.frame_index = i;
        }
        Ok(Self { frames })
    }

    /// Append a frame, rejecting it if its dimensions differ from the series.
    pub fn push(&mut self, mut frame: Frame) -> Result<()> {
        check_dimensions(self.width(), self.height(), &frame)?;
        frame.metadata.frame_index = self.frames.len();
        self.frames.push(frame);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn width(&self) -> usize {
        self.frames[0].width()
    }

    pub fn height(&self) -> usize {
        self.frames[0].height()
    }

    pub fn reference(&self) -> &Frame {
        &self.frames[0]
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl<'a> IntoIterator for &'a FrameSequence {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

fn check_dimensions(width: usize, height: usize, frame: &Frame) -> Result<()> {
    if frame.width() != width || frame.height() != height {
        return Err(MicroedError::DimensionMismatch {
            width,
            height,
            actual_width: frame.width(),
            actual_height: frame.height(),
        });
    }
    Ok(())
}

/// Metadata about a decoded stack file.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: PathBuf,
    pub total_frames: usize,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
}

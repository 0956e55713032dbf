use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::Array2;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{colortype, TiffEncoder};

use crate::error::{MicroedError, Result};
use crate::frame::{Frame, FrameSequence};

/// Save every frame as one page of a 32-bit float grayscale TIFF.
pub fn save_tiff_stack(sequence: &FrameSequence, path: &Path) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = TiffEncoder::new(file)?;

    let w = sequence.width() as u32;
    let h = sequence.height() as u32;
    for frame in sequence {
        let pixels: Vec<f32> = frame.data.iter().copied().collect();
        encoder.write_image::<colortype::Gray32Float>(w, h, &pixels)?;
    }
    Ok(())
}

/// Load every page of a grayscale TIFF, in file order.
pub fn load_tiff_stack(path: &Path) -> Result<Vec<Frame>> {
    let file = BufReader::new(File::open(path)?);
    let mut decoder = Decoder::new(file)?;
    let mut frames = Vec::new();

    loop {
        let (w, h) = decoder.dimensions()?;
        let (pixels, bit_depth) = decode_page(decoder.read_image()?)?;
        if pixels.len() != (w as usize) * (h as usize) {
            return Err(MicroedError::decode(
                path,
                "only single-channel TIFF stacks are supported",
            ));
        }
        let data = Array2::from_shape_vec((h as usize, w as usize), pixels)
            .map_err(|e| MicroedError::decode(path, e))?;

        let mut frame = Frame::new(data, bit_depth);
        frame.metadata.frame_index = frames.len();
        frame.metadata.source = Some(path.to_path_buf());
        frames.push(frame);

        if !decoder.more_images() {
            break;
        }
        decoder.next_image()?;
    }

    Ok(frames)
}

fn decode_page(result: DecodingResult) -> Result<(Vec<f32>, u8)> {
    let decoded: (Vec<f32>, u8) = match result {
        DecodingResult::U8(v) => (v.into_iter().map(|p| p as f32).collect(), 8),
        DecodingResult::U16(v) => (v.into_iter().map(|p| p as f32).collect(), 16),
        DecodingResult::U32(v) => (v.into_iter().map(|p| p as f32).collect(), 32),
        DecodingResult::I8(v) => (v.into_iter().map(|p| p as f32).collect(), 8),
        DecodingResult::I16(v) => (v.into_iter().map(|p| p as f32).collect(), 16),
        DecodingResult::F32(v) => (v, 32),
        DecodingResult::F64(v) => (v.into_iter().map(|p| p as f32).collect(), 32),
        _ => {
            return Err(MicroedError::UnsupportedPixelFormat(
                "TIFF sample format".into(),
            ))
        }
    };
    Ok(decoded)
}

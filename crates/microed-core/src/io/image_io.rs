use std::path::Path;

use image::ColorType;
use ndarray::Array2;

use crate::error::{MicroedError, Result};
use crate::frame::Frame;

/// Load a single image file into a Frame, keeping raw intensities.
///
/// Color images are reduced to luminance. Pixel values are not rescaled:
/// an 8-bit file yields values in 0..=255, a 16-bit file in 0..=65535.
pub fn load_image(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    let (w, h) = (img.width() as usize, img.height() as usize);

    let (pixels, bit_depth): (Vec<f32>, u8) = match img.color() {
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => (
            img.to_luma8().into_raw().into_iter().map(f32::from).collect(),
            8,
        ),
        ColorType::L16 | ColorType::La16 | ColorType::Rgb16 | ColorType::Rgba16 => (
            img.to_luma16().into_raw().into_iter().map(f32::from).collect(),
            16,
        ),
        _ => (img.to_luma32f().into_raw(), 32),
    };

    let data = Array2::from_shape_vec((h, w), pixels).map_err(|e| MicroedError::decode(path, e))?;
    let mut frame = Frame::new(data, bit_depth);
    frame.metadata.source = Some(path.to_path_buf());
    Ok(frame)
}

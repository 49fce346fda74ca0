//! PNG encoding of level buffers and decoding of captured canvases.

use image::{GrayImage, ImageFormat};
use inkdash_core::PipelineError;
use std::io::Cursor;

use crate::buffer::{LevelBuffer, RgbBuffer};
use crate::dither::reconstruct;

/// Map every level to its displayed 8-bit gray value.
pub fn levels_to_gray8(levels: &LevelBuffer) -> Vec<u8> {
    levels
        .samples()
        .iter()
        .map(|&level| reconstruct(level).round() as u8)
        .collect()
}

/// Encode levels as a lossless 8-bit grayscale PNG.
pub fn encode_png(levels: &LevelBuffer) -> Result<Vec<u8>, PipelineError> {
    let (width, height) = levels.dimensions();
    let image = GrayImage::from_raw(width, height, levels_to_gray8(levels)).ok_or_else(|| {
        PipelineError::Encode {
            reason: format!("{}x{} buffer does not match its sample count", width, height),
        }
    })?;

    let mut out = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .map_err(|e| PipelineError::Encode {
            reason: e.to_string(),
        })?;
    Ok(out)
}

/// Decode a PNG capture into RGB, compositing any alpha over white.
pub fn decode_png(bytes: &[u8]) -> Result<RgbBuffer, PipelineError> {
    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png).map_err(|e| {
        PipelineError::Decode {
            reason: e.to_string(),
        }
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    RgbBuffer::from_rgba(width, height, rgba.as_raw())
}

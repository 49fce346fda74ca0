//! The full capture-to-panel transformation.

use inkdash_core::{DeviceProfile, PipelineError};
use tracing::debug;

use crate::buffer::{LevelBuffer, RgbBuffer};
use crate::dither::dither;
use crate::encode::{decode_png, encode_png};
use crate::grayscale::to_grayscale;
use crate::scale::{scale_for_profile, Filter};

/// Knobs for [`process_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub filter: Filter,
    /// Gray value of the letterbox margin.
    pub background: u8,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            filter: Filter::AreaAverage,
            background: 255,
        }
    }
}

/// Scale, convert to grayscale and dither with the default options.
pub fn process(source: &RgbBuffer, profile: &DeviceProfile) -> Result<LevelBuffer, PipelineError> {
    process_with(source, profile, &PipelineOptions::default())
}

/// Scale, convert to grayscale and dither.
///
/// The source must have the canvas dimensions of `profile`. The result has
/// exactly the target dimensions. Deterministic for identical inputs.
pub fn process_with(
    source: &RgbBuffer,
    profile: &DeviceProfile,
    options: &PipelineOptions,
) -> Result<LevelBuffer, PipelineError> {
    profile.validate()?;

    let (width, height) = source.dimensions();
    if source.is_empty() {
        return Err(PipelineError::EmptyBuffer { width, height });
    }
    if (width, height) != (profile.canvas_width, profile.canvas_height) {
        return Err(PipelineError::CanvasMismatch {
            expected_width: profile.canvas_width,
            expected_height: profile.canvas_height,
            width,
            height,
        });
    }

    let scaled = scale_for_profile(source, profile, options.filter, options.background)?;
    let gray = to_grayscale(&scaled);
    Ok(dither(&gray))
}

/// Decode a captured PNG, process it and encode the result as PNG.
pub fn process_png(bytes: &[u8], profile: &DeviceProfile) -> Result<Vec<u8>, PipelineError> {
    process_png_with(bytes, profile, &PipelineOptions::default())
}

/// [`process_png`] with explicit options.
pub fn process_png_with(
    bytes: &[u8],
    profile: &DeviceProfile,
    options: &PipelineOptions,
) -> Result<Vec<u8>, PipelineError> {
    let source = decode_png(bytes)?;
    debug!(
        width = source.width(),
        height = source.height(),
        target_width = profile.target_width,
        target_height = profile.target_height,
        "Processing capture"
    );
    let levels = process_with(&source, profile, options)?;
    encode_png(&levels)
}

//! Luminance conversion (ITU-R BT.601 weights).

use crate::buffer::{GrayBuffer, RgbBuffer};

const RED_WEIGHT: f32 = 0.299;
const GREEN_WEIGHT: f32 = 0.587;
const BLUE_WEIGHT: f32 = 0.114;

/// Luminance of one pixel, unrounded.
pub fn luma([r, g, b]: [u8; 3]) -> f32 {
    RED_WEIGHT * f32::from(r) + GREEN_WEIGHT * f32::from(g) + BLUE_WEIGHT * f32::from(b)
}

pub fn to_grayscale(source: &RgbBuffer) -> GrayBuffer {
    source.map(|px| luma(*px).clamp(0.0, 255.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_primaries() {
        assert!((luma([255, 0, 0]) - 76.245).abs() < 1e-3);
        assert!((luma([0, 255, 0]) - 149.685).abs() < 1e-3);
        assert!((luma([0, 0, 255]) - 29.07).abs() < 1e-3);
    }

    #[test]
    fn test_gray_input_is_preserved() {
        for v in [0u8, 17, 128, 255] {
            assert!((luma([v, v, v]) - f32::from(v)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_to_grayscale_keeps_dimensions() {
        let src = RgbBuffer::filled(7, 3, [10, 20, 30]);
        let gray = to_grayscale(&src);
        assert_eq!(gray.dimensions(), (7, 3));
    }
}

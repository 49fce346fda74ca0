//! 16-level quantization with Floyd-Steinberg error diffusion.
//!
//! Pixels are visited in strict raster order, left to right on every row.
//! The quantization error of each pixel is pushed to its unvisited neighbours:
//!
//! ```text
//!            *    7/16
//!    3/16  5/16   1/16
//! ```
//!
//! Terms that would land outside the image are dropped.

use inkdash_core::{LEVEL_STEP, MAX_LEVEL};

use crate::buffer::{GrayBuffer, LevelBuffer};

const EAST: f32 = 7.0 / 16.0;
const SOUTH_WEST: f32 = 3.0 / 16.0;
const SOUTH: f32 = 5.0 / 16.0;
const SOUTH_EAST: f32 = 1.0 / 16.0;

/// Nearest level for a (possibly error-adjusted) gray value.
pub fn quantize(value: f32) -> u8 {
    (value / LEVEL_STEP).round().clamp(0.0, f32::from(MAX_LEVEL)) as u8
}

/// Gray value a level is displayed as.
pub fn reconstruct(level: u8) -> f32 {
    f32::from(level) * LEVEL_STEP
}

/// Quantize to 16 levels, diffusing the error of each pixel forward.
pub fn dither(gray: &GrayBuffer) -> LevelBuffer {
    let (width, height) = gray.dimensions();
    let w = width as usize;
    let mut levels = LevelBuffer::filled(width, height, 0);

    // Pending error for the current row and the row below it.
    let mut current = vec![0.0f32; w];
    let mut below = vec![0.0f32; w];

    for (row, out) in gray.rows().zip(levels.rows_mut()) {
        for x in 0..w {
            let value = row[x] + current[x];
            let level = quantize(value);
            let error = value - reconstruct(level);
            out[x] = level;

            if x + 1 < w {
                current[x + 1] += error * EAST;
                below[x + 1] += error * SOUTH_EAST;
            }
            if x > 0 {
                below[x - 1] += error * SOUTH_WEST;
            }
            below[x] += error * SOUTH;
        }
        std::mem::swap(&mut current, &mut below);
        below.fill(0.0);
    }

    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_boundaries() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(8.0), 0);
        assert_eq!(quantize(9.0), 1);
        assert_eq!(quantize(255.0), 15);
        assert_eq!(quantize(-20.0), 0);
        assert_eq!(quantize(300.0), 15);
    }

    #[test]
    fn test_exact_levels_pass_through() {
        let data: Vec<f32> = (0..16).map(|l| reconstruct(l as u8)).collect();
        let gray = GrayBuffer::from_vec(16, 1, data).unwrap();
        let levels = dither(&gray);
        assert_eq!(levels.samples(), (0..16).collect::<Vec<u8>>().as_slice());
    }

    #[test]
    fn test_error_moves_east_first() {
        // 8.0 rounds to level 0 and leaves +8.0, 7/16 of which reaches the
        // neighbour: 8.0 + 3.5 = 11.5 rounds to level 1.
        let gray = GrayBuffer::from_vec(2, 1, vec![8.0, 8.0]).unwrap();
        assert_eq!(dither(&gray).samples(), &[0, 1]);
    }

    #[test]
    fn test_single_pixel_drops_everything() {
        let gray = GrayBuffer::from_vec(1, 1, vec![100.0]).unwrap();
        assert_eq!(dither(&gray).samples(), &[6]);
    }
}

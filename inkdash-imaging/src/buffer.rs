//! Row-major pixel buffers.

use inkdash_core::PipelineError;

/// 2-D grid of samples, row-major, with explicit dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

/// 8-bit RGB samples.
pub type RgbBuffer = PixelBuffer<[u8; 3]>;

/// Continuous luminance in `0.0..=255.0`.
pub type GrayBuffer = PixelBuffer<f32>;

/// Quantization levels in `0..=15`.
pub type LevelBuffer = PixelBuffer<u8>;

impl<T: Clone> PixelBuffer<T> {
    /// Buffer of `width x height` samples all set to `fill`.
    pub fn filled(width: u32, height: u32, fill: T) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width as usize * height as usize],
        }
    }
}

impl<T> PixelBuffer<T> {
    /// Wrap row-major samples. Fails if the length does not match.
    pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> Result<Self, PipelineError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(PipelineError::BufferLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        self.index(x, y).and_then(|i| self.data.get(i))
    }

    /// Overwrite one sample. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, value: T) {
        if let Some(slot) = self.index(x, y).and_then(|i| self.data.get_mut(i)) {
            *slot = value;
        }
    }

    pub fn row(&self, y: u32) -> &[T] {
        let w = self.width as usize;
        let start = y as usize * w;
        self.data.get(start..start + w).unwrap_or(&[])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks_exact panics on zero; an empty buffer yields no rows either way.
        self.data.chunks_exact(self.width.max(1) as usize)
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [T]> {
        self.data.chunks_exact_mut(self.width.max(1) as usize)
    }

    pub fn samples(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Apply `f` to every sample, producing a new buffer of the same size.
    pub fn map<U, F>(&self, f: F) -> PixelBuffer<U>
    where
        F: FnMut(&T) -> U,
    {
        PixelBuffer {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl RgbBuffer {
    /// Build from packed RGB bytes.
    pub fn from_rgb(width: u32, height: u32, bytes: &[u8]) -> Result<Self, PipelineError> {
        let expected = width as usize * height as usize * 3;
        if bytes.len() != expected {
            return Err(PipelineError::BufferLength {
                expected,
                got: bytes.len(),
            });
        }
        let data = bytes
            .chunks_exact(3)
            .map(|px| [px[0], px[1], px[2]])
            .collect();
        Self::from_vec(width, height, data)
    }

    /// Build from packed RGBA bytes, compositing every pixel over white.
    ///
    /// Screenshots of transparent regions come out white, which is what the
    /// panel shows for "nothing drawn".
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Result<Self, PipelineError> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(PipelineError::BufferLength {
                expected,
                got: bytes.len(),
            });
        }
        let data = bytes
            .chunks_exact(4)
            .map(|px| {
                let alpha = u32::from(px[3]);
                let over_white = |c: u8| -> u8 {
                    let blended = u32::from(c) * alpha + 255 * (255 - alpha);
                    ((blended + 127) / 255) as u8
                };
                [over_white(px[0]), over_white(px[1]), over_white(px[2])]
            })
            .collect();
        Self::from_vec(width, height, data)
    }
}

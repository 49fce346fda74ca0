//! Aspect-preserving resample onto the target panel.
//!
//! The canvas is scaled by one uniform factor so that it fits inside the
//! target, centered, with the leftover margin filled by the background.

use inkdash_core::{DeviceProfile, PipelineError};

use crate::buffer::RgbBuffer;

/// Resampling kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Box filter over the exact source footprint of each output pixel.
    /// Falls back to bilinear on axes that are being enlarged.
    #[default]
    AreaAverage,
    /// Triangle filter over the two nearest source samples.
    Bilinear,
}

/// Placement of the scaled content inside the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Letterbox {
    pub content_width: u32,
    pub content_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl Letterbox {
    /// Fit a `source_width x source_height` image into the target size.
    ///
    /// Content dimensions are rounded and kept within `[1, target]`; offsets
    /// are the floor of half the margin.
    pub fn fit(source_width: u32, source_height: u32, target_width: u32, target_height: u32) -> Self {
        let factor = (f64::from(target_width) / f64::from(source_width))
            .min(f64::from(target_height) / f64::from(source_height));

        let content = |len: u32, target: u32| -> u32 {
            let scaled = (f64::from(len) * factor).round() as u32;
            scaled.clamp(1, target.max(1))
        };
        let content_width = content(source_width, target_width);
        let content_height = content(source_height, target_height);

        Self {
            content_width,
            content_height,
            offset_x: target_width.saturating_sub(content_width) / 2,
            offset_y: target_height.saturating_sub(content_height) / 2,
        }
    }

    pub fn for_profile(profile: &DeviceProfile) -> Self {
        Self::fit(
            profile.canvas_width,
            profile.canvas_height,
            profile.target_width,
            profile.target_height,
        )
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.offset_x
            && x < self.offset_x + self.content_width
            && y >= self.offset_y
            && y < self.offset_y + self.content_height
    }
}

/// Scale `source` onto a `target_width x target_height` buffer filled with
/// `background`, preserving aspect ratio.
pub fn scale_to_fit(
    source: &RgbBuffer,
    target_width: u32,
    target_height: u32,
    filter: Filter,
    background: u8,
) -> Result<RgbBuffer, PipelineError> {
    let (sw, sh) = source.dimensions();
    if sw == 0 || sh == 0 || source.is_empty() {
        return Err(PipelineError::EmptyBuffer {
            width: sw,
            height: sh,
        });
    }
    if target_width == 0 || target_height == 0 {
        return Err(PipelineError::InvalidProfile {
            reason: format!("target {}x{} has a zero dimension", target_width, target_height),
        });
    }

    let letterbox = Letterbox::fit(sw, sh, target_width, target_height);
    let content = resample(source, letterbox.content_width, letterbox.content_height, filter);

    let mut out = RgbBuffer::filled(target_width, target_height, [background; 3]);
    for (cy, row) in content.chunks_exact(letterbox.content_width as usize).enumerate() {
        for (cx, px) in row.iter().enumerate() {
            out.set(
                letterbox.offset_x + cx as u32,
                letterbox.offset_y + cy as u32,
                *px,
            );
        }
    }
    Ok(out)
}

/// Scale the canvas described by `profile` onto its target.
pub fn scale_for_profile(
    source: &RgbBuffer,
    profile: &DeviceProfile,
    filter: Filter,
    background: u8,
) -> Result<RgbBuffer, PipelineError> {
    scale_to_fit(source, profile.target_width, profile.target_height, filter, background)
}

/// Source taps and weights for one output position along one axis.
type Kernel = Vec<(usize, f32)>;

fn axis_kernels(src_len: u32, dst_len: u32, filter: Filter) -> Vec<Kernel> {
    let scale = f64::from(src_len) / f64::from(dst_len);
    let use_box = filter == Filter::AreaAverage && scale > 1.0;

    (0..dst_len)
        .map(|o| {
            if use_box {
                box_kernel(o, scale, src_len)
            } else {
                triangle_kernel(o, scale, src_len)
            }
        })
        .collect()
}

fn box_kernel(o: u32, scale: f64, src_len: u32) -> Kernel {
    let start = f64::from(o) * scale;
    let end = (start + scale).min(f64::from(src_len));
    let first = start.floor() as u32;
    let last = (end.ceil() as u32).min(src_len);

    let mut taps = Vec::with_capacity((last - first) as usize);
    let mut total = 0.0f64;
    for i in first..last {
        let lo = start.max(f64::from(i));
        let hi = end.min(f64::from(i) + 1.0);
        let coverage = hi - lo;
        if coverage > 0.0 {
            taps.push((i as usize, coverage));
            total += coverage;
        }
    }
    taps.into_iter()
        .map(|(i, w)| (i, (w / total) as f32))
        .collect()
}

fn triangle_kernel(o: u32, scale: f64, src_len: u32) -> Kernel {
    let max = f64::from(src_len - 1);
    let center = ((f64::from(o) + 0.5) * scale - 0.5).clamp(0.0, max);
    let i0 = center.floor();
    let frac = (center - i0) as f32;
    let i0 = i0 as usize;
    let i1 = (i0 + 1).min(src_len as usize - 1);
    if frac == 0.0 || i1 == i0 {
        vec![(i0, 1.0)]
    } else {
        vec![(i0, 1.0 - frac), (i1, frac)]
    }
}

/// Separable resample: horizontal pass into an `f32` scratch image, then
/// vertical pass with rounding back to bytes.
fn resample(source: &RgbBuffer, dst_w: u32, dst_h: u32, filter: Filter) -> Vec<[u8; 3]> {
    let (sw, sh) = source.dimensions();
    let h_kernels = axis_kernels(sw, dst_w, filter);
    let v_kernels = axis_kernels(sh, dst_h, filter);

    let mut horizontal = Vec::with_capacity(dst_w as usize * sh as usize);
    for row in source.rows() {
        for kernel in &h_kernels {
            let mut acc = [0.0f32; 3];
            for &(i, w) in kernel {
                let px = row[i];
                for c in 0..3 {
                    acc[c] += f32::from(px[c]) * w;
                }
            }
            horizontal.push(acc);
        }
    }

    let stride = dst_w as usize;
    let mut out = Vec::with_capacity(stride * dst_h as usize);
    for kernel in &v_kernels {
        for x in 0..stride {
            let mut acc = [0.0f32; 3];
            for &(j, w) in kernel {
                let px = horizontal[j * stride + x];
                for c in 0..3 {
                    acc[c] += px[c] * w;
                }
            }
            out.push(acc.map(|v| v.round().clamp(0.0, 255.0) as u8));
        }
    }
    out
}

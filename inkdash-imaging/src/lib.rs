//! inkdash Imaging - E-ink Image Pipeline
//!
//! Turns a color capture of the dashboard canvas into a 16-level grayscale
//! image for the panel:
//!
//! 1. scale by one uniform factor and letterbox onto the target
//! 2. convert to continuous luminance
//! 3. quantize to 16 levels with Floyd-Steinberg error diffusion
//! 4. encode as an 8-bit grayscale PNG
//!
//! Every stage is a pure function from one buffer to a new one. No I/O.

pub mod buffer;
pub mod dither;
pub mod encode;
pub mod grayscale;
pub mod pipeline;
pub mod scale;

pub use buffer::{GrayBuffer, LevelBuffer, PixelBuffer, RgbBuffer};
pub use dither::{dither, quantize, reconstruct};
pub use encode::{decode_png, encode_png, levels_to_gray8};
pub use grayscale::{luma, to_grayscale};
pub use pipeline::{process, process_png, process_png_with, process_with, PipelineOptions};
pub use scale::{scale_for_profile, scale_to_fit, Filter, Letterbox};

//! Target device geometry.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Logical canvas the upstream renderer draws on, and the panel resolution
/// the pipeline must produce. Read-only configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub target_width: u32,
    pub target_height: u32,
}

impl DeviceProfile {
    pub fn new(canvas_width: u32, canvas_height: u32, target_width: u32, target_height: u32) -> Self {
        Self {
            canvas_width,
            canvas_height,
            target_width,
            target_height,
        }
    }

    /// Kindle Oasis 2 held in landscape: the 1680x1264 dashboard canvas is
    /// delivered at native resolution.
    pub fn oasis_landscape() -> Self {
        Self::new(1680, 1264, 1680, 1264)
    }

    /// Uniform scale factor that fits the canvas inside the target.
    pub fn scale_factor(&self) -> f64 {
        let fx = f64::from(self.target_width) / f64::from(self.canvas_width);
        let fy = f64::from(self.target_height) / f64::from(self.canvas_height);
        fx.min(fy)
    }

    /// Reject profiles with a zero dimension.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let dims = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("target_width", self.target_width),
            ("target_height", self.target_height),
        ];
        for (name, value) in dims {
            if value == 0 {
                return Err(PipelineError::InvalidProfile {
                    reason: format!("{} must be > 0", name),
                });
            }
        }
        Ok(())
    }
}

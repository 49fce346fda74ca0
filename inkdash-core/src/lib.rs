//! inkdash Core - Shared Types
//!
//! Pure data structures shared by the aggregator, the cache and the image
//! pipeline. This crate contains no I/O and never reads the environment.

pub mod config;
pub mod display;
pub mod error;
pub mod health;
pub mod identity;
pub mod profile;
pub mod record;
pub mod snapshot;

pub use config::{DisplayConfig, PanelConfig, SourceConfig, TickerSpec};
pub use error::{ConfigError, InkdashError, InkdashResult, PipelineError, SourceFetchError};
pub use health::{HealthCheck, HealthStatus};
pub use identity::{compute_content_hash, ContentHash, SourceId, SourceKind, Timestamp};
pub use profile::DeviceProfile;
pub use record::Record;
pub use snapshot::{Snapshot, SnapshotBuilder};

/// Number of discrete gray levels the target panel can show.
pub const GRAY_LEVELS: u8 = 16;

/// Highest quantization level (inclusive).
pub const MAX_LEVEL: u8 = GRAY_LEVELS - 1;

/// Distance between two adjacent reconstructed gray values (255 / 15).
pub const LEVEL_STEP: f32 = 255.0 / MAX_LEVEL as f32;

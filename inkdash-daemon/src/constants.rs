//! Constants for the inkdash daemon
//!
//! Environment variable names and fallback values in one place.

// ============================================================================
// ENVIRONMENT
// ============================================================================

/// Path of the TOML configuration file (overridden by `--config`)
pub const ENV_CONFIG_PATH: &str = "INKDASH_CONFIG";

/// Canvas width the renderer draws at
pub const ENV_SCREEN_WIDTH: &str = "INKDASH_SCREEN_WIDTH";

/// Canvas height the renderer draws at
pub const ENV_SCREEN_HEIGHT: &str = "INKDASH_SCREEN_HEIGHT";

/// Panel width the pipeline produces
pub const ENV_TARGET_WIDTH: &str = "INKDASH_TARGET_WIDTH";

/// Panel height the pipeline produces
pub const ENV_TARGET_HEIGHT: &str = "INKDASH_TARGET_HEIGHT";

/// Seconds between aggregation cycles
pub const ENV_REFRESH_INTERVAL_SECS: &str = "INKDASH_REFRESH_INTERVAL_SECS";

/// Ticker list, JSON or comma-separated symbols
pub const ENV_FINANCE_TICKERS: &str = "INKDASH_FINANCE_TICKERS";

/// Log output format: `json` or `pretty`
pub const ENV_LOG_FORMAT: &str = "INKDASH_LOG_FORMAT";

// ============================================================================
// LOGGING
// ============================================================================

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "inkdash_daemon=info,inkdash_sources=info,inkdash_imaging=info,warn";

// ============================================================================
// HTTP
// ============================================================================

/// User agent sent with every source request
pub const HTTP_USER_AGENT: &str = concat!("inkdashd/", env!("CARGO_PKG_VERSION"));

/// Connect timeout for source requests; the per-source fetch timeout still
/// bounds the whole call
pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// RENDER CACHE
// ============================================================================

/// Prefix of render cache keys
pub const RENDER_KEY_PREFIX: &str = "render:";

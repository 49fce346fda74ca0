//! Configuration loading for the daemon.
//!
//! The file is optional: without a path (from `--config` or `INKDASH_CONFIG`,
//! both resolved by [`crate::cli::Cli`]) the daemon runs on
//! `PanelConfig::default()`. Environment overrides apply on top of
//! either, then the result is validated.

use std::path::Path;

use inkdash_core::{ConfigError, PanelConfig, TickerSpec};

use crate::constants::{
    ENV_FINANCE_TICKERS, ENV_REFRESH_INTERVAL_SECS, ENV_SCREEN_HEIGHT,
    ENV_SCREEN_WIDTH, ENV_TARGET_HEIGHT, ENV_TARGET_WIDTH,
};
use crate::error::DaemonResult;

/// Load, override and validate the panel configuration.
///
pub fn load(path: Option<&Path>) -> DaemonResult<PanelConfig> {
    let config = match path {
        Some(path) => from_path(path)?,
        None => PanelConfig::default(),
    };
    let config = apply_env_overrides(config, |key| std::env::var(key).ok())?;
    config.validate()?;
    tracing::debug!(
        sources = config.sources.len(),
        refresh_interval_secs = config.refresh_interval_secs,
        "Configuration loaded"
    );
    Ok(config)
}

/// Parse a TOML file. Does not validate.
pub fn from_path(path: &Path) -> DaemonResult<PanelConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config: PanelConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Apply the `INKDASH_*` overrides through `lookup`.
///
/// Unset variables leave the field alone; unparseable ones are an error.
pub fn apply_env_overrides(
    mut config: PanelConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<PanelConfig, ConfigError> {
    if let Some(v) = parse_var::<u32>(&lookup, ENV_SCREEN_WIDTH)? {
        config.display.canvas_width = v;
    }
    if let Some(v) = parse_var::<u32>(&lookup, ENV_SCREEN_HEIGHT)? {
        config.display.canvas_height = v;
    }
    if let Some(v) = parse_var::<u32>(&lookup, ENV_TARGET_WIDTH)? {
        config.display.target_width = v;
    }
    if let Some(v) = parse_var::<u32>(&lookup, ENV_TARGET_HEIGHT)? {
        config.display.target_height = v;
    }
    if let Some(v) = parse_var::<u64>(&lookup, ENV_REFRESH_INTERVAL_SECS)? {
        config.refresh_interval_secs = v;
    }
    if let Some(raw) = lookup(ENV_FINANCE_TICKERS) {
        let tickers = TickerSpec::parse_list(&raw);
        if !tickers.is_empty() {
            config.finance_tickers = tickers;
        }
    }
    Ok(config)
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::invalid(key, raw, "not a valid number")),
    }
}

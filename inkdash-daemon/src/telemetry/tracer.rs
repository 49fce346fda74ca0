//! Tracing subscriber initialization

use std::str::FromStr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::constants::{DEFAULT_LOG_FILTER, ENV_LOG_FORMAT};
use crate::error::{DaemonError, DaemonResult};

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event
    #[default]
    Json,
    /// Human-readable, for a terminal
    Pretty,
}

impl FromStr for LogFormat {
    type Err = DaemonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(DaemonError::Telemetry(format!(
                "unknown log format '{}' (expected json or pretty)",
                other
            ))),
        }
    }
}

/// Telemetry configuration from environment variables.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            format: std::env::var(ENV_LOG_FORMAT)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            default_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Install the global tracing subscriber.
///
/// Call once at startup, before any event is emitted. Fails if a subscriber
/// is already installed.
pub fn init_tracer(config: &TelemetryConfig) -> DaemonResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    // stdout carries command output (`inkdashd snapshot`).
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let result = match config.format {
        LogFormat::Json => registry.with(fmt_layer.json()).try_init(),
        LogFormat::Pretty => registry.with(fmt_layer.pretty()).try_init(),
    };
    result.map_err(|e| DaemonError::Telemetry(format!("Failed to init subscriber: {}", e)))?;

    tracing::info!(format = ?config.format, "Telemetry initialized");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EnvVarGuard {
        key: &'static str,
        original: Option<String>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: Option<&str>) -> Self {
            let original = std::env::var(key).ok();
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
            Self { key, original }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match self.original.as_deref() {
                Some(v) => std::env::set_var(self.key, v),
                None => std::env::remove_var(self.key),
            }
        }
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Pretty ".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!(matches!(
            "xml".parse::<LogFormat>(),
            Err(DaemonError::Telemetry(_))
        ));
    }

    #[test]
    fn test_telemetry_config_from_env() {
        {
            let _guard = EnvVarGuard::set(ENV_LOG_FORMAT, None);
            assert_eq!(TelemetryConfig::default().format, LogFormat::Json);
        }
        {
            let _guard = EnvVarGuard::set(ENV_LOG_FORMAT, Some("pretty"));
            assert_eq!(TelemetryConfig::default().format, LogFormat::Pretty);
        }
        {
            // Unparseable values fall back to JSON.
            let _guard = EnvVarGuard::set(ENV_LOG_FORMAT, Some("yaml"));
            let config = TelemetryConfig::default();
            assert_eq!(config.format, LogFormat::Json);
            assert_eq!(config.default_filter, DEFAULT_LOG_FILTER);
        }
    }
}

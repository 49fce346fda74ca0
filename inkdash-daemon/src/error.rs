//! Error types for the daemon.

use inkdash_core::{ConfigError, PipelineError};

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Telemetry init failed: {0}")]
    Telemetry(String),
    #[error("Render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type DaemonResult<T> = Result<T, DaemonError>;

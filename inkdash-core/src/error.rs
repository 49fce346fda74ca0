//! Error types for inkdash operations

use std::time::Duration;
use thiserror::Error;

/// Failure of a single data-source fetch.
///
/// Never fatal: the aggregator recovers by falling back to the last cached
/// record or by omitting the source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceFetchError {
    #[error("Fetch timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Transport failure: {reason}")]
    Transport { reason: String },

    #[error("Malformed payload: {reason}")]
    MalformedPayload { reason: String },

    #[error("Fetcher panicked: {reason}")]
    Panicked { reason: String },
}

impl SourceFetchError {
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            reason: reason.into(),
        }
    }

    /// Short label used in logs and cycle reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Transport { .. } => "transport",
            Self::MalformedPayload { .. } => "malformed_payload",
            Self::Panicked { .. } => "panicked",
        }
    }
}

/// Invalid input to the image pipeline. Fatal to that invocation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Empty buffer: {width}x{height}")]
    EmptyBuffer { width: u32, height: u32 },

    #[error(
        "Canvas mismatch: profile expects {expected_width}x{expected_height}, got {width}x{height}"
    )]
    CanvasMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    #[error("Invalid device profile: {reason}")]
    InvalidProfile { reason: String },

    #[error("Buffer length mismatch: expected {expected} samples, got {got}")]
    BufferLength { expected: usize, got: usize },

    #[error("Image decode failed: {reason}")]
    Decode { reason: String },

    #[error("Image encode failed: {reason}")]
    Encode { reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Duplicate source id: {id}")]
    DuplicateSource { id: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Master error type for all inkdash errors.
#[derive(Debug, Clone, Error)]
pub enum InkdashError {
    #[error("Source error: {0}")]
    Source(#[from] SourceFetchError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for inkdash operations.
pub type InkdashResult<T> = Result<T, InkdashError>;

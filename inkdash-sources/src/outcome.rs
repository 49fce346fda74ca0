//! Per-source results of one aggregation cycle.

use inkdash_core::{Record, SourceFetchError, Timestamp};
use serde::Serialize;

/// Where a fresh record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchOrigin {
    /// Cached entry still inside its TTL; the fetcher was not called.
    Cache,
    /// The fetcher succeeded during this cycle.
    Network,
}

/// Resolution of one source for one cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    Fresh {
        record: Record,
        origin: FetchOrigin,
    },
    /// The fetch failed and the last cached record is used instead.
    StaleFallback {
        record: Record,
        fetched_at: Timestamp,
        error: SourceFetchError,
    },
    /// The fetch failed and nothing was cached.
    Absent { error: SourceFetchError },
}

impl SourceOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Fresh { .. } => OutcomeKind::Fresh,
            Self::StaleFallback { .. } => OutcomeKind::Stale,
            Self::Absent { .. } => OutcomeKind::Absent,
        }
    }

    pub fn record(&self) -> Option<&Record> {
        match self {
            Self::Fresh { record, .. } | Self::StaleFallback { record, .. } => Some(record),
            Self::Absent { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&SourceFetchError> {
        match self {
            Self::Fresh { .. } => None,
            Self::StaleFallback { error, .. } | Self::Absent { error } => Some(error),
        }
    }
}

/// Outcome without the payload, for reports and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Fresh,
    Stale,
    Absent,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Stale => "stale",
            Self::Absent => "absent",
        }
    }
}

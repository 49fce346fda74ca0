//! Health reporting for aggregation cycles
//!
//! A cycle never fails, so health is the only place degradation becomes
//! visible to operators.

use serde::{Deserialize, Serialize};

use crate::identity::{SourceId, Timestamp};

/// Health status for a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Every source served fresh data
    Healthy,
    /// Some sources served stale data or nothing at all
    Degraded,
    /// No source produced anything
    Unhealthy,
}

/// Health of one component at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: HealthStatus,
    pub component: String,
    pub message: Option<String>,
    pub stale_sources: Vec<SourceId>,
    pub absent_sources: Vec<SourceId>,
    pub checked_at: Timestamp,
}

impl HealthCheck {
    /// Classify a cycle from the ids that were stale or absent.
    ///
    /// `total` is the number of sources that took part in the cycle.
    pub fn from_sources(
        component: impl Into<String>,
        total: usize,
        stale_sources: Vec<SourceId>,
        absent_sources: Vec<SourceId>,
        checked_at: Timestamp,
    ) -> Self {
        let status = if total > 0 && absent_sources.len() == total {
            HealthStatus::Unhealthy
        } else if stale_sources.is_empty() && absent_sources.is_empty() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        };

        let message = match status {
            HealthStatus::Healthy => None,
            _ => Some(format!(
                "{} stale, {} absent of {} sources",
                stale_sources.len(),
                absent_sources.len(),
                total
            )),
        };

        Self {
            status,
            component: component.into(),
            message,
            stale_sources,
            absent_sources,
            checked_at,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

//! Fan-out aggregation of all registered sources into one snapshot.
//!
//! Each cycle:
//! 1. serves sources whose cache entry is inside its TTL without fetching
//! 2. spawns one task per remaining source, bounded by its timeout
//! 3. waits for every task to settle
//! 4. stores successes, falls back to stale entries for failures
//! 5. composes the snapshot in id order
//!
//! A cycle never fails. The worst case is a snapshot with every field absent.

use chrono::Utc;
use futures_util::future::join_all;
use inkdash_core::{HealthCheck, Record, Snapshot, SourceFetchError, SourceId, Timestamp};
use inkdash_storage::{CacheEntry, CacheStore};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::fetcher::{SourceFetcher, SourceRegistry, SourceSpec};
use crate::outcome::{FetchOrigin, OutcomeKind, SourceOutcome};

/// Aggregate every source in `registry` into one snapshot.
///
/// `default_timeout` applies to sources that do not set their own. Only
/// `cache` is mutated.
pub async fn aggregate(
    registry: &SourceRegistry,
    default_timeout: Duration,
    cache: &CacheStore,
) -> Snapshot {
    let outcomes = resolve_all(registry, default_timeout, cache).await;
    compose(&outcomes)
}

/// Owns the registry and the shared cache for repeated cycles.
#[derive(Debug, Clone)]
pub struct Aggregator {
    registry: SourceRegistry,
    default_timeout: Duration,
    cache: Arc<CacheStore>,
}

impl Aggregator {
    pub fn new(registry: SourceRegistry, default_timeout: Duration, cache: Arc<CacheStore>) -> Self {
        Self {
            registry,
            default_timeout,
            cache,
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Run one cycle and report how each source was resolved.
    pub async fn run_cycle(&self) -> CycleReport {
        let started = Instant::now();
        let outcomes = resolve_all(&self.registry, self.default_timeout, &self.cache).await;
        let snapshot = compose(&outcomes);
        let elapsed = started.elapsed();

        let sources: Vec<SourceReport> = outcomes
            .iter()
            .map(|(id, outcome)| SourceReport::new(id.clone(), outcome))
            .collect();

        let report = CycleReport {
            snapshot,
            sources,
            elapsed,
        };

        info!(
            sources = report.sources.len(),
            present = report.snapshot.present_count(),
            stale = report.count(OutcomeKind::Stale),
            absent = report.count(OutcomeKind::Absent),
            elapsed_ms = elapsed.as_millis() as u64,
            "Aggregation cycle complete"
        );

        report
    }

    /// Snapshot only, for callers that do not need the report.
    pub async fn snapshot(&self) -> Snapshot {
        aggregate(&self.registry, self.default_timeout, &self.cache).await
    }
}

/// Per-source line of a [`CycleReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    pub id: SourceId,
    pub outcome: OutcomeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<FetchOrigin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceReport {
    fn new(id: SourceId, outcome: &SourceOutcome) -> Self {
        let origin = match outcome {
            SourceOutcome::Fresh { origin, .. } => Some(*origin),
            _ => None,
        };
        Self {
            id,
            outcome: outcome.kind(),
            origin,
            error: outcome.error().map(ToString::to_string),
        }
    }
}

/// Everything one cycle produced.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub snapshot: Snapshot,
    /// Sorted by source id.
    pub sources: Vec<SourceReport>,
    pub elapsed: Duration,
}

impl CycleReport {
    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.sources.iter().filter(|s| s.outcome == kind).count()
    }

    pub fn outcome(&self, id: &str) -> Option<OutcomeKind> {
        self.sources
            .iter()
            .find(|s| s.id.as_str() == id)
            .map(|s| s.outcome)
    }

    pub fn health(&self) -> HealthCheck {
        let ids_with = |kind| {
            self.sources
                .iter()
                .filter(|s| s.outcome == kind)
                .map(|s| s.id.clone())
                .collect::<Vec<_>>()
        };
        HealthCheck::from_sources(
            "aggregator",
            self.sources.len(),
            ids_with(OutcomeKind::Stale),
            ids_with(OutcomeKind::Absent),
            self.snapshot.generated_at(),
        )
    }
}

async fn resolve_all(
    registry: &SourceRegistry,
    default_timeout: Duration,
    cache: &CacheStore,
) -> Vec<(SourceId, SourceOutcome)> {
    let now = Utc::now();
    let mut outcomes = Vec::with_capacity(registry.len());
    let mut pending: Vec<SourceSpec> = Vec::new();
    let mut handles = Vec::new();

    for source in registry.iter() {
        if let Some(read) = cache.get_fresh(source.spec.id.as_str(), now) {
            debug!(
                source = %source.spec.id,
                age_secs = read.staleness().as_secs(),
                "Serving cached record"
            );
            outcomes.push((
                source.spec.id.clone(),
                SourceOutcome::Fresh {
                    record: read.into_value(),
                    origin: FetchOrigin::Cache,
                },
            ));
            continue;
        }

        let timeout = source.spec.timeout_or(default_timeout);
        let fetcher = Arc::clone(&source.fetcher);
        // Stamped when this fetch finishes, not when the slowest one does.
        handles.push(tokio::spawn(async move {
            let result = fetch_bounded(fetcher.as_ref(), timeout).await;
            (Utc::now(), result)
        }));
        pending.push(source.spec.clone());
    }

    let settled = join_all(handles).await;

    for (spec, joined) in pending.into_iter().zip(settled) {
        let (settled_at, result) = joined.unwrap_or_else(|e| {
            (
                Utc::now(),
                Err(SourceFetchError::Panicked {
                    reason: e.to_string(),
                }),
            )
        });
        let outcome = settle(&spec, result, settled_at, cache);
        outcomes.push((spec.id, outcome));
    }

    outcomes.sort_by(|a, b| a.0.cmp(&b.0));
    outcomes
}

async fn fetch_bounded(
    fetcher: &dyn SourceFetcher,
    timeout: Duration,
) -> Result<Record, SourceFetchError> {
    match tokio::time::timeout(timeout, fetcher.fetch()).await {
        Ok(result) => result,
        Err(_) => Err(SourceFetchError::Timeout { timeout }),
    }
}

/// `settled_at` is when the fetch for `spec` completed. It becomes the cache
/// entry's fetch time on success and the staleness reference on failure.
fn settle(
    spec: &SourceSpec,
    result: Result<Record, SourceFetchError>,
    settled_at: Timestamp,
    cache: &CacheStore,
) -> SourceOutcome {
    match result {
        Ok(record) => {
            cache.insert(CacheEntry::fetched_at(
                spec.id.clone(),
                record.clone(),
                spec.ttl,
                settled_at,
            ));
            debug!(source = %spec.id, "Fetched fresh record");
            SourceOutcome::Fresh {
                record,
                origin: FetchOrigin::Network,
            }
        }
        Err(error) => match cache.get_stale(spec.id.as_str(), settled_at) {
            Some(read) => {
                warn!(
                    source = %spec.id,
                    error_kind = error.kind(),
                    error = %error,
                    age_secs = read.staleness().as_secs(),
                    "Fetch failed, serving stale record"
                );
                let fetched_at = read.cached_at();
                SourceOutcome::StaleFallback {
                    record: read.into_value(),
                    fetched_at,
                    error,
                }
            }
            None => {
                warn!(
                    source = %spec.id,
                    error_kind = error.kind(),
                    error = %error,
                    "Fetch failed with nothing cached, omitting source"
                );
                SourceOutcome::Absent { error }
            }
        },
    }
}

fn compose(outcomes: &[(SourceId, SourceOutcome)]) -> Snapshot {
    let mut builder = Snapshot::builder(Utc::now());
    for (id, outcome) in outcomes {
        match outcome {
            SourceOutcome::Fresh { record, .. } => {
                builder.insert(id.clone(), record.clone());
            }
            SourceOutcome::StaleFallback { record, .. } => {
                builder.insert_stale(id.clone(), record.clone());
            }
            SourceOutcome::Absent { .. } => {}
        }
    }
    builder.build()
}

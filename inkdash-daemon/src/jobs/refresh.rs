//! Snapshot Refresh Background Task
//!
//! Runs one aggregation cycle per refresh period and publishes the result:
//!
//! - on a `watch` channel, for the render side of the daemon
//! - optionally as JSON on disk, written to a temporary file and renamed
//!   into place so readers never observe a partial snapshot
//!
//! A cycle never fails. Source failures surface only as stale or absent
//! entries, counted in [`RefreshMetrics`].

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use inkdash_core::{PanelConfig, Snapshot};
use inkdash_sources::{Aggregator, OutcomeKind};
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

use crate::error::DaemonResult;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for the refresh background task.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Time between cycles (default: 60 seconds)
    pub interval: Duration,

    /// Where to write the latest snapshot as JSON, if anywhere
    pub snapshot_path: Option<PathBuf>,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::from_panel(&PanelConfig::default())
    }
}

impl RefreshConfig {
    pub fn from_panel(config: &PanelConfig) -> Self {
        Self {
            interval: config.refresh_interval(),
            snapshot_path: config.snapshot_path.clone(),
        }
    }
}

// ============================================================================
// METRICS
// ============================================================================

/// Counters for refresh activity since startup.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
    /// Cycles completed
    pub cycles: AtomicU64,

    /// Sources served from the network or a fresh cache entry
    pub fresh_served: AtomicU64,

    /// Sources that fell back to a stale cache entry
    pub stale_served: AtomicU64,

    /// Sources left out of a snapshot
    pub absent: AtomicU64,

    /// Failed snapshot file writes
    pub write_errors: AtomicU64,
}

impl RefreshMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> RefreshMetricsSnapshot {
        RefreshMetricsSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            fresh_served: self.fresh_served.load(Ordering::Relaxed),
            stale_served: self.stale_served.load(Ordering::Relaxed),
            absent: self.absent.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
        }
    }
}

/// Refresh metrics at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshMetricsSnapshot {
    pub cycles: u64,
    pub fresh_served: u64,
    pub stale_served: u64,
    pub absent: u64,
    pub write_errors: u64,
}

// ============================================================================
// BACKGROUND TASK
// ============================================================================

/// Background task that refreshes the snapshot until shutdown.
///
/// The first cycle runs immediately. Ticks missed while a cycle is still
/// running are skipped rather than bunched up.
///
/// # Example
///
/// ```ignore
/// let (snapshot_tx, snapshot_rx) = watch::channel(None);
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let handle = tokio::spawn(refresh_task(aggregator, RefreshConfig::default(), snapshot_tx, shutdown_rx));
///
/// // Later
/// let _ = shutdown_tx.send(true);
/// let metrics = handle.await?;
/// ```
pub async fn refresh_task(
    aggregator: Arc<Aggregator>,
    config: RefreshConfig,
    snapshot_tx: watch::Sender<Option<Arc<Snapshot>>>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Arc<RefreshMetrics> {
    let metrics = Arc::new(RefreshMetrics::new());

    let mut refresh_interval = interval(config.interval);
    refresh_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(
        interval_secs = config.interval.as_secs(),
        sources = aggregator.registry().len(),
        snapshot_path = ?config.snapshot_path,
        "Refresh task started"
    );

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    tracing::info!("Refresh task shutting down");
                    break;
                }
            }

            _ = refresh_interval.tick() => {
                refresh_once(&aggregator, &config, &snapshot_tx, &metrics).await;
            }
        }
    }

    let snapshot = metrics.snapshot();
    tracing::info!(
        cycles = snapshot.cycles,
        fresh_served = snapshot.fresh_served,
        stale_served = snapshot.stale_served,
        absent = snapshot.absent,
        write_errors = snapshot.write_errors,
        "Refresh task completed"
    );

    metrics
}

/// Run one cycle, record it and publish the snapshot.
async fn refresh_once(
    aggregator: &Aggregator,
    config: &RefreshConfig,
    snapshot_tx: &watch::Sender<Option<Arc<Snapshot>>>,
    metrics: &RefreshMetrics,
) {
    let report = aggregator.run_cycle().await;

    metrics.cycles.fetch_add(1, Ordering::Relaxed);
    metrics
        .fresh_served
        .fetch_add(report.count(OutcomeKind::Fresh) as u64, Ordering::Relaxed);
    metrics
        .stale_served
        .fetch_add(report.count(OutcomeKind::Stale) as u64, Ordering::Relaxed);
    metrics
        .absent
        .fetch_add(report.count(OutcomeKind::Absent) as u64, Ordering::Relaxed);

    let health = report.health();
    if !health.is_healthy() {
        tracing::warn!(
            status = ?health.status,
            stale = ?health.stale_sources,
            absent = ?health.absent_sources,
            "Snapshot degraded"
        );
    }

    let snapshot = Arc::new(report.snapshot);
    if let Some(path) = &config.snapshot_path {
        if let Err(e) = write_snapshot(path, &snapshot).await {
            tracing::error!(error = %e, path = %path.display(), "Failed to write snapshot");
            metrics.write_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    snapshot_tx.send_replace(Some(snapshot));
}

/// Write a snapshot as pretty JSON, replacing `path` atomically.
pub async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> DaemonResult<()> {
    let json = serde_json::to_vec_pretty(snapshot)?;
    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkdash_core::Record;
    use inkdash_sources::{FailingFetcher, SourceRegistry, SourceSpec, StaticFetcher};
    use inkdash_storage::CacheStore;
    use serde_json::json;

    fn aggregator(registry: SourceRegistry) -> Arc<Aggregator> {
        Arc::new(Aggregator::new(
            registry,
            Duration::from_secs(15),
            Arc::new(CacheStore::new()),
        ))
    }

    #[test]
    fn test_config_from_panel() {
        let panel = PanelConfig {
            refresh_interval_secs: 300,
            snapshot_path: Some(PathBuf::from("/run/inkdash/snapshot.json")),
            ..PanelConfig::default()
        };
        let config = RefreshConfig::from_panel(&panel);
        assert_eq!(config.interval, Duration::from_secs(300));
        assert!(config.snapshot_path.is_some());
        assert_eq!(RefreshConfig::default().interval, Duration::from_secs(60));
    }

    #[test]
    fn test_tmp_path_is_sibling() {
        let tmp = tmp_path(Path::new("/var/lib/inkdash/snapshot.json"));
        assert_eq!(tmp, PathBuf::from("/var/lib/inkdash/snapshot.json.tmp"));
    }

    #[tokio::test]
    async fn test_write_snapshot_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let mut builder = Snapshot::builder(chrono::Utc::now());
        builder.insert("news".into(), Record::json(json!([{"title": "first"}])));
        write_snapshot(&path, &builder.build()).await.unwrap();

        let mut builder = Snapshot::builder(chrono::Utc::now());
        builder.insert("news".into(), Record::json(json!([{"title": "second"}])));
        write_snapshot(&path, &builder.build()).await.unwrap();

        let written: Snapshot = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(
            written.news().and_then(Record::as_json).unwrap()[0]["title"],
            "second"
        );
        assert!(!tmp_path(&path).exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_task_publishes_each_period() {
        let mut registry = SourceRegistry::new();
        registry.register(
            SourceSpec::new("weather", Duration::ZERO),
            StaticFetcher::new(Record::json(json!({"temp": 30}))),
        );
        registry.register(
            SourceSpec::new("news", Duration::from_secs(300)),
            FailingFetcher::transport("offline"),
        );

        let (snapshot_tx, mut snapshot_rx) = watch::channel(None);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let config = RefreshConfig {
            interval: Duration::from_secs(60),
            snapshot_path: None,
        };
        let handle = tokio::spawn(refresh_task(
            aggregator(registry),
            config,
            snapshot_tx,
            shutdown_rx,
        ));

        snapshot_rx.changed().await.unwrap();
        {
            let latest = snapshot_rx.borrow();
            let snapshot = latest.as_ref().unwrap();
            assert!(snapshot.weather().is_some());
            assert!(snapshot.news().is_none());
        }

        // Ticks at 60s and 120s.
        tokio::time::sleep(Duration::from_secs(125)).await;
        shutdown_tx.send(true).unwrap();
        let metrics = handle.await.unwrap().snapshot();

        assert_eq!(metrics.cycles, 3);
        assert_eq!(metrics.fresh_served, 3);
        assert_eq!(metrics.absent, 3);
        assert_eq!(metrics.stale_served, 0);
        assert_eq!(metrics.write_errors, 0);
    }

    #[tokio::test]
    async fn test_write_failure_is_counted_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = RefreshConfig {
            interval: Duration::from_secs(60),
            snapshot_path: Some(dir.path().join("missing-dir").join("snapshot.json")),
        };
        let (snapshot_tx, snapshot_rx) = watch::channel(None);
        let metrics = RefreshMetrics::new();

        refresh_once(&aggregator(SourceRegistry::new()), &config, &snapshot_tx, &metrics).await;

        let counts = metrics.snapshot();
        assert_eq!(counts.cycles, 1);
        assert_eq!(counts.write_errors, 1);
        assert!(snapshot_rx.borrow().is_some());
    }
}

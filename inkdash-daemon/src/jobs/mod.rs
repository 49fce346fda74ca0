//! Background jobs for the daemon
//!
//! - `refresh`: runs aggregation cycles and publishes the latest snapshot
//!
//! # Usage
//!
//! ```ignore
//! use inkdash_daemon::jobs::{refresh_task, RefreshConfig};
//! use tokio::sync::watch;
//!
//! let (snapshot_tx, snapshot_rx) = watch::channel(None);
//! let (shutdown_tx, shutdown_rx) = watch::channel(false);
//! tokio::spawn(refresh_task(aggregator, RefreshConfig::from_panel(&config), snapshot_tx, shutdown_rx));
//!
//! // On shutdown
//! let _ = shutdown_tx.send(true);
//! ```

pub mod refresh;

pub use refresh::{refresh_task, write_snapshot, RefreshConfig, RefreshMetrics, RefreshMetricsSnapshot};

//! Command implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use inkdash_core::PanelConfig;
use inkdash_sources::Aggregator;
use inkdash_storage::CacheStore;
use tokio::sync::watch;

use crate::error::DaemonResult;
use crate::http::{build_client, build_registry};
use crate::jobs::{refresh_task, RefreshConfig};
use crate::render::RenderService;

/// Wire the configured HTTP sources into an aggregator with a fresh cache.
pub fn build_aggregator(config: &PanelConfig) -> DaemonResult<Aggregator> {
    let client = build_client()?;
    let registry = build_registry(config, &client);
    Ok(Aggregator::new(
        registry,
        config.default_timeout(),
        Arc::new(CacheStore::new()),
    ))
}

/// A capture file re-rendered into a panel image after each snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureTarget {
    pub capture: PathBuf,
    pub output: PathBuf,
}

/// Refresh until ctrl-c.
///
/// With a `target`, one [`RenderService`] lives for the whole run, so a
/// capture that has not changed since the last snapshot is served from its
/// render cache. Render failures are logged and do not stop the loop.
pub async fn run(config: PanelConfig, target: Option<CaptureTarget>) -> DaemonResult<()> {
    let aggregator = Arc::new(build_aggregator(&config)?);
    if aggregator.registry().is_empty() {
        tracing::warn!("No source has a URL; snapshots will be empty");
    }

    let renderer = RenderService::from_panel(&config);

    let (snapshot_tx, mut snapshot_rx) = watch::channel(None);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(refresh_task(
        aggregator,
        RefreshConfig::from_panel(&config),
        snapshot_tx,
        shutdown_rx,
    ));

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                tracing::info!("Interrupt received");
                break;
            }
            changed = snapshot_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let published = match snapshot_rx.borrow_and_update().as_ref() {
                    Some(snapshot) => {
                        tracing::info!(
                            generated_at = %snapshot.generated_at(),
                            present = snapshot.present_count(),
                            stale = snapshot.stale_sources().len(),
                            "Snapshot published"
                        );
                        true
                    }
                    None => false,
                };
                if let Some(target) = target.as_ref().filter(|_| published) {
                    if let Err(e) = render_file(&renderer, &target.capture, &target.output).await {
                        tracing::warn!(
                            error = %e,
                            capture = %target.capture.display(),
                            "Panel render failed"
                        );
                    }
                }
            }
        }
    }

    let _ = shutdown_tx.send(true);
    handle.await?;
    Ok(())
}

/// Run one cycle and return the snapshot as pretty JSON.
pub async fn snapshot_once(config: &PanelConfig) -> DaemonResult<String> {
    let aggregator = build_aggregator(config)?;
    let report = aggregator.run_cycle().await;
    Ok(serde_json::to_string_pretty(&report.snapshot)?)
}

/// Render a capture file into a panel image file.
pub async fn process_file(config: &PanelConfig, input: &Path, output: &Path) -> DaemonResult<()> {
    render_file(&RenderService::from_panel(config), input, output).await
}

/// Render `input` through `service` and write the panel PNG to `output`.
pub async fn render_file(service: &RenderService, input: &Path, output: &Path) -> DaemonResult<()> {
    let capture = tokio::fs::read(input).await?;
    let png = service.render_png(capture).await?;
    tokio::fs::write(output, png).await?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        "Panel image written"
    );
    Ok(())
}

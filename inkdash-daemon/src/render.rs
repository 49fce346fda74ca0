//! Render service: capture PNG in, panel PNG out.
//!
//! The latest result is cached by content hash of the capture and the device
//! profile, so an unchanged dashboard is not dithered again within the render
//! TTL. A new capture replaces the cached render, keeping the cache at one
//! entry.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use inkdash_core::identity::content_hash_hex;
use inkdash_core::{compute_content_hash, DeviceProfile, PanelConfig, Record};
use inkdash_imaging::{process_png_with, PipelineOptions};
use inkdash_storage::{CacheStats, CacheStore};

use crate::constants::RENDER_KEY_PREFIX;
use crate::error::DaemonResult;

/// Runs the image pipeline off the async runtime and caches its output.
#[derive(Debug, Clone)]
pub struct RenderService {
    profile: DeviceProfile,
    options: PipelineOptions,
    cache: Arc<CacheStore<String>>,
    ttl: Duration,
}

impl RenderService {
    pub fn new(profile: DeviceProfile, ttl: Duration) -> Self {
        Self {
            profile,
            options: PipelineOptions::default(),
            cache: Arc::new(CacheStore::new()),
            ttl,
        }
    }

    pub fn from_panel(config: &PanelConfig) -> Self {
        Self::new(config.display.profile(), config.render_cache_ttl())
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Cache key for a capture under this service's profile.
    pub fn cache_key(&self, capture: &[u8]) -> String {
        let p = &self.profile;
        let mut content = Vec::with_capacity(capture.len() + 16);
        content.extend_from_slice(capture);
        for dim in [p.canvas_width, p.canvas_height, p.target_width, p.target_height] {
            content.extend_from_slice(&dim.to_le_bytes());
        }
        format!(
            "{}{}",
            RENDER_KEY_PREFIX,
            content_hash_hex(&compute_content_hash(&content))
        )
    }

    /// Turn a capture PNG into a panel PNG.
    ///
    /// Pipeline errors are returned as-is; nothing is cached for a failed
    /// render.
    pub async fn render_png(&self, capture: Vec<u8>) -> DaemonResult<Vec<u8>> {
        let key = self.cache_key(&capture);
        if let Some(hit) = self.cache.get_fresh(key.as_str(), Utc::now()) {
            if let Some(png) = hit.value().as_bytes() {
                tracing::debug!(key = %key, "Render cache hit");
                return Ok(png.to_vec());
            }
        }

        let profile = self.profile;
        let options = self.options;
        let started = std::time::Instant::now();
        let png = tokio::task::spawn_blocking(move || process_png_with(&capture, &profile, &options))
            .await??;

        tracing::info!(
            key = %key,
            width = profile.target_width,
            height = profile.target_height,
            bytes = png.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Rendered panel image"
        );

        self.cache.put_latest(key, Record::bytes(png.clone()), self.ttl);
        Ok(png)
    }
}

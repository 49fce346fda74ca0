//! HTTP JSON sources.
//!
//! Each configured source with a URL becomes an [`HttpJsonFetcher`]. The
//! response body must be JSON; anything else is a malformed payload.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use inkdash_core::{PanelConfig, Record, SourceFetchError, SourceKind, TickerSpec};
use inkdash_sources::{SourceFetcher, SourceRegistry, SourceSpec};

use crate::constants::{HTTP_CONNECT_TIMEOUT_SECS, HTTP_USER_AGENT};
use crate::error::DaemonResult;
use crate::finance::FinanceFetcher;

/// Placeholder in a financial source URL, replaced by the ticker symbols.
pub const SYMBOLS_PLACEHOLDER: &str = "{symbols}";

/// Build the client shared by every source.
///
/// No overall request timeout: each fetch is already bounded by its source
/// timeout in the aggregator.
pub fn build_client() -> DaemonResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(HTTP_USER_AGENT)
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .build()?;
    Ok(client)
}

/// Fetches one URL and parses the body as JSON.
#[derive(Debug, Clone)]
pub struct HttpJsonFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpJsonFetcher {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SourceFetcher for HttpJsonFetcher {
    async fn fetch(&self) -> Result<Record, SourceFetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SourceFetchError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceFetchError::transport(format!(
                "HTTP {} from {}",
                status, self.url
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceFetchError::transport(e.to_string()))?;
        Record::from_json_slice(&body)
    }
}

/// Substitute the ticker symbols into a financial source URL.
pub fn expand_symbols(url: &str, tickers: &[TickerSpec]) -> String {
    if !url.contains(SYMBOLS_PLACEHOLDER) {
        return url.to_string();
    }
    let symbols = tickers
        .iter()
        .map(|t| t.symbol.as_str())
        .collect::<Vec<_>>()
        .join(",");
    url.replace(SYMBOLS_PLACEHOLDER, &symbols)
}

/// Register an HTTP fetcher for every source that has a URL.
///
/// Sources without a URL are skipped with a warning; they never appear in
/// a snapshot. The financial source is wrapped in a [`FinanceFetcher`].
pub fn build_registry(config: &PanelConfig, client: &reqwest::Client) -> SourceRegistry {
    let mut registry = SourceRegistry::new();
    for source in &config.sources {
        let Some(url) = source.url.as_deref() else {
            tracing::warn!(source = %source.id, "No URL configured, source disabled");
            continue;
        };
        let fetcher: Arc<dyn SourceFetcher> = if source.id.kind() == Some(SourceKind::Financial) {
            let url = expand_symbols(url, &config.finance_tickers);
            tracing::debug!(source = %source.id, url = %url, ttl_secs = source.ttl_secs, "Registering source");
            Arc::new(FinanceFetcher::new(
                HttpJsonFetcher::new(client.clone(), url),
                config.finance_tickers.clone(),
            ))
        } else {
            tracing::debug!(source = %source.id, url = %url, ttl_secs = source.ttl_secs, "Registering source");
            Arc::new(HttpJsonFetcher::new(client.clone(), url))
        };
        registry.register_arc(SourceSpec::from(source), fetcher);
    }
    registry
}

//! Fetcher trait and the registry of configured sources.

use async_trait::async_trait;
use inkdash_core::{Record, SourceConfig, SourceFetchError, SourceId};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// A single external data source.
///
/// Implementations own their transport. The aggregator bounds every call
/// with a timeout and drops the future when it expires, so implementations
/// need no timeout handling of their own.
///
/// # Example
/// ```ignore
/// struct TidesFetcher { client: reqwest::Client }
///
/// #[async_trait]
/// impl SourceFetcher for TidesFetcher {
///     async fn fetch(&self) -> Result<Record, SourceFetchError> {
///         // call the tides API
///     }
/// }
/// ```
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self) -> Result<Record, SourceFetchError>;
}

/// Identity and caching policy of one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub id: SourceId,
    /// How long a successful result is reused without calling the fetcher.
    pub ttl: Duration,
    /// Overrides the aggregator's default timeout for this source.
    pub timeout: Option<Duration>,
}

impl SourceSpec {
    pub fn new(id: impl Into<SourceId>, ttl: Duration) -> Self {
        Self {
            id: id.into(),
            ttl,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout_or(&self, default: Duration) -> Duration {
        self.timeout.unwrap_or(default)
    }
}

impl From<&SourceConfig> for SourceSpec {
    fn from(config: &SourceConfig) -> Self {
        Self {
            id: config.id.clone(),
            ttl: config.ttl(),
            timeout: config.timeout(),
        }
    }
}

/// A source paired with the fetcher that produces it.
#[derive(Clone)]
pub struct RegisteredSource {
    pub spec: SourceSpec,
    pub fetcher: Arc<dyn SourceFetcher>,
}

impl std::fmt::Debug for RegisteredSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredSource")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Registry of sources keyed by id.
///
/// Iteration is ordered by id, which is the order outcomes are merged in.
///
/// # Example
/// ```ignore
/// let mut registry = SourceRegistry::new();
/// registry.register(SourceSpec::new("news", Duration::from_secs(300)), NewsFetcher::new());
/// let snapshot = aggregate(&registry, Duration::from_secs(15), &cache).await;
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: BTreeMap<SourceId, RegisteredSource>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fetcher. Replaces any source previously registered under
    /// the same id.
    pub fn register(&mut self, spec: SourceSpec, fetcher: impl SourceFetcher + 'static) {
        self.register_arc(spec, Arc::new(fetcher));
    }

    pub fn register_arc(&mut self, spec: SourceSpec, fetcher: Arc<dyn SourceFetcher>) {
        self.sources
            .insert(spec.id.clone(), RegisteredSource { spec, fetcher });
    }

    pub fn get(&self, id: &str) -> Option<&RegisteredSource> {
        self.sources.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredSource> {
        self.sources.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SourceId> {
        self.sources.keys()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

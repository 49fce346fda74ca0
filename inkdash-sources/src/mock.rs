//! Mock fetchers for tests and offline runs.

use async_trait::async_trait;
use inkdash_core::{Record, SourceFetchError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::fetcher::SourceFetcher;

/// Always returns the same record.
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    record: Record,
}

impl StaticFetcher {
    pub fn new(record: Record) -> Self {
        Self { record }
    }
}

#[async_trait]
impl SourceFetcher for StaticFetcher {
    async fn fetch(&self) -> Result<Record, SourceFetchError> {
        Ok(self.record.clone())
    }
}

/// Always fails with the same error.
#[derive(Debug, Clone)]
pub struct FailingFetcher {
    error: SourceFetchError,
}

impl FailingFetcher {
    pub fn new(error: SourceFetchError) -> Self {
        Self { error }
    }

    pub fn transport(reason: impl Into<String>) -> Self {
        Self::new(SourceFetchError::transport(reason))
    }
}

#[async_trait]
impl SourceFetcher for FailingFetcher {
    async fn fetch(&self) -> Result<Record, SourceFetchError> {
        Err(self.error.clone())
    }
}

/// Sleeps on the tokio clock before answering.
#[derive(Debug, Clone)]
pub struct SlowFetcher {
    delay: Duration,
    record: Record,
}

impl SlowFetcher {
    pub fn new(delay: Duration, record: Record) -> Self {
        Self { delay, record }
    }
}

#[async_trait]
impl SourceFetcher for SlowFetcher {
    async fn fetch(&self) -> Result<Record, SourceFetchError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.record.clone())
    }
}

/// Panics on every call.
#[derive(Debug, Clone, Default)]
pub struct PanickingFetcher;

#[async_trait]
impl SourceFetcher for PanickingFetcher {
    async fn fetch(&self) -> Result<Record, SourceFetchError> {
        panic!("fetcher exploded")
    }
}

/// Wraps another fetcher and counts how often it is called.
pub struct CountingFetcher<F> {
    inner: F,
    calls: Arc<AtomicUsize>,
}

impl<F: SourceFetcher> CountingFetcher<F> {
    /// Returns the fetcher and a handle to its call counter.
    pub fn new(inner: F) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl<F: SourceFetcher> SourceFetcher for CountingFetcher<F> {
    async fn fetch(&self) -> Result<Record, SourceFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch().await
    }
}

/// Succeeds once, then fails with a transport error.
#[derive(Debug)]
pub struct FlakyFetcher {
    record: Record,
    served: AtomicUsize,
}

impl FlakyFetcher {
    pub fn new(record: Record) -> Self {
        Self {
            record,
            served: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SourceFetcher for FlakyFetcher {
    async fn fetch(&self) -> Result<Record, SourceFetchError> {
        if self.served.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(self.record.clone())
        } else {
            Err(SourceFetchError::transport("connection reset"))
        }
    }
}

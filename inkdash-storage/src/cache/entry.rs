//! Cache entries.

use chrono::Utc;
use inkdash_core::{Record, Timestamp};
use std::time::Duration;

use super::freshness::Freshness;

/// The last successful result for one key.
///
/// Immutable once stored: a refresh replaces the whole entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<K> {
    pub key: K,
    pub value: Record,
    pub fetched_at: Timestamp,
    pub ttl: Duration,
}

impl<K> CacheEntry<K> {
    pub fn new(key: K, value: Record, ttl: Duration) -> Self {
        Self::fetched_at(key, value, ttl, Utc::now())
    }

    pub fn fetched_at(key: K, value: Record, ttl: Duration, fetched_at: Timestamp) -> Self {
        Self {
            key,
            value,
            fetched_at,
            ttl,
        }
    }

    /// Time elapsed since the fetch. Zero if `now` lies before `fetched_at`.
    pub fn age(&self, now: Timestamp) -> Duration {
        (now - self.fetched_at).to_std().unwrap_or(Duration::ZERO)
    }

    /// Fresh while `now - fetched_at < ttl`.
    pub fn is_fresh(&self, now: Timestamp) -> bool {
        self.age(now) < self.ttl
    }

    pub fn freshness(&self, now: Timestamp) -> Freshness {
        let age = self.age(now);
        if age < self.ttl {
            Freshness::Fresh { age }
        } else {
            Freshness::Expired { age }
        }
    }
}

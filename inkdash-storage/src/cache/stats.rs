//! Cache usage statistics.

use serde::Serialize;

/// Point-in-time statistics for a [`CacheStore`](super::CacheStore).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Reads answered by an entry inside its TTL.
    pub hits: u64,
    /// Reads that found nothing usable without a fetch.
    pub misses: u64,
    /// Expired entries handed out as a fallback.
    pub stale_served: u64,
    /// Number of entries currently in the cache.
    pub entry_count: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

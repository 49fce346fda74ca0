//! Freshness classification for cache reads.
//!
//! A hit is either still inside its TTL or expired. Expired entries are not
//! evicted; they stay available as the fallback for a failed refresh.

use inkdash_core::Timestamp;
use std::time::Duration;

/// How a stored entry relates to its TTL at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Younger than its TTL; callers may skip the fetch.
    Fresh { age: Duration },
    /// At or past its TTL; only good as a fallback.
    Expired { age: Duration },
}

impl Freshness {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh { .. })
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired { .. })
    }

    pub fn age(&self) -> Duration {
        match self {
            Self::Fresh { age } | Self::Expired { age } => *age,
        }
    }
}

/// Result of a cache read, carrying staleness metadata.
#[derive(Debug, Clone)]
pub struct CacheRead<T> {
    value: T,
    cached_at: Timestamp,
    freshness: Freshness,
}

impl<T> CacheRead<T> {
    pub fn new(value: T, cached_at: Timestamp, freshness: Freshness) -> Self {
        Self {
            value,
            cached_at,
            freshness,
        }
    }

    /// Consume the wrapper and return the underlying value.
    pub fn into_value(self) -> T {
        self.value
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// When the value was fetched from its source.
    pub fn cached_at(&self) -> Timestamp {
        self.cached_at
    }

    pub fn freshness(&self) -> Freshness {
        self.freshness
    }

    pub fn is_fresh(&self) -> bool {
        self.freshness.is_fresh()
    }

    /// Age of the value at the time of the read.
    pub fn staleness(&self) -> Duration {
        self.freshness.age()
    }

    /// Map the inner value to a new type.
    pub fn map<U, F>(self, f: F) -> CacheRead<U>
    where
        F: FnOnce(T) -> U,
    {
        CacheRead {
            value: f(self.value),
            cached_at: self.cached_at,
            freshness: self.freshness,
        }
    }
}

impl<T> AsRef<T> for CacheRead<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_freshness_age() {
        let fresh = Freshness::Fresh {
            age: Duration::from_secs(5),
        };
        assert!(fresh.is_fresh());
        assert_eq!(fresh.age(), Duration::from_secs(5));

        let expired = Freshness::Expired {
            age: Duration::from_secs(900),
        };
        assert!(expired.is_expired());
        assert!(!expired.is_fresh());
    }

    #[test]
    fn test_cache_read_map() {
        let read = CacheRead::new(
            42i32,
            Utc::now(),
            Freshness::Fresh {
                age: Duration::ZERO,
            },
        );
        let mapped = read.map(|v| v.to_string());

        assert!(mapped.is_fresh());
        assert_eq!(mapped.into_value(), "42");
    }
}

//! The shared cache store.

use chrono::Utc;
use inkdash_core::{Record, SourceId, Timestamp};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use super::entry::CacheEntry;
use super::freshness::CacheRead;
use super::stats::CacheStats;

/// Map from key to the last good record, shared by every task of a cycle.
///
/// One coarse lock guards the whole map. Critical sections are a lookup or a
/// single insert, never a fetch. At most one entry exists per key. Entries are
/// only removed by [`CacheStore::put_latest`].
#[derive(Debug)]
pub struct CacheStore<K = SourceId> {
    entries: RwLock<HashMap<K, CacheEntry<K>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    stale_served: AtomicU64,
}

impl<K> Default for CacheStore<K> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            stale_served: AtomicU64::new(0),
        }
    }
}

impl<K> CacheStore<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    // Entries are replaced wholesale, so a writer that panicked cannot have
    // left a half-written entry behind.
    fn read_map(&self) -> RwLockReadGuard<'_, HashMap<K, CacheEntry<K>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_map(&self) -> RwLockWriteGuard<'_, HashMap<K, CacheEntry<K>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Classify the entry for `key` without touching the statistics.
    pub fn peek<Q>(&self, key: &Q, now: Timestamp) -> Option<CacheRead<Record>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.read_map()
            .get(key)
            .map(|entry| CacheRead::new(entry.value.clone(), entry.fetched_at, entry.freshness(now)))
    }

    /// Return the entry for `key` only if it is still inside its TTL.
    ///
    /// Counts a hit or a miss.
    pub fn get_fresh<Q>(&self, key: &Q, now: Timestamp) -> Option<CacheRead<Record>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.peek(key, now) {
            Some(read) if read.is_fresh() => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(read)
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Return the entry for `key` regardless of age, classified against `now`.
    ///
    /// Used after a failed refresh; counts a stale serve when an entry exists.
    pub fn get_stale<Q>(&self, key: &Q, now: Timestamp) -> Option<CacheRead<Record>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let read = self.peek(key, now)?;
        self.stale_served.fetch_add(1, Ordering::Relaxed);
        Some(read)
    }

    /// Store a freshly fetched record, replacing any previous entry.
    pub fn put(&self, key: K, value: Record, ttl: Duration) {
        self.insert(CacheEntry::new(key, value, ttl));
    }

    /// Store a prepared entry, replacing any previous entry for its key.
    pub fn insert(&self, entry: CacheEntry<K>) {
        self.write_map().insert(entry.key.clone(), entry);
    }

    /// Store a record as the only entry, dropping every other key.
    ///
    /// For caches that only ever need the latest result, so the map stays at
    /// one entry however many distinct keys pass through it.
    pub fn put_latest(&self, key: K, value: Record, ttl: Duration) {
        let entry = CacheEntry::new(key, value, ttl);
        let mut map = self.write_map();
        map.clear();
        map.insert(entry.key.clone(), entry);
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.read_map().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_map().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stale_served: self.stale_served.load(Ordering::Relaxed),
            entry_count: self.len() as u64,
        }
    }
}

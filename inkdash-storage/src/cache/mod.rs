//! TTL cache with explicit staleness.
//!
//! Reads never hide how old the data is: every hit comes back as a
//! [`CacheRead`] that says whether the entry was still inside its TTL.
//! The aggregator serves fresh reads directly and keeps expired ones as a
//! fallback for when the refresh fails.
//!
//! # Example
//!
//! ```ignore
//! let store = CacheStore::new();
//! store.put(SourceId::from("news"), record, Duration::from_secs(300));
//!
//! match store.get_fresh("news", Utc::now()) {
//!     Some(read) => use_it(read.into_value()),
//!     None => refresh_or_fall_back(store.get_stale("news", Utc::now())),
//! }
//! ```

pub mod entry;
pub mod freshness;
pub mod stats;
pub mod store;

pub use entry::CacheEntry;
pub use freshness::{CacheRead, Freshness};
pub use stats::CacheStats;
pub use store::CacheStore;

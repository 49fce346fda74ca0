//! inkdash Storage - Source Cache
//!
//! The only persistence in the system: an in-process map from source id to
//! the last good record, living as long as the process does.

pub mod cache;

pub use cache::{CacheEntry, CacheRead, CacheStats, CacheStore, Freshness};

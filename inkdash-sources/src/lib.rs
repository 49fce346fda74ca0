//! inkdash Sources - Data Aggregator
//!
//! Fans out to every registered source, bounds each by a timeout, and merges
//! the results into one [`Snapshot`](inkdash_core::Snapshot). A failing source
//! falls back to its last cached record; a source that has never succeeded is
//! left out. The aggregator never fails as a whole.
//!
//! Transports are user-supplied [`SourceFetcher`] implementations.

pub mod aggregate;
pub mod fetcher;
pub mod mock;
pub mod outcome;

pub use aggregate::{aggregate, Aggregator, CycleReport, SourceReport};
pub use fetcher::{RegisteredSource, SourceFetcher, SourceRegistry, SourceSpec};
pub use mock::{CountingFetcher, FailingFetcher, FlakyFetcher, PanickingFetcher, SlowFetcher, StaticFetcher};
pub use outcome::{FetchOrigin, OutcomeKind, SourceOutcome};

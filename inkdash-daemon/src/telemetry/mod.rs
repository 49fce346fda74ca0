//! Log output for the daemon.
//!
//! The library crates only emit `tracing` events; installing a subscriber is
//! the binary's job.

pub mod tracer;

pub use tracer::{init_tracer, LogFormat, TelemetryConfig};

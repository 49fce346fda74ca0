//! inkdash Daemon
//!
//! Glue around the library crates: configuration loading, log setup, HTTP
//! sources and ticker formatting, the refresh job and the render service. The `inkdashd` binary
//! is a thin dispatcher over [`app`].

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod finance;
pub mod http;
pub mod jobs;
pub mod render;
pub mod telemetry;

pub use cli::{Cli, Command};
pub use error::{DaemonError, DaemonResult};
pub use finance::FinanceFetcher;
pub use http::HttpJsonFetcher;
pub use render::RenderService;

//! Observability for the selection feed loader.
//!
//! This crate provides:
//! - `TracingConfig` / `init_tracing` - Subscriber setup for binaries
//! - `LoaderMetrics` - Counters for fetches, pages and discarded responses

mod logging;
mod metrics;

pub use logging::*;
pub use metrics::*;

//! Incremental product feed loading with cursor pagination.
//!
//! This crate provides:
//! - `FeedLoader` - Event-driven façade over the whole pipeline
//! - `CursorPaginationEngine` - Single-flight fetches advancing a cursor
//! - `GridLayoutEstimator` - Columns and page sizes from the viewport
//! - `ScrollTrigger` - Debounced prefetch near the end of the buffer
//! - `FeedSource` / `ExchangeRateSource` - Collaborator seams
//! - `LoaderConfig` - TOML/JSON configuration

mod buffer;
mod config;
mod engine;
mod guard;
mod layout;
mod loader;
mod memory;
mod ports;
mod scroll;
mod session;
mod timeout;
mod view;

pub use buffer::*;
pub use config::*;
pub use engine::*;
pub use guard::*;
pub use layout::*;
pub use loader::*;
pub use memory::*;
pub use ports::*;
pub use scroll::*;
pub use session::*;
pub use timeout::*;
pub use view::*;

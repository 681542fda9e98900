//! Feed search module.
//!
//! Contains filter criteria, the cursor-based feed query and the page a
//! feed returns for it.

mod filter;
mod query;
mod results;

pub use filter::{Filter, FilterCriteria};
pub use query::{Cursor, FeedQuery};
pub use results::FeedPage;

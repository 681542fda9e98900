//! Cursor-based feed query.

use crate::ids::ProductId;
use crate::search::FilterCriteria;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pagination cursor: the id of the last item seen, or zero for the start
/// of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Cursor(u64);

impl Cursor {
    /// The start of the feed.
    pub const START: Cursor = Cursor(0);

    /// Cursor positioned after the given item.
    pub fn after(id: ProductId) -> Self {
        Self(id.get())
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    pub fn is_start(&self) -> bool {
        self.0 == 0
    }

    /// Whether an item id lies beyond this cursor.
    pub fn admits(&self, id: ProductId) -> bool {
        id.get() > self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A request for the next page of the feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedQuery {
    /// Only items with an id beyond this cursor are returned.
    pub cursor: Cursor,
    /// Maximum number of items in the page.
    pub limit: usize,
    /// Filters for the current session.
    pub filters: FilterCriteria,
}

impl FeedQuery {
    /// Query for the first page of a feed.
    pub fn first(limit: usize, filters: FilterCriteria) -> Self {
        Self {
            cursor: Cursor::START,
            limit,
            filters,
        }
    }

    /// Query for the page following `cursor`.
    pub fn after(cursor: Cursor, limit: usize, filters: FilterCriteria) -> Self {
        Self {
            cursor,
            limit,
            filters,
        }
    }

    /// Whether this query starts a fresh feed.
    pub fn is_first_page(&self) -> bool {
        self.cursor.is_start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_admits_only_later_ids() {
        let cursor = Cursor::after(ProductId::new(500));
        assert!(cursor.admits(ProductId::new(501)));
        assert!(!cursor.admits(ProductId::new(500)));
        assert!(!cursor.admits(ProductId::new(12)));
    }

    #[test]
    fn test_start_cursor() {
        assert!(Cursor::START.is_start());
        assert!(Cursor::START.admits(ProductId::new(1)));
        assert_eq!(Cursor::default(), Cursor::START);
    }

    #[test]
    fn test_query_builders() {
        let q = FeedQuery::first(24, FilterCriteria::new());
        assert!(q.is_first_page());
        assert_eq!(q.limit, 24);

        let q = FeedQuery::after(Cursor::after(ProductId::new(500)), 12, FilterCriteria::new());
        assert!(!q.is_first_page());
        assert_eq!(q.cursor.get(), 500);
    }
}

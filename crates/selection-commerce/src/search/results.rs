//! Feed pages.

use crate::catalog::ProductItem;
use crate::error::FeedContractViolation;
use crate::search::Cursor;
use serde::{Deserialize, Serialize};

/// One page returned by the feed for a [`FeedQuery`](crate::search::FeedQuery).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FeedPage {
    /// Items beyond the request cursor, ascending by id.
    pub items: Vec<ProductItem>,
    /// Server's claim that more items follow.
    ///
    /// An empty `items` list ends the feed whatever this says.
    pub has_more: bool,
}

impl FeedPage {
    pub fn new(items: Vec<ProductItem>, has_more: bool) -> Self {
        Self { items, has_more }
    }

    /// An empty, final page.
    pub fn end() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Cursor that follows this page, if it has items.
    pub fn next_cursor(&self) -> Option<Cursor> {
        self.items.last().map(|item| Cursor::after(item.id))
    }

    /// Whether the feed may continue past this page.
    ///
    /// An empty page is authoritative end-of-feed.
    pub fn continues(&self) -> bool {
        !self.items.is_empty() && self.has_more
    }

    /// Check that every id lies beyond `cursor` and ids strictly ascend.
    pub fn validate_after(&self, cursor: Cursor) -> Result<(), FeedContractViolation> {
        let mut previous = None;
        for item in &self.items {
            if !cursor.admits(item.id) {
                return Err(FeedContractViolation::NotBeyondCursor {
                    id: item.id,
                    cursor: cursor.get(),
                });
            }
            if let Some(prev) = previous {
                if item.id <= prev {
                    return Err(FeedContractViolation::OutOfOrder {
                        previous: prev,
                        id: item.id,
                    });
                }
            }
            previous = Some(item.id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ProductId;
    use crate::money::{Currency, Money};

    fn items(ids: &[u64]) -> Vec<ProductItem> {
        ids.iter()
            .map(|id| ProductItem::new(ProductId::new(*id), "item", Money::new(100, Currency::CNY)))
            .collect()
    }

    #[test]
    fn test_next_cursor_is_last_id() {
        let page = FeedPage::new(items(&[3, 9, 14]), true);
        assert_eq!(page.next_cursor(), Some(Cursor::after(ProductId::new(14))));
        assert!(FeedPage::end().next_cursor().is_none());
    }

    #[test]
    fn test_empty_page_never_continues() {
        let stale = FeedPage::new(Vec::new(), true);
        assert!(!stale.continues());
        assert!(FeedPage::new(items(&[1]), true).continues());
        assert!(!FeedPage::new(items(&[1]), false).continues());
    }

    #[test]
    fn test_validate_accepts_ascending_page() {
        let page = FeedPage::new(items(&[501, 502, 610]), true);
        assert!(page.validate_after(Cursor::after(ProductId::new(500))).is_ok());
    }

    #[test]
    fn test_validate_rejects_ids_at_or_below_cursor() {
        let page = FeedPage::new(items(&[499, 501]), true);
        let err = page
            .validate_after(Cursor::after(ProductId::new(500)))
            .unwrap_err();
        assert_eq!(
            err,
            FeedContractViolation::NotBeyondCursor {
                id: ProductId::new(499),
                cursor: 500
            }
        );

        let page = FeedPage::new(items(&[500]), true);
        assert!(page.validate_after(Cursor::after(ProductId::new(500))).is_err());
    }

    #[test]
    fn test_validate_rejects_unordered_page() {
        let page = FeedPage::new(items(&[10, 12, 11]), true);
        let err = page.validate_after(Cursor::START).unwrap_err();
        assert!(matches!(err, FeedContractViolation::OutOfOrder { .. }));
    }
}

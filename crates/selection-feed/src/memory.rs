//! In-memory collaborators for fixtures and tests.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use selection_commerce::prelude::*;

use crate::ports::{ExchangeRateSource, FeedSource, FetchError};

/// A fixed catalog served through the feed contract.
///
/// Items are kept sorted by id; each page holds the next `limit` items
/// beyond the cursor that match the query filters.
#[derive(Debug, Default)]
pub struct StaticFeed {
    items: Vec<ProductItem>,
    queries: RefCell<Vec<FeedQuery>>,
}

impl StaticFeed {
    pub fn new(mut items: Vec<ProductItem>) -> Self {
        items.sort_by_key(|item| item.id);
        items.dedup_by_key(|item| item.id);
        Self {
            items,
            queries: RefCell::new(Vec::new()),
        }
    }

    /// Parse a JSON array of products.
    pub fn from_json(json: &str) -> Result<Self, FetchError> {
        let items: Vec<ProductItem> = serde_json::from_str(json)?;
        Ok(Self::new(items))
    }

    pub fn items(&self) -> &[ProductItem] {
        &self.items
    }

    /// Queries received so far, oldest first.
    pub fn queries(&self) -> Vec<FeedQuery> {
        self.queries.borrow().clone()
    }

    pub fn page_for(&self, query: &FeedQuery) -> FeedPage {
        let mut matching = self
            .items
            .iter()
            .filter(|item| query.cursor.admits(item.id) && query.filters.matches(item));

        let items: Vec<ProductItem> = matching.by_ref().take(query.limit).cloned().collect();
        let has_more = matching.next().is_some();
        FeedPage::new(items, has_more)
    }
}

#[async_trait(?Send)]
impl FeedSource for StaticFeed {
    async fn fetch_page(&self, query: &FeedQuery) -> Result<FeedPage, FetchError> {
        self.queries.borrow_mut().push(query.clone());
        Ok(self.page_for(query))
    }
}

/// Exchange-rate source with a preset answer.
#[derive(Debug, Clone)]
pub struct FixedRate {
    rate: Option<f64>,
    calls: Cell<usize>,
}

impl FixedRate {
    pub fn new(rate: f64) -> Self {
        Self {
            rate: Some(rate),
            calls: Cell::new(0),
        }
    }

    /// A source that always fails.
    pub fn unavailable() -> Self {
        Self {
            rate: None,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait(?Send)]
impl ExchangeRateSource for FixedRate {
    async fn rate(&self, base: Currency, quote: Currency) -> Result<f64, FetchError> {
        self.calls.set(self.calls.get() + 1);
        if base == quote {
            return Ok(1.0);
        }
        self.rate.ok_or_else(|| {
            FetchError::Connection(format!("no {}/{} rate available", base, quote))
        })
    }
}

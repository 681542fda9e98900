//! Collaborator seams: the paged product feed and the exchange-rate source.

use std::rc::Rc;
use std::sync::Arc;

use async_trait::async_trait;
use selection_commerce::prelude::*;

/// Error type for collaborator calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Request error: {0}")]
    Request(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Deserialization(err.to_string())
    }
}

/// Server-side paged product search.
///
/// Contract: every returned item has an id strictly greater than
/// `query.cursor`, items arrive in ascending id order, and at most
/// `query.limit` of them are returned. `has_more = false` means the feed is
/// exhausted for these filters.
#[async_trait(?Send)]
pub trait FeedSource {
    async fn fetch_page(&self, query: &FeedQuery) -> Result<FeedPage, FetchError>;
}

#[async_trait(?Send)]
impl<T: FeedSource + ?Sized> FeedSource for Rc<T> {
    async fn fetch_page(&self, query: &FeedQuery) -> Result<FeedPage, FetchError> {
        (**self).fetch_page(query).await
    }
}

#[async_trait(?Send)]
impl<T: FeedSource + ?Sized> FeedSource for Arc<T> {
    async fn fetch_page(&self, query: &FeedQuery) -> Result<FeedPage, FetchError> {
        (**self).fetch_page(query).await
    }
}

/// Source of currency exchange rates.
#[async_trait(?Send)]
pub trait ExchangeRateSource {
    /// Units of `quote` per one unit of `base`.
    async fn rate(&self, base: Currency, quote: Currency) -> Result<f64, FetchError>;
}

#[async_trait(?Send)]
impl<T: ExchangeRateSource + ?Sized> ExchangeRateSource for Rc<T> {
    async fn rate(&self, base: Currency, quote: Currency) -> Result<f64, FetchError> {
        (**self).rate(base, quote).await
    }
}

#[async_trait(?Send)]
impl<T: ExchangeRateSource + ?Sized> ExchangeRateSource for Arc<T> {
    async fn rate(&self, base: Currency, quote: Currency) -> Result<f64, FetchError> {
        (**self).rate(base, quote).await
    }
}

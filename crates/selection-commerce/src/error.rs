//! Commerce error types.

use thiserror::Error;

use crate::ids::ProductId;

/// Errors raised while building or validating selection domain values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Target profit rate outside `[0, 1)`.
    #[error("Invalid target profit rate: {0}")]
    InvalidProfitRate(f64),

    /// Packing fee below zero.
    #[error("Invalid packing fee: {0}")]
    InvalidPackingFee(String),

    /// Exchange rate that is zero, negative or not finite.
    #[error("Invalid exchange rate: {0}")]
    InvalidExchangeRate(f64),

    /// Commission tier boundaries that do not increase.
    #[error("Invalid commission tiers: low max {low_max} must be below mid max {mid_max}")]
    InvalidTierBoundaries { low_max: i64, mid_max: i64 },

    /// Shipping brackets out of order or empty.
    #[error("Invalid shipping table: {0}")]
    InvalidShippingTable(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },
}

/// A feed page that breaks the cursor contract.
///
/// Returned ids must strictly exceed the request cursor and ascend.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedContractViolation {
    /// An id at or below the request cursor.
    #[error("Item {id} is not beyond cursor {cursor}")]
    NotBeyondCursor { id: ProductId, cursor: u64 },

    /// Ids not strictly ascending within the page.
    #[error("Item {id} does not follow {previous} in ascending order")]
    OutOfOrder { previous: ProductId, id: ProductId },
}

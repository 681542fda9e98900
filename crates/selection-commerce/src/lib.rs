//! Marketplace product, feed and pricing types for product selection.
//!
//! This crate provides the domain half of the selection workflow:
//!
//! - **Catalog**: the immutable `ProductItem` a feed returns, with its
//!   commission schedule
//! - **Search**: filter criteria, the cursor-based `FeedQuery` and the
//!   `FeedPage` answer, including cursor-contract validation
//! - **Pricing**: commission tiers, the injected shipping-cost table and the
//!   `ProfitabilityFilter`
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use selection_commerce::prelude::*;
//!
//! let item = ProductItem::new(ProductId::new(1), "Kettle", Money::new(10_000, Currency::CNY))
//!     .with_weight(200)
//!     .with_commission(CommissionRates::flat(10.0));
//!
//! let filter = ProfitabilityFilter::new(
//!     TierPolicy::default(),
//!     Arc::new(|_grams: u32| Money::new(1_500, Currency::CNY)),
//! );
//! let params = ProfitParameters::new(0.2, Money::new(200, Currency::CNY));
//!
//! assert_eq!(filter.is_profitable(&item, &params), Some(true));
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod pricing;
pub mod search;

pub use error::{CommerceError, FeedContractViolation};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, FeedContractViolation};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{CommissionRates, CommissionTier, ProductItem};

    // Search
    pub use crate::search::{Cursor, FeedPage, FeedQuery, Filter, FilterCriteria};

    // Pricing
    pub use crate::pricing::{
        BracketShippingTable, CostEstimate, ExchangeRate, ProfitParameters, ProfitVerdict,
        ProfitabilityFilter, ShippingBracket, ShippingCostTable, TierBoundaries, TierPolicy,
        TierResolution,
    };
}

//! Product catalog module.
//!
//! Contains the immutable candidate record delivered by the feed and its
//! marketplace commission schedule.

mod commission;
mod product;

pub use commission::{CommissionRates, CommissionTier};
pub use product::ProductItem;

//! Pricing module.
//!
//! Commission tiers, the injected shipping-cost table, exchange rates and
//! the profitability filter that decides which buffered candidates are
//! shown.

mod exchange;
mod profit;
mod shipping;
mod tiers;

pub use exchange::ExchangeRate;
pub use profit::{CostEstimate, ProfitParameters, ProfitVerdict, ProfitabilityFilter};
pub use shipping::{BracketShippingTable, ShippingBracket, ShippingCostTable};
pub use tiers::{TierBoundaries, TierPolicy, TierResolution};

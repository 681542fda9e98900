//! Profitability filter.
//!
//! Decides per candidate whether its price can cover marketplace
//! commission, shipping and packing while leaving the target margin. The
//! filter is pure: it reads the item and the parameters, and is re-run over
//! the whole buffer whenever a parameter changes.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{CommissionTier, ProductItem};
use crate::error::CommerceError;
use crate::money::{Currency, Money};
use crate::pricing::{ExchangeRate, ShippingCostTable, TierPolicy};

/// User-tunable inputs to the filter.
///
/// Changing them never resets the feed session; it only changes which
/// buffered items are shown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitParameters {
    /// Required margin as a fraction of the sale price, in `[0, 1)`.
    pub target_profit_rate: f64,
    /// Packing cost per parcel.
    pub packing_fee: Money,
    /// RUB per CNY, when the rate collaborator answered.
    pub exchange_rate: Option<f64>,
    /// When false every item is shown.
    pub estimation_enabled: bool,
}

impl ProfitParameters {
    pub fn new(target_profit_rate: f64, packing_fee: Money) -> Self {
        Self {
            target_profit_rate,
            packing_fee,
            exchange_rate: None,
            estimation_enabled: true,
        }
    }

    pub fn with_exchange_rate(mut self, rate: Option<f64>) -> Self {
        self.exchange_rate = rate;
        self
    }

    pub fn with_estimation(mut self, enabled: bool) -> Self {
        self.estimation_enabled = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), CommerceError> {
        let rate = self.target_profit_rate;
        if !rate.is_finite() || !(0.0..1.0).contains(&rate) {
            return Err(CommerceError::InvalidProfitRate(rate));
        }
        if self.packing_fee.is_negative() {
            return Err(CommerceError::InvalidPackingFee(self.packing_fee.display()));
        }
        if let Some(fx) = self.exchange_rate {
            ExchangeRate::new(Currency::CNY, Currency::RUB, fx)?;
        }
        Ok(())
    }
}

impl Default for ProfitParameters {
    fn default() -> Self {
        Self::new(0.2, Money::zero(Currency::CNY))
    }
}

/// Derived cost breakdown for one item under one parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Lower of current and competitor price.
    pub price: Money,
    /// `price` in RUB, when a rate was available.
    pub price_rub: Option<Money>,
    pub tier: CommissionTier,
    /// True when the tier came from the fallback policy.
    pub tier_fallback: bool,
    pub commission: Money,
    pub shipping: Money,
    pub packing_fee: Money,
    /// Most that can be paid for the goods while keeping the margin.
    pub max_allowable_cost: Money,
}

impl CostEstimate {
    pub fn is_profitable(&self) -> bool {
        !self.max_allowable_cost.is_negative()
    }
}

/// Result of evaluating one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ProfitVerdict {
    /// Estimation switched off; item shown.
    Disabled,
    /// Missing weight or price; item shown rather than discarded.
    InsufficientData,
    Profitable(CostEstimate),
    Unprofitable(CostEstimate),
}

impl ProfitVerdict {
    /// `Some(true)`/`Some(false)` for a decision, `None` for missing data.
    pub fn as_option(&self) -> Option<bool> {
        match self {
            ProfitVerdict::Disabled | ProfitVerdict::Profitable(_) => Some(true),
            ProfitVerdict::Unprofitable(_) => Some(false),
            ProfitVerdict::InsufficientData => None,
        }
    }

    /// Whether the item belongs in the rendered set.
    pub fn keeps(&self) -> bool {
        !matches!(self, ProfitVerdict::Unprofitable(_))
    }

    pub fn estimate(&self) -> Option<&CostEstimate> {
        match self {
            ProfitVerdict::Profitable(e) | ProfitVerdict::Unprofitable(e) => Some(e),
            _ => None,
        }
    }
}

/// Applies tier policy and the injected shipping table to candidates.
#[derive(Clone)]
pub struct ProfitabilityFilter {
    tiers: TierPolicy,
    shipping: Arc<dyn ShippingCostTable>,
}

impl fmt::Debug for ProfitabilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfitabilityFilter")
            .field("tiers", &self.tiers)
            .finish_non_exhaustive()
    }
}

impl ProfitabilityFilter {
    pub fn new(tiers: TierPolicy, shipping: Arc<dyn ShippingCostTable>) -> Self {
        Self { tiers, shipping }
    }

    pub fn tiers(&self) -> &TierPolicy {
        &self.tiers
    }

    /// Validate `params`, including that the packing fee is quoted in the
    /// shipping table's currency.
    pub fn validate_params(&self, params: &ProfitParameters) -> Result<(), CommerceError> {
        params.validate()?;
        let expected = self.shipping.currency();
        if params.packing_fee.currency != expected {
            return Err(CommerceError::CurrencyMismatch {
                expected: expected.code().to_string(),
                got: params.packing_fee.currency.code().to_string(),
            });
        }
        Ok(())
    }

    /// Evaluate one item.
    pub fn evaluate(&self, item: &ProductItem, params: &ProfitParameters) -> ProfitVerdict {
        if !params.estimation_enabled {
            return ProfitVerdict::Disabled;
        }

        let price = item.effective_price();
        let weight = match item.known_weight_grams() {
            Some(w) if price.is_positive() => w,
            _ => return ProfitVerdict::InsufficientData,
        };

        let resolution = self.tiers.resolve(price, params.exchange_rate);
        let commission = price.percentage(item.commission.percent_for(resolution.tier));
        let shipping = self.shipping.cost_for(weight);
        let retained = price.multiply_decimal(1.0 - params.target_profit_rate);

        let max_allowable_cost = retained
            .try_subtract(&commission)
            .and_then(|m| m.try_subtract(&params.packing_fee))
            .and_then(|m| m.try_subtract(&shipping));
        let Some(max_allowable_cost) = max_allowable_cost else {
            warn!(
                item = %item.id,
                price = %price.currency,
                shipping = %shipping.currency,
                packing = %params.packing_fee.currency,
                "currency mismatch in cost estimate"
            );
            return ProfitVerdict::InsufficientData;
        };

        let estimate = CostEstimate {
            price,
            price_rub: resolution.price_rub,
            tier: resolution.tier,
            tier_fallback: resolution.fallback,
            commission,
            shipping,
            packing_fee: params.packing_fee,
            max_allowable_cost,
        };

        if estimate.is_profitable() {
            ProfitVerdict::Profitable(estimate)
        } else {
            ProfitVerdict::Unprofitable(estimate)
        }
    }

    /// `Some(true)` to show, `Some(false)` to hide, `None` when data is
    /// missing (shown).
    pub fn is_profitable(&self, item: &ProductItem, params: &ProfitParameters) -> Option<bool> {
        self.evaluate(item, params).as_option()
    }

    /// Items of `items` that should be shown, in order.
    pub fn visible<'a>(
        &self,
        items: &'a [ProductItem],
        params: &ProfitParameters,
    ) -> Vec<&'a ProductItem> {
        items
            .iter()
            .filter(|item| self.evaluate(item, params).keeps())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CommissionRates;
    use crate::ids::ProductId;
    use crate::pricing::TierBoundaries;

    fn cny(major: i64) -> Money {
        Money::new(major * 100, Currency::CNY)
    }

    fn filter_with_shipping(cost: i64) -> ProfitabilityFilter {
        ProfitabilityFilter::new(
            TierPolicy::default(),
            Arc::new(move |_w: u32| cny(cost)),
        )
    }

    fn hundred_yuan_item() -> ProductItem {
        ProductItem::new(ProductId::new(1), "Kettle", cny(100))
            .with_weight(200)
            .with_commission(CommissionRates::new(10.0, 10.0, 10.0))
    }

    fn params() -> ProfitParameters {
        ProfitParameters::new(0.20, cny(2)).with_exchange_rate(Some(12.0))
    }

    #[test]
    fn test_profitable_example() {
        let verdict = filter_with_shipping(15).evaluate(&hundred_yuan_item(), &params());
        let estimate = verdict.estimate().copied().unwrap();
        assert_eq!(estimate.commission, cny(10));
        assert_eq!(estimate.max_allowable_cost, cny(53));
        assert_eq!(verdict.as_option(), Some(true));
    }

    #[test]
    fn test_unprofitable_example() {
        let verdict = filter_with_shipping(80).evaluate(&hundred_yuan_item(), &params());
        assert_eq!(verdict.estimate().unwrap().max_allowable_cost, cny(-12));
        assert_eq!(verdict.as_option(), Some(false));
        assert!(!verdict.keeps());
    }

    #[test]
    fn test_break_even_is_profitable() {
        // 80 - 10 - 2 - 68 = 0
        let verdict = filter_with_shipping(68).evaluate(&hundred_yuan_item(), &params());
        assert_eq!(verdict.as_option(), Some(true));
    }

    #[test]
    fn test_zero_weight_is_kept() {
        let item = hundred_yuan_item().with_weight(0);
        let f = filter_with_shipping(1_000);
        assert_eq!(f.is_profitable(&item, &params()), None);
        assert!(f.evaluate(&item, &params()).keeps());
    }

    #[test]
    fn test_missing_weight_and_zero_price_are_kept() {
        let f = filter_with_shipping(1_000);
        let mut item = hundred_yuan_item();
        item.package_weight_grams = None;
        assert_eq!(f.is_profitable(&item, &params()), None);

        let free = ProductItem::new(ProductId::new(2), "Sticker", cny(0)).with_weight(10);
        assert_eq!(f.is_profitable(&free, &params()), None);
    }

    #[test]
    fn test_disabled_shows_everything() {
        let f = filter_with_shipping(1_000);
        let p = params().with_estimation(false);
        assert_eq!(f.evaluate(&hundred_yuan_item(), &p), ProfitVerdict::Disabled);
        assert_eq!(f.is_profitable(&hundred_yuan_item(), &p), Some(true));
    }

    #[test]
    fn test_competitor_price_used_when_lower() {
        let item = hundred_yuan_item().with_competitor_price(cny(50));
        let estimate = *filter_with_shipping(15)
            .evaluate(&item, &params())
            .estimate()
            .unwrap();
        // 50*0.8 - 5 - 2 - 15 = 18
        assert_eq!(estimate.price, cny(50));
        assert_eq!(estimate.max_allowable_cost, cny(18));
    }

    #[test]
    fn test_tier_selects_commission() {
        let item = ProductItem::new(ProductId::new(3), "Blender", cny(500))
            .with_weight(900)
            .with_commission(CommissionRates::new(5.0, 10.0, 20.0));
        let f = filter_with_shipping(0);

        // 500 CNY * 12 = 6000 RUB -> high tier, 20%
        let e = *f.evaluate(&item, &params()).estimate().unwrap();
        assert_eq!(e.tier, CommissionTier::High);
        assert_eq!(e.commission, cny(100));

        // 500 CNY * 2 = 1000 RUB -> low tier, 5%
        let e = *f
            .evaluate(&item, &params().with_exchange_rate(Some(2.0)))
            .estimate()
            .unwrap();
        assert_eq!(e.tier, CommissionTier::Low);
        assert_eq!(e.commission, cny(25));
    }

    #[test]
    fn test_missing_rate_uses_fallback_tier() {
        let item = ProductItem::new(ProductId::new(3), "Blender", cny(500))
            .with_weight(900)
            .with_commission(CommissionRates::new(5.0, 10.0, 20.0));
        let f = ProfitabilityFilter::new(
            TierPolicy::new(TierBoundaries::default(), CommissionTier::Mid),
            Arc::new(|_w: u32| cny(0)),
        );
        let verdict = f.evaluate(&item, &params().with_exchange_rate(None));
        let e = verdict.estimate().unwrap();
        assert_eq!(e.tier, CommissionTier::Mid);
        assert!(e.tier_fallback);
        assert!(verdict.keeps());
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let f = filter_with_shipping(40);
        let items = vec![
            hundred_yuan_item(),
            ProductItem::new(ProductId::new(2), "Pan", cny(30)).with_weight(800),
            ProductItem::new(ProductId::new(3), "Mug", cny(60)),
        ];
        let first: Vec<ProductId> = f.visible(&items, &params()).iter().map(|i| i.id).collect();
        let second: Vec<ProductId> = f.visible(&items, &params()).iter().map(|i| i.id).collect();
        assert_eq!(first, second);
        assert_eq!(
            f.evaluate(&items[0], &params()),
            f.evaluate(&items[0], &params())
        );
        // Pan: 24 - 0 - 2 - 40 < 0 is hidden; Mug has no weight and stays.
        assert_eq!(first, vec![ProductId::new(1), ProductId::new(3)]);
    }

    #[test]
    fn test_packing_fee_currency_must_match_shipping() {
        let f = filter_with_shipping(15);
        assert!(f.validate_params(&params()).is_ok());

        let rub_fee = ProfitParameters::new(0.2, Money::new(200, Currency::RUB));
        assert_eq!(
            f.validate_params(&rub_fee),
            Err(CommerceError::CurrencyMismatch {
                expected: "CNY".to_string(),
                got: "RUB".to_string(),
            })
        );
        // Evaluating anyway yields no estimate rather than a wrong one.
        assert_eq!(
            f.evaluate(&hundred_yuan_item(), &rub_fee),
            ProfitVerdict::InsufficientData
        );
    }

    #[test]
    fn test_parameter_validation() {
        assert!(ProfitParameters::default().validate().is_ok());
        assert!(ProfitParameters::new(1.0, cny(0)).validate().is_err());
        assert!(ProfitParameters::new(-0.1, cny(0)).validate().is_err());
        assert!(ProfitParameters::new(0.1, cny(-1)).validate().is_err());
        assert!(ProfitParameters::default()
            .with_exchange_rate(Some(0.0))
            .validate()
            .is_err());
    }
}

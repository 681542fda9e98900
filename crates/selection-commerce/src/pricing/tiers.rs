//! Commission tier resolution.

use crate::catalog::CommissionTier;
use crate::error::CommerceError;
use crate::money::{Currency, Money};
use crate::pricing::ExchangeRate;
use serde::{Deserialize, Serialize};

/// Upper bounds (inclusive) of the low and mid RUB price bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBoundaries {
    /// Highest RUB price in the low tier.
    pub low_max: Money,
    /// Highest RUB price in the mid tier.
    pub mid_max: Money,
}

impl TierBoundaries {
    /// Boundaries from whole-ruble amounts.
    pub fn from_rubles(low_max: i64, mid_max: i64) -> Result<Self, CommerceError> {
        let boundaries = Self {
            low_max: Money::new(low_max * 100, Currency::RUB),
            mid_max: Money::new(mid_max * 100, Currency::RUB),
        };
        boundaries.validate()?;
        Ok(boundaries)
    }

    pub fn validate(&self) -> Result<(), CommerceError> {
        let ordered = self.low_max.currency == self.mid_max.currency
            && self.low_max.is_positive()
            && self.low_max.amount_minor < self.mid_max.amount_minor;
        if !ordered {
            return Err(CommerceError::InvalidTierBoundaries {
                low_max: self.low_max.amount_minor / 100,
                mid_max: self.mid_max.amount_minor / 100,
            });
        }
        Ok(())
    }

    /// Tier for a RUB price.
    pub fn tier_for(&self, price_rub: Money) -> CommissionTier {
        if price_rub.amount_minor <= self.low_max.amount_minor {
            CommissionTier::Low
        } else if price_rub.amount_minor <= self.mid_max.amount_minor {
            CommissionTier::Mid
        } else {
            CommissionTier::High
        }
    }
}

impl Default for TierBoundaries {
    fn default() -> Self {
        Self {
            low_max: Money::new(150_000, Currency::RUB),
            mid_max: Money::new(500_000, Currency::RUB),
        }
    }
}

/// Outcome of picking a tier for one price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierResolution {
    pub tier: CommissionTier,
    /// The RUB price the tier was read from, when a rate was available.
    pub price_rub: Option<Money>,
    /// True when the fallback tier stood in for a missing rate.
    pub fallback: bool,
}

/// Boundaries plus the tier to assume when no exchange rate is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TierPolicy {
    pub boundaries: TierBoundaries,
    pub fallback: CommissionTier,
}

impl TierPolicy {
    pub fn new(boundaries: TierBoundaries, fallback: CommissionTier) -> Self {
        Self {
            boundaries,
            fallback,
        }
    }

    /// Resolve the tier of a source-currency price at `exchange_rate` RUB
    /// per source unit.
    pub fn resolve(&self, price: Money, exchange_rate: Option<f64>) -> TierResolution {
        let price_rub = exchange_rate
            .and_then(|rate| ExchangeRate::new(price.currency, Currency::RUB, rate).ok())
            .and_then(|rate| rate.convert(price).ok());
        match price_rub {
            Some(price_rub) => TierResolution {
                tier: self.boundaries.tier_for(price_rub),
                price_rub: Some(price_rub),
                fallback: false,
            },
            None => TierResolution {
                tier: self.fallback,
                price_rub: None,
                fallback: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rub(whole: i64) -> Money {
        Money::new(whole * 100, Currency::RUB)
    }

    #[test]
    fn test_tier_boundaries_are_inclusive() {
        let b = TierBoundaries::default();
        assert_eq!(b.tier_for(rub(1500)), CommissionTier::Low);
        assert_eq!(b.tier_for(Money::new(150_001, Currency::RUB)), CommissionTier::Mid);
        assert_eq!(b.tier_for(rub(5000)), CommissionTier::Mid);
        assert_eq!(b.tier_for(rub(5001)), CommissionTier::High);
    }

    #[test]
    fn test_invalid_boundaries() {
        assert!(TierBoundaries::from_rubles(5000, 1500).is_err());
        assert!(TierBoundaries::from_rubles(0, 1500).is_err());
        assert!(TierBoundaries::from_rubles(1000, 4000).is_ok());
    }

    #[test]
    fn test_resolve_with_rate() {
        let policy = TierPolicy::default();
        // 100 CNY at 12 RUB = 1200 RUB
        let r = policy.resolve(Money::new(10000, Currency::CNY), Some(12.0));
        assert_eq!(r.tier, CommissionTier::Low);
        assert_eq!(r.price_rub, Some(rub(1200)));
        assert!(!r.fallback);

        // 500 CNY at 12 RUB = 6000 RUB
        let r = policy.resolve(Money::new(50000, Currency::CNY), Some(12.0));
        assert_eq!(r.tier, CommissionTier::High);
    }

    #[test]
    fn test_resolve_without_rate_uses_fallback() {
        let policy = TierPolicy::new(TierBoundaries::default(), CommissionTier::High);
        let r = policy.resolve(Money::new(100, Currency::CNY), None);
        assert_eq!(r.tier, CommissionTier::High);
        assert!(r.fallback);
        assert!(r.price_rub.is_none());

        let r = policy.resolve(Money::new(100, Currency::CNY), Some(0.0));
        assert!(r.fallback);

        let r = policy.resolve(Money::new(100, Currency::CNY), Some(f64::NAN));
        assert!(r.fallback);
    }
}

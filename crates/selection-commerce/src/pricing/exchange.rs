//! Exchange rates.

use crate::error::CommerceError;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Quote units per one base unit, e.g. RUB per CNY.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub base: Currency,
    pub quote: Currency,
    pub rate: f64,
}

impl ExchangeRate {
    /// Create a rate, rejecting zero, negative and non-finite values.
    pub fn new(base: Currency, quote: Currency, rate: f64) -> Result<Self, CommerceError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(CommerceError::InvalidExchangeRate(rate));
        }
        Ok(Self { base, quote, rate })
    }

    /// Convert an amount in the base currency.
    pub fn convert(&self, amount: Money) -> Result<Money, CommerceError> {
        if amount.currency != self.base {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.base.code().to_string(),
                got: amount.currency.code().to_string(),
            });
        }
        Ok(amount.convert(self.rate, self.quote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_rate() {
        assert!(ExchangeRate::new(Currency::CNY, Currency::RUB, 0.0).is_err());
        assert!(ExchangeRate::new(Currency::CNY, Currency::RUB, -3.0).is_err());
        assert!(ExchangeRate::new(Currency::CNY, Currency::RUB, f64::NAN).is_err());
    }

    #[test]
    fn test_convert() {
        let rate = ExchangeRate::new(Currency::CNY, Currency::RUB, 12.0).unwrap();
        let rub = rate.convert(Money::new(10000, Currency::CNY)).unwrap();
        assert_eq!(rub, Money::new(120_000, Currency::RUB));
        assert!(rate.convert(Money::new(1, Currency::USD)).is_err());
    }
}

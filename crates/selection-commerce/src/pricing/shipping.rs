//! Shipping-cost collaborator.
//!
//! The production weight table is external configuration; this module only
//! defines the seam and a bracket-based table that can be loaded from it.

use crate::error::CommerceError;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maps a packed weight to a shipping cost.
///
/// Implementations must be monotonic non-decreasing in weight.
pub trait ShippingCostTable: Send + Sync {
    fn cost_for(&self, weight_grams: u32) -> Money;

    /// Currency every cost is quoted in.
    fn currency(&self) -> Currency {
        self.cost_for(0).currency
    }
}

impl<F> ShippingCostTable for F
where
    F: Fn(u32) -> Money + Send + Sync,
{
    fn cost_for(&self, weight_grams: u32) -> Money {
        self(weight_grams)
    }
}

/// Flat cost for every parcel up to `max_weight_grams`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingBracket {
    pub max_weight_grams: u32,
    pub cost: Money,
}

/// Weight brackets with a per-kilogram surcharge past the last bracket.
///
/// Deserialization goes through [`BracketShippingTable::new`], so a decoded
/// table is never empty or out of order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBracketTable")]
pub struct BracketShippingTable {
    brackets: Vec<ShippingBracket>,
    per_extra_kg: Money,
}

#[derive(Deserialize)]
struct RawBracketTable {
    brackets: Vec<ShippingBracket>,
    per_extra_kg: Money,
}

impl TryFrom<RawBracketTable> for BracketShippingTable {
    type Error = CommerceError;

    fn try_from(raw: RawBracketTable) -> Result<Self, Self::Error> {
        Self::new(raw.brackets, raw.per_extra_kg)
    }
}

impl BracketShippingTable {
    /// Build a table, checking it is non-empty, ordered and monotonic.
    pub fn new(
        brackets: Vec<ShippingBracket>,
        per_extra_kg: Money,
    ) -> Result<Self, CommerceError> {
        let first = brackets
            .first()
            .ok_or_else(|| CommerceError::InvalidShippingTable("no brackets".to_string()))?;
        let currency = first.cost.currency;

        for pair in brackets.windows(2) {
            if pair[1].max_weight_grams <= pair[0].max_weight_grams {
                return Err(CommerceError::InvalidShippingTable(format!(
                    "bracket {}g does not follow {}g",
                    pair[1].max_weight_grams, pair[0].max_weight_grams
                )));
            }
            if pair[1].cost.amount_minor < pair[0].cost.amount_minor {
                return Err(CommerceError::InvalidShippingTable(format!(
                    "cost drops at {}g",
                    pair[1].max_weight_grams
                )));
            }
        }
        if let Some(b) = brackets.iter().find(|b| b.cost.currency != currency) {
            return Err(CommerceError::CurrencyMismatch {
                expected: currency.code().to_string(),
                got: b.cost.currency.code().to_string(),
            });
        }
        if per_extra_kg.currency != currency || per_extra_kg.is_negative() {
            return Err(CommerceError::InvalidShippingTable(format!(
                "surcharge {} invalid for {} brackets",
                per_extra_kg, currency
            )));
        }

        Ok(Self {
            brackets,
            per_extra_kg,
        })
    }

    pub fn brackets(&self) -> &[ShippingBracket] {
        &self.brackets
    }
}

impl ShippingCostTable for BracketShippingTable {
    fn cost_for(&self, weight_grams: u32) -> Money {
        if let Some(bracket) = self
            .brackets
            .iter()
            .find(|b| weight_grams <= b.max_weight_grams)
        {
            return bracket.cost;
        }

        let Some(last) = self.brackets.last() else {
            return Money::zero(self.per_extra_kg.currency);
        };
        let extra_grams = u64::from(weight_grams - last.max_weight_grams);
        let extra_kg = extra_grams.div_ceil(1000) as i64;
        Money::new(
            last.cost.amount_minor + extra_kg * self.per_extra_kg.amount_minor,
            last.cost.currency,
        )
    }

    fn currency(&self) -> Currency {
        self.per_extra_kg.currency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cny(major: i64) -> Money {
        Money::new(major * 100, Currency::CNY)
    }

    fn table() -> BracketShippingTable {
        BracketShippingTable::new(
            vec![
                ShippingBracket { max_weight_grams: 100, cost: cny(8) },
                ShippingBracket { max_weight_grams: 500, cost: cny(15) },
                ShippingBracket { max_weight_grams: 2000, cost: cny(40) },
            ],
            cny(20),
        )
        .unwrap()
    }

    #[test]
    fn test_bracket_lookup() {
        let t = table();
        assert_eq!(t.cost_for(1), cny(8));
        assert_eq!(t.cost_for(100), cny(8));
        assert_eq!(t.cost_for(101), cny(15));
        assert_eq!(t.cost_for(2000), cny(40));
    }

    #[test]
    fn test_surcharge_past_last_bracket() {
        let t = table();
        assert_eq!(t.cost_for(2001), cny(60));
        assert_eq!(t.cost_for(3000), cny(60));
        assert_eq!(t.cost_for(3001), cny(80));
    }

    #[test]
    fn test_table_is_monotonic() {
        let t = table();
        let mut last = 0;
        for w in (0..6000).step_by(37) {
            let cost = t.cost_for(w).amount_minor;
            assert!(cost >= last, "cost dropped at {}g", w);
            last = cost;
        }
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert!(BracketShippingTable::new(vec![], cny(1)).is_err());

        let unordered = vec![
            ShippingBracket { max_weight_grams: 500, cost: cny(15) },
            ShippingBracket { max_weight_grams: 100, cost: cny(20) },
        ];
        assert!(BracketShippingTable::new(unordered, cny(1)).is_err());

        let cheaper = vec![
            ShippingBracket { max_weight_grams: 100, cost: cny(15) },
            ShippingBracket { max_weight_grams: 500, cost: cny(10) },
        ];
        assert!(BracketShippingTable::new(cheaper, cny(1)).is_err());
    }

    #[test]
    fn test_decoding_checks_brackets() {
        let empty = r#"{"brackets":[],"per_extra_kg":{"amount_minor":100,"currency":"CNY"}}"#;
        assert!(serde_json::from_str::<BracketShippingTable>(empty).is_err());

        let unordered = r#"{
            "brackets": [
                {"max_weight_grams": 500, "cost": {"amount_minor": 1500, "currency": "CNY"}},
                {"max_weight_grams": 100, "cost": {"amount_minor": 2000, "currency": "CNY"}}
            ],
            "per_extra_kg": {"amount_minor": 100, "currency": "CNY"}
        }"#;
        assert!(serde_json::from_str::<BracketShippingTable>(unordered).is_err());

        let json = serde_json::to_string(&table()).unwrap();
        let decoded: BracketShippingTable = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, table());
        assert_eq!(decoded.cost_for(2500), cny(60));
    }

    #[test]
    fn test_closure_table() {
        let flat = |_w: u32| cny(15);
        assert_eq!(flat.cost_for(200), cny(15));
        assert_eq!(flat.currency(), Currency::CNY);
        assert_eq!(table().currency(), Currency::CNY);
    }
}

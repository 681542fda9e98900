//! Candidate product record.

use crate::catalog::CommissionRates;
use crate::ids::{CategoryId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A marketplace candidate as delivered by the selection feed.
///
/// Created from a feed response and never mutated afterwards; the whole
/// record is dropped when the search session resets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductItem {
    /// Server-assigned id, strictly increasing along the feed.
    pub id: ProductId,
    /// Listing title.
    pub title: String,
    /// Current source price (CNY).
    pub current_price: Money,
    /// Lowest competing price, when a competitor lookup found one.
    #[serde(default)]
    pub competitor_min_price: Option<Money>,
    /// Packed weight in grams.
    #[serde(default)]
    pub package_weight_grams: Option<u32>,
    /// Commission percentages per RUB price tier.
    #[serde(default)]
    pub commission: CommissionRates,
    /// Marketplace category.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Brand name.
    #[serde(default)]
    pub brand: Option<String>,
    /// Primary image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Source listing URL.
    #[serde(default)]
    pub source_url: Option<String>,
    /// Sales in the last 30 days.
    #[serde(default)]
    pub monthly_sales: Option<u32>,
}

impl ProductItem {
    /// Create a candidate with only the fields pricing needs.
    pub fn new(id: ProductId, title: impl Into<String>, current_price: Money) -> Self {
        Self {
            id,
            title: title.into(),
            current_price,
            competitor_min_price: None,
            package_weight_grams: None,
            commission: CommissionRates::default(),
            category_id: None,
            brand: None,
            image_url: None,
            source_url: None,
            monthly_sales: None,
        }
    }

    pub fn with_competitor_price(mut self, price: Money) -> Self {
        self.competitor_min_price = Some(price);
        self
    }

    pub fn with_weight(mut self, grams: u32) -> Self {
        self.package_weight_grams = Some(grams);
        self
    }

    pub fn with_commission(mut self, rates: CommissionRates) -> Self {
        self.commission = rates;
        self
    }

    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category_id = Some(category);
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// The price a listing would have to match: the lower of the current
    /// price and the cheapest competitor.
    ///
    /// A competitor price in another currency is ignored.
    pub fn effective_price(&self) -> Money {
        match self.competitor_min_price {
            Some(competitor) if competitor.currency == self.current_price.currency => {
                if competitor.amount_minor < self.current_price.amount_minor {
                    competitor
                } else {
                    self.current_price
                }
            }
            _ => self.current_price,
        }
    }

    /// Weight usable for shipping estimation, if known and non-zero.
    pub fn known_weight_grams(&self) -> Option<u32> {
        self.package_weight_grams.filter(|w| *w > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn cny(minor: i64) -> Money {
        Money::new(minor, Currency::CNY)
    }

    #[test]
    fn test_effective_price_prefers_cheaper_competitor() {
        let item = ProductItem::new(ProductId::new(1), "Lamp", cny(12000))
            .with_competitor_price(cny(9900));
        assert_eq!(item.effective_price(), cny(9900));
    }

    #[test]
    fn test_effective_price_keeps_current_when_competitor_higher() {
        let item = ProductItem::new(ProductId::new(1), "Lamp", cny(12000))
            .with_competitor_price(cny(15000));
        assert_eq!(item.effective_price(), cny(12000));
    }

    #[test]
    fn test_effective_price_without_competitor() {
        let item = ProductItem::new(ProductId::new(1), "Lamp", cny(12000));
        assert_eq!(item.effective_price(), cny(12000));
    }

    #[test]
    fn test_known_weight_ignores_zero() {
        let item = ProductItem::new(ProductId::new(1), "Lamp", cny(100)).with_weight(0);
        assert_eq!(item.known_weight_grams(), None);
        let item = item.with_weight(250);
        assert_eq!(item.known_weight_grams(), Some(250));
    }

    #[test]
    fn test_deserialize_minimal_fixture() {
        let json = r#"{
            "id": 17,
            "title": "Desk fan",
            "current_price": { "amount_minor": 4500, "currency": "CNY" }
        }"#;
        let item: ProductItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, ProductId::new(17));
        assert!(item.package_weight_grams.is_none());
        assert_eq!(item.commission, CommissionRates::default());
    }
}

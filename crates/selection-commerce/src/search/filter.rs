//! Search filter types.

use crate::catalog::ProductItem;
use crate::ids::CategoryId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A single feed filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    /// Case-insensitive substring of the title.
    Keyword { text: String },
    /// Filter by single category.
    Category { id: CategoryId },
    /// Filter by multiple categories (OR).
    Categories { ids: Vec<CategoryId> },
    /// Filter by current price range (inclusive).
    PriceRange {
        min: Option<Money>,
        max: Option<Money>,
    },
    /// Packed weight at most this many grams.
    MaxWeight { grams: u32 },
    /// Exact brand match, case-insensitive.
    Brand { name: String },
    /// At least this many sales in the last 30 days.
    MinMonthlySales { count: u32 },
}

impl Filter {
    pub fn keyword(text: impl Into<String>) -> Self {
        Filter::Keyword { text: text.into() }
    }

    pub fn category(id: CategoryId) -> Self {
        Filter::Category { id }
    }

    pub fn price_range(min: Option<Money>, max: Option<Money>) -> Self {
        Filter::PriceRange { min, max }
    }

    pub fn max_weight(grams: u32) -> Self {
        Filter::MaxWeight { grams }
    }

    pub fn brand(name: impl Into<String>) -> Self {
        Filter::Brand { name: name.into() }
    }

    /// Check whether an item satisfies this filter.
    ///
    /// Items missing the filtered attribute never match.
    pub fn matches(&self, item: &ProductItem) -> bool {
        match self {
            Filter::Keyword { text } => item
                .title
                .to_lowercase()
                .contains(&text.trim().to_lowercase()),
            Filter::Category { id } => item.category_id == Some(*id),
            Filter::Categories { ids } => item
                .category_id
                .map(|c| ids.contains(&c))
                .unwrap_or(false),
            Filter::PriceRange { min, max } => {
                let price = item.current_price;
                let above_min = min
                    .map(|m| m.currency == price.currency && price.amount_minor >= m.amount_minor)
                    .unwrap_or(true);
                let below_max = max
                    .map(|m| m.currency == price.currency && price.amount_minor <= m.amount_minor)
                    .unwrap_or(true);
                above_min && below_max
            }
            Filter::MaxWeight { grams } => item
                .package_weight_grams
                .map(|w| w <= *grams)
                .unwrap_or(false),
            Filter::Brand { name } => item
                .brand
                .as_deref()
                .map(|b| b.eq_ignore_ascii_case(name))
                .unwrap_or(false),
            Filter::MinMonthlySales { count } => {
                item.monthly_sales.map(|s| s >= *count).unwrap_or(false)
            }
        }
    }
}

/// The full set of filters for one search session.
///
/// Any change to the criteria starts a new session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    /// Filters combined with AND.
    #[serde(default)]
    pub filters: Vec<Filter>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add a keyword filter; blank keywords are ignored.
    pub fn with_keyword(self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            return self;
        }
        self.with_filter(Filter::keyword(text))
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Check whether an item satisfies every filter.
    pub fn matches(&self, item: &ProductItem) -> bool {
        self.filters.iter().all(|f| f.matches(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ProductId;
    use crate::money::Currency;

    fn item() -> ProductItem {
        ProductItem::new(ProductId::new(1), "Folding Camp Chair", Money::new(8800, Currency::CNY))
            .with_category(CategoryId::new(7))
            .with_brand("Naturehike")
            .with_weight(1200)
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        assert!(Filter::keyword("camp chair").matches(&item()));
        assert!(!Filter::keyword("tent").matches(&item()));
    }

    #[test]
    fn test_price_range() {
        let f = Filter::price_range(
            Some(Money::new(5000, Currency::CNY)),
            Some(Money::new(9000, Currency::CNY)),
        );
        assert!(f.matches(&item()));

        let f = Filter::price_range(None, Some(Money::new(8000, Currency::CNY)));
        assert!(!f.matches(&item()));
    }

    #[test]
    fn test_missing_attribute_never_matches() {
        let bare = ProductItem::new(ProductId::new(2), "Thing", Money::new(100, Currency::CNY));
        assert!(!Filter::max_weight(5000).matches(&bare));
        assert!(!Filter::brand("Naturehike").matches(&bare));
        assert!(!Filter::category(CategoryId::new(7)).matches(&bare));
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let criteria = FilterCriteria::new()
            .with_keyword("chair")
            .with_filter(Filter::category(CategoryId::new(7)))
            .with_filter(Filter::max_weight(1000));
        assert!(!criteria.matches(&item()));

        let criteria = FilterCriteria::new()
            .with_keyword("chair")
            .with_filter(Filter::brand("naturehike"));
        assert!(criteria.matches(&item()));
    }

    #[test]
    fn test_blank_keyword_ignored() {
        let criteria = FilterCriteria::new().with_keyword("   ");
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_criteria_json_shape() {
        let criteria = FilterCriteria::new().with_filter(Filter::max_weight(500));
        let json = serde_json::to_string(&criteria).unwrap();
        assert_eq!(json, r#"{"filters":[{"type":"max_weight","grams":500}]}"#);
    }
}

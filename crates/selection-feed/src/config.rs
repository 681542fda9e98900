//! Loader configuration.
//!
//! Every section has defaults, so an empty file is a valid configuration.
//! Shipping brackets shipped as defaults are illustrative; production tables
//! belong in the operator's config file.

use std::path::Path;
use std::time::Duration;

use selection_commerce::prelude::*;
use serde::{Deserialize, Serialize};

/// Errors loading or validating a [`LoaderConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to serialize TOML config: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Invalid pricing config: {0}")]
    Pricing(#[from] CommerceError),
}

/// Top-level loader configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub scroll: ScrollConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub profit: ProfitConfig,
}

impl LoaderConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config = if is_json(path) {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Save config to a file, format chosen by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            self.to_toml_string()?
        };
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every section, including that the pricing tables can be built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        self.scroll.validate()?;
        self.pricing
            .profitability_filter()?
            .validate_params(&self.profit.parameters())?;
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Grid geometry and page-size caps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of one product card, in pixels.
    pub item_width_px: f64,
    /// Horizontal gap between cards.
    pub gap_px: f64,
    /// Width reserved for the expanded side panel.
    pub side_panel_width_px: f64,
    /// Width reserved for the collapsed side panel.
    pub collapsed_side_panel_width_px: f64,
    /// Rows requested by the first page of a session.
    pub initial_rows: usize,
    /// Rows requested by each subsequent page.
    pub load_more_rows: usize,
    /// Largest page the feed will serve.
    pub server_max_page_size: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            item_width_px: 240.0,
            gap_px: 0.0,
            side_panel_width_px: 320.0,
            collapsed_side_panel_width_px: 64.0,
            initial_rows: 4,
            load_more_rows: 2,
            server_max_page_size: 50,
        }
    }
}

impl LayoutConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.item_width_px.is_finite() && self.item_width_px > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "layout.item_width_px must be positive, got {}",
                self.item_width_px
            )));
        }
        let widths = [
            ("gap_px", self.gap_px),
            ("side_panel_width_px", self.side_panel_width_px),
            ("collapsed_side_panel_width_px", self.collapsed_side_panel_width_px),
        ];
        for (name, value) in widths {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "layout.{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        if self.initial_rows == 0 || self.load_more_rows == 0 {
            return Err(ConfigError::Invalid(
                "layout rows must be at least 1".to_string(),
            ));
        }
        // load-more pages are capped at half the server maximum
        if self.server_max_page_size < 2 {
            return Err(ConfigError::Invalid(format!(
                "layout.server_max_page_size must be at least 2, got {}",
                self.server_max_page_size
            )));
        }
        Ok(())
    }
}

/// Scroll trigger tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Scroll progress past which the next page is requested.
    pub threshold: f64,
    /// Quiet period before a scroll burst is evaluated.
    pub debounce_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            debounce_ms: 200,
        }
    }
}

impl ScrollConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "scroll.threshold must be in (0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Feed call settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Deadline for a single page fetch. Absent means no deadline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl FetchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// One shipping bracket, cost in CNY major units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BracketConfig {
    pub max_weight_grams: u32,
    pub cost: f64,
}

/// Commission tier boundaries and the shipping table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Highest RUB price in the low tier.
    pub low_tier_max_rub: i64,
    /// Highest RUB price in the mid tier.
    pub mid_tier_max_rub: i64,
    /// Tier used when no exchange rate is available.
    pub fallback_tier: CommissionTier,
    pub shipping_brackets: Vec<BracketConfig>,
    /// CNY per started kilogram past the last bracket.
    pub shipping_per_extra_kg: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            low_tier_max_rub: 1500,
            mid_tier_max_rub: 5000,
            fallback_tier: CommissionTier::Mid,
            shipping_brackets: vec![
                BracketConfig { max_weight_grams: 100, cost: 8.0 },
                BracketConfig { max_weight_grams: 500, cost: 15.0 },
                BracketConfig { max_weight_grams: 1000, cost: 25.0 },
                BracketConfig { max_weight_grams: 2000, cost: 40.0 },
            ],
            shipping_per_extra_kg: 18.0,
        }
    }
}

impl PricingConfig {
    pub fn tier_policy(&self) -> Result<TierPolicy, CommerceError> {
        let boundaries = TierBoundaries::from_rubles(self.low_tier_max_rub, self.mid_tier_max_rub)?;
        Ok(TierPolicy::new(boundaries, self.fallback_tier))
    }

    pub fn shipping_table(&self) -> Result<BracketShippingTable, CommerceError> {
        let brackets = self
            .shipping_brackets
            .iter()
            .map(|b| ShippingBracket {
                max_weight_grams: b.max_weight_grams,
                cost: Money::from_decimal(b.cost, Currency::CNY),
            })
            .collect();
        BracketShippingTable::new(
            brackets,
            Money::from_decimal(self.shipping_per_extra_kg, Currency::CNY),
        )
    }

    /// Profitability filter built from this table and these tiers.
    pub fn profitability_filter(&self) -> Result<ProfitabilityFilter, CommerceError> {
        Ok(ProfitabilityFilter::new(
            self.tier_policy()?,
            std::sync::Arc::new(self.shipping_table()?),
        ))
    }
}

/// Starting profit parameters; the user adjusts them at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfitConfig {
    pub target_profit_rate: f64,
    /// CNY major units.
    pub packing_fee: f64,
    pub estimation_enabled: bool,
}

impl Default for ProfitConfig {
    fn default() -> Self {
        Self {
            target_profit_rate: 0.2,
            packing_fee: 0.0,
            estimation_enabled: true,
        }
    }
}

impl ProfitConfig {
    pub fn parameters(&self) -> ProfitParameters {
        ProfitParameters::new(
            self.target_profit_rate,
            Money::from_decimal(self.packing_fee, Currency::CNY),
        )
        .with_estimation(self.estimation_enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = LoaderConfig::from_toml_str("").unwrap();
        assert_eq!(config, LoaderConfig::default());
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_toml() {
        let config = LoaderConfig::from_toml_str(
            r#"
            [layout]
            item_width_px = 200.0

            [fetch]
            timeout_ms = 1500

            [pricing]
            fallback_tier = "high"
            "#,
        )
        .unwrap();

        assert_eq!(config.layout.item_width_px, 200.0);
        assert_eq!(config.layout.initial_rows, 4);
        assert_eq!(config.fetch.timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.pricing.fallback_tier, CommissionTier::High);
        assert_eq!(config.scroll.debounce(), Duration::from_millis(200));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = LoaderConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(LoaderConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_json_config() {
        let config =
            LoaderConfig::from_json_str(r#"{"scroll": {"threshold": 0.9}}"#).unwrap();
        assert_eq!(config.scroll.threshold, 0.9);
        assert_eq!(config.scroll.debounce_ms, 200);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = LoaderConfig::default();
        config.layout.item_width_px = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = LoaderConfig::default();
        config.scroll.threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = LoaderConfig::default();
        config.layout.server_max_page_size = 1;
        assert!(config.validate().is_err());

        let mut config = LoaderConfig::default();
        config.pricing.low_tier_max_rub = 6000;
        assert!(matches!(config.validate(), Err(ConfigError::Pricing(_))));

        let mut config = LoaderConfig::default();
        config.pricing.shipping_brackets.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Pricing(_))));

        let mut config = LoaderConfig::default();
        config.profit.target_profit_rate = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Pricing(_))));
    }

    #[test]
    fn test_pricing_builders() {
        let pricing = PricingConfig::default();
        let table = pricing.shipping_table().unwrap();
        assert_eq!(table.cost_for(200), Money::new(1_500, Currency::CNY));

        let policy = pricing.tier_policy().unwrap();
        assert_eq!(policy.fallback, CommissionTier::Mid);

        let params = ProfitConfig::default().parameters();
        assert_eq!(params.target_profit_rate, 0.2);
        assert!(params.packing_fee.is_zero());
        assert!(params.exchange_rate.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = LoaderConfig::load("/nonexistent/selection.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

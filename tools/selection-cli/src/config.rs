//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use selection_feed::LoaderConfig;
use serde::{Deserialize, Serialize};

/// Names searched for when no `--config` is given, in order.
pub const CONFIG_NAMES: [&str; 3] = ["selection.toml", ".selection.toml", "selection.json"];

/// CLI configuration file: the loader sections plus simulation defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(flatten)]
    pub loader: LoaderConfig,

    /// Simulated screen used by `simulate`.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?
        };
        Ok(config)
    }

    /// Serialize in the format matching `path`.
    pub fn render(&self, path: &Path) -> Result<String> {
        if path.extension().is_some_and(|ext| ext == "json") {
            Ok(serde_json::to_string_pretty(self)?)
        } else {
            Ok(toml::to_string_pretty(self)?)
        }
    }
}

/// Screen geometry for simulated scrolling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub viewport_width_px: f64,
    pub viewport_height_px: f64,
    /// Height of one grid row, card plus gap.
    pub row_height_px: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            viewport_width_px: 1520.0,
            viewport_height_px: 900.0,
            row_height_px: 340.0,
        }
    }
}

/// Generate a default selection.toml config file.
pub fn generate_default_config() -> String {
    r#"# Product selection feed configuration

[layout]
item_width_px = 240.0
gap_px = 0.0
side_panel_width_px = 320.0
collapsed_side_panel_width_px = 64.0
initial_rows = 4
load_more_rows = 2
server_max_page_size = 50

[scroll]
threshold = 0.8
debounce_ms = 200

[fetch]
# timeout_ms = 5000

[pricing]
low_tier_max_rub = 1500
mid_tier_max_rub = 5000
# Tier used when no exchange rate is available
fallback_tier = "mid"
# Example table; replace with the logistics provider's rates (CNY)
shipping_per_extra_kg = 18.0

[[pricing.shipping_brackets]]
max_weight_grams = 100
cost = 8.0

[[pricing.shipping_brackets]]
max_weight_grams = 500
cost = 15.0

[[pricing.shipping_brackets]]
max_weight_grams = 1000
cost = 25.0

[[pricing.shipping_brackets]]
max_weight_grams = 2000
cost = 40.0

[profit]
target_profit_rate = 0.2
packing_fee = 0.0
estimation_enabled = true

[simulation]
viewport_width_px = 1520.0
viewport_height_px = 900.0
row_height_px = 340.0
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_matches_defaults() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config: CliConfig = toml::from_str(
            r#"
            [scroll]
            debounce_ms = 50

            [simulation]
            viewport_width_px = 800.0
            "#,
        )
        .unwrap();
        assert_eq!(config.loader.scroll.debounce_ms, 50);
        assert_eq!(config.loader.scroll.threshold, 0.8);
        assert_eq!(config.simulation.viewport_width_px, 800.0);
        assert_eq!(config.simulation.row_height_px, 340.0);
    }

    #[test]
    fn test_json_config() {
        let config: CliConfig =
            serde_json::from_str(r#"{"profit": {"packing_fee": 2.5}}"#).unwrap();
        assert_eq!(config.loader.profit.packing_fee, 2.5);
    }
}

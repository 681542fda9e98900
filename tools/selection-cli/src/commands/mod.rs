//! CLI command implementations.

pub mod config;
pub mod filter;
pub mod simulate;

use std::path::Path;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use selection_commerce::prelude::*;
use selection_feed::StaticFeed;

/// Profit parameter overrides shared by `simulate` and `filter`.
#[derive(Args, Debug, Clone, Default)]
pub struct ProfitArgs {
    /// Target profit rate as a fraction (e.g. 0.2).
    #[arg(long)]
    pub target_rate: Option<f64>,

    /// Packing fee per item, CNY.
    #[arg(long)]
    pub packing_fee: Option<f64>,

    /// CNY to RUB exchange rate. Without it commission tiers use the
    /// fallback tier.
    #[arg(long)]
    pub rate: Option<f64>,

    /// Show every item without estimating profit.
    #[arg(long)]
    pub no_estimation: bool,
}

impl ProfitArgs {
    /// Apply the overrides on top of configured parameters.
    pub fn apply(&self, base: ProfitParameters) -> ProfitParameters {
        let mut params = base;
        if let Some(rate) = self.target_rate {
            params.target_profit_rate = rate;
        }
        if let Some(fee) = self.packing_fee {
            params.packing_fee = Money::from_decimal(fee, Currency::CNY);
        }
        if self.no_estimation {
            params.estimation_enabled = false;
        }
        params
    }
}

/// Arguments for the simulate command.
#[derive(Args)]
pub struct SimulateArgs {
    /// JSON file holding an array of products.
    #[arg(short, long)]
    pub fixture: String,

    /// Viewport width in pixels (default from config).
    #[arg(short, long)]
    pub width: Option<f64>,

    /// Simulate with the side panel collapsed.
    #[arg(long)]
    pub collapsed: bool,

    /// Maximum scroll-to-bottom steps.
    #[arg(long, default_value = "50")]
    pub scroll_steps: usize,

    /// Keyword filter for the search.
    #[arg(short, long)]
    pub keyword: Option<String>,

    #[command(flatten)]
    pub profit: ProfitArgs,
}

/// Arguments for the filter command.
#[derive(Args)]
pub struct FilterArgs {
    /// JSON file holding an array of products.
    #[arg(short, long)]
    pub fixture: String,

    /// Only list items that would be shown.
    #[arg(long)]
    pub visible_only: bool,

    #[command(flatten)]
    pub profit: ProfitArgs,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

/// Read a product fixture.
pub fn load_fixture(path: &Path) -> Result<StaticFeed> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture: {}", path.display()))?;
    StaticFeed::from_json(&content)
        .with_context(|| format!("Failed to parse fixture: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profit_args_override() {
        let args = ProfitArgs {
            target_rate: Some(0.3),
            packing_fee: Some(2.0),
            rate: Some(12.0),
            no_estimation: true,
        };
        let params = args.apply(ProfitParameters::default());
        assert_eq!(params.target_profit_rate, 0.3);
        assert_eq!(params.packing_fee, Money::new(200, Currency::CNY));
        assert!(!params.estimation_enabled);
        // the rate goes through the exchange-rate source, not here
        assert_eq!(params.exchange_rate, None);
    }

    #[test]
    fn test_profit_args_empty_keeps_base() {
        let base = ProfitParameters::new(0.15, Money::new(100, Currency::CNY));
        assert_eq!(ProfitArgs::default().apply(base), base);
    }
}

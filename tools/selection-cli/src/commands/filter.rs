//! Profitability verdicts for a fixture catalog.

use anyhow::{Context as _, Result};
use selection_feed::ItemVerdict;

use super::{load_fixture, FilterArgs};
use crate::context::Context;
use crate::output::{format_money, truncate, verdict_badge};

/// Run the filter command.
pub async fn run(args: FilterArgs, ctx: &Context) -> Result<()> {
    let fixture = ctx.resolve_path(&args.fixture);
    let feed = load_fixture(&fixture)?;

    let pricing = &ctx.config.loader.pricing;
    let filter = pricing
        .profitability_filter()
        .context("Invalid pricing configuration")?;
    let params = args
        .profit
        .apply(ctx.config.loader.profit.parameters())
        .with_exchange_rate(args.profit.rate);
    filter
        .validate_params(&params)
        .context("Invalid profit parameters")?;

    let verdicts: Vec<ItemVerdict> = feed
        .items()
        .iter()
        .map(|item| ItemVerdict::evaluate(item, &filter, &params))
        .filter(|v| !args.visible_only || v.verdict.keeps())
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&verdicts);
        return Ok(());
    }

    ctx.output.header(&format!(
        "Profitability ({} products, target {:.0}%)",
        feed.items().len(),
        params.target_profit_rate * 100.0
    ));
    if params.exchange_rate.is_none() {
        ctx.output.warn(&format!(
            "No exchange rate given; using the {} commission tier",
            pricing.fallback_tier
        ));
    }

    let widths = [8, 28, 6, 10, 10, 12, 14];
    ctx.output.table_row(
        &["ID", "TITLE", "TIER", "COMMISSION", "SHIPPING", "MAX COST", "VERDICT"],
        &widths,
    );
    let mut shown = 0;
    for item in &verdicts {
        let estimate = item.verdict.estimate();
        let id = item.id.to_string();
        let title = truncate(&item.title, 28);
        let tier = estimate
            .map(|e| {
                if e.tier_fallback {
                    format!("{}*", e.tier)
                } else {
                    e.tier.to_string()
                }
            })
            .unwrap_or_else(|| "-".to_string());
        let commission = format_money(estimate.map(|e| e.commission));
        let shipping = format_money(estimate.map(|e| e.shipping));
        let max_cost = format_money(item.max_allowable_cost());
        let badge = verdict_badge(&item.verdict);
        ctx.output.table_row(
            &[
                id.as_str(),
                title.as_str(),
                tier.as_str(),
                commission.as_str(),
                shipping.as_str(),
                max_cost.as_str(),
                badge.as_str(),
            ],
            &widths,
        );
        if item.verdict.keeps() {
            shown += 1;
        }
    }

    ctx.output.info("");
    ctx.output.kv("Shown", &shown.to_string());
    ctx.output.kv("Hidden", &(verdicts.len() - shown).to_string());

    Ok(())
}

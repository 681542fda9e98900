//! Page through a fixture catalog the way the selection screen does.

use std::time::Instant;

use anyhow::{anyhow, Context as _, Result};
use chrono::{DateTime, Utc};
use selection_commerce::prelude::*;
use selection_feed::{
    FeedLoader, FetchOutcome, FixedRate, GridLayout, ItemVerdict, LoadError, ScrollMetrics,
    SessionStatus, SidePanel, Viewport,
};
use selection_observability::MetricsSnapshot;
use serde::Serialize;

use super::{load_fixture, SimulateArgs};
use crate::context::Context;
use crate::output::{format_money, truncate, verdict_badge};

/// Machine-readable result of a simulation.
#[derive(Debug, Serialize)]
struct SimulationReport {
    generated_at: DateTime<Utc>,
    fixture: String,
    catalog_size: usize,
    layout: GridLayout,
    scroll_steps: usize,
    status: SessionStatus,
    params: ProfitParameters,
    visible: Vec<ItemVerdict>,
    hidden: usize,
    metrics: MetricsSnapshot,
}

/// Run the simulate command.
pub async fn run(args: SimulateArgs, ctx: &Context) -> Result<()> {
    let fixture = ctx.resolve_path(&args.fixture);
    let feed = load_fixture(&fixture)?;
    let catalog_size = feed.items().len();

    let rates = match args.profit.rate {
        Some(rate) => FixedRate::new(rate),
        None => FixedRate::unavailable(),
    };
    let filters = args
        .keyword
        .as_deref()
        .map(|k| FilterCriteria::new().with_keyword(k))
        .unwrap_or_default();
    let loader = FeedLoader::new(&ctx.config.loader, feed, rates)
        .context("Invalid loader configuration")?
        .with_filters(filters);

    if loader.refresh_exchange_rate().await.is_none() {
        ctx.output
            .warn("No exchange rate; commission tiers use the fallback tier");
    }
    let params = args.profit.apply(loader.profit_params());
    loader
        .set_profit_params(params)
        .context("Invalid profit parameters")?;

    let sim = &ctx.config.simulation;
    let side_panel = if args.collapsed {
        SidePanel::Collapsed
    } else {
        SidePanel::Expanded
    };
    let viewport =
        Viewport::new(args.width.unwrap_or(sim.viewport_width_px)).with_side_panel(side_panel);

    ctx.output.header("Simulating selection feed");
    ctx.output.kv("Fixture", &fixture.display().to_string());
    ctx.output.kv("Catalog", &format!("{} products", catalog_size));

    report_outcome(loader.on_layout(viewport).await, ctx);
    let layout = loader
        .layout()
        .ok_or_else(|| anyhow!("layout was not computed"))?;
    ctx.output.kv("Columns", &layout.columns.to_string());
    ctx.output.kv(
        "Page sizes",
        &format!(
            "{} initial, {} per scroll",
            layout.initial_page_size, layout.load_more_page_size
        ),
    );

    // Scroll to the bottom after each page, on a simulated clock.
    let debounce = ctx.config.loader.scroll.debounce();
    let mut now = Instant::now();
    let mut steps = 0;
    let pb = ctx.output.progress(args.scroll_steps as u64, "scrolling");
    while steps < args.scroll_steps && loader.status().has_more {
        let loaded = loader.status().total_loaded;
        let rows = loaded.div_ceil(layout.columns);
        let total_height = rows as f64 * sim.row_height_px;
        let scroll_top = (total_height - sim.viewport_height_px).max(0.0);

        loader.on_scroll(
            ScrollMetrics::new(scroll_top, sim.viewport_height_px, total_height),
            now,
        );
        now += debounce;
        report_outcome(loader.poll_scroll(now).await, ctx);

        steps += 1;
        pb.inc(1);
        pb.set_message(format!("{} loaded", loader.status().total_loaded));
    }
    pb.finish_and_clear();

    let status = loader.status();
    let view = loader.view();
    let visible: Vec<ItemVerdict> = loader
        .verdicts()
        .into_iter()
        .filter(|v| v.verdict.keeps())
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&SimulationReport {
            generated_at: Utc::now(),
            fixture: fixture.display().to_string(),
            catalog_size,
            layout,
            scroll_steps: steps,
            status,
            params: loader.profit_params(),
            visible,
            hidden: view.hidden(),
            metrics: loader.metrics(),
        });
        return Ok(());
    }

    ctx.output.header("Visible products");
    ctx.output
        .table_row(&["ID", "TITLE", "PRICE", "MAX COST", "VERDICT"], &[8, 32, 12, 12, 12]);
    for item in &visible {
        let id = item.id.to_string();
        let title = truncate(&item.title, 32);
        let price = format_money(item.verdict.estimate().map(|e| e.price));
        let max_cost = format_money(item.max_allowable_cost());
        let badge = verdict_badge(&item.verdict);
        ctx.output.table_row(
            &[id.as_str(), title.as_str(), price.as_str(), max_cost.as_str(), badge.as_str()],
            &[8, 32, 12, 12, 12],
        );
    }

    let metrics = loader.metrics();
    ctx.output.header("Summary");
    ctx.output.kv("Scroll steps", &steps.to_string());
    ctx.output.kv("Loaded", &status.total_loaded.to_string());
    ctx.output.kv("Visible", &view.visible_items.len().to_string());
    ctx.output.kv("Hidden", &view.hidden().to_string());
    ctx.output.kv("Feed exhausted", &(!status.has_more).to_string());
    ctx.output.kv("Fetches", &metrics.fetches_started.to_string());
    ctx.output.kv(
        "Suppressed triggers",
        &(metrics.rejected_in_flight + metrics.rejected_exhausted).to_string(),
    );
    if metrics.fetch_failures + metrics.contract_violations > 0 {
        ctx.output.warn(&format!(
            "{} failed fetches, {} rejected pages",
            metrics.fetch_failures, metrics.contract_violations
        ));
    }

    if status.has_more {
        ctx.output.info(&format!(
            "Stopped after {} scroll steps with more products available",
            steps
        ));
    } else {
        ctx.output.success("Reached the end of the feed");
    }

    Ok(())
}

fn report_outcome(result: Result<Option<FetchOutcome>, LoadError>, ctx: &Context) {
    match result {
        Ok(Some(FetchOutcome::Applied { items, has_more })) => {
            ctx.output
                .debug(&format!("Loaded {} products (more: {})", items, has_more));
        }
        Ok(Some(FetchOutcome::EndOfFeed)) => ctx.output.debug("Empty page, feed ended"),
        Ok(Some(other)) => ctx.output.debug(&format!("Fetch outcome: {:?}", other)),
        Ok(None) => {}
        Err(e) => ctx.output.warn(&format!("Load failed: {}", e)),
    }
}

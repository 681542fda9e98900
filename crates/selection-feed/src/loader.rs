//! The feed loader façade.
//!
//! [`FeedLoader`] wires layout, session, scroll trigger, pagination engine
//! and profitability filter together behind the events a product-selection
//! screen produces: layout observed, filters changed, scrolled, profit
//! parameters edited.
//!
//! The loader is single-threaded. Its methods take `&self` so several
//! operations may be awaited concurrently on one thread (for example with
//! `futures::join!`); shared state lives in `RefCell`s that are never held
//! across an await.

use std::cell::{Cell, RefCell};
use std::sync::Arc;
use std::time::{Duration, Instant};

use selection_commerce::prelude::*;
use selection_observability::{LoaderMetrics, MetricsSnapshot};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, LoaderConfig};
use crate::engine::{CursorPaginationEngine, FetchOutcome, LoadError};
use crate::layout::{GridLayout, GridLayoutEstimator, LayoutTracker, Viewport};
use crate::ports::{ExchangeRateSource, FeedSource, FetchError};
use crate::guard::Refusal;
use crate::scroll::{ScrollDecision, ScrollMetrics, ScrollTrigger};
use crate::session::{SessionState, SessionStatus};
use crate::timeout::with_timeout;
use crate::view::{FeedView, ItemVerdict};

/// Incremental product feed loader for one selection screen.
pub struct FeedLoader<S, R> {
    engine: CursorPaginationEngine<S>,
    rates: R,
    timeout: Option<Duration>,
    layout: RefCell<LayoutTracker>,
    scroll: RefCell<ScrollTrigger>,
    session: RefCell<SessionState>,
    params: Cell<ProfitParameters>,
    filter: ProfitabilityFilter,
    metrics: Arc<LoaderMetrics>,
}

impl<S: FeedSource, R: ExchangeRateSource> FeedLoader<S, R> {
    /// Build a loader from validated configuration.
    pub fn new(config: &LoaderConfig, source: S, rates: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let metrics = Arc::new(LoaderMetrics::new());
        let timeout = config.fetch.timeout();
        let engine = CursorPaginationEngine::new(source)
            .with_timeout(timeout)
            .with_metrics(Arc::clone(&metrics));

        Ok(Self {
            engine,
            rates,
            timeout,
            layout: RefCell::new(LayoutTracker::new(GridLayoutEstimator::new(
                config.layout.clone(),
            ))),
            scroll: RefCell::new(ScrollTrigger::new(
                config.scroll.threshold,
                config.scroll.debounce(),
            )),
            session: RefCell::new(SessionState::default()),
            params: Cell::new(config.profit.parameters()),
            filter: config.pricing.profitability_filter()?,
            metrics,
        })
    }

    /// Replace the configured shipping table.
    pub fn with_shipping_table(mut self, table: Arc<dyn ShippingCostTable>) -> Self {
        self.filter = ProfitabilityFilter::new(*self.filter.tiers(), table);
        self
    }

    /// Filters for the first session, before any layout is observed.
    pub fn with_filters(self, filters: FilterCriteria) -> Self {
        *self.session.borrow_mut() = SessionState::new(filters);
        self
    }

    /// Record a viewport. The first call marks the loader ready and loads
    /// the first page; later calls only recompute page sizes.
    pub async fn on_layout(&self, viewport: Viewport) -> Result<Option<FetchOutcome>, LoadError> {
        let update = self.layout.borrow_mut().observe(viewport);
        if !update.became_ready {
            return Ok(None);
        }
        info!(
            columns = update.layout.columns,
            initial = update.layout.initial_page_size,
            "layout ready, loading first page"
        );
        self.fetch_next().await.map(Some)
    }

    /// Request the next page directly, bypassing the scroll trigger.
    pub async fn load_more(&self) -> Result<FetchOutcome, LoadError> {
        self.fetch_next().await
    }

    /// Change the search filters.
    ///
    /// Unchanged filters do nothing and return `None`. Otherwise the
    /// session is reset and the first page of the new search requested.
    /// A fetch still in flight for the old filters is discarded when it
    /// resolves.
    pub async fn set_filters(
        &self,
        filters: FilterCriteria,
    ) -> Result<Option<FetchOutcome>, LoadError> {
        {
            let mut session = self.session.borrow_mut();
            if session.filters() == &filters {
                return Ok(None);
            }
            let generation = session.reset(filters);
            self.metrics.record_session_reset();
            info!(generation = %generation, "filters changed, session reset");
        }
        self.fetch_next().await.map(Some)
    }

    /// Record a scroll event. Evaluated by [`poll_scroll`](Self::poll_scroll)
    /// once the debounce window passes.
    pub fn on_scroll(&self, metrics: ScrollMetrics, now: Instant) {
        self.scroll.borrow_mut().on_scroll(metrics, now);
    }

    /// When a pending scroll event becomes due.
    pub fn scroll_deadline(&self) -> Option<Instant> {
        self.scroll.borrow().deadline()
    }

    /// Evaluate the settled scroll position and fetch if it calls for it.
    ///
    /// `None` when nothing was due or the position did not warrant a fetch.
    pub async fn poll_scroll(&self, now: Instant) -> Result<Option<FetchOutcome>, LoadError> {
        let decision = {
            let session = self.session.borrow();
            self.scroll.borrow_mut().poll(now, &session)
        };

        match decision {
            ScrollDecision::Fetch => self.fetch_next().await.map(Some),
            ScrollDecision::Suppressed(reason) => {
                if reason == Refusal::InFlight {
                    self.metrics.record_rejected_in_flight();
                } else {
                    self.metrics.record_rejected_exhausted();
                }
                debug!(reason = %reason, "scroll trigger suppressed");
                Ok(None)
            }
            ScrollDecision::Idle => Ok(None),
        }
    }

    /// Replace the profit parameters. The buffer is untouched and no fetch
    /// is issued; the next [`view`](Self::view) reflects the change.
    pub fn set_profit_params(&self, params: ProfitParameters) -> Result<(), CommerceError> {
        self.filter.validate_params(&params)?;
        debug!(
            target_rate = params.target_profit_rate,
            packing_fee = %params.packing_fee,
            enabled = params.estimation_enabled,
            "profit parameters updated"
        );
        self.params.set(params);
        Ok(())
    }

    pub fn profit_params(&self) -> ProfitParameters {
        self.params.get()
    }

    /// Query the CNY to RUB rate and store it in the profit parameters.
    ///
    /// On failure the rate is cleared and commission tiers fall back to the
    /// configured tier; the caller is not failed.
    pub async fn refresh_exchange_rate(&self) -> Option<ExchangeRate> {
        let fetched = with_timeout(self.timeout, self.rates.rate(Currency::CNY, Currency::RUB))
            .await
            .and_then(|raw| {
                ExchangeRate::new(Currency::CNY, Currency::RUB, raw)
                    .map_err(|err| FetchError::Deserialization(err.to_string()))
            });

        let rate = match fetched {
            Ok(rate) => {
                info!(rate = rate.rate, "exchange rate refreshed");
                Some(rate)
            }
            Err(err) => {
                warn!(error = %err, "exchange rate unavailable, using fallback tier");
                None
            }
        };
        self.params
            .set(self.params.get().with_exchange_rate(rate.map(|r| r.rate)));
        rate
    }

    /// Current rendered state.
    pub fn view(&self) -> FeedView {
        FeedView::build(&self.session.borrow(), &self.filter, &self.params.get())
    }

    /// Verdict for every buffered item, in buffer order.
    pub fn verdicts(&self) -> Vec<ItemVerdict> {
        let params = self.params.get();
        self.session
            .borrow()
            .items()
            .iter()
            .map(|item| ItemVerdict::evaluate(item, &self.filter, &params))
            .collect()
    }

    pub fn status(&self) -> SessionStatus {
        self.session.borrow().status()
    }

    /// Run `f` against the current session.
    pub fn with_session<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        f(&self.session.borrow())
    }

    pub fn layout(&self) -> Option<GridLayout> {
        self.layout.borrow().current()
    }

    pub fn filter(&self) -> &ProfitabilityFilter {
        &self.filter
    }

    pub fn source(&self) -> &S {
        self.engine.source()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    async fn fetch_next(&self) -> Result<FetchOutcome, LoadError> {
        let layout = self.layout.borrow().current();
        self.engine.fetch_next(&self.session, layout).await
    }
}

//! Scroll-driven prefetch trigger.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::guard::{Refusal, ScrollDebouncer};
use crate::session::SessionState;

/// Scroll position reported by the view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub total_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, viewport_height: f64, total_height: f64) -> Self {
        Self {
            scroll_top,
            viewport_height,
            total_height,
        }
    }

    /// Fraction of the content that has been scrolled into view.
    ///
    /// Content with no height counts as fully seen.
    pub fn progress(&self) -> f64 {
        if self.total_height <= 0.0 || !self.total_height.is_finite() {
            return 1.0;
        }
        (self.scroll_top + self.viewport_height) / self.total_height
    }
}

/// Whether a scroll position should request the next page.
///
/// True once progress passes `threshold`, unless a fetch is in flight or
/// the feed has ended.
pub fn should_fetch_more(metrics: &ScrollMetrics, session: &SessionState, threshold: f64) -> bool {
    !session.is_locked() && session.has_more() && metrics.progress() > threshold
}

/// What a settled scroll position calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDecision {
    /// Nothing settled yet, or the position is not past the threshold.
    Idle,
    Fetch,
    /// Past the threshold, but the session cannot fetch.
    Suppressed(Refusal),
}

/// Debounced wrapper around [`should_fetch_more`].
#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    threshold: f64,
    debouncer: ScrollDebouncer,
}

impl ScrollTrigger {
    pub fn new(threshold: f64, debounce: Duration) -> Self {
        Self {
            threshold,
            debouncer: ScrollDebouncer::new(debounce),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn on_scroll(&mut self, metrics: ScrollMetrics, now: Instant) {
        self.debouncer.record(metrics, now);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Release the settled scroll position, if the quiet window has passed.
    pub fn settle(&mut self, now: Instant) -> Option<ScrollMetrics> {
        self.debouncer.poll(now)
    }

    /// Settle and evaluate in one step.
    pub fn poll(&mut self, now: Instant, session: &SessionState) -> ScrollDecision {
        let Some(metrics) = self.settle(now) else {
            return ScrollDecision::Idle;
        };
        if should_fetch_more(&metrics, session, self.threshold) {
            ScrollDecision::Fetch
        } else if metrics.progress() <= self.threshold {
            ScrollDecision::Idle
        } else if session.is_locked() {
            ScrollDecision::Suppressed(Refusal::InFlight)
        } else {
            ScrollDecision::Suppressed(Refusal::Exhausted)
        }
    }
}

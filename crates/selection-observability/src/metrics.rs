//! Loader counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Point-in-time copy of [`LoaderMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Fetches issued to the feed.
    pub fetches_started: u64,
    /// Non-empty pages merged into the buffer.
    pub pages_applied: u64,
    /// Items merged into the buffer.
    pub items_loaded: u64,
    /// Empty pages that ended a feed.
    pub empty_pages: u64,
    /// Fetches that failed at the collaborator.
    pub fetch_failures: u64,
    /// Pages rejected for breaking the cursor contract.
    pub contract_violations: u64,
    /// Responses dropped because their session had been reset.
    pub stale_discarded: u64,
    /// Fetch attempts refused because one was already in flight.
    pub rejected_in_flight: u64,
    /// Fetch attempts refused because the feed had ended.
    pub rejected_exhausted: u64,
    /// Session resets caused by filter changes.
    pub session_resets: u64,
}

impl MetricsSnapshot {
    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Counters updated by the feed loader.
///
/// Relaxed atomics: each counter is independent and only read for
/// reporting.
#[derive(Debug, Default)]
pub struct LoaderMetrics {
    fetches_started: AtomicU64,
    pages_applied: AtomicU64,
    items_loaded: AtomicU64,
    empty_pages: AtomicU64,
    fetch_failures: AtomicU64,
    contract_violations: AtomicU64,
    stale_discarded: AtomicU64,
    rejected_in_flight: AtomicU64,
    rejected_exhausted: AtomicU64,
    session_resets: AtomicU64,
}

impl LoaderMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch_started(&self) {
        self.fetches_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_page_applied(&self, items: usize) {
        self.pages_applied.fetch_add(1, Ordering::Relaxed);
        self.items_loaded.fetch_add(items as u64, Ordering::Relaxed);
    }

    pub fn record_empty_page(&self) {
        self.empty_pages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_contract_violation(&self) {
        self.contract_violations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_discarded(&self) {
        self.stale_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_in_flight(&self) {
        self.rejected_in_flight.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_exhausted(&self) {
        self.rejected_exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session_reset(&self) {
        self.session_resets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            fetches_started: self.fetches_started.load(Ordering::Relaxed),
            pages_applied: self.pages_applied.load(Ordering::Relaxed),
            items_loaded: self.items_loaded.load(Ordering::Relaxed),
            empty_pages: self.empty_pages.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            contract_violations: self.contract_violations.load(Ordering::Relaxed),
            stale_discarded: self.stale_discarded.load(Ordering::Relaxed),
            rejected_in_flight: self.rejected_in_flight.load(Ordering::Relaxed),
            rejected_exhausted: self.rejected_exhausted.load(Ordering::Relaxed),
            session_resets: self.session_resets.load(Ordering::Relaxed),
        }
    }
}

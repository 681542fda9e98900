//! Cursor pagination engine.
//!
//! A fetch is split in two synchronous halves around the one await:
//! [`begin_fetch`] takes the latch and builds the query from the session,
//! [`complete_fetch`] applies the answer. Between them the session may be
//! reset; the generation stamped on the [`FetchTicket`] detects that.

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

use selection_commerce::prelude::*;
use selection_observability::LoaderMetrics;
use tracing::{debug, info, warn};

use crate::guard::{ConcurrencyGuard, Refusal};
use crate::layout::GridLayout;
use crate::ports::{FeedSource, FetchError};
use crate::session::{Generation, SessionState};
use crate::timeout::with_timeout;

/// What a fetch surfaces to its caller. Never fatal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("Feed fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Feed broke the cursor contract: {0}")]
    ContractViolation(#[from] FeedContractViolation),
}

/// How a fetch attempt ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A non-empty page was merged into the buffer.
    Applied { items: usize, has_more: bool },
    /// An empty page ended the feed.
    EndOfFeed,
    /// The session was reset while the fetch was in flight; the page was
    /// dropped.
    Stale,
    /// No fetch was issued.
    Skipped(Refusal),
}

impl FetchOutcome {
    pub fn issued_fetch(&self) -> bool {
        !matches!(self, Self::Skipped(_))
    }
}

/// Whether a fetch starts a session or continues it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    First,
    Next,
}

/// An acquired fetch: the query to send and the session it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: Generation,
    pub kind: PageKind,
    pub query: FeedQuery,
}

/// Take the latch and build the next query.
///
/// Refusals leave the session untouched.
pub fn begin_fetch(
    session: &mut SessionState,
    layout: Option<&GridLayout>,
) -> Result<FetchTicket, Refusal> {
    let layout = layout.ok_or(Refusal::NotReady)?;
    let generation = ConcurrencyGuard::try_acquire(session)?;

    let kind = if session.cursor.is_start() {
        PageKind::First
    } else {
        PageKind::Next
    };
    let limit = layout.page_size(kind == PageKind::First);
    let query = FeedQuery::after(session.cursor, limit, session.filters.clone());

    debug!(
        generation = %generation,
        cursor = %query.cursor,
        limit = query.limit,
        "fetch started"
    );
    Ok(FetchTicket {
        generation,
        kind,
        query,
    })
}

/// Apply the result of a fetch started by [`begin_fetch`].
///
/// A ticket from an older generation changes nothing, not even the latch,
/// which now belongs to the new session. Otherwise the latch is released
/// and the buffer and cursor change only for a valid, non-empty page.
pub fn complete_fetch(
    session: &mut SessionState,
    ticket: FetchTicket,
    result: Result<FeedPage, FetchError>,
) -> Result<FetchOutcome, LoadError> {
    if ticket.generation != session.generation {
        debug!(
            generation = %ticket.generation,
            current = %session.generation,
            "stale response discarded"
        );
        return Ok(FetchOutcome::Stale);
    }
    ConcurrencyGuard::release(session);

    let page = result.map_err(|err| {
        warn!(cursor = %ticket.query.cursor, error = %err, "feed fetch failed");
        err
    })?;
    page.validate_after(ticket.query.cursor).map_err(|violation| {
        warn!(cursor = %ticket.query.cursor, error = %violation, "feed page rejected");
        violation
    })?;

    let Some(next_cursor) = page.next_cursor() else {
        session.has_more = false;
        info!(
            generation = %ticket.generation,
            total = session.buffer.len(),
            "end of feed"
        );
        return Ok(FetchOutcome::EndOfFeed);
    };

    let items = page.len();
    let has_more = page.continues();
    match ticket.kind {
        PageKind::First => session.buffer.replace(page.items),
        PageKind::Next => session.buffer.append(page.items),
    }
    session.cursor = next_cursor;
    session.has_more = has_more;

    debug!(
        generation = %ticket.generation,
        items,
        cursor = %session.cursor,
        has_more,
        "page applied"
    );
    Ok(FetchOutcome::Applied { items, has_more })
}

/// Issues fetches against a [`FeedSource`] for a shared session.
pub struct CursorPaginationEngine<S> {
    source: S,
    timeout: Option<Duration>,
    metrics: Arc<LoaderMetrics>,
}

impl<S: FeedSource> CursorPaginationEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            timeout: None,
            metrics: Arc::new(LoaderMetrics::new()),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<LoaderMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn metrics(&self) -> &Arc<LoaderMetrics> {
        &self.metrics
    }

    /// Fetch the next page for `session`.
    ///
    /// The session is only borrowed inside the two synchronous halves, so
    /// other tasks on the same thread may reset it while this one waits.
    pub async fn fetch_next(
        &self,
        session: &RefCell<SessionState>,
        layout: Option<GridLayout>,
    ) -> Result<FetchOutcome, LoadError> {
        let begun = begin_fetch(&mut session.borrow_mut(), layout.as_ref());
        let ticket = match begun {
            Ok(ticket) => ticket,
            Err(refusal) => {
                match refusal {
                    Refusal::InFlight => self.metrics.record_rejected_in_flight(),
                    Refusal::Exhausted => self.metrics.record_rejected_exhausted(),
                    Refusal::NotReady => {}
                }
                debug!(reason = %refusal, "fetch skipped");
                return Ok(FetchOutcome::Skipped(refusal));
            }
        };
        self.metrics.record_fetch_started();

        let result = with_timeout(self.timeout, self.source.fetch_page(&ticket.query)).await;
        let outcome = complete_fetch(&mut session.borrow_mut(), ticket, result);

        match &outcome {
            Ok(FetchOutcome::Applied { items, .. }) => self.metrics.record_page_applied(*items),
            Ok(FetchOutcome::EndOfFeed) => self.metrics.record_empty_page(),
            Ok(FetchOutcome::Stale) => self.metrics.record_stale_discarded(),
            Ok(FetchOutcome::Skipped(_)) => {}
            Err(LoadError::Fetch(_)) => self.metrics.record_fetch_failure(),
            Err(LoadError::ContractViolation(_)) => self.metrics.record_contract_violation(),
        }
        outcome
    }
}

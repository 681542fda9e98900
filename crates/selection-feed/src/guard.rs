//! Single-flight latch and scroll debouncing.
//!
//! The latch is a plain `locked` flag on [`SessionState`], not a mutex. It
//! is sound because the loader runs on one thread and nothing awaits
//! between checking the flag and setting it.

use std::fmt;
use std::time::{Duration, Instant};

use crate::scroll::ScrollMetrics;
use crate::session::{Generation, SessionState};

/// Why a fetch was not started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// No layout has been computed yet.
    NotReady,
    /// Another fetch for this session has not resolved.
    InFlight,
    /// The feed has ended for the current filters.
    Exhausted,
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "layout not ready"),
            Self::InFlight => write!(f, "fetch in flight"),
            Self::Exhausted => write!(f, "feed exhausted"),
        }
    }
}

/// Acquire and release of the session latch.
pub struct ConcurrencyGuard;

impl ConcurrencyGuard {
    /// Take the latch iff it is free and the feed has more items.
    ///
    /// Refused calls change nothing and are not queued.
    pub fn try_acquire(session: &mut SessionState) -> Result<Generation, Refusal> {
        if session.locked {
            return Err(Refusal::InFlight);
        }
        if !session.has_more {
            return Err(Refusal::Exhausted);
        }
        session.locked = true;
        Ok(session.generation)
    }

    pub fn release(session: &mut SessionState) {
        session.locked = false;
    }
}

/// Trailing-edge debounce for scroll events.
///
/// Each event restarts the quiet window; once it elapses the latest
/// metrics are released exactly once.
#[derive(Debug, Clone)]
pub struct ScrollDebouncer {
    window: Duration,
    pending: Option<(ScrollMetrics, Instant)>,
}

impl ScrollDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn record(&mut self, metrics: ScrollMetrics, now: Instant) {
        self.pending = Some((metrics, now));
    }

    /// When the pending event, if any, becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, at)| at + self.window)
    }

    pub fn poll(&mut self, now: Instant) -> Option<ScrollMetrics> {
        match self.pending {
            Some((metrics, at)) if now.saturating_duration_since(at) >= self.window => {
                self.pending = None;
                Some(metrics)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

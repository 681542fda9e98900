//! Per-search pagination state.

use std::fmt;

use selection_commerce::prelude::*;
use serde::{Deserialize, Serialize};

use crate::buffer::AccumulationBuffer;

/// Identifies one session. Bumped on every reset so responses to an older
/// session can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    pub fn get(&self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cursor, buffer and flags for the active search.
///
/// `cursor` always equals the id of the last buffered item, or
/// [`Cursor::START`] while the buffer is empty. Only the pagination engine
/// writes to it.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub(crate) generation: Generation,
    pub(crate) cursor: Cursor,
    pub(crate) buffer: AccumulationBuffer,
    pub(crate) has_more: bool,
    pub(crate) locked: bool,
    pub(crate) filters: FilterCriteria,
}

impl SessionState {
    pub fn new(filters: FilterCriteria) -> Self {
        Self {
            generation: Generation::default(),
            cursor: Cursor::START,
            buffer: AccumulationBuffer::new(),
            has_more: true,
            locked: false,
            filters,
        }
    }

    /// Start a new session for `filters`. Any fetch still in flight now
    /// belongs to a previous generation.
    pub(crate) fn reset(&mut self, filters: FilterCriteria) -> Generation {
        self.generation = self.generation.next();
        self.cursor = Cursor::START;
        self.buffer.clear();
        self.has_more = true;
        self.locked = false;
        self.filters = filters;
        self.generation
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn buffer(&self) -> &AccumulationBuffer {
        &self.buffer
    }

    pub fn items(&self) -> &[ProductItem] {
        self.buffer.items()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    /// Whether the cursor agrees with the buffer tail.
    pub fn cursor_is_consistent(&self) -> bool {
        match self.buffer.last_id() {
            Some(id) => self.cursor == Cursor::after(id),
            None => self.cursor.is_start(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            generation: self.generation,
            cursor: self.cursor,
            has_more: self.has_more,
            locked: self.locked,
            total_loaded: self.buffer.len(),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(FilterCriteria::default())
    }
}

/// Copyable summary of a [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub generation: Generation,
    pub cursor: Cursor,
    pub has_more: bool,
    pub locked: bool,
    pub total_loaded: usize,
}

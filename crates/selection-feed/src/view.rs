//! What the UI renders.

use selection_commerce::prelude::*;
use serde::{Deserialize, Serialize};

use crate::session::SessionState;

/// The rendered subset of the buffer plus loading flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedView {
    pub visible_items: Vec<ProductItem>,
    pub is_loading_more: bool,
    pub has_more: bool,
    /// Buffered items, visible or not.
    pub total_loaded: usize,
}

impl FeedView {
    /// Derive the view from the whole buffer. Never mutates the session.
    pub fn build(
        session: &SessionState,
        filter: &ProfitabilityFilter,
        params: &ProfitParameters,
    ) -> Self {
        Self {
            visible_items: filter
                .visible(session.items(), params)
                .into_iter()
                .cloned()
                .collect(),
            is_loading_more: session.is_locked(),
            has_more: session.has_more(),
            total_loaded: session.buffer().len(),
        }
    }

    /// Items hidden by the profitability filter.
    pub fn hidden(&self) -> usize {
        self.total_loaded - self.visible_items.len()
    }

    pub fn visible_ids(&self) -> Vec<ProductId> {
        self.visible_items.iter().map(|item| item.id).collect()
    }
}

/// Verdict for one buffered item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemVerdict {
    pub id: ProductId,
    pub title: String,
    pub verdict: ProfitVerdict,
}

impl ItemVerdict {
    pub fn evaluate(
        item: &ProductItem,
        filter: &ProfitabilityFilter,
        params: &ProfitParameters,
    ) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            verdict: filter.evaluate(item, params),
        }
    }

    pub fn max_allowable_cost(&self) -> Option<Money> {
        self.verdict.estimate().map(|e| e.max_allowable_cost)
    }
}

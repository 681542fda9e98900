//! Grid layout estimation and page sizing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LayoutConfig;

/// Side panel state; decides how much width the grid loses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidePanel {
    #[default]
    Expanded,
    Collapsed,
}

impl SidePanel {
    pub fn toggled(self) -> Self {
        match self {
            Self::Expanded => Self::Collapsed,
            Self::Collapsed => Self::Expanded,
        }
    }
}

/// Observed viewport geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width_px: f64,
    pub side_panel: SidePanel,
}

impl Viewport {
    pub fn new(width_px: f64) -> Self {
        Self {
            width_px,
            side_panel: SidePanel::Expanded,
        }
    }

    pub fn with_side_panel(mut self, side_panel: SidePanel) -> Self {
        self.side_panel = side_panel;
        self
    }
}

/// Columns per row and the two page sizes derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Always at least 1.
    pub columns: usize,
    /// Limit for the first page of a session.
    pub initial_page_size: usize,
    /// Limit for every later page.
    pub load_more_page_size: usize,
}

impl GridLayout {
    /// Page size for a query starting at the beginning of the feed or not.
    pub fn page_size(&self, first_page: bool) -> usize {
        if first_page {
            self.initial_page_size
        } else {
            self.load_more_page_size
        }
    }
}

/// Derives a [`GridLayout`] from a viewport.
#[derive(Debug, Clone)]
pub struct GridLayoutEstimator {
    config: LayoutConfig,
}

impl GridLayoutEstimator {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Width left for the grid once the side panel is reserved.
    pub fn available_width(&self, viewport: &Viewport) -> f64 {
        let reserved = match viewport.side_panel {
            SidePanel::Expanded => self.config.side_panel_width_px,
            SidePanel::Collapsed => self.config.collapsed_side_panel_width_px,
        };
        (viewport.width_px - reserved).max(0.0)
    }

    pub fn estimate(&self, viewport: &Viewport) -> GridLayout {
        let available = self.available_width(viewport);
        let gap = self.config.gap_px;
        let fitted = ((available + gap) / (self.config.item_width_px + gap)).floor();
        let columns = if fitted.is_finite() && fitted >= 1.0 {
            fitted as usize
        } else {
            1
        };

        let max = self.config.server_max_page_size;
        GridLayout {
            columns,
            initial_page_size: columns.saturating_mul(self.config.initial_rows).min(max),
            load_more_page_size: columns.saturating_mul(self.config.load_more_rows).min(max / 2),
        }
    }
}

/// Result of feeding a viewport to a [`LayoutTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutUpdate {
    pub layout: GridLayout,
    /// True only for the first observation.
    pub became_ready: bool,
    pub changed: bool,
}

/// Holds the current layout and the one-shot readiness flag.
///
/// No query may be issued before the first viewport has been observed.
#[derive(Debug, Clone)]
pub struct LayoutTracker {
    estimator: GridLayoutEstimator,
    current: Option<GridLayout>,
    viewport: Option<Viewport>,
}

impl LayoutTracker {
    pub fn new(estimator: GridLayoutEstimator) -> Self {
        Self {
            estimator,
            current: None,
            viewport: None,
        }
    }

    pub fn observe(&mut self, viewport: Viewport) -> LayoutUpdate {
        let layout = self.estimator.estimate(&viewport);
        let became_ready = self.current.is_none();
        let changed = self.current != Some(layout);
        if changed {
            debug!(
                columns = layout.columns,
                initial = layout.initial_page_size,
                load_more = layout.load_more_page_size,
                width = viewport.width_px,
                "layout recomputed"
            );
        }
        self.current = Some(layout);
        self.viewport = Some(viewport);
        LayoutUpdate {
            layout,
            became_ready,
            changed,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<GridLayout> {
        self.current
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> GridLayoutEstimator {
        GridLayoutEstimator::new(LayoutConfig::default())
    }

    #[test]
    fn test_columns_from_available_width() {
        // 1520 - 320 = 1200 → 5 columns of 240
        let layout = estimator().estimate(&Viewport::new(1520.0));
        assert_eq!(layout.columns, 5);
        assert_eq!(layout.initial_page_size, 20);
        assert_eq!(layout.load_more_page_size, 10);
    }

    #[test]
    fn test_collapsed_panel_widens_grid() {
        let e = estimator();
        let expanded = e.estimate(&Viewport::new(1520.0));
        let collapsed =
            e.estimate(&Viewport::new(1520.0).with_side_panel(SidePanel::Collapsed));
        // 1520 - 64 = 1456 → 6 columns
        assert_eq!(collapsed.columns, 6);
        assert!(collapsed.columns > expanded.columns);
    }

    #[test]
    fn test_at_least_one_column() {
        let e = estimator();
        assert_eq!(e.estimate(&Viewport::new(100.0)).columns, 1);
        assert_eq!(e.estimate(&Viewport::new(0.0)).columns, 1);
        assert_eq!(e.estimate(&Viewport::new(-50.0)).columns, 1);

        let tiny = e.estimate(&Viewport::new(0.0));
        assert_eq!(tiny.initial_page_size, 4);
        assert_eq!(tiny.load_more_page_size, 2);
    }

    #[test]
    fn test_page_sizes_capped_by_server_max() {
        let e = estimator();
        // 7000 - 320 = 6680 → 27 columns
        let wide = e.estimate(&Viewport::new(7000.0));
        assert_eq!(wide.columns, 27);
        assert_eq!(wide.initial_page_size, 50);
        assert_eq!(wide.load_more_page_size, 25);
    }

    #[test]
    fn test_extreme_width_keeps_page_sizes_capped() {
        let e = estimator();
        for width in [1e30, f64::MAX] {
            let layout = e.estimate(&Viewport::new(width));
            assert!(layout.columns >= 1);
            assert_eq!(layout.initial_page_size, 50);
            assert_eq!(layout.load_more_page_size, 25);
        }
    }

    #[test]
    fn test_gap_counts_between_cards() {
        let config = LayoutConfig {
            gap_px: 16.0,
            side_panel_width_px: 0.0,
            ..LayoutConfig::default()
        };
        let e = GridLayoutEstimator::new(config);
        // 4 cards need 4*240 + 3*16 = 1008
        assert_eq!(e.estimate(&Viewport::new(1008.0)).columns, 4);
        assert_eq!(e.estimate(&Viewport::new(1007.0)).columns, 3);
    }

    #[test]
    fn test_tracker_ready_once() {
        let mut tracker = LayoutTracker::new(estimator());
        assert!(!tracker.is_ready());

        let first = tracker.observe(Viewport::new(1520.0));
        assert!(first.became_ready);
        assert!(first.changed);

        let same = tracker.observe(Viewport::new(1520.0));
        assert!(!same.became_ready);
        assert!(!same.changed);

        let resized = tracker.observe(Viewport::new(2000.0));
        assert!(!resized.became_ready);
        assert!(resized.changed);
        assert!(tracker.is_ready());
    }

    #[test]
    fn test_side_panel_toggle() {
        assert_eq!(SidePanel::Expanded.toggled(), SidePanel::Collapsed);
        assert_eq!(SidePanel::Collapsed.toggled(), SidePanel::Expanded);
    }
}

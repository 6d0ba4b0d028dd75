//! Geometry cache - per-column/per-row maxima and minimum canvas size.
//!
//! Expensive to rebuild (it folds every page's display size), so it is
//! guarded by a validity flag: `Layout::recalculate` marks it invalid
//! and the next access recomputes it under the geometry lock. Invariant
//! while `valid`: the extent vectors match the mapper's column/row
//! counts and every page's contribution has been folded in.

use crate::config::Tuning;
use crate::grid::GridMapper;
use crate::model::{LayoutPolicy, PageIndex};
use crate::page::PageView;
use tracing::debug;

/// Cached grid geometry. Lives inside the engine's geometry mutex
/// together with its mapper so the size-match invariant cannot be
/// observed broken.
#[derive(Debug)]
pub(crate) struct GeometryCache {
    /// Mapper configured for the cached page count and policy.
    pub(crate) mapper: GridMapper,
    /// Maximum page width per column.
    pub(crate) width_cols: Vec<f64>,
    /// Maximum page height per row.
    pub(crate) height_rows: Vec<f64>,
    /// Minimum total canvas width in whole pixels.
    pub(crate) min_width: usize,
    /// Minimum total canvas height in whole pixels.
    pub(crate) min_height: usize,
    /// Whether the cached values reflect the current inputs.
    pub(crate) valid: bool,
}

impl GeometryCache {
    /// Create an invalid cache; the first access recomputes it.
    pub(crate) fn new() -> Self {
        Self {
            mapper: GridMapper::new(),
            width_cols: Vec::new(),
            height_rows: Vec::new(),
            min_width: 0,
            min_height: 0,
            valid: false,
        }
    }

    /// Drop cached values; the next access recomputes.
    pub(crate) fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Rebuild the cache from the current pages, policy and viewport
    /// extents. Must not call back into code that takes the geometry
    /// lock.
    pub(crate) fn recompute<P: PageView>(
        &mut self,
        pages: &[P],
        policy: &LayoutPolicy,
        tuning: &Tuning,
        h_extent: f64,
        v_extent: f64,
    ) {
        self.mapper.configure(pages.len(), policy);
        let columns = self.mapper.columns();
        let rows = self.mapper.rows();

        self.width_cols.clear();
        self.width_cols.resize(columns, 0.0);
        self.height_rows.clear();
        self.height_rows.resize(rows, 0.0);

        for (index, page) in pages.iter().enumerate() {
            let cell = self.mapper.at_index(PageIndex::new(index));
            self.width_cols[cell.column] = self.width_cols[cell.column].max(page.display_width());
            self.height_rows[cell.row] = self.height_rows[cell.row].max(page.display_height());
        }

        // Space around the entire page area, for tablets with a limited
        // sense area; unlimited scrolling widens it to a full viewport
        // extent past the content edge on both sides.
        let mut v_padding = f64::from(2 * tuning.base_padding);
        if policy.unlimited_scrolling {
            v_padding += 2.0 * v_extent.floor();
        } else if policy.add_vertical_space {
            v_padding += f64::from(policy.vertical_space_above);
            v_padding += f64::from(policy.vertical_space_below);
        }

        let mut h_padding = f64::from(2 * tuning.base_padding);
        if policy.unlimited_scrolling {
            h_padding += 2.0 * h_extent.floor();
        } else if policy.add_horizontal_space {
            h_padding += f64::from(policy.horizontal_space_left);
            h_padding += f64::from(policy.horizontal_space_right);
        }

        let gap = f64::from(tuning.cell_gap);
        let width_sum: f64 = self.width_cols.iter().sum();
        let height_sum: f64 = self.height_rows.iter().sum();

        let min_width = h_padding + width_sum + columns.saturating_sub(1) as f64 * gap;
        let min_height = v_padding + height_sum + rows.saturating_sub(1) as f64 * gap;

        self.min_width = min_width.max(0.0).floor() as usize;
        self.min_height = min_height.max(0.0).floor() as usize;
        self.valid = true;

        debug!(
            columns,
            rows,
            min_width = self.min_width,
            min_height = self.min_height,
            "geometry recomputed"
        );
    }
}

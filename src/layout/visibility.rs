//! Throttled viewport-visibility scanning.
//!
//! Each scan intersects the visible rectangle against the page grid
//! using binary search over the boundary arrays, so a document with
//! thousands of pages is scanned in time proportional to the number of
//! visible cells. Visible/hidden transitions are diffed with per-page
//! stamps instead of a clear pass over all pages, and the page with the
//! highest overlap fraction becomes the selection.

use std::sync::PoisonError;

use super::Layout;
use crate::model::{AppendPolicy, GridPosition, PageIndex};
use crate::page::PageView;
use tracing::{debug, info};

/// Scan bookkeeping: stamps, the previous scan's visible set, and the
/// current selection. UI-thread-only, never locked or persisted.
#[derive(Debug)]
pub(crate) struct VisibilityState {
    /// Per-page counter value of the last scan that saw the page.
    stamps: Vec<u64>,
    /// Current scan counter; 0 means "no scan yet".
    counter: u64,
    /// Raw indices of the pages visible in the previous scan.
    last_visible: Vec<usize>,
    /// Most-visible page as of the previous scan.
    pub(crate) last_selected: Option<PageIndex>,
}

impl VisibilityState {
    pub(crate) fn new() -> Self {
        Self {
            stamps: Vec::new(),
            counter: 0,
            last_visible: Vec::new(),
            last_selected: None,
        }
    }
}

impl Layout {
    /// Scan the grid window that can intersect the viewport, update
    /// every affected page's visible flag, and re-select the most
    /// visible page.
    pub(crate) fn update_visibility<P: PageView>(&mut self, pages: &mut [P]) {
        let vis = self.visible_rect();

        if self.row_y_start.is_empty() || self.col_x_start.is_empty() {
            return;
        }

        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        // Bound the scan to the rows/columns that can possibly
        // intersect the viewport: first boundary past each edge, backed
        // up one cell to include a partially visible leading cell.
        let row_start = self
            .row_y_start
            .partition_point(|&boundary| boundary < vis.y)
            .saturating_sub(1);
        let row_end = (self
            .row_y_start
            .partition_point(|&boundary| boundary < vis.bottom())
            + 1)
        .min(self.row_y_start.len());

        let col_start = self
            .col_x_start
            .partition_point(|&boundary| boundary < vis.x)
            .saturating_sub(1);
        let col_end = (self
            .col_x_start
            .partition_point(|&boundary| boundary < vis.right())
            + 1)
        .min(self.col_x_start.len());

        if self.visibility.stamps.len() != pages.len() {
            self.visibility.stamps = vec![0; pages.len()];
        }
        self.visibility.counter = self.visibility.counter.wrapping_add(1);
        if self.visibility.counter == 0 {
            self.visibility.stamps.fill(0);
            self.visibility.counter = 1;
        }
        let counter = self.visibility.counter;

        let mut most_page: Option<PageIndex> = None;
        let mut most_percent = 0.0f64;
        let mut visible_now: Vec<usize> = Vec::with_capacity(8);

        for row in row_start..row_end {
            let y1 = if row == 0 { 0.0 } else { self.row_y_start[row - 1] };
            let y2 = self.row_y_start[row];
            for column in col_start..col_end {
                let x1 = if column == 0 { 0.0 } else { self.col_x_start[column - 1] };
                let x2 = self.col_x_start[column];

                let Some(page_index) = cache.mapper.at_position(GridPosition::new(column, row))
                else {
                    continue;
                };

                // Coarse reject against the cell rectangle before the
                // exact page-bounds check.
                if vis.x > x2 || vis.right() < x1 || vis.y > y2 || vis.bottom() < y1 {
                    continue;
                }

                let page = &mut pages[page_index.get()];
                let page_rect = page.bounding_rect();
                let Some(overlap) = page_rect.intersection(&vis) else {
                    continue;
                };

                page.set_visible(true);
                self.visibility.stamps[page_index.get()] = counter;
                visible_now.push(page_index.get());

                let percent = overlap.area() / page_rect.area();
                if percent > most_percent {
                    most_page = Some(page_index);
                    most_percent = percent;
                }
            }
        }
        drop(cache);

        // Hide pages that were visible in the previous scan but weren't
        // stamped in this one.
        for &index in &self.visibility.last_visible {
            if index < self.visibility.stamps.len() && self.visibility.stamps[index] != counter {
                if let Some(page) = pages.get_mut(index) {
                    page.set_visible(false);
                }
            }
        }
        self.visibility.last_visible = visible_now;

        debug!(
            visible = self.visibility.last_visible.len(),
            selected = ?most_page,
            "visibility scan"
        );

        if let Some(page) = most_page {
            if self.visibility.last_selected != Some(page) {
                self.visibility.last_selected = Some(page);
                self.selection_observer.page_selected(page);
            }
        }
    }

    /// End-of-document check run on every perceptible vertical scroll:
    /// when the viewport bottom reaches the end of the last page of a
    /// freeform document, ask the owner for one more page.
    pub(crate) fn maybe_append_page<P: PageView>(&mut self, pages: &[P]) {
        if self.policy.empty_last_page_append != AppendPolicy::OnScrollToEndOfLastPage {
            return;
        }

        let vis = self.visible_rect();
        let min_height = self.min_height(pages) as f64;
        if ((min_height - vis.y) - vis.height).abs() >= self.tuning.append_tolerance {
            return;
        }

        // Documents with embedded source pages (imports) never grow.
        if self.document.source_page_count() != 0 {
            return;
        }

        let Some(current) = self.visibility.last_selected else {
            return;
        };
        if pages.is_empty() || current.get() != pages.len() - 1 {
            return;
        }

        info!(page = current.get(), "scrolled to end of last page; requesting append");
        self.document.insert_page(current, true);
    }

    #[cfg(test)]
    pub(crate) fn force_stamp_counter(&mut self, value: u64) {
        self.visibility.counter = value;
    }

    #[cfg(test)]
    pub(crate) fn stamp_counter(&self) -> u64 {
        self.visibility.counter
    }
}

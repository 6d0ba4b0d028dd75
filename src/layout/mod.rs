//! The layout engine - page placement, geometry queries, and scrolling.
//!
//! [`Layout`] arranges an ordered collection of variable-size pages
//! into a 2D grid, assigns absolute pixel positions, and tracks which
//! pages the viewport can see. It is driven entirely by its host:
//!
//! - call [`Layout::layout_pages`] whenever the containing canvas is
//!   resized (and before trusting any position query);
//! - call [`Layout::recalculate`] after any page-size or policy change;
//! - forward toolkit scroll signals to
//!   [`Layout::horizontal_scroll_changed`] /
//!   [`Layout::vertical_scroll_changed`];
//! - when a timer scheduled through the engine's [`TimerScheduler`]
//!   elapses, call [`Layout::timer_fired`].
//!
//! # Module structure
//!
//! - `geometry`: mutex-guarded geometry cache (extents + minimum size)
//! - `visibility`: throttled visibility scan, stamps, page selection

pub(crate) mod geometry;
mod visibility;

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::Tuning;
use crate::model::{GridPosition, LayoutPolicy, PageIndex, Rect};
use crate::page::PageView;
use crate::ports::{
    DocumentHost, NoopDocumentHost, NoopRenderGate, NoopSelectionObserver, RenderGate,
    SelectionObserver,
};
use crate::scroll::ScrollAxis;
use crate::timer::{TimerHandle, TimerScheduler, TimerTask};
use geometry::GeometryCache;
use tracing::trace;
use visibility::VisibilityState;

/// Page layout and viewport-visibility engine for a scrollable
/// multi-page canvas.
///
/// All operations run synchronously on the host's single UI/event
/// thread. The geometry cache is nonetheless lock-guarded because its
/// read accessors ([`min_width`], [`min_height`]) may be queried from
/// code paths outside the layout call stack.
///
/// [`min_width`]: Layout::min_width
/// [`min_height`]: Layout::min_height
pub struct Layout {
    horizontal: Box<dyn ScrollAxis>,
    vertical: Box<dyn ScrollAxis>,
    scheduler: Box<dyn TimerScheduler>,
    document: Box<dyn DocumentHost>,
    render_gate: Box<dyn RenderGate>,
    selection_observer: Box<dyn SelectionObserver>,

    policy: LayoutPolicy,
    tuning: Tuning,

    cache: Mutex<GeometryCache>,

    // Monotonic prefix sums of cell extents plus spacing; rebuilt on
    // every layout_pages call, binary-searched by the visibility scan
    // and by point queries. UI-thread-only, hence unlocked.
    col_x_start: Vec<f64>,
    row_y_start: Vec<f64>,

    visibility: VisibilityState,
    pending_scan: Option<TimerHandle>,
    pending_unblock: Option<TimerHandle>,

    last_scroll_horizontal: f64,
    last_scroll_vertical: f64,
}

impl Layout {
    /// Create an engine over the given scroll axes and timer facility,
    /// with the default policy, default tuning, and no-op collaborators.
    pub fn new(
        horizontal: Box<dyn ScrollAxis>,
        vertical: Box<dyn ScrollAxis>,
        scheduler: Box<dyn TimerScheduler>,
    ) -> Self {
        let last_scroll_horizontal = horizontal.value();
        let last_scroll_vertical = vertical.value();
        Self {
            horizontal,
            vertical,
            scheduler,
            document: Box::new(NoopDocumentHost),
            render_gate: Box::new(NoopRenderGate),
            selection_observer: Box::new(NoopSelectionObserver),
            policy: LayoutPolicy::default(),
            tuning: Tuning::default(),
            cache: Mutex::new(GeometryCache::new()),
            col_x_start: Vec::new(),
            row_y_start: Vec::new(),
            visibility: VisibilityState::new(),
            pending_scan: None,
            pending_unblock: None,
            last_scroll_horizontal,
            last_scroll_vertical,
        }
    }

    /// Replace the initial policy (builder style).
    pub fn with_policy(mut self, policy: LayoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the default tuning (builder style).
    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Install the document owner collaborator.
    pub fn set_document_host(&mut self, document: Box<dyn DocumentHost>) {
        self.document = document;
    }

    /// Install the re-render scheduler collaborator.
    pub fn set_render_gate(&mut self, gate: Box<dyn RenderGate>) {
        self.render_gate = gate;
    }

    /// Install the page-selection observer.
    pub fn set_selection_observer(&mut self, observer: Box<dyn SelectionObserver>) {
        self.selection_observer = observer;
    }

    /// Install a fresh policy snapshot and invalidate cached geometry.
    pub fn set_policy(&mut self, policy: LayoutPolicy) {
        self.policy = policy;
        self.recalculate();
    }

    /// Current policy snapshot.
    pub fn policy(&self) -> &LayoutPolicy {
        &self.policy
    }

    /// Current tuning constants.
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Invalidate the geometry cache.
    ///
    /// Must be called after any page-size or policy change; the next
    /// access recomputes lazily under the geometry lock. The host is
    /// responsible for scheduling the canvas resize that leads to the
    /// next [`layout_pages`](Layout::layout_pages) call.
    pub fn recalculate(&self) {
        self.lock_cache().invalidate();
    }

    /// The currently visible rectangle in canvas coordinates, read from
    /// the two scroll axes at call time.
    pub fn visible_rect(&self) -> Rect {
        Rect::new(
            self.horizontal.value(),
            self.vertical.value(),
            self.horizontal.page_extent(),
            self.vertical.page_extent(),
        )
    }

    /// Minimum canvas width required by the current pages and policy.
    pub fn min_width<P: PageView>(&self, pages: &[P]) -> usize {
        let mut cache = self.lock_cache();
        self.ensure_valid(&mut cache, pages);
        cache.min_width
    }

    /// Minimum canvas height required by the current pages and policy.
    pub fn min_height<P: PageView>(&self, pages: &[P]) -> usize {
        let mut cache = self.lock_cache();
        self.ensure_valid(&mut cache, pages);
        cache.min_height
    }

    /// The page currently selected as most visible, if any scan has
    /// found one yet.
    pub fn selected_page(&self) -> Option<PageIndex> {
        self.visibility.last_selected
    }

    /// Cumulative column boundaries from the last
    /// [`layout_pages`](Layout::layout_pages) call, strictly increasing.
    ///
    /// `column_boundaries()[c]` is the canvas x where column `c`'s cell
    /// (including its trailing gap) ends.
    pub fn column_boundaries(&self) -> &[f64] {
        &self.col_x_start
    }

    /// Cumulative row boundaries from the last
    /// [`layout_pages`](Layout::layout_pages) call, strictly increasing.
    ///
    /// `row_boundaries()[r]` is the canvas y where row `r`'s cell
    /// (including its trailing gap) ends.
    pub fn row_boundaries(&self) -> &[f64] {
        &self.row_y_start
    }

    /// Page hosted by the given grid cell, or `None` for an empty cell.
    pub fn page_index_at_grid(&self, row: usize, column: usize) -> Option<PageIndex> {
        self.lock_cache().mapper.at_position(GridPosition::new(column, row))
    }

    /// Assign absolute pixel positions to every page for a canvas of
    /// the given size.
    ///
    /// Invoked on container resize. Recomputes the geometry cache if it
    /// is invalid, centers the content when the container is larger
    /// than the minimum required size, and rebuilds the boundary arrays
    /// used by visibility scans and point queries. Empty grid cells
    /// still consume their cell extent.
    pub fn layout_pages<P: PageView>(&mut self, pages: &mut [P], width: f64, height: f64) {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if !cache.valid {
            cache.recompute(
                pages,
                &self.policy,
                &self.tuning,
                self.horizontal.page_extent(),
                self.vertical.page_extent(),
            );
        }

        let gap = f64::from(self.tuning.cell_gap);
        let shadow = f64::from(self.tuning.shadow_gap);
        let len = pages.len();
        let is_paired = cache.mapper.is_paired();
        let rows = cache.height_rows.len();
        let columns = cache.width_cols.len();

        // Center when the container is larger than the minimum size,
        // otherwise fall back to the one-side padding.
        let border_x = self
            .horizontal_one_side_padding()
            .max((width - cache.min_width as f64) / 2.0);
        let border_y = self
            .vertical_one_side_padding()
            .max((height - cache.min_height as f64) / 2.0);

        let mut x = border_x;
        let mut y = border_y;

        // Walk every cell row-major; the mapper says which cells hold a
        // page. Occupied cells get center, left, or right justification
        // within the column's slack as the pairing rule requires.
        for row in 0..rows {
            for column in 0..columns {
                match cache.mapper.at_position(GridPosition::new(column, row)) {
                    Some(page_index) => {
                        let page = &mut pages[page_index.get()];
                        page.set_mapped_cell(row, column);

                        let display_width = page.display_width();
                        let column_slack = cache.width_cols[column] - display_width;

                        let (padding_left, padding_right) = if is_paired && len > 1 {
                            if column % 2 == 0 {
                                // Right-aligned page of the pair; the
                                // shadow gap stays on its right.
                                (gap - shadow + column_slack, shadow)
                            } else {
                                (shadow, gap - shadow + column_slack)
                            }
                        } else {
                            // Center within the column slack; the cell
                            // still consumes its full extent plus gap.
                            let padding_left = gap / 2.0 + column_slack / 2.0;
                            (padding_left, gap - padding_left + column_slack)
                        };

                        x += padding_left;
                        page.set_position(x.floor() as i64, y.floor() as i64);
                        x += display_width + padding_right;
                    }
                    None => {
                        // Empty cells still consume grid space.
                        x += cache.width_cols[column] + gap;
                    }
                }
            }
            x = border_x;
            y += cache.height_rows[row] + gap;
        }

        // Accumulated absolute boundaries for page_view_at and the
        // visibility scan.
        self.col_x_start.clear();
        let mut total_width = border_x;
        for column_width in &cache.width_cols {
            total_width += column_width + gap;
            self.col_x_start.push(total_width);
        }

        self.row_y_start.clear();
        let mut total_height = border_y;
        for row_height in &cache.height_rows {
            total_height += row_height + gap;
            self.row_y_start.push(total_height);
        }
    }

    /// Padding above the given page, for arrow-key navigation math.
    ///
    /// # Panics
    /// Panics if `page` is outside the current grid; geometry must have
    /// been computed for the page list that contains it.
    pub fn padding_above_page(&self, page: PageIndex) -> usize {
        let row = self.lock_cache().mapper.at_index(page).row;
        let padding =
            self.vertical_one_side_padding() + row as f64 * f64::from(self.tuning.cell_gap);
        padding.max(0.0).floor() as usize
    }

    /// Padding left of the given page, for arrow-key navigation math.
    ///
    /// # Panics
    /// Panics if `page` is outside the current grid; geometry must have
    /// been computed for the page list that contains it.
    pub fn padding_left_of_page(&self, page: PageIndex) -> usize {
        let cache = self.lock_cache();
        let column = cache.mapper.at_index(page).column;
        let is_paired = cache.mapper.is_paired();
        drop(cache);

        let gap = f64::from(self.tuning.cell_gap);
        let shadow = f64::from(self.tuning.shadow_gap);
        let before = self.horizontal_one_side_padding();

        let padding = if !is_paired {
            column as f64 * gap + gap / 2.0 + before
        } else {
            let column_padding = gap + column as f64 * gap;
            if column % 2 == 0 {
                column_padding - shadow + before
            } else {
                column_padding + shadow + before
            }
        };
        padding.max(0.0).floor() as usize
    }

    /// Page under the given canvas point, if any.
    ///
    /// Binary-searches the boundary arrays for the candidate cell, then
    /// checks the page's exact bounds (pages can be smaller than their
    /// cell due to centering/pairing slack).
    pub fn page_view_at<P: PageView>(&self, pages: &[P], x: f64, y: f64) -> Option<PageIndex> {
        let row = self.row_y_start.partition_point(|&boundary| boundary < y);
        let column = self.col_x_start.partition_point(|&boundary| boundary < x);

        let page = self
            .lock_cache()
            .mapper
            .at_position(GridPosition::new(column, row))?;

        pages
            .get(page.get())
            .filter(|view| view.bounding_rect().contains(x, y))
            .map(|_| page)
    }

    /// Scroll both axes by the given deltas.
    ///
    /// No-op in presentation mode. Re-render-on-zoom work is suspended
    /// for the duration of the scroll burst and resumes after the quiet
    /// period.
    pub fn scroll_relative<P: PageView>(&mut self, pages: &[P], dx: f64, dy: f64) {
        if self.policy.presentation_mode {
            return;
        }
        self.begin_scroll_burst();
        let horizontal = self.horizontal.value();
        self.horizontal.set_value(horizontal + dx);
        let vertical = self.vertical.value();
        self.vertical.set_value(vertical + dy);
        self.horizontal_scroll_changed();
        self.vertical_scroll_changed(pages);
    }

    /// Scroll both axes to the given absolute position.
    ///
    /// No-op in presentation mode; see [`scroll_relative`](Layout::scroll_relative).
    pub fn scroll_abs<P: PageView>(&mut self, pages: &[P], x: f64, y: f64) {
        if self.policy.presentation_mode {
            return;
        }
        self.begin_scroll_burst();
        self.horizontal.set_value(x);
        self.vertical.set_value(y);
        self.horizontal_scroll_changed();
        self.vertical_scroll_changed(pages);
    }

    /// Scroll the minimum amount needed to bring the rectangle (plus a
    /// small margin) into the viewport.
    pub fn ensure_rect_visible<P: PageView>(
        &mut self,
        pages: &[P],
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) {
        clamp_axis(self.horizontal.as_mut(), x - 5.0, x + width + 10.0);
        clamp_axis(self.vertical.as_mut(), y - 5.0, y + height + 10.0);
        self.horizontal_scroll_changed();
        self.vertical_scroll_changed(pages);
    }

    /// Notification entry point: the horizontal scroll position may
    /// have changed. Wire the toolkit's value-changed signal here.
    pub fn horizontal_scroll_changed(&mut self) {
        let current = self.horizontal.value();
        if check_scroll(current, &mut self.last_scroll_horizontal, self.tuning.min_scroll_delta) {
            self.queue_visibility_update();
        }
    }

    /// Notification entry point: the vertical scroll position may have
    /// changed. Wire the toolkit's value-changed signal here.
    ///
    /// Besides the throttled visibility scan this also drives the
    /// end-of-document auto-append check, which is why it needs the
    /// page slice.
    pub fn vertical_scroll_changed<P: PageView>(&mut self, pages: &[P]) {
        let current = self.vertical.value();
        if check_scroll(current, &mut self.last_scroll_vertical, self.tuning.min_scroll_delta) {
            self.queue_visibility_update();
            self.maybe_append_page(pages);
        }
    }

    /// Run a task whose timer has elapsed.
    ///
    /// The host calls this when a timer it runs on the engine's behalf
    /// fires; canceled timers must not be delivered.
    pub fn timer_fired<P: PageView>(&mut self, task: TimerTask, pages: &mut [P]) {
        match task {
            TimerTask::VisibilityScan => {
                self.pending_scan = None;
                self.update_visibility(pages);
            }
            TimerTask::RerenderUnblock => {
                self.pending_unblock = None;
                self.render_gate.unblock_rerender_on_zoom();
            }
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, GeometryCache> {
        // The lock is uncontended in practice; a poisoned guard still
        // holds consistent data because recompute never unwinds midway.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_valid<P: PageView>(&self, cache: &mut GeometryCache, pages: &[P]) {
        if !cache.valid {
            cache.recompute(
                pages,
                &self.policy,
                &self.tuning,
                self.horizontal.page_extent(),
                self.vertical.page_extent(),
            );
        }
    }

    fn horizontal_one_side_padding(&self) -> f64 {
        let mut padding = f64::from(self.tuning.base_padding);
        if self.policy.unlimited_scrolling {
            padding += self.horizontal.page_extent().ceil();
        } else if self.policy.add_horizontal_space {
            padding += f64::from(self.policy.horizontal_space_left);
        }
        padding
    }

    fn vertical_one_side_padding(&self) -> f64 {
        let mut padding = f64::from(self.tuning.base_padding);
        if self.policy.unlimited_scrolling {
            padding += self.vertical.page_extent().ceil();
        } else if self.policy.add_vertical_space {
            padding += f64::from(self.policy.vertical_space_above);
        }
        padding
    }

    /// Throttle gate: at most one scan per interval; further triggers
    /// coalesce into the already-pending timer.
    fn queue_visibility_update(&mut self) {
        if self.pending_scan.is_some() {
            trace!("visibility scan already pending; trigger coalesced");
            return;
        }
        self.pending_scan = Some(
            self.scheduler
                .schedule(self.tuning.scan_throttle, TimerTask::VisibilityScan),
        );
    }

    /// Block re-render work and (re)arm the unblock timer so a burst of
    /// scroll commands unblocks once, after the whole burst quiesces.
    fn begin_scroll_burst(&mut self) {
        self.render_gate.block_rerender_on_zoom();
        if let Some(handle) = self.pending_unblock.take() {
            self.scheduler.cancel(handle);
        }
        self.pending_unblock = Some(
            self.scheduler
                .schedule(self.tuning.rerender_unblock, TimerTask::RerenderUnblock),
        );
    }
}

/// Perceptible-movement filter: sub-delta changes are ignored and do
/// not count as movement.
fn check_scroll(current: f64, last: &mut f64, min_delta: f64) -> bool {
    if (current - *last).abs() < min_delta {
        return false;
    }
    *last = current;
    true
}

/// `gtk_adjustment_clamp_page` semantics: scroll the minimum amount so
/// `[lower, upper]` is inside the viewport; if the range is larger than
/// the viewport, align to `lower`.
fn clamp_axis(axis: &mut dyn ScrollAxis, lower: f64, upper: f64) {
    let extent = axis.page_extent();
    if upper - lower > extent {
        axis.set_value(lower);
        return;
    }
    let value = axis.value();
    if value > lower {
        axis.set_value(lower);
    } else if value + extent < upper {
        axis.set_value(upper - extent);
    }
}

//! End-to-end geometry scenarios.
//!
//! Exercises the full layout path - geometry recompute, placement,
//! boundary arrays, and point/padding queries - against hand-computed
//! expectations for the reference tuning (base padding 10, cell gap 15,
//! shadow gap 3).

use pagegrid::layout::Layout;
use pagegrid::model::{LayoutPolicy, PageIndex};
use pagegrid::page::{CanvasPage, PageView};
use pagegrid::scroll::Adjustment;
use pagegrid::timer::ManualScheduler;

fn engine(policy: LayoutPolicy, viewport: (f64, f64)) -> (Layout, Adjustment, Adjustment) {
    let horizontal = Adjustment::new(viewport.0);
    let vertical = Adjustment::new(viewport.1);
    let layout = Layout::new(
        Box::new(horizontal.clone()),
        Box::new(vertical.clone()),
        Box::new(ManualScheduler::new()),
    )
    .with_policy(policy);
    (layout, horizontal, vertical)
}

fn pages_of(count: usize, width: f64, height: f64) -> Vec<CanvasPage> {
    vec![CanvasPage::new(width, height); count]
}

mod single_column_scenario {
    use super::*;

    /// 3 pages of 100x150, base padding 10, gap 15, no extra spacing:
    /// min_width = 20 + 100 = 120, min_height = 20 + 3*150 + 2*15 = 500.
    #[test]
    fn minimum_canvas_size_matches_sum_of_maxima_formula() {
        let (layout, _, _) = engine(LayoutPolicy::single_column(), (200.0, 200.0));
        let pages = pages_of(3, 100.0, 150.0);
        assert_eq!(layout.min_width(&pages), 120);
        assert_eq!(layout.min_height(&pages), 500);
    }

    #[test]
    fn pages_stack_with_cell_gaps_between_rows() {
        let (mut layout, _, _) = engine(LayoutPolicy::single_column(), (200.0, 200.0));
        let mut pages = pages_of(3, 100.0, 150.0);
        // Container exactly the minimum size: borders fall back to the
        // base padding.
        layout.layout_pages(&mut pages, 120.0, 500.0);

        // Pages are centered inside the column slack plus half a gap.
        assert_eq!(pages[0].position(), (17, 10));
        assert_eq!(pages[1].position(), (17, 175));
        assert_eq!(pages[2].position(), (17, 340));

        assert_eq!(pages[0].mapped_cell(), (0, 0));
        assert_eq!(pages[2].mapped_cell(), (2, 0));
    }

    #[test]
    fn boundary_arrays_are_prefix_sums_of_extents_plus_gaps() {
        let (mut layout, _, _) = engine(LayoutPolicy::single_column(), (200.0, 200.0));
        let mut pages = pages_of(3, 100.0, 150.0);
        layout.layout_pages(&mut pages, 120.0, 500.0);

        assert_eq!(layout.column_boundaries(), &[125.0]);
        assert_eq!(layout.row_boundaries(), &[175.0, 340.0, 505.0]);
    }

    #[test]
    fn minimum_size_is_consistent_with_trailing_boundary() {
        let (mut layout, _, _) = engine(LayoutPolicy::single_column(), (200.0, 200.0));
        let mut pages = pages_of(3, 100.0, 150.0);
        layout.layout_pages(&mut pages, 0.0, 0.0);

        // back boundary - trailing gap + leading border == minimum size
        let last_row = *layout.row_boundaries().last().expect("rows exist");
        assert_eq!(layout.min_height(&pages) as f64, last_row - 15.0 + 10.0);
        let last_col = *layout.column_boundaries().last().expect("columns exist");
        assert_eq!(layout.min_width(&pages) as f64, last_col - 15.0 + 10.0);
    }

    #[test]
    fn oversized_container_centers_the_content() {
        let (mut layout, _, _) = engine(LayoutPolicy::single_column(), (200.0, 200.0));
        let mut pages = pages_of(3, 100.0, 150.0);
        layout.layout_pages(&mut pages, 520.0, 900.0);

        // border_x = (520 - 120) / 2 = 200; border_y = (900 - 500) / 2 = 200
        assert_eq!(pages[0].position(), (207, 200));
        assert_eq!(pages[1].position(), (207, 365));
    }
}

mod paired_scenario {
    use super::*;

    /// 4 pages of 200x300 arranged 2 per row in paired mode.
    #[test]
    fn paired_pages_reserve_the_shadow_gap_inside_each_pair() {
        let (mut layout, _, _) = engine(LayoutPolicy::paired(2), (400.0, 400.0));
        let mut pages = pages_of(4, 200.0, 300.0);

        assert_eq!(layout.min_width(&pages), 20 + 2 * 200 + 15);
        assert_eq!(layout.min_height(&pages), 20 + 2 * 300 + 15);

        layout.layout_pages(&mut pages, 435.0, 635.0);

        // Even column aligns right (shadow on its right), odd column
        // aligns left: asymmetric padding 12/3 then 3/12, summing to
        // the cell gap per pair.
        assert_eq!(pages[0].position(), (22, 10));
        assert_eq!(pages[1].position(), (228, 10));
        assert_eq!(pages[2].position(), (22, 325));
        assert_eq!(pages[3].position(), (228, 325));

        // The two pages of a pair sit 2 * shadow_gap apart.
        let pair_gap = pages[1].bounding_rect().x - pages[0].bounding_rect().right();
        assert_eq!(pair_gap, 6.0);
    }

    #[test]
    fn a_single_page_is_not_pair_aligned() {
        let (mut layout, _, _) = engine(LayoutPolicy::paired(2), (400.0, 400.0));
        let mut pages = pages_of(1, 200.0, 300.0);
        layout.layout_pages(&mut pages, 0.0, 0.0);

        // Pair alignment needs at least two pages; a lone page centers
        // within its column slack (column 1 is empty but still mapped).
        // border 10 + gap/2 7.5 + slack/2 0 = 17.5 -> 17
        assert_eq!(pages[0].position(), (17, 10));
    }
}

mod degenerate_inputs {
    use super::*;

    #[test]
    fn zero_pages_yield_padding_only_minima_and_empty_boundaries() {
        let (mut layout, _, _) = engine(LayoutPolicy::single_column(), (200.0, 200.0));
        let mut pages: Vec<CanvasPage> = Vec::new();
        layout.layout_pages(&mut pages, 300.0, 300.0);

        assert_eq!(layout.min_width(&pages), 20);
        assert_eq!(layout.min_height(&pages), 20);
        // One column is always configured but carries zero extent; zero
        // pages mean zero rows.
        assert_eq!(layout.column_boundaries().len(), 1);
        assert!(layout.row_boundaries().is_empty());
    }

    #[test]
    fn zero_size_container_falls_back_to_base_padding_borders() {
        let (mut layout, _, _) = engine(LayoutPolicy::single_column(), (200.0, 200.0));
        let mut pages = pages_of(1, 100.0, 150.0);
        layout.layout_pages(&mut pages, 0.0, 0.0);
        assert_eq!(pages[0].position(), (17, 10));
    }
}

mod point_queries {
    use super::*;

    fn laid_out_grid() -> (Layout, Vec<CanvasPage>) {
        let (mut layout, _, _) = engine(LayoutPolicy::with_columns(2), (400.0, 400.0));
        let mut pages = pages_of(4, 100.0, 150.0);
        layout.layout_pages(&mut pages, 0.0, 0.0);
        (layout, pages)
    }

    #[test]
    fn page_view_at_finds_the_page_under_the_point() {
        let (layout, pages) = laid_out_grid();
        // Page 0 sits at (17, 10)..(117, 160).
        assert_eq!(layout.page_view_at(&pages, 50.0, 50.0), Some(PageIndex::new(0)));
        // Page 3 is in the second row, second column.
        let (x3, y3) = pages[3].position();
        assert_eq!(
            layout.page_view_at(&pages, x3 as f64 + 1.0, y3 as f64 + 1.0),
            Some(PageIndex::new(3))
        );
    }

    #[test]
    fn page_view_at_misses_in_the_gaps_between_pages() {
        let (layout, pages) = laid_out_grid();
        // Between the two columns: page 0 ends at 117, page 1 starts at 132.
        assert_eq!(layout.page_view_at(&pages, 125.0, 50.0), None);
    }

    #[test]
    fn page_view_at_misses_past_the_grid() {
        let (layout, pages) = laid_out_grid();
        assert_eq!(layout.page_view_at(&pages, 10_000.0, 10_000.0), None);
    }

    #[test]
    fn grid_map_query_reports_occupied_and_empty_cells() {
        let (mut layout, _, _) = engine(LayoutPolicy::with_columns(2), (400.0, 400.0));
        let mut pages = pages_of(3, 100.0, 150.0);
        layout.layout_pages(&mut pages, 0.0, 0.0);

        assert_eq!(layout.page_index_at_grid(0, 0), Some(PageIndex::new(0)));
        assert_eq!(layout.page_index_at_grid(0, 1), Some(PageIndex::new(1)));
        assert_eq!(layout.page_index_at_grid(1, 0), Some(PageIndex::new(2)));
        // Trailing cell of the incomplete last row.
        assert_eq!(layout.page_index_at_grid(1, 1), None);
    }
}

mod padding_queries {
    use super::*;

    #[test]
    fn padding_above_accumulates_row_gaps() {
        let (layout, _, _) = engine(LayoutPolicy::single_column(), (200.0, 200.0));
        let pages = pages_of(3, 100.0, 150.0);
        // Prime the geometry so the mapper knows the grid.
        let _ = layout.min_height(&pages);

        assert_eq!(layout.padding_above_page(PageIndex::new(0)), 10);
        assert_eq!(layout.padding_above_page(PageIndex::new(1)), 25);
        assert_eq!(layout.padding_above_page(PageIndex::new(2)), 40);
    }

    #[test]
    fn padding_left_centers_in_unpaired_mode() {
        let (layout, _, _) = engine(LayoutPolicy::with_columns(2), (200.0, 200.0));
        let pages = pages_of(4, 100.0, 150.0);
        let _ = layout.min_width(&pages);

        // col * gap + gap/2 + base: 7.5 + 10 -> 17, 15 + 7.5 + 10 -> 32
        assert_eq!(layout.padding_left_of_page(PageIndex::new(0)), 17);
        assert_eq!(layout.padding_left_of_page(PageIndex::new(1)), 32);
    }

    #[test]
    fn padding_left_is_shadow_asymmetric_in_paired_mode() {
        let (layout, _, _) = engine(LayoutPolicy::paired(2), (200.0, 200.0));
        let pages = pages_of(4, 200.0, 300.0);
        let _ = layout.min_width(&pages);

        // Even column: gap - shadow + base; odd: 2*gap + shadow + base.
        assert_eq!(layout.padding_left_of_page(PageIndex::new(0)), 22);
        assert_eq!(layout.padding_left_of_page(PageIndex::new(1)), 43);
    }

    #[test]
    fn vertical_extra_space_shifts_padding_above() {
        let policy = LayoutPolicy {
            add_vertical_space: true,
            vertical_space_above: 30,
            ..LayoutPolicy::single_column()
        };
        let (layout, _, _) = engine(policy, (200.0, 200.0));
        let pages = pages_of(2, 100.0, 150.0);
        let _ = layout.min_height(&pages);

        assert_eq!(layout.padding_above_page(PageIndex::new(0)), 40);
        assert_eq!(layout.padding_above_page(PageIndex::new(1)), 55);
    }
}

mod size_changes {
    use super::*;

    #[test]
    fn page_size_changes_apply_after_recalculate() {
        let (mut layout, _, _) = engine(LayoutPolicy::single_column(), (200.0, 200.0));
        let mut pages = pages_of(2, 100.0, 150.0);
        layout.layout_pages(&mut pages, 0.0, 0.0);
        assert_eq!(layout.min_height(&pages), 20 + 300 + 15);

        // The engine does not watch pages for mutation; stale geometry
        // is served until the collaborator calls back in.
        pages[0].set_display_size(100.0, 400.0);
        assert_eq!(layout.min_height(&pages), 20 + 300 + 15);

        layout.recalculate();
        assert_eq!(layout.min_height(&pages), 20 + 550 + 15);
    }

    #[test]
    fn policy_changes_invalidate_geometry() {
        let (mut layout, _, _) = engine(LayoutPolicy::single_column(), (200.0, 200.0));
        let pages = pages_of(4, 100.0, 150.0);
        assert_eq!(layout.min_width(&pages), 120);

        layout.set_policy(LayoutPolicy::with_columns(2));
        assert_eq!(layout.min_width(&pages), 20 + 200 + 15);
    }
}

mod ensure_visible {
    use super::*;

    #[test]
    fn scrolls_down_minimally_to_reveal_the_rect() {
        let (mut layout, horizontal, vertical) = engine(LayoutPolicy::single_column(), (200.0, 200.0));
        let mut pages = pages_of(3, 100.0, 150.0);
        layout.layout_pages(&mut pages, 200.0, 200.0);

        layout.ensure_rect_visible(&pages, 17.0, 340.0, 100.0, 150.0);
        // Vertical target range is [335, 500]; viewport 200 -> value 300.
        assert_eq!(vertical.value(), 300.0);
        // Horizontal range [12, 127] is already inside [0, 200].
        assert_eq!(horizontal.value(), 0.0);
    }

    #[test]
    fn scrolls_back_up_when_rect_is_above_the_viewport() {
        let (mut layout, _, vertical) = engine(LayoutPolicy::single_column(), (200.0, 200.0));
        let mut pages = pages_of(3, 100.0, 150.0);
        layout.layout_pages(&mut pages, 200.0, 200.0);

        vertical.set_value(400.0);
        layout.vertical_scroll_changed(&pages);
        layout.ensure_rect_visible(&pages, 17.0, 10.0, 100.0, 150.0);
        assert_eq!(vertical.value(), 5.0);
    }
}

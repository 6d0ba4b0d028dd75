//! Grid mapping - linear page index to/from `(column, row)` cells.
//!
//! A pure function of `(page_count, policy)`: reconfiguring with the
//! same inputs always yields the same mapping, so callers may treat the
//! mapper as cheap to consult repeatedly.

use crate::model::{GridPosition, LayoutPolicy, PageIndex};

/// Maps page indices to grid cells under the configured layout policy.
///
/// Pages fill the grid row-major. In paired-pages mode the column count
/// is rounded up to the next even number so columns group in twos; the
/// even column of each pair holds the right-aligned page and the odd
/// column the left-aligned page, which the placer uses for shadow-aware
/// spacing.
///
/// # Examples
///
/// ```
/// use pagegrid::grid::GridMapper;
/// use pagegrid::model::{GridPosition, LayoutPolicy, PageIndex};
///
/// let mut mapper = GridMapper::new();
/// mapper.configure(5, &LayoutPolicy::with_columns(2));
///
/// assert_eq!(mapper.rows(), 3);
/// assert_eq!(mapper.at_index(PageIndex::new(3)), GridPosition::new(1, 1));
/// assert_eq!(mapper.at_position(GridPosition::new(1, 1)), Some(PageIndex::new(3)));
/// // Trailing cell of the incomplete last row is empty.
/// assert_eq!(mapper.at_position(GridPosition::new(1, 2)), None);
/// ```
#[derive(Debug, Clone)]
pub struct GridMapper {
    columns: usize,
    rows: usize,
    page_count: usize,
    paired: bool,
}

impl GridMapper {
    /// Create an unconfigured mapper for an empty document.
    pub fn new() -> Self {
        Self { columns: 1, rows: 0, page_count: 0, paired: false }
    }

    /// Recompute column/row counts and the mapping for the given page
    /// count and policy.
    pub fn configure(&mut self, page_count: usize, policy: &LayoutPolicy) {
        let mut columns = policy.columns.max(1);
        if policy.paired_pages {
            // Pair columns in twos; an odd column count gains a column.
            columns += columns % 2;
        }

        self.columns = columns;
        self.rows = page_count.div_ceil(columns);
        self.page_count = page_count;
        self.paired = policy.paired_pages;
    }

    /// Number of grid columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of grid rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of pages mapped into the grid.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// True when the paired-pages layout rule is active.
    pub fn is_paired(&self) -> bool {
        self.paired
    }

    /// Grid cell of the given page.
    ///
    /// # Panics
    /// Panics if `page` is outside the configured page count.
    pub fn at_index(&self, page: PageIndex) -> GridPosition {
        assert!(
            page.get() < self.page_count,
            "page index {} out of bounds (page count: {})",
            page.get(),
            self.page_count
        );
        GridPosition::new(page.get() % self.columns, page.get() / self.columns)
    }

    /// Page hosted by the given cell, or `None` for an empty cell.
    pub fn at_position(&self, position: GridPosition) -> Option<PageIndex> {
        if position.column >= self.columns || position.row >= self.rows {
            return None;
        }
        let index = position.row * self.columns + position.column;
        (index < self.page_count).then(|| PageIndex::new(index))
    }
}

impl Default for GridMapper {
    fn default() -> Self {
        Self::new()
    }
}

//! Layout policy snapshot
//!
//! A [`LayoutPolicy`] is the engine's immutable view of the host
//! application's settings, captured at the moment a policy is installed.
//! The engine never reads settings storage itself; the host hands it a
//! fresh snapshot (and thereby invalidates cached geometry) whenever the
//! user changes anything layout-relevant.

/// When the engine should ask the document owner to append a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppendPolicy {
    /// Never auto-append.
    #[default]
    Disabled,
    /// Append an empty page when the user scrolls to the end of the
    /// last page of a freeform document.
    OnScrollToEndOfLastPage,
}

/// Snapshot of the layout-relevant settings, consumed on each recompute.
///
/// Extra-space amounts are whole pixels and only take effect when the
/// corresponding `add_*_space` flag is set. Unlimited scrolling takes
/// precedence over fixed extra space on both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPolicy {
    /// Number of grid columns; values below 1 are treated as 1.
    pub columns: usize,
    /// Present pages two-per-row like a bound book spread.
    pub paired_pages: bool,
    /// Pad each axis by two viewport extents so the user can scroll a
    /// full screen past the content edge on both sides.
    pub unlimited_scrolling: bool,
    /// Enable the fixed vertical extra-space amounts.
    pub add_vertical_space: bool,
    /// Extra pixels above the first row.
    pub vertical_space_above: u32,
    /// Extra pixels below the last row.
    pub vertical_space_below: u32,
    /// Enable the fixed horizontal extra-space amounts.
    pub add_horizontal_space: bool,
    /// Extra pixels left of the first column.
    pub horizontal_space_left: u32,
    /// Extra pixels right of the last column.
    pub horizontal_space_right: u32,
    /// Full-screen presentation mode; programmatic scrolling is a no-op
    /// while active (that mode manages its own navigation).
    pub presentation_mode: bool,
    /// Auto-append behavior at the end of the last page.
    pub empty_last_page_append: AppendPolicy,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            columns: 1,
            paired_pages: false,
            unlimited_scrolling: false,
            add_vertical_space: false,
            vertical_space_above: 0,
            vertical_space_below: 0,
            add_horizontal_space: false,
            horizontal_space_left: 0,
            horizontal_space_right: 0,
            presentation_mode: false,
            empty_last_page_append: AppendPolicy::Disabled,
        }
    }
}

impl LayoutPolicy {
    /// Single-column policy with everything else off.
    pub fn single_column() -> Self {
        Self::default()
    }

    /// Policy with the given column count and everything else off.
    pub fn with_columns(columns: usize) -> Self {
        Self { columns, ..Self::default() }
    }

    /// Paired-pages policy over the given column count.
    pub fn paired(columns: usize) -> Self {
        Self { columns, paired_pages: true, ..Self::default() }
    }
}

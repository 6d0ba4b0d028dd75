//! Headless page-grid layout and viewport-visibility engine.
//!
//! `pagegrid` arranges an ordered collection of variable-size document
//! pages into a 2D grid, computes the pixel geometry of that grid under
//! a set of layout policies (paired pages, extra spacing, unlimited
//! scrolling), and - on every scroll or resize event - determines in
//! sub-frame time which pages are visible, which single page is
//! selected (most visible), and whether a new page must be
//! auto-appended because the user scrolled to the end.
//!
//! The crate is intentionally UI-agnostic: it holds no toolkit objects
//! and never owns pages. A host adapter drives it by passing the page
//! slice into each operation, forwarding its toolkit's scroll signals,
//! and running the engine's cancelable timers.
//!
//! ```
//! use pagegrid::layout::Layout;
//! use pagegrid::model::LayoutPolicy;
//! use pagegrid::page::CanvasPage;
//! use pagegrid::scroll::Adjustment;
//! use pagegrid::timer::ManualScheduler;
//!
//! let horizontal = Adjustment::new(800.0);
//! let vertical = Adjustment::new(600.0);
//! let mut layout = Layout::new(
//!     Box::new(horizontal),
//!     Box::new(vertical),
//!     Box::new(ManualScheduler::new()),
//! )
//! .with_policy(LayoutPolicy::with_columns(2));
//!
//! let mut pages = vec![CanvasPage::new(100.0, 150.0); 4];
//! layout.layout_pages(&mut pages, 800.0, 600.0);
//!
//! assert!(layout.min_width(&pages) > 0);
//! ```

pub mod config;
pub mod grid;
pub mod layout;
pub mod logging;
pub mod model;
pub mod page;
pub mod ports;
pub mod scroll;
pub mod timer;

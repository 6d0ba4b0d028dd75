//! Outward-facing collaborator interfaces.
//!
//! The engine's effects on the rest of the application go through these
//! three narrow traits: page insertion requests, re-render gating, and
//! page-selection notifications. No-op implementations are provided for
//! hosts that don't care about a particular channel.

use crate::model::PageIndex;

/// The document owner, asked to insert pages on auto-append.
pub trait DocumentHost {
    /// Number of embedded source pages (e.g. imported PDF pages).
    ///
    /// Auto-append only applies to freeform documents, where this is 0.
    fn source_page_count(&self) -> usize;

    /// Insert a new empty page immediately after `after`.
    ///
    /// `as_last` is true when the new page becomes the document's last
    /// page. The owner must call `Layout::recalculate` once the page
    /// list has changed.
    fn insert_page(&mut self, after: PageIndex, as_last: bool);
}

/// The rendering scheduler, told to suspend expensive re-render-on-zoom
/// work while a scroll burst is in flight.
pub trait RenderGate {
    /// Suspend re-render-on-zoom work.
    fn block_rerender_on_zoom(&mut self);

    /// Resume re-render-on-zoom work after scrolling has settled.
    fn unblock_rerender_on_zoom(&mut self);
}

/// Receiver of page-selection notifications.
pub trait SelectionObserver {
    /// The most-visible page changed.
    fn page_selected(&mut self, page: PageIndex);
}

/// [`DocumentHost`] that reports a freeform document and drops
/// insertion requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDocumentHost;

impl DocumentHost for NoopDocumentHost {
    fn source_page_count(&self) -> usize {
        0
    }

    fn insert_page(&mut self, _after: PageIndex, _as_last: bool) {}
}

/// [`RenderGate`] that ignores both signals.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderGate;

impl RenderGate for NoopRenderGate {
    fn block_rerender_on_zoom(&mut self) {}

    fn unblock_rerender_on_zoom(&mut self) {}
}

/// [`SelectionObserver`] that ignores notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSelectionObserver;

impl SelectionObserver for NoopSelectionObserver {
    fn page_selected(&mut self, _page: PageIndex) {}
}

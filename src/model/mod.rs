//! Core domain types for the layout engine.
//!
//! - `types`: newtypes ([`PageIndex`], [`GridPosition`])
//! - `rect`: canvas-coordinate rectangles ([`Rect`])
//! - `policy`: settings snapshot ([`LayoutPolicy`], [`AppendPolicy`])

pub mod policy;
pub mod rect;
pub mod types;

pub use policy::{AppendPolicy, LayoutPolicy};
pub use rect::Rect;
pub use types::{GridPosition, PageIndex};

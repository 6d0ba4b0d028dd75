//! Spacing and timing tuning constants, with optional TOML overrides.
//!
//! The defaults are the empirically tuned values from the reference
//! canvas (tablet-clearance padding of 10 px, 15 px between cells, a
//! 3 px shadow allowance inside page pairs, a ~30 fps scan throttle).
//! None of them are load-bearing for correctness, only for visual
//! polish, so they are exposed as configuration rather than hardcoded
//! invariants. A host can override any subset from
//! `~/.config/pagegrid/config.toml`.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading a tuning file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read the tuning file (missing permissions, I/O failure).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// The tuning file contains invalid TOML or unknown fields.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// Resolved tuning constants used by the engine.
///
/// Distances are whole pixels; the scroll delta and append tolerance
/// are fractional pixel-equivalent units because scroll positions are
/// `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    /// Padding outside the page area on each edge, including shadow.
    /// Leaves clearance for tablet sensors with a limited sense area.
    pub base_padding: u32,
    /// Padding between grid cells.
    pub cell_gap: u32,
    /// Allowance for shadow between the two pages of a pair.
    pub shadow_gap: u32,
    /// Minimum interval between visibility scans under heavy scroll
    /// event volume (~30 fps at the default).
    pub scan_throttle: Duration,
    /// Quiet period after the last scroll command before re-render-on-
    /// zoom work is unblocked again.
    pub rerender_unblock: Duration,
    /// Scroll-position changes smaller than this are ignored.
    pub min_scroll_delta: f64,
    /// How close (in pixels) the viewport bottom must be to the canvas
    /// end before an empty page is auto-appended.
    pub append_tolerance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_padding: 10,
            cell_gap: 15,
            shadow_gap: 3,
            scan_throttle: Duration::from_millis(33),
            rerender_unblock: Duration::from_millis(1000),
            min_scroll_delta: 1.0,
            append_tolerance: 5.0,
        }
    }
}

/// TOML tuning file structure.
///
/// All fields are optional - unspecified fields keep their defaults.
/// Corresponds to `~/.config/pagegrid/config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct TuningFile {
    /// Overrides [`Tuning::base_padding`].
    #[serde(default)]
    pub base_padding: Option<u32>,

    /// Overrides [`Tuning::cell_gap`].
    #[serde(default)]
    pub cell_gap: Option<u32>,

    /// Overrides [`Tuning::shadow_gap`].
    #[serde(default)]
    pub shadow_gap: Option<u32>,

    /// Overrides [`Tuning::scan_throttle`], in milliseconds.
    #[serde(default)]
    pub scan_throttle_ms: Option<u64>,

    /// Overrides [`Tuning::rerender_unblock`], in milliseconds.
    #[serde(default)]
    pub rerender_unblock_ms: Option<u64>,

    /// Overrides [`Tuning::min_scroll_delta`].
    #[serde(default)]
    pub min_scroll_delta: Option<f64>,

    /// Overrides [`Tuning::append_tolerance`].
    #[serde(default)]
    pub append_tolerance: Option<f64>,
}

impl TuningFile {
    /// Parse a tuning file from TOML text.
    ///
    /// `path` is only used for error reporting.
    pub fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|err| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Load a tuning file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|err| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        Self::parse(path, &contents)
    }

    /// Apply the overrides in this file on top of `base`.
    pub fn apply_to(&self, base: Tuning) -> Tuning {
        Tuning {
            base_padding: self.base_padding.unwrap_or(base.base_padding),
            cell_gap: self.cell_gap.unwrap_or(base.cell_gap),
            shadow_gap: self.shadow_gap.unwrap_or(base.shadow_gap),
            scan_throttle: self
                .scan_throttle_ms
                .map(Duration::from_millis)
                .unwrap_or(base.scan_throttle),
            rerender_unblock: self
                .rerender_unblock_ms
                .map(Duration::from_millis)
                .unwrap_or(base.rerender_unblock),
            min_scroll_delta: self.min_scroll_delta.unwrap_or(base.min_scroll_delta),
            append_tolerance: self.append_tolerance.unwrap_or(base.append_tolerance),
        }
    }
}

/// Default tuning-file location: `<config dir>/pagegrid/config.toml`.
///
/// Returns `None` when the platform exposes no config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pagegrid").join("config.toml"))
}

impl Tuning {
    /// Load tuning from the default config path.
    ///
    /// A missing file (or platform without a config directory) yields
    /// the defaults; an unreadable or invalid file is an error.
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Ok(TuningFile::load(&path)?.apply_to(Self::default())),
            _ => Ok(Self::default()),
        }
    }
}

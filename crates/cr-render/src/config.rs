// SPDX-License-Identifier: MIT
//
// Renderer configuration.
//
// Plain data with defaults that work everywhere. Each field can be set in
// code with a `with_*` builder or overridden from the environment:
//
//   CR_CELL_WIDTH      pixel width of one cell          (8)
//   CR_CELL_HEIGHT     pixel height of one cell         (16)
//   CR_MAX_CLIP_DEPTH  clip stack entries incl. base    (16)
//   CR_PAIR_CAPACITY   color pairs the cache hands out  (1024)
//   CR_SWEEP           blank cells no command touched   (1)
//   CR_GRAYSCALE       gray-ramp color refinement       (0)
//
// A value that doesn't parse is logged and ignored. Color depth is not
// here: it belongs to the backend, which knows the terminal.

use std::str::FromStr;

use crate::clip::DEFAULT_MAX_DEPTH;
use crate::color::{DEFAULT_PAIR_CAPACITY, Rgba};
use crate::geometry::CellSize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Pixel size of one terminal cell. Fixed for the renderer's lifetime.
    pub cell_size: CellSize,
    /// Clip stack capacity, the full-screen base included.
    pub max_clip_depth: usize,
    /// Distinct color pairs handed out before falling back to pair 0.
    /// Further limited by what the backend supports.
    pub pair_capacity: usize,
    /// Reset cells no command touched this frame to blank.
    pub sweep_stale_cells: bool,
    /// Let near-gray colors use the 256-color gray ramp.
    pub grayscale_refinement: bool,
    /// Color of text commands that don't carry one.
    pub default_text_color: Rgba,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_size: CellSize::DEFAULT,
            max_clip_depth: DEFAULT_MAX_DEPTH,
            pair_capacity: DEFAULT_PAIR_CAPACITY,
            sweep_stale_cells: true,
            grayscale_refinement: false,
            default_text_color: Rgba::WHITE,
        }
    }
}

impl RenderConfig {
    #[must_use]
    pub const fn with_cell_size(mut self, cell_size: CellSize) -> Self {
        self.cell_size = cell_size;
        self
    }

    #[must_use]
    pub const fn with_max_clip_depth(mut self, depth: usize) -> Self {
        self.max_clip_depth = depth;
        self
    }

    #[must_use]
    pub const fn with_pair_capacity(mut self, capacity: usize) -> Self {
        self.pair_capacity = capacity;
        self
    }

    #[must_use]
    pub const fn with_sweep(mut self, sweep: bool) -> Self {
        self.sweep_stale_cells = sweep;
        self
    }

    #[must_use]
    pub const fn with_grayscale(mut self, grayscale: bool) -> Self {
        self.grayscale_refinement = grayscale;
        self
    }

    #[must_use]
    pub const fn with_default_text_color(mut self, color: Rgba) -> Self {
        self.default_text_color = color;
        self
    }

    /// Defaults overridden from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden from an environment lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(w) = parse::<f32>(&lookup, "CR_CELL_WIDTH").filter(|&w| valid_cell(w)) {
            config.cell_size.width = w;
        }
        if let Some(h) = parse::<f32>(&lookup, "CR_CELL_HEIGHT").filter(|&h| valid_cell(h)) {
            config.cell_size.height = h;
        }
        if let Some(depth) = parse::<usize>(&lookup, "CR_MAX_CLIP_DEPTH").filter(|&d| d > 0) {
            config.max_clip_depth = depth;
        }
        if let Some(capacity) = parse::<usize>(&lookup, "CR_PAIR_CAPACITY") {
            config.pair_capacity = capacity;
        }
        if let Some(sweep) = flag(&lookup, "CR_SWEEP") {
            config.sweep_stale_cells = sweep;
        }
        if let Some(gray) = flag(&lookup, "CR_GRAYSCALE") {
            config.grayscale_refinement = gray;
        }

        config
    }
}

fn valid_cell(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

/// Parse `key`, warning about values that don't parse.
fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        tracing::warn!(key, value = raw.as_str(), "ignoring invalid setting");
    }
    parsed
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    let raw = lookup(key)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!(key, value = raw.as_str(), "ignoring invalid flag");
            None
        }
    }
}

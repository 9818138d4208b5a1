// SPDX-License-Identifier: MIT
//
// Clip stack: nested scissor regions in cell space.
//
// The bottom entry is the full screen. Every push intersects the new region
// with the current top, so an entry is always inside the one below it.
// Every draw asks `intersect_draw` first and skips itself when the answer
// is `None`.
//
// Depth is bounded. A push past the bound is dropped: clipping simply stops
// tightening there, and the stack stays balanced because the matching pop
// is dropped too (see `pop`).

use crate::geometry::CellRect;

/// Entries the stack holds by default, the full-screen base included.
pub const DEFAULT_MAX_DEPTH: usize = 16;

#[derive(Debug, Clone)]
pub struct ClipStack {
    entries: Vec<CellRect>,
    max_depth: usize,
    /// Pushes dropped at capacity and not yet matched by a pop.
    dropped: usize,
    overflows: usize,
}

impl ClipStack {
    /// A stack holding up to `max_depth` entries (at least one: the base).
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            entries: Vec::with_capacity(max_depth),
            max_depth,
            dropped: 0,
            overflows: 0,
        }
    }

    /// Clear to a single full-screen entry.
    pub fn reset(&mut self, screen: CellRect) {
        self.entries.clear();
        self.entries.push(screen);
        self.dropped = 0;
        self.overflows = 0;
    }

    /// Narrow the clip to `region ∩ top`.
    ///
    /// Returns `false` when the stack is full and the push was dropped.
    pub fn push(&mut self, region: CellRect) -> bool {
        if self.entries.len() >= self.max_depth {
            self.dropped += 1;
            self.overflows += 1;
            if self.overflows == 1 {
                tracing::warn!(
                    max_depth = self.max_depth,
                    "clip stack full; nested scissor ignored"
                );
            }
            return false;
        }
        let top = self.top();
        // An empty intersection is kept as an empty entry so everything
        // drawn inside it is suppressed.
        let next = top
            .intersect(region)
            .unwrap_or_else(|| CellRect::new(top.x, top.y, 0, 0));
        self.entries.push(next);
        true
    }

    /// Drop the innermost region. Popping with nothing pushed is a no-op.
    pub fn pop(&mut self) {
        // A pop matching a dropped push must not remove a real entry.
        if self.dropped > 0 {
            self.dropped -= 1;
        } else if self.entries.len() > 1 {
            self.entries.pop();
        }
    }

    /// The active clip region.
    #[must_use]
    pub fn top(&self) -> CellRect {
        self.entries.last().copied().unwrap_or_default()
    }

    /// Regions pushed above the base.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    /// Pushes dropped since the last reset.
    #[must_use]
    pub const fn overflows(&self) -> usize {
        self.overflows
    }

    /// Clip a draw against the active region; `None` means draw nothing.
    #[must_use]
    pub fn intersect_draw(&self, rect: CellRect) -> Option<CellRect> {
        self.top().intersect(rect)
    }
}

impl Default for ClipStack {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

// SPDX-License-Identifier: MIT
//
// ScreenBuffer: the grid of cells the terminal is currently showing.
//
// Backends keep one of these as their model of the screen. Reads answer
// "what is at (x, y) right now", which the paint engine compares against
// before every write. Writes land in the grid and mark the cell dirty; the
// next flush encodes exactly the dirty cells and clears the marks.
//
// Layout is a flat row-major `Vec<Cell>` (`index = y * width + x`) with a
// parallel `Vec<bool>` dirty mask, so flush is one linear scan.
//
// Wide characters: writing over either half of an existing wide character
// breaks it. The orphaned other half becomes a blank on the pair it had,
// and is marked dirty too.

use std::fmt;

use crate::cell::Cell;
use crate::terminal::Size;

/// The on-screen cell grid with per-cell dirty tracking.
///
/// ```
/// use cr_term::cell::{Cell, PairId};
/// use cr_term::screen::ScreenBuffer;
/// use cr_term::terminal::Size;
///
/// let mut screen = ScreenBuffer::new(Size::new(10, 2));
/// screen.set(3, 1, Cell::new('X', PairId(1)));
/// assert_eq!(screen.get(3, 1).and_then(Cell::character), Some('X'));
/// assert_eq!(screen.dirty_count(), 1);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ScreenBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    dirty: Vec<bool>,
}

impl ScreenBuffer {
    /// A blank grid with nothing dirty.
    #[must_use]
    pub fn new(size: Size) -> Self {
        let len = usize::from(size.cols) * usize::from(size.rows);
        Self {
            width: size.cols,
            height: size.rows,
            cells: vec![Cell::BLANK; len],
            dirty: vec![false; len],
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// The cell at `(x, y)`, or `None` out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.in_bounds(x, y).then(|| self.cells[self.index(x, y)])
    }

    /// A row as a slice.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        (y < self.height).then(|| {
            let start = self.index(0, y);
            &self.cells[start..start + usize::from(self.width)]
        })
    }

    /// The visible text of a row: continuation cells are skipped, so a
    /// wide glyph appears once.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .map(|cells| cells.iter().filter_map(|c| c.character()).collect())
            .unwrap_or_default()
    }

    // ─── Writes ──────────────────────────────────────────────────────────

    /// Store `cell` at `(x, y)` and mark it dirty.
    ///
    /// Returns `false` (and does nothing) out of bounds.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.break_wide_char_at(x, y);
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        self.dirty[idx] = true;
        true
    }

    /// Resize to `size`. Contents reset to blank; nothing is dirty, since
    /// the caller is expected to clear the physical screen as well.
    pub fn resize(&mut self, size: Size) {
        let len = usize::from(size.cols) * usize::from(size.rows);
        self.width = size.cols;
        self.height = size.rows;
        self.cells.clear();
        self.cells.resize(len, Cell::BLANK);
        self.dirty.clear();
        self.dirty.resize(len, false);
    }

    fn break_wide_char_at(&mut self, x: u16, y: u16) {
        let idx = self.index(x, y);

        if self.cells[idx].is_continuation() && x > 0 {
            let prev = idx - 1;
            self.cells[prev].ch = u32::from(b' ');
            self.dirty[prev] = true;
        }

        if x + 1 < self.width {
            let next = idx + 1;
            if self.cells[next].is_continuation() {
                self.cells[next].ch = u32::from(b' ');
                self.dirty[next] = true;
            }
        }
    }

    // ─── Dirty Tracking ──────────────────────────────────────────────────

    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.dirty.iter().filter(|d| **d).count()
    }

    /// Mark every cell dirty, so the next flush repaints the whole screen.
    pub fn mark_all_dirty(&mut self) {
        self.dirty.fill(true);
    }

    /// Visit dirty cells in row-major order, clearing their marks.
    #[allow(clippy::cast_possible_truncation)]
    pub fn drain_dirty(&mut self, mut visit: impl FnMut(u16, u16, Cell)) {
        let w = usize::from(self.width).max(1);
        for (i, flag) in self.dirty.iter_mut().enumerate() {
            if std::mem::take(flag) {
                // x < width and y < height, both u16.
                visit((i % w) as u16, (i / w) as u16, self.cells[i]);
            }
        }
    }
}

impl fmt::Debug for ScreenBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ScreenBuffer {}x{}", self.width, self.height)?;
        for y in 0..self.height {
            writeln!(f, "|{}|", self.row_text(y))?;
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

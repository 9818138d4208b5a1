// SPDX-License-Identifier: MIT
//
// VirtualTerminal: an in-memory terminal.
//
// Implements `TerminalBackend` with no device behind it. The grid, pair
// table, and input queue are plain data, and every call is counted, so tests
// can assert exactly how many cells a frame wrote and what ended up where.
// A size change can be scheduled to simulate the user resizing the window;
// it takes effect at the next `size()` query, the way a real terminal's
// new size is only seen when asked.

use std::collections::VecDeque;
use std::io;

use crate::backend::{DEFAULT_MAX_PAIRS, PairTable, TerminalBackend};
use crate::cell::{Cell, PairId};
use crate::color::{ColorDepth, TermColor};
use crate::input::Event;
use crate::screen::ScreenBuffer;
use crate::terminal::Size;

/// An in-memory [`TerminalBackend`].
///
/// ```
/// use cr_term::backend::TerminalBackend;
/// use cr_term::cell::{Cell, PairId};
/// use cr_term::virtual_term::VirtualTerminal;
///
/// let mut vt = VirtualTerminal::new(10, 5);
/// vt.write_cell(1, 1, Cell::new('h', PairId(0)));
/// assert_eq!(vt.cell_writes(), 1);
/// assert_eq!(vt.row_text(1), " h        ");
/// ```
#[derive(Debug, Clone)]
pub struct VirtualTerminal {
    screen: ScreenBuffer,
    pairs: PairTable,
    depth: ColorDepth,
    active: bool,
    pending_size: Option<Size>,
    input: VecDeque<Event>,
    cell_writes: usize,
    flushes: usize,
    enter_calls: usize,
    leave_calls: usize,
    resizes: usize,
}

impl VirtualTerminal {
    /// A blank `cols × rows` 256-color terminal.
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            screen: ScreenBuffer::new(Size::new(cols, rows)),
            pairs: PairTable::new(DEFAULT_MAX_PAIRS),
            depth: ColorDepth::Ansi256,
            active: false,
            pending_size: None,
            input: VecDeque::new(),
            cell_writes: 0,
            flushes: 0,
            enter_calls: 0,
            leave_calls: 0,
            resizes: 0,
        }
    }

    #[must_use]
    pub const fn with_color_depth(mut self, depth: ColorDepth) -> Self {
        self.depth = depth;
        self
    }

    #[must_use]
    pub fn with_max_pairs(mut self, max: u16) -> Self {
        self.pairs = PairTable::new(max.max(1));
        self
    }

    /// Schedule a resize, seen at the next [`size`](TerminalBackend::size).
    pub const fn resize(&mut self, cols: u16, rows: u16) {
        self.pending_size = Some(Size::new(cols, rows));
    }

    /// Queue an input event for [`poll_event`](TerminalBackend::poll_event).
    pub fn push_event(&mut self, event: Event) {
        self.input.push_back(event);
    }

    // ─── Inspection ──────────────────────────────────────────────────────

    #[must_use]
    pub const fn screen(&self) -> &ScreenBuffer {
        &self.screen
    }

    /// The cell at `(x, y)`; panics off-screen, which in a test is a bug.
    #[must_use]
    pub fn cell(&self, x: u16, y: u16) -> Cell {
        self.screen
            .get(x, y)
            .unwrap_or_else(|| panic!("({x}, {y}) is outside {:?}", self.screen.size()))
    }

    /// Character and resolved colors at `(x, y)`.
    #[must_use]
    pub fn styled_cell(&self, x: u16, y: u16) -> (Option<char>, TermColor, TermColor) {
        let cell = self.cell(x, y);
        let (fg, bg) = self.pairs.get(cell.pair);
        (cell.character(), fg, bg)
    }

    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.screen.row_text(y)
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// In-bounds `write_cell` calls since the last [`reset_counters`].
    ///
    /// [`reset_counters`]: Self::reset_counters
    #[must_use]
    pub const fn cell_writes(&self) -> usize {
        self.cell_writes
    }

    #[must_use]
    pub const fn flushes(&self) -> usize {
        self.flushes
    }

    #[must_use]
    pub const fn enter_calls(&self) -> usize {
        self.enter_calls
    }

    #[must_use]
    pub const fn leave_calls(&self) -> usize {
        self.leave_calls
    }

    /// Size changes observed through `size()`.
    #[must_use]
    pub const fn resizes(&self) -> usize {
        self.resizes
    }

    /// Zero the write and flush counters.
    pub const fn reset_counters(&mut self) {
        self.cell_writes = 0;
        self.flushes = 0;
    }
}

impl TerminalBackend for VirtualTerminal {
    fn enter(&mut self) -> io::Result<()> {
        self.enter_calls += 1;
        self.active = true;
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        self.leave_calls += 1;
        self.active = false;
        Ok(())
    }

    fn size(&mut self) -> Size {
        if let Some(size) = self.pending_size.take() {
            if size != self.screen.size() {
                self.screen.resize(size);
                self.resizes += 1;
            }
        }
        self.screen.size()
    }

    fn color_depth(&self) -> ColorDepth {
        self.depth
    }

    fn max_pairs(&self) -> u16 {
        self.pairs.max()
    }

    fn init_pair(&mut self, id: PairId, fg: TermColor, bg: TermColor) {
        self.pairs.set(id, fg, bg);
    }

    fn pair_content(&self, id: PairId) -> (TermColor, TermColor) {
        self.pairs.get(id)
    }

    fn read_cell(&self, x: u16, y: u16) -> Option<Cell> {
        self.screen.get(x, y)
    }

    fn write_cell(&mut self, x: u16, y: u16, cell: Cell) {
        if self.screen.set(x, y, cell) {
            self.cell_writes += 1;
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        self.screen.drain_dirty(|_, _, _| {});
        Ok(())
    }

    fn poll_event(&mut self) -> Option<Event> {
        self.input.pop_front()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, KeyEvent};
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_blank_and_inactive() {
        let mut vt = VirtualTerminal::new(4, 2);
        assert!(!vt.is_active());
        assert_eq!(vt.size(), Size::new(4, 2));
        assert_eq!(vt.row_text(0), "    ");
        assert_eq!(vt.color_depth(), ColorDepth::Ansi256);
    }

    #[test]
    fn counts_lifecycle_calls() {
        let mut vt = VirtualTerminal::new(1, 1);
        vt.enter().unwrap();
        vt.enter().unwrap();
        vt.leave().unwrap();
        assert_eq!(vt.enter_calls(), 2);
        assert_eq!(vt.leave_calls(), 1);
        assert!(!vt.is_active());
    }

    #[test]
    fn counts_only_in_bounds_writes() {
        let mut vt = VirtualTerminal::new(2, 2);
        vt.write_cell(0, 0, Cell::new('a', PairId(0)));
        vt.write_cell(5, 0, Cell::new('b', PairId(0)));
        assert_eq!(vt.cell_writes(), 1);
        vt.flush().unwrap();
        assert_eq!(vt.flushes(), 1);
        vt.reset_counters();
        assert_eq!(vt.cell_writes(), 0);
    }

    #[test]
    fn resize_applies_on_next_size_query() {
        let mut vt = VirtualTerminal::new(4, 2);
        vt.write_cell(0, 0, Cell::new('a', PairId(0)));
        vt.resize(6, 3);
        assert_eq!(vt.read_cell(0, 0), Some(Cell::new('a', PairId(0))));
        assert_eq!(vt.size(), Size::new(6, 3));
        assert_eq!(vt.read_cell(0, 0), Some(Cell::BLANK));
        assert_eq!(vt.resizes(), 1);
    }

    #[test]
    fn resize_to_same_size_is_not_a_resize() {
        let mut vt = VirtualTerminal::new(4, 2);
        vt.resize(4, 2);
        let _ = vt.size();
        assert_eq!(vt.resizes(), 0);
    }

    #[test]
    fn styled_cell_resolves_pair() {
        let mut vt = VirtualTerminal::new(2, 1);
        vt.init_pair(PairId(1), TermColor::WHITE, TermColor::RED);
        vt.write_cell(1, 0, Cell::new('z', PairId(1)));
        assert_eq!(vt.styled_cell(1, 0), (Some('z'), TermColor::WHITE, TermColor::RED));
    }

    #[test]
    fn input_queue_is_fifo() {
        let mut vt = VirtualTerminal::new(1, 1);
        let q = Event::Key(KeyEvent::plain(KeyCode::Char('q')));
        let up = Event::Key(KeyEvent::plain(KeyCode::Up));
        vt.push_event(q);
        vt.push_event(up);
        assert_eq!(vt.poll_event(), Some(q));
        assert_eq!(vt.poll_event(), Some(up));
        assert_eq!(vt.poll_event(), None);
    }

    #[test]
    fn max_pairs_is_configurable() {
        let vt = VirtualTerminal::new(1, 1).with_max_pairs(8);
        assert_eq!(vt.max_pairs(), 8);
    }
}

// SPDX-License-Identifier: MIT
//
// Terminal backends: the seam between the renderer and a terminal.
//
// The renderer never talks to a terminal directly. Everything it needs is
// on `TerminalBackend`: enter and leave full-screen mode, ask for the size
// and color depth, register color pairs, read what a cell currently shows,
// write a cell, flush, and poll input.
//
// Two implementations:
//
//   AnsiBackend     a real terminal on stdin/stdout. Writes land in a
//                     `ScreenBuffer`; `flush` encodes the dirty cells with a
//                     `CellWriter` and sends the frame in one write inside
//                     synchronized-output markers.
//
//   VirtualTerminal an in-memory terminal for tests and headless runs
//                     (see `virtual_term`).
//
// Color pairs work the way curses color pairs do: a small integer names a
// (foreground, background) combination. Pair 0 is fixed to the terminal
// defaults.

use std::collections::VecDeque;
use std::io;

use crate::ansi::{self, Mode};
use crate::cell::{Cell, PairId};
use crate::color::{ColorDepth, TermColor};
use crate::input::{Event, Parser};
use crate::output::{CellWriter, OutputBuffer};
use crate::screen::ScreenBuffer;
use crate::terminal::{Size, Terminal};

/// Pair ids a backend supports unless told otherwise (id 0 included).
pub const DEFAULT_MAX_PAIRS: u16 = 32_767;

// ─── TerminalBackend ────────────────────────────────────────────────────────

/// Everything a cell renderer needs from a terminal.
pub trait TerminalBackend {
    /// Enter full-screen mode: raw input, alternate screen, application
    /// keypad, hidden cursor, mouse reporting. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the terminal cannot be configured.
    fn enter(&mut self) -> io::Result<()>;

    /// Restore the terminal to the state it had before [`enter`]. Idempotent,
    /// and safe to call when `enter` never ran or failed halfway.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if restoring fails.
    ///
    /// [`enter`]: TerminalBackend::enter
    fn leave(&mut self) -> io::Result<()>;

    /// Current size in cells. When it changed since the last call, the cell
    /// grid is reset to blank and the next flush clears the screen.
    fn size(&mut self) -> Size;

    fn color_depth(&self) -> ColorDepth;

    /// Number of pair ids available, including the reserved id 0.
    fn max_pairs(&self) -> u16;

    /// Bind pair `id` to `(fg, bg)`. Id 0 and ids at or beyond
    /// [`max_pairs`](TerminalBackend::max_pairs) are ignored.
    fn init_pair(&mut self, id: PairId, fg: TermColor, bg: TermColor);

    /// Colors bound to `id`; unbound ids report the defaults.
    fn pair_content(&self, id: PairId) -> (TermColor, TermColor);

    /// What the cell at `(x, y)` currently holds, or `None` off-screen.
    fn read_cell(&self, x: u16, y: u16) -> Option<Cell>;

    /// Replace the cell at `(x, y)`. Off-screen writes are ignored.
    fn write_cell(&mut self, x: u16, y: u16, cell: Cell);

    /// Push every write since the last flush to the terminal.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the terminal write fails.
    fn flush(&mut self) -> io::Result<()>;

    /// Next pending input event, without blocking.
    fn poll_event(&mut self) -> Option<Event>;
}

// ─── PairTable ──────────────────────────────────────────────────────────────

/// Storage for pair bindings, shared by both backends.
#[derive(Debug, Clone)]
pub struct PairTable {
    max: u16,
    pairs: Vec<(TermColor, TermColor)>,
}

impl PairTable {
    #[must_use]
    pub fn new(max: u16) -> Self {
        Self {
            max,
            pairs: vec![(TermColor::Default, TermColor::Default)],
        }
    }

    #[inline]
    #[must_use]
    pub const fn max(&self) -> u16 {
        self.max
    }

    /// Bind `id`. Returns `true` if an existing binding changed colors.
    pub fn set(&mut self, id: PairId, fg: TermColor, bg: TermColor) -> bool {
        if id.is_default() || id.0 >= self.max {
            tracing::debug!(?id, max = self.max, "init_pair ignored");
            return false;
        }
        let idx = id.index();
        if idx >= self.pairs.len() {
            self.pairs
                .resize(idx + 1, (TermColor::Default, TermColor::Default));
            self.pairs[idx] = (fg, bg);
            return false;
        }
        let changed = self.pairs[idx] != (fg, bg);
        self.pairs[idx] = (fg, bg);
        changed
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: PairId) -> (TermColor, TermColor) {
        self.pairs
            .get(id.index())
            .copied()
            .unwrap_or((TermColor::Default, TermColor::Default))
    }
}

// ─── AnsiBackend ────────────────────────────────────────────────────────────

/// A real terminal driven through ANSI escape sequences.
pub struct AnsiBackend {
    terminal: Terminal,
    screen: ScreenBuffer,
    pairs: PairTable,
    depth: ColorDepth,
    out: OutputBuffer,
    writer: CellWriter,
    needs_clear: bool,
    parser: Parser,
    events: VecDeque<Event>,
    read_buf: Vec<u8>,
    last_frame_bytes: usize,
}

impl AnsiBackend {
    /// A backend for the controlling terminal with the given color depth.
    #[must_use]
    pub fn new(depth: ColorDepth) -> Self {
        let terminal = Terminal::new();
        let screen = ScreenBuffer::new(terminal.size());
        Self {
            terminal,
            screen,
            pairs: PairTable::new(DEFAULT_MAX_PAIRS),
            depth,
            out: OutputBuffer::new(),
            writer: CellWriter::new(),
            needs_clear: true,
            parser: Parser::new(),
            events: VecDeque::new(),
            read_buf: vec![0; 1024],
            last_frame_bytes: 0,
        }
    }

    /// A backend whose color depth is detected from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ColorDepth::from_env())
    }

    /// Limit the number of pair ids, as a driver with a small pair table
    /// would.
    #[must_use]
    pub fn with_max_pairs(mut self, max: u16) -> Self {
        self.pairs = PairTable::new(max.max(1));
        self
    }

    /// Bytes sent by the most recent flush.
    #[must_use]
    pub const fn last_frame_bytes(&self) -> usize {
        self.last_frame_bytes
    }
}

impl TerminalBackend for AnsiBackend {
    fn enter(&mut self) -> io::Result<()> {
        if self.terminal.is_active() {
            return Ok(());
        }
        self.terminal.enter()?;
        let size = self.terminal.refresh_size();
        self.screen.resize(size);
        self.writer.reset_state();
        self.needs_clear = true;
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        self.terminal.leave()
    }

    fn size(&mut self) -> Size {
        let size = self.terminal.refresh_size();
        if size != self.screen.size() {
            tracing::debug!(cols = size.cols, rows = size.rows, "terminal resized");
            self.screen.resize(size);
            self.needs_clear = true;
        }
        size
    }

    fn color_depth(&self) -> ColorDepth {
        self.depth
    }

    fn max_pairs(&self) -> u16 {
        self.pairs.max()
    }

    fn init_pair(&mut self, id: PairId, fg: TermColor, bg: TermColor) {
        // A rebinding recolors every cell already on that pair.
        if self.pairs.set(id, fg, bg) {
            self.screen.mark_all_dirty();
        }
    }

    fn pair_content(&self, id: PairId) -> (TermColor, TermColor) {
        self.pairs.get(id)
    }

    fn read_cell(&self, x: u16, y: u16) -> Option<Cell> {
        self.screen.get(x, y)
    }

    fn write_cell(&mut self, x: u16, y: u16, cell: Cell) {
        self.screen.set(x, y, cell);
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.terminal.is_active() {
            self.screen.drain_dirty(|_, _, _| {});
            return Ok(());
        }
        if !self.needs_clear && self.screen.dirty_count() == 0 {
            self.last_frame_bytes = 0;
            return Ok(());
        }

        self.out.clear();
        ansi::set(&mut self.out, Mode::SyncOutput)?;
        if self.needs_clear {
            ansi::reset(&mut self.out)?;
            ansi::clear_screen(&mut self.out)?;
            self.writer.reset_state();
            self.needs_clear = false;
        }

        let pairs = &self.pairs;
        let out = &mut self.out;
        let writer = &mut self.writer;
        self.screen.drain_dirty(|x, y, cell| {
            writer.render_cell(out, x, y, cell, pairs.get(cell.pair));
        });

        ansi::unset(&mut self.out, Mode::SyncOutput)?;
        self.last_frame_bytes = self.out.len();
        self.terminal.write_frame(self.out.as_bytes())?;
        self.out.clear();
        Ok(())
    }

    fn poll_event(&mut self) -> Option<Event> {
        if let Some(event) = self.events.pop_front() {
            return Some(event);
        }

        match self.terminal.read_pending(&mut self.read_buf) {
            Ok(0) => {
                if self.parser.has_pending() {
                    self.events.extend(self.parser.flush());
                }
            }
            Ok(n) => self.events.extend(self.parser.advance(&self.read_buf[..n])),
            Err(err) => tracing::warn!(%err, "reading terminal input failed"),
        }

        self.events.pop_front()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

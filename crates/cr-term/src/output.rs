// SPDX-License-Identifier: MIT
//
// Frame bytes and the encoder that fills them.
//
// `OutputBuffer` is where a frame is assembled before the backend hands it
// to the terminal in one write. `CellWriter` turns dirty cells into bytes
// and remembers what the terminal already has (cursor position, current
// colors), so a horizontal run on one pair costs a single cursor move and a
// single color change followed by plain characters.

use std::io::{self, Write};

use crate::ansi;
use crate::cell::Cell;
use crate::color::TermColor;

/// Bytes of one frame. Writing into it cannot fail.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl OutputBuffer {
    /// Empty, with room for a typical full-screen repaint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(16 * 1024),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Drop the contents, keep the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Append `cp` as UTF-8. NUL and anything that is not a scalar value
    /// becomes `?`.
    pub fn push_codepoint(&mut self, cp: u32) {
        match char::from_u32(cp) {
            Some(ch) if ch != '\0' => {
                let mut utf8 = [0u8; 4];
                self.bytes
                    .extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
            }
            _ => self.bytes.push(b'?'),
        }
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Encodes cells while skipping sequences the terminal state makes
/// redundant.
///
/// A cell placed right after the previous one needs no cursor move. Colors
/// are emitted only when they differ from what was last set. The right
/// half of a wide character that directly follows its left half produces
/// no bytes at all.
#[derive(Debug, Default)]
pub struct CellWriter {
    /// Last cell emitted, if the terminal state is known.
    last: Option<(u16, u16)>,
    fg: Option<TermColor>,
    bg: Option<TermColor>,
}

impl CellWriter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: None,
            fg: None,
            bg: None,
        }
    }

    /// Assume nothing about the terminal. Needed after a clear or SGR reset.
    pub const fn reset_state(&mut self) {
        self.last = None;
        self.fg = None;
        self.bg = None;
    }

    fn follows(&self, x: u16, y: u16) -> bool {
        self.last
            .is_some_and(|(lx, ly)| ly == y && u32::from(lx) + 1 == u32::from(x))
    }

    /// Append the bytes for `cell` at `(x, y)`, drawn in `colors` (the
    /// resolved foreground and background of the cell's pair).
    pub fn render_cell(
        &mut self,
        out: &mut OutputBuffer,
        x: u16,
        y: u16,
        cell: Cell,
        colors: (TermColor, TermColor),
    ) {
        let adjacent = self.follows(x, y);
        if cell.is_continuation() && adjacent {
            self.last = Some((x, y));
            return;
        }

        if !adjacent {
            let _ = ansi::cursor_to(out, x, y);
        }
        let (fg, bg) = colors;
        if self.fg != Some(fg) {
            let _ = ansi::fg(out, fg);
            self.fg = Some(fg);
        }
        if self.bg != Some(bg) {
            let _ = ansi::bg(out, bg);
            self.bg = Some(bg);
        }

        // A right half whose left half was not re-sent still needs its
        // background painted.
        if cell.is_continuation() {
            out.bytes.push(b' ');
        } else {
            out.push_codepoint(cell.ch);
        }
        self.last = Some((x, y));
    }
}

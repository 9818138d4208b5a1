// SPDX-License-Identifier: MIT
//
// Cell: one character position on the terminal grid.
//
// A cell is a codepoint plus a color pair id. The pair id is an index into
// the backend's pair table, which maps it to a (foreground, background)
// `TermColor` combination. Storing the id rather than the colors keeps the
// cell at 8 bytes and makes "same glyph, same pair" a single comparison:
// that comparison is the whole of the dirty-cell diff.
//
// Wide characters (CJK, some emoji) occupy two columns. The first cell
// holds the codepoint; the second is a continuation cell (ch = 0) carrying
// the same pair so its background is painted too. Output skips the
// continuation's character.

use std::fmt;

// ─── PairId ──────────────────────────────────────────────────────────────────

/// Identifier of a registered (foreground, background) color pair.
///
/// Id 0 is reserved: it always means the terminal's default colors and can
/// never be re-registered.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PairId(pub u16);

impl PairId {
    /// The default pair: terminal default foreground on default background.
    pub const DEFAULT: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        self.0 == 0
    }

    /// Index into a pair table.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pair#{}", self.0)
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// Continuation marker for the second column of a wide character.
const CONTINUATION: u32 = 0;

const SPACE: u32 = b' ' as u32;

/// A single terminal cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Unicode codepoint to display.
    ///
    /// - `0` = continuation cell (second column of a wide character)
    /// - `b' '` = blank (the default)
    pub ch: u32,

    /// Color pair the cell is drawn with.
    pub pair: PairId,
}

impl Cell {
    /// A blank cell: space on the default pair.
    pub const BLANK: Self = Self {
        ch: SPACE,
        pair: PairId::DEFAULT,
    };

    /// A cell holding `ch` drawn with `pair`.
    #[inline]
    #[must_use]
    pub const fn new(ch: char, pair: PairId) -> Self {
        Self { ch: ch as u32, pair }
    }

    /// The continuation half of a wide character.
    #[inline]
    #[must_use]
    pub const fn continuation(pair: PairId) -> Self {
        Self {
            ch: CONTINUATION,
            pair,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_continuation(self) -> bool {
        self.ch == CONTINUATION
    }

    /// The character, or `None` for continuation cells and invalid
    /// codepoints.
    #[inline]
    #[must_use]
    pub const fn character(self) -> Option<char> {
        if self.ch == CONTINUATION {
            None
        } else {
            char::from_u32(self.ch)
        }
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::BLANK
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.character() {
            Some(c) => write!(f, "Cell({c:?} {:?})", self.pair),
            None if self.is_continuation() => write!(f, "Cell(<cont> {:?})", self.pair),
            None => write!(f, "Cell(U+{:04X} {:?})", self.ch, self.pair),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

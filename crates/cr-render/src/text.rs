// SPDX-License-Identifier: MIT
//
// Text width engine.
//
// Text arrives as raw bytes that should be UTF-8 but are not trusted to be.
// Decoding never fails: each byte that is not part of a valid sequence
// becomes its own zero-width unit and decoding resumes at the next byte.
//
// Widths come from `unicode-width` (East Asian Wide/Fullwidth = 2,
// combining marks and control characters = 0, everything else = 1). Both
// measuring and clipping walk the same `glyphs()` sequence, so a string
// never measures one width and clips to another.
//
// Clipping never splits a glyph. A wide character that straddles either
// edge of the visible window is left out entirely; the columns it would
// have covered keep whatever was painted underneath.

use std::ops::Range;

use unicode_width::UnicodeWidthChar;

use crate::geometry::{CellSize, Dimensions};

/// One decoded unit of a text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    /// Position in the decoded sequence.
    pub index: usize,
    /// Source bytes.
    pub bytes: Range<usize>,
    /// `None` for an undecodable byte.
    pub ch: Option<char>,
    /// Column the glyph starts at, relative to the start of the run.
    pub column: usize,
    /// Columns occupied: 0, 1, or 2.
    pub width: usize,
}

/// Display width of a single character.
#[inline]
#[must_use]
pub fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Decode `text` into glyphs with their columns.
#[must_use]
pub fn glyphs(text: &[u8]) -> Vec<Glyph> {
    let mut out = Vec::with_capacity(text.len());
    let mut offset = 0;
    let mut column = 0;

    for chunk in text.utf8_chunks() {
        for (i, c) in chunk.valid().char_indices() {
            let width = char_width(c);
            out.push(Glyph {
                index: out.len(),
                bytes: offset + i..offset + i + c.len_utf8(),
                ch: Some(c),
                column,
                width,
            });
            column += width;
        }
        offset += chunk.valid().len();

        for _ in chunk.invalid() {
            out.push(Glyph {
                index: out.len(),
                bytes: offset..offset + 1,
                ch: None,
                column,
                width: 0,
            });
            offset += 1;
        }
    }
    out
}

/// Total display width of `text` in columns.
#[must_use]
pub fn measure_width(text: &[u8]) -> usize {
    text.utf8_chunks()
        .map(|chunk| chunk.valid().chars().map(char_width).sum::<usize>())
        .sum()
}

/// Pixel size of `text` laid out on one line of `cell`-sized cells.
///
/// Pure, so a layout engine can call it as often as it likes.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn measure_text(text: &[u8], cell: CellSize) -> Dimensions {
    Dimensions::new(measure_width(text) as f32 * cell.width, cell.height)
}

// ─── Clipping ───────────────────────────────────────────────────────────────

/// The part of a run visible through a column window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextWindow {
    /// Index of the first visible glyph.
    pub start: usize,
    /// Number of visible glyphs.
    pub count: usize,
    /// Source bytes of the visible glyphs.
    pub bytes: Range<usize>,
    /// Column the first visible glyph starts at, relative to the run.
    pub first_column: usize,
}

/// Select the glyphs of `text` that fit entirely inside columns
/// `[skip, skip + take)`.
///
/// The selection is the contiguous run beginning at the first glyph that
/// fits and ending before the first one after it that doesn't. Returns
/// `None` when nothing fits.
#[must_use]
pub fn clip_to_window(text: &[u8], skip: usize, take: usize) -> Option<TextWindow> {
    let all = glyphs(text);
    let range = window_range(&all, skip, take)?;
    let first = &all[range.start];
    let last = &all[range.end - 1];
    Some(TextWindow {
        start: range.start,
        count: range.len(),
        bytes: first.bytes.start..last.bytes.end,
        first_column: first.column,
    })
}

/// Index range into `glyphs` of the window `[skip, skip + take)`.
pub(crate) fn window_range(glyphs: &[Glyph], skip: usize, take: usize) -> Option<Range<usize>> {
    let end = skip.saturating_add(take);
    let fits = |g: &Glyph| g.column >= skip && g.column < end && g.column + g.width <= end;

    let start = glyphs.iter().position(fits)?;
    let count = glyphs[start..].iter().take_while(|g| fits(g)).count();
    Some(start..start + count)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

// SPDX-License-Identifier: MIT
//
// Paint engine: every cell write in a frame goes through here.
//
// Commands do not touch the terminal directly. They record the cells they
// want into a per-frame back buffer, later commands overwriting earlier
// ones. Once the command list is done, `present` compares the back buffer
// with what the backend shows and writes only the cells that differ.
// Overlapping commands (a label on a panel, a border around it) therefore
// cost nothing on a frame that looks like the last one.
//
// The back buffer doubles as the touched mask:
//
//   background  Text and border glyphs have no background of their own.
//               They take it from the cell underneath in the back buffer,
//               so a label drawn over a filled panel shows the panel
//               color. A cell nothing has drawn yet counts as blank when
//               sweeping, and as whatever the screen shows otherwise.
//
//   sweep       Cells no command drew are reset to blank in the same
//               pass, so UI that went away disappears.
//
// Borders are four separate segments plus corners, each clipped on its
// own, so the visible part of a partly clipped box still draws.

use cr_term::backend::TerminalBackend;
use cr_term::cell::{Cell, PairId};
use cr_term::color::TermColor;
use cr_term::terminal::Size;

use crate::clip::ClipStack;
use crate::color::ColorPairCache;
use crate::command::{BorderWidths, Corners};
use crate::geometry::CellRect;
use crate::text;

/// What painting did in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaintStats {
    /// Drawn cells sent to the terminal.
    pub cells_written: usize,
    /// Drawn cells the terminal already showed.
    pub cells_skipped: usize,
    /// Stale cells the sweep reset to blank.
    pub cells_swept: usize,
}

// ─── Border glyphs ──────────────────────────────────────────────────────────

const HORIZONTAL: char = '─';
const VERTICAL: char = '│';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    const fn glyph(self, rounded: bool) -> char {
        match (self, rounded) {
            (Self::TopLeft, true) => '╭',
            (Self::TopRight, true) => '╮',
            (Self::BottomLeft, true) => '╰',
            (Self::BottomRight, true) => '╯',
            (Self::TopLeft, false) => '┌',
            (Self::TopRight, false) => '┐',
            (Self::BottomLeft, false) => '└',
            (Self::BottomRight, false) => '┘',
        }
    }

    const fn flag(self) -> Corners {
        match self {
            Self::TopLeft => Corners::TOP_LEFT,
            Self::TopRight => Corners::TOP_RIGHT,
            Self::BottomLeft => Corners::BOTTOM_LEFT,
            Self::BottomRight => Corners::BOTTOM_RIGHT,
        }
    }
}

// ─── PaintEngine ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct PaintEngine {
    size: Size,
    /// Intended content of each cell this frame; `None` until drawn.
    frame: Vec<Option<Cell>>,
    sweep: bool,
    stats: PaintStats,
}

impl PaintEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a frame on a `size` screen. Clears the back buffer and stats.
    pub fn begin_frame(&mut self, size: Size, sweep: bool) {
        self.size = size;
        self.sweep = sweep;
        self.frame.clear();
        self.frame
            .resize(usize::from(size.cols) * usize::from(size.rows), None);
        self.stats = PaintStats::default();
    }

    #[must_use]
    pub const fn stats(&self) -> PaintStats {
        self.stats
    }

    /// Whether a command drew at `(x, y)` this frame.
    #[cfg(test)]
    fn is_touched(&self, x: i32, y: i32) -> bool {
        self.locate(x, y).is_some_and(|(_, _, i)| self.frame[i].is_some())
    }

    /// On-screen coordinates and buffer index of `(x, y)`.
    fn locate(&self, x: i32, y: i32) -> Option<(u16, u16, usize)> {
        let x = u16::try_from(x).ok().filter(|&x| x < self.size.cols)?;
        let y = u16::try_from(y).ok().filter(|&y| y < self.size.rows)?;
        let idx = usize::from(y) * usize::from(self.size.cols) + usize::from(x);
        Some((x, y, idx))
    }

    /// Record `cell` at `(x, y)` in the back buffer. Returns `false` off
    /// screen.
    ///
    /// Overwriting either half of a wide glyph blanks the other half, the
    /// same repair the screen model does, so the buffer never holds a
    /// right half without its left.
    fn put(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        let Some((x, _, idx)) = self.locate(x, y) else {
            return false;
        };
        if x > 0 && self.frame[idx].is_some_and(Cell::is_continuation) {
            if let Some(lead) = &mut self.frame[idx - 1] {
                *lead = Cell::new(' ', lead.pair);
            }
        }
        if x + 1 < self.size.cols {
            if let Some(next) = &mut self.frame[idx + 1] {
                if next.is_continuation() {
                    *next = Cell::new(' ', next.pair);
                }
            }
        }
        self.frame[idx] = Some(cell);
        true
    }

    /// Background color showing at `(x, y)` for glyphs drawn over it.
    fn background_at<B: TerminalBackend + ?Sized>(&self, backend: &B, x: i32, y: i32) -> TermColor {
        let Some((cx, cy, idx)) = self.locate(x, y) else {
            return TermColor::Default;
        };
        let below = match self.frame[idx] {
            Some(cell) => Some(cell),
            None if self.sweep => None,
            None => backend.read_cell(cx, cy),
        };
        below.map_or(TermColor::Default, |cell| backend.pair_content(cell.pair).1)
    }

    /// Put `ch` in `fg` over whatever background is at `(x, y)`.
    fn put_glyph<B: TerminalBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        pairs: &mut ColorPairCache,
        x: i32,
        y: i32,
        ch: char,
        fg: TermColor,
    ) -> PairId {
        let bg = self.background_at(backend, x, y);
        let pair = pairs.get_pair(backend, fg, bg);
        self.put(x, y, Cell::new(ch, pair));
        pair
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// Fill the visible part of `rect` with blanks drawn in `pair`.
    pub fn fill_rect(&mut self, clip: &ClipStack, rect: CellRect, pair: PairId) {
        let Some(visible) = clip.intersect_draw(rect) else {
            return;
        };
        let cell = Cell::new(' ', pair);
        for (x, y) in visible.cells() {
            self.put(x, y, cell);
        }
    }

    /// Draw one line of `text` starting at cell `(x, y)`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text<B: TerminalBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        pairs: &mut ColorPairCache,
        clip: &ClipStack,
        x: i32,
        y: i32,
        bytes: &[u8],
        fg: TermColor,
    ) {
        let glyphs = text::glyphs(bytes);
        let width = glyphs.last().map_or(0, |g| g.column + g.width);
        let run = CellRect::new(x, y, i32::try_from(width).unwrap_or(i32::MAX), 1);
        let Some(visible) = clip.intersect_draw(run) else {
            return;
        };

        // Both are non-negative: `visible` lies inside `run`.
        let skip = usize::try_from(visible.x.saturating_sub(x)).unwrap_or(0);
        let take = usize::try_from(visible.width).unwrap_or(0);
        let Some(range) = text::window_range(&glyphs, skip, take) else {
            return;
        };

        for glyph in &glyphs[range] {
            let Some(ch) = glyph.ch else { continue };
            if glyph.width == 0 {
                continue;
            }
            let gx = x.saturating_add(i32::try_from(glyph.column).unwrap_or(i32::MAX));
            let pair = self.put_glyph(backend, pairs, gx, y, ch, fg);
            if glyph.width == 2 {
                self.put(gx.saturating_add(1), y, Cell::continuation(pair));
            }
        }
    }

    /// Draw box-drawing lines along the edges of `rect`.
    ///
    /// A side is drawn when its width is above zero; a box one cell tall or
    /// wide has no room for a bottom or right side. A corner gets its own
    /// glyph only when both sides meeting there are drawn, otherwise the
    /// drawn side runs through it.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_border<B: TerminalBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        pairs: &mut ColorPairCache,
        clip: &ClipStack,
        rect: CellRect,
        fg: TermColor,
        widths: BorderWidths,
        rounded: Corners,
    ) {
        if rect.is_empty() {
            return;
        }
        let top = widths.top > 0;
        let bottom = widths.bottom > 0 && rect.height >= 2;
        let left = widths.left > 0;
        let right = widths.right > 0 && rect.width >= 2;

        let (x0, y0) = (rect.x, rect.y);
        let (x1, y1) = (rect.right() - 1, rect.bottom() - 1);

        let tl = top && left;
        let tr = top && right;
        let bl = bottom && left;
        let br = bottom && right;

        if top {
            let from = x0.saturating_add(i32::from(tl));
            let to = rect.right() - i32::from(tr);
            self.hline(backend, pairs, clip, from, to, y0, fg);
        }
        if bottom {
            let from = x0.saturating_add(i32::from(bl));
            let to = rect.right() - i32::from(br);
            self.hline(backend, pairs, clip, from, to, y1, fg);
        }
        if left {
            let from = y0.saturating_add(i32::from(tl));
            let to = rect.bottom() - i32::from(bl);
            self.vline(backend, pairs, clip, x0, from, to, fg);
        }
        if right {
            let from = y0.saturating_add(i32::from(tr));
            let to = rect.bottom() - i32::from(br);
            self.vline(backend, pairs, clip, x1, from, to, fg);
        }

        let corners = [
            (tl, Corner::TopLeft, x0, y0),
            (tr, Corner::TopRight, x1, y0),
            (bl, Corner::BottomLeft, x0, y1),
            (br, Corner::BottomRight, x1, y1),
        ];
        for (drawn, corner, x, y) in corners {
            if drawn && clip.intersect_draw(CellRect::new(x, y, 1, 1)).is_some() {
                let glyph = corner.glyph(rounded.contains(corner.flag()));
                self.put_glyph(backend, pairs, x, y, glyph, fg);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn hline<B: TerminalBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        pairs: &mut ColorPairCache,
        clip: &ClipStack,
        from: i32,
        to: i32,
        y: i32,
        fg: TermColor,
    ) {
        let segment = CellRect::new(from, y, to.saturating_sub(from), 1);
        let Some(visible) = clip.intersect_draw(segment) else {
            return;
        };
        let step = i32::try_from(text::char_width(HORIZONTAL).max(1)).unwrap_or(1);
        let mut x = visible.x;
        while x + step <= visible.right() {
            self.put_glyph(backend, pairs, x, y, HORIZONTAL, fg);
            x += step;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn vline<B: TerminalBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        pairs: &mut ColorPairCache,
        clip: &ClipStack,
        x: i32,
        from: i32,
        to: i32,
        fg: TermColor,
    ) {
        let width = i32::try_from(text::char_width(VERTICAL).max(1)).unwrap_or(1);
        let segment = CellRect::new(x, from, width, to.saturating_sub(from));
        let Some(visible) = clip.intersect_draw(segment) else {
            return;
        };
        if visible.width < width {
            return;
        }
        for y in visible.y..visible.bottom() {
            self.put_glyph(backend, pairs, x, y, VERTICAL, fg);
        }
    }

    // ─── Present ─────────────────────────────────────────────────────────

    /// Write the back buffer to `backend`, skipping cells it already shows.
    ///
    /// Drawn cells are compared as they are. Undrawn cells are compared
    /// against a blank when sweeping and left alone otherwise. A wide glyph
    /// and its right half are compared and written as one unit, so writing
    /// one half never disturbs the other on screen.
    pub fn present<B: TerminalBackend + ?Sized>(&mut self, backend: &mut B) {
        let cols = usize::from(self.size.cols).max(1);
        let mut idx = 0;
        while idx < self.frame.len() {
            // Indices come from a cols × rows grid, so both fit in u16.
            #[allow(clippy::cast_possible_truncation)]
            let (x, y) = ((idx % cols) as u16, (idx / cols) as u16);

            let Some(cell) = self.frame[idx] else {
                if self.sweep && backend.read_cell(x, y).is_some_and(|c| c != Cell::BLANK) {
                    backend.write_cell(x, y, Cell::BLANK);
                    self.stats.cells_swept += 1;
                }
                idx += 1;
                continue;
            };

            let right = if cell.is_continuation() || usize::from(x) + 1 >= cols {
                None
            } else {
                self.frame[idx + 1].filter(|c| c.is_continuation())
            };
            let span = 1 + usize::from(right.is_some());

            let unchanged = backend.read_cell(x, y) == Some(cell)
                && right.is_none_or(|r| backend.read_cell(x + 1, y) == Some(r));
            if unchanged {
                self.stats.cells_skipped += span;
            } else {
                backend.write_cell(x, y, cell);
                if let Some(r) = right {
                    backend.write_cell(x + 1, y, r);
                }
                self.stats.cells_written += span;
            }
            idx += span;
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cr_term::virtual_term::VirtualTerminal;
    use pretty_assertions::assert_eq;

    struct Fixture {
        vt: VirtualTerminal,
        pairs: ColorPairCache,
        clip: ClipStack,
        paint: PaintEngine,
    }

    impl Fixture {
        fn new(cols: u16, rows: u16) -> Self {
            let mut clip = ClipStack::default();
            clip.reset(CellRect::new(0, 0, i32::from(cols), i32::from(rows)));
            let mut paint = PaintEngine::new();
            paint.begin_frame(Size::new(cols, rows), true);
            Self {
                vt: VirtualTerminal::new(cols, rows),
                pairs: ColorPairCache::default(),
                clip,
                paint,
            }
        }

        /// Present the frame, flush, and start the next one.
        fn next_frame_with(&mut self, sweep: bool) {
            self.paint.present(&mut self.vt);
            self.vt.flush().unwrap();
            let size = self.vt.screen().size();
            self.paint.begin_frame(size, sweep);
            self.vt.reset_counters();
        }

        fn next_frame(&mut self) {
            self.next_frame_with(true);
        }

        fn present(&mut self) -> &VirtualTerminal {
            self.paint.present(&mut self.vt);
            &self.vt
        }

        fn fill(&mut self, rect: CellRect, color: TermColor) {
            let pair = self.pairs.get_pair(&mut self.vt, color, color);
            self.paint.fill_rect(&self.clip, rect, pair);
        }

        fn text(&mut self, x: i32, y: i32, s: &str, fg: TermColor) {
            self.paint.draw_text(
                &mut self.vt,
                &mut self.pairs,
                &self.clip,
                x,
                y,
                s.as_bytes(),
                fg,
            );
        }

        fn border(&mut self, rect: CellRect, widths: BorderWidths, rounded: Corners) {
            self.paint.draw_border(
                &mut self.vt,
                &mut self.pairs,
                &self.clip,
                rect,
                TermColor::WHITE,
                widths,
                rounded,
            );
        }
    }

    // ── Back buffer and diffing ─────────────────────────────────────────

    #[test]
    fn commands_write_nothing_until_present() {
        let mut f = Fixture::new(3, 1);
        f.text(0, 0, "abc", TermColor::WHITE);
        assert_eq!(f.vt.cell_writes(), 0);
        assert_eq!(f.present().cell_writes(), 3);
        assert_eq!(f.vt.row_text(0), "abc");
    }

    #[test]
    fn present_skips_identical_cells() {
        let mut f = Fixture::new(3, 1);
        let cell = Cell::new('x', PairId::DEFAULT);
        assert!(f.paint.put(1, 0, cell));
        f.next_frame();
        assert!(f.paint.put(1, 0, cell));
        assert_eq!(f.present().cell_writes(), 0);
        assert_eq!(f.paint.stats().cells_skipped, 1);
    }

    #[test]
    fn put_off_screen_is_ignored() {
        let mut f = Fixture::new(3, 1);
        assert!(!f.paint.put(-1, 0, Cell::BLANK));
        assert!(!f.paint.put(3, 0, Cell::BLANK));
        assert!(!f.paint.is_touched(-1, 0));
    }

    #[test]
    fn blank_fill_on_blank_screen_writes_nothing() {
        let mut f = Fixture::new(4, 2);
        f.paint
            .fill_rect(&f.clip, CellRect::new(0, 0, 4, 2), PairId::DEFAULT);
        assert_eq!(f.present().cell_writes(), 0);
        assert_eq!(f.paint.stats().cells_skipped, 8);
    }

    #[test]
    fn fill_respects_clip() {
        let mut f = Fixture::new(6, 3);
        f.clip.push(CellRect::new(1, 1, 2, 1));
        f.fill(CellRect::new(0, 0, 6, 3), TermColor::BLUE);
        assert_eq!(f.present().cell_writes(), 2);
        assert!(f.paint.is_touched(1, 1));
        assert!(!f.paint.is_touched(0, 0));
    }

    #[test]
    fn overlapping_commands_settle_after_one_frame() {
        let mut f = Fixture::new(8, 3);
        let draw = |f: &mut Fixture| {
            f.fill(CellRect::new(0, 0, 8, 3), TermColor::BLUE);
            f.border(CellRect::new(0, 0, 8, 3), BorderWidths::all(1), Corners::empty());
            f.text(1, 1, "label", TermColor::WHITE);
        };
        draw(&mut f);
        f.next_frame();
        draw(&mut f);
        f.paint.present(&mut f.vt);
        assert_eq!(f.vt.cell_writes(), 0);
        assert_eq!(f.vt.screen().dirty_count(), 0);
        assert_eq!(f.paint.stats().cells_written, 0);
        assert_eq!(f.paint.stats().cells_skipped, 24);
    }

    #[test]
    fn wide_glyph_half_covered_by_fill_settles() {
        let mut f = Fixture::new(5, 1);
        let draw = |f: &mut Fixture| {
            f.fill(CellRect::new(0, 0, 5, 1), TermColor::RED);
            f.text(1, 0, "中", TermColor::WHITE);
            f.fill(CellRect::new(2, 0, 1, 1), TermColor::BLUE);
        };
        draw(&mut f);
        f.present();
        // The left half lost its right half and became a blank.
        assert_eq!(f.vt.styled_cell(1, 0), (Some(' '), TermColor::WHITE, TermColor::RED));
        assert_eq!(f.vt.styled_cell(2, 0), (Some(' '), TermColor::BLUE, TermColor::BLUE));

        f.next_frame();
        draw(&mut f);
        f.paint.present(&mut f.vt);
        assert_eq!(f.vt.cell_writes(), 0);
        assert_eq!(f.vt.screen().dirty_count(), 0);
    }

    #[test]
    fn wide_glyph_redrawn_over_itself_settles() {
        let mut f = Fixture::new(4, 1);
        f.fill(CellRect::new(0, 0, 4, 1), TermColor::GREEN);
        f.text(0, 0, "中", TermColor::WHITE);
        f.next_frame();
        f.fill(CellRect::new(0, 0, 4, 1), TermColor::GREEN);
        f.text(0, 0, "中", TermColor::WHITE);
        assert_eq!(f.present().cell_writes(), 0);
        assert_eq!(f.vt.screen().dirty_count(), 0);
    }

    #[test]
    fn narrow_text_replaces_wide_glyph() {
        let mut f = Fixture::new(4, 1);
        f.text(0, 0, "中", TermColor::WHITE);
        f.next_frame();
        f.text(0, 0, "ab", TermColor::WHITE);
        assert_eq!(f.present().row_text(0), "ab  ");
        assert!(!f.vt.cell(1, 0).is_continuation());
    }

    // ── Text ────────────────────────────────────────────────────────────

    #[test]
    fn text_inherits_fill_background() {
        let mut f = Fixture::new(5, 1);
        f.fill(CellRect::new(0, 0, 5, 1), TermColor::RED);
        f.text(1, 0, "ok", TermColor::WHITE);
        f.present();
        assert_eq!(f.vt.styled_cell(1, 0), (Some('o'), TermColor::WHITE, TermColor::RED));
        assert_eq!(f.vt.styled_cell(2, 0), (Some('k'), TermColor::WHITE, TermColor::RED));
        assert_eq!(f.vt.styled_cell(3, 0), (Some(' '), TermColor::RED, TermColor::RED));
    }

    #[test]
    fn text_on_undrawn_cells_gets_default_background() {
        let mut f = Fixture::new(5, 1);
        f.fill(CellRect::new(0, 0, 5, 1), TermColor::RED);
        f.next_frame();
        // The red fill is stale now; text must not pick it up.
        f.text(0, 0, "a", TermColor::WHITE);
        f.present();
        assert_eq!(f.vt.styled_cell(0, 0), (Some('a'), TermColor::WHITE, TermColor::Default));
    }

    #[test]
    fn without_sweep_text_takes_screen_background() {
        let mut f = Fixture::new(5, 1);
        f.fill(CellRect::new(0, 0, 5, 1), TermColor::RED);
        f.next_frame_with(false);
        f.text(0, 0, "a", TermColor::WHITE);
        f.present();
        assert_eq!(f.vt.styled_cell(0, 0), (Some('a'), TermColor::WHITE, TermColor::RED));
        assert_eq!(f.vt.styled_cell(4, 0), (Some(' '), TermColor::RED, TermColor::RED));
        assert_eq!(f.vt.cell_writes(), 1);
    }

    #[test]
    fn text_is_clipped_by_columns() {
        let mut f = Fixture::new(10, 1);
        f.clip.push(CellRect::new(2, 0, 3, 1));
        f.text(0, 0, "abcdefg", TermColor::WHITE);
        assert_eq!(f.present().row_text(0), "  cde     ");
    }

    #[test]
    fn text_starting_left_of_screen() {
        let mut f = Fixture::new(4, 1);
        f.text(-2, 0, "abcdef", TermColor::WHITE);
        assert_eq!(f.present().row_text(0), "cdef");
    }

    #[test]
    fn text_on_hidden_row_draws_nothing() {
        let mut f = Fixture::new(4, 2);
        f.clip.push(CellRect::new(0, 0, 4, 1));
        f.text(0, 1, "abc", TermColor::WHITE);
        assert_eq!(f.present().cell_writes(), 0);
    }

    #[test]
    fn wide_char_writes_continuation() {
        let mut f = Fixture::new(4, 1);
        f.text(0, 0, "中a", TermColor::WHITE);
        f.present();
        assert_eq!(f.vt.cell(0, 0).character(), Some('中'));
        assert!(f.vt.cell(1, 0).is_continuation());
        assert_eq!(f.vt.cell(1, 0).pair, f.vt.cell(0, 0).pair);
        assert_eq!(f.vt.cell(2, 0).character(), Some('a'));
    }

    #[test]
    fn wide_char_straddling_clip_is_left_out() {
        let mut f = Fixture::new(6, 1);
        f.clip.push(CellRect::new(1, 0, 3, 1));
        f.text(0, 0, "中abc", TermColor::WHITE);
        assert_eq!(f.present().row_text(0), "  ab  ");
    }

    #[test]
    fn invalid_bytes_are_skipped() {
        let mut f = Fixture::new(4, 1);
        f.paint.draw_text(
            &mut f.vt,
            &mut f.pairs,
            &f.clip,
            0,
            0,
            b"a\xffb",
            TermColor::WHITE,
        );
        assert_eq!(f.present().row_text(0), "ab  ");
    }

    // ── Borders ─────────────────────────────────────────────────────────

    #[test]
    fn full_square_border() {
        let mut f = Fixture::new(5, 3);
        f.border(CellRect::new(0, 0, 5, 3), BorderWidths::all(1), Corners::empty());
        let vt = f.present();
        assert_eq!(vt.row_text(0), "┌───┐");
        assert_eq!(vt.row_text(1), "│   │");
        assert_eq!(vt.row_text(2), "└───┘");
    }

    #[test]
    fn rounded_corners_are_per_corner() {
        let mut f = Fixture::new(4, 2);
        f.border(
            CellRect::new(0, 0, 4, 2),
            BorderWidths::all(1),
            Corners::TOP_LEFT | Corners::BOTTOM_RIGHT,
        );
        let vt = f.present();
        assert_eq!(vt.row_text(0), "╭──┐");
        assert_eq!(vt.row_text(1), "└──╯");
    }

    #[test]
    fn missing_side_runs_through_corner() {
        let mut f = Fixture::new(4, 3);
        let widths = BorderWidths {
            top: 1,
            bottom: 1,
            ..BorderWidths::default()
        };
        f.border(CellRect::new(0, 0, 4, 3), widths, Corners::all());
        let vt = f.present();
        assert_eq!(vt.row_text(0), "────");
        assert_eq!(vt.row_text(1), "    ");
        assert_eq!(vt.row_text(2), "────");
    }

    #[test]
    fn border_sides_clip_independently() {
        let mut f = Fixture::new(6, 4);
        // Only the right part of the box is visible.
        f.clip.push(CellRect::new(3, 0, 3, 4));
        f.border(CellRect::new(0, 0, 6, 4), BorderWidths::all(1), Corners::empty());
        let vt = f.present();
        assert_eq!(vt.row_text(0), "   ──┐");
        assert_eq!(vt.row_text(1), "     │");
        assert_eq!(vt.row_text(3), "   ──┘");
    }

    #[test]
    fn border_partly_off_screen() {
        let mut f = Fixture::new(4, 3);
        f.border(CellRect::new(-2, 1, 5, 4), BorderWidths::all(1), Corners::empty());
        let vt = f.present();
        assert_eq!(vt.row_text(0), "    ");
        assert_eq!(vt.row_text(1), "──┐ ");
        assert_eq!(vt.row_text(2), "  │ ");
    }

    #[test]
    fn border_glyphs_inherit_background() {
        let mut f = Fixture::new(3, 3);
        f.fill(CellRect::new(0, 0, 3, 3), TermColor::BLUE);
        f.border(CellRect::new(0, 0, 3, 3), BorderWidths::all(1), Corners::empty());
        let vt = f.present();
        assert_eq!(vt.styled_cell(1, 0), (Some('─'), TermColor::WHITE, TermColor::BLUE));
        assert_eq!(vt.styled_cell(0, 0), (Some('┌'), TermColor::WHITE, TermColor::BLUE));
    }

    #[test]
    fn single_row_box_draws_only_top() {
        let mut f = Fixture::new(3, 1);
        f.border(CellRect::new(0, 0, 3, 1), BorderWidths::all(1), Corners::empty());
        assert_eq!(f.present().row_text(0), "┌─┐");
    }

    // ── Sweep ───────────────────────────────────────────────────────────

    #[test]
    fn sweep_blanks_undrawn_cells() {
        let mut f = Fixture::new(3, 1);
        f.text(0, 0, "abc", TermColor::WHITE);
        f.next_frame();
        f.text(0, 0, "a", TermColor::WHITE);
        assert_eq!(f.present().row_text(0), "a  ");
        assert_eq!(f.paint.stats().cells_swept, 2);
        assert_eq!(f.paint.stats().cells_written, 0);
    }

    #[test]
    fn sweep_on_blank_screen_writes_nothing() {
        let mut f = Fixture::new(3, 2);
        assert_eq!(f.present().cell_writes(), 0);
    }

    #[test]
    fn no_sweep_leaves_undrawn_cells() {
        let mut f = Fixture::new(3, 1);
        f.text(0, 0, "abc", TermColor::WHITE);
        f.next_frame_with(false);
        f.text(0, 0, "x", TermColor::WHITE);
        assert_eq!(f.present().row_text(0), "xbc");
        assert_eq!(f.paint.stats().cells_swept, 0);
    }
}

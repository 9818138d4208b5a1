// SPDX-License-Identifier: MIT
//
// Renderer: owns the terminal session and turns command lists into frames.
//
// Lifecycle:
//
//   Uninitialized ──initialize──▶ Active ──terminate──▶ Terminated
//
// `initialize` twice is a no-op, and `render` outside `Active` does nothing.
// `terminate` is safe from any state, including after a failed
// `initialize`, and runs again from `Drop`, so the terminal is restored on
// every exit path that unwinds. A terminated renderer stays terminated.
//
// A frame:
//
//   1. re-query the terminal size (resizes need no restart)
//   2. reset the clip stack to the full screen
//   3. run every command in order: pixels → cells → clip → paint
//   4. present: write cells that differ from the screen, sweeping cells
//      nothing drew
//   5. flush once
//
// All per-renderer state lives here, not in globals, so independent
// renderers (one per test, say) never see each other.

use cr_term::backend::TerminalBackend;
use cr_term::color::TermColor;
use cr_term::input::Event;
use cr_term::terminal::Size;

use crate::clip::ClipStack;
use crate::color::{ColorPairCache, Rgba, quantize};
use crate::command::RenderCommand;
use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::geometry::{CellRect, Dimensions};
use crate::paint::PaintEngine;
use crate::text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererState {
    Uninitialized,
    Active,
    Terminated,
}

/// What one `render` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Commands in the list, whether or not they drew anything.
    pub commands: usize,
    /// Drawn cells that differed from the screen and were written.
    pub cells_written: usize,
    /// Drawn cells the screen already showed.
    pub cells_skipped: usize,
    /// Undrawn cells reset to blank.
    pub cells_swept: usize,
    /// Scissor pushes dropped because the clip stack was full.
    pub clip_overflows: usize,
}

impl FrameStats {
    /// Cells sent to the terminal, commands and sweep together.
    #[must_use]
    pub const fn total_writes(&self) -> usize {
        self.cells_written + self.cells_swept
    }
}

pub struct Renderer<B: TerminalBackend> {
    backend: B,
    config: RenderConfig,
    state: RendererState,
    size: Size,
    clip: ClipStack,
    pairs: ColorPairCache,
    paint: PaintEngine,
}

impl<B: TerminalBackend> Renderer<B> {
    #[must_use]
    pub fn new(backend: B, config: RenderConfig) -> Self {
        Self {
            backend,
            config,
            state: RendererState::Uninitialized,
            size: Size::default(),
            clip: ClipStack::new(config.max_clip_depth),
            pairs: ColorPairCache::new(config.pair_capacity),
            paint: PaintEngine::new(),
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Take over the terminal. A no-op when already active.
    ///
    /// # Errors
    ///
    /// [`RenderError::Io`] if the terminal can't be set up (it is restored
    /// before returning), [`RenderError::Terminated`] after `terminate`.
    pub fn initialize(&mut self) -> Result<()> {
        match self.state {
            RendererState::Active => return Ok(()),
            RendererState::Terminated => return Err(RenderError::Terminated),
            RendererState::Uninitialized => {}
        }

        if let Err(err) = self.backend.enter() {
            if let Err(restore) = self.backend.leave() {
                tracing::warn!(%restore, "terminal restore after failed setup also failed");
            }
            return Err(err.into());
        }

        self.size = self.backend.size();
        let registrable = usize::from(self.backend.max_pairs()).saturating_sub(1);
        self.pairs.limit_capacity(registrable);
        self.clip.reset(self.screen_rect());
        self.state = RendererState::Active;

        tracing::info!(
            cols = self.size.cols,
            rows = self.size.rows,
            depth = ?self.backend.color_depth(),
            pair_capacity = self.pairs.capacity(),
            "renderer initialized"
        );
        Ok(())
    }

    /// Give the terminal back. Safe to call any number of times, from any
    /// state.
    ///
    /// # Errors
    ///
    /// [`RenderError::Io`] if restoring the terminal fails. The renderer is
    /// terminated regardless.
    pub fn terminate(&mut self) -> Result<()> {
        if self.state == RendererState::Terminated {
            return Ok(());
        }
        self.state = RendererState::Terminated;
        self.backend.leave()?;
        tracing::info!(pairs = self.pairs.len(), "renderer terminated");
        Ok(())
    }

    #[must_use]
    pub const fn state(&self) -> RendererState {
        self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == RendererState::Active
    }

    // ─── Frames ──────────────────────────────────────────────────────────

    /// Paint `commands` and flush the result. Does nothing unless active.
    ///
    /// # Errors
    ///
    /// [`RenderError::Io`] if flushing to the terminal fails.
    pub fn render(&mut self, commands: &[RenderCommand<'_>]) -> Result<FrameStats> {
        if self.state != RendererState::Active {
            return Ok(FrameStats::default());
        }

        self.size = self.backend.size();
        self.clip.reset(self.screen_rect());
        self.paint
            .begin_frame(self.size, self.config.sweep_stale_cells);

        for command in commands {
            self.dispatch(command);
        }
        if self.clip.depth() > 0 {
            tracing::debug!(depth = self.clip.depth(), "frame ended with unclosed scissors");
        }
        self.paint.present(&mut self.backend);

        self.backend.flush()?;

        let paint = self.paint.stats();
        let stats = FrameStats {
            commands: commands.len(),
            cells_written: paint.cells_written,
            cells_skipped: paint.cells_skipped,
            cells_swept: paint.cells_swept,
            clip_overflows: self.clip.overflows(),
        };
        tracing::debug!(?stats, "frame rendered");
        Ok(stats)
    }

    fn dispatch(&mut self, command: &RenderCommand<'_>) {
        let cell = self.config.cell_size;
        match *command {
            RenderCommand::Rectangle { bounds, color } => {
                let fill = self.quantize(color);
                let pair = self.pairs.get_pair(&mut self.backend, fill, fill);
                self.paint.fill_rect(&self.clip, cell.to_cells(bounds), pair);
            }
            RenderCommand::Text {
                bounds,
                text,
                color,
            } => {
                let fg = self.quantize(color.unwrap_or(self.config.default_text_color));
                let at = cell.to_cells(bounds);
                self.paint.draw_text(
                    &mut self.backend,
                    &mut self.pairs,
                    &self.clip,
                    at.x,
                    at.y,
                    text,
                    fg,
                );
            }
            RenderCommand::Border {
                bounds,
                color,
                widths,
                rounded,
            } => {
                let fg = self.quantize(color);
                self.paint.draw_border(
                    &mut self.backend,
                    &mut self.pairs,
                    &self.clip,
                    cell.to_cells(bounds),
                    fg,
                    widths,
                    rounded,
                );
            }
            RenderCommand::ScissorStart { bounds } => {
                self.clip.push(cell.to_cells(bounds));
            }
            RenderCommand::ScissorEnd => self.clip.pop(),
        }
    }

    fn quantize(&self, color: Rgba) -> TermColor {
        quantize(
            color,
            self.backend.color_depth(),
            self.config.grayscale_refinement,
        )
    }

    fn screen_rect(&self) -> CellRect {
        CellRect::new(0, 0, i32::from(self.size.cols), i32::from(self.size.rows))
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Screen size in pixel units, for the layout engine. Re-queries the
    /// terminal, so call it once per frame to follow resizes.
    pub fn layout_dimensions(&mut self) -> Dimensions {
        self.size = self.backend.size();
        self.config
            .cell_size
            .to_pixels(self.size.cols, self.size.rows)
    }

    /// Pixel size of `text` on one line, in this renderer's cell size.
    #[must_use]
    pub fn measure_text(&self, text: &[u8]) -> Dimensions {
        text::measure_text(text, self.config.cell_size)
    }

    /// Next pending input event, without blocking.
    pub fn poll_event(&mut self) -> Option<Event> {
        self.backend.poll_event()
    }

    /// Terminal size as of the last frame or query.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    #[must_use]
    pub const fn pair_cache(&self) -> &ColorPairCache {
        &self.pairs
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub const fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: TerminalBackend> Drop for Renderer<B> {
    fn drop(&mut self) {
        if let Err(err) = self.terminate() {
            tracing::warn!(%err, "terminal restore on drop failed");
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{BorderWidths, Corners};
    use crate::geometry::BoundingBox;
    use cr_term::cell::{Cell, PairId};
    use cr_term::color::ColorDepth;
    use cr_term::input::{KeyCode, KeyEvent};
    use cr_term::virtual_term::VirtualTerminal;
    use pretty_assertions::assert_eq;
    use std::cell::Cell as Counter;
    use std::io;
    use std::rc::Rc;

    /// Cell-unit box in pixels, with the default 8 × 16 cell.
    fn cells(x: u16, y: u16, w: u16, h: u16) -> BoundingBox {
        BoundingBox::new(
            f32::from(x) * 8.0,
            f32::from(y) * 16.0,
            f32::from(w) * 8.0,
            f32::from(h) * 16.0,
        )
    }

    fn active(vt: VirtualTerminal) -> Renderer<VirtualTerminal> {
        active_with(vt, RenderConfig::default())
    }

    fn active_with(vt: VirtualTerminal, config: RenderConfig) -> Renderer<VirtualTerminal> {
        let mut r = Renderer::new(vt, config);
        r.initialize().unwrap();
        r
    }

    fn writes(r: &Renderer<VirtualTerminal>) -> usize {
        r.backend().cell_writes()
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    #[test]
    fn initialize_is_idempotent() {
        let mut r = active(VirtualTerminal::new(4, 2));
        r.initialize().unwrap();
        assert_eq!(r.backend().enter_calls(), 1);
        assert_eq!(r.state(), RendererState::Active);
        assert_eq!(r.size(), Size::new(4, 2));
    }

    #[test]
    fn render_before_initialize_does_nothing() {
        let mut r = Renderer::new(VirtualTerminal::new(4, 2), RenderConfig::default());
        let stats = r
            .render(&[RenderCommand::rectangle(cells(0, 0, 4, 2), Rgba::RED)])
            .unwrap();
        assert_eq!(stats, FrameStats::default());
        assert_eq!(writes(&r), 0);
        assert_eq!(r.backend().flushes(), 0);
    }

    #[test]
    fn terminate_is_idempotent_and_final() {
        let mut r = active(VirtualTerminal::new(4, 2));
        r.terminate().unwrap();
        r.terminate().unwrap();
        assert_eq!(r.backend().leave_calls(), 1);
        assert!(!r.backend().is_active());
        assert!(matches!(r.initialize(), Err(RenderError::Terminated)));
        let stats = r
            .render(&[RenderCommand::rectangle(cells(0, 0, 1, 1), Rgba::RED)])
            .unwrap();
        assert_eq!(stats.cells_written, 0);
    }

    #[test]
    fn terminate_without_initialize_is_safe() {
        let mut r = Renderer::new(VirtualTerminal::new(4, 2), RenderConfig::default());
        r.terminate().unwrap();
        assert_eq!(r.state(), RendererState::Terminated);
    }

    /// Backend that records `leave` from outside and can fail `enter`.
    struct Guarded {
        inner: VirtualTerminal,
        fail_enter: bool,
        left: Rc<Counter<usize>>,
    }

    impl TerminalBackend for Guarded {
        fn enter(&mut self) -> io::Result<()> {
            if self.fail_enter {
                return Err(io::Error::other("no tty"));
            }
            self.inner.enter()
        }
        fn leave(&mut self) -> io::Result<()> {
            self.left.set(self.left.get() + 1);
            self.inner.leave()
        }
        fn size(&mut self) -> Size {
            self.inner.size()
        }
        fn color_depth(&self) -> ColorDepth {
            self.inner.color_depth()
        }
        fn max_pairs(&self) -> u16 {
            self.inner.max_pairs()
        }
        fn init_pair(&mut self, id: PairId, fg: TermColor, bg: TermColor) {
            self.inner.init_pair(id, fg, bg);
        }
        fn pair_content(&self, id: PairId) -> (TermColor, TermColor) {
            self.inner.pair_content(id)
        }
        fn read_cell(&self, x: u16, y: u16) -> Option<Cell> {
            self.inner.read_cell(x, y)
        }
        fn write_cell(&mut self, x: u16, y: u16, cell: Cell) {
            self.inner.write_cell(x, y, cell);
        }
        fn flush(&mut self) -> io::Result<()> {
            self.inner.flush()
        }
        fn poll_event(&mut self) -> Option<Event> {
            self.inner.poll_event()
        }
    }

    fn guarded(fail_enter: bool) -> (Guarded, Rc<Counter<usize>>) {
        let left = Rc::new(Counter::new(0));
        let p = Guarded {
            inner: VirtualTerminal::new(4, 2),
            fail_enter,
            left: Rc::clone(&left),
        };
        (p, left)
    }

    #[test]
    fn drop_restores_terminal() {
        let (p, left) = guarded(false);
        {
            let mut r = Renderer::new(p, RenderConfig::default());
            r.initialize().unwrap();
            assert_eq!(left.get(), 0);
        }
        assert_eq!(left.get(), 1);
    }

    #[test]
    fn failed_initialize_restores_and_reports() {
        let (p, left) = guarded(true);
        let mut r = Renderer::new(p, RenderConfig::default());
        let err = r.initialize().unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
        assert_eq!(left.get(), 1);
        assert_eq!(r.state(), RendererState::Uninitialized);
    }

    // ── The 10 × 5 scenario ─────────────────────────────────────────────

    fn red_screen_with_hi(depth: ColorDepth) -> Renderer<VirtualTerminal> {
        let mut r = active(VirtualTerminal::new(10, 5).with_color_depth(depth));
        r.render(&[
            RenderCommand::rectangle(cells(0, 0, 10, 5), Rgba::RED),
            RenderCommand::plain_text(cells(1, 1, 2, 1), "hi"),
        ])
        .unwrap();
        r
    }

    fn assert_red_screen_with_hi(r: &Renderer<VirtualTerminal>, red: TermColor, white: TermColor) {
        let vt = r.backend();
        for y in 0..5 {
            for x in 0..10 {
                let expected = match (x, y) {
                    (1, 1) => (Some('h'), white, red),
                    (2, 1) => (Some('i'), white, red),
                    _ => (Some(' '), red, red),
                };
                assert_eq!(vt.styled_cell(x, y), expected, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn red_screen_with_text_256() {
        let r = red_screen_with_hi(ColorDepth::Ansi256);
        assert_red_screen_with_hi(&r, TermColor::Indexed(196), TermColor::Indexed(231));
    }

    #[test]
    fn red_screen_with_text_8() {
        let r = red_screen_with_hi(ColorDepth::Ansi8);
        assert_red_screen_with_hi(&r, TermColor::RED, TermColor::WHITE);
    }

    #[test]
    fn identical_frame_writes_nothing() {
        let mut r = red_screen_with_hi(ColorDepth::Ansi256);
        r.backend_mut().reset_counters();
        let stats = r
            .render(&[
                RenderCommand::rectangle(cells(0, 0, 10, 5), Rgba::RED),
                RenderCommand::plain_text(cells(1, 1, 2, 1), "hi"),
            ])
            .unwrap();
        assert_eq!(writes(&r), 0);
        assert_eq!(stats.total_writes(), 0);
        assert_eq!(stats.cells_skipped, 50);
        assert_eq!(r.backend().flushes(), 1);
    }

    #[test]
    fn repeated_overlapping_frame_writes_nothing() {
        let mut r = active(VirtualTerminal::new(12, 4));
        let frame = [
            RenderCommand::rectangle(cells(0, 0, 12, 4), Rgba::BLUE),
            RenderCommand::border(cells(0, 0, 12, 4), Rgba::WHITE, BorderWidths::all(1), Corners::all()),
            RenderCommand::plain_text(cells(1, 1, 6, 1), "中文 ok"),
            RenderCommand::rectangle(cells(2, 2, 3, 1), Rgba::RED),
            RenderCommand::plain_text(cells(2, 2, 2, 1), "中"),
            RenderCommand::rectangle(cells(3, 2, 1, 1), Rgba::GREEN),
        ];
        r.render(&frame).unwrap();
        r.backend_mut().reset_counters();

        let stats = r.render(&frame).unwrap();
        assert_eq!(writes(&r), 0);
        assert_eq!(stats.total_writes(), 0);
        assert_eq!(stats.cells_skipped, 48);
    }

    // ── Clipping ────────────────────────────────────────────────────────

    #[test]
    fn rectangle_outside_clip_writes_nothing() {
        let mut r = active(VirtualTerminal::new(10, 5));
        let stats = r
            .render(&[
                RenderCommand::scissor_start(cells(0, 0, 3, 3)),
                RenderCommand::rectangle(cells(5, 3, 4, 2), Rgba::RED),
                RenderCommand::ScissorEnd,
            ])
            .unwrap();
        assert_eq!(writes(&r), 0);
        assert_eq!(stats.total_writes(), 0);
    }

    #[test]
    fn scissor_limits_fill() {
        let mut r = active(VirtualTerminal::new(6, 3));
        r.render(&[
            RenderCommand::scissor_start(cells(1, 1, 2, 1)),
            RenderCommand::rectangle(cells(0, 0, 6, 3), Rgba::BLUE),
            RenderCommand::ScissorEnd,
            RenderCommand::plain_text(cells(4, 2, 2, 1), "ok"),
        ])
        .unwrap();
        assert_eq!(writes(&r), 4);
        assert_eq!(r.backend().row_text(2), "    ok");
    }

    #[test]
    fn unmatched_scissor_end_is_ignored() {
        let mut r = active(VirtualTerminal::new(4, 1));
        r.render(&[
            RenderCommand::ScissorEnd,
            RenderCommand::plain_text(cells(0, 0, 4, 1), "abcd"),
        ])
        .unwrap();
        assert_eq!(r.backend().row_text(0), "abcd");
    }

    #[test]
    fn unmatched_scissor_start_lasts_one_frame() {
        let mut r = active(VirtualTerminal::new(4, 1));
        r.render(&[
            RenderCommand::scissor_start(cells(0, 0, 2, 1)),
            RenderCommand::plain_text(cells(0, 0, 4, 1), "abcd"),
        ])
        .unwrap();
        assert_eq!(r.backend().row_text(0), "ab  ");

        r.render(&[RenderCommand::plain_text(cells(0, 0, 4, 1), "abcd")])
            .unwrap();
        assert_eq!(r.backend().row_text(0), "abcd");
    }

    #[test]
    fn clip_overflow_is_counted_not_fatal() {
        let config = RenderConfig::default().with_max_clip_depth(2);
        let mut r = active_with(VirtualTerminal::new(6, 1), config);
        let stats = r
            .render(&[
                RenderCommand::scissor_start(cells(0, 0, 4, 1)),
                RenderCommand::scissor_start(cells(0, 0, 1, 1)),
                RenderCommand::scissor_start(cells(0, 0, 1, 1)),
                RenderCommand::plain_text(cells(0, 0, 6, 1), "abcdef"),
                RenderCommand::ScissorEnd,
                RenderCommand::ScissorEnd,
                RenderCommand::ScissorEnd,
            ])
            .unwrap();
        assert_eq!(stats.clip_overflows, 2);
        // Clipping stopped tightening at the first scissor.
        assert_eq!(r.backend().row_text(0), "abcd  ");
    }

    // ── Colors ──────────────────────────────────────────────────────────

    #[test]
    fn pair_cache_limited_by_backend() {
        let r = active(VirtualTerminal::new(2, 1).with_max_pairs(4));
        assert_eq!(r.pair_cache().capacity(), 3);
    }

    #[test]
    fn exhausted_cache_falls_back_to_default_pair() {
        let config = RenderConfig::default().with_pair_capacity(2);
        let mut r = active_with(VirtualTerminal::new(3, 1), config);
        r.render(&[
            RenderCommand::rectangle(cells(0, 0, 1, 1), Rgba::RED),
            RenderCommand::rectangle(cells(1, 0, 1, 1), Rgba::GREEN),
            RenderCommand::rectangle(cells(2, 0, 1, 1), Rgba::BLUE),
        ])
        .unwrap();
        assert_eq!(r.pair_cache().len(), 2);
        assert_eq!(r.backend().cell(0, 0).pair, PairId(1));
        assert_eq!(r.backend().cell(1, 0).pair, PairId(2));
        assert_eq!(r.backend().cell(2, 0).pair, PairId::DEFAULT);
    }

    #[test]
    fn colors_keep_their_pairs_across_frames() {
        let mut r = active(VirtualTerminal::new(2, 1));
        let frame = [
            RenderCommand::rectangle(cells(0, 0, 1, 1), Rgba::GREEN),
            RenderCommand::rectangle(cells(1, 0, 1, 1), Rgba::BLUE),
        ];
        r.render(&frame).unwrap();
        let before = (r.backend().cell(0, 0), r.backend().cell(1, 0));
        r.render(&frame).unwrap();
        assert_eq!((r.backend().cell(0, 0), r.backend().cell(1, 0)), before);
        assert_eq!(r.pair_cache().len(), 2);
    }

    #[test]
    fn text_color_overrides_default() {
        let mut r = active(VirtualTerminal::new(2, 1));
        r.render(&[RenderCommand::text(cells(0, 0, 1, 1), "x", Rgba::GREEN)])
            .unwrap();
        assert_eq!(
            r.backend().styled_cell(0, 0),
            (Some('x'), TermColor::Indexed(46), TermColor::Default)
        );
    }

    // ── Sweep ───────────────────────────────────────────────────────────

    #[test]
    fn removed_content_is_swept() {
        let mut r = red_screen_with_hi(ColorDepth::Ansi256);
        let stats = r
            .render(&[RenderCommand::plain_text(cells(1, 1, 2, 1), "hi")])
            .unwrap();
        assert_eq!(stats.cells_swept, 48);
        assert_eq!(r.backend().row_text(1), " hi       ");
        assert_eq!(r.backend().cell(0, 0), Cell::BLANK);
        // Text now sits on the default background.
        assert_eq!(
            r.backend().styled_cell(1, 1),
            (Some('h'), TermColor::Indexed(231), TermColor::Default)
        );
    }

    #[test]
    fn sweep_can_be_disabled() {
        let config = RenderConfig::default().with_sweep(false);
        let mut r = active_with(VirtualTerminal::new(4, 1), config);
        r.render(&[RenderCommand::plain_text(cells(0, 0, 4, 1), "abcd")])
            .unwrap();
        let stats = r
            .render(&[RenderCommand::plain_text(cells(0, 0, 2, 1), "xy")])
            .unwrap();
        assert_eq!(stats.cells_swept, 0);
        assert_eq!(r.backend().row_text(0), "xycd");
    }

    // ── Borders ─────────────────────────────────────────────────────────

    #[test]
    fn border_over_panel() {
        let mut r = active(VirtualTerminal::new(5, 3));
        r.render(&[
            RenderCommand::rectangle(cells(0, 0, 5, 3), Rgba::BLUE),
            RenderCommand::border(cells(0, 0, 5, 3), Rgba::WHITE, BorderWidths::all(1), Corners::all()),
        ])
        .unwrap();
        assert_eq!(r.backend().row_text(0), "╭───╮");
        assert_eq!(r.backend().row_text(1), "│   │");
        assert_eq!(r.backend().row_text(2), "╰───╯");
        assert_eq!(
            r.backend().styled_cell(0, 1),
            (Some('│'), TermColor::Indexed(231), TermColor::Indexed(21))
        );
    }

    // ── Geometry queries ────────────────────────────────────────────────

    #[test]
    fn layout_dimensions_follow_resize() {
        let mut r = active(VirtualTerminal::new(10, 5));
        assert_eq!(r.layout_dimensions(), Dimensions::new(80.0, 80.0));
        r.backend_mut().resize(20, 10);
        assert_eq!(r.layout_dimensions(), Dimensions::new(160.0, 160.0));
    }

    #[test]
    fn render_picks_up_resize() {
        let mut r = active(VirtualTerminal::new(4, 2));
        r.render(&[RenderCommand::rectangle(cells(0, 0, 10, 10), Rgba::RED)])
            .unwrap();
        r.backend_mut().resize(6, 3);
        let stats = r
            .render(&[RenderCommand::rectangle(cells(0, 0, 10, 10), Rgba::RED)])
            .unwrap();
        assert_eq!(r.size(), Size::new(6, 3));
        assert_eq!(stats.cells_written, 18);
    }

    #[test]
    fn measure_text_uses_cell_size() {
        let r = Renderer::new(VirtualTerminal::new(1, 1), RenderConfig::default());
        assert_eq!(r.measure_text("中ab".as_bytes()), Dimensions::new(32.0, 16.0));
    }

    #[test]
    fn poll_event_passes_through() {
        let mut vt = VirtualTerminal::new(1, 1);
        let q = Event::Key(KeyEvent::plain(KeyCode::Char('q')));
        vt.push_event(q);
        let mut r = active(vt);
        assert_eq!(r.poll_event(), Some(q));
        assert_eq!(r.poll_event(), None);
    }
}

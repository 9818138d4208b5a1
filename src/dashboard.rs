// SPDX-License-Identifier: MIT
//
// The demo dashboard: state, key handling, and a hand-placed layout.
//
// There is no layout engine here. Every box is placed in cell units and
// converted to pixel-space bounds, which is the shape a real layout engine
// would hand the renderer. Text is owned by the `Canvas` and borrowed by the
// command list for the length of one `render` call.
//
//   ┌ sidebar ─────┬ feed header ──────────────────────┐
//   │ server status│ ╭ post ─────────────────────────╮ │
//   │ progress bars│ │ avatar  name / title          │ │  ← scissor
//   │ menu items   │ │ body, actions                 │ │
//   │              │ ╰───────────────────────────────╯ │
//   ├──────────────┴───────────────────────────────────┤
//   │ footer: keys and last frame stats                │
//   └──────────────────────────────────────────────────┘

use cr_render::geometry::CellRect;
use cr_render::text::measure_width;
use cr_render::{BorderWidths, BoundingBox, CellSize, Corners, Dimensions, FrameStats, RenderCommand, Rgba};
use cr_term::input::{Event, KeyCode, KeyEvent, Modifiers, MouseEvent, MouseEventKind};

// ─── Palette ────────────────────────────────────────────────────────────────

const ROOT_BG: Rgba = Rgba::rgb(40, 44, 52);
const PANEL_BG: Rgba = Rgba::rgb(20, 20, 20);
const SIDEBAR_BG: Rgba = Rgba::rgb(30, 30, 60);
const MODAL_BG: Rgba = Rgba::rgb(30, 30, 30);
const FRAME: Rgba = Rgba::rgb(80, 80, 80);
const ACCENT: Rgba = Rgba::rgb(200, 200, 0);
const BODY: Rgba = Rgba::rgb(200, 200, 200);
const MUTED: Rgba = Rgba::rgb(150, 150, 150);
const DIM: Rgba = Rgba::rgb(120, 120, 120);
const TRACK: Rgba = Rgba::rgb(60, 60, 60);

// ─── Layout constants (cells) ───────────────────────────────────────────────

const SIDEBAR_WIDTH: i32 = 26;
const HEADER_HEIGHT: i32 = 3;
const POST_HEIGHT: i32 = 8;
const POST_GAP: i32 = 1;
const POST_COUNT: usize = 12;
const WHEEL_STEP: i32 = 3;
const HELP_WIDTH: i32 = 44;
const HELP_HEIGHT: i32 = 11;

const NAMES: [&str; 8] = [
    "Ada Marsh",
    "Bo Lindqvist",
    "Chidi Okafor",
    "Dara Quinn",
    "Emeka Hale",
    "Fumiko Sato",
    "Gus Moreau",
    "Hana Novak",
];

const TITLES: [&str; 8] = [
    "Kernel hacker",
    "Site reliability",
    "Compiler person",
    "Design systems",
    "Network plumber",
    "ターミナル職人",
    "Database wrangler",
    "Security research",
];

const BODIES: [&str; 5] = [
    "Shipped the new cache layer today. p99 dropped by half.",
    "Anyone else still using 8-color terminals? Asking for a friend.",
    "Box-drawing glyphs are the best part of Unicode. 🌍",
    "Wide characters: 全角文字 take two columns, plan for it.",
    "Flicker-free redraw is mostly about not redrawing.",
];

// ─── Canvas ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Rect(BoundingBox, Rgba),
    Text(BoundingBox, String, Rgba),
    Border(BoundingBox, Rgba, Corners),
    Clip(BoundingBox),
    Unclip,
}

/// One frame's draw operations, placed in cell units.
#[derive(Debug, Clone)]
pub struct Canvas {
    cell: CellSize,
    ops: Vec<Op>,
}

impl Canvas {
    const fn new(cell: CellSize) -> Self {
        Self {
            cell,
            ops: Vec::new(),
        }
    }

    fn bounds(&self, x: i32, y: i32, w: i32, h: i32) -> BoundingBox {
        self.cell.to_bounds(CellRect::new(x, y, w, h))
    }

    fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        let b = self.bounds(x, y, w, h);
        self.ops.push(Op::Rect(b, color));
    }

    fn text(&mut self, x: i32, y: i32, text: impl Into<String>, color: Rgba) {
        let text = text.into();
        let w = i32::try_from(measure_width(text.as_bytes())).unwrap_or(i32::MAX);
        let b = self.bounds(x, y, w, 1);
        self.ops.push(Op::Text(b, text, color));
    }

    fn border(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba, rounded: Corners) {
        let b = self.bounds(x, y, w, h);
        self.ops.push(Op::Border(b, color, rounded));
    }

    fn clip(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let b = self.bounds(x, y, w, h);
        self.ops.push(Op::Clip(b));
    }

    fn unclip(&mut self) {
        self.ops.push(Op::Unclip);
    }

    /// The render commands for this frame, borrowing the canvas text.
    #[must_use]
    pub fn commands(&self) -> Vec<RenderCommand<'_>> {
        self.ops
            .iter()
            .map(|op| match op {
                Op::Rect(b, color) => RenderCommand::rectangle(*b, *color),
                Op::Text(b, text, color) => RenderCommand::text(*b, text, *color),
                Op::Border(b, color, rounded) => {
                    RenderCommand::border(*b, *color, BorderWidths::all(1), *rounded)
                }
                Op::Clip(b) => RenderCommand::scissor_start(*b),
                Op::Unclip => RenderCommand::ScissorEnd,
            })
            .collect()
    }
}

// ─── Dashboard ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Dashboard {
    sidebar_open: bool,
    show_help: bool,
    /// Feed scroll offset in rows.
    scroll: i32,
    quit: bool,
    frames: u64,
    last_frame: FrameStats,
}

impl Dashboard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sidebar_open: true,
            show_help: false,
            scroll: 0,
            quit: false,
            frames: 0,
            last_frame: FrameStats::default(),
        }
    }

    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers,
            }) if modifiers.contains(Modifiers::CTRL) => self.quit = true,
            Event::Key(KeyEvent { modifiers, .. }) if modifiers.contains(Modifiers::CTRL) => {}
            Event::Key(KeyEvent { code, .. }) => match code {
                KeyCode::Char('q' | 'Q') => self.quit = true,
                KeyCode::Char('s' | 'S') => self.sidebar_open = !self.sidebar_open,
                KeyCode::Char('h' | 'H') => self.show_help = !self.show_help,
                KeyCode::Escape => self.show_help = false,
                KeyCode::Up => self.scroll_by(-1),
                KeyCode::Down => self.scroll_by(1),
                KeyCode::PageUp => self.scroll_by(-POST_HEIGHT),
                KeyCode::PageDown => self.scroll_by(POST_HEIGHT),
                _ => {}
            },
            Event::Mouse(MouseEvent { kind, .. }) => match kind {
                MouseEventKind::ScrollUp => self.scroll_by(-WHEEL_STEP),
                MouseEventKind::ScrollDown => self.scroll_by(WHEEL_STEP),
                _ => {}
            },
        }
    }

    fn scroll_by(&mut self, rows: i32) {
        // The upper bound depends on the viewport and is applied in `build`.
        self.scroll = self.scroll.saturating_add(rows).max(0);
    }

    /// Remember what the last frame cost, for the footer.
    pub const fn record_frame(&mut self, stats: FrameStats) {
        self.frames += 1;
        self.last_frame = stats;
    }

    /// Lay out a frame for a screen of `dims` pixels.
    pub fn build(&mut self, dims: Dimensions, cell: CellSize) -> Canvas {
        let cols = to_cells(dims.width, cell.width);
        let rows = to_cells(dims.height, cell.height);
        let mut c = Canvas::new(cell);

        c.rect(0, 0, cols, rows, ROOT_BG);

        let feed_x = if self.sidebar_open && cols > SIDEBAR_WIDTH * 2 {
            Self::sidebar(&mut c, rows - 1);
            SIDEBAR_WIDTH
        } else {
            0
        };
        self.feed(&mut c, feed_x, cols - feed_x, rows - 1);
        self.footer(&mut c, rows - 1);

        if self.show_help {
            Self::help(&mut c, cols, rows);
        }
        c
    }

    fn sidebar(c: &mut Canvas, height: i32) {
        let w = SIDEBAR_WIDTH;
        c.rect(0, 0, w, height, SIDEBAR_BG);
        c.text(2, 1, "SIDEBAR", ACCENT);

        c.rect(1, 3, w - 2, 8, PANEL_BG);
        c.border(1, 3, w - 2, 8, FRAME, Corners::empty());
        c.text(3, 4, "SERVER STATUS", Rgba::WHITE);
        progress_bar(c, 3, 6, w - 6, "CPU", 45, Rgba::rgb(0, 200, 0));
        progress_bar(c, 3, 8, w - 6, "Mem", 82, Rgba::rgb(200, 150, 0));

        let items = [
            (" > Item 1 🌍", Rgba::rgb(0, 255, 255), Corners::empty()),
            (" > Item 2 🌏", Rgba::WHITE, Corners::empty()),
            (" > TL Round", Rgba::rgb(255, 100, 100), Corners::TOP_LEFT),
            (
                " > Diagonal",
                Rgba::rgb(100, 255, 100),
                Corners::TOP_LEFT | Corners::BOTTOM_RIGHT,
            ),
            (
                " > Top Round",
                Rgba::rgb(100, 100, 255),
                Corners::TOP_LEFT | Corners::TOP_RIGHT,
            ),
        ];
        for (y, (label, color, rounded)) in (12..).step_by(3).zip(items) {
            c.rect(1, y, w - 2, 3, PANEL_BG);
            c.border(1, y, w - 2, 3, FRAME, rounded);
            c.text(2, y + 1, label, color);
        }
    }

    fn feed(&mut self, c: &mut Canvas, x: i32, w: i32, h: i32) {
        let view_y = HEADER_HEIGHT;
        let view_h = h - HEADER_HEIGHT;
        let content_h = posts_height() + 1;
        let max_scroll = (content_h - view_h).max(0);
        self.scroll = self.scroll.min(max_scroll);

        c.rect(x, 0, w, HEADER_HEIGHT, PANEL_BG);
        c.border(x, 0, w, HEADER_HEIGHT, FRAME, Corners::empty());
        c.text(x + 2, 1, "Social Feed", Rgba::WHITE);
        let position = format!("{:>3}/{}", self.scroll, max_scroll);
        let pos_w = i32::try_from(position.len()).unwrap_or(0);
        c.text(x + w - pos_w - 2, 1, position, DIM);

        if view_h <= 0 || w <= 2 {
            return;
        }

        c.clip(x, view_y, w, view_h);
        let stride = POST_HEIGHT + POST_GAP;
        for (index, slot) in (0..POST_COUNT).zip(0_i32..) {
            let y = view_y + slot * stride - self.scroll;
            if y + POST_HEIGHT <= view_y || y >= view_y + view_h {
                continue;
            }
            post(c, index, x + 1, y, w - 2);
        }
        let end_y = view_y + posts_height() - self.scroll;
        c.text(x + 2, end_y, "--- End of Feed ---", MUTED);
        c.unclip();
    }

    fn footer(&self, c: &mut Canvas, y: i32) {
        let stats = self.last_frame;
        c.text(
            1,
            y,
            format!(
                "↑/↓ scroll · s sidebar · h help · q quit    frame {} · {} cells written · {} unchanged",
                self.frames,
                stats.total_writes(),
                stats.cells_skipped,
            ),
            DIM,
        );
    }

    fn help(c: &mut Canvas, cols: i32, rows: i32) {
        let x = (cols - HELP_WIDTH).max(0) / 2;
        let y = (rows - HELP_HEIGHT).max(0) / 2;
        c.rect(x, y, HELP_WIDTH, HELP_HEIGHT, MODAL_BG);
        c.border(x, y, HELP_WIDTH, HELP_HEIGHT, ACCENT, Corners::all());
        c.text(x + 2, y + 1, "Dashboard Help", Rgba::WHITE);
        c.text(x + 2, y + 3, "Keys:", ACCENT);
        c.text(x + 2, y + 4, "- UP / DOWN / WHEEL: scroll the feed", BODY);
        c.text(x + 2, y + 5, "- S: toggle sidebar", BODY);
        c.text(x + 2, y + 6, "- H: toggle this help", BODY);
        c.text(x + 2, y + 7, "- Q: quit", BODY);
        c.text(x + 2, y + 9, "Press 'H' to close.", Rgba::rgb(100, 100, 100));
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

fn post(c: &mut Canvas, index: usize, x: i32, y: i32, w: i32) {
    c.rect(x, y, w, POST_HEIGHT, PANEL_BG);
    c.border(x, y, w, POST_HEIGHT, FRAME, Corners::all());

    // Keep long lines inside the frame.
    c.clip(x + 1, y + 1, w - 2, POST_HEIGHT - 2);
    c.rect(x + 2, y + 1, 4, 2, avatar_color(index));
    c.text(x + 8, y + 1, NAMES[index % NAMES.len()], Rgba::WHITE);
    c.text(x + 8, y + 2, TITLES[index % TITLES.len()], MUTED);
    c.text(x + 2, y + 4, BODIES[index % BODIES.len()], BODY);
    c.text(x + 2, y + 6, "[ Like ]", Rgba::rgb(0, 255, 0));
    c.text(x + 12, y + 6, "[ Comment ]", Rgba::rgb(0, 100, 255));
    c.text(x + 25, y + 6, "[ Share ]", Rgba::rgb(255, 0, 0));
    c.unclip();
}

fn progress_bar(c: &mut Canvas, x: i32, y: i32, w: i32, label: &str, percent: u8, color: Rgba) {
    c.text(x, y, format!("{label:<5}{percent:>3}%"), Rgba::WHITE);
    c.rect(x, y + 1, w, 1, TRACK);
    c.rect(x, y + 1, w * i32::from(percent.min(100)) / 100, 1, color);
}

fn avatar_color(index: usize) -> Rgba {
    let channel = |k: usize| u8::try_from(index.wrapping_mul(k) % 255).unwrap_or(0);
    Rgba::rgb(channel(50), channel(80), channel(30))
}

#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
const fn posts_height() -> i32 {
    POST_COUNT as i32 * (POST_HEIGHT + POST_GAP)
}

#[allow(clippy::cast_possible_truncation)]
fn to_cells(px: f32, cell: f32) -> i32 {
    (px / cell) as i32
}

// ─── Tests ──────────────────────────────────────────────────────────────────

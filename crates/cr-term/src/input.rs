// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into keys and mouse actions for the protocols the
// terminal is put into by `Terminal::enter`:
//
// - Control bytes and printable ASCII
// - UTF-8 multi-byte characters
// - CSI sequences (arrows, editing keys, function keys, xterm modifiers)
// - SS3 sequences (application cursor keys, F1-F4)
// - SGR mouse reports (press, release, drag, wheel)
// - Alt+key (ESC followed by a printable byte)
//
// Escape sequences can be split across reads, so the parser buffers
// incomplete input. Feed bytes with [`Parser::advance`]; when no more bytes
// are coming, [`Parser::flush`] turns a pending lone ESC into an Escape key.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A parsed input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    BackTab,
    Backspace,
    Escape,
    Insert,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// F1 through F12.
    F(u8),
}

bitflags! {
    /// Modifier keys, in xterm's `param = 1 + bitmask` encoding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    /// 0-indexed column.
    pub x: u16,
    /// 0-indexed row.
    pub y: u16,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Press(MouseButton),
    Release(MouseButton),
    Drag(MouseButton),
    Move,
    ScrollUp,
    ScrollDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Incremental input parser.
///
/// A lone `ESC` is ambiguous: the Escape key, or the first byte of a
/// sequence still in flight. The parser keeps it pending until more bytes
/// arrive or the caller calls [`flush`](Parser::flush).
pub struct Parser {
    buf: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Feed bytes and return every event that is now complete.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut used = 0;

        while let Some(rest) = self.buf.get(used..).filter(|r| !r.is_empty()) {
            used += match parse_one(rest) {
                Step::Emit(event, n) => {
                    events.push(event);
                    n
                }
                Step::Discard(n) => n,
                Step::NeedMore => break,
            };
        }

        self.buf.drain(..used);
        events
    }

    /// Whether bytes are waiting for the rest of a sequence.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve pending bytes as literal keys: a lone ESC becomes Escape,
    /// anything else is dropped unless it is printable.
    pub fn flush(&mut self) -> Vec<Event> {
        let events = self
            .buf
            .iter()
            .filter_map(|&b| match b {
                0x1B => Some(key(KeyCode::Escape, Modifiers::empty())),
                0x20..=0x7E => Some(key(KeyCode::Char(b as char), Modifiers::empty())),
                _ => None,
            })
            .collect();
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing ──────────────────────────────────────────────────────

/// Outcome of looking at the front of the pending bytes.
enum Step {
    /// An event and how many bytes it used.
    Emit(Event, usize),
    /// A sequence has started but is not complete yet.
    NeedMore,
    /// Bytes that mean nothing to us.
    Discard(usize),
}

fn parse_one(buf: &[u8]) -> Step {
    match buf[0] {
        0x1B => parse_escape(buf),
        0x08 | 0x7F => Step::Emit(key(KeyCode::Backspace, Modifiers::empty()), 1),
        0x09 => Step::Emit(key(KeyCode::Tab, Modifiers::empty()), 1),
        0x0A | 0x0D => Step::Emit(key(KeyCode::Enter, Modifiers::empty()), 1),
        0x00 => Step::Emit(key(KeyCode::Char('@'), Modifiers::CTRL), 1),
        b @ 0x01..=0x1A => Step::Emit(key(KeyCode::Char((b + b'a' - 1) as char), Modifiers::CTRL), 1),
        b @ 0x20..=0x7E => Step::Emit(key(KeyCode::Char(b as char), Modifiers::empty()), 1),
        0xC0..=0xF7 => parse_utf8(buf),
        _ => Step::Discard(1),
    }
}

fn parse_escape(buf: &[u8]) -> Step {
    let Some(&next) = buf.get(1) else {
        return Step::NeedMore;
    };
    match next {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        0x1B => Step::Emit(key(KeyCode::Escape, Modifiers::ALT), 2),
        b @ 0x20..=0x7E => Step::Emit(key(KeyCode::Char(b as char), Modifiers::ALT), 2),
        _ => Step::Emit(key(KeyCode::Escape, Modifiers::empty()), 1),
    }
}

fn parse_csi(buf: &[u8]) -> Step {
    if buf.get(2) == Some(&b'<') {
        return parse_sgr_mouse(buf);
    }

    // Parameter bytes 0x30-0x3F, intermediates 0x20-0x2F, final 0x40-0x7E.
    let mut end = 2;
    loop {
        let Some(&b) = buf.get(end) else {
            return Step::NeedMore;
        };
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Step::Discard(end + 1);
        }
        end += 1;
    }

    let params = parse_params(&buf[2..end]);
    let consumed = end + 1;
    let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    let code = match buf[end] {
        b'Z' => KeyCode::BackTab,
        b'~' => match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            15 => KeyCode::F(5),
            17 => KeyCode::F(6),
            18 => KeyCode::F(7),
            19 => KeyCode::F(8),
            20 => KeyCode::F(9),
            21 => KeyCode::F(10),
            23 => KeyCode::F(11),
            24 => KeyCode::F(12),
            _ => return Step::Discard(consumed),
        },
        b => match letter_key(b) {
            Some(code) => code,
            None => return Step::Discard(consumed),
        },
    };

    Step::Emit(key(code, modifiers), consumed)
}

fn parse_ss3(buf: &[u8]) -> Step {
    let Some(&b) = buf.get(2) else {
        return Step::NeedMore;
    };
    // SS3 M is keypad Enter in application mode.
    let code = if b == b'M' { Some(KeyCode::Enter) } else { letter_key(b) };
    code.map_or(Step::Discard(3), |code| Step::Emit(key(code, Modifiers::empty()), 3))
}

/// `ESC [ < Cb ; Cx ; Cy M` (press, motion) or `... m` (release).
fn parse_sgr_mouse(buf: &[u8]) -> Step {
    let mut end = 3;
    loop {
        let Some(&b) = buf.get(end) else {
            return Step::NeedMore;
        };
        if b == b'M' || b == b'm' {
            break;
        }
        if !b.is_ascii_digit() && b != b';' {
            return Step::Discard(end + 1);
        }
        end += 1;
    }

    let params = parse_params(&buf[3..end]);
    let [cb, cx, cy] = match params.as_slice() {
        &[cb, cx, cy] => [cb, cx, cy],
        _ => return Step::Discard(end + 1),
    };
    let is_release = buf[end] == b'm';

    let modifiers = [(4, Modifiers::SHIFT), (8, Modifiers::ALT), (16, Modifiers::CTRL)]
        .into_iter()
        .filter(|&(bit, _)| cb & bit != 0)
        .fold(Modifiers::empty(), |acc, (_, m)| acc | m);

    let base = cb & 3;
    let kind = if cb & 64 != 0 {
        match base {
            0 => MouseEventKind::ScrollUp,
            1 => MouseEventKind::ScrollDown,
            _ => return Step::Discard(end + 1),
        }
    } else if cb & 32 != 0 {
        decode_button(base).map_or(MouseEventKind::Move, MouseEventKind::Drag)
    } else {
        let button = decode_button(base).unwrap_or(MouseButton::Left);
        if is_release {
            MouseEventKind::Release(button)
        } else {
            MouseEventKind::Press(button)
        }
    };

    Step::Emit(
        Event::Mouse(MouseEvent {
            kind,
            x: cx.saturating_sub(1),
            y: cy.saturating_sub(1),
            modifiers,
        }),
        end + 1,
    )
}

fn parse_utf8(buf: &[u8]) -> Step {
    let len = match buf[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    };
    if buf.len() < len {
        return Step::NeedMore;
    }
    match std::str::from_utf8(&buf[..len]).ok().and_then(|s| s.chars().next()) {
        Some(ch) => Step::Emit(key(KeyCode::Char(ch), Modifiers::empty()), len),
        None => Step::Discard(1),
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Final bytes shared by CSI and SS3 cursor and function keys.
const fn letter_key(b: u8) -> Option<KeyCode> {
    Some(match b {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return None,
    })
}

const fn key(code: KeyCode, modifiers: Modifiers) -> Event {
    Event::Key(KeyEvent { code, modifiers })
}

/// Semicolon-separated decimal parameters. Empty fields are 0.
fn parse_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &d| acc.saturating_mul(10).saturating_add(u16::from(d - b'0')))
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    Modifiers::from_bits_truncate(param.saturating_sub(1) as u8)
}

const fn decode_button(base: u16) -> Option<MouseButton> {
    match base {
        0 => Some(MouseButton::Left),
        1 => Some(MouseButton::Middle),
        2 => Some(MouseButton::Right),
        _ => None,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

// SPDX-License-Identifier: MIT
//
// Byte-level encoding of the escape sequences the renderer sends.
//
// Nothing here tracks state or decides whether a sequence is needed; that
// is `CellWriter`'s job. Coordinates are 0-based on our side and converted
// to the terminal's 1-based CUP arguments on the way out.

use std::io::{self, Write};

use crate::color::TermColor;

/// DEC private modes, toggled with `CSI ? n h` and `CSI ? n l`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Mode {
    /// DECCKM: arrow keys report as `SS3 A` rather than `CSI A`.
    AppCursorKeys = 1,
    /// DECTCEM.
    CursorVisible = 25,
    /// Report button presses, releases and the wheel.
    MouseClicks = 1000,
    /// Encode mouse reports as `CSI < b ; x ; y M/m`.
    SgrMouse = 1006,
    AltScreen = 1049,
    /// Hold painting until the mode is reset, so a frame lands in one piece.
    /// Terminals without support ignore it.
    SyncOutput = 2026,
}

#[inline]
pub fn set(w: &mut impl Write, mode: Mode) -> io::Result<()> {
    write!(w, "\x1b[?{}h", mode as u16)
}

#[inline]
pub fn unset(w: &mut impl Write, mode: Mode) -> io::Result<()> {
    write!(w, "\x1b[?{}l", mode as u16)
}

/// Application keypad on (DECCKM plus DECKPAM) or back to normal.
/// The input parser accepts arrows in either form.
pub fn keypad(w: &mut impl Write, application: bool) -> io::Result<()> {
    if application {
        set(w, Mode::AppCursorKeys)?;
        w.write_all(b"\x1b=")
    } else {
        unset(w, Mode::AppCursorKeys)?;
        w.write_all(b"\x1b>")
    }
}

/// SGR mouse reporting on or off. Off undoes the modes in reverse order.
pub fn mouse(w: &mut impl Write, on: bool) -> io::Result<()> {
    if on {
        set(w, Mode::MouseClicks)?;
        set(w, Mode::SgrMouse)
    } else {
        unset(w, Mode::SgrMouse)?;
        unset(w, Mode::MouseClicks)
    }
}

#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// SGR 0. Any writer tracking colors has to forget them afterwards.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Foreground color: 30-37, 90-97, `38;5;n`, or 39 for the default.
pub fn fg(w: &mut impl Write, color: TermColor) -> io::Result<()> {
    sgr_color(w, 30, color)
}

/// Background color: 40-47, 100-107, `48;5;n`, or 49 for the default.
pub fn bg(w: &mut impl Write, color: TermColor) -> io::Result<()> {
    sgr_color(w, 40, color)
}

fn sgr_color(w: &mut impl Write, base: u16, color: TermColor) -> io::Result<()> {
    match color {
        TermColor::Default => write!(w, "\x1b[{}m", base + 9),
        TermColor::Indexed(n @ 0..=7) => write!(w, "\x1b[{}m", base + u16::from(n)),
        TermColor::Indexed(n @ 8..=15) => write!(w, "\x1b[{}m", base + 52 + u16::from(n)),
        TermColor::Indexed(n) => write!(w, "\x1b[{};5;{n}m", base + 8),
    }
}

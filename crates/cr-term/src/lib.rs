// SPDX-License-Identifier: MIT
//
// cr-term: terminal device layer for cellrender.
//
// Raw mode and RAII restore, ANSI encoding, the on-screen cell grid, palette
// colors, input parsing, and the `TerminalBackend` trait the renderer draws
// through. Two backends ship here: `AnsiBackend` for a real terminal and
// `VirtualTerminal` for tests and headless use.
//
// No TUI framework underneath: output is hand-encoded ANSI and raw mode is
// plain termios, so every byte sent to the terminal is accounted for.

pub mod ansi;
pub mod backend;
pub mod cell;
pub mod color;
pub mod input;
pub mod output;
pub mod screen;
pub mod terminal;
pub mod virtual_term;

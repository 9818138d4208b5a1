// SPDX-License-Identifier: MIT
//
// Session control for the real terminal: raw input, the alternate screen,
// and getting both back to normal.
//
// Raw mode lives in its own guard, `RawMode`, which puts the saved termios
// back when it is dropped. `Terminal` holds one while a session is open and
// separately remembers whether the screen modes were sent, so a session that
// failed half way through `enter` can still be unwound by `leave`.
//
// A panic hook covers the case where neither runs. It writes a fixed restore
// sequence straight to fd 1 (the stdout lock may be held by the panicking
// frame) and resets termios from a process-wide copy before the previous
// hook prints its message.
//
// The POSIX calls here (termios, ioctl, isatty, poll, read, write) have no
// std equivalent, hence the module-level allowance below.
#![allow(unsafe_code)]

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi::{self, Mode};

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    /// Columns, left to right.
    pub cols: u16,
    /// Rows, top to bottom.
    pub rows: u16,
}

impl Size {
    #[inline]
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.cols == 0 || self.rows == 0
    }
}

/// Used whenever the OS reports no size, e.g. output piped to a file.
pub const FALLBACK_SIZE: Size = Size { cols: 80, rows: 24 };

/// Window size of stdout as reported by `TIOCGWINSZ`, if it has one.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };
    let size = Size::new(ws.ws_col, ws.ws_row);
    (rc == 0 && !size.is_empty()).then_some(size)
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Whether stdin is a terminal. Raw mode is skipped when it is not.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

/// Undoes every mode `Terminal::enter` sets, leaving the alternate screen
/// last so the shell's scrollback comes back intact.
#[rustfmt::skip]
const RESTORE_SEQUENCE: &[u8] = b"\
    \x1b[?2026l\
    \x1b[?1006l\x1b[?1000l\
    \x1b[?1l\x1b>\
    \x1b[0m\
    \x1b[?25h\
    \x1b[?1049l";

/// termios as it was before raw mode, for the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

static HOOK: Once = Once::new();

fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            write_restore_unlocked();
            #[cfg(unix)]
            restore_saved_termios();
            previous(info);
        }));
    });
}

fn write_restore_unlocked() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            RESTORE_SEQUENCE.as_ptr().cast::<libc::c_void>(),
            RESTORE_SEQUENCE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let mut out = io::stdout();
        let _ = out.write_all(RESTORE_SEQUENCE);
        let _ = out.flush();
    }
}

#[cfg(unix)]
fn restore_saved_termios() {
    if let Ok(saved) = SAVED_TERMIOS.lock() {
        if let Some(termios) = saved.as_ref() {
            let _ = set_termios(termios, libc::TCSANOW);
        }
    }
}

#[cfg(unix)]
fn set_termios(termios: &libc::termios, when: libc::c_int) -> io::Result<()> {
    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, when, termios) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Raw input on stdin for as long as the guard lives.
///
/// Input is unbuffered and unechoed, signals are off (Ctrl-C reaches the
/// application as a byte), and output post-processing is disabled.
#[cfg(unix)]
struct RawMode {
    saved: libc::termios,
    restored: bool,
}

#[cfg(unix)]
impl RawMode {
    /// Switch stdin to raw mode. `None` when stdin is not a terminal.
    fn enable() -> io::Result<Option<Self>> {
        if !is_tty() {
            return Ok(None);
        }

        let mut saved: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut saved) } != 0 {
            return Err(io::Error::last_os_error());
        }

        let mut raw = saved;
        raw.c_iflag &= !(libc::IGNBRK
            | libc::BRKINT
            | libc::PARMRK
            | libc::ISTRIP
            | libc::INLCR
            | libc::IGNCR
            | libc::ICRNL
            | libc::IXON);
        raw.c_oflag &= !libc::OPOST;
        raw.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
        raw.c_cflag = (raw.c_cflag & !(libc::CSIZE | libc::PARENB)) | libc::CS8;
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;

        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = Some(saved);
        }
        set_termios(&raw, libc::TCSAFLUSH)?;
        Ok(Some(Self { saved, restored: false }))
    }

    /// Put the saved settings back, reporting failure.
    fn restore(mut self) -> io::Result<()> {
        self.restored = true;
        self.apply_saved()
    }

    fn apply_saved(&self) -> io::Result<()> {
        let result = set_termios(&self.saved, libc::TCSAFLUSH);
        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = None;
        }
        result
    }
}

#[cfg(unix)]
impl Drop for RawMode {
    fn drop(&mut self) {
        if !self.restored {
            let _ = self.apply_saved();
        }
    }
}

#[cfg(not(unix))]
struct RawMode;

#[cfg(not(unix))]
impl RawMode {
    #[allow(clippy::unnecessary_wraps)]
    const fn enable() -> io::Result<Option<Self>> {
        Ok(None)
    }

    #[allow(clippy::unnecessary_wraps)]
    const fn restore(self) -> io::Result<()> {
        Ok(())
    }
}

/// A full-screen session on the process's own terminal.
///
/// [`enter`](Self::enter) turns on raw input, the alternate screen, a hidden
/// cursor, application keypad mode and SGR mouse reporting.
/// [`leave`](Self::leave) turns them off again; so does dropping the value.
///
/// ```no_run
/// use cr_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// term.write_frame(b"\x1b[1;1Hhello")?;
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    raw: Option<RawMode>,
    /// Screen modes have been (at least partly) sent.
    screen: bool,
    size: Size,
}

impl Terminal {
    /// Query the size without changing any terminal mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: None,
            screen: false,
            size: get_size().unwrap_or(FALLBACK_SIZE),
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Ask the OS again. A failed query keeps the previous value.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(size) = get_size() {
            self.size = size;
        }
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.screen
    }

    /// Start the session. Calling it on an open session does nothing.
    ///
    /// # Errors
    ///
    /// Fails if raw mode cannot be set or the mode sequences cannot be
    /// written. Whatever was already switched on stays recorded, so
    /// [`leave`](Self::leave) can undo it.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.screen {
            return Ok(());
        }
        install_panic_hook();

        if self.raw.is_none() {
            self.raw = RawMode::enable()?;
        }

        self.screen = true;
        let mut out = io::stdout().lock();
        ansi::set(&mut out, Mode::AltScreen)?;
        ansi::unset(&mut out, Mode::CursorVisible)?;
        ansi::clear_screen(&mut out)?;
        ansi::keypad(&mut out, true)?;
        ansi::mouse(&mut out, true)?;
        out.flush()?;

        tracing::info!(
            cols = self.size.cols,
            rows = self.size.rows,
            raw = self.raw.is_some(),
            "terminal session started"
        );
        Ok(())
    }

    /// End the session. Safe to call repeatedly, and after an `enter` that
    /// failed or never happened.
    ///
    /// # Errors
    ///
    /// Returns the first failure. termios is restored even when writing
    /// the screen sequences fails.
    pub fn leave(&mut self) -> io::Result<()> {
        let screen = if self.screen {
            self.screen = false;
            Self::reset_screen()
        } else {
            Ok(())
        };
        let termios = self.raw.take().map_or(Ok(()), RawMode::restore);

        screen.and(termios)?;
        tracing::info!("terminal session ended");
        Ok(())
    }

    fn reset_screen() -> io::Result<()> {
        let mut out = io::stdout().lock();
        ansi::unset(&mut out, Mode::SyncOutput)?;
        ansi::mouse(&mut out, false)?;
        ansi::keypad(&mut out, false)?;
        ansi::reset(&mut out)?;
        ansi::set(&mut out, Mode::CursorVisible)?;
        ansi::unset(&mut out, Mode::AltScreen)?;
        out.flush()
    }

    /// Send one frame's bytes as a single write, then flush.
    ///
    /// # Errors
    ///
    /// Propagates the write error.
    pub fn write_frame(&self, bytes: &[u8]) -> io::Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let mut out = io::stdout().lock();
        out.write_all(bytes)?;
        out.flush()
    }

    /// Read whatever is waiting on stdin, never blocking. Outside a
    /// session, or with nothing pending, this is `Ok(0)`.
    ///
    /// # Errors
    ///
    /// OS errors from `poll` or `read`, except `EINTR`.
    #[cfg(unix)]
    pub fn read_pending(&self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.screen || buf.is_empty() {
            return Ok(0);
        }

        let mut pfd = libc::pollfd {
            fd: libc::STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        };
        let ready = unsafe { libc::poll(&raw mut pfd, 1, 0) };
        if ready <= 0 || pfd.revents & libc::POLLIN == 0 {
            return if ready < 0 { interrupted_as_empty() } else { Ok(0) };
        }

        let n = unsafe {
            libc::read(
                libc::STDIN_FILENO,
                buf.as_mut_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };
        usize::try_from(n).or_else(|_| interrupted_as_empty())
    }

    #[cfg(not(unix))]
    pub fn read_pending(&self, _buf: &mut [u8]) -> io::Result<usize> {
        Ok(0)
    }
}

#[cfg(unix)]
fn interrupted_as_empty() -> io::Result<usize> {
    let err = io::Error::last_os_error();
    if err.kind() == io::ErrorKind::Interrupted {
        Ok(0)
    } else {
        Err(err)
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

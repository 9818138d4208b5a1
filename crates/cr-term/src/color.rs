// SPDX-License-Identifier: MIT
//
// Palette colors: what a terminal cell can actually display.
//
// A character-cell terminal does not take arbitrary RGB in the mode we
// drive it: colors are palette indices. Either the eight standard colors
// (every terminal since the VT100 era) or the xterm 256-color palette:
//
//   0–7      standard colors
//   8–15     bright variants
//   16–231   6×6×6 color cube
//   232–255  24-step grayscale ramp
//
// Which of the two palettes is usable is a property of the terminal,
// discovered once at startup by `ColorDepth::detect`. Everything that maps
// RGBA onto these indices lives in the render crate; this module only
// names the indices and knows what RGB each one stands for.

use std::fmt;

// ─── TermColor ──────────────────────────────────────────────────────────────

/// A color as the terminal understands it: a palette index, or the
/// terminal's own default.
///
/// `Default` maps to SGR 39/49 and inherits the user's terminal theme.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TermColor {
    /// The terminal's configured default foreground / background.
    #[default]
    Default,
    /// Palette index (0–7 on 8-color terminals, 0–255 on 256-color ones).
    Indexed(u8),
}

impl TermColor {
    pub const BLACK: Self = Self::Indexed(0);
    pub const RED: Self = Self::Indexed(1);
    pub const GREEN: Self = Self::Indexed(2);
    pub const YELLOW: Self = Self::Indexed(3);
    pub const BLUE: Self = Self::Indexed(4);
    pub const MAGENTA: Self = Self::Indexed(5);
    pub const CYAN: Self = Self::Indexed(6);
    pub const WHITE: Self = Self::Indexed(7);

    /// Whether this is the terminal default color.
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }

    /// The palette index, or `None` for [`TermColor::Default`].
    #[inline]
    #[must_use]
    pub const fn index(self) -> Option<u8> {
        match self {
            Self::Indexed(idx) => Some(idx),
            Self::Default => None,
        }
    }
}

impl fmt::Debug for TermColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Indexed(idx) => write!(f, "ansi({idx})"),
        }
    }
}

impl fmt::Display for TermColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ─── ColorDepth ─────────────────────────────────────────────────────────────

/// How many palette entries the terminal can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorDepth {
    /// The eight standard colors only.
    #[default]
    Ansi8,
    /// The full xterm 256-color palette.
    Ansi256,
}

impl ColorDepth {
    /// Detect the color depth from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::detect(|key| std::env::var(key).ok())
    }

    /// Detect the color depth from an environment lookup function.
    ///
    /// Resolution order:
    ///
    /// 1. `CR_COLORS`: explicit override, `8` or `256`.
    /// 2. `COLORTERM` of `truecolor` / `24bit`: anything with direct color
    ///    has the 256 palette too.
    /// 3. `TERM` containing `256color`.
    /// 4. Anything else (including a missing or `dumb` `TERM`) falls back to
    ///    the eight standard colors.
    pub fn detect<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(forced) = lookup("CR_COLORS") {
            match forced.trim() {
                "8" => return Self::Ansi8,
                "256" => return Self::Ansi256,
                other => tracing::warn!(value = other, "ignoring unrecognized CR_COLORS"),
            }
        }

        if lookup("COLORTERM")
            .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "truecolor" | "24bit"))
        {
            return Self::Ansi256;
        }

        if lookup("TERM").is_some_and(|t| t.contains("256color")) {
            return Self::Ansi256;
        }

        Self::Ansi8
    }
}

// ─── xterm palette ──────────────────────────────────────────────────────────

/// The standard sixteen colors as RGB, using the xterm defaults.
///
/// Individual terminals override these, but for distance comparisons they
/// are a reasonable reference.
pub const ANSI16_RGB: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (128, 0, 0),
    (0, 128, 0),
    (128, 128, 0),
    (0, 0, 128),
    (128, 0, 128),
    (0, 128, 128),
    (192, 192, 192),
    (128, 128, 128),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (0, 0, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

/// Channel values of the six color-cube steps.
pub const CUBE_STEPS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// RGB value of an xterm 256-color palette index.
#[must_use]
pub fn ansi256_to_rgb(idx: u8) -> (u8, u8, u8) {
    match idx {
        0..=15 => ANSI16_RGB[idx as usize],
        16..=231 => {
            let i = idx - 16;
            (
                CUBE_STEPS[usize::from(i / 36)],
                CUBE_STEPS[usize::from((i % 36) / 6)],
                CUBE_STEPS[usize::from(i % 6)],
            )
        }
        232..=255 => {
            let v = 8 + 10 * (idx - 232);
            (v, v, v)
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

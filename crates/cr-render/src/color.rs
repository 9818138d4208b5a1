// SPDX-License-Identifier: MIT
//
// Color quantizing and the color pair cache.
//
// Layout hands us 24-bit RGBA. The terminal can show a palette index, so
// every color is quantized first:
//
//   8 colors    each channel thresholded at 128 to one bit, the three bits
//               picking one of the eight standard colors
//   256 colors  each channel bucketed into six levels of the xterm color
//               cube, optionally refined against the grayscale ramp
//
// A cell is drawn with a color pair, not two colors, so the quantized
// (fg, bg) combination is looked up in `ColorPairCache`. A miss registers a
// new pair with the backend. The cache never evicts: an id, once handed
// out, means that combination for as long as the renderer lives. Changing
// a live pair would recolor every cell already on screen that uses it.
// Once the cache is full, new combinations get pair 0 (terminal defaults).

use std::collections::HashMap;

use cr_term::backend::TerminalBackend;
use cr_term::cell::PairId;
use cr_term::color::{ColorDepth, TermColor, ansi256_to_rgb};

/// Pairs the cache hands out by default, pair 0 not counted.
pub const DEFAULT_PAIR_CAPACITY: usize = 1024;

// ─── Rgba ───────────────────────────────────────────────────────────────────

/// A 24-bit color with alpha. Cells are opaque, so alpha is carried but
/// never blended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Carried through commands, ignored when quantizing.
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque.
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

// ─── Quantize ───────────────────────────────────────────────────────────────

/// Map `color` onto the palette `depth` offers.
///
/// `grayscale` lets near-gray colors on a 256-color terminal use the
/// 24-step gray ramp when it is closer than the cube.
#[must_use]
pub fn quantize(color: Rgba, depth: ColorDepth, grayscale: bool) -> TermColor {
    match depth {
        ColorDepth::Ansi8 => TermColor::Indexed(quantize_ansi8(color)),
        ColorDepth::Ansi256 => {
            let cube = cube_index(color);
            if grayscale {
                TermColor::Indexed(refine_gray(color, cube))
            } else {
                TermColor::Indexed(cube)
            }
        }
    }
}

/// Threshold each channel at the midpoint. The most saturated match wins:
/// all three bits is white, none is black, then the two-bit mixes, then
/// the primaries.
const fn quantize_ansi8(c: Rgba) -> u8 {
    let (r, g, b) = (c.r > 128, c.g > 128, c.b > 128);
    match (r, g, b) {
        (true, true, true) => 7,
        (false, false, false) => 0,
        (true, true, false) => 3,
        (true, false, true) => 5,
        (false, true, true) => 6,
        (true, false, false) => 1,
        (false, true, false) => 2,
        (false, false, true) => 4,
    }
}

/// `16 + 36r + 6g + b` with each channel floored into six levels.
#[allow(clippy::cast_possible_truncation)]
fn cube_index(c: Rgba) -> u8 {
    let level = |v: u8| (u16::from(v) * 5 / 255) as u8;
    16 + 36 * level(c.r) + 6 * level(c.g) + level(c.b)
}

/// Channels further apart than this are not considered gray.
const GRAY_TOLERANCE: u8 = 8;

#[allow(clippy::cast_possible_truncation)]
fn refine_gray(c: Rgba, cube: u8) -> u8 {
    let max = c.r.max(c.g).max(c.b);
    let min = c.r.min(c.g).min(c.b);
    if max - min > GRAY_TOLERANCE {
        return cube;
    }
    let avg = ((u16::from(c.r) + u16::from(c.g) + u16::from(c.b)) / 3) as u8;
    // Ramp entry n is 8 + 10n, n in 0..24.
    let step = (u16::from(avg.saturating_sub(3)) / 10).min(23) as u8;
    let ramp = 232 + step;
    if distance(c, ansi256_to_rgb(ramp)) < distance(c, ansi256_to_rgb(cube)) {
        ramp
    } else {
        cube
    }
}

fn distance(c: Rgba, (r, g, b): (u8, u8, u8)) -> u32 {
    let d = |a: u8, b: u8| u32::from(a.abs_diff(b)).pow(2);
    d(c.r, r) + d(c.g, g) + d(c.b, b)
}

// ─── ColorPairCache ─────────────────────────────────────────────────────────

/// Bounded `(fg, bg) → PairId` map. No eviction.
#[derive(Debug, Clone)]
pub struct ColorPairCache {
    pairs: HashMap<(TermColor, TermColor), PairId>,
    capacity: usize,
    exhausted_warned: bool,
}

impl ColorPairCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            pairs: HashMap::with_capacity(capacity.min(DEFAULT_PAIR_CAPACITY)),
            capacity,
            exhausted_warned: false,
        }
    }

    /// Lower the capacity, e.g. to what the backend can register. Pairs
    /// already handed out keep their ids.
    pub fn limit_capacity(&mut self, capacity: usize) {
        self.capacity = self.capacity.min(capacity);
    }

    /// The pair drawing `fg` on `bg`, registering it with `backend` on first
    /// use. Returns [`PairId::DEFAULT`] once the cache is full.
    pub fn get_pair<B: TerminalBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        fg: TermColor,
        bg: TermColor,
    ) -> PairId {
        if fg.is_default() && bg.is_default() {
            return PairId::DEFAULT;
        }
        if let Some(&id) = self.pairs.get(&(fg, bg)) {
            return id;
        }
        if self.is_full() {
            if !self.exhausted_warned {
                self.exhausted_warned = true;
                tracing::warn!(
                    capacity = self.capacity,
                    ?fg,
                    ?bg,
                    "color pair cache full; new combinations use the default pair"
                );
            }
            return PairId::DEFAULT;
        }
        let Ok(raw) = u16::try_from(self.pairs.len() + 1) else {
            return PairId::DEFAULT;
        };
        let id = PairId(raw);
        backend.init_pair(id, fg, bg);
        self.pairs.insert((fg, bg), id);
        tracing::trace!(?id, ?fg, ?bg, "registered color pair");
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.pairs.len() >= self.capacity
    }
}

impl Default for ColorPairCache {
    fn default() -> Self {
        Self::new(DEFAULT_PAIR_CAPACITY)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

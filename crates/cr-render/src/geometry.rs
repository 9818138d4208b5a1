// SPDX-License-Identifier: MIT
//
// Geometry: pixel-space boxes in, terminal-cell rectangles out.
//
// The layout engine upstream works in abstract pixel units. A terminal only
// has cells, so every box is divided by a fixed cell size and truncated.
// No rounding correction: a box starting at x = 15 px with 8 px cells starts
// in cell 1, and its sub-cell offset is simply lost.
//
// Cell rectangles use signed coordinates. Boxes scrolled partly off-screen
// produce negative origins, and the clip stack trims them back to the
// screen.

use std::fmt;

// ─── Pixel space ────────────────────────────────────────────────────────────

/// An already-positioned box in pixel units, as produced by layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Pixels; may be zero or negative, which covers no cells.
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A width and height in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimensions {
    /// Pixels.
    pub width: f32,
    /// Pixels.
    pub height: f32,
}

impl Dimensions {
    #[inline]
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Pixel size of one terminal cell. Fixed for the whole run; changing it
/// invalidates every box layout has produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    /// Pixels per column.
    pub width: f32,
    /// Pixels per row.
    pub height: f32,
}

impl CellSize {
    /// 8 × 16 px, the classic VGA text cell.
    pub const DEFAULT: Self = Self {
        width: 8.0,
        height: 16.0,
    };

    #[inline]
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Convert a pixel box to cells by truncating division.
    #[must_use]
    pub fn to_cells(self, bounds: BoundingBox) -> CellRect {
        CellRect::new(
            truncate(bounds.x / self.width),
            truncate(bounds.y / self.height),
            truncate(bounds.width / self.width),
            truncate(bounds.height / self.height),
        )
    }

    /// Pixel dimensions of a `cols × rows` cell area.
    #[must_use]
    pub fn to_pixels(self, cols: u16, rows: u16) -> Dimensions {
        Dimensions::new(
            f32::from(cols) * self.width,
            f32::from(rows) * self.height,
        )
    }

    /// Pixel box covering a cell rectangle.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn to_bounds(self, rect: CellRect) -> BoundingBox {
        BoundingBox::new(
            rect.x as f32 * self.width,
            rect.y as f32 * self.height,
            rect.width as f32 * self.width,
            rect.height as f32 * self.height,
        )
    }
}

impl Default for CellSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Truncate toward zero. NaN maps to 0 and out-of-range values saturate,
/// which is what a float-to-int `as` cast does.
#[allow(clippy::cast_possible_truncation)]
#[inline]
fn truncate(v: f32) -> i32 {
    v as i32
}

// ─── Cell space ─────────────────────────────────────────────────────────────

/// A rectangle in terminal cells. `width`/`height` of zero or less means
/// empty.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellRect {
    /// Leftmost column. Negative columns lie off screen.
    pub x: i32,
    /// Top row.
    pub y: i32,
    /// Columns covered; zero or less means empty.
    pub width: i32,
    /// Rows covered; zero or less means empty.
    pub height: i32,
}

impl CellRect {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    #[inline]
    #[must_use]
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// The overlap of two rectangles, `None` when they don't overlap.
    /// Rectangles that only share an edge don't overlap.
    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        (x2 > x1 && y2 > y1)
            .then(|| Self::new(x1, y1, x2.saturating_sub(x1), y2.saturating_sub(y1)))
    }

    /// Iterate `(x, y)` over every cell, row-major.
    pub fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        let (x0, x1) = (self.x, self.right());
        (self.y..self.bottom()).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }
}

impl fmt::Debug for CellRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CellRect({},{} {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CELL: CellSize = CellSize::DEFAULT;

    // ── Conversion ──────────────────────────────────────────────────────

    #[test]
    fn exact_multiples_convert_exactly() {
        let r = CELL.to_cells(BoundingBox::new(16.0, 32.0, 80.0, 48.0));
        assert_eq!(r, CellRect::new(2, 2, 10, 3));
    }

    #[test]
    fn sub_cell_offsets_truncate() {
        let r = CELL.to_cells(BoundingBox::new(15.9, 31.0, 7.9, 17.0));
        assert_eq!(r, CellRect::new(1, 1, 0, 1));
    }

    #[test]
    fn negative_origin_truncates_toward_zero() {
        let r = CELL.to_cells(BoundingBox::new(-12.0, -20.0, 40.0, 40.0));
        assert_eq!(r, CellRect::new(-1, -1, 5, 2));
    }

    #[test]
    fn nan_and_huge_values_saturate() {
        let r = CELL.to_cells(BoundingBox::new(f32::NAN, 1e30, f32::INFINITY, -1e30));
        assert_eq!(r, CellRect::new(0, i32::MAX, i32::MAX, i32::MIN));
        assert!(r.is_empty());
    }

    #[test]
    fn to_pixels_and_back() {
        assert_eq!(CELL.to_pixels(10, 5), Dimensions::new(80.0, 80.0));
        let rect = CellRect::new(1, 2, 3, 4);
        assert_eq!(CELL.to_cells(CELL.to_bounds(rect)), rect);
    }

    // ── CellRect ────────────────────────────────────────────────────────

    #[test]
    fn intersect_overlap() {
        let a = CellRect::new(0, 0, 10, 10);
        let b = CellRect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(b), Some(CellRect::new(5, 5, 5, 5)));
    }

    #[test]
    fn intersect_touching_edges_is_none() {
        let a = CellRect::new(0, 0, 5, 5);
        assert_eq!(a.intersect(CellRect::new(5, 0, 5, 5)), None);
        assert_eq!(a.intersect(CellRect::new(0, 5, 5, 5)), None);
    }

    #[test]
    fn intersect_contained() {
        let outer = CellRect::new(0, 0, 20, 20);
        let inner = CellRect::new(3, 4, 5, 6);
        assert_eq!(outer.intersect(inner), Some(inner));
        assert_eq!(inner.intersect(outer), Some(inner));
    }

    #[test]
    fn empty_never_intersects() {
        let a = CellRect::new(0, 0, 10, 10);
        assert_eq!(a.intersect(CellRect::new(2, 2, 0, 3)), None);
        assert_eq!(a.intersect(CellRect::new(2, 2, 3, -1)), None);
    }

    #[test]
    fn contains_edges() {
        let r = CellRect::new(2, 3, 4, 2);
        assert!(r.contains(2, 3));
        assert!(r.contains(5, 4));
        assert!(!r.contains(6, 4));
        assert!(!r.contains(2, 5));
    }

    #[test]
    fn cells_row_major() {
        let cells: Vec<_> = CellRect::new(1, 1, 2, 2).cells().collect();
        assert_eq!(cells, vec![(1, 1), (2, 1), (1, 2), (2, 2)]);
    }
}

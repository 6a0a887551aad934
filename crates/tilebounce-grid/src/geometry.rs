//! Coordinate spaces and viewport culling.
//!
//! Three spaces are in play:
//!
//! - **Tile space**: `(row, col)` indices into the [`Grid`](crate::grid::Grid).
//! - **Pixel space**: world coordinates in pixels. Cell `(row, col)` has its
//!   origin at `(col * cell.width, row * cell.height)`; y grows downward.
//! - **Physics space**: pixel coordinates divided by a fixed
//!   [`PhysicsScale`].
//!
//! [`visible_range`] maps a camera rectangle in pixel space to the half-open
//! tile ranges it touches, clamped to the grid. Rendering cost is bounded by
//! the viewport, not by the level size.

use std::ops::Range;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Vec2
// ---------------------------------------------------------------------------

/// A 2D vector in pixel or physics units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// CellSize
// ---------------------------------------------------------------------------

/// Pixel size of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSize {
    pub width: f32,
    pub height: f32,
}

impl CellSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Pixel-space origin of a cell.
    #[inline]
    pub fn origin(&self, row: usize, col: usize) -> Vec2 {
        Vec2::new(col as f32 * self.width, row as f32 * self.height)
    }

    /// Pixel-space extent of a `rows x cols` grid.
    pub fn grid_extent(&self, rows: usize, cols: usize) -> Vec2 {
        Vec2::new(cols as f32 * self.width, rows as f32 * self.height)
    }

    /// Cell containing a pixel-space point, or `None` if the point lies at
    /// negative coordinates.
    pub fn cell_at(&self, point: Vec2) -> Option<(usize, usize)> {
        let col = (point.x / self.width).floor();
        let row = (point.y / self.height).floor();
        if col < 0.0 || row < 0.0 || !col.is_finite() || !row.is_finite() {
            return None;
        }
        Some((row as usize, col as usize))
    }
}

// ---------------------------------------------------------------------------
// PhysicsScale
// ---------------------------------------------------------------------------

/// Pixels per physics unit.
///
/// All body placement and all read-back go through this type so the two
/// directions can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsScale(pub f32);

impl PhysicsScale {
    #[inline]
    pub fn to_physics(self, pixels: Vec2) -> Vec2 {
        Vec2::new(pixels.x / self.0, pixels.y / self.0)
    }

    #[inline]
    pub fn to_pixels(self, physics: Vec2) -> Vec2 {
        Vec2::new(physics.x * self.0, physics.y * self.0)
    }

    #[inline]
    pub fn length_to_physics(self, pixels: f32) -> f32 {
        pixels / self.0
    }

    #[inline]
    pub fn length_to_pixels(self, physics: f32) -> f32 {
        physics * self.0
    }
}

// ---------------------------------------------------------------------------
// ViewRect
// ---------------------------------------------------------------------------

/// A camera rectangle in pixel space, described by its center and full size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewRect {
    /// Center point in pixels.
    pub center: Vec2,
    /// Full width and height in pixels.
    pub size: Vec2,
}

impl ViewRect {
    pub const fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// Left edge X.
    pub fn left(&self) -> f32 {
        self.center.x - self.size.x / 2.0
    }

    /// Right edge X.
    pub fn right(&self) -> f32 {
        self.center.x + self.size.x / 2.0
    }

    /// Top edge Y. Y grows downward, so this is the smaller value.
    pub fn top(&self) -> f32 {
        self.center.y - self.size.y / 2.0
    }

    /// Bottom edge Y.
    pub fn bottom(&self) -> f32 {
        self.center.y + self.size.y / 2.0
    }
}

// ---------------------------------------------------------------------------
// Culling
// ---------------------------------------------------------------------------

/// Half-open tile ranges selected by [`visible_range`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl CellRange {
    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }

    /// Iterate `(row, col)` pairs in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .clone()
            .flat_map(move |row| self.cols.clone().map(move |col| (row, col)))
    }
}

/// Tile ranges intersecting `view` for a `rows x cols` grid.
///
/// The start of each range is the cell containing the view's near edge and the
/// end is one past the cell containing its far edge; both are clamped into
/// `[0, rows]` / `[0, cols]` with `start <= end`. A camera entirely outside
/// the map, or an empty grid, yields an empty range.
pub fn visible_range(rows: usize, cols: usize, cell: CellSize, view: &ViewRect) -> CellRange {
    CellRange {
        rows: clamp_axis(view.top(), view.bottom(), cell.height, rows),
        cols: clamp_axis(view.left(), view.right(), cell.width, cols),
    }
}

fn clamp_axis(near: f32, far: f32, cell: f32, count: usize) -> Range<usize> {
    if count == 0 || cell.is_nan() || cell <= 0.0 || near.is_nan() || far.is_nan() {
        return 0..0;
    }
    // `as` saturates, so out-of-range floats land on the i64 bounds.
    let start = ((near / cell).floor() as i64).max(0);
    let end = ((far / cell).floor() as i64)
        .saturating_add(1)
        .min(count as i64);
    let end = end.max(0) as usize;
    let start = (start as u64).min(end as u64) as usize;
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: CellSize = CellSize::new(40.0, 40.0);

    #[test]
    fn view_fully_inside() {
        let view = ViewRect::new(Vec2::new(100.0, 100.0), Vec2::new(80.0, 80.0));
        let range = visible_range(10, 10, CELL, &view);
        assert_eq!(range.rows, 1..4);
        assert_eq!(range.cols, 1..4);
    }

    #[test]
    fn view_partially_left_of_map_clamps_to_zero() {
        let view = ViewRect::new(Vec2::new(0.0, 0.0), Vec2::new(200.0, 200.0));
        let range = visible_range(10, 10, CELL, &view);
        assert_eq!(range.rows, 0..3);
        assert_eq!(range.cols, 0..3);
    }

    #[test]
    fn view_past_far_edge_clamps_to_count() {
        let view = ViewRect::new(Vec2::new(390.0, 390.0), Vec2::new(100.0, 100.0));
        let range = visible_range(10, 10, CELL, &view);
        assert_eq!(range.rows, 8..10);
        assert_eq!(range.cols, 8..10);
    }

    #[test]
    fn view_entirely_outside_is_empty() {
        let right = ViewRect::new(Vec2::new(5_000.0, 100.0), Vec2::new(100.0, 100.0));
        assert!(visible_range(10, 10, CELL, &right).is_empty());

        let left = ViewRect::new(Vec2::new(-500.0, -500.0), Vec2::new(100.0, 100.0));
        assert!(visible_range(10, 10, CELL, &left).is_empty());
    }

    #[test]
    fn empty_grid_yields_empty_range() {
        let view = ViewRect::new(Vec2::new(0.0, 0.0), Vec2::new(1_000.0, 1_000.0));
        let range = visible_range(0, 0, CELL, &view);
        assert!(range.is_empty());
        assert_eq!(range.cells().count(), 0);
    }

    #[test]
    fn cells_iterates_row_major() {
        let range = CellRange {
            rows: 0..2,
            cols: 3..5,
        };
        let cells: Vec<_> = range.cells().collect();
        assert_eq!(cells, vec![(0, 3), (0, 4), (1, 3), (1, 4)]);
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn physics_scale_round_trip() {
        let scale = PhysicsScale(30.0);
        let px = Vec2::new(120.0, 90.0);
        let phys = scale.to_physics(px);
        assert_eq!(phys, Vec2::new(4.0, 3.0));
        assert_eq!(scale.to_pixels(phys), px);
    }

    #[test]
    fn cell_origin_and_lookup_agree() {
        let origin = CELL.origin(3, 5);
        assert_eq!(origin, Vec2::new(200.0, 120.0));
        assert_eq!(CELL.cell_at(Vec2::new(origin.x + 1.0, origin.y + 1.0)), Some((3, 5)));
        assert_eq!(CELL.cell_at(Vec2::new(-1.0, 0.0)), None);
    }
}

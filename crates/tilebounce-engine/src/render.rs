//! Render command extraction.
//!
//! The engine does not own a window or GPU. Each frame it produces a list of
//! [`DrawCommand`]s and hands them to a [`RenderSurface`] supplied by the
//! rendering backend, which maps tile kinds to atlas textures and sprites to
//! whatever it draws for them.
//!
//! Tiles are culled to the camera with
//! [`visible_range`](tilebounce_grid::geometry::visible_range), so the number
//! of commands per frame is bounded by the viewport, not the level size.

use serde::{Deserialize, Serialize};
use tilebounce_grid::geometry::{visible_range, CellSize, Vec2, ViewRect};
use tilebounce_grid::grid::Grid;
use tilebounce_grid::tile::TileKind;

use crate::entities::{CollectibleKind, PowerUpKind};
use crate::level::Level;
use crate::physics::PhysicsWorld;

// ---------------------------------------------------------------------------
// Camera2D
// ---------------------------------------------------------------------------

/// A 2D camera: the pixel-space rectangle the backend should show.
///
/// The default camera is empty; the game sets it from its layout before the
/// first frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera2D {
    /// Camera center X in pixels.
    pub x: f32,
    /// Camera center Y in pixels.
    pub y: f32,
    /// Width of the visible area in pixels.
    pub width: f32,
    /// Height of the visible area in pixels.
    pub height: f32,
}

impl Camera2D {
    /// A camera showing exactly `view`.
    pub fn from_view(view: ViewRect) -> Self {
        let mut camera = Self::default();
        camera.set_view(view);
        camera
    }

    /// The visible rectangle.
    pub fn view(&self) -> ViewRect {
        ViewRect::new(Vec2::new(self.x, self.y), Vec2::new(self.width, self.height))
    }

    /// Move and resize the camera to show `view`.
    pub fn set_view(&mut self, view: ViewRect) {
        self.x = view.center.x;
        self.y = view.center.y;
        self.width = view.size.x;
        self.height = view.size.y;
    }
}

// ---------------------------------------------------------------------------
// DrawCommand
// ---------------------------------------------------------------------------

/// What an entity sprite depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKind {
    Ball,
    Water,
    Spike,
    Flag,
    Collectible(CollectibleKind),
    PowerUp(PowerUpKind),
}

/// One thing to draw this frame, in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// A textured cell quad with its top-left corner at `origin`.
    Tile {
        row: usize,
        col: usize,
        kind: TileKind,
        origin: Vec2,
        size: Vec2,
    },
    /// An entity sprite centered on its body.
    Sprite {
        kind: SpriteKind,
        center: Vec2,
        size: Vec2,
        /// A wave or flag animation is running.
        animating: bool,
    },
}

/// Receives draw commands. Implemented by the rendering backend.
pub trait RenderSurface {
    fn draw(&mut self, command: DrawCommand);
}

/// Collects commands; used by headless runs and tests.
impl RenderSurface for Vec<DrawCommand> {
    fn draw(&mut self, command: DrawCommand) {
        self.push(command);
    }
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Draw every mapped tile inside `view`. Returns the number of tiles drawn.
///
/// Cells with codes outside the tile table are skipped.
pub fn render_visible(
    grid: &Grid,
    cell: CellSize,
    view: &ViewRect,
    surface: &mut dyn RenderSurface,
) -> usize {
    let range = visible_range(grid.rows(), grid.cols(), cell, view);
    let size = Vec2::new(cell.width, cell.height);
    let mut drawn = 0;
    for (row, col) in range.cells() {
        let Some(kind) = grid.tile(row, col) else {
            continue;
        };
        surface.draw(DrawCommand::Tile {
            row,
            col,
            kind,
            origin: cell.origin(row, col),
            size,
        });
        drawn += 1;
    }
    drawn
}

/// Draw every entity in the level, ball last. Returns the number drawn.
pub fn render_entities(
    level: &Level,
    physics: &PhysicsWorld,
    ball_radius: f32,
    surface: &mut dyn RenderSurface,
) -> usize {
    let mut drawn = 0;
    let statics = level
        .waters
        .values()
        .map(|w| w.draw_command())
        .chain(level.spikes.values().map(|s| s.draw_command()))
        .chain(level.flags.values().map(|f| f.draw_command()))
        .chain(level.collectibles.values().map(|c| c.draw_command()))
        .chain(level.power_ups.values().map(|p| p.draw_command()));
    for command in statics {
        surface.draw(command);
        drawn += 1;
    }
    if let Some(command) = level.ball.draw_command(physics, ball_radius) {
        surface.draw(command);
        drawn += 1;
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: CellSize = CellSize::new(10.0, 10.0);

    #[test]
    fn camera_view_round_trip() {
        let mut camera = Camera2D::default();
        assert_eq!(camera.view().size, Vec2::ZERO);
        let view = ViewRect::new(Vec2::new(5.0, 6.0), Vec2::new(70.0, 80.0));
        camera.set_view(view);
        assert_eq!(camera.view(), view);
        assert_eq!(Camera2D::from_view(view), camera);
    }

    #[test]
    fn render_visible_draws_only_cells_in_view() {
        let grid = Grid::parse("XXXX\nZZZZ\nCCCC\nXXXX").unwrap();
        let view = ViewRect::new(Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0));
        let mut frame: Vec<DrawCommand> = Vec::new();
        let drawn = render_visible(&grid, CELL, &view, &mut frame);

        // View spans 5..15 on both axes: rows 0..2, cols 0..2.
        assert_eq!(drawn, 4);
        assert_eq!(frame.len(), 4);
        assert!(frame.iter().all(|c| matches!(
            c,
            DrawCommand::Tile { row, col, .. } if *row < 2 && *col < 2
        )));
    }

    #[test]
    fn render_visible_positions_quads_at_cell_origin() {
        let grid = Grid::parse("XZ").unwrap();
        let view = ViewRect::new(Vec2::new(10.0, 5.0), Vec2::new(20.0, 10.0));
        let mut frame: Vec<DrawCommand> = Vec::new();
        render_visible(&grid, CELL, &view, &mut frame);
        assert_eq!(
            frame[1],
            DrawCommand::Tile {
                row: 0,
                col: 1,
                kind: TileKind::Ground,
                origin: Vec2::new(10.0, 0.0),
                size: Vec2::new(10.0, 10.0),
            }
        );
    }

    #[test]
    fn unknown_codes_are_skipped() {
        let grid = Grid::parse("X.X").unwrap();
        let view = ViewRect::new(Vec2::new(15.0, 5.0), Vec2::new(30.0, 10.0));
        let mut frame: Vec<DrawCommand> = Vec::new();
        assert_eq!(render_visible(&grid, CELL, &view, &mut frame), 2);
    }

    #[test]
    fn empty_grid_draws_nothing() {
        let grid = Grid::empty();
        let view = ViewRect::new(Vec2::ZERO, Vec2::new(1_000.0, 1_000.0));
        let mut frame: Vec<DrawCommand> = Vec::new();
        assert_eq!(render_visible(&grid, CELL, &view, &mut frame), 0);
    }
}

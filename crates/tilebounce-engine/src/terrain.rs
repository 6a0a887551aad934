//! Static collision geometry for solid tiles.

use tilebounce_grid::geometry::CellSize;
use tilebounce_grid::grid::Grid;

use crate::physics::{BodyOwner, PhysicsBody, PhysicsWorld};

/// Create one fixed one-cell box per solid tile. Returns the number of bodies
/// created.
///
/// Each box is centered on its cell origin `(col * width, row * height)`; the
/// world converts that to physics units with its own scale.
pub fn build_collision(grid: &Grid, physics: &mut PhysicsWorld, cell: CellSize) -> usize {
    let shape = PhysicsBody::solid_box(cell.width / 2.0, cell.height / 2.0);
    let mut created = 0;
    for (row, col) in grid.solid_cells() {
        physics.create_body(BodyOwner::Terrain, cell.origin(row, col), &shape);
        created += 1;
    }
    tracing::debug!(
        bodies = created,
        rows = grid.rows(),
        cols = grid.cols(),
        "terrain collision built"
    );
    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilebounce_grid::geometry::PhysicsScale;

    #[test]
    fn one_body_per_solid_tile() {
        let grid = Grid::parse("X1Z\nC2S").unwrap();
        let mut pw = PhysicsWorld::new(9.8, PhysicsScale(30.0));
        let created = build_collision(&grid, &mut pw, CellSize::new(40.0, 40.0));
        assert_eq!(created, 3);
        assert_eq!(pw.bodies_owned_by(BodyOwner::Terrain).len(), 3);
    }

    #[test]
    fn bodies_sit_on_cell_origins() {
        let grid = Grid::parse("11\n1X").unwrap();
        let mut pw = PhysicsWorld::new(9.8, PhysicsScale(30.0));
        build_collision(&grid, &mut pw, CellSize::new(40.0, 40.0));
        let body = pw.bodies_owned_by(BodyOwner::Terrain)[0];
        let pos = pw.position(body).unwrap();
        assert!((pos.x - 40.0).abs() < 1e-3);
        assert!((pos.y - 40.0).abs() < 1e-3);
        assert!(pw.is_fixed(body));
    }

    #[test]
    fn every_solid_body_is_at_origin_over_scale() {
        let grid = Grid::parse("X1Z\n1C1\nZ1X\nXXX").unwrap();
        let cell = CellSize::new(40.0, 25.0);
        let mut pw = PhysicsWorld::new(9.8, PhysicsScale(30.0));
        build_collision(&grid, &mut pw, cell);

        // Handles are issued in creation order, which is row-major.
        let bodies = pw.bodies_owned_by(BodyOwner::Terrain);
        let cells: Vec<(usize, usize)> = grid.solid_cells().collect();
        assert_eq!(bodies.len(), cells.len());
        for (body, (row, col)) in bodies.into_iter().zip(cells) {
            let t = pw.translation(body).unwrap();
            let expected_x = col as f32 * 40.0 / 30.0;
            let expected_y = row as f32 * 25.0 / 30.0;
            assert!((t.x - expected_x).abs() < 1e-5, "({row}, {col}) x = {}", t.x);
            assert!((t.y - expected_y).abs() < 1e-5, "({row}, {col}) y = {}", t.y);
        }
    }

    #[test]
    fn empty_grid_builds_nothing() {
        let mut pw = PhysicsWorld::new(9.8, PhysicsScale(30.0));
        assert_eq!(build_collision(&Grid::empty(), &mut pw, CellSize::new(40.0, 40.0)), 0);
        assert_eq!(pw.body_count(), 0);
    }
}

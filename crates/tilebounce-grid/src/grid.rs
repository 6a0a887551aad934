//! Level grids.
//!
//! A [`Grid`] is built once from line-oriented text (one row per line, one
//! character per cell) and is immutable afterwards. Rows must all have the
//! same length; a ragged level is rejected with [`GridError::Ragged`] rather
//! than culled against its shortest row.

use std::collections::BTreeSet;
use std::path::Path;

use crate::geometry::{CellSize, Vec2};
use crate::tile::TileKind;
use crate::GridError;

/// A rectangular grid of tile codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<char>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// An empty grid with zero rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse level text.
    ///
    /// A trailing `\r` on each line is dropped so CRLF files load the same as
    /// LF files. Characters outside the tile table are kept (they render as
    /// empty and are physically inert) and logged once each.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let mut cells = Vec::new();
        let mut rows = 0;
        let mut cols = 0;

        for (row, line) in text.lines().enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let len = line.chars().count();
            if row == 0 {
                cols = len;
            } else if len != cols {
                return Err(GridError::Ragged {
                    row,
                    expected: cols,
                    found: len,
                });
            }
            cells.extend(line.chars());
            rows += 1;
        }

        let grid = Self { cells, rows, cols };
        let unknown = grid.unknown_codes();
        if !unknown.is_empty() {
            tracing::warn!(
                codes = ?unknown,
                "level contains unknown tile codes; they will render as empty"
            );
        }
        Ok(grid)
    }

    /// Read and parse a level file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            tracing::error!(path = %path.display(), error = %source, "could not open level file");
            GridError::Io {
                path: path.display().to_string(),
                source,
            }
        })?;
        let grid = Self::parse(&text)?;
        tracing::info!(
            path = %path.display(),
            rows = grid.rows,
            cols = grid.cols,
            "level loaded"
        );
        Ok(grid)
    }

    /// Like [`load`](Self::load), but logs the failure and returns an empty
    /// grid instead of an error.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(grid) => grid,
            Err(e) => {
                tracing::error!(error = %e, "level load failed, continuing with an empty grid");
                Self::empty()
            }
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (0 for an empty grid).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `true` if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The raw code at `(row, col)`, or `None` when out of bounds.
    #[inline]
    pub fn code(&self, row: usize, col: usize) -> Option<char> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    /// The tile kind at `(row, col)`; `None` when out of bounds or unknown.
    #[inline]
    pub fn tile(&self, row: usize, col: usize) -> Option<TileKind> {
        self.code(row, col).and_then(TileKind::from_code)
    }

    /// Iterate every known tile as `(row, col, kind)` in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, TileKind)> + '_ {
        let cols = self.cols.max(1);
        self.cells.iter().enumerate().filter_map(move |(i, &c)| {
            TileKind::from_code(c).map(|kind| (i / cols, i % cols, kind))
        })
    }

    /// Iterate the cells whose tile is solid terrain.
    pub fn solid_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.tiles()
            .filter(|(_, _, kind)| kind.is_solid())
            .map(|(row, col, _)| (row, col))
    }

    /// Pixel-space extent of the whole grid.
    pub fn world_size(&self, cell: CellSize) -> Vec2 {
        cell.grid_extent(self.rows, self.cols)
    }

    /// Distinct characters not present in the tile table.
    pub fn unknown_codes(&self) -> BTreeSet<char> {
        self.cells
            .iter()
            .copied()
            .filter(|c| TileKind::from_code(*c).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rectangular_grid() {
        let grid = Grid::parse("XXX\n1Y1\nZZZ\n").unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.code(1, 1), Some('Y'));
        assert_eq!(grid.tile(2, 0), Some(TileKind::Ground));
    }

    #[test]
    fn parse_strips_carriage_returns() {
        let grid = Grid::parse("XX\r\nZZ\r\n").unwrap();
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.code(0, 1), Some('X'));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Grid::parse("XXXX\nXX\nXXXX").unwrap_err();
        match err {
            GridError::Ragged {
                row,
                expected,
                found,
            } => {
                assert_eq!(row, 1);
                assert_eq!(expected, 4);
                assert_eq!(found, 2);
            }
            other => panic!("expected Ragged, got {other:?}"),
        }
    }

    #[test]
    fn empty_text_is_empty_grid() {
        let grid = Grid::parse("").unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.rows(), 0);
        assert_eq!(grid.cols(), 0);
        assert_eq!(grid.code(0, 0), None);
    }

    #[test]
    fn out_of_bounds_is_none() {
        let grid = Grid::parse("XZ\nCZ").unwrap();
        assert_eq!(grid.code(2, 0), None);
        assert_eq!(grid.code(0, 2), None);
    }

    #[test]
    fn unknown_codes_are_kept_but_have_no_tile() {
        let grid = Grid::parse("X.#\nZZZ").unwrap();
        assert_eq!(grid.code(0, 1), Some('.'));
        assert_eq!(grid.tile(0, 1), None);
        assert_eq!(grid.unknown_codes().into_iter().collect::<Vec<_>>(), vec!['#', '.']);
    }

    #[test]
    fn solid_cells_lists_wall_ground_slide_only() {
        let grid = Grid::parse("X17\nZWC").unwrap();
        let solid: Vec<_> = grid.solid_cells().collect();
        assert_eq!(solid, vec![(0, 0), (1, 0), (1, 2)]);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Grid::load("/definitely/not/a/level.txt").unwrap_err();
        assert!(matches!(err, GridError::Io { .. }));
    }

    #[test]
    fn load_or_empty_recovers() {
        let grid = Grid::load_or_empty("/definitely/not/a/level.txt");
        assert!(grid.is_empty());
    }

    #[test]
    fn world_size_uses_cell_size() {
        let grid = Grid::parse("XXXX\nZZZZ").unwrap();
        let size = grid.world_size(CellSize::new(40.0, 30.0));
        assert_eq!(size, Vec2::new(160.0, 60.0));
    }
}

//! Tilebounce Grid -- level grids, tile vocabulary, and cell addressing.
//!
//! A level is a rectangular grid of single-character tile codes. This crate
//! owns everything that can be answered from the grid alone:
//!
//! - parsing and loading level text into a [`Grid`](grid::Grid),
//! - the fixed 24-entry [`TileKind`](tile::TileKind) table,
//! - conversions between tile indices, pixel space, and physics space,
//! - the viewport culling math used by the renderer,
//! - validation of the 24-slot texture manifest.
//!
//! # Quick Start
//!
//! ```
//! use tilebounce_grid::prelude::*;
//!
//! let grid = Grid::parse("XXXX\nX1YX\nZZZZ").unwrap();
//! assert_eq!(grid.rows(), 3);
//! assert_eq!(grid.cols(), 4);
//!
//! let cell = CellSize::new(40.0, 40.0);
//! let view = ViewRect::new(Vec2::new(40.0, 40.0), Vec2::new(80.0, 80.0));
//! let range = visible_range(grid.rows(), grid.cols(), cell, &view);
//! assert_eq!(range.rows, 0..3);
//! assert_eq!(range.cols, 0..3);
//! ```

#![deny(unsafe_code)]

pub mod geometry;
pub mod grid;
pub mod texture;
pub mod tile;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while loading levels and texture manifests.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The level file could not be opened or read.
    #[error("could not read level file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A row's length differs from the first row's length.
    #[error("level row {row} has {found} cells, expected {expected} (rows must be equal length)")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The texture manifest does not list exactly one path per tile slot.
    #[error("expected {expected} texture paths, got {found}")]
    TextureCount { expected: usize, found: usize },

    /// A texture file in the manifest could not be loaded.
    #[error("could not load texture file '{path}': {source}")]
    Texture {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::geometry::{visible_range, CellRange, CellSize, PhysicsScale, Vec2, ViewRect};
    pub use crate::grid::Grid;
    pub use crate::texture::{TextureLoader, TileAtlas};
    pub use crate::tile::{TileKind, TILE_KIND_COUNT};
    pub use crate::GridError;
}

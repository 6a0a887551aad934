//! Tilebounce Engine -- physics-driven platformer core.
//!
//! This crate builds on [`tilebounce_grid`] to run a level: a rapier2d
//! [`PhysicsWorld`](physics::PhysicsWorld) simulates a player ball among
//! static obstacles, the [`CollisionRouter`](collision::CollisionRouter)
//! turns contact events into gameplay transitions, and the
//! [`RemovalQueues`](removal::RemovalQueues) destroy picked-up entities once
//! the step is over. Each frame runs strictly in this order:
//!
//! 1. player input is applied to the ball,
//! 2. physics steps and collects begin/end contacts,
//! 3. contacts are routed (state changes, removals marked),
//! 4. removal queues are swept (bodies destroyed, effects applied),
//! 5. the camera is recomputed from the layout mode and ball position,
//! 6. visible tiles and entity sprites are drawn on request.
//!
//! # Quick Start
//!
//! ```
//! use tilebounce_engine::prelude::*;
//!
//! let grid = Grid::parse("X1111X\nX1Y11X\nXZZZZX").unwrap();
//! let mut game = Game::new(grid, GameConfig::default()).unwrap();
//!
//! for _ in 0..60 {
//!     game.tick(PlayerInput::default());
//! }
//! assert_eq!(game.tick_count(), 60);
//!
//! let mut frame: Vec<DrawCommand> = Vec::new();
//! game.render(&mut frame);
//! assert!(!frame.is_empty());
//! ```

#![deny(unsafe_code)]

pub mod collision;
pub mod config;
pub mod entities;
pub mod entity;
pub mod game;
pub mod level;
pub mod physics;
pub mod removal;
pub mod render;
pub mod terrain;
pub mod viewport;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the grid crate for convenience.
pub use tilebounce_grid;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while setting up or driving a game.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The level grid or its texture manifest failed to load.
    #[error(transparent)]
    Grid(#[from] tilebounce_grid::GridError),

    /// The configuration failed to load or validate.
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    /// The level has no ball spawn tile.
    #[error("level has no ball spawn tile ('{code}')")]
    NoBallSpawn { code: char },

    /// A layout mode index outside the known modes was requested.
    #[error("unknown layout mode {index} (expected 0..=3)")]
    UnknownLayoutMode { index: i32 },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use tilebounce_grid::prelude::*;

    pub use crate::collision::{CollisionRouter, GameEvent};
    pub use crate::config::{ConfigError, GameConfig};
    pub use crate::entities::{
        Ball, BallSize, Collectible, CollectibleKind, EffectTimer, Flag, PowerUp, PowerUpKind,
        Spike, Water,
    };
    pub use crate::entity::{EntityAllocator, EntityId};
    pub use crate::game::{Game, GameStatus, PlayerInput, TickReport};
    pub use crate::level::Level;
    pub use crate::physics::{
        BodyEditor, BodyOwner, BodyRef, ColliderShape, ContactEvent, ContactPhase, PhysicsBody,
        PhysicsBodyType, PhysicsWorld,
    };
    pub use crate::removal::{RemovalQueue, RemovalQueues};
    pub use crate::render::{
        render_entities, render_visible, Camera2D, DrawCommand, RenderSurface, SpriteKind,
    };
    pub use crate::terrain::build_collision;
    pub use crate::viewport::{compute_view, LayoutMode, ViewportController};
    pub use crate::EngineError;
}

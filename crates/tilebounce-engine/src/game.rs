//! The fixed-step game loop.
//!
//! [`Game`] owns the simulation and runs one frame per [`Game::tick`]:
//!
//! 1. **Input**: horizontal speed and jump are applied to the ball.
//! 2. **Physics**: rapier steps once by `fixed_dt`; contacts are collected.
//! 3. **Routing**: contacts are turned into state changes; pickups are marked.
//! 4. **Sweep**: marked bodies are destroyed and pickup effects applied.
//! 5. **Effects**: wave and flag timers advance.
//! 6. **Camera**: the view is recomputed from the layout mode.
//!
//! Drawing is separate: [`Game::render`] can be called any number of times
//! between ticks and never mutates state.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tilebounce_grid::geometry::{CellSize, Vec2, ViewRect};
use tilebounce_grid::grid::Grid;

use crate::collision::{CollisionRouter, GameEvent};
use crate::config::GameConfig;
use crate::entities::Ball;
use crate::level::Level;
use crate::physics::PhysicsWorld;
use crate::removal::RemovalQueues;
use crate::render::{render_entities, render_visible, Camera2D, RenderSurface};
use crate::terrain::build_collision;
use crate::viewport::{LayoutMode, ViewportController};
use crate::EngineError;

/// Buttons held during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Move left. Ignored while `right` is also held.
    pub left: bool,
    /// Move right. Ignored while `left` is also held.
    pub right: bool,
    /// Jump if the ball is grounded.
    pub jump: bool,
}

/// Whether the level is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Playing,
    /// Every flag was reached.
    Won,
    /// The ball ran out of lives.
    GameOver,
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// Tick number after this tick (unchanged for ignored ticks).
    pub tick: u64,
    /// Routing events followed by sweep events, in order.
    pub events: Vec<GameEvent>,
    /// Status after this tick.
    pub status: GameStatus,
}

/// A running level.
pub struct Game {
    config: GameConfig,
    grid: Grid,
    cell: CellSize,
    physics: PhysicsWorld,
    level: Level,
    router: CollisionRouter,
    queues: RemovalQueues,
    viewport: ViewportController,
    camera: Camera2D,
    status: GameStatus,
    tick_counter: u64,
}

impl Game {
    /// Build the physics world, terrain and entities for `grid`.
    pub fn new(grid: Grid, config: GameConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let cell = config.cell_size();
        let mut physics = PhysicsWorld::new(config.gravity, config.scale());
        let terrain = build_collision(&grid, &mut physics, cell);
        let level = Level::spawn(&grid, &config, &mut physics)?;
        let viewport = ViewportController::new(&config);
        let screen = config.screen_size();
        let camera = Camera2D::from_view(ViewRect::new(
            Vec2::new(screen.x / 2.0, screen.y / 2.0),
            screen,
        ));

        tracing::info!(
            rows = grid.rows(),
            cols = grid.cols(),
            terrain,
            layout = ?viewport.mode(),
            "game created"
        );

        let mut game = Self {
            config,
            grid,
            cell,
            physics,
            level,
            router: CollisionRouter::new(),
            queues: RemovalQueues::new(),
            viewport,
            camera,
            status: GameStatus::Playing,
            tick_counter: 0,
        };
        game.update_camera();
        Ok(game)
    }

    /// Load a level file and build a game from it.
    pub fn load(path: impl AsRef<Path>, config: GameConfig) -> Result<Self, EngineError> {
        let grid = Grid::load(path)?;
        Self::new(grid, config)
    }

    /// Advance one fixed step. Once the level is won or lost, ticks do nothing.
    pub fn tick(&mut self, input: PlayerInput) -> TickReport {
        if self.status != GameStatus::Playing {
            return TickReport {
                tick: self.tick_counter,
                events: Vec::new(),
                status: self.status,
            };
        }
        self.tick_counter += 1;
        let dt = self.config.fixed_dt;

        self.apply_input(input);

        let contacts = self.physics.step(dt);

        let mut events = self.router.dispatch(
            &contacts,
            &mut self.physics,
            &mut self.level,
            &mut self.queues,
            &self.config,
        );

        events.extend(self.queues.sweep(&mut self.physics, &mut self.level, &self.config));

        self.level.advance_effects(dt);
        self.update_status(&events);
        self.update_camera();

        if !events.is_empty() {
            tracing::debug!(tick = self.tick_counter, events = events.len(), "tick events");
        }
        TickReport {
            tick: self.tick_counter,
            events,
            status: self.status,
        }
    }

    fn apply_input(&mut self, input: PlayerInput) {
        let body = self.level.ball.body;
        let Some(mut velocity) = self.physics.linvel(body) else {
            return;
        };
        match (input.left, input.right) {
            (true, false) => velocity.x = -self.config.move_speed,
            (false, true) => velocity.x = self.config.move_speed,
            _ => {}
        }
        if input.jump && !self.level.ball.is_in_air() {
            velocity.y = -self.config.jump_speed;
            self.level.ball.set_in_air(true);
        }
        self.physics.set_linvel(body, velocity);
    }

    fn update_status(&mut self, events: &[GameEvent]) {
        if events.contains(&GameEvent::GameOver) {
            self.status = GameStatus::GameOver;
        } else if events.contains(&GameEvent::LevelWon) {
            self.status = GameStatus::Won;
        }
        if self.status != GameStatus::Playing {
            tracing::info!(
                status = ?self.status,
                tick = self.tick_counter,
                score = self.level.ball.score(),
                "game finished"
            );
        }
    }

    fn update_camera(&mut self) {
        let player = self.ball_position();
        let map = self.grid.world_size(self.cell);
        self.viewport.update(&mut self.camera, player, map);
    }

    /// Switch layout by numeric index and refresh the camera. Unknown
    /// indices leave the camera as it was.
    pub fn set_layout_index(&mut self, index: i32) -> Result<LayoutMode, EngineError> {
        let mode = self.viewport.apply_index(index)?;
        self.update_camera();
        Ok(mode)
    }

    /// Draw visible tiles, then entity sprites. Returns commands emitted.
    pub fn render(&self, surface: &mut dyn RenderSurface) -> usize {
        let view = self.camera.view();
        let radius = self
            .level
            .ball
            .radius(self.config.maximize_factor, self.config.minimize_factor);
        render_visible(&self.grid, self.cell, &view, surface)
            + render_entities(&self.level, &self.physics, radius, surface)
    }

    /// Ball center in pixels.
    pub fn ball_position(&self) -> Vec2 {
        let ball = &self.level.ball;
        ball.position(&self.physics).unwrap_or_else(|| ball.start_position())
    }

    /// Ticks simulated so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_counter
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// The player ball.
    pub fn ball(&self) -> &Ball {
        &self.level.ball
    }

    /// Every live entity.
    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The camera as of the last tick or layout change.
    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    /// Layout controller. Mode changes take effect on the next tick.
    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }
}

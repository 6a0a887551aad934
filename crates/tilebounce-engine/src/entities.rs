//! Gameplay entities.
//!
//! The set is closed: one [`Ball`] plus any number of [`Water`], [`Spike`],
//! [`Flag`], [`Collectible`] and [`PowerUp`] entities spawned from the level
//! grid. Each holds the handle of the one body it owns and knows how to
//! describe itself as a [`DrawCommand`].

use rapier2d::prelude::RigidBodyHandle;
use serde::{Deserialize, Serialize};
use tilebounce_grid::geometry::Vec2;

use crate::entity::EntityId;
use crate::physics::{BodyEditor, PhysicsWorld};
use crate::render::{DrawCommand, SpriteKind};

// ---------------------------------------------------------------------------
// EffectTimer
// ---------------------------------------------------------------------------

/// A countdown used for wave and flag animations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectTimer {
    remaining: f32,
}

impl EffectTimer {
    /// Start (or restart) the effect.
    pub fn start(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    /// Count down by `dt` seconds, stopping at zero.
    pub fn advance(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    /// `true` while time remains.
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }
}

// ---------------------------------------------------------------------------
// Ball
// ---------------------------------------------------------------------------

/// Size state changed by power-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallSize {
    #[default]
    Normal,
    Maximized,
    Minimized,
}

/// The player-controlled ball.
#[derive(Debug, Clone)]
pub struct Ball {
    /// The dynamic circle body.
    pub body: RigidBodyHandle,
    lives: u32,
    score: u32,
    size: BallSize,
    base_radius: f32,
    in_air: bool,
    start: Vec2,
    checkpoint: Option<Vec2>,
    /// Overlapping water bodies; gravity is restored when this returns to 0.
    pub(crate) water_contacts: u32,
    /// Gravity scale saved when a maximized ball entered water.
    pub(crate) suspended_gravity: Option<f32>,
    /// Wave animation started on entering water while maximized.
    pub wave: EffectTimer,
}

impl Ball {
    /// A normal-sized airborne ball at `start` with no checkpoint.
    pub fn new(body: RigidBodyHandle, start: Vec2, lives: u32, base_radius: f32) -> Self {
        Self {
            body,
            lives,
            score: 0,
            size: BallSize::Normal,
            base_radius,
            in_air: true,
            start,
            checkpoint: None,
            water_contacts: 0,
            suspended_gravity: None,
            wave: EffectTimer::default(),
        }
    }

    /// Lives left.
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Remove one life, never going below zero. Returns the lives left.
    pub fn decrease_lives(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    /// Add one life (heart pickup).
    pub fn add_life(&mut self) {
        self.lives = self.lives.saturating_add(1);
    }

    /// `true` once every life is spent.
    pub fn is_out_of_lives(&self) -> bool {
        self.lives == 0
    }

    /// Points collected so far.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Add pickup points, saturating.
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Current size state.
    pub fn size(&self) -> BallSize {
        self.size
    }

    /// `true` after a size-up pickup; a maximized ball floats in water.
    pub fn is_maximized(&self) -> bool {
        self.size == BallSize::Maximized
    }

    /// Change size state and return the new radius in pixels.
    pub fn set_size(&mut self, size: BallSize, maximize_factor: f32, minimize_factor: f32) -> f32 {
        self.size = size;
        self.radius(maximize_factor, minimize_factor)
    }

    /// Current radius in pixels.
    pub fn radius(&self, maximize_factor: f32, minimize_factor: f32) -> f32 {
        match self.size {
            BallSize::Normal => self.base_radius,
            BallSize::Maximized => self.base_radius * maximize_factor,
            BallSize::Minimized => self.base_radius * minimize_factor,
        }
    }

    /// `true` between a jump or respawn and the next landing.
    pub fn is_in_air(&self) -> bool {
        self.in_air
    }

    /// Mark the ball airborne or grounded.
    pub fn set_in_air(&mut self, in_air: bool) {
        self.in_air = in_air;
    }

    /// Spawn tile origin in pixels.
    pub fn start_position(&self) -> Vec2 {
        self.start
    }

    /// Position of the last flag touched, if any.
    pub fn checkpoint(&self) -> Option<Vec2> {
        self.checkpoint
    }

    /// Respawn at `position` from now on.
    pub fn set_checkpoint(&mut self, position: Vec2) {
        self.checkpoint = Some(position);
    }

    /// Where the next respawn puts the ball.
    pub fn respawn_point(&self) -> Vec2 {
        self.checkpoint.unwrap_or(self.start)
    }

    /// Teleport to the respawn point and stop.
    pub fn respawn(&mut self, bodies: &mut BodyEditor<'_>) -> Vec2 {
        let at = self.respawn_point();
        bodies.set_position(self.body, at);
        bodies.set_linvel(self.body, Vec2::ZERO);
        self.in_air = true;
        at
    }

    /// Start the wave animation for `duration` seconds.
    pub fn start_wave_effect(&mut self, duration: f32) {
        self.wave.start(duration);
    }

    /// `true` while overlapping at least one water body.
    pub fn in_water(&self) -> bool {
        self.water_contacts > 0
    }

    /// Body center in pixels, if the body still exists.
    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics.position(self.body)
    }

    /// Ball sprite at the body position, sized by `radius`. `None` if the
    /// body is gone.
    pub fn draw_command(&self, physics: &PhysicsWorld, radius: f32) -> Option<DrawCommand> {
        Some(DrawCommand::Sprite {
            kind: SpriteKind::Ball,
            center: self.position(physics)?,
            size: Vec2::new(radius * 2.0, radius * 2.0),
            animating: self.wave.is_active(),
        })
    }
}

// ---------------------------------------------------------------------------
// Static entities
// ---------------------------------------------------------------------------

/// A water tile. Floats a maximized ball.
#[derive(Debug, Clone)]
pub struct Water {
    /// Level-assigned id.
    pub id: EntityId,
    /// The fixed sensor body.
    pub body: RigidBodyHandle,
    /// Cell origin in pixels.
    pub position: Vec2,
    /// Cell size in pixels.
    pub size: Vec2,
    /// Ripple animation started whenever the ball enters.
    pub wave: EffectTimer,
}

/// A spike tile. Costs the ball a life.
#[derive(Debug, Clone)]
pub struct Spike {
    /// Level-assigned id.
    pub id: EntityId,
    /// The fixed sensor body.
    pub body: RigidBodyHandle,
    /// Cell origin in pixels.
    pub position: Vec2,
    /// Cell size in pixels.
    pub size: Vec2,
}

/// A flag: checkpoint on every touch, counts toward the win once.
#[derive(Debug, Clone)]
pub struct Flag {
    pub id: EntityId,
    pub body: RigidBodyHandle,
    pub position: Vec2,
    pub size: Vec2,
    /// Set on the first touch.
    pub reached: bool,
    /// Animation restarted on every touch.
    pub celebrate: EffectTimer,
}

impl Flag {
    /// Start the touch animation; returns `true` the first time only.
    pub fn on_collision(&mut self, duration: f32) -> bool {
        self.celebrate.start(duration);
        !std::mem::replace(&mut self.reached, true)
    }
}

/// What a [`Collectible`] gives the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    Ring,
    Star,
    Heart,
}

impl CollectibleKind {
    /// Score awarded on pickup. Hearts give a life instead.
    pub fn points(self) -> u32 {
        match self {
            CollectibleKind::Coin => 1,
            CollectibleKind::Ring => 5,
            CollectibleKind::Star => 10,
            CollectibleKind::Heart => 0,
        }
    }
}

/// A pickup removed on first touch.
#[derive(Debug, Clone)]
pub struct Collectible {
    pub id: EntityId,
    pub body: RigidBodyHandle,
    pub kind: CollectibleKind,
    pub position: Vec2,
    pub size: Vec2,
}

/// Which way a [`PowerUp`] resizes the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Maximize,
    Minimize,
}

impl PowerUpKind {
    /// Size the ball takes on pickup.
    pub fn ball_size(self) -> BallSize {
        match self {
            PowerUpKind::Maximize => BallSize::Maximized,
            PowerUpKind::Minimize => BallSize::Minimized,
        }
    }
}

/// A size-changing pickup removed on first touch.
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub id: EntityId,
    pub body: RigidBodyHandle,
    pub kind: PowerUpKind,
    pub position: Vec2,
    pub size: Vec2,
}

impl Water {
    pub fn draw_command(&self) -> DrawCommand {
        DrawCommand::Sprite {
            kind: SpriteKind::Water,
            center: self.position,
            size: self.size,
            animating: self.wave.is_active(),
        }
    }
}

impl Spike {
    pub fn draw_command(&self) -> DrawCommand {
        DrawCommand::Sprite {
            kind: SpriteKind::Spike,
            center: self.position,
            size: self.size,
            animating: false,
        }
    }
}

impl Flag {
    pub fn draw_command(&self) -> DrawCommand {
        DrawCommand::Sprite {
            kind: SpriteKind::Flag,
            center: self.position,
            size: self.size,
            animating: self.celebrate.is_active(),
        }
    }
}

impl Collectible {
    pub fn draw_command(&self) -> DrawCommand {
        DrawCommand::Sprite {
            kind: SpriteKind::Collectible(self.kind),
            center: self.position,
            size: self.size,
            animating: false,
        }
    }
}

impl PowerUp {
    pub fn draw_command(&self) -> DrawCommand {
        DrawCommand::Sprite {
            kind: SpriteKind::PowerUp(self.kind),
            center: self.position,
            size: self.size,
            animating: false,
        }
    }
}

//! Contact routing.
//!
//! [`CollisionRouter::dispatch`] receives the begin/end contacts of one
//! physics step and turns those involving the ball into gameplay state
//! changes. Each side of a contact was already resolved to its
//! [`BodyOwner`] when the contact was collected, so routing is a single match
//! on the owner of the non-ball side.
//!
//! The router never destroys bodies. Its physics access is a [`BodyEditor`];
//! pickups are only marked in the [`RemovalQueues`] and destroyed by the
//! sweep that follows.

use serde::Serialize;
use tilebounce_grid::geometry::Vec2;

use crate::config::GameConfig;
use crate::entities::{CollectibleKind, PowerUpKind};
use crate::entity::EntityId;
use crate::level::Level;
use crate::physics::{BodyEditor, BodyOwner, BodyRef, ContactEvent, ContactPhase, PhysicsWorld};
use crate::removal::RemovalQueues;

/// A gameplay transition produced by routing or sweeping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// The ball touched a fixed body while airborne.
    Landed,
    EnteredWater { water: EntityId, floating: bool },
    /// The ball left the last water body it overlapped.
    ExitedWater,
    LifeLost { remaining: u32 },
    Respawned { position: Vec2 },
    GameOver,
    CheckpointSet { flag: EntityId, position: Vec2 },
    /// A flag was touched for the first time.
    FlagReached { flag: EntityId },
    LevelWon,
    ItemCollected { id: EntityId, kind: CollectibleKind },
    PowerUpCollected { id: EntityId, kind: PowerUpKind },
}

/// Everything contact routing may touch.
pub struct Routing<'a> {
    pub bodies: BodyEditor<'a>,
    pub level: &'a mut Level,
    pub queues: &'a mut RemovalQueues,
    pub config: &'a GameConfig,
}

/// Turns ball contacts into gameplay transitions.
#[derive(Debug, Default)]
pub struct CollisionRouter {
    life_lost_this_step: bool,
}

impl CollisionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset per-step state. Called once before the contacts of a step.
    pub fn begin_step(&mut self) {
        self.life_lost_this_step = false;
    }

    /// Route every contact of one physics step, in order.
    pub fn dispatch(
        &mut self,
        contacts: &[ContactEvent],
        physics: &mut PhysicsWorld,
        level: &mut Level,
        queues: &mut RemovalQueues,
        config: &GameConfig,
    ) -> Vec<GameEvent> {
        self.begin_step();
        let mut ctx = Routing {
            bodies: physics.editor(),
            level,
            queues,
            config,
        };
        let mut events = Vec::new();
        for contact in contacts {
            match contact.phase {
                ContactPhase::Begin => self.begin_contact(contact, &mut ctx, &mut events),
                ContactPhase::End => self.end_contact(contact, &mut ctx, &mut events),
            }
        }
        events
    }

    /// Handle a contact that started this step. Pairs without the ball are
    /// ignored.
    pub fn begin_contact(
        &mut self,
        contact: &ContactEvent,
        ctx: &mut Routing<'_>,
        events: &mut Vec<GameEvent>,
    ) {
        let Some((_, other)) = contact.split_ball() else {
            return;
        };

        if other.fixed && ctx.level.ball.is_in_air() {
            ctx.level.ball.set_in_air(false);
            events.push(GameEvent::Landed);
        }

        match other.owner {
            BodyOwner::Water(id) => enter_water(id, ctx, events),
            BodyOwner::Spike(_) => self.hit_spike(ctx, events),
            BodyOwner::Flag(id) => touch_flag(id, ctx, events),
            BodyOwner::PowerUp(_, id) | BodyOwner::Collectible(id) if !ctx.level.is_alive(id) => {
                tracing::trace!(%id, "contact with a removed pickup");
            }
            BodyOwner::PowerUp(kind, id) => {
                if ctx.queues.power_ups(kind).mark(id) {
                    tracing::trace!(%id, ?kind, "power-up marked for removal");
                }
            }
            BodyOwner::Collectible(id) => {
                if ctx.queues.collectibles.mark(id) {
                    tracing::trace!(%id, "collectible marked for removal");
                }
            }
            BodyOwner::Terrain | BodyOwner::Ball => {}
        }
    }

    /// Handle a contact that ended this step. Only leaving water matters.
    pub fn end_contact(
        &mut self,
        contact: &ContactEvent,
        ctx: &mut Routing<'_>,
        events: &mut Vec<GameEvent>,
    ) {
        let Some((_, other)) = contact.split_ball() else {
            return;
        };
        if let BodyOwner::Water(_) = other.owner {
            leave_water(other, ctx, events);
        }
    }

    fn hit_spike(&mut self, ctx: &mut Routing<'_>, events: &mut Vec<GameEvent>) {
        let ball = &mut ctx.level.ball;
        if self.life_lost_this_step || ball.is_out_of_lives() {
            return;
        }
        self.life_lost_this_step = true;

        let remaining = ball.decrease_lives();
        events.push(GameEvent::LifeLost { remaining });
        if remaining > 0 {
            let position = ball.respawn(&mut ctx.bodies);
            tracing::info!(remaining, x = position.x, y = position.y, "life lost, respawned");
            events.push(GameEvent::Respawned { position });
        } else {
            ctx.bodies.set_linvel(ball.body, Vec2::ZERO);
            tracing::info!("out of lives");
            events.push(GameEvent::GameOver);
        }
    }
}

fn enter_water(water: EntityId, ctx: &mut Routing<'_>, events: &mut Vec<GameEvent>) {
    let ball = &mut ctx.level.ball;
    ball.water_contacts += 1;

    let floating = ball.is_maximized();
    if floating {
        ball.start_wave_effect(ctx.config.effect_duration);
        if ball.suspended_gravity.is_none() {
            let prior = ctx.bodies.gravity_scale(ball.body).unwrap_or(1.0);
            ball.suspended_gravity = Some(prior);
            ctx.bodies.set_gravity_scale(ball.body, 0.0);
            tracing::debug!(prior, "gravity suspended in water");
        }
    }
    if let Some(w) = ctx.level.waters.get_mut(&water) {
        w.wave.start(ctx.config.effect_duration);
    }
    events.push(GameEvent::EnteredWater { water, floating });
}

fn leave_water(water: BodyRef, ctx: &mut Routing<'_>, events: &mut Vec<GameEvent>) {
    let ball = &mut ctx.level.ball;
    if ball.water_contacts == 0 {
        tracing::trace!(handle = ?water.handle, "water end without matching begin");
        return;
    }
    ball.water_contacts -= 1;
    if ball.water_contacts > 0 {
        return;
    }
    if let Some(prior) = ball.suspended_gravity.take() {
        ctx.bodies.set_gravity_scale(ball.body, prior);
        tracing::debug!(prior, "gravity restored");
    }
    events.push(GameEvent::ExitedWater);
}

fn touch_flag(flag: EntityId, ctx: &mut Routing<'_>, events: &mut Vec<GameEvent>) {
    let Some(f) = ctx.level.flags.get_mut(&flag) else {
        return;
    };
    let first = f.on_collision(ctx.config.effect_duration);
    let position = f.position;

    ctx.level.ball.set_checkpoint(position);
    events.push(GameEvent::CheckpointSet { flag, position });
    if !first {
        return;
    }
    tracing::info!(%flag, "flag reached");
    events.push(GameEvent::FlagReached { flag });
    if ctx.level.all_flags_reached() {
        tracing::info!("all flags reached");
        events.push(GameEvent::LevelWon);
    }
}

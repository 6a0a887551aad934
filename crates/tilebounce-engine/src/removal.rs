//! Deferred removal of picked-up entities.
//!
//! Contact routing runs while the step's contact list is being walked, so it
//! only *marks* entities. [`RemovalQueues::sweep`] runs afterwards, destroys
//! each marked body exactly once and applies the pickup's effect to the ball.

use std::marker::PhantomData;

use crate::collision::GameEvent;
use crate::config::GameConfig;
use crate::entities::{Collectible, CollectibleKind, PowerUp, PowerUpKind};
use crate::entity::EntityId;
use crate::level::Level;
use crate::physics::PhysicsWorld;

/// Ids awaiting removal, typed by the entity collection they belong to.
///
/// Marking the same id twice in one step is a no-op, so an entity touched by
/// several contacts is still destroyed once.
#[derive(Debug)]
pub struct RemovalQueue<T> {
    pending: Vec<EntityId>,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Default for RemovalQueue<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            _kind: PhantomData,
        }
    }
}

impl<T> RemovalQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `id`. Returns `false` if it was already queued.
    pub fn mark(&mut self, id: EntityId) -> bool {
        if self.pending.contains(&id) {
            return false;
        }
        self.pending.push(id);
        true
    }

    /// `true` if `id` is queued.
    pub fn contains(&self, id: EntityId) -> bool {
        self.pending.contains(&id)
    }

    /// Take every queued id in marking order, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// One queue per removable entity category.
#[derive(Debug, Default)]
pub struct RemovalQueues {
    pub collectibles: RemovalQueue<Collectible>,
    pub maximize: RemovalQueue<PowerUp>,
    pub minimize: RemovalQueue<PowerUp>,
}

impl RemovalQueues {
    pub fn new() -> Self {
        Self::default()
    }

    /// The queue for power-ups of `kind`.
    pub fn power_ups(&mut self, kind: PowerUpKind) -> &mut RemovalQueue<PowerUp> {
        match kind {
            PowerUpKind::Maximize => &mut self.maximize,
            PowerUpKind::Minimize => &mut self.minimize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.collectibles.is_empty() && self.maximize.is_empty() && self.minimize.is_empty()
    }

    /// Destroy every marked entity and apply its effect.
    ///
    /// Stale ids (already removed, so their generation no longer matches) are
    /// skipped.
    pub fn sweep(
        &mut self,
        physics: &mut PhysicsWorld,
        level: &mut Level,
        config: &GameConfig,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();

        for kind in [PowerUpKind::Maximize, PowerUpKind::Minimize] {
            for id in self.power_ups(kind).drain() {
                if !level.is_alive(id) {
                    tracing::trace!(%id, "stale power-up mark");
                    continue;
                }
                let Some(power_up) = level.remove_power_up(id) else {
                    continue;
                };
                physics.destroy_body(power_up.body);
                let radius = level.ball.set_size(
                    kind.ball_size(),
                    config.maximize_factor,
                    config.minimize_factor,
                );
                physics.set_circle_radius(level.ball.body, radius);
                tracing::debug!(%id, ?kind, radius, "power-up applied");
                events.push(GameEvent::PowerUpCollected { id, kind });
            }
        }

        for id in self.collectibles.drain() {
            if !level.is_alive(id) {
                tracing::trace!(%id, "stale collectible mark");
                continue;
            }
            let Some(item) = level.remove_collectible(id) else {
                continue;
            };
            physics.destroy_body(item.body);
            match item.kind {
                CollectibleKind::Heart => level.ball.add_life(),
                kind => level.ball.add_score(kind.points()),
            }
            tracing::debug!(
                %id,
                kind = ?item.kind,
                score = level.ball.score(),
                lives = level.ball.lives(),
                "item collected"
            );
            events.push(GameEvent::ItemCollected {
                id,
                kind: item.kind,
            });
        }

        events
    }
}

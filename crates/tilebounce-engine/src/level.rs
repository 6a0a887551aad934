//! Entity spawning from a level grid.
//!
//! [`Level::spawn`] walks the grid once, creates the ball at the spawn tile
//! and one sensor body per interactive tile, and files each entity under a
//! fresh [`EntityId`]. Collections are ordered maps so iteration (and thus
//! drawing and routing) is deterministic.

use std::collections::BTreeMap;

use tilebounce_grid::geometry::{CellSize, Vec2};
use tilebounce_grid::grid::Grid;
use tilebounce_grid::tile::TileKind;

use crate::config::GameConfig;
use crate::entities::{
    Ball, Collectible, CollectibleKind, EffectTimer, Flag, PowerUp, PowerUpKind, Spike, Water,
};
use crate::entity::{EntityAllocator, EntityId};
use crate::physics::{BodyOwner, ColliderShape, PhysicsBody, PhysicsBodyType, PhysicsWorld};
use crate::EngineError;

/// Every live gameplay entity of one level.
#[derive(Debug)]
pub struct Level {
    pub ball: Ball,
    pub waters: BTreeMap<EntityId, Water>,
    pub spikes: BTreeMap<EntityId, Spike>,
    pub flags: BTreeMap<EntityId, Flag>,
    pub collectibles: BTreeMap<EntityId, Collectible>,
    pub power_ups: BTreeMap<EntityId, PowerUp>,
    allocator: EntityAllocator,
}

impl Level {
    /// Spawn the ball and all interactive entities described by `grid`.
    ///
    /// The first ball spawn tile in row-major order wins; a level without one
    /// is rejected.
    pub fn spawn(
        grid: &Grid,
        config: &GameConfig,
        physics: &mut PhysicsWorld,
    ) -> Result<Self, EngineError> {
        let cell = config.cell_size();
        let mut spawns = grid
            .tiles()
            .filter(|(_, _, kind)| *kind == TileKind::BallSpawn)
            .map(|(row, col, _)| cell.origin(row, col));
        let start = spawns.next().ok_or(EngineError::NoBallSpawn {
            code: TileKind::BallSpawn.code(),
        })?;
        let extra = spawns.count();
        if extra > 0 {
            tracing::warn!(
                extra,
                x = start.x,
                y = start.y,
                "multiple ball spawns; using the first"
            );
        }

        let ball_body = physics.create_body(
            BodyOwner::Ball,
            start,
            &PhysicsBody {
                body_type: PhysicsBodyType::Dynamic,
                collider: ColliderShape::Circle {
                    radius: config.ball_radius,
                },
                restitution: 0.0,
                is_sensor: false,
            },
        );

        let mut level = Level {
            ball: Ball::new(ball_body, start, config.starting_lives, config.ball_radius),
            waters: BTreeMap::new(),
            spikes: BTreeMap::new(),
            flags: BTreeMap::new(),
            collectibles: BTreeMap::new(),
            power_ups: BTreeMap::new(),
            allocator: EntityAllocator::new(),
        };

        for (row, col, kind) in grid.tiles() {
            level.spawn_tile(kind, cell.origin(row, col), cell, physics);
        }

        tracing::info!(
            waters = level.waters.len(),
            spikes = level.spikes.len(),
            flags = level.flags.len(),
            collectibles = level.collectibles.len(),
            power_ups = level.power_ups.len(),
            "level spawned"
        );
        Ok(level)
    }

    fn spawn_tile(
        &mut self,
        kind: TileKind,
        position: Vec2,
        cell: CellSize,
        physics: &mut PhysicsWorld,
    ) {
        let size = Vec2::new(cell.width, cell.height);
        let sensor = PhysicsBody::sensor_box(cell.width / 2.0, cell.height / 2.0);
        let collectible = match kind {
            TileKind::Coin => Some(CollectibleKind::Coin),
            TileKind::Ring => Some(CollectibleKind::Ring),
            TileKind::Star => Some(CollectibleKind::Star),
            TileKind::Heart => Some(CollectibleKind::Heart),
            _ => None,
        };
        let power_up = match kind {
            TileKind::SizeUp => Some(PowerUpKind::Maximize),
            TileKind::SizeDown => Some(PowerUpKind::Minimize),
            _ => None,
        };

        if let Some(kind) = collectible {
            let id = self.allocator.allocate();
            let body = physics.create_body(BodyOwner::Collectible(id), position, &sensor);
            self.collectibles.insert(
                id,
                Collectible {
                    id,
                    body,
                    kind,
                    position,
                    size,
                },
            );
            return;
        }
        if let Some(kind) = power_up {
            let id = self.allocator.allocate();
            let body = physics.create_body(BodyOwner::PowerUp(kind, id), position, &sensor);
            self.power_ups.insert(
                id,
                PowerUp {
                    id,
                    body,
                    kind,
                    position,
                    size,
                },
            );
            return;
        }
        match kind {
            TileKind::Water => {
                let id = self.allocator.allocate();
                let body = physics.create_body(BodyOwner::Water(id), position, &sensor);
                let wave = EffectTimer::default();
                self.waters.insert(
                    id,
                    Water {
                        id,
                        body,
                        position,
                        size,
                        wave,
                    },
                );
            }
            TileKind::Spike => {
                let id = self.allocator.allocate();
                let body = physics.create_body(BodyOwner::Spike(id), position, &sensor);
                self.spikes.insert(
                    id,
                    Spike {
                        id,
                        body,
                        position,
                        size,
                    },
                );
            }
            TileKind::Flag => {
                let id = self.allocator.allocate();
                let body = physics.create_body(BodyOwner::Flag(id), position, &sensor);
                self.flags.insert(
                    id,
                    Flag {
                        id,
                        body,
                        position,
                        size,
                        reached: false,
                        celebrate: EffectTimer::default(),
                    },
                );
            }
            _ => {}
        }
    }

    /// `true` once every flag has been reached. A level without flags is
    /// never won.
    pub fn all_flags_reached(&self) -> bool {
        !self.flags.is_empty() && self.flags.values().all(|f| f.reached)
    }

    /// `true` until the entity is removed. Ids kept after removal are stale.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.allocator.is_alive(id)
    }

    /// Remove a collectible and free its id. The body is left to the caller.
    pub fn remove_collectible(&mut self, id: EntityId) -> Option<Collectible> {
        let removed = self.collectibles.remove(&id)?;
        self.allocator.deallocate(id);
        Some(removed)
    }

    /// Remove a power-up and free its id. The body is left to the caller.
    pub fn remove_power_up(&mut self, id: EntityId) -> Option<PowerUp> {
        let removed = self.power_ups.remove(&id)?;
        self.allocator.deallocate(id);
        Some(removed)
    }

    /// Advance every running animation.
    pub fn advance_effects(&mut self, dt: f32) {
        self.ball.wave.advance(dt);
        for water in self.waters.values_mut() {
            water.wave.advance(dt);
        }
        for flag in self.flags.values_mut() {
            flag.celebrate.advance(dt);
        }
    }

    /// Number of live non-ball entities.
    pub fn entity_count(&self) -> usize {
        self.allocator.alive_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(text: &str) -> (Level, PhysicsWorld) {
        let config = GameConfig::default();
        let mut pw = PhysicsWorld::new(config.gravity, config.scale());
        let level = Level::spawn(&Grid::parse(text).unwrap(), &config, &mut pw).unwrap();
        (level, pw)
    }

    #[test]
    fn spawns_one_entity_per_interactive_tile() {
        let (level, pw) = spawn("Y2W7\nE589\n6U11");
        assert_eq!(level.flags.len(), 1);
        assert_eq!(level.waters.len(), 1);
        assert_eq!(level.spikes.len(), 1);
        assert_eq!(level.collectibles.len(), 4);
        assert_eq!(level.power_ups.len(), 2);
        assert_eq!(level.entity_count(), 9);
        // Ball plus nine sensors.
        assert_eq!(pw.body_count(), 10);
    }

    #[test]
    fn ball_starts_on_spawn_origin() {
        let (level, pw) = spawn("111\n1Y1");
        let expected = Vec2::new(40.0, 40.0);
        assert_eq!(level.ball.start_position(), expected);
        let pos = pw.position(level.ball.body).unwrap();
        assert!((pos.x - expected.x).abs() < 1e-3 && (pos.y - expected.y).abs() < 1e-3);
        assert_eq!(pw.owner(level.ball.body), Some(BodyOwner::Ball));
    }

    #[test]
    fn first_spawn_wins() {
        let (level, _) = spawn("1Y\nY1");
        assert_eq!(level.ball.start_position(), Vec2::new(40.0, 0.0));
    }

    #[test]
    fn missing_spawn_is_an_error() {
        let config = GameConfig::default();
        let mut pw = PhysicsWorld::new(config.gravity, config.scale());
        let err = Level::spawn(&Grid::parse("XXX").unwrap(), &config, &mut pw).unwrap_err();
        assert!(matches!(err, EngineError::NoBallSpawn { code: 'Y' }));
    }

    #[test]
    fn removal_frees_the_id() {
        let (mut level, _) = spawn("YE");
        let id = *level.collectibles.keys().next().unwrap();
        assert!(level.is_alive(id));
        assert!(level.remove_collectible(id).is_some());
        assert!(!level.is_alive(id));
        assert!(level.remove_collectible(id).is_none());
    }

    #[test]
    fn flags_reached_requires_every_flag() {
        let (mut level, _) = spawn("Y22");
        assert!(!level.all_flags_reached());
        let first = *level.flags.keys().next().unwrap();
        level.flags.get_mut(&first).unwrap().reached = true;
        assert!(!level.all_flags_reached());
        for flag in level.flags.values_mut() {
            flag.reached = true;
        }
        assert!(level.all_flags_reached());
    }
}

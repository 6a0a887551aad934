//! rapier2d physics integration with typed body ownership.
//!
//! The [`PhysicsWorld`] owns a rapier2d simulation. Every body it creates is
//! tagged with exactly one [`BodyOwner`], so a contact resolves to "what did
//! the ball hit" with a single map lookup instead of scanning entity lists.
//!
//! All positions crossing this API are in pixel space; the world converts
//! to and from physics units with its [`PhysicsScale`]. Velocities and
//! gravity are in physics units.
//!
//! # Contact phases
//!
//! [`PhysicsWorld::step`] collects rapier's collision events through a
//! channel while rapier iterates its contact graph, and only returns them
//! once the step has finished. Consumers of the returned [`ContactEvent`]s get
//! a [`BodyEditor`], which can adjust bodies but cannot remove them; bodies
//! are destroyed through [`PhysicsWorld::destroy_body`] in a separate sweep.

use std::collections::HashMap;

use rapier2d::prelude::*;
use tilebounce_grid::geometry::{PhysicsScale, Vec2};

use crate::entities::PowerUpKind;
use crate::entity::EntityId;

// ---------------------------------------------------------------------------
// Body descriptors
// ---------------------------------------------------------------------------

/// Physics body type. Determines how rapier treats the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsBodyType {
    /// Fully simulated (the ball).
    Dynamic,
    /// Immovable (terrain, spikes, water, flags, pickups).
    Static,
}

/// Collider shape in pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Box { half_width: f32, half_height: f32 },
    Circle { radius: f32 },
}

/// Physics body descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    pub body_type: PhysicsBodyType,
    pub collider: ColliderShape,
    /// Coefficient of restitution. 0.0 = no bounce, 1.0 = perfect bounce.
    pub restitution: f32,
    /// Detects overlap without a physical response.
    pub is_sensor: bool,
}

impl PhysicsBody {
    /// A solid, immovable box.
    pub fn solid_box(half_width: f32, half_height: f32) -> Self {
        Self {
            body_type: PhysicsBodyType::Static,
            collider: ColliderShape::Box {
                half_width,
                half_height,
            },
            restitution: 0.0,
            is_sensor: false,
        }
    }

    /// An immovable sensor box.
    pub fn sensor_box(half_width: f32, half_height: f32) -> Self {
        Self {
            is_sensor: true,
            ..Self::solid_box(half_width, half_height)
        }
    }
}

// ---------------------------------------------------------------------------
// Ownership and contacts
// ---------------------------------------------------------------------------

/// The gameplay entity a body belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyOwner {
    /// Static level geometry built from solid tiles.
    Terrain,
    Ball,
    Water(EntityId),
    Spike(EntityId),
    Flag(EntityId),
    Collectible(EntityId),
    PowerUp(PowerUpKind, EntityId),
}

/// One side of a contact, resolved at collection time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyRef {
    pub handle: RigidBodyHandle,
    pub owner: BodyOwner,
    /// Whether the body is fixed (static) in rapier.
    pub fixed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Begin,
    End,
}

/// A begin or end contact between two owned bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub phase: ContactPhase,
    pub a: BodyRef,
    pub b: BodyRef,
}

impl ContactEvent {
    /// The ball side and the other side, if the ball takes part.
    pub fn split_ball(&self) -> Option<(BodyRef, BodyRef)> {
        match (self.a.owner, self.b.owner) {
            (BodyOwner::Ball, _) => Some((self.a, self.b)),
            (_, BodyOwner::Ball) => Some((self.b, self.a)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Manages the rapier2d simulation state.
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    scale: PhysicsScale,
    body_owner: HashMap<RigidBodyHandle, BodyOwner>,
    collider_to_body: HashMap<ColliderHandle, RigidBodyHandle>,
}

impl PhysicsWorld {
    /// Create a world with downward gravity `gravity` (physics units).
    pub fn new(gravity: f32, scale: PhysicsScale) -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![0.0, gravity as Real],
            integration_params: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            scale,
            body_owner: HashMap::new(),
            collider_to_body: HashMap::new(),
        }
    }

    pub fn scale(&self) -> PhysicsScale {
        self.scale
    }

    /// Create a body centered at `position` (pixels) and tag it with `owner`.
    pub fn create_body(
        &mut self,
        owner: BodyOwner,
        position: Vec2,
        body: &PhysicsBody,
    ) -> RigidBodyHandle {
        let at = self.scale.to_physics(position);
        let rb = match body.body_type {
            PhysicsBodyType::Dynamic => RigidBodyBuilder::dynamic()
                .translation(vector![at.x as Real, at.y as Real])
                .ccd_enabled(true)
                .build(),
            PhysicsBodyType::Static => RigidBodyBuilder::fixed()
                .translation(vector![at.x as Real, at.y as Real])
                .build(),
        };
        let body_handle = self.rigid_body_set.insert(rb);

        let collider = ColliderBuilder::new(self.shape(&body.collider))
            .restitution(body.restitution as Real)
            .sensor(body.is_sensor)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);

        self.body_owner.insert(body_handle, owner);
        self.collider_to_body.insert(collider_handle, body_handle);
        body_handle
    }

    /// Remove a body and its colliders. Returns `false` for unknown handles.
    ///
    /// Must not be called while contact events of the current step are being
    /// routed; the removal sweep is the only caller in the game loop.
    pub fn destroy_body(&mut self, handle: RigidBodyHandle) -> bool {
        if self.body_owner.remove(&handle).is_none() {
            return false;
        }
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        self.collider_to_body.retain(|_, body| *body != handle);
        true
    }

    /// Step the simulation and return the contacts that began or ended.
    ///
    /// Contacts whose colliders no longer map to an owned body (for example
    /// the end event of a body removed last sweep) are dropped. The result is
    /// sorted by body handles for deterministic routing.
    pub fn step(&mut self, dt: f32) -> Vec<ContactEvent> {
        self.integration_params.dt = dt as Real;

        let (collision_send, collision_recv) =
            rapier2d::crossbeam::channel::unbounded::<CollisionEvent>();
        let (force_send, _force_recv) =
            rapier2d::crossbeam::channel::unbounded::<ContactForceEvent>();
        let event_handler = ChannelEventCollector::new(collision_send, force_send);

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &event_handler,
        );

        let mut contacts = Vec::new();
        while let Ok(event) = collision_recv.try_recv() {
            let (phase, h1, h2) = match event {
                CollisionEvent::Started(h1, h2, _) => (ContactPhase::Begin, h1, h2),
                CollisionEvent::Stopped(h1, h2, _) => (ContactPhase::End, h1, h2),
            };
            if let (Some(a), Some(b)) = (self.body_ref(h1), self.body_ref(h2)) {
                contacts.push(ContactEvent { phase, a, b });
            }
        }

        contacts.sort_by_key(|c| {
            let a = c.a.handle.into_raw_parts();
            let b = c.b.handle.into_raw_parts();
            (a.min(b), a.max(b))
        });
        contacts
    }

    fn body_ref(&self, collider: ColliderHandle) -> Option<BodyRef> {
        let handle = *self.collider_to_body.get(&collider)?;
        let owner = *self.body_owner.get(&handle)?;
        let fixed = self.rigid_body_set.get(handle)?.is_fixed();
        Some(BodyRef {
            handle,
            owner,
            fixed,
        })
    }

    fn shape(&self, collider: &ColliderShape) -> SharedShape {
        match *collider {
            ColliderShape::Box {
                half_width,
                half_height,
            } => SharedShape::cuboid(
                self.scale.length_to_physics(half_width) as Real,
                self.scale.length_to_physics(half_height) as Real,
            ),
            ColliderShape::Circle { radius } => {
                SharedShape::ball(self.scale.length_to_physics(radius) as Real)
            }
        }
    }

    /// Replace the shape of every collider on `handle` with a circle of
    /// `radius` pixels. Returns `false` for unknown handles.
    pub fn set_circle_radius(&mut self, handle: RigidBodyHandle, radius: f32) -> bool {
        let Some(rb) = self.rigid_body_set.get(handle) else {
            return false;
        };
        let colliders: Vec<ColliderHandle> = rb.colliders().to_vec();
        let shape = self.shape(&ColliderShape::Circle { radius });
        for ch in colliders {
            if let Some(collider) = self.collider_set.get_mut(ch) {
                collider.set_shape(shape.clone());
            }
        }
        true
    }

    /// Access for contact routing: adjust bodies, never remove them.
    pub fn editor(&mut self) -> BodyEditor<'_> {
        BodyEditor {
            bodies: &mut self.rigid_body_set,
            scale: self.scale,
        }
    }

    /// Body center in pixels.
    pub fn position(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        let t = self.rigid_body_set.get(handle)?.translation();
        Some(self.scale.to_pixels(Vec2::new(t.x as f32, t.y as f32)))
    }

    /// Body center in physics units, as stored by rapier.
    pub fn translation(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        let t = self.rigid_body_set.get(handle)?.translation();
        Some(Vec2::new(t.x as f32, t.y as f32))
    }

    /// Linear velocity in physics units.
    pub fn linvel(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        let v = self.rigid_body_set.get(handle)?.linvel();
        Some(Vec2::new(v.x as f32, v.y as f32))
    }

    pub fn set_linvel(&mut self, handle: RigidBodyHandle, velocity: Vec2) -> bool {
        self.editor().set_linvel(handle, velocity)
    }

    pub fn gravity_scale(&self, handle: RigidBodyHandle) -> Option<f32> {
        Some(self.rigid_body_set.get(handle)?.gravity_scale() as f32)
    }

    pub fn owner(&self, handle: RigidBodyHandle) -> Option<BodyOwner> {
        self.body_owner.get(&handle).copied()
    }

    /// Whether `handle` is a fixed body. Unknown handles are not fixed.
    pub fn is_fixed(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .get(handle)
            .is_some_and(|rb| rb.is_fixed())
    }

    /// Handles of every body tagged with `owner`, in handle order.
    pub fn bodies_owned_by(&self, owner: BodyOwner) -> Vec<RigidBodyHandle> {
        let mut handles: Vec<RigidBodyHandle> = self
            .body_owner
            .iter()
            .filter(|(_, o)| **o == owner)
            .map(|(h, _)| *h)
            .collect();
        handles.sort_by_key(|h| h.into_raw_parts());
        handles
    }

    /// Number of bodies currently in the simulation.
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }
}

// ---------------------------------------------------------------------------
// BodyEditor
// ---------------------------------------------------------------------------

/// Mutable view over bodies that cannot add or remove them.
pub struct BodyEditor<'a> {
    bodies: &'a mut RigidBodySet,
    scale: PhysicsScale,
}

impl BodyEditor<'_> {
    pub fn gravity_scale(&self, handle: RigidBodyHandle) -> Option<f32> {
        Some(self.bodies.get(handle)?.gravity_scale() as f32)
    }

    pub fn set_gravity_scale(&mut self, handle: RigidBodyHandle, scale: f32) -> bool {
        let Some(rb) = self.bodies.get_mut(handle) else {
            return false;
        };
        rb.set_gravity_scale(scale as Real, true);
        true
    }

    /// Body center in pixels.
    pub fn position(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        let t = self.bodies.get(handle)?.translation();
        Some(self.scale.to_pixels(Vec2::new(t.x as f32, t.y as f32)))
    }

    /// Teleport a body to `position` (pixels).
    pub fn set_position(&mut self, handle: RigidBodyHandle, position: Vec2) -> bool {
        let Some(rb) = self.bodies.get_mut(handle) else {
            return false;
        };
        let at = self.scale.to_physics(position);
        rb.set_translation(vector![at.x as Real, at.y as Real], true);
        true
    }

    /// Set linear velocity (physics units).
    pub fn set_linvel(&mut self, handle: RigidBodyHandle, velocity: Vec2) -> bool {
        let Some(rb) = self.bodies.get_mut(handle) else {
            return false;
        };
        rb.set_linvel(vector![velocity.x as Real, velocity.y as Real], true);
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SCALE: PhysicsScale = PhysicsScale(30.0);

    fn ball_body() -> PhysicsBody {
        PhysicsBody {
            body_type: PhysicsBodyType::Dynamic,
            collider: ColliderShape::Circle { radius: 15.0 },
            restitution: 0.0,
            is_sensor: false,
        }
    }

    #[test]
    fn create_and_destroy_body() {
        let mut pw = PhysicsWorld::new(0.0, SCALE);
        let h = pw.create_body(
            BodyOwner::Terrain,
            Vec2::new(60.0, 90.0),
            &PhysicsBody::solid_box(20.0, 20.0),
        );
        assert_eq!(pw.body_count(), 1);
        assert_eq!(pw.owner(h), Some(BodyOwner::Terrain));
        assert!(pw.is_fixed(h));

        assert!(pw.destroy_body(h));
        assert_eq!(pw.body_count(), 0);
        assert_eq!(pw.owner(h), None);
        assert!(!pw.destroy_body(h), "second destroy is a no-op");
    }

    #[test]
    fn position_reads_back_in_pixels() {
        let mut pw = PhysicsWorld::new(0.0, SCALE);
        let h = pw.create_body(BodyOwner::Ball, Vec2::new(120.0, 60.0), &ball_body());
        let pos = pw.position(h).unwrap();
        assert!((pos.x - 120.0).abs() < 1e-3);
        assert!((pos.y - 60.0).abs() < 1e-3);
    }

    #[test]
    fn gravity_pulls_ball_down_in_pixel_space() {
        let mut pw = PhysicsWorld::new(9.8, SCALE);
        let h = pw.create_body(BodyOwner::Ball, Vec2::new(0.0, 0.0), &ball_body());
        for _ in 0..30 {
            pw.step(1.0 / 60.0);
        }
        let pos = pw.position(h).unwrap();
        assert!(pos.y > 0.0, "y grows downward, got {}", pos.y);
    }

    #[test]
    fn zero_gravity_scale_suspends_fall() {
        let mut pw = PhysicsWorld::new(9.8, SCALE);
        let h = pw.create_body(BodyOwner::Ball, Vec2::new(0.0, 0.0), &ball_body());
        assert_eq!(pw.gravity_scale(h), Some(1.0));
        assert!(pw.editor().set_gravity_scale(h, 0.0));
        for _ in 0..30 {
            pw.step(1.0 / 60.0);
        }
        assert!(pw.position(h).unwrap().y.abs() < 1e-3);
    }

    #[test]
    fn ball_falling_on_box_produces_begin_contact() {
        let mut pw = PhysicsWorld::new(9.8, SCALE);
        let ball = pw.create_body(BodyOwner::Ball, Vec2::new(100.0, 0.0), &ball_body());
        let floor = pw.create_body(
            BodyOwner::Terrain,
            Vec2::new(100.0, 120.0),
            &PhysicsBody::solid_box(200.0, 20.0),
        );

        let mut begins = Vec::new();
        for _ in 0..120 {
            begins.extend(
                pw.step(1.0 / 60.0)
                    .into_iter()
                    .filter(|c| c.phase == ContactPhase::Begin),
            );
        }
        let contact = begins.first().expect("ball should land on the floor");
        let (ball_side, other) = contact.split_ball().unwrap();
        assert_eq!(ball_side.handle, ball);
        assert_eq!(other.handle, floor);
        assert!(other.fixed);
        assert_eq!(other.owner, BodyOwner::Terrain);
    }

    #[test]
    fn sensor_overlap_begins_and_ends() {
        let mut pw = PhysicsWorld::new(9.8, SCALE);
        pw.create_body(BodyOwner::Ball, Vec2::new(0.0, 0.0), &ball_body());
        let id = EntityId::new(0, 0);
        pw.create_body(
            BodyOwner::Water(id),
            Vec2::new(0.0, 60.0),
            &PhysicsBody::sensor_box(40.0, 10.0),
        );

        let mut phases = Vec::new();
        for _ in 0..180 {
            for c in pw.step(1.0 / 60.0) {
                let water = |r: &BodyRef| matches!(r.owner, BodyOwner::Water(_));
                if water(&c.a) || water(&c.b) {
                    phases.push(c.phase);
                }
            }
        }
        assert_eq!(phases, vec![ContactPhase::Begin, ContactPhase::End]);
    }

    #[test]
    fn editor_teleports_body() {
        let mut pw = PhysicsWorld::new(0.0, SCALE);
        let h = pw.create_body(BodyOwner::Ball, Vec2::new(0.0, 0.0), &ball_body());
        let mut editor = pw.editor();
        assert!(editor.set_position(h, Vec2::new(300.0, 150.0)));
        let pos = editor.position(h).unwrap();
        assert!((pos.x - 300.0).abs() < 1e-3 && (pos.y - 150.0).abs() < 1e-3);
    }

    #[test]
    fn set_circle_radius_on_unknown_handle_is_false() {
        let mut pw = PhysicsWorld::new(0.0, SCALE);
        let h = pw.create_body(BodyOwner::Ball, Vec2::ZERO, &ball_body());
        assert!(pw.set_circle_radius(h, 30.0));
        pw.destroy_body(h);
        assert!(!pw.set_circle_radius(h, 30.0));
    }

    #[test]
    fn bodies_owned_by_filters_by_owner() {
        let mut pw = PhysicsWorld::new(0.0, SCALE);
        let a = pw.create_body(BodyOwner::Terrain, Vec2::ZERO, &PhysicsBody::solid_box(1.0, 1.0));
        pw.create_body(BodyOwner::Ball, Vec2::ZERO, &ball_body());
        let b = pw.create_body(
            BodyOwner::Terrain,
            Vec2::new(50.0, 0.0),
            &PhysicsBody::solid_box(1.0, 1.0),
        );
        assert_eq!(pw.bodies_owned_by(BodyOwner::Terrain), vec![a, b]);
    }
}

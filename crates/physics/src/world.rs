//! The physics world: body storage, stepping and queries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;
use rapier3d::prelude::*;

use crate::body::{BodyDesc, BodyHandle, BodyShape, BodyTag};

/// Sentinel distance returned by ray casts that hit nothing.
pub const RAY_MISS: f32 = f32::MAX;

/// Fixed simulation timestep in seconds.
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Process-unique id source for worlds, so handles can be checked against
/// the world that issued them.
static NEXT_WORLD_ID: AtomicU64 = AtomicU64::new(1);

/// One colliding pair from the last simulation step, reduced to what
/// gameplay code needs: the two category tags and the live contact count.
#[derive(Debug, Clone, Copy)]
pub struct ContactPairView {
    /// Tag of the first body in the pair.
    pub first: BodyTag,
    /// Tag of the second body in the pair.
    pub second: BodyTag,
    /// Number of contact points currently in the pair's manifolds.
    pub points: usize,
}

impl ContactPairView {
    /// Check whether either side of the pair carries the given tag.
    /// Contacts are symmetric, so both members are always tested.
    #[inline]
    pub fn involves(&self, tag: BodyTag) -> bool {
        self.first == tag || self.second == tag
    }
}

/// A rigid-body simulation world.
///
/// Owns every engine resource (broad/narrow phase, solver, body and collider
/// sets) for the lifetime of a level, and tears them down together. Bodies
/// are created from a [`BodyDesc`] and addressed by the returned
/// [`BodyHandle`].
///
/// The world is single-threaded and frame-synchronous: call [`step`] once per
/// frame, then read contacts. There is exactly one mutator per tick.
///
/// [`step`]: PhysicsWorld::step
pub struct PhysicsWorld {
    /// Stamp written into every issued [`BodyHandle`].
    id: u64,

    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    /// Side table mapping colliders to gameplay tags.
    tags: HashMap<ColliderHandle, BodyTag>,

    /// Unconsumed frame time, at most one fixed step's worth.
    accumulator: f32,
}

impl PhysicsWorld {
    /// Create an empty world with the given gravity vector.
    pub fn new(gravity: Vec3) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = FIXED_TIMESTEP;

        Self {
            id: NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed),
            gravity: vector![gravity.x, gravity.y, gravity.z],
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            tags: HashMap::new(),
            accumulator: 0.0,
        }
    }

    /// Create a body in the world and register its tag.
    pub fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let builder = if desc.mass == 0.0 {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic()
        };

        let mut builder = builder
            .translation(vector![desc.position.x, desc.position.y, desc.position.z])
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .can_sleep(desc.can_sleep);

        if desc.lock_rotations {
            builder = builder.lock_rotations();
        }

        let body = self.bodies.insert(builder);

        let mut collider = match desc.shape {
            BodyShape::Box { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            BodyShape::Capsule {
                radius,
                half_height,
            } => ColliderBuilder::capsule_y(half_height, radius),
        }
        .friction(desc.friction);

        if desc.mass > 0.0 {
            collider = collider.mass(desc.mass);
        }

        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);

        self.tags.insert(collider, desc.tag);
        self.query_pipeline.update(&self.colliders);

        log::debug!(
            "added body tag={:?} at {:?} mass={}",
            desc.tag,
            desc.position,
            desc.mass
        );

        BodyHandle {
            world: self.id,
            body,
            collider,
        }
    }

    /// Whether this world issued the given handle. Raw arena indices repeat
    /// across worlds, so a handle must never be dereferenced elsewhere.
    #[inline]
    fn owns(&self, handle: BodyHandle) -> bool {
        handle.world == self.id
    }

    /// Remove a body and its collider.
    ///
    /// Returns whether the handle was actually present, so callers can
    /// re-parent a body without caring whether it was attached before. A
    /// handle issued by another world was never present here.
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        if !self.owns(handle) || self.bodies.get(handle.body).is_none() {
            return false;
        }

        self.bodies.remove(
            handle.body,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        self.tags.remove(&handle.collider);
        self.query_pipeline.update(&self.colliders);
        true
    }

    /// Number of bodies currently in the world.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// The fixed timestep the simulation advances by.
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Advance the simulation by one frame's worth of wall-clock time.
    ///
    /// The engine runs on a fixed timestep decoupled from the frame time: at
    /// most one fixed sub-step executes per call, and leftover time beyond a
    /// full step is dropped so a slow frame cannot snowball. Returns whether
    /// a sub-step actually ran.
    ///
    /// Per-frame central forces last exactly one call, whether or not a
    /// sub-step ran; callers re-apply them every frame while the input is
    /// held. Clearing on the non-stepping path keeps the integrated force
    /// per sub-step constant at any frame rate.
    pub fn step(&mut self, frame_dt: f32) -> bool {
        self.accumulator += frame_dt.max(0.0);
        let stepped = self.accumulator >= FIXED_TIMESTEP;

        if stepped {
            self.accumulator = (self.accumulator - FIXED_TIMESTEP).min(FIXED_TIMESTEP);

            self.pipeline.step(
                &self.gravity,
                &self.integration_parameters,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                Some(&mut self.query_pipeline),
                &(),
                &(),
            );
        }

        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
        }

        stepped
    }

    // ========================================================================
    // Body access
    // ========================================================================

    /// World-space position of a body's center. `None` for a removed body or
    /// a handle issued by another world.
    pub fn position(&self, handle: BodyHandle) -> Option<Vec3> {
        if !self.owns(handle) {
            return None;
        }
        self.bodies.get(handle.body).map(|body| {
            let t = body.translation();
            Vec3::new(t.x, t.y, t.z)
        })
    }

    /// Overwrite a body's transform origin and wake it up.
    ///
    /// The wake-up is a safe no-op for bodies created with sleeping disabled.
    pub fn set_position(&mut self, handle: BodyHandle, position: Vec3) {
        if !self.owns(handle) {
            return;
        }
        if let Some(body) = self.bodies.get_mut(handle.body) {
            body.set_translation(vector![position.x, position.y, position.z], true);
            body.wake_up(true);
        }
    }

    /// Linear velocity of a body.
    pub fn linear_velocity(&self, handle: BodyHandle) -> Option<Vec3> {
        if !self.owns(handle) {
            return None;
        }
        self.bodies.get(handle.body).map(|body| {
            let v = body.linvel();
            Vec3::new(v.x, v.y, v.z)
        })
    }

    /// Apply a central force for this frame. Cleared by the next [`step`]
    /// call whether or not it runs a sub-step.
    ///
    /// [`step`]: PhysicsWorld::step
    pub fn apply_central_force(&mut self, handle: BodyHandle, force: Vec3) {
        if !self.owns(handle) {
            return;
        }
        if let Some(body) = self.bodies.get_mut(handle.body) {
            body.add_force(vector![force.x, force.y, force.z], true);
        }
    }

    /// Apply an instantaneous central impulse.
    pub fn apply_central_impulse(&mut self, handle: BodyHandle, impulse: Vec3) {
        if !self.owns(handle) {
            return;
        }
        if let Some(body) = self.bodies.get_mut(handle.body) {
            body.apply_impulse(vector![impulse.x, impulse.y, impulse.z], true);
        }
    }

    /// Gameplay tag of a body.
    pub fn tag_of(&self, handle: BodyHandle) -> Option<BodyTag> {
        if !self.owns(handle) {
            return None;
        }
        self.tags.get(&handle.collider).copied()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Cast a ray and return the distance to the closest hit.
    ///
    /// Returns [`RAY_MISS`] when nothing is hit within `max_distance` or the
    /// direction is degenerate; a miss is never an error. The optional
    /// `exclude` body is skipped, so a capsule can probe past itself.
    pub fn ray_cast_distance(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<BodyHandle>,
    ) -> f32 {
        let dir = direction.normalize_or_zero();
        if dir.length_squared() < 0.5 {
            return RAY_MISS;
        }

        let ray = Ray::new(point![origin.x, origin.y, origin.z], vector![dir.x, dir.y, dir.z]);

        let mut filter = QueryFilter::default();
        if let Some(handle) = exclude {
            if self.owns(handle) {
                filter = filter.exclude_rigid_body(handle.body);
            }
        }

        match self
            .query_pipeline
            .cast_ray(&self.bodies, &self.colliders, &ray, max_distance, true, filter)
        {
            Some((_, toi)) => toi,
            None => RAY_MISS,
        }
    }

    /// Enumerate the contact pairs produced by the last simulation step.
    ///
    /// Pairs with zero contact points are filtered out. A collider whose tag
    /// was never registered reads as [`BodyTag::Object`] rather than failing.
    pub fn contact_pairs(&self) -> impl Iterator<Item = ContactPairView> + '_ {
        self.narrow_phase.contact_pairs().filter_map(|pair| {
            let points: usize = pair.manifolds.iter().map(|m| m.points.len()).sum();
            if points == 0 {
                return None;
            }

            let first = self.tags.get(&pair.collider1).copied().unwrap_or_default();
            let second = self.tags.get(&pair.collider2).copied().unwrap_or_default();

            Some(ContactPairView {
                first,
                second,
                points,
            })
        })
    }
}

impl std::fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("bodies", &self.bodies.len())
            .field("colliders", &self.colliders.len())
            .field("accumulator", &self.accumulator)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

//! First-person player controller.
//!
//! The controller owns the player's capsule rigid body and couples it to an
//! FPS camera: keyboard input becomes central forces and jump impulses on
//! the body, mouse input becomes yaw/pitch angles, and the camera matrices
//! are derived from the body's transform plus those angles.
//!
//! The body transform is the only authoritative position; the controller
//! queries it on demand and never keeps a second copy.

use abyss_physics::{BodyDesc, BodyHandle, PhysicsWorld};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::PlayerConfig;
use crate::input::KeyInput;

/// Read-only snapshot of the player's pose for render and HUD consumers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pose {
    /// Body center in world space.
    pub position: Vec3,
    /// Horizontal look angle in degrees.
    pub yaw: f32,
    /// Vertical look angle in degrees.
    pub pitch: f32,
    /// Unit look direction.
    pub front: Vec3,
}

/// Capsule-bodied first-person controller.
///
/// Created detached; call [`attach_to_world`] to register the body with a
/// simulation before feeding it input.
///
/// [`attach_to_world`]: PlayerController::attach_to_world
#[derive(Debug)]
pub struct PlayerController {
    config: PlayerConfig,

    /// Horizontal look angle in degrees.
    yaw: f32,
    /// Vertical look angle in degrees, clamped to [-89, 89].
    pitch: f32,

    // Derived basis, always orthonormal and consistent with yaw/pitch.
    // update_basis() is the only mutation path.
    front: Vec3,
    right: Vec3,
    up: Vec3,
    world_up: Vec3,

    /// Where the body is (re)created on attachment.
    spawn_position: Vec3,

    /// Physics body, present only while attached.
    body: Option<BodyHandle>,

    /// Previous frame's jump key, for edge-triggering the impulse.
    jump_held: bool,

    projection: Mat4,
}

impl PlayerController {
    /// Create a detached controller at the given pose.
    pub fn new(position: Vec3, yaw: f32, pitch: f32, config: PlayerConfig) -> Self {
        let mut controller = Self {
            config,
            yaw,
            pitch: pitch.clamp(-89.0, 89.0),
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            world_up: Vec3::Y,
            spawn_position: position,
            body: None,
            jump_held: false,
            projection: Mat4::IDENTITY,
        };
        controller.update_basis();
        controller
    }

    /// Recompute front/right/up from the current yaw/pitch pair.
    fn update_basis(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();

        let front = Vec3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos);
        self.front = front.normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    /// Register the capsule body with a simulation world.
    ///
    /// If the controller was attached before, the previous body is removed
    /// first, so re-parenting is idempotent. The body is tagged as the
    /// player; it never participates in win/lose contact logic.
    pub fn attach_to_world(&mut self, world: &mut PhysicsWorld) {
        let position = match self.body.take() {
            Some(old) => {
                // Carry the pose over when re-attaching to the same world;
                // a handle from another world simply fails to resolve and
                // we fall back to the spawn point.
                let carried = world.position(old);
                world.remove_body(old);
                carried.unwrap_or(self.spawn_position)
            }
            None => self.spawn_position,
        };

        let desc = BodyDesc::character_capsule(
            position,
            self.config.capsule_radius,
            self.config.capsule_half_height,
            self.config.mass,
        )
        .with_friction(self.config.friction);

        self.body = Some(world.add_body(&desc));
    }

    /// Whether the controller currently has a body in a world.
    pub fn is_attached(&self) -> bool {
        self.body.is_some()
    }

    /// Body center, falling back to the spawn point while detached.
    pub fn position(&self, world: &PhysicsWorld) -> Vec3 {
        self.body
            .and_then(|handle| world.position(handle))
            .unwrap_or(self.spawn_position)
    }

    /// Turn held keys into forces and impulses on the body.
    ///
    /// The steering direction sums the front/right basis vectors per held
    /// key with its world-up component zeroed, then gains an upward bias
    /// while jump is held so jumps stay steerable. An all-zero sum applies
    /// no force at all; it can never normalize into NaN.
    ///
    /// Ground movement and jumping are mutually exclusive for force
    /// application: while the jump key is down no walking force is applied.
    /// The jump impulse itself fires on the key-down edge only, and only if
    /// the downward ground probe reports a surface within reach.
    ///
    /// Takes no time delta: forces are integrated over the world's fixed
    /// timestep and last a single frame, so per-frame application is already
    /// frame-rate independent.
    pub fn apply_keyboard_input(&mut self, keys: &KeyInput, world: &mut PhysicsWorld) {
        let Some(body) = self.body else {
            log::debug!("keyboard input ignored: controller not attached");
            return;
        };

        let mut direction = Vec3::ZERO;
        if keys.forward {
            direction += self.front;
        }
        if keys.backward {
            direction -= self.front;
        }
        if keys.right {
            direction += self.right;
        }
        if keys.left {
            direction -= self.right;
        }

        // Held movement keys steer horizontally only
        direction.y = 0.0;
        if keys.jump {
            direction += self.world_up * self.config.jump_steer_bias;
        }

        let direction = direction.normalize_or_zero();
        if direction != Vec3::ZERO && !keys.jump {
            let force = direction * self.config.walk_speed * self.config.mass;
            world.apply_central_force(body, force);
        }

        let jump_pressed = keys.jump && !self.jump_held;
        if jump_pressed && self.is_grounded(world) {
            world.apply_central_impulse(body, self.world_up * self.config.jump_impulse);
        }
        self.jump_held = keys.jump;
    }

    /// Probe straight down for ground.
    ///
    /// Grounded means the closest hit is within the capsule half-height plus
    /// a small buffer. A probe that finds nothing reads as "very far" and
    /// simply denies jump eligibility.
    pub fn is_grounded(&self, world: &PhysicsWorld) -> bool {
        let Some(body) = self.body else {
            return false;
        };
        let origin = self.position(world);
        let distance = world.ray_cast_distance(
            origin,
            -self.world_up,
            self.config.ground_ray_length,
            Some(body),
        );
        distance <= self.config.grounded_threshold()
    }

    /// Turn a mouse cursor delta into yaw/pitch changes.
    ///
    /// Pitch is clamped to [-89, 89] degrees so the view can never flip
    /// over the vertical, then the basis vectors are recomputed.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.config.mouse_sensitivity;
        self.pitch += dy * self.config.mouse_sensitivity;
        self.pitch = self.pitch.clamp(-89.0, 89.0);
        self.update_basis();
    }

    /// Directly overwrite the body's position. Look angles are untouched.
    pub fn teleport_to(&mut self, world: &mut PhysicsWorld, position: Vec3) {
        match self.body {
            Some(body) => world.set_position(body, position),
            None => self.spawn_position = position,
        }
    }

    // ========================================================================
    // Camera
    // ========================================================================

    /// Store the perspective projection for later composition.
    pub fn set_projection(&mut self, fov_deg: f32, far: f32, near: f32, aspect: f32) {
        self.projection = Mat4::perspective_rh(fov_deg.to_radians(), aspect, near, far);
    }

    /// View matrix looking along the front vector.
    ///
    /// The eye sits half a capsule above the body center, near the top of
    /// the player rather than its middle.
    pub fn view_matrix(&self, world: &PhysicsWorld) -> Mat4 {
        let eye = self.position(world) + Vec3::new(0.0, self.config.eye_height, 0.0);
        Mat4::look_at_rh(eye, eye + self.front, self.up)
    }

    /// The stored projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Combined projection-view matrix.
    pub fn projection_view_matrix(&self, world: &PhysicsWorld) -> Mat4 {
        self.projection * self.view_matrix(world)
    }

    /// Snapshot the current pose for render/HUD consumers.
    pub fn pose(&self, world: &PhysicsWorld) -> Pose {
        Pose {
            position: self.position(world),
            yaw: self.yaw,
            pitch: self.pitch,
            front: self.front,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    #[inline]
    pub fn front(&self) -> Vec3 {
        self.front
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    #[inline]
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_PITCH, DEFAULT_YAW};
    use abyss_physics::{BodyDesc, BodyTag};

    const EPS: f32 = 1e-4;

    fn world_with_floor(floor_top: f32) -> PhysicsWorld {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
        world.add_body(&BodyDesc::fixed_box(
            BodyTag::Platform,
            Vec3::new(0.0, floor_top - 0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
        ));
        world
    }

    fn default_player(position: Vec3) -> PlayerController {
        PlayerController::new(position, DEFAULT_YAW, DEFAULT_PITCH, PlayerConfig::default())
    }

    fn assert_orthonormal(player: &PlayerController) {
        assert!((player.front().length() - 1.0).abs() < EPS);
        assert!((player.right().length() - 1.0).abs() < EPS);
        assert!((player.up().length() - 1.0).abs() < EPS);
        assert!(player.front().dot(player.right()).abs() < EPS);
        assert!(player.front().dot(player.up()).abs() < EPS);
        assert!(player.right().dot(player.up()).abs() < EPS);
    }

    #[test]
    fn test_default_front_is_negative_z() {
        let player = default_player(Vec3::new(0.0, 5.0, 0.0));
        let front = player.front();
        assert!(front.x.abs() < EPS);
        assert!(front.y.abs() < EPS);
        assert!((front.z + 1.0).abs() < EPS, "front={:?}", front);
    }

    #[test]
    fn test_pitch_clamp_and_orthonormal_basis() {
        let mut player = default_player(Vec3::ZERO);

        // Drag the mouse around wildly, including far past the pitch limit
        let deltas = [
            (120.0, 4000.0),
            (-300.0, -9000.0),
            (45.5, 30.0),
            (0.0, 2500.0),
            (-1000.0, -1.0),
        ];
        for (dx, dy) in deltas {
            player.apply_mouse_delta(dx, dy);
            assert!(player.pitch() >= -89.0 && player.pitch() <= 89.0);
            assert_orthonormal(&player);
        }
    }

    #[test]
    fn test_zero_input_applies_no_force() {
        let mut world = world_with_floor(0.0);
        let mut player = default_player(Vec3::new(0.0, 1.0, 0.0));
        player.attach_to_world(&mut world);

        let keys = KeyInput::default();
        for _ in 0..60 {
            player.apply_keyboard_input(&keys, &mut world);
            world.step(world.fixed_timestep());
        }

        let position = player.position(&world);
        assert!(position.is_finite(), "position must never go NaN");
        assert!(position.x.abs() < EPS, "no sideways drift, x={}", position.x);
        assert!(position.z.abs() < EPS, "no forward drift, z={}", position.z);
    }

    #[test]
    fn test_opposed_keys_cancel_out() {
        let mut world = world_with_floor(0.0);
        let mut player = default_player(Vec3::new(0.0, 1.0, 0.0));
        player.attach_to_world(&mut world);

        // forward+backward and left+right sum to the zero vector; the
        // normalize-of-zero edge case must not produce NaN forces
        let keys = KeyInput {
            forward: true,
            backward: true,
            left: true,
            right: true,
            jump: false,
        };
        for _ in 0..30 {
            player.apply_keyboard_input(&keys, &mut world);
            world.step(world.fixed_timestep());
        }

        let velocity = world.linear_velocity(
            player.body.expect("attached"),
        ).unwrap();
        assert!(velocity.is_finite());
        assert!(velocity.x.abs() < EPS && velocity.z.abs() < EPS);
    }

    #[test]
    fn test_forward_input_moves_along_front() {
        let mut world = world_with_floor(0.0);
        let mut player = default_player(Vec3::new(0.0, 1.0, 0.0));
        player.attach_to_world(&mut world);

        let keys = KeyInput {
            forward: true,
            ..Default::default()
        };
        for _ in 0..120 {
            player.apply_keyboard_input(&keys, &mut world);
            world.step(world.fixed_timestep());
        }

        let position = player.position(&world);
        // Default yaw faces -Z
        assert!(position.z < -0.1, "should have walked forward, z={}", position.z);
        assert!(position.x.abs() < 0.1, "no sideways drift, x={}", position.x);
    }

    #[test]
    fn test_jump_requires_ground_within_reach() {
        // Body center 1.5 above the floor: probe reads 1.5 > 1.2, airborne
        let mut world = world_with_floor(0.0);
        let mut player = default_player(Vec3::new(0.0, 1.5, 0.0));
        player.attach_to_world(&mut world);
        assert!(!player.is_grounded(&world));

        let keys = KeyInput {
            jump: true,
            ..Default::default()
        };
        player.apply_keyboard_input(&keys, &mut world);
        let velocity = world.linear_velocity(player.body.unwrap()).unwrap();
        assert!(velocity.y.abs() < EPS, "no impulse while airborne");
    }

    #[test]
    fn test_jump_applies_impulse_when_grounded() {
        // Body center 1.0 above the floor: probe reads 1.0 <= 1.2, grounded
        let mut world = world_with_floor(0.0);
        let mut player = default_player(Vec3::new(0.0, 1.0, 0.0));
        player.attach_to_world(&mut world);
        assert!(player.is_grounded(&world));

        let keys = KeyInput {
            jump: true,
            ..Default::default()
        };
        player.apply_keyboard_input(&keys, &mut world);
        let velocity = world.linear_velocity(player.body.unwrap()).unwrap();
        assert!(velocity.y > 0.0, "impulse should lift, vy={}", velocity.y);
    }

    #[test]
    fn test_held_jump_key_fires_once() {
        let mut world = world_with_floor(0.0);
        let mut player = default_player(Vec3::new(0.0, 1.0, 0.0));
        player.attach_to_world(&mut world);

        let keys = KeyInput {
            jump: true,
            ..Default::default()
        };

        player.apply_keyboard_input(&keys, &mut world);
        let after_first = world.linear_velocity(player.body.unwrap()).unwrap().y;

        // Still holding, still grounded: the impulse must not stack
        player.apply_keyboard_input(&keys, &mut world);
        let after_second = world.linear_velocity(player.body.unwrap()).unwrap().y;

        assert!((after_second - after_first).abs() < EPS);

        // Release and press again: a fresh edge fires a fresh impulse
        player.apply_keyboard_input(&KeyInput::default(), &mut world);
        player.apply_keyboard_input(&keys, &mut world);
        let after_third = world.linear_velocity(player.body.unwrap()).unwrap().y;
        assert!(after_third > after_second);
    }

    #[test]
    fn test_view_matrix_eye_offset() {
        let world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
        let player = default_player(Vec3::new(0.0, 5.0, 0.0));

        // Detached controller reports its spawn position; eye is half a
        // capsule above it, looking along -Z
        let expected = Mat4::look_at_rh(
            Vec3::new(0.0, 5.5, 0.0),
            Vec3::new(0.0, 5.5, -1.0),
            Vec3::Y,
        );
        let view = player.view_matrix(&world);
        assert!((view - expected).abs_diff_eq(Mat4::ZERO, 1e-4), "view={:?}", view);
    }

    #[test]
    fn test_projection_view_composition() {
        let world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
        let mut player = default_player(Vec3::ZERO);
        player.set_projection(60.0, 1000.0, 0.1, 1.0);

        let combined = player.projection_view_matrix(&world);
        let expected = player.projection_matrix() * player.view_matrix(&world);
        assert!((combined - expected).abs_diff_eq(Mat4::ZERO, 1e-6));
    }

    #[test]
    fn test_teleport_keeps_angles() {
        let mut world = world_with_floor(0.0);
        let mut player = default_player(Vec3::new(0.0, 1.0, 0.0));
        player.attach_to_world(&mut world);
        player.apply_mouse_delta(100.0, 50.0);

        let yaw = player.yaw();
        let pitch = player.pitch();

        player.teleport_to(&mut world, Vec3::new(10.0, 5.0, -3.0));

        let position = player.position(&world);
        assert!((position - Vec3::new(10.0, 5.0, -3.0)).length() < EPS);
        assert_eq!(player.yaw(), yaw);
        assert_eq!(player.pitch(), pitch);
    }

    #[test]
    fn test_reattach_is_idempotent() {
        let mut world = world_with_floor(0.0);
        let mut player = default_player(Vec3::new(0.0, 1.0, 0.0));

        player.attach_to_world(&mut world);
        let first_count = world.body_count();

        // Attaching again must not leak a second capsule
        player.attach_to_world(&mut world);
        assert_eq!(world.body_count(), first_count);
        assert!(player.is_attached());
    }

    #[test]
    fn test_reattach_to_new_world_preserves_its_bodies() {
        let spawn = Vec3::new(0.0, 1.0, 0.0);
        let mut world_a = world_with_floor(0.0);
        let mut player = default_player(spawn);
        player.attach_to_world(&mut world_a);

        // A second world whose arena slots line up with the first's; the
        // stale handle must not delete or read whatever occupies them
        let mut world_b = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
        let platform = world_b.add_body(&BodyDesc::fixed_box(
            BodyTag::Platform,
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
        ));
        let win = world_b.add_body(&BodyDesc::fixed_box(
            BodyTag::Win,
            Vec3::new(0.0, 0.5, -10.0),
            Vec3::new(1.0, 0.5, 1.0),
        ));
        let before = world_b.body_count();

        player.attach_to_world(&mut world_b);

        assert_eq!(world_b.body_count(), before + 1);
        assert_eq!(world_b.tag_of(platform), Some(BodyTag::Platform));
        assert_eq!(world_b.tag_of(win), Some(BodyTag::Win));

        // The cross-world position cannot be carried; the player restarts
        // from its spawn point
        assert!((player.position(&world_b) - spawn).length() < EPS);
    }
}

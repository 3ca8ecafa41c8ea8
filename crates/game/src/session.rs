//! Game session: one level attempt from spawn to win or loss.
//!
//! The session owns every piece of per-attempt state: the physics world, the
//! player controller, the win monitor and the frame/FPS counters. Data flows
//! one way through [`frame`]: input goes in, the world steps, the monitor
//! evaluates, and a [`HudState`] snapshot comes out. Nothing outside the
//! session mutates the world mid-frame.
//!
//! [`frame`]: GameSession::frame

use abyss_physics::PhysicsWorld;
use glam::Mat4;

use crate::config::GameConfig;
use crate::hud::HudState;
use crate::input::{KeyInput, MouseDelta};
use crate::level::Level;
use crate::monitor::{GamePhase, WinConditionMonitor};
use crate::player::{PlayerController, Pose};

/// A running level attempt.
pub struct GameSession {
    config: GameConfig,
    level: Level,
    world: PhysicsWorld,
    player: PlayerController,
    monitor: WinConditionMonitor,

    /// Total frames since the session was created.
    frame_count: u64,

    // FPS is counted over whole seconds of the caller's clock.
    fps: u32,
    fps_counter: u32,
    last_second: u64,
}

impl GameSession {
    /// Build a session: a fresh world under the configured gravity, the
    /// level's bodies, and the player attached at the spawn point.
    pub fn new(config: GameConfig, level: Level, now: f64) -> Self {
        let mut world = PhysicsWorld::new(config.gravity);
        level.populate(&mut world);

        let mut player = PlayerController::new(
            level.spawn.position,
            level.spawn.yaw,
            level.spawn.pitch,
            config.player.clone(),
        );
        player.attach_to_world(&mut world);

        let monitor = WinConditionMonitor::new(config.time_limit_secs, now);

        log::info!(
            "session started: level '{}', {} bodies, {:.0}s limit",
            level.name,
            world.body_count(),
            config.time_limit_secs
        );

        Self {
            config,
            level,
            world,
            player,
            monitor,
            frame_count: 0,
            fps: 0,
            fps_counter: 0,
            last_second: now as u64,
        }
    }

    /// Advance the session by one frame.
    ///
    /// Order matters: look before move, move before step, step before the
    /// monitor reads the manifolds. Input is still consumed after the level
    /// ends so the camera stays live on the end screen, but forces no longer
    /// matter to the outcome.
    pub fn frame(&mut self, keys: &KeyInput, mouse: MouseDelta, now: f64, dt: f32) -> HudState {
        self.player.apply_mouse_delta(mouse.dx, mouse.dy);
        self.player.apply_keyboard_input(keys, &mut self.world);
        self.world.step(dt);
        self.monitor.update(&self.world, now);

        self.frame_count += 1;
        self.fps_counter += 1;
        let second = now as u64;
        if second != self.last_second {
            self.fps = self.fps_counter;
            self.fps_counter = 0;
            self.last_second = second;
        }

        HudState {
            fps: self.fps,
            won: self.monitor.won(),
            lost: self.monitor.lost(),
            time_remaining: self.monitor.time_remaining(now),
        }
    }

    /// Restart the current attempt: clear the outcome, rebase the clock and
    /// put the player back on the spawn point. The level geometry is reused
    /// as-is since it is all static.
    pub fn restart(&mut self, now: f64) {
        log::info!("restarting level '{}'", self.level.name);
        self.monitor.reset(now);
        self.player
            .teleport_to(&mut self.world, self.level.spawn.position);
    }

    /// Set the player's projection from display parameters.
    pub fn set_projection(&mut self, fov_deg: f32, far: f32, near: f32, aspect: f32) {
        self.player.set_projection(fov_deg, far, near, aspect);
    }

    /// Combined projection-view matrix for the current frame.
    pub fn projection_view_matrix(&self) -> Mat4 {
        self.player.projection_view_matrix(&self.world)
    }

    /// Current player pose snapshot.
    pub fn pose(&self) -> Pose {
        self.player.pose(&self.world)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.monitor.phase()
    }

    #[inline]
    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    #[inline]
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    #[inline]
    pub fn monitor(&self) -> &WinConditionMonitor {
        &self.monitor
    }

    #[inline]
    pub fn level(&self) -> &Level {
        &self.level
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

// ============================================================================
// Tests
// ============================================================================

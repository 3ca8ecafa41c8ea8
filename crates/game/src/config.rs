//! Gameplay tuning constants.
//!
//! All movement parameters are grouped here for easy tuning. The defaults
//! give a heavy, friction-driven capsule pushed around by continuous forces.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Default horizontal look angle in degrees (facing -Z).
pub const DEFAULT_YAW: f32 = -90.0;

/// Default vertical look angle in degrees.
pub const DEFAULT_PITCH: f32 = 0.0;

/// Configuration for the player capsule and camera.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    // ========================================================================
    // Capsule
    // ========================================================================
    /// Capsule radius (meters).
    pub capsule_radius: f32,

    /// Half-height of the capsule's cylindrical section (meters).
    /// Total half-height of the body is this plus the radius.
    pub capsule_half_height: f32,

    /// Body mass (kilograms).
    pub mass: f32,

    /// Surface friction. High, so the capsule stops quickly when force ends.
    pub friction: f32,

    // ========================================================================
    // Movement
    // ========================================================================
    /// Walking speed multiplier for the continuous central force.
    pub walk_speed: f32,

    /// Upward impulse magnitude applied on a jump.
    pub jump_impulse: f32,

    /// Upward bias mixed into the steering direction while jump is held,
    /// making jumps steerable instead of purely vertical.
    pub jump_steer_bias: f32,

    /// Mouse sensitivity (degrees per pixel of cursor movement).
    pub mouse_sensitivity: f32,

    // ========================================================================
    // Ground detection
    // ========================================================================
    /// Length of the downward ground-probe ray.
    pub ground_ray_length: f32,

    /// Extra distance past the capsule half-height that still counts as
    /// touching the ground.
    pub ground_buffer: f32,

    /// Vertical offset from the body center to the camera eye, so the view
    /// sits near the top of the capsule.
    pub eye_height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            capsule_radius: 0.5,
            capsule_half_height: 0.5,
            mass: 10.0,
            friction: 1.5,

            walk_speed: 25.0,
            jump_impulse: 2.0,
            jump_steer_bias: 1.5,
            mouse_sensitivity: 0.08,

            ground_ray_length: 1000.0,
            ground_buffer: 0.2,
            eye_height: 0.5,
        }
    }
}

impl PlayerConfig {
    /// Total half-height of the capsule, caps included.
    pub fn total_half_height(&self) -> f32 {
        self.capsule_half_height + self.capsule_radius
    }

    /// Maximum ground-probe distance that still counts as grounded.
    pub fn grounded_threshold(&self) -> f32 {
        self.total_half_height() + self.ground_buffer
    }
}

/// Top-level game configuration: world physics plus player tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// World gravity vector.
    pub gravity: Vec3,

    /// Seconds the player has to reach the win body.
    pub time_limit_secs: f64,

    /// Player capsule and camera tuning.
    pub player: PlayerConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            time_limit_secs: 120.0,
            player: PlayerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlayerConfig::default();
        assert!(config.walk_speed > 0.0);
        assert!(config.mass > 0.0);
        assert!(config.capsule_radius > 0.0);
    }

    #[test]
    fn test_grounded_threshold() {
        let config = PlayerConfig::default();
        // Half-height 1.0 plus a 0.2 buffer
        assert!((config.total_half_height() - 1.0).abs() < 1e-6);
        assert!((config.grounded_threshold() - 1.2).abs() < 1e-6);
    }
}

//! Obstacle-course levels.
//!
//! A level is a declarative list of tagged body descriptions plus a spawn
//! point. Populating a world with it is separate from describing it, so the
//! same level can be rebuilt into a fresh world after a full restart.

use abyss_physics::{BodyDesc, BodyHandle, BodyTag, PhysicsWorld};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_PITCH, DEFAULT_YAW};

/// Where and how the player enters the level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Body-center position in world space.
    pub position: Vec3,
    /// Initial yaw in degrees.
    pub yaw: f32,
    /// Initial pitch in degrees.
    pub pitch: f32,
}

/// An obstacle course: static platforms over a drop, ending in a win body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Player spawn.
    pub spawn: SpawnPoint,

    /// Static course geometry, including the win body.
    bodies: Vec<BodyDesc>,
}

impl Level {
    /// Create an empty level with a spawn at the origin.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            spawn: SpawnPoint {
                position: Vec3::new(0.0, 2.0, 0.0),
                yaw: DEFAULT_YAW,
                pitch: DEFAULT_PITCH,
            },
            bodies: Vec::new(),
        }
    }

    /// Add a static platform.
    pub fn add_platform(&mut self, center: Vec3, half_extents: Vec3) -> &mut Self {
        self.bodies
            .push(BodyDesc::fixed_box(BodyTag::Platform, center, half_extents));
        self
    }

    /// Add the win body. Touching it completes the level.
    pub fn add_win_platform(&mut self, center: Vec3, half_extents: Vec3) -> &mut Self {
        self.bodies
            .push(BodyDesc::fixed_box(BodyTag::Win, center, half_extents));
        self
    }

    /// Add an untagged scene object.
    pub fn add_object(&mut self, desc: BodyDesc) -> &mut Self {
        self.bodies.push(desc);
        self
    }

    /// Number of bodies this level describes.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the level contains a win body at all.
    pub fn has_win_body(&self) -> bool {
        self.bodies.iter().any(|b| b.tag == BodyTag::Win)
    }

    /// Create every body in the given world.
    pub fn populate(&self, world: &mut PhysicsWorld) -> Vec<BodyHandle> {
        log::debug!("populating level '{}' with {} bodies", self.id, self.bodies.len());
        self.bodies.iter().map(|desc| world.add_body(desc)).collect()
    }

    /// The default obstacle course: a run of platforms floating over the
    /// abyss, with gaps that must be jumped, ending on a glowing win block.
    pub fn obstacle_course() -> Self {
        let mut level = Self::new("course", "Lost in Abyss");

        level.spawn = SpawnPoint {
            position: Vec3::new(0.0, 2.0, 0.0),
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
        };

        // Course runs along -Z, the direction the player spawns facing.
        // Start platform under the spawn
        level.add_platform(Vec3::new(0.0, 0.5, 0.0), Vec3::new(3.0, 0.5, 3.0));

        // Walkway
        level.add_platform(Vec3::new(0.0, 0.5, -8.0), Vec3::new(2.0, 0.5, 4.0));

        // Gap, then a smaller landing
        level.add_platform(Vec3::new(0.0, 0.5, -17.0), Vec3::new(1.5, 0.5, 1.5));

        // Side-step sequence
        level.add_platform(Vec3::new(3.0, 0.5, -22.0), Vec3::new(1.5, 0.5, 1.5));
        level.add_platform(Vec3::new(-2.0, 1.0, -27.0), Vec3::new(1.5, 0.5, 1.5));

        // Final stretch and the win block
        level.add_platform(Vec3::new(0.0, 1.5, -33.0), Vec3::new(2.0, 0.5, 2.0));
        level.add_win_platform(Vec3::new(0.0, 1.5, -39.0), Vec3::new(2.0, 0.5, 2.0));

        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_level() {
        let level = Level::new("test", "Test Level");
        assert_eq!(level.id, "test");
        assert_eq!(level.body_count(), 0);
        assert!(!level.has_win_body());
    }

    #[test]
    fn test_obstacle_course_has_win_body() {
        let level = Level::obstacle_course();
        assert!(level.body_count() > 3);
        assert!(level.has_win_body());
    }

    #[test]
    fn test_populate_creates_bodies() {
        let level = Level::obstacle_course();
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));

        let handles = level.populate(&mut world);
        assert_eq!(handles.len(), level.body_count());
        assert_eq!(world.body_count(), level.body_count());

        // Tags survive the round trip into the world
        let win_count = handles
            .iter()
            .filter(|h| world.tag_of(**h) == Some(BodyTag::Win))
            .count();
        assert_eq!(win_count, 1);
    }
}

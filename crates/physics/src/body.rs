//! Body descriptions, handles and category tags.

use glam::Vec3;
use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
use serde::{Deserialize, Serialize};

/// Gameplay category attached to every physics body.
///
/// Tags are set once at body creation and kept in a side table inside the
/// world (handle -> tag), so contact scans are pure lookups with no pointer
/// casts. A body whose tag was never registered reads as [`BodyTag::Object`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyTag {
    /// A loose scene object with no gameplay meaning.
    Object,
    /// Static course geometry the player walks on.
    Platform,
    /// Touching this body completes the level.
    Win,
    /// The player capsule itself. Never participates in win/lose logic.
    Player,
}

impl Default for BodyTag {
    fn default() -> Self {
        Self::Object
    }
}

/// Collision shape for a body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum BodyShape {
    /// An axis-aligned box given by half-extents.
    Box {
        /// Half-size in each axis (x, y, z).
        half_extents: Vec3,
    },

    /// A vertical capsule (pill shape).
    Capsule {
        /// Radius of the cylinder and end caps.
        radius: f32,
        /// Half-height of the cylindrical section, caps excluded.
        half_height: f32,
    },
}

/// Everything needed to create a body in the world.
///
/// Mass semantics follow the usual rigid-body convention: zero mass means a
/// static, immovable body; non-zero mass means a dynamic one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDesc {
    /// Collision shape.
    pub shape: BodyShape,

    /// Initial position of the shape's center in world space.
    pub position: Vec3,

    /// Body mass in kilograms. Zero for static geometry.
    pub mass: f32,

    /// Surface friction coefficient.
    pub friction: f32,

    /// Linear velocity damping.
    pub linear_damping: f32,

    /// Angular velocity damping.
    pub angular_damping: f32,

    /// Pin the angular factor to zero so the body can never tumble.
    pub lock_rotations: bool,

    /// Whether the engine may deactivate the body when it comes to rest.
    pub can_sleep: bool,

    /// Gameplay category, immutable after creation.
    pub tag: BodyTag,
}

impl BodyDesc {
    /// A static box platform.
    pub fn fixed_box(tag: BodyTag, center: Vec3, half_extents: Vec3) -> Self {
        Self {
            shape: BodyShape::Box { half_extents },
            position: center,
            mass: 0.0,
            friction: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            lock_rotations: false,
            can_sleep: true,
            tag,
        }
    }

    /// A dynamic capsule suitable for a character body: no damping, rotations
    /// locked, deactivation disabled so input is never ignored.
    pub fn character_capsule(center: Vec3, radius: f32, half_height: f32, mass: f32) -> Self {
        Self {
            shape: BodyShape::Capsule {
                radius,
                half_height,
            },
            position: center,
            mass,
            friction: 1.5,
            linear_damping: 0.0,
            angular_damping: 0.0,
            lock_rotations: true,
            can_sleep: false,
            tag: BodyTag::Player,
        }
    }

    /// Override the friction coefficient.
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Override the gameplay tag.
    pub fn with_tag(mut self, tag: BodyTag) -> Self {
        self.tag = tag;
        self
    }
}

/// Opaque handle to a body in a [`crate::PhysicsWorld`].
///
/// Bundles the rigid-body handle with its single collider so callers never
/// juggle the two separately. The handle is stamped with the id of the world
/// that issued it; every accessor checks the stamp, so a handle used against
/// a different world reads as absent instead of aliasing whichever body
/// happens to occupy the same arena slot there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    pub(crate) world: u64,
    pub(crate) body: RigidBodyHandle,
    pub(crate) collider: ColliderHandle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_box_is_static() {
        let desc = BodyDesc::fixed_box(
            BodyTag::Platform,
            Vec3::ZERO,
            Vec3::new(1.0, 1.0, 1.0),
        );
        assert_eq!(desc.mass, 0.0);
        assert_eq!(desc.tag, BodyTag::Platform);
        assert!(desc.can_sleep);
    }

    #[test]
    fn test_character_capsule_constraints() {
        let desc = BodyDesc::character_capsule(Vec3::new(0.0, 5.0, 0.0), 0.5, 0.25, 10.0);
        assert!(desc.lock_rotations);
        assert!(!desc.can_sleep);
        assert_eq!(desc.linear_damping, 0.0);
        assert_eq!(desc.angular_damping, 0.0);
        assert_eq!(desc.tag, BodyTag::Player);
    }

    #[test]
    fn test_builder_overrides() {
        let desc = BodyDesc::fixed_box(BodyTag::Object, Vec3::ZERO, Vec3::ONE)
            .with_friction(0.2)
            .with_tag(BodyTag::Win);
        assert_eq!(desc.friction, 0.2);
        assert_eq!(desc.tag, BodyTag::Win);
    }
}

//! Per-frame player input.
//!
//! The windowing layer polls its key map once per frame and fills in a
//! [`KeyInput`]; mouse movement arrives separately as a cursor delta
//! computed by the caller.

use serde::{Deserialize, Serialize};

/// Boolean key state for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl KeyInput {
    /// Check if any movement key is held.
    #[inline]
    pub fn has_movement(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Check if any input at all is active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.has_movement() || self.jump
    }
}

/// Raw mouse cursor delta for one frame, in pixels.
///
/// Positive `dx` turns right, positive `dy` looks up; the windowing layer is
/// responsible for flipping its native y axis before handing the delta over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MouseDelta {
    pub dx: f32,
    pub dy: f32,
}

impl MouseDelta {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_input_default_is_idle() {
        let keys = KeyInput::default();
        assert!(!keys.has_movement());
        assert!(!keys.is_active());
    }

    #[test]
    fn test_jump_counts_as_active() {
        let keys = KeyInput {
            jump: true,
            ..Default::default()
        };
        assert!(!keys.has_movement());
        assert!(keys.is_active());
    }
}

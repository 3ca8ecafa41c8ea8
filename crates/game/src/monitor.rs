//! Win and loss detection.
//!
//! After each physics step the monitor scans the world's contact pairs for
//! anything touching a win-tagged body, and separately watches the level
//! clock. Both outcomes latch: once the level is won or lost it stays that
//! way until an explicit [`reset`].
//!
//! [`reset`]: WinConditionMonitor::reset

use abyss_physics::{BodyTag, PhysicsWorld};
use serde::{Deserialize, Serialize};

/// Phase of the current level attempt.
///
/// ```text
/// Playing --[contact with a win body]--> Won
/// Playing --[elapsed >= time limit]----> Lost
/// Won | Lost --[reset()]--------------> Playing
/// ```
///
/// `Won` and `Lost` are terminal and mutually exclusive; the win check runs
/// before the timeout check, so a frame that produces both resolves to
/// `Won`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Won,
    Lost,
}

/// Watches contact manifolds and the level clock for the end of a level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinConditionMonitor {
    phase: GamePhase,
    start_time: f64,
    time_limit: f64,
}

impl WinConditionMonitor {
    /// Create a monitor for a level starting at `start_time` with the given
    /// time limit in seconds.
    pub fn new(time_limit: f64, start_time: f64) -> Self {
        Self {
            phase: GamePhase::Playing,
            start_time,
            time_limit,
        }
    }

    /// Scan the last step's contact pairs for a win-tagged participant.
    ///
    /// Contacts are symmetric so both members of every pair are tested; the
    /// first match wins and no ordering across pairs is assumed. Bodies with
    /// no registered tag read as non-win.
    pub fn check_win_by_contact(&self, world: &PhysicsWorld) -> bool {
        world.contact_pairs().any(|pair| pair.involves(BodyTag::Win))
    }

    /// Whether the clock has run out. Never true once a terminal phase has
    /// latched.
    pub fn check_timeout(&self, now: f64) -> bool {
        self.phase == GamePhase::Playing && now - self.start_time >= self.time_limit
    }

    /// Evaluate both end conditions for this frame.
    ///
    /// Call strictly after the physics step, while the manifolds are valid.
    /// A terminal phase short-circuits the scan entirely; the win check
    /// always runs before the timeout check so a win can never be stolen by
    /// a timeout in the same frame.
    pub fn update(&mut self, world: &PhysicsWorld, now: f64) -> GamePhase {
        if self.phase != GamePhase::Playing {
            return self.phase;
        }

        if self.check_win_by_contact(world) {
            log::info!("level complete after {:.1}s", now - self.start_time);
            self.phase = GamePhase::Won;
        } else if self.check_timeout(now) {
            log::info!("level failed: time limit of {:.0}s reached", self.time_limit);
            self.phase = GamePhase::Lost;
        }

        self.phase
    }

    /// Clear any latched outcome and rebase the clock, so the level can be
    /// replayed without rebuilding the physics world.
    pub fn reset(&mut self, now: f64) {
        self.phase = GamePhase::Playing;
        self.start_time = now;
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn won(&self) -> bool {
        self.phase == GamePhase::Won
    }

    #[inline]
    pub fn lost(&self) -> bool {
        self.phase == GamePhase::Lost
    }

    /// Seconds since the level started.
    pub fn elapsed(&self, now: f64) -> f64 {
        (now - self.start_time).max(0.0)
    }

    /// Seconds left on the clock, clamped at zero.
    pub fn time_remaining(&self, now: f64) -> f64 {
        (self.time_limit - self.elapsed(now)).max(0.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

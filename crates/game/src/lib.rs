//! First-person platforming gameplay.
//!
//! This crate turns the raw physics layer into a playable level attempt:
//! a capsule-bodied [`PlayerController`] steered by keyboard and mouse, a
//! [`WinConditionMonitor`] that watches contacts and the clock, and a
//! [`GameSession`] tying them together frame by frame.
//!
//! Rendering is deliberately out of scope. The session emits matrices and
//! [`HudState`]/[`Pose`] snapshots; whatever draws them lives elsewhere.

pub mod config;
pub mod hud;
pub mod input;
pub mod level;
pub mod monitor;
pub mod player;
pub mod session;
pub mod settings;

pub use config::{GameConfig, PlayerConfig, DEFAULT_PITCH, DEFAULT_YAW};
pub use hud::HudState;
pub use input::{KeyInput, MouseDelta};
pub use level::{Level, SpawnPoint};
pub use monitor::{GamePhase, WinConditionMonitor};
pub use player::{PlayerController, Pose};
pub use session::GameSession;
pub use settings::{Settings, SettingsError};

// Re-export the physics surface so binaries only need one gameplay dep.
pub use abyss_physics::{BodyDesc, BodyHandle, BodyShape, BodyTag, PhysicsWorld, RAY_MISS};

//! Abyss Physics
//!
//! A thin, game-facing wrapper around the `rapier3d` rigid-body engine.
//! The rest of the workspace never touches the engine directly; everything
//! goes through [`PhysicsWorld`]:
//!
//! - **Bodies**: static platforms and dynamic capsules/boxes, created from a
//!   [`BodyDesc`] and addressed by an opaque [`BodyHandle`]
//! - **Stepping**: fixed 1/60s timestep with a single sub-step per frame
//! - **Queries**: closest-hit ray casts and per-step contact enumeration
//! - **Tags**: every body carries a [`BodyTag`] category in a side table,
//!   used by gameplay code to classify contacts without downcasting
//!
//! # Design Principles
//!
//! 1. **One mutator per tick**: the world is stepped exactly once per frame
//!    by its owner; contact pairs are only meaningful after that step
//! 2. **No second source of truth**: body transforms live in the engine and
//!    are queried on demand
//! 3. **Queries never fail**: a ray that hits nothing reports "very far",
//!    an unknown tag reads as [`BodyTag::Object`]

pub mod body;
pub mod world;

pub use body::{BodyDesc, BodyHandle, BodyShape, BodyTag};
pub use world::{ContactPairView, PhysicsWorld, RAY_MISS};

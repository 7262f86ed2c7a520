//! Simulation core for a 2D real-time entity engine
//!
//! Per-tick physics integration, discrete collision resolution between
//! axis-aligned bodies, and an observer channel that lets presentation
//! (rendering, audio) react to simulation state without the simulation
//! referencing it.
//!
//! Key concepts:
//! - `Entity`: base simulatable object - transform, hitbox, rays,
//!   animation/audio delegates, observer channel
//! - `PhysicsEntity`: an entity plus the physics capability - mass,
//!   forces, integration, collision resolution, hit points
//! - `Effect`: one-shot bonus capability (spring power-up) attached to a
//!   physics entity
//! - `ObserverChannel` / `SimEvent`: id-keyed subscriber registry carrying
//!   tagged notifications to the view layer
//! - `Camera`: world-to-screen projection passed into screen-space queries
//!   as a read-only context value
//!
//! Tick contract (single-threaded, synchronous):
//! 1. The external world loop applies forces (`apply_gravity`,
//!    `apply_friction`, `apply_drag`) - `update` consumes and clears the
//!    accumulators, so this happens every tick.
//! 2. `update(t, dt)` integrates motion and broadcasts refresh events.
//! 3. The loop resolves collisions for the overlapping pairs it selected;
//!    resolution mutates both bodies in place, so pair ordering matters.

pub mod animation;
pub mod audio;
pub mod bonus;
pub mod camera;
pub mod config;
pub mod entity;
pub mod hitbox;
pub mod math;
pub mod observer;
pub mod physics;
pub mod ray;

// Re-export main types
pub use animation::{Animation, AnimationPlayer};
pub use audio::AudioPlayer;
pub use bonus::Effect;
pub use camera::Camera;
pub use config::{ConfigError, WorldConfig};
pub use entity::{Entity, LifeState, Simulate};
pub use hitbox::Hitbox;
pub use math::{lerp, lerp_vec, Vec2};
pub use observer::{Observer, ObserverChannel, SimEvent, SubscriberId};
pub use physics::PhysicsEntity;
pub use ray::Ray;

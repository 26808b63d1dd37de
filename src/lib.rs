//! Enemy AI, combat resolution and temporary-effect stacking for a
//! side-scrolling arcade shooter.
//!
//! The library is the simulation core only.  Rendering, input and collision
//! detection belong to the caller, which drives a [`World`] one tick at a
//! time, reports the overlaps it sees after each tick's motion (through the
//! detector passed to [`World::tick`], or [`World::report_collision`] between
//! [`World::advance`] and [`World::settle`]) and drains [`GameEvent`]s for
//! feedback.

pub mod ai;
pub mod behavior;
pub mod buffs;
pub mod combat;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod level;
pub mod pool;
pub mod spawn;
pub mod timers;
pub mod weapons;
pub mod world;

pub use config::GameConfig;
pub use error::ConfigError;
pub use events::{FeedbackEffect, GameEvent};
pub use pool::{Handle, Pool};
pub use world::{Collision, HudSnapshot, World};

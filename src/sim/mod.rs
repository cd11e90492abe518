//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Contact, circles_overlap, resolve_boundary, resolve_collisions, resolve_pair};
pub use entity::{Category, Entity};
pub use spawner::WaveSpawner;
pub use state::{EndReason, Field, GameEvent, MatchPhase, MatchState};
pub use tick::{MatchObserver, Simulation, Snapshot, TapSender};

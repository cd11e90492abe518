//! Fruit Tap - a falling-object reflex game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, waves, match state)
//! - `config`: Data-driven match tuning and revision presets
//! - `audio`: Sound cue boundary (the playback side lives outside this crate)
//! - `error`: Error types

pub mod audio;
pub mod config;
pub mod error;
pub mod sim;

pub use config::{CategoryRule, CategoryRules, MatchConfig, Variant};
pub use error::{Result, SimError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation cadence in milliseconds (20 Hz)
    pub const TICK_MS: u64 = 50;
    /// Default match length (2 minutes)
    pub const MATCH_DURATION_MS: u64 = 2 * 60 * 1000;

    /// Lives at match start
    pub const STARTING_LIVES: u32 = 3;

    /// Objects per wave
    pub const WAVE_SIZE: u32 = 3;
    /// Upper bound when waves are configured to grow
    pub const MAX_WAVE_SIZE: u32 = 12;
    /// Base speed of the first wave (field pixels per tick)
    pub const INITIAL_WAVE_SPEED: f32 = 5.0;
    /// Speed added after every wave
    pub const WAVE_SPEED_INCREMENT: f32 = 2.0;

    /// Edge length of an object's bounding square
    pub const ENTITY_SIZE: f32 = 150.0;

    /// One in eight slots is a pest
    pub const PENALTY_PROBABILITY: f64 = 1.0 / 8.0;
    /// Share of non-pest slots that become flowers
    pub const BONUS_PROBABILITY: f64 = 0.10;

    /// Launch cone for fruit and flowers, degrees from +x (y down)
    pub const LAUNCH_ANGLE_MIN_DEG: f32 = 45.0;
    pub const LAUNCH_ANGLE_MAX_DEG: f32 = 135.0;
}

/// Unit direction for an angle in degrees, measured from +x with +y pointing down
#[inline]
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    let theta = degrees.to_radians();
    Vec2::new(theta.cos(), theta.sin())
}

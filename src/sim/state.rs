//! Match state and core simulation types
//!
//! Score, lives and the match clock, plus the field and the events a tick emits.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Category;
use crate::config::MatchConfig;
use crate::error::{Result, SimError};

/// Why a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    OutOfLives,
    TimeUp,
}

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// No match started yet
    Waiting,
    /// Ticking and accepting taps
    Active,
    /// Finished; never ticks again
    Ended(EndReason),
}

/// Play field dimensions in field pixels (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A field must be positive and fit at least one entity
    pub fn validate(&self, entity_size: f32) -> Result<()> {
        let Self { width, height } = *self;
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(SimError::invalid(format!(
                "field must be positive, got {width}x{height}"
            )));
        }
        if width < entity_size || height < entity_size {
            return Err(SimError::invalid(format!(
                "field {width}x{height} is smaller than entity size {entity_size}"
            )));
        }
        Ok(())
    }

    /// Inclusive bounds check for taps
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }
}

/// Something that happened during a tick, for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new wave entered the field
    WaveSpawned { wave: u32, count: u32, speed: f32 },
    /// The player tapped an entity
    Tapped {
        id: u32,
        category: Category,
        points: i32,
        lives_lost: u32,
    },
    /// An entity fell out of the bottom untapped
    Missed {
        id: u32,
        category: Category,
        lives_lost: u32,
    },
    /// Emitted exactly once per match
    MatchEnded { final_score: u64, reason: EndReason },
}

/// Score, lives and clock for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub score: u64,
    pub lives: u32,
    /// Simulated time since match start
    pub elapsed_ms: u64,
    /// Fixed at match start
    pub duration_ms: u64,
    /// Base speed for the next wave
    pub wave_speed: f32,
    /// Waves spawned so far
    pub wave: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: MatchPhase,
}

impl MatchState {
    /// Fresh state for a new match
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            score: 0,
            lives: config.starting_lives,
            elapsed_ms: 0,
            duration_ms: config.duration_ms,
            wave_speed: config.initial_wave_speed,
            wave: 0,
            time_ticks: 0,
            phase: MatchPhase::Active,
        }
    }

    /// Placeholder state before the first `start_match`
    pub fn waiting(config: &MatchConfig) -> Self {
        Self {
            phase: MatchPhase::Waiting,
            ..Self::new(config)
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == MatchPhase::Active
    }

    #[inline]
    pub fn is_ended(&self) -> bool {
        matches!(self.phase, MatchPhase::Ended(_))
    }

    pub fn time_remaining_ms(&self) -> u64 {
        self.duration_ms.saturating_sub(self.elapsed_ms)
    }

    /// Apply a tap score; the score never goes negative
    pub fn add_points(&mut self, points: i32) {
        self.score = self.score.saturating_add_signed(i64::from(points));
    }

    /// Remove lives, stopping at zero
    pub fn lose_lives(&mut self, count: u32) {
        self.lives = self.lives.saturating_sub(count);
    }

    pub fn advance_clock(&mut self, tick_ms: u64) {
        self.time_ticks += 1;
        self.elapsed_ms = self.elapsed_ms.saturating_add(tick_ms);
    }

    /// Record a spawned wave and ramp the speed for the next one
    pub fn advance_wave(&mut self, speed_increment: f32) {
        self.wave += 1;
        self.wave_speed += speed_increment;
    }

    /// End the match if lives or time ran out
    ///
    /// Returns the reason only on the transition, so callers fire
    /// end-of-match effects once.
    pub fn check_termination(&mut self) -> Option<EndReason> {
        if !self.is_active() {
            return None;
        }
        let reason = if self.lives == 0 {
            EndReason::OutOfLives
        } else if self.elapsed_ms >= self.duration_ms {
            EndReason::TimeUp
        } else {
            return None;
        };
        self.phase = MatchPhase::Ended(reason);
        Some(reason)
    }
}

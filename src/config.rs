//! Match configuration and revision presets
//!
//! Every gameplay constant is settable here. Loaded from JSON by the driver.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};
use crate::sim::Category;

/// Known rule sets from the game's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Early revision: fruit and pests only, fruit worth 5
    Orchard,
    /// Later revision: flowers join at 10%, fruit worth 1, flowers 5
    #[default]
    Blossom,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Orchard => "Orchard",
            Variant::Blossom => "Blossom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "orchard" | "classic" => Some(Variant::Orchard),
            "blossom" | "flowers" => Some(Variant::Blossom),
            _ => None,
        }
    }

    /// Chance that a non-pest slot becomes a flower
    pub fn bonus_probability(&self) -> f64 {
        match self {
            Variant::Orchard => 0.0,
            Variant::Blossom => BONUS_PROBABILITY,
        }
    }

    /// Scoring table for this revision
    pub fn rules(&self) -> CategoryRules {
        match self {
            Variant::Orchard => CategoryRules {
                reward: CategoryRule {
                    points: 5,
                    skins: 7,
                    ..CategoryRule::REWARD
                },
                ..CategoryRules::default()
            },
            Variant::Blossom => CategoryRules::default(),
        }
    }
}

/// Scoring and life costs for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Added to score when tapped (ignored for pests)
    pub points: i32,
    /// Lives lost when tapped
    pub tap_life_cost: u32,
    /// Lives lost when it falls out of the field untapped
    pub miss_life_cost: u32,
    /// Number of sprite variants a renderer can pick from
    pub skins: u8,
}

impl CategoryRule {
    pub const REWARD: Self = Self {
        points: 1,
        tap_life_cost: 0,
        miss_life_cost: 1,
        skins: 8,
    };
    pub const BONUS: Self = Self {
        points: 5,
        tap_life_cost: 0,
        miss_life_cost: 1,
        skins: 3,
    };
    pub const PENALTY: Self = Self {
        points: 0,
        tap_life_cost: 1,
        miss_life_cost: 0,
        skins: 1,
    };
}

/// Per-category rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRules {
    pub reward: CategoryRule,
    pub bonus: CategoryRule,
    pub penalty: CategoryRule,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            reward: CategoryRule::REWARD,
            bonus: CategoryRule::BONUS,
            penalty: CategoryRule::PENALTY,
        }
    }
}

impl CategoryRules {
    pub fn get(&self, category: Category) -> &CategoryRule {
        match category {
            Category::Reward => &self.reward,
            Category::Bonus => &self.bonus,
            Category::Penalty => &self.penalty,
        }
    }
}

/// Everything `start_match` needs besides the field size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Match length
    pub duration_ms: u64,
    /// Clock advance per tick
    pub tick_ms: u64,
    pub starting_lives: u32,

    // === Waves ===
    pub wave_size: u32,
    /// Added to the wave size after each wave (0 = fixed size)
    pub wave_size_increment: u32,
    pub max_wave_size: u32,
    pub initial_wave_speed: f32,
    pub speed_increment: f32,

    // === Composition ===
    pub penalty_probability: f64,
    pub bonus_probability: f64,
    pub launch_angle_min_deg: f32,
    pub launch_angle_max_deg: f32,
    pub entity_size: f32,

    pub rules: CategoryRules,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::from_variant(Variant::default())
    }
}

impl MatchConfig {
    /// Create a config from a revision preset
    pub fn from_variant(variant: Variant) -> Self {
        Self {
            duration_ms: MATCH_DURATION_MS,
            tick_ms: TICK_MS,
            starting_lives: STARTING_LIVES,

            wave_size: WAVE_SIZE,
            wave_size_increment: 0,
            max_wave_size: MAX_WAVE_SIZE,
            initial_wave_speed: INITIAL_WAVE_SPEED,
            speed_increment: WAVE_SPEED_INCREMENT,

            penalty_probability: PENALTY_PROBABILITY,
            bonus_probability: variant.bonus_probability(),
            launch_angle_min_deg: LAUNCH_ANGLE_MIN_DEG,
            launch_angle_max_deg: LAUNCH_ANGLE_MAX_DEG,
            entity_size: ENTITY_SIZE,

            rules: variant.rules(),
        }
    }

    /// Wave size for the given 0-based wave index
    pub fn wave_size_for(&self, wave: u32) -> u32 {
        let grown = self
            .wave_size
            .saturating_add(self.wave_size_increment.saturating_mul(wave));
        if self.wave_size_increment == 0 {
            grown
        } else {
            grown.min(self.max_wave_size.max(self.wave_size))
        }
    }

    /// Reject configs that cannot produce a playable match
    pub fn validate(&self) -> Result<()> {
        if self.duration_ms == 0 {
            return Err(SimError::invalid("duration_ms must be > 0"));
        }
        if self.tick_ms == 0 {
            return Err(SimError::invalid("tick_ms must be > 0"));
        }
        if self.starting_lives == 0 {
            return Err(SimError::invalid("starting_lives must be > 0"));
        }
        if !(self.entity_size.is_finite() && self.entity_size > 0.0) {
            return Err(SimError::invalid(format!(
                "entity_size must be positive, got {}",
                self.entity_size
            )));
        }
        if self.wave_size == 0 {
            return Err(SimError::invalid("wave_size must be > 0"));
        }
        if self.wave_size_increment > 0 && self.max_wave_size < self.wave_size {
            return Err(SimError::invalid(format!(
                "max_wave_size {} is below wave_size {}",
                self.max_wave_size, self.wave_size
            )));
        }
        if !self.initial_wave_speed.is_finite() || !self.speed_increment.is_finite() {
            return Err(SimError::invalid("wave speeds must be finite"));
        }
        if self.initial_wave_speed <= 0.0 {
            return Err(SimError::invalid(format!(
                "initial_wave_speed must be positive, got {}",
                self.initial_wave_speed
            )));
        }
        if self.speed_increment < 0.0 {
            return Err(SimError::invalid("speed_increment must not be negative"));
        }
        for (name, p) in [
            ("penalty_probability", self.penalty_probability),
            ("bonus_probability", self.bonus_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::invalid(format!("{name} must be in [0, 1], got {p}")));
            }
        }
        let (lo, hi) = (self.launch_angle_min_deg, self.launch_angle_max_deg);
        if !(lo.is_finite() && hi.is_finite()) || lo > hi {
            return Err(SimError::invalid(format!(
                "launch angle range [{lo}, {hi}] is not a valid interval"
            )));
        }
        Ok(())
    }

    /// Load a config from a JSON file; missing fields fall back to defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded match config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Match config saved to {}", path.as_ref().display());
        Ok(())
    }
}

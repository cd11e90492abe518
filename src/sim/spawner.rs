//! Wave spawning: when the field is clear of fruit and flowers, drop a new batch
//!
//! All randomness comes from a seeded PCG stream so a seed replays identically.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{Category, Entity};
use super::state::Field;
use crate::config::MatchConfig;
use crate::direction_from_degrees;

/// Decides when to spawn and what each wave contains
#[derive(Debug, Clone)]
pub struct WaveSpawner {
    seed: u64,
    rng: Pcg32,
}

impl WaveSpawner {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// A wave is due once no fruit or flower is left; pests don't block it
    pub fn should_spawn(entities: &[Entity]) -> bool {
        !entities.iter().any(Entity::is_reward)
    }

    /// Build one wave of `count` entities at the top edge
    ///
    /// Ids are taken from `next_id`, which is advanced past the last one used.
    pub fn spawn_wave(
        &mut self,
        count: u32,
        speed: f32,
        field: &Field,
        config: &MatchConfig,
        next_id: &mut u32,
    ) -> Vec<Entity> {
        (0..count)
            .map(|_| {
                let id = *next_id;
                *next_id += 1;
                self.spawn_one(id, speed, field, config)
            })
            .collect()
    }

    fn spawn_one(&mut self, id: u32, speed: f32, field: &Field, config: &MatchConfig) -> Entity {
        let size = config.entity_size;
        let max_x = (field.width - size).max(0.0);
        let pos = Vec2::new(self.rng.random_range(0.0..=max_x), 0.0);

        let category = if self.rng.random_bool(config.penalty_probability) {
            Category::Penalty
        } else if self.rng.random_bool(config.bonus_probability) {
            Category::Bonus
        } else {
            Category::Reward
        };

        let vel = match category {
            // Pests drop straight down
            Category::Penalty => Vec2::new(0.0, speed),
            Category::Reward | Category::Bonus => {
                let degrees = self
                    .rng
                    .random_range(config.launch_angle_min_deg..=config.launch_angle_max_deg);
                direction_from_degrees(degrees) * speed
            }
        };

        let rule = config.rules.get(category);
        let mut entity = Entity::new(id, category, pos, size, vel, rule.points);
        entity.skin = self.rng.random_range(0..rule.skins.max(1));
        entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field() -> Field {
        Field::new(1080.0, 1920.0)
    }

    #[test]
    fn test_should_spawn_ignores_pests() {
        let pest = Entity::new(1, Category::Penalty, Vec2::ZERO, 150.0, Vec2::new(0.0, 5.0), 0);
        let flower = Entity::new(2, Category::Bonus, Vec2::ZERO, 150.0, Vec2::new(0.0, 5.0), 5);

        assert!(WaveSpawner::should_spawn(&[]));
        assert!(WaveSpawner::should_spawn(std::slice::from_ref(&pest)));
        assert!(!WaveSpawner::should_spawn(&[pest, flower]));
    }

    #[test]
    fn test_wave_layout() {
        let config = MatchConfig::default();
        let mut spawner = WaveSpawner::new(42);
        let mut next_id = 10;

        let wave = spawner.spawn_wave(3, 5.0, &field(), &config, &mut next_id);
        assert_eq!(wave.len(), 3);
        assert_eq!(next_id, 13);
        assert_eq!(wave.iter().map(|e| e.id).collect::<Vec<_>>(), vec![10, 11, 12]);

        for e in &wave {
            assert_eq!(e.pos.y, 0.0);
            assert!(e.pos.x >= 0.0 && e.pos.x <= 1080.0 - 150.0);
            assert_eq!(e.size, 150.0);
            assert!((e.vel.length() - 5.0).abs() < 1e-4);
            assert!(e.vel.y > 0.0, "everything starts moving down");
        }
    }

    #[test]
    fn test_category_properties() {
        let config = MatchConfig::default();
        let mut spawner = WaveSpawner::new(7);
        let mut next_id = 1;
        let wave = spawner.spawn_wave(400, 9.0, &field(), &config, &mut next_id);

        let pests = wave.iter().filter(|e| e.is_penalty()).count();
        let flowers = wave.iter().filter(|e| e.is_bonus()).count();
        // 1/8 pests and 10% of the rest flowers, with generous slack
        assert!((20..=90).contains(&pests), "{pests} pests");
        assert!((10..=70).contains(&flowers), "{flowers} flowers");

        for e in &wave {
            match e.category {
                Category::Penalty => {
                    assert_eq!(e.vel, Vec2::new(0.0, 9.0));
                    assert_eq!(e.skin, 0);
                }
                Category::Bonus => {
                    assert_eq!(e.points, 5);
                    assert!(e.skin < 3);
                }
                Category::Reward => {
                    assert_eq!(e.points, 1);
                    assert!(e.skin < 8);
                }
            }
        }
    }

    #[test]
    fn test_narrow_field_pins_to_left_edge() {
        let config = MatchConfig::default();
        let mut spawner = WaveSpawner::new(3);
        let mut next_id = 1;
        let wave = spawner.spawn_wave(5, 5.0, &Field::new(150.0, 800.0), &config, &mut next_id);
        assert!(wave.iter().all(|e| e.pos.x == 0.0));
    }

    #[test]
    fn test_orchard_never_spawns_flowers() {
        let config = MatchConfig::from_variant(crate::Variant::Orchard);
        let mut spawner = WaveSpawner::new(99);
        let mut next_id = 1;
        let wave = spawner.spawn_wave(200, 5.0, &field(), &config, &mut next_id);
        assert!(!wave.iter().any(Entity::is_bonus));
        assert!(wave.iter().filter(|e| e.category == Category::Reward).all(|e| e.points == 5));
    }

    #[test]
    fn test_same_seed_same_wave() {
        let config = MatchConfig::default();
        let (mut a, mut b) = (WaveSpawner::new(1234), WaveSpawner::new(1234));
        let (mut id_a, mut id_b) = (1, 1);
        assert_eq!(
            a.spawn_wave(6, 5.0, &field(), &config, &mut id_a),
            b.spawn_wave(6, 5.0, &field(), &config, &mut id_b)
        );
    }

    proptest! {
        #[test]
        fn launch_angle_stays_in_cone(seed in any::<u64>(), speed in 1.0f32..40.0) {
            let config = MatchConfig { penalty_probability: 0.0, ..MatchConfig::default() };
            let mut spawner = WaveSpawner::new(seed);
            let mut next_id = 1;
            for e in spawner.spawn_wave(8, speed, &field(), &config, &mut next_id) {
                let degrees = e.vel.y.atan2(e.vel.x).to_degrees();
                prop_assert!(degrees >= 45.0 - 1e-3 && degrees <= 135.0 + 1e-3);
            }
        }
    }
}

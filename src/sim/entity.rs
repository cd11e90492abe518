//! Falling objects: fruit, flowers and pests
//!
//! Position is the top-left corner of the bounding square. The collision
//! shape is the circle inscribed in that square; taps test the square itself.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What kind of object this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Fruit, the common point object
    Reward,
    /// Flower, rarer and worth more
    Bonus,
    /// Pest: costs a life when tapped, harmless when missed
    Penalty,
}

impl Category {
    /// Fruit or flower: the objects that block the next wave
    #[inline]
    pub fn is_point(self) -> bool {
        !matches!(self, Category::Penalty)
    }
}

/// A falling entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    /// Top-left corner of the bounding square
    pub pos: Vec2,
    /// Edge length of the bounding square
    pub size: f32,
    /// Displacement per tick
    pub vel: Vec2,
    pub category: Category,
    /// Score awarded when tapped (pests use their life cost instead)
    pub points: i32,
    /// Sprite index within the category
    #[serde(default)]
    pub skin: u8,
}

impl Entity {
    pub fn new(id: u32, category: Category, pos: Vec2, size: f32, vel: Vec2, points: i32) -> Self {
        debug_assert!(size > 0.0, "entity size must be positive");
        Self {
            id,
            pos,
            size,
            vel,
            category,
            points,
            skin: 0,
        }
    }

    /// Advance by one tick of uniform motion
    #[inline]
    pub fn update(&mut self) {
        self.pos += self.vel;
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.radius())
    }

    /// Inclusive bounding-box hit test used for taps
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.pos.x
            && p.x <= self.pos.x + self.size
            && p.y >= self.pos.y
            && p.y <= self.pos.y + self.size
    }

    #[inline]
    pub fn is_penalty(&self) -> bool {
        self.category == Category::Penalty
    }

    /// True for fruit and flowers
    #[inline]
    pub fn is_reward(&self) -> bool {
        self.category.is_point()
    }

    #[inline]
    pub fn is_bonus(&self) -> bool {
        self.category == Category::Bonus
    }
}

//! Collision detection and response for falling circles
//!
//! Walls: left, right and top reflect and clamp. The bottom is open; falling
//! through it is how objects leave play. Pairs: a single O(n²) pass that
//! swaps velocities and pushes overlapping circles apart until tangent.

use glam::Vec2;

use super::entity::Entity;
use super::state::Field;

/// Separation axis used when two centers coincide exactly
const FALLBACK_AXIS: Vec2 = Vec2::X;

/// A resolved overlap between two entities
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    /// Entity pushed against the normal
    pub a: u32,
    /// Entity pushed along the normal
    pub b: u32,
    /// Unit vector from a's center toward b's center
    pub normal: Vec2,
    /// Overlap depth before separation
    pub penetration: f32,
}

/// Check whether two entities' circles overlap
///
/// Touching circles (distance == sum of radii) do not overlap.
#[inline]
pub fn circles_overlap(a: &Entity, b: &Entity) -> bool {
    let radius_sum = a.radius() + b.radius();
    a.center().distance_squared(b.center()) < radius_sum * radius_sum
}

/// Clamp one entity into the left, right and top walls, reflecting velocity
///
/// Returns true if any wall was hit.
pub fn resolve_boundary(entity: &mut Entity, field: &Field) -> bool {
    let radius = entity.radius();
    let center = entity.center();
    let mut hit = false;

    if center.x - radius < 0.0 {
        entity.pos.x = 0.0;
        entity.vel.x = entity.vel.x.abs();
        hit = true;
    }
    if center.x + radius > field.width {
        entity.pos.x = field.width - entity.size;
        entity.vel.x = -entity.vel.x.abs();
        hit = true;
    }
    if center.y - radius < 0.0 {
        entity.pos.y = 0.0;
        entity.vel.y = entity.vel.y.abs();
        hit = true;
    }
    // Bottom is left open: exits are removed by the tick, not bounced here

    hit
}

/// Resolve one pair: swap velocities and separate to tangency
pub fn resolve_pair(a: &mut Entity, b: &mut Entity) -> Option<Contact> {
    if !circles_overlap(a, b) {
        return None;
    }

    std::mem::swap(&mut a.vel, &mut b.vel);

    let delta = b.center() - a.center();
    let distance = delta.length();
    let normal = if distance > 0.0 {
        delta / distance
    } else {
        FALLBACK_AXIS
    };
    let penetration = a.radius() + b.radius() - distance;

    let push = normal * (penetration / 2.0);
    a.pos -= push;
    b.pos += push;

    Some(Contact {
        a: a.id,
        b: b.id,
        normal,
        penetration,
    })
}

/// Single pass over all unordered pairs
pub fn resolve_pairs(entities: &mut [Entity]) -> Vec<Contact> {
    let mut contacts = Vec::new();
    let n = entities.len();
    for i in 0..n {
        let (head, tail) = entities.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if let Some(contact) = resolve_pair(a, b) {
                log::trace!(
                    "contact {} <-> {} depth {:.2}",
                    contact.a,
                    contact.b,
                    contact.penetration
                );
                contacts.push(contact);
            }
        }
    }
    contacts
}

/// Full per-tick resolution: walls, pairs, then walls again so separation
/// never leaves anything outside the side or top edges
pub fn resolve_collisions(entities: &mut [Entity], field: &Field) -> Vec<Contact> {
    for entity in entities.iter_mut() {
        resolve_boundary(entity, field);
    }
    let contacts = resolve_pairs(entities);
    if !contacts.is_empty() {
        for entity in entities.iter_mut() {
            resolve_boundary(entity, field);
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Category;
    use proptest::prelude::*;

    const EPS: f32 = 1e-2;

    fn circle(id: u32, center: Vec2, size: f32, vel: Vec2) -> Entity {
        let pos = center - Vec2::splat(size / 2.0);
        Entity::new(id, Category::Reward, pos, size, vel, 1)
    }

    fn field() -> Field {
        Field::new(2000.0, 2000.0)
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = circle(1, Vec2::new(100.0, 100.0), 50.0, Vec2::ZERO);
        let touching = circle(2, Vec2::new(150.0, 100.0), 50.0, Vec2::ZERO);
        let inside = circle(3, Vec2::new(149.0, 100.0), 50.0, Vec2::ZERO);
        assert!(!circles_overlap(&a, &touching));
        assert!(circles_overlap(&a, &inside));
    }

    #[test]
    fn test_head_on_pair_swaps_and_separates() {
        let mut entities = vec![
            circle(1, Vec2::new(500.0, 500.0), 150.0, Vec2::new(5.0, 0.0)),
            circle(2, Vec2::new(600.0, 500.0), 150.0, Vec2::new(-5.0, 0.0)),
        ];

        let contacts = resolve_collisions(&mut entities, &field());
        assert_eq!(contacts.len(), 1);
        assert!((contacts[0].penetration - 50.0).abs() < EPS);

        assert_eq!(entities[0].vel, Vec2::new(-5.0, 0.0));
        assert_eq!(entities[1].vel, Vec2::new(5.0, 0.0));
        let gap = entities[0].center().distance(entities[1].center());
        assert!(gap >= 150.0 - EPS, "centers only {gap} apart");
        // Each moved half the penetration
        assert!((entities[0].center().x - 475.0).abs() < EPS);
        assert!((entities[1].center().x - 625.0).abs() < EPS);
    }

    #[test]
    fn test_coincident_centers_use_fallback_axis() {
        let mut a = circle(1, Vec2::new(500.0, 500.0), 100.0, Vec2::new(0.0, 3.0));
        let mut b = circle(2, Vec2::new(500.0, 500.0), 100.0, Vec2::new(0.0, 7.0));

        let contact = resolve_pair(&mut a, &mut b).expect("coincident circles overlap");
        assert_eq!(contact.normal, Vec2::X);
        assert!(a.pos.is_finite() && b.pos.is_finite());
        assert!((a.center().distance(b.center()) - 100.0).abs() < EPS);
        assert_eq!(a.center().y, b.center().y);
        assert!(a.center().x < b.center().x);
    }

    #[test]
    fn test_left_wall_clamps_and_reflects() {
        let mut e = Entity::new(1, Category::Reward, Vec2::new(-12.0, 40.0), 100.0, Vec2::new(-4.0, 3.0), 1);
        assert!(resolve_boundary(&mut e, &Field::new(400.0, 800.0)));
        assert_eq!(e.pos.x, 0.0);
        assert_eq!(e.vel, Vec2::new(4.0, 3.0));
    }

    #[test]
    fn test_right_wall_clamps_and_reflects() {
        let mut e = Entity::new(1, Category::Reward, Vec2::new(350.0, 40.0), 100.0, Vec2::new(4.0, 3.0), 1);
        assert!(resolve_boundary(&mut e, &Field::new(400.0, 800.0)));
        assert_eq!(e.pos.x, 300.0);
        assert_eq!(e.vel.x, -4.0);
    }

    #[test]
    fn test_top_wall_pushes_down() {
        let mut e = Entity::new(1, Category::Penalty, Vec2::new(50.0, -5.0), 100.0, Vec2::new(0.0, -6.0), 0);
        assert!(resolve_boundary(&mut e, &Field::new(400.0, 800.0)));
        assert_eq!(e.pos.y, 0.0);
        assert_eq!(e.vel.y, 6.0);
    }

    #[test]
    fn test_bottom_is_open() {
        let mut e = Entity::new(1, Category::Reward, Vec2::new(50.0, 790.0), 100.0, Vec2::new(0.0, 6.0), 1);
        assert!(!resolve_boundary(&mut e, &Field::new(400.0, 800.0)));
        assert_eq!(e.pos, Vec2::new(50.0, 790.0));
        assert_eq!(e.vel, Vec2::new(0.0, 6.0));
    }

    #[test]
    fn test_separated_pair_is_untouched() {
        let mut entities = vec![
            circle(1, Vec2::new(100.0, 100.0), 40.0, Vec2::new(0.0, 5.0)),
            circle(2, Vec2::new(300.0, 100.0), 40.0, Vec2::new(0.0, 5.0)),
        ];
        let before = entities.clone();
        assert!(resolve_collisions(&mut entities, &field()).is_empty());
        assert_eq!(entities, before);
    }

    proptest! {
        #[test]
        fn isolated_pair_ends_tangent_with_swapped_velocities(
            ax in 400.0f32..1600.0,
            ay in 400.0f32..1600.0,
            offset_x in -100.0f32..100.0,
            offset_y in -100.0f32..100.0,
            va in prop::array::uniform2(-20.0f32..20.0),
            vb in prop::array::uniform2(-20.0f32..20.0),
        ) {
            let va = Vec2::from_array(va);
            let vb = Vec2::from_array(vb);
            let mut entities = vec![
                circle(1, Vec2::new(ax, ay), 150.0, va),
                circle(2, Vec2::new(ax + offset_x, ay + offset_y), 150.0, vb),
            ];
            let overlapping = circles_overlap(&entities[0], &entities[1]);

            resolve_collisions(&mut entities, &field());

            let gap = entities[0].center().distance(entities[1].center());
            prop_assert!(gap >= 150.0 - EPS);
            if overlapping {
                prop_assert_eq!(entities[0].vel, vb);
                prop_assert_eq!(entities[1].vel, va);
            } else {
                prop_assert_eq!(entities[0].vel, va);
                prop_assert_eq!(entities[1].vel, vb);
            }
        }

        #[test]
        fn walls_always_enforced(
            x in -300.0f32..700.0,
            y in -300.0f32..700.0,
            dx in -20.0f32..20.0,
            dy in -20.0f32..20.0,
        ) {
            let field = Field::new(400.0, 800.0);
            let mut entities = vec![Entity::new(1, Category::Reward, Vec2::new(x, y), 100.0, Vec2::new(dx, dy), 1)];
            resolve_collisions(&mut entities, &field);
            let e = &entities[0];
            prop_assert!(e.pos.x >= 0.0);
            prop_assert!(e.pos.x + e.size <= field.width);
            prop_assert!(e.pos.y >= 0.0);
        }
    }
}

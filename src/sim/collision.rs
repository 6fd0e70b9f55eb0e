//! Collision predicates for circular bounds
//!
//! Pure queries only: these decide whether a contact exists, never what it
//! does. Damage, knockback, and removal are resolved by the tick pass.

use glam::Vec2;

/// Whether two circles overlap (strictly closer than the sum of radii).
///
/// Used for player/enemy contact. An exactly-touching pair does not count.
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a_pos.distance_squared(b_pos) < reach * reach
}

/// Whether a point lies strictly inside a circle.
///
/// Used for bullet/enemy hits: bullets are treated as points against the
/// enemy's bounding radius.
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) < radius * radius
}

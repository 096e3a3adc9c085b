//! Circle overlap tests used by the simulation step.
//!
//! There is no broad phase: every tick scans all asteroid/bullet pairs and
//! every asteroid against the ship. Entity counts stay in the tens.

use crate::entities::{Asteroid, Bullet, Ship};
use crate::types::Point;

/// True when the two circles touch or overlap.
pub fn circles_overlap(center_a: Point, radius_a: i32, center_b: Point, radius_b: i32) -> bool {
    let reach = i64::from(radius_a) + i64::from(radius_b);
    center_a.distance_squared(center_b) <= reach * reach
}

/// A bullet is a point; only the asteroid's radius gates the hit.
pub fn asteroid_hit_by(asteroid: &Asteroid, bullet: &Bullet) -> bool {
    circles_overlap(asteroid.position, asteroid.radius, bullet.position, 0)
}

/// The ship's size stands in for its bounding circle.
pub fn ship_hits(ship: &Ship, asteroid: &Asteroid) -> bool {
    circles_overlap(ship.position, ship.size, asteroid.position, asteroid.radius)
}

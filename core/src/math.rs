//! Stateless geometry helpers shared by every system.

use std::f32::consts::{PI, TAU};

use crate::Point;

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f32 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Heading from `from` toward `to`, in radians.
#[must_use]
pub fn angle_between(from: Point, to: Point) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Normalises an angle into `[-π, π)` so turns always take the short way round.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Linear interpolation between `start` and `end`.
#[must_use]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Quadratic ease-in-out curve over `t` in `[0, 1]`.
#[must_use]
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// Reports whether two circles overlap. Touching circles do not overlap.
#[must_use]
pub fn circles_overlap(a: Point, radius_a: f32, b: Point, radius_b: f32) -> bool {
    distance(a, b) < radius_a + radius_b
}

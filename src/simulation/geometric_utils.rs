//! Geometric utility functions for 2D vectors, headings and arena bounds.

use geo::algorithm::Distance;
use geo::{Euclidean, Point};

/// 2D vector used for positions, velocities, headings and gradients.
pub type Vec2 = Point<f64>;

/// Returns the zero vector.
#[inline]
pub fn zero() -> Vec2 {
    Vec2::new(0.0, 0.0)
}

/// Euclidean length of a vector.
#[inline]
pub fn length(v: Vec2) -> f64 {
    v.x().hypot(v.y())
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f64 {
    Euclidean.distance(a, b)
}

/// Scales `v` to unit length, or returns the zero vector when its length is below `epsilon`.
pub fn normalize_or_zero(v: Vec2, epsilon: f64) -> Vec2 {
    let l = length(v);
    if l < epsilon { zero() } else { v / l }
}

/// Rotates `v` counter-clockwise by `angle` radians.
pub fn rotate(v: Vec2, angle: f64) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(c * v.x() - s * v.y(), s * v.x() + c * v.y())
}

/// Expresses a world-frame vector in the local frame of a unit `heading`.
///
/// The local x axis points along the heading and the local y axis points to its left.
pub fn to_local_frame(v: Vec2, heading: Vec2) -> Vec2 {
    Vec2::new(
        heading.x() * v.x() + heading.y() * v.y(),
        -heading.y() * v.x() + heading.x() * v.y(),
    )
}

/// Clamps a position so a body stays inside the arena.
///
/// Bodies larger than the arena are pinned to the center line of the offending axis.
///
/// # Arguments
///
/// * `pos` - Position to clamp in place
/// * `half_extent` - Arena half extent on each axis
/// * `size` - Body radius
pub fn clamp_to_extent(pos: &mut Vec2, half_extent: Vec2, size: f64) {
    let mx = (half_extent.x() - size).max(0.0);
    let my = (half_extent.y() - size).max(0.0);
    pos.set_x(pos.x().clamp(-mx, mx));
    pos.set_y(pos.y().clamp(-my, my));
}

//! Geometry primitives for the continuous arena
//!
//! Screen coordinates: x grows right, y grows down, units are pixels.

use glam::Vec2;

/// A 2D position in arena space
pub type Point = Vec2;

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Point, b: Point) -> f32 {
    a.distance(b)
}

/// Axis-aligned rectangle test, inclusive on every edge
#[inline]
pub fn point_in_rect(p: Point, min: Point, size: Vec2) -> bool {
    p.x >= min.x && p.x <= min.x + size.x && p.y >= min.y && p.y <= min.y + size.y
}

/// Closed disk test
#[inline]
pub fn point_in_circle(p: Point, center: Point, radius: f32) -> bool {
    p.distance_squared(center) <= radius * radius
}

/// Closest point to `p` on the segment `a..b`
///
/// The projection parameter is clamped to [0, 1]; a zero-length segment
/// collapses to `a`.
pub fn closest_point_on_segment(p: Point, a: Point, b: Point) -> Point {
    let seg = b - a;
    let len_sq = seg.length_squared();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((p - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    a + seg * t
}

/// Whether `p` lies strictly closer than `threshold` to the segment `a..b`
pub fn point_near_segment(p: Point, a: Point, b: Point, threshold: f32) -> bool {
    distance(p, closest_point_on_segment(p, a, b)) < threshold
}

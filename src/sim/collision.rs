//! Point-in-circle collision against the body set
//!
//! The projectile is treated as a point; a body is hit when the point is
//! inside or on its bounding circle. The target is checked before the
//! obstacles, so the target wins when both overlap a point.

use glam::DVec2;

use super::body::{BodySet, HitBody};

/// First body whose bounding circle contains `point`, if any
pub fn hit(point: DVec2, bodies: &BodySet) -> Option<HitBody> {
    bodies
        .iter()
        .find(|(_, body)| body.contains(point))
        .map(|(hit, _)| hit)
}

/// Distance from `point` to the surface of the hit body (negative when inside)
pub fn penetration(point: DVec2, bodies: &BodySet, hit: HitBody) -> Option<f64> {
    bodies
        .get(hit)
        .map(|body| point.distance(body.position) - body.radius)
}

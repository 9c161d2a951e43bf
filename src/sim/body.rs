//! Static circular masses: the target body and the obstacle field
//!
//! Bodies never move. A level owns one `BodySet`, which is replaced
//! wholesale when the level is regenerated.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// A static circular mass (obstacle or target)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: DVec2,
    pub mass: f64,
    pub radius: f64,
}

impl Body {
    pub fn new(position: DVec2, mass: f64, radius: f64) -> Self {
        debug_assert!(mass > 0.0 && radius > 0.0, "body mass and radius must be positive");
        Self {
            position,
            mass,
            radius,
        }
    }

    /// Whether `point` lies inside or on the bounding circle
    #[inline]
    pub fn contains(&self, point: DVec2) -> bool {
        self.position.distance_squared(point) <= self.radius * self.radius
    }
}

/// Which body of a `BodySet` was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitBody {
    Target,
    /// Index into `BodySet::obstacles`
    Obstacle(usize),
}

/// The target plus the level's obstacles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySet {
    pub target: Body,
    pub obstacles: Vec<Body>,
}

impl BodySet {
    pub fn new(target: Body, obstacles: Vec<Body>) -> Self {
        Self { target, obstacles }
    }

    /// Target body from config with no obstacles
    pub fn empty(config: &SimConfig) -> Self {
        Self::new(
            Body::new(config.target_position, config.target_mass, config.target_radius),
            Vec::new(),
        )
    }

    /// Target first, then obstacles in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (HitBody, &Body)> {
        std::iter::once((HitBody::Target, &self.target)).chain(
            self.obstacles
                .iter()
                .enumerate()
                .map(|(i, b)| (HitBody::Obstacle(i), b)),
        )
    }

    pub fn get(&self, hit: HitBody) -> Option<&Body> {
        match hit {
            HitBody::Target => Some(&self.target),
            HitBody::Obstacle(i) => self.obstacles.get(i),
        }
    }

    pub fn len(&self) -> usize {
        1 + self.obstacles.len()
    }

    /// Never true: the target is always present
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_order_target_first() {
        let target = Body::new(DVec2::new(750.0, 300.0), 2500.0, 50.0);
        let a = Body::new(DVec2::new(300.0, 300.0), 3000.0, 15.0);
        let b = Body::new(DVec2::new(400.0, 200.0), 6000.0, 30.0);
        let set = BodySet::new(target, vec![a, b]);

        let order: Vec<HitBody> = set.iter().map(|(h, _)| h).collect();
        assert_eq!(
            order,
            vec![HitBody::Target, HitBody::Obstacle(0), HitBody::Obstacle(1)]
        );
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(HitBody::Obstacle(1)), Some(&b));
        assert_eq!(set.get(HitBody::Obstacle(2)), None);
    }

    #[test]
    fn test_contains_includes_edge() {
        let body = Body::new(DVec2::ZERO, 1.0, 10.0);
        assert!(body.contains(DVec2::new(10.0, 0.0)));
        assert!(!body.contains(DVec2::new(10.001, 0.0)));
    }
}

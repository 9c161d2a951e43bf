//! Gravitational acceleration on the projectile
//!
//! Bodies are static, so this is a plain sum of inverse-square pulls
//! toward each body center. No body-body interaction.

use glam::DVec2;

use super::body::BodySet;

/// Inverse-square gravity over a `BodySet`
#[derive(Debug, Clone, Copy)]
pub struct GravityField {
    /// Scaled gravitational constant
    pub g: f64,
    /// Squared-distance floor (keeps RK4 sub-step evaluations finite)
    pub min_distance_sq: f64,
}

impl GravityField {
    pub fn new(g: f64, min_distance_sq: f64) -> Self {
        Self { g, min_distance_sq }
    }

    /// Acceleration at `point` from every body (target first, then obstacles)
    pub fn acceleration(&self, point: DVec2, bodies: &BodySet) -> DVec2 {
        bodies
            .iter()
            .fold(DVec2::ZERO, |acc, (_, body)| acc + self.pull(point, body.position, body.mass))
    }

    #[inline]
    fn pull(&self, point: DVec2, center: DVec2, mass: f64) -> DVec2 {
        let d = center - point;
        let dist_sq = d.length_squared();
        // Direction is undefined at the exact center
        if dist_sq == 0.0 {
            return DVec2::ZERO;
        }
        let force = self.g * mass / dist_sq.max(self.min_distance_sq);
        d * (force / dist_sq.sqrt())
    }
}

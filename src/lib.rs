//! Gravity Slingshot - trajectory engine for a gravity puzzle game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gravity, collisions, integration, playback)
//! - `session`: Control/event coordination around the simulation
//! - `events`: Injected publish/subscribe bus for the UI collaborator
//! - `config`: Data-driven tuning loaded from JSON

pub mod config;
pub mod error;
pub mod events;
pub mod session;
pub mod sim;

pub use config::SimConfig;
pub use error::{ConfigError, ParamError};
pub use events::{ControlEvent, EventBus, GameEvent};
pub use session::Session;

/// Game configuration constants
pub mod consts {
    /// Scaled gravitational constant
    pub const G: f64 = 6.6743e-11 * 1e10;
    /// Fixed integration timestep
    pub const TIME_STEP: f64 = 0.2;
    /// Maximum integration steps per trajectory
    pub const MAX_STEPS: usize = 1000;
    /// Mass of the target body (fixed for the whole session)
    pub const EARTH_MASS: f64 = 2500.0;
    /// Target body radius in world units
    pub const EARTH_RADIUS: f64 = 50.0;

    /// World rectangle (0..=WIDTH, 0..=HEIGHT)
    pub const WORLD_WIDTH: f64 = 800.0;
    pub const WORLD_HEIGHT: f64 = 600.0;

    /// Projectile launch point
    pub const LAUNCH_X: f64 = 50.0;
    pub const LAUNCH_Y: f64 = 300.0;
    /// Target body center
    pub const EARTH_X: f64 = 750.0;
    pub const EARTH_Y: f64 = 300.0;

    /// Playback period between ticks (time units)
    pub const TICK_INTERVAL: u32 = 8;
    /// Max heading change per playback tick (radians)
    pub const ROTATION_STEP: f64 = std::f64::consts::PI / 360.0;

    /// Obstacle cap per level
    pub const MAX_OBSTACLES: u32 = 12;
    /// Obstacle mass per unit of size
    pub const MASS_PER_SIZE: f64 = 100.0;

    /// Floor for squared distance in the gravity sum
    pub const MIN_DISTANCE_SQ: f64 = 1e-6;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f64) -> f64 {
    use std::f64::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Rotate `current` toward `target` by at most `step` radians along the shortest arc.
///
/// Snaps to `target` once within one step (including across the ±π seam).
/// The result is normalized to [-π, π).
pub fn rotate_toward(current: f64, target: f64, step: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let current = normalize_angle(current);
    let target = normalize_angle(target);
    if current == target {
        return current;
    }

    let diff = (target - current).abs();
    if diff <= step || diff >= TAU - step {
        return target;
    }

    let mut target = target;
    if diff > PI {
        if target < current {
            target += TAU;
        } else {
            target -= TAU;
        }
    }

    if target > current {
        normalize_angle(current + step)
    } else {
        normalize_angle(current - step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-12);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_toward_clamps_step() {
        let next = rotate_toward(0.0, 1.0, 0.1);
        assert!((next - 0.1).abs() < 1e-12);

        let next = rotate_toward(0.0, -1.0, 0.1);
        assert!((next + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_toward_snaps_when_close() {
        assert_eq!(rotate_toward(0.95, 1.0, 0.1), 1.0);
    }

    #[test]
    fn test_rotate_toward_takes_short_way_round() {
        // From just below +π to just above -π: shortest path crosses the seam upward
        let next = rotate_toward(PI - 0.5, -PI + 0.5, 0.1);
        assert!(next > PI - 0.5);
    }

    #[test]
    fn test_rotate_toward_stays_normalized() {
        // Stepping upward across +π wraps to the negative side
        let next = rotate_toward(PI - 0.05, -PI + 0.5, 0.1);
        assert!((next - (-PI + 0.05)).abs() < 1e-12);

        // Unnormalized input still steps instead of snapping
        let step = PI / 360.0;
        let next = rotate_toward(3.0 * PI + 0.1, -PI + 0.2, step);
        assert!((next - (-PI + 0.1 + step)).abs() < 1e-9);
    }
}

//! Level state: body layout, level counter, and launch parameters
//!
//! Obstacles are regenerated wholesale per level from a seeded RNG. Launch
//! parameters only change through validated setters.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodySet};
use crate::config::SimConfig;
use crate::deg_to_rad;
use crate::error::ParamError;

/// Resample attempts per obstacle before giving up on it
const MAX_PLACEMENT_ATTEMPTS: u32 = 32;

/// Launch speed and direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchParams {
    pub velocity: f64,
    pub angle_degrees: f64,
}

impl LaunchParams {
    pub fn new(velocity: f64, angle_degrees: f64) -> Result<Self, ParamError> {
        Ok(Self {
            velocity: check_velocity(velocity)?,
            angle_degrees: check_angle(angle_degrees)?,
        })
    }

    /// Initial velocity vector
    pub fn initial_velocity(&self) -> DVec2 {
        let radians = self.angle_radians();
        DVec2::new(self.velocity * radians.cos(), self.velocity * radians.sin())
    }

    #[inline]
    pub fn angle_radians(&self) -> f64 {
        deg_to_rad(self.angle_degrees)
    }
}

fn check_velocity(velocity: f64) -> Result<f64, ParamError> {
    if !velocity.is_finite() {
        Err(ParamError::NonFiniteVelocity(velocity))
    } else if velocity < 0.0 {
        Err(ParamError::NegativeVelocity(velocity))
    } else {
        Ok(velocity)
    }
}

fn check_angle(angle: f64) -> Result<f64, ParamError> {
    if angle.is_finite() {
        Ok(angle)
    } else {
        Err(ParamError::NonFiniteAngle(angle))
    }
}

/// Generate the obstacle field for `level`: `min(max_obstacles, level)` bodies
///
/// Positions and sizes are sampled uniformly (integers, inclusive ranges).
/// Mass is `size * mass_per_size`; radius is half the size. Obstacles that
/// would contain the launch point are resampled.
pub fn generate_obstacles(level: u32, config: &SimConfig, rng: &mut Pcg32) -> Vec<Body> {
    let count = level.min(config.max_obstacles) as usize;
    let area = config.spawn_area;
    let mut obstacles = Vec::with_capacity(count);

    for i in 0..count {
        let placed = (0..MAX_PLACEMENT_ATTEMPTS).find_map(|_| {
            let x = rng.random_range(area.min.x as i64..=area.max.x as i64) as f64;
            let y = rng.random_range(area.min.y as i64..=area.max.y as i64) as f64;
            let size = rng.random_range(config.obstacle_size_min..=config.obstacle_size_max) as f64;
            let body = Body::new(DVec2::new(x, y), size * config.mass_per_size, size / 2.0);
            (!body.contains(config.launch_point)).then_some(body)
        });

        match placed {
            Some(body) => obstacles.push(body),
            None => log::warn!(
                "Level {}: obstacle {} overlaps the launch point after {} attempts, skipped",
                level,
                i,
                MAX_PLACEMENT_ATTEMPTS
            ),
        }
    }

    obstacles
}

/// Current level layout plus the player's launch parameters
#[derive(Debug, Clone)]
pub struct LevelState {
    pub level: u32,
    pub bodies: BodySet,
    pub params: LaunchParams,
    rng: Pcg32,
}

impl LevelState {
    /// Level 1 with a freshly generated layout
    pub fn new(config: &SimConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_os_rng(),
        };
        let mut state = Self {
            level: 1,
            bodies: BodySet::empty(config),
            params: LaunchParams {
                velocity: config.initial_velocity,
                angle_degrees: config.initial_angle,
            },
            rng,
        };
        state.regenerate(config);
        state
    }

    /// Replace the obstacle field for the current level
    pub fn regenerate(&mut self, config: &SimConfig) {
        let obstacles = generate_obstacles(self.level, config, &mut self.rng);
        log::info!("Level {}: generated {} obstacles", self.level, obstacles.len());
        self.bodies = BodySet {
            target: self.bodies.target,
            obstacles,
        };
    }

    pub fn advance(&mut self) {
        self.level += 1;
    }

    /// Back to level 1 with a new layout
    pub fn restart(&mut self, config: &SimConfig) {
        self.level = 1;
        self.regenerate(config);
    }

    /// Rejected values leave the previous velocity in place
    pub fn set_velocity(&mut self, velocity: f64) -> Result<(), ParamError> {
        self.params.velocity = check_velocity(velocity)?;
        Ok(())
    }

    /// Rejected values leave the previous angle in place
    pub fn set_angle(&mut self, angle_degrees: f64) -> Result<(), ParamError> {
        self.params.angle_degrees = check_angle(angle_degrees)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn seeded(seed: u64) -> SimConfig {
        SimConfig {
            seed: Some(seed),
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_level_one_has_at_most_one_obstacle() {
        let config = seeded(1);
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(generate_obstacles(1, &config, &mut rng).len() <= 1);
    }

    #[test]
    fn test_obstacle_count_caps_at_twelve() {
        let config = seeded(2);
        let mut rng = Pcg32::seed_from_u64(2);
        assert_eq!(generate_obstacles(12, &config, &mut rng).len(), 12);
        assert_eq!(generate_obstacles(40, &config, &mut rng).len(), 12);
    }

    #[test]
    fn test_obstacles_respect_ranges() {
        let config = seeded(3);
        let mut rng = Pcg32::seed_from_u64(3);
        for body in generate_obstacles(12, &config, &mut rng) {
            assert!(config.spawn_area.contains(body.position));
            assert!(body.radius >= 15.0 && body.radius <= 60.0);
            assert_eq!(body.mass, body.radius * 2.0 * config.mass_per_size);
            assert!(!body.contains(config.launch_point));
        }
    }

    #[test]
    fn test_launch_point_never_inside_obstacle() {
        // Spawn area centred on the launch point forces resampling
        let mut config = seeded(4);
        config.spawn_area.min = DVec2::new(40.0, 290.0);
        config.spawn_area.max = DVec2::new(400.0, 310.0);
        let mut rng = Pcg32::seed_from_u64(4);
        for body in generate_obstacles(12, &config, &mut rng) {
            assert!(!body.contains(config.launch_point));
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = LevelState::new(&seeded(99));
        let b = LevelState::new(&seeded(99));
        assert_eq!(a.bodies, b.bodies);
    }

    #[test]
    fn test_regenerate_replaces_obstacles_and_keeps_target() {
        let config = seeded(5);
        let mut state = LevelState::new(&config);
        state.level = 6;
        let target = state.bodies.target;
        state.regenerate(&config);
        assert_eq!(state.bodies.obstacles.len(), 6);
        assert_eq!(state.bodies.target, target);
    }

    #[test]
    fn test_restart_returns_to_level_one() {
        let config = seeded(6);
        let mut state = LevelState::new(&config);
        state.advance();
        state.advance();
        state.restart(&config);
        assert_eq!(state.level, 1);
        assert!(state.bodies.obstacles.len() <= 1);
    }

    #[test]
    fn test_invalid_params_keep_previous() {
        let mut state = LevelState::new(&seeded(7));
        state.set_velocity(8.0).unwrap();
        state.set_angle(-15.0).unwrap();

        assert_eq!(state.set_velocity(-1.0), Err(ParamError::NegativeVelocity(-1.0)));
        assert!(matches!(state.set_velocity(f64::NAN), Err(ParamError::NonFiniteVelocity(_))));
        assert!(matches!(state.set_angle(f64::INFINITY), Err(ParamError::NonFiniteAngle(_))));
        assert_eq!(state.params, LaunchParams::new(8.0, -15.0).unwrap());
    }

    #[test]
    fn test_initial_velocity_vector() {
        let v = LaunchParams::new(2.0, 90.0).unwrap().initial_velocity();
        assert!(v.x.abs() < 1e-12);
        assert!((v.y - 2.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_obstacle_count_is_min_of_level_and_cap(level in 1u32..50, seed in any::<u64>()) {
            let config = seeded(seed);
            let mut rng = Pcg32::seed_from_u64(seed);
            let obstacles = generate_obstacles(level, &config, &mut rng);
            prop_assert_eq!(obstacles.len() as u32, level.min(12));
        }
    }
}

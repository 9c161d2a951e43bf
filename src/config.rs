//! Simulation tuning
//!
//! Every physical and gameplay constant lives here so levels can be tuned
//! from a JSON document without recompiling. Missing fields fall back to
//! the defaults in [`crate::consts`].

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Axis-aligned rectangle (inclusive bounds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    pub const fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Whether `point` lies inside or on the edge of the rectangle
    #[inline]
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    fn is_ordered(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Physics ===
    /// Scaled gravitational constant
    pub g: f64,
    /// Fixed RK4 timestep
    pub time_step: f64,
    /// Step cap per trajectory
    pub max_steps: usize,
    /// Floor on squared distance in the gravity sum
    pub min_distance_sq: f64,

    // === World ===
    /// Trajectories end when they leave this rectangle
    pub world: Bounds,
    /// Projectile spawn point
    pub launch_point: DVec2,
    pub target_position: DVec2,
    pub target_mass: f64,
    pub target_radius: f64,

    // === Playback ===
    /// Time units between playback ticks
    pub tick_interval: u32,
    /// Max heading change per tick (radians)
    pub rotation_step: f64,

    // === Level generation ===
    pub max_obstacles: u32,
    /// Obstacle centers are sampled inside this rectangle
    pub spawn_area: Bounds,
    /// Obstacle diameter range (inclusive)
    pub obstacle_size_min: u32,
    pub obstacle_size_max: u32,
    pub mass_per_size: f64,
    /// RNG seed for level layout (entropy when absent)
    pub seed: Option<u64>,

    // === Controls ===
    pub initial_velocity: f64,
    pub initial_angle: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            g: G,
            time_step: TIME_STEP,
            max_steps: MAX_STEPS,
            min_distance_sq: MIN_DISTANCE_SQ,

            world: Bounds::new(DVec2::ZERO, DVec2::new(WORLD_WIDTH, WORLD_HEIGHT)),
            launch_point: DVec2::new(LAUNCH_X, LAUNCH_Y),
            target_position: DVec2::new(EARTH_X, EARTH_Y),
            target_mass: EARTH_MASS,
            target_radius: EARTH_RADIUS,

            tick_interval: TICK_INTERVAL,
            rotation_step: ROTATION_STEP,

            max_obstacles: MAX_OBSTACLES,
            spawn_area: Bounds::new(DVec2::new(200.0, 100.0), DVec2::new(600.0, 500.0)),
            obstacle_size_min: 30,
            obstacle_size_max: 120,
            mass_per_size: MASS_PER_SIZE,
            seed: None,

            initial_velocity: 5.0,
            initial_angle: 0.0,
        }
    }
}

impl SimConfig {
    /// Parse a JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check every constraint the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(msg: impl Into<String>) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg.into()))
        }

        if !(self.g.is_finite() && self.g > 0.0) {
            return invalid(format!("g must be positive, got {}", self.g));
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return invalid(format!("time_step must be positive, got {}", self.time_step));
        }
        if self.max_steps == 0 {
            return invalid("max_steps must be at least 1");
        }
        if !(self.min_distance_sq.is_finite() && self.min_distance_sq > 0.0) {
            return invalid("min_distance_sq must be positive");
        }
        if !(self.target_mass > 0.0 && self.target_radius > 0.0) {
            return invalid("target mass and radius must be positive");
        }
        if !self.world.is_ordered() || !self.spawn_area.is_ordered() {
            return invalid("bounds must have min <= max");
        }
        if self.tick_interval == 0 {
            return invalid("tick_interval must be at least 1");
        }
        if self.obstacle_size_min == 0 || self.obstacle_size_min > self.obstacle_size_max {
            return invalid(format!(
                "obstacle size range {}..={} is empty or non-positive",
                self.obstacle_size_min, self.obstacle_size_max
            ));
        }
        if !(self.mass_per_size > 0.0) {
            return invalid("mass_per_size must be positive");
        }
        if !self.world.contains(self.launch_point) {
            return invalid("launch point lies outside the world");
        }
        if self.launch_point.distance_squared(self.target_position)
            <= self.target_radius * self.target_radius
        {
            return invalid("launch point lies inside the target body");
        }
        if !(self.initial_velocity.is_finite() && self.initial_velocity >= 0.0)
            || !self.initial_angle.is_finite()
        {
            return invalid("initial launch parameters must be finite and non-negative velocity");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json(r#"{ "time_step": 0.1, "seed": 7 }"#).unwrap();
        assert_eq!(config.time_step, 0.1);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_steps, MAX_STEPS);
        assert_eq!(config.launch_point, DVec2::new(LAUNCH_X, LAUNCH_Y));
    }

    #[test]
    fn test_vectors_parse_as_arrays() {
        let config = SimConfig::from_json(r#"{ "launch_point": [60.0, 200.0] }"#).unwrap();
        assert_eq!(config.launch_point, DVec2::new(60.0, 200.0));
    }

    #[test]
    fn test_rejects_launch_inside_target() {
        let json = r#"{ "launch_point": [740.0, 300.0] }"#;
        assert!(matches!(SimConfig::from_json(json), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_launch_outside_world() {
        let json = r#"{ "launch_point": [-5.0, 300.0] }"#;
        assert!(matches!(SimConfig::from_json(json), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(SimConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_rejects_inverted_size_range() {
        let json = r#"{ "obstacle_size_min": 80, "obstacle_size_max": 40 }"#;
        assert!(matches!(SimConfig::from_json(json), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bounds_contains_edges() {
        let b = Bounds::new(DVec2::ZERO, DVec2::new(800.0, 600.0));
        assert!(b.contains(DVec2::new(0.0, 600.0)));
        assert!(!b.contains(DVec2::new(800.1, 10.0)));
    }
}

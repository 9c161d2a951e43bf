//! Deterministic simulation module
//!
//! All physics and playback logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (target first, then obstacles by insertion)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod gravity;
pub mod launch;
pub mod level;
pub mod scheduler;
pub mod trajectory;

pub use body::{Body, BodySet, HitBody};
pub use gravity::GravityField;
pub use launch::{LaunchOutcome, LaunchSimulator, Pose, Resolution, SimulationPhase, TickEvent};
pub use level::{LaunchParams, LevelState, generate_obstacles};
pub use scheduler::{FixedStepScheduler, Scheduler, TimerHandle};
pub use trajectory::{Termination, Trajectory, TrajectoryIntegrator};

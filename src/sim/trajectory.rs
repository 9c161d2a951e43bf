//! Fixed-step RK4 trajectory prediction
//!
//! The same integration backs both the live preview line and the launch
//! playback: playback replays the precomputed samples and never
//! re-integrates. Output depends only on the inputs, so identical inputs
//! give bit-identical sample sequences.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::body::{BodySet, HitBody};
use super::collision;
use super::gravity::GravityField;
use super::level::LaunchParams;
use crate::config::{Bounds, SimConfig};

/// Why integration stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Last sample lies inside this body
    Collision(HitBody),
    /// Next position left the world; last sample is the final in-bounds one
    OutOfBounds,
    /// Ran the full step budget
    StepCap,
}

/// An integrated path. `samples[0]` is the launch point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub samples: Vec<DVec2>,
    pub termination: Termination,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<DVec2> {
        self.samples.last().copied()
    }

    /// Every `stride`-th sample, for drawing a lighter preview line
    pub fn preview_points(&self, stride: usize) -> impl Iterator<Item = DVec2> + '_ {
        self.samples.iter().step_by(stride.max(1)).copied()
    }
}

/// Projectile state during integration
#[derive(Debug, Clone, Copy)]
struct State {
    pos: DVec2,
    vel: DVec2,
}

/// Fixed-step RK4 integrator with collision and bounds termination
#[derive(Debug, Clone, Copy)]
pub struct TrajectoryIntegrator {
    pub field: GravityField,
    pub time_step: f64,
    pub world: Bounds,
    pub max_steps: usize,
}

impl TrajectoryIntegrator {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            field: GravityField::new(config.g, config.min_distance_sq),
            time_step: config.time_step,
            world: config.world,
            max_steps: config.max_steps,
        }
    }

    /// Integrate from `start` with the given launch parameters
    pub fn integrate(&self, start: DVec2, params: LaunchParams, bodies: &BodySet) -> Trajectory {
        let mut state = State {
            pos: start,
            vel: params.initial_velocity(),
        };
        let mut samples = Vec::with_capacity(self.max_steps.min(256));

        for _ in 0..self.max_steps {
            if !self.world.contains(state.pos) {
                return self.finish(samples, Termination::OutOfBounds);
            }

            if let Some(hit) = collision::hit(state.pos, bodies) {
                samples.push(state.pos);
                return self.finish(samples, Termination::Collision(hit));
            }

            samples.push(state.pos);
            state = self.step(state, bodies);
        }

        self.finish(samples, Termination::StepCap)
    }

    /// One RK4 velocity update followed by a position advance with the new velocity
    fn step(&self, s: State, bodies: &BodySet) -> State {
        let dt = self.time_step;
        let accel = |p: DVec2| self.field.acceleration(p, bodies);

        // Sub-step positions are not collision-checked; the field's distance floor covers them
        let k1 = accel(s.pos);
        let k2 = accel(s.pos + s.vel * dt / 2.0);
        let k3 = accel(s.pos + (s.vel + k1 * dt / 2.0) * dt / 2.0);
        let k4 = accel(s.pos + (s.vel + k2 * dt) * dt);

        let vel = s.vel + (k1 + 2.0 * k2 + 2.0 * k3 + k4) * dt / 6.0;
        State {
            pos: s.pos + vel * dt,
            vel,
        }
    }

    fn finish(&self, samples: Vec<DVec2>, termination: Termination) -> Trajectory {
        log::debug!(
            "Trajectory: {} samples, ended by {:?}",
            samples.len(),
            termination
        );
        Trajectory {
            samples,
            termination,
        }
    }
}

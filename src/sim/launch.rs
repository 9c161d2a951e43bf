//! Launch playback state machine
//!
//! A launch precomputes the whole trajectory once, then replays it one
//! sample per scheduler tick. The terminal sample is classified against
//! the body set to decide the outcome.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::body::{BodySet, HitBody};
use super::collision;
use super::level::LaunchParams;
use super::scheduler::{Scheduler, TimerHandle};
use super::trajectory::{Trajectory, TrajectoryIntegrator};
use crate::config::SimConfig;
use crate::{normalize_angle, rotate_toward};

/// Stage of a single launch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimulationPhase {
    /// Nothing computed yet for the current setup
    Idle,
    /// Preview path is current; waiting for launch
    Previewing,
    /// Replaying the precomputed trajectory
    Playing,
    /// Outcome resolved; waiting for retry/reset
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaunchOutcome {
    Success,
    Failure,
}

/// Projectile position and facing for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: DVec2,
    /// Radians
    pub heading: f64,
}

/// How a launch ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub outcome: LaunchOutcome,
    /// Body under the terminal sample, if any
    pub hit: Option<HitBody>,
    pub position: DVec2,
}

impl Resolution {
    /// Ended inside an obstacle (drives the explosion effect)
    pub fn exploded(&self) -> bool {
        matches!(self.hit, Some(HitBody::Obstacle(_)))
    }
}

/// Result of feeding one tick to the simulator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickEvent {
    /// Tick for a timer that is no longer ours
    Ignored,
    /// Projectile moved to the next sample
    Moved(Pose),
    /// Projectile moved onto the terminal sample, which hit a body
    Landed(Pose, Resolution),
    /// Samples ran out without a hit
    Exhausted(Resolution),
}

/// Owns playback state for one projectile
#[derive(Debug, Clone)]
pub struct LaunchSimulator {
    phase: SimulationPhase,
    trajectory: Option<Trajectory>,
    cursor: usize,
    pose: Pose,
    timer: Option<TimerHandle>,
    tick_interval: u32,
    rotation_step: f64,
    /// Launch angle in radians; the heading whenever not playing
    aim_heading: f64,
}

impl LaunchSimulator {
    pub fn new(config: &SimConfig, params: LaunchParams) -> Self {
        Self {
            phase: SimulationPhase::Idle,
            trajectory: None,
            cursor: 0,
            pose: Pose {
                position: config.launch_point,
                heading: normalize_angle(params.angle_radians()),
            },
            timer: None,
            tick_interval: config.tick_interval,
            rotation_step: config.rotation_step,
            aim_heading: normalize_angle(params.angle_radians()),
        }
    }

    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Path being replayed (present from launch until reset)
    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SimulationPhase::Playing
    }

    /// Record that a fresh preview was computed; no effect while playing or complete
    pub fn mark_previewing(&mut self) {
        if self.phase == SimulationPhase::Idle {
            self.phase = SimulationPhase::Previewing;
        }
    }

    /// Outside playback the projectile points along the aim
    pub fn aim(&mut self, params: LaunchParams) {
        if self.phase != SimulationPhase::Playing {
            self.aim_heading = normalize_angle(params.angle_radians());
            self.pose.heading = self.aim_heading;
        }
    }

    /// Precompute the path and start playback
    ///
    /// Returns `false` without touching any state when already playing or complete.
    pub fn launch(
        &mut self,
        integrator: &TrajectoryIntegrator,
        params: LaunchParams,
        bodies: &BodySet,
        scheduler: &mut impl Scheduler,
    ) -> bool {
        if matches!(self.phase, SimulationPhase::Playing | SimulationPhase::Complete) {
            log::debug!("Launch ignored in phase {:?}", self.phase);
            return false;
        }

        let trajectory = integrator.integrate(self.pose.position, params, bodies);
        log::info!(
            "Launch v={} angle={}: {} samples, {:?}",
            params.velocity,
            params.angle_degrees,
            trajectory.len(),
            trajectory.termination
        );

        self.trajectory = Some(trajectory);
        self.cursor = 0;
        self.aim_heading = normalize_angle(params.angle_radians());
        self.pose.heading = self.aim_heading;
        self.phase = SimulationPhase::Playing;
        self.timer = Some(scheduler.schedule(self.tick_interval));
        true
    }

    /// Apply one playback tick
    pub fn tick(
        &mut self,
        handle: TimerHandle,
        bodies: &BodySet,
        scheduler: &mut impl Scheduler,
    ) -> TickEvent {
        if self.timer != Some(handle) || self.phase != SimulationPhase::Playing {
            return TickEvent::Ignored;
        }

        let Some(samples) = self.trajectory.as_ref().map(|t| &t.samples) else {
            return TickEvent::Ignored;
        };

        if self.cursor >= samples.len() {
            let position = self.pose.position;
            let resolution = self.finalize(LaunchOutcome::Failure, None, position, scheduler);
            return TickEvent::Exhausted(resolution);
        }

        let position = samples[self.cursor];
        if self.cursor > 0 {
            let delta = position - samples[self.cursor - 1];
            let target = delta.y.atan2(delta.x);
            self.pose.heading = rotate_toward(self.pose.heading, target, self.rotation_step);
        }
        self.pose.position = position;
        self.cursor += 1;
        let is_terminal = self.cursor == samples.len();
        let pose = self.pose;

        if is_terminal {
            if let Some(hit) = collision::hit(position, bodies) {
                let outcome = match hit {
                    HitBody::Target => LaunchOutcome::Success,
                    HitBody::Obstacle(_) => LaunchOutcome::Failure,
                };
                let resolution = self.finalize(outcome, Some(hit), position, scheduler);
                return TickEvent::Landed(pose, resolution);
            }
        }

        TickEvent::Moved(pose)
    }

    /// Stop playback and fix the outcome
    pub fn finalize(
        &mut self,
        outcome: LaunchOutcome,
        hit: Option<HitBody>,
        position: DVec2,
        scheduler: &mut impl Scheduler,
    ) -> Resolution {
        if let Some(handle) = self.timer.take() {
            scheduler.cancel(handle);
        }
        self.phase = SimulationPhase::Complete;
        self.pose.heading = self.aim_heading;
        log::info!("Launch resolved: {:?} (hit {:?})", outcome, hit);
        Resolution {
            outcome,
            hit,
            position,
        }
    }

    /// Cancel any playback and put the projectile back on the launch point
    pub fn reset(
        &mut self,
        launch_point: DVec2,
        params: LaunchParams,
        scheduler: &mut impl Scheduler,
    ) {
        if let Some(handle) = self.timer.take() {
            scheduler.cancel(handle);
        }
        self.phase = SimulationPhase::Idle;
        self.trajectory = None;
        self.cursor = 0;
        self.aim_heading = normalize_angle(params.angle_radians());
        self.pose = Pose {
            position: launch_point,
            heading: self.aim_heading,
        };
    }
}

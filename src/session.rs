//! Game session: routes control input and playback ticks, publishes events
//!
//! Single writer for level state and playback state. Control input may only
//! change launch parameters or the body layout while no launch is playing.

use std::rc::Rc;

use crate::config::SimConfig;
use crate::error::ParamError;
use crate::events::{ControlEvent, EventBus, GameEvent};
use crate::sim::{
    Body, BodySet, LaunchOutcome, LaunchParams, LaunchSimulator, LevelState, Pose, Resolution,
    Scheduler, SimulationPhase, TickEvent, Trajectory, TrajectoryIntegrator,
};

pub struct Session<S: Scheduler> {
    config: SimConfig,
    integrator: TrajectoryIntegrator,
    level: LevelState,
    launch: LaunchSimulator,
    scheduler: S,
    events: Rc<EventBus>,
    preview: Option<Trajectory>,
}

impl<S: Scheduler> Session<S> {
    /// Generate level 1, compute the first preview, and announce the initial state
    pub fn new(config: SimConfig, scheduler: S, events: Rc<EventBus>) -> Self {
        let level = LevelState::new(&config);
        let launch = LaunchSimulator::new(&config, level.params);
        let mut session = Self {
            integrator: TrajectoryIntegrator::from_config(&config),
            config,
            level,
            launch,
            scheduler,
            events,
            preview: None,
        };
        session.refresh_preview();
        session.emit_state();
        session
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn level(&self) -> u32 {
        self.level.level
    }

    pub fn phase(&self) -> SimulationPhase {
        self.launch.phase()
    }

    pub fn params(&self) -> LaunchParams {
        self.level.params
    }

    /// Current layout, read-only
    pub fn bodies(&self) -> &BodySet {
        &self.level.bodies
    }

    pub fn target(&self) -> &Body {
        &self.level.bodies.target
    }

    pub fn pose(&self) -> Pose {
        self.launch.pose()
    }

    /// Latest preview path (kept while playing, replaced on the next preview)
    pub fn preview(&self) -> Option<&Trajectory> {
        self.preview.as_ref()
    }

    pub fn launch_state(&self) -> &LaunchSimulator {
        &self.launch
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Apply one inbound control event
    pub fn handle(&mut self, event: ControlEvent) {
        log::debug!("Control: {:?}", event);
        match event {
            ControlEvent::Launch => self.launch(),
            ControlEvent::SetVelocity(v) => {
                let result = self.guard_params().and_then(|_| self.level.set_velocity(v));
                self.after_param_change(result);
            }
            ControlEvent::SetAngle(a) => {
                let result = self.guard_params().and_then(|_| self.level.set_angle(a));
                self.after_param_change(result);
            }
            ControlEvent::Retry => self.reset_projectile(),
            ControlEvent::ResetLevel => {
                self.reset_projectile_quiet();
                self.level.regenerate(&self.config);
                self.refresh_preview();
                self.emit_state();
            }
            ControlEvent::Restart => {
                self.reset_projectile_quiet();
                self.level.restart(&self.config);
                self.refresh_preview();
                self.emit_state();
            }
        }
    }

    /// Let `elapsed` time units pass and apply any due playback ticks
    pub fn advance(&mut self, elapsed: u32) {
        for handle in self.scheduler.due(elapsed) {
            match self.launch.tick(handle, &self.level.bodies, &mut self.scheduler) {
                TickEvent::Ignored => {}
                TickEvent::Moved(pose) => self.emit_pose(pose),
                TickEvent::Landed(pose, resolution) => {
                    self.emit_pose(pose);
                    self.resolve(resolution);
                }
                TickEvent::Exhausted(resolution) => self.resolve(resolution),
            }
        }
    }

    fn launch(&mut self) {
        if self.launch.is_playing() {
            log::debug!("Launch requested while playing, ignored");
            return;
        }
        let started = self.launch.launch(
            &self.integrator,
            self.level.params,
            &self.level.bodies,
            &mut self.scheduler,
        );
        if started {
            self.emit_state();
        }
    }

    fn guard_params(&self) -> Result<(), ParamError> {
        if self.launch.is_playing() {
            Err(ParamError::Locked)
        } else {
            Ok(())
        }
    }

    fn after_param_change(&mut self, result: Result<(), ParamError>) {
        match result {
            Ok(()) => {
                self.launch.aim(self.level.params);
                self.refresh_preview();
                self.emit_state();
            }
            Err(err) => {
                log::warn!("Rejected control input: {}", err);
                self.events.publish(GameEvent::Diagnostic {
                    message: err.to_string(),
                });
            }
        }
    }

    fn reset_projectile_quiet(&mut self) {
        self.launch
            .reset(self.config.launch_point, self.level.params, &mut self.scheduler);
    }

    fn reset_projectile(&mut self) {
        self.reset_projectile_quiet();
        self.refresh_preview();
        self.emit_state();
    }

    /// Re-integrate the preview from the launch point; skipped while playing
    fn refresh_preview(&mut self) {
        if self.launch.is_playing() {
            return;
        }
        let trajectory = self.integrator.integrate(
            self.config.launch_point,
            self.level.params,
            &self.level.bodies,
        );
        self.events.publish(GameEvent::PreviewPath {
            points: trajectory.samples.clone(),
        });
        self.preview = Some(trajectory);
        self.launch.mark_previewing();
    }

    fn resolve(&mut self, resolution: Resolution) {
        if resolution.exploded() {
            self.events.publish(GameEvent::Exploded {
                position: resolution.position,
            });
        }

        self.events.publish(GameEvent::LaunchResolved {
            outcome: resolution.outcome,
            next_level: self.level.level + 1,
        });

        if resolution.outcome == LaunchOutcome::Success {
            self.level.advance();
            log::info!("Level cleared, now on level {}", self.level.level);
        }
        self.emit_state();
    }

    fn emit_pose(&self, pose: Pose) {
        self.events.publish(GameEvent::ProjectilePose {
            position: pose.position,
            heading: pose.heading,
        });
    }

    fn emit_state(&self) {
        self.events.publish(GameEvent::StateChanged {
            level: self.level.level,
            phase: self.launch.phase(),
            velocity: self.level.params.velocity,
            angle: self.level.params.angle_degrees,
        });
    }
}

//! Publish/subscribe bus between the engine and the UI collaborator
//!
//! The bus is constructed by the composing application and handed to the
//! session explicitly; there is no global instance.

use std::cell::RefCell;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::sim::{LaunchOutcome, SimulationPhase};

/// Inbound control actions from the UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "kebab-case")]
pub enum ControlEvent {
    Launch,
    SetVelocity(f64),
    /// Degrees
    SetAngle(f64),
    /// Same level, same bodies, projectile back on the launch point
    Retry,
    /// New layout for the current level
    ResetLevel,
    /// Back to level 1
    Restart,
}

/// Outbound notifications for the UI / renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum GameEvent {
    StateChanged {
        level: u32,
        phase: SimulationPhase,
        velocity: f64,
        angle: f64,
    },
    LaunchResolved {
        outcome: LaunchOutcome,
        next_level: u32,
    },
    PreviewPath {
        points: Vec<DVec2>,
    },
    ProjectilePose {
        position: DVec2,
        heading: f64,
    },
    /// Projectile hit an obstacle (explosion effect)
    Exploded {
        position: DVec2,
    },
    /// Control input was rejected
    Diagnostic {
        message: String,
    },
}

type Subscriber = Box<dyn FnMut(&GameEvent)>;

/// Single-threaded event fan-out
#[derive(Default)]
pub struct EventBus {
    subscribers: RefCell<Vec<Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, f: impl FnMut(&GameEvent) + 'static) {
        self.subscribers.borrow_mut().push(Box::new(f));
    }

    /// Deliver to every subscriber in subscription order
    ///
    /// Subscribers must not publish from inside their callback.
    pub fn publish(&self, event: GameEvent) {
        for subscriber in self.subscribers.borrow_mut().iter_mut() {
            subscriber(&event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    pub fn clear(&self) {
        self.subscribers.borrow_mut().clear();
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_fan_out_in_order() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        bus.subscribe(move |_| first.borrow_mut().push(1));
        let second = Rc::clone(&log);
        bus.subscribe(move |_| second.borrow_mut().push(2));

        bus.publish(GameEvent::Diagnostic {
            message: "x".into(),
        });
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_clear_drops_subscribers() {
        let bus = EventBus::new();
        bus.subscribe(|_| {});
        bus.clear();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_outbound_json_shape() {
        let json = serde_json::to_value(GameEvent::LaunchResolved {
            outcome: LaunchOutcome::Success,
            next_level: 3,
        })
        .unwrap();
        assert_eq!(json["event"], "launch-resolved");
        assert_eq!(json["outcome"], "success");
        assert_eq!(json["next_level"], 3);

        let json = serde_json::to_value(GameEvent::StateChanged {
            level: 1,
            phase: SimulationPhase::Playing,
            velocity: 5.0,
            angle: 0.0,
        })
        .unwrap();
        assert_eq!(json["phase"], "playing");
    }

    #[test]
    fn test_inbound_json_parse() {
        let e: ControlEvent =
            serde_json::from_str(r#"{"event":"set-velocity","value":7.5}"#).unwrap();
        assert_eq!(e, ControlEvent::SetVelocity(7.5));
        let e: ControlEvent = serde_json::from_str(r#"{"event":"restart"}"#).unwrap();
        assert_eq!(e, ControlEvent::Restart);
    }
}

//! Gravity Slingshot headless runner
//!
//! Plays one launch on level 1 and prints every outbound event as a JSON line.
//!
//! Usage: `gravity-slingshot [config.json|-] [velocity] [angle]`

use std::rc::Rc;

use gravity_slingshot::sim::{FixedStepScheduler, SimulationPhase};
use gravity_slingshot::{ControlEvent, EventBus, Session, SimConfig};

/// Upper bound on playback ticks before giving up
const MAX_TICKS: u32 = 100_000;

fn parse_arg(args: &[String], index: usize, name: &str) -> Option<f64> {
    let raw = args.get(index)?;
    match raw.parse::<f64>() {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring {} {:?}: {}", name, raw, e);
            None
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Gravity Slingshot (headless) starting...");

    let args: Vec<String> = std::env::args().collect();

    let config = match args.get(1).map(String::as_str) {
        Some(path) if path != "-" => match SimConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        _ => SimConfig::default(),
    };

    let bus = Rc::new(EventBus::new());
    bus.subscribe(|event| match serde_json::to_string(event) {
        Ok(line) => println!("{}", line),
        Err(e) => log::error!("Failed to encode event: {}", e),
    });

    let tick = config.tick_interval;
    let mut session = Session::new(config, FixedStepScheduler::new(), Rc::clone(&bus));

    if let Some(velocity) = parse_arg(&args, 2, "velocity") {
        session.handle(ControlEvent::SetVelocity(velocity));
    }
    if let Some(angle) = parse_arg(&args, 3, "angle") {
        session.handle(ControlEvent::SetAngle(angle));
    }

    session.handle(ControlEvent::Launch);

    let mut ticks = 0;
    while session.phase() == SimulationPhase::Playing && ticks < MAX_TICKS {
        session.advance(tick);
        ticks += 1;
    }

    log::info!("Finished after {} ticks on level {}", ticks, session.level());
}

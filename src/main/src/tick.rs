use anyhow::Result;
use log::*;
use std::fmt;

use crate::config::Config;
use crate::delta::{DeltaEvent, DeltaOutcome};
use crate::measurement::Inputs;
use crate::status;
use crate::store::StateStore;

// What caused a recomputation, only used for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Schedule,
    Manual,
    OutdoorChange,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Trigger::Schedule => "schedule",
            Trigger::Manual => "manual-service",
            Trigger::OutdoorChange => "AT-change",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TickEvent {
    pub trigger: Trigger,
}

impl TickEvent {
    pub fn new(trigger: Trigger) -> Self {
        TickEvent { trigger }
    }
}

// Runs ticks against the configuration it was built with
#[derive(Debug, Clone)]
pub struct TickHandler {
    config: Config,
}

impl TickHandler {
    pub fn new(config: Config) -> Self {
        TickHandler { config }
    }

    pub fn handle(&self, event: TickEvent, store: &mut impl StateStore) -> Result<DeltaOutcome> {
        let config = &self.config;
        if config.debug {
            debug!("Delta computation started via {}", event.trigger);
        }

        let inputs = Inputs::read(&*store, config)?;
        let event = DeltaEvent::compute(event.trigger, &inputs);
        status::report_evaluation(&event, store, config);

        let outcome = event.apply(store, config.entities.delta)?;
        status::report_outcome(outcome, config.entities.delta, config);

        if config.debug {
            debug!("Delta computation finished");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use control::Delta;

    const CURVE: &str = r#"{"v":1,"points":[{"t":0,"off":-2},{"t":1,"off":4}]}"#;

    fn store(config: &Config) -> MemoryStore {
        MemoryStore::default()
            .with_state(config.entities.outdoor_temperature, "2.0")
            .with_state(config.entities.curve, CURVE)
    }

    #[test]
    fn test_first_tick_publishes_then_suppresses() {
        let config = Config::default();
        let handler = TickHandler::new(config.clone());
        let mut store = store(&config);

        let outcome = handler.handle(TickEvent::new(Trigger::Schedule), &mut store).unwrap();
        assert_eq!(outcome, DeltaOutcome::Updated(Delta::new(1.0)));
        assert_eq!(store.writes, vec![(config.entities.delta.to_string(), 1.0)]);

        let outcome = handler.handle(TickEvent::new(Trigger::Manual), &mut store).unwrap();
        assert_eq!(outcome, DeltaOutcome::Unchanged(Delta::new(1.0)));
        assert_eq!(store.writes.len(), 1);
    }

    #[test]
    fn test_outdoor_change_publishes_new_delta() {
        let config = Config::default();
        let handler = TickHandler::new(config.clone());
        let mut store = store(&config).with_state(config.entities.delta, "1.0");

        // t = 26 / 32, off = -2 + 0.8125 * 6 = 2.875
        store
            .states
            .insert(config.entities.outdoor_temperature.to_string(), "12".to_string());
        let outcome = handler.handle(TickEvent::new(Trigger::OutdoorChange), &mut store).unwrap();
        assert_eq!(outcome, DeltaOutcome::Updated(Delta::new(3.0)));
        assert_eq!(store.writes, vec![(config.entities.delta.to_string(), 3.0)]);
    }

    #[test]
    fn test_unavailable_delta_is_rewritten() {
        let config = Config::default();
        let handler = TickHandler::new(config.clone());
        let mut store = store(&config).with_state(config.entities.delta, "unavailable");

        let outcome = handler.handle(TickEvent::new(Trigger::Schedule), &mut store).unwrap();
        assert_eq!(outcome, DeltaOutcome::Updated(Delta::new(1.0)));
    }

    #[test]
    fn test_missing_curve_publishes_zero() {
        let config = Config::default();
        let handler = TickHandler::new(config.clone());
        let mut store = MemoryStore::default().with_state(config.entities.outdoor_temperature, "-7");

        let outcome = handler.handle(TickEvent::new(Trigger::Schedule), &mut store).unwrap();
        assert_eq!(outcome, DeltaOutcome::Updated(Delta::new(0.0)));
        assert_eq!(store.writes, vec![(config.entities.delta.to_string(), 0.0)]);
    }

    #[test]
    fn test_debug_notification() {
        let config = Config::default();
        let handler = TickHandler::new(config.clone());
        let mut store = store(&config);
        handler.handle(TickEvent::new(Trigger::Schedule), &mut store).unwrap();
        assert_eq!(store.notifications.len(), 1);
        assert_eq!(store.notifications[0].0, status::NOTIFICATION_TITLE);

        let config = Config {
            debug: false,
            ..Config::default()
        };
        let handler = TickHandler::new(config.clone());
        let mut store = self::store(&config);
        handler.handle(TickEvent::new(Trigger::Schedule), &mut store).unwrap();
        assert!(store.notifications.is_empty());
        assert_eq!(store.writes.len(), 1);
    }
}

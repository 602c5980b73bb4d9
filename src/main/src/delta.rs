use anyhow::Result;

use control::{reconcile, Delta, Reading, Reconciliation};

use crate::measurement::Inputs;
use crate::store::StateStore;
use crate::tick::Trigger;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeltaOutcome {
    Updated(Delta),
    Unchanged(Delta),
}

// Result of one tick's computation, before anything is written
#[derive(Debug, Clone)]
pub struct DeltaEvent {
    pub trigger: Trigger,
    pub reading: Reading,
    pub current: Option<f64>,
    pub reconciliation: Reconciliation,
}

impl DeltaEvent {
    pub fn compute(trigger: Trigger, inputs: &Inputs) -> DeltaEvent {
        let reconciliation = reconcile(
            &inputs.reading,
            Some(inputs.curve.as_str()),
            inputs.current_delta,
        );
        DeltaEvent {
            trigger,
            reading: inputs.reading,
            current: inputs.current_delta,
            reconciliation,
        }
    }

    pub fn delta(&self) -> Delta {
        self.reconciliation.new_setpoint
    }

    // Publish the delta, unless the store already holds it
    pub fn apply(&self, store: &mut impl StateStore, entity_id: &str) -> Result<DeltaOutcome> {
        let delta = self.delta();
        if !self.reconciliation.changed {
            return Ok(DeltaOutcome::Unchanged(delta));
        }
        store.set_value(entity_id, f64::from(delta))?;
        Ok(DeltaOutcome::Updated(delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn inputs(at: f64, current_delta: Option<f64>) -> Inputs {
        Inputs {
            reading: Reading::new(at, -14.0, 18.0),
            curve: r#"{"points":[{"t":0,"off":-2},{"t":1,"off":4}]}"#.to_string(),
            current_delta,
        }
    }

    #[test]
    fn test_apply_writes_changed_delta() {
        let mut store = MemoryStore::default();
        let event = DeltaEvent::compute(Trigger::Schedule, &inputs(2.0, Some(0.5)));

        let outcome = event.apply(&mut store, "input_number.delta").unwrap();
        assert_eq!(outcome, DeltaOutcome::Updated(Delta::new(1.0)));
        assert_eq!(store.writes, vec![("input_number.delta".to_string(), 1.0)]);
    }

    #[test]
    fn test_apply_skips_unchanged_delta() {
        let mut store = MemoryStore::default();
        let event = DeltaEvent::compute(Trigger::Manual, &inputs(2.0, Some(1.0)));

        let outcome = event.apply(&mut store, "input_number.delta").unwrap();
        assert_eq!(outcome, DeltaOutcome::Unchanged(Delta::new(1.0)));
        assert!(store.writes.is_empty());
    }
}

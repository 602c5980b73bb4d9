use log::*;

use crate::config::Config;
use crate::delta::{DeltaEvent, DeltaOutcome};
use crate::store::StateStore;

pub const NOTIFICATION_TITLE: &str = "Heating curve Δ debug";

pub fn tick_line(event: &DeltaEvent) -> String {
    let reading = event.reading;
    let diagnostics = &event.reconciliation.diagnostics;
    let evaluation = diagnostics.evaluation;
    format!(
        "tick via {} | AT={:?}°C, xMin={:?}, xMax={:?}, t={:.4}, i={}, u={:.3}, off={:.2} -> Δ0.5={}",
        event.trigger,
        reading.at,
        reading.x_min,
        reading.x_max,
        diagnostics.t,
        evaluation.segment_low,
        evaluation.u,
        evaluation.off,
        event.delta(),
    )
}

pub fn notification_message(event: &DeltaEvent) -> String {
    let reading = event.reading;
    let diagnostics = &event.reconciliation.diagnostics;
    let evaluation = diagnostics.evaluation;
    format!(
        "Trigger: {}\nAT={:?}°C, xMin={:?}, xMax={:?}\nt={:.4}, i={}..{}, u={:.3}\noff={:.2} → Δ(0.5)={}\nPoints={}",
        event.trigger,
        reading.at,
        reading.x_min,
        reading.x_max,
        diagnostics.t,
        evaluation.segment_low,
        evaluation.segment_high,
        evaluation.u,
        evaluation.off,
        event.delta(),
        diagnostics.normalized.points.to_json(),
    )
}

pub fn report_evaluation(event: &DeltaEvent, store: &mut impl StateStore, config: &Config) {
    let normalized = &event.reconciliation.diagnostics.normalized;
    if let Some(reason) = normalized.fallback {
        warn!("Using flat fallback curve: {}", reason);
    }
    if normalized.dropped > 0 {
        warn!("Skipped {} curve points without numeric t/off", normalized.dropped);
    }

    if !config.debug {
        return;
    }
    info!("{}", tick_line(event));
    debug!("published delta before tick: {:?}", event.current);
    debug!("points={}", normalized.points.to_json());

    if config.debug_to_notification {
        if let Err(error) = store.notify(NOTIFICATION_TITLE, &notification_message(event)) {
            warn!("Failed to create debug notification: {:#}", error);
        }
    }
}

pub fn report_outcome(outcome: DeltaOutcome, entity_id: &str, config: &Config) {
    if !config.debug {
        return;
    }
    match outcome {
        DeltaOutcome::Updated(delta) => info!("{} <= {}", entity_id, delta),
        DeltaOutcome::Unchanged(delta) => debug!("{} unchanged (stays {})", entity_id, delta),
    }
}

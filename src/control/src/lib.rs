#![no_std]

extern crate alloc;

mod curve;
mod point;
mod quantize;
mod state;

pub use curve::{evaluate, EvaluationResult, SEGMENT_EPSILON};
pub use point::{normalize, ControlPoint, FallbackReason, Normalized, PointSet};
pub use quantize::{quantize, QUANTIZATION_STEP};
pub use state::{clamp01, Delta, Reading};

use num_traits::Float;

// Published and computed deltas closer than this are considered equal
pub const CHANGE_EPSILON: f64 = 1e-9;

// Intermediate values of a reconciliation, for logging by the caller
#[derive(Debug, PartialEq, Clone)]
pub struct Diagnostics {
    pub t: f64,
    pub evaluation: EvaluationResult,
    pub normalized: Normalized,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Reconciliation {
    pub new_setpoint: Delta,
    pub changed: bool,
    pub diagnostics: Diagnostics,
}

pub fn needs_update(current: Option<f64>, computed: Delta) -> bool {
    match current {
        None => true,
        Some(current) => Float::abs(current - f64::from(computed)) > CHANGE_EPSILON,
    }
}

/// Compute the delta for `reading` on the stored curve and decide whether it must be published.
///
/// `current` is the delta published previously, `None` if there is none yet.
pub fn reconcile(reading: &Reading, raw_points: Option<&str>, current: Option<f64>) -> Reconciliation {
    let t = reading.normalized();
    let normalized = normalize(raw_points);
    let evaluation = evaluate(normalized.points.points(), t);
    let new_setpoint = Delta::new(evaluation.off);

    Reconciliation {
        new_setpoint,
        changed: needs_update(current, new_setpoint),
        diagnostics: Diagnostics {
            t,
            evaluation,
            normalized,
        },
    }
}

use num_traits::Float;

use crate::point::ControlPoint;

// Stand-in width for segments whose endpoints share the same `t`
pub const SEGMENT_EPSILON: f64 = 1e-6;

#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct EvaluationResult {
    // Interpolated offset before quantization
    pub off: f64,
    pub segment_low: usize,
    pub segment_high: usize,
    // Position within the segment, not clamped
    pub u: f64,
}

/// Interpolate the offset at normalized position `t`.
///
/// The segment starts at the rightmost point (excluding the last one) whose `t`
/// does not exceed the query, or at the first point if there is none. `u` is
/// not clamped, so queries outside the chosen segment extrapolate along it.
pub fn evaluate(points: &[ControlPoint], t: f64) -> EvaluationResult {
    let n = points.len();
    if n < 2 {
        return EvaluationResult::default();
    }

    let i = (0..n - 1)
        .rev()
        .find(|&k| points[k].t <= t)
        .unwrap_or(0)
        .min(n - 2);
    let (a, b) = (points[i], points[i + 1]);

    let mut denom = b.t - a.t;
    if Float::abs(denom) < SEGMENT_EPSILON {
        denom = SEGMENT_EPSILON;
    }
    let u = (t - a.t) / denom;

    EvaluationResult {
        off: a.off + u * (b.off - a.off),
        segment_low: i,
        segment_high: i + 1,
        u,
    }
}

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::state::clamp01;

// Version tag written alongside the points by the curve editor
const PAYLOAD_VERSION: u32 = 1;

// One control point of the heating curve.
// `t` is the normalized outdoor temperature, `off` the offset at that position.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct ControlPoint {
    pub t: f64,
    pub off: f64,
}

impl ControlPoint {
    pub fn new(t: f64, off: f64) -> Self {
        Self { t, off }
    }
}

/// Control points sorted ascending by `t`, every `t` within [0, 1], at least two points.
///
/// Only obtainable through [`normalize`] or [`PointSet::fallback`].
#[derive(Debug, PartialEq, Clone)]
pub struct PointSet(Vec<ControlPoint>);

impl PointSet {
    /// Flat curve: zero offset across the whole range.
    pub fn fallback() -> Self {
        Self(vec![ControlPoint::new(0.0, 0.0), ControlPoint::new(1.0, 0.0)])
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.0
    }

    /// Compact payload in the format the curve editor persists, e.g.
    /// `{"v":1,"points":[{"t":0.0,"off":0.0},{"t":1.0,"off":0.0}]}`
    pub fn to_json(&self) -> String {
        #[derive(Serialize)]
        struct Payload<'a> {
            v: u32,
            points: &'a [ControlPoint],
        }

        let payload = Payload {
            v: PAYLOAD_VERSION,
            points: &self.0,
        };
        // Points are always finite, which is the only way this could fail
        serde_json::to_string(&payload).unwrap_or_default()
    }
}

// Why the canonical flat curve was substituted for the stored one
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum FallbackReason {
    Missing,
    Malformed,
    NotASequence,
    TooFewPoints,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            FallbackReason::Missing => "no curve data",
            FallbackReason::Malformed => "curve data is not a JSON object",
            FallbackReason::NotASequence => "curve data has no list of points",
            FallbackReason::TooFewPoints => "curve has fewer than two usable points",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Normalized {
    pub points: PointSet,
    pub fallback: Option<FallbackReason>,
    // Entries discarded because `t` or `off` was not a number
    pub dropped: usize,
}

impl Normalized {
    fn fallback(reason: FallbackReason, dropped: usize) -> Self {
        Self {
            points: PointSet::fallback(),
            fallback: Some(reason),
            dropped,
        }
    }
}

/// Parse the stored curve text into a [`PointSet`].
///
/// Never fails: anything unusable is replaced by [`PointSet::fallback`] and the
/// reason is reported in [`Normalized::fallback`]. Individual points whose fields
/// cannot be read as numbers are skipped; a missing field counts as zero.
pub fn normalize(raw: Option<&str>) -> Normalized {
    let entries = match decode_entries(raw.unwrap_or_default()) {
        Ok(entries) => entries,
        Err(reason) => return Normalized::fallback(reason, 0),
    };
    if entries.len() < 2 {
        return Normalized::fallback(FallbackReason::TooFewPoints, 0);
    }

    let mut dropped = 0;
    let mut points: Vec<ControlPoint> = entries
        .iter()
        .filter_map(|entry| {
            let point = coerce_point(entry);
            if point.is_none() {
                dropped += 1;
            }
            point
        })
        .collect();

    if points.len() < 2 {
        return Normalized::fallback(FallbackReason::TooFewPoints, dropped);
    }

    // Stable: points sharing a `t` keep their stored order
    points.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(Ordering::Equal));

    Normalized {
        points: PointSet(points),
        fallback: None,
        dropped,
    }
}

fn decode_entries(raw: &str) -> Result<Vec<Value>, FallbackReason> {
    if raw.trim().is_empty() {
        return Err(FallbackReason::Missing);
    }
    let decoded: Value = serde_json::from_str(raw).map_err(|_| FallbackReason::Malformed)?;
    let Value::Object(mut object) = decoded else {
        return Err(FallbackReason::Malformed);
    };
    match object.remove("points") {
        Some(Value::Array(entries)) => Ok(entries),
        _ => Err(FallbackReason::NotASequence),
    }
}

fn coerce_point(entry: &Value) -> Option<ControlPoint> {
    let fields = entry.as_object()?;
    let t = coerce_number(fields.get("t"))?;
    let off = coerce_number(fields.get("off"))?;
    Some(ControlPoint::new(clamp01(t), off))
}

fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let number = match value {
        None => 0.0,
        Some(Value::Number(number)) => number.as_f64()?,
        Some(Value::String(text)) => text.trim().parse::<f64>().ok()?,
        Some(Value::Bool(flag)) => f64::from(u8::from(*flag)),
        Some(_) => return None,
    };
    number.is_finite().then_some(number)
}

use core::fmt;

// NaN maps to the upper bound
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 1.0;
    }
    value.clamp(0.0, 1.0)
}

// Outdoor temperature and the bounds mapping it onto the curve, in degrees celcius
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Reading {
    pub at: f64,
    pub x_min: f64,
    pub x_max: f64,
}

impl Reading {
    pub fn new(at: f64, x_min: f64, x_max: f64) -> Self {
        Self { at, x_min, x_max }
    }

    // Width of the mapped range, 1.0 when both bounds coincide
    pub fn span(&self) -> f64 {
        let span = self.x_max - self.x_min;
        if span == 0.0 {
            1.0
        } else {
            span
        }
    }

    // Position of the reading on the curve, within [0, 1]
    pub fn normalized(&self) -> f64 {
        clamp01((self.at - self.x_min) / self.span())
    }
}

// Flow temperature offset published to the heat pump, always a multiple of the quantization step
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
pub struct Delta(f64);

impl Delta {
    pub fn new(value: f64) -> Self {
        Self(crate::quantize(value))
    }
}

impl From<Delta> for f64 {
    fn from(value: Delta) -> f64 {
        value.0
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_midpoint() {
        let reading = Reading::new(2.0, -14.0, 18.0);
        assert_eq!(reading.span(), 32.0);
        assert_eq!(reading.normalized(), 0.5);
    }

    #[test]
    fn test_normalized_is_clamped() {
        assert_eq!(Reading::new(-20.0, -14.0, 18.0).normalized(), 0.0);
        assert_eq!(Reading::new(25.0, -14.0, 18.0).normalized(), 1.0);
    }

    #[test]
    fn test_zero_span_uses_unit_span() {
        let reading = Reading::new(5.4, 5.0, 5.0);
        assert_eq!(reading.span(), 1.0);
        let t = reading.normalized();
        assert!(0.399 < t, "0.399 < {}", t);
        assert!(t < 0.401, "{} < 0.401", t);

        assert_eq!(Reading::new(7.0, 5.0, 5.0).normalized(), 1.0);
        assert_eq!(Reading::new(3.0, 5.0, 5.0).normalized(), 0.0);
    }

    #[test]
    fn test_clamp01_nan() {
        assert_eq!(clamp01(f64::NAN), 1.0);
        assert_eq!(clamp01(f64::INFINITY), 1.0);
        assert_eq!(clamp01(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_extreme_bounds_stay_in_range() {
        // Span overflows to infinity, giving inf / inf
        let reading = Reading::new(f64::MAX, -f64::MAX, f64::MAX);
        assert_eq!(reading.normalized(), 1.0);
    }

    #[test]
    fn test_delta_is_quantized() {
        assert_eq!(f64::from(Delta::new(1.3)), 1.5);
        assert_eq!(f64::from(Delta::new(-0.1)), 0.0);
    }
}

use num_traits::Float;

pub const QUANTIZATION_STEP: f64 = 0.5;

/// Round to the nearest multiple of [`QUANTIZATION_STEP`], ties to the even multiple.
pub fn quantize(value: f64) -> f64 {
    let steps = round_half_even(value / QUANTIZATION_STEP);
    // Adding zero turns -0.0 into 0.0
    steps * QUANTIZATION_STEP + 0.0
}

fn round_half_even(value: f64) -> f64 {
    let rounded = Float::round(value);
    if Float::abs(rounded - value) == 0.5 {
        2.0 * Float::round(value / 2.0)
    } else {
        rounded
    }
}

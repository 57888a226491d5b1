//! Exponential moving average for raw joystick samples

/// One EMA step: `(1 - alpha) * previous + alpha * sample`
///
/// Higher `alpha` follows the stick faster; lower `alpha` smooths more.
/// The result always lies between `previous` and `sample`.
pub fn smooth(previous: f32, sample: f32, alpha: f32) -> f32 {
    let blended = (1.0 - alpha) * previous + alpha * sample;
    // keep float rounding inside the bracket
    blended.clamp(previous.min(sample), previous.max(sample))
}

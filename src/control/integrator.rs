//! Direction-confirmed angle integration
//!
//! A self-centering stick springs back through the dead-band when released,
//! and a single noisy sample can land outside it. The target angle therefore
//! only moves while the reading keeps travelling in the classified direction.

use super::deadzone::Direction;
use crate::config::AngleLimits;

/// Advance `angle` by `step` when `reading` confirms `direction`
///
/// Negative readings raise the angle, positive readings lower it. The result
/// is always clamped to `limits`. Returns whether the angle was integrated.
pub fn integrate(
    angle: &mut f32,
    direction: Direction,
    reading: f32,
    last_reading: f32,
    step: f32,
    limits: &AngleLimits,
) -> bool {
    let target = match direction {
        Direction::Negative if reading < last_reading => *angle + step,
        Direction::Positive if reading > last_reading => *angle - step,
        _ => return false,
    };
    *angle = limits.clamp(target);
    true
}

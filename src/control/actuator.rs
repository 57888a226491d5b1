//! Servo update gating and idle power-down
//!
//! Cheap servos buzz when held at a fixed point under continuous drive. Two
//! thresholds keep them quiet: a new position is only sent once the target has
//! moved by `update_threshold`, and the drive signal is cut entirely once no
//! position has been sent for `servo_timeout`.

use super::axis::AxisState;
use crate::config::ActuatorConfig;
use crate::hal::{ServoCommand, ServoId};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorGate {
    servo: ServoId,
    update_threshold: f32,
    servo_timeout: Duration,
}

impl ActuatorGate {
    pub fn new(servo: ServoId, config: &ActuatorConfig) -> Self {
        Self {
            servo,
            update_threshold: config.update_threshold,
            servo_timeout: config.servo_timeout,
        }
    }

    /// Decide what, if anything, the servo should be told this cycle
    pub fn update(&self, state: &mut AxisState, now: Duration) -> Option<ServoCommand> {
        if (state.current_angle - state.last_sent_angle).abs() >= self.update_threshold {
            state.last_sent_angle = state.current_angle;
            state.last_movement_time = now;
            if !state.enabled {
                state.enabled = true;
                info!("{} servo re-enabled", self.servo);
            }
            return Some(ServoCommand::SetAngle(state.current_angle.round()));
        }

        let idle = now.saturating_sub(state.last_movement_time);
        if state.enabled && idle > self.servo_timeout {
            state.enabled = false;
            info!("{} servo disabled (holding position)", self.servo);
            return Some(ServoCommand::Disable);
        }

        None
    }
}

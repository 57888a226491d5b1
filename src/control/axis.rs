//! Per-axis control state and the single-cycle step function
//!
//! One cycle runs: filter → classify → speed → direction-confirmed integrate
//! → actuator gate. The step is pure apart from logging: it mutates the given
//! [`AxisState`] and returns the servo command to issue, if any.

use super::actuator::ActuatorGate;
use super::deadzone::{DeadZone, Direction};
use super::filter::smooth;
use super::integrator::integrate;
use super::speed::SpeedModel;
use crate::config::{AngleLimits, ArmConfig, AxisConfig};
use crate::hal::{Channel, ServoCommand, ServoId};
use std::time::Duration;
use tracing::{debug, info};

/// Mutable state of one controlled axis
#[derive(Debug, Clone, PartialEq)]
pub struct AxisState {
    /// EMA-smoothed raw input
    pub filtered_reading: f32,
    /// Previous cycle's truncated filtered reading
    pub last_raw_reading: f32,
    /// Accumulated target angle, always within the safety limits
    pub current_angle: f32,
    /// Last angle actually issued to the servo
    pub last_sent_angle: f32,
    /// Time of the last `SetAngle` command
    pub last_movement_time: Duration,
    /// Whether the servo currently receives a drive signal
    pub enabled: bool,
    /// Previous step size, used by accel-limited axes
    pub last_speed: f32,
    /// Last classification, for logging changes
    pub direction: Direction,
}

impl AxisState {
    /// Fresh state seeded with one real sample so the filter does not ramp
    /// in from zero
    pub fn new(seed_reading: u16, home_angle: f32, now: Duration) -> Self {
        Self {
            filtered_reading: f32::from(seed_reading),
            last_raw_reading: f32::from(seed_reading),
            current_angle: home_angle,
            last_sent_angle: home_angle,
            last_movement_time: now,
            enabled: true,
            last_speed: 0.0,
            direction: Direction::Centered,
        }
    }
}

/// Outcome of one axis cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisReport {
    pub reading: f32,
    pub direction: Direction,
    pub step: f32,
    pub integrated: bool,
    pub command: Option<ServoCommand>,
}

/// Immutable tuning for one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisController {
    servo: ServoId,
    channel: Channel,
    filter_alpha: f32,
    zone: DeadZone,
    speed: SpeedModel,
    limits: AngleLimits,
    gate: ActuatorGate,
}

impl AxisController {
    pub fn new(servo: ServoId, channel: Channel, axis: &AxisConfig, config: &ArmConfig) -> Self {
        Self {
            servo,
            channel,
            filter_alpha: axis.filter_alpha,
            zone: DeadZone::from_config(&config.joystick),
            speed: SpeedModel::from_config(axis),
            limits: config.limits,
            gate: ActuatorGate::new(servo, &config.actuator),
        }
    }

    pub fn servo(&self) -> ServoId {
        self.servo
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Run one control cycle for this axis
    pub fn step(&self, state: &mut AxisState, raw: u16, now: Duration) -> AxisReport {
        state.filtered_reading = smooth(state.filtered_reading, f32::from(raw), self.filter_alpha);
        let reading = state.filtered_reading.trunc();

        let direction = self.zone.classify(reading);
        if direction != state.direction {
            info!("{} stick {} -> {} (reading {})", self.servo, state.direction, direction, reading);
            state.direction = direction;
        }

        let step = self.speed.step(direction, &self.zone, reading, &mut state.last_speed);
        let integrated = integrate(
            &mut state.current_angle,
            direction,
            reading,
            state.last_raw_reading,
            step,
            &self.limits,
        );

        let command = self.gate.update(state, now);
        if let Some(ServoCommand::SetAngle(_)) = command {
            debug!(
                "{}: reading {}, side {}, angle {:.1}, speed {:.2}",
                self.servo, reading, direction, state.current_angle, step
            );
        }

        state.last_raw_reading = reading;

        AxisReport {
            reading,
            direction,
            step,
            integrated,
            command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pan() -> AxisController {
        let config = ArmConfig::default();
        AxisController::new(ServoId::Pan, Channel::Pan, &config.pan, &config)
    }

    fn tilt() -> AxisController {
        let config = ArmConfig::default();
        AxisController::new(ServoId::Tilt, Channel::Tilt, &config.tilt, &config)
    }

    #[test]
    fn test_centered_stick_holds_angle() {
        let axis = pan();
        let mut state = AxisState::new(32767, 90.0, Duration::ZERO);

        for ms in 0..10 {
            let report = axis.step(&mut state, 32767, Duration::from_millis(ms));
            assert_eq!(report.direction, Direction::Centered);
            assert!(!report.integrated);
        }
        assert_eq!(state.current_angle, 90.0);
    }

    #[test]
    fn test_push_left_raises_angle() {
        let axis = pan();
        let mut state = AxisState::new(32767, 90.0, Duration::ZERO);

        // Filtered reading keeps falling toward 0 while held left
        for ms in 0..40 {
            axis.step(&mut state, 0, Duration::from_millis(ms));
        }
        assert_eq!(state.direction, Direction::Negative);
        assert!(state.current_angle > 90.0);
    }

    #[test]
    fn test_push_right_lowers_angle() {
        let axis = pan();
        let mut state = AxisState::new(32767, 90.0, Duration::ZERO);

        for ms in 0..40 {
            axis.step(&mut state, 65535, Duration::from_millis(ms));
        }
        assert_eq!(state.direction, Direction::Positive);
        assert!(state.current_angle < 90.0);
    }

    #[test]
    fn test_spring_back_does_not_reverse() {
        let axis = pan();
        let mut state = AxisState::new(32767, 90.0, Duration::ZERO);

        for ms in 0..40 {
            axis.step(&mut state, 0, Duration::from_millis(ms));
        }
        let pushed = state.current_angle;

        // Released: the filtered reading climbs back through the left side
        for ms in 40..80 {
            let report = axis.step(&mut state, 32767, Duration::from_millis(ms));
            assert!(!report.integrated);
        }
        assert_eq!(state.current_angle, pushed);
        assert_eq!(state.direction, Direction::Centered);
    }

    #[test]
    fn test_last_raw_reading_tracks_truncated_filter() {
        let axis = pan();
        let mut state = AxisState::new(1001, 90.0, Duration::ZERO);

        let report = axis.step(&mut state, 1000, Duration::ZERO);
        assert_eq!(state.filtered_reading, 1000.75);
        assert_eq!(report.reading, 1000.0);
        assert_eq!(state.last_raw_reading, 1000.0);
    }

    #[test]
    fn test_tilt_ramps_speed() {
        let axis = tilt();
        let mut state = AxisState::new(32767, 90.0, Duration::ZERO);

        let mut previous = 0.0;
        for ms in 0..60 {
            let report = axis.step(&mut state, 65535, Duration::from_millis(ms));
            assert!((report.step - previous).abs() <= 1.5 + 1e-5);
            previous = state.last_speed;
        }
        assert!(state.last_speed > 0.2);

        // Centered again: speed coasts down but never below zero
        for ms in 60..200 {
            axis.step(&mut state, 32767, Duration::from_millis(ms));
        }
        assert!(state.last_speed >= 0.0);
        assert!(state.last_speed < 0.01);
    }

    #[test]
    fn test_commands_follow_movement_then_power_down() {
        let axis = pan();
        let mut state = AxisState::new(32767, 90.0, Duration::ZERO);
        let mut commands = Vec::new();

        for ms in 0..40 {
            if let Some(cmd) = axis.step(&mut state, 0, Duration::from_millis(ms)).command {
                commands.push(cmd);
            }
        }
        for ms in 40..100 {
            if let Some(cmd) = axis.step(&mut state, 32767, Duration::from_millis(ms)).command {
                commands.push(cmd);
            }
        }

        assert!(matches!(commands.first(), Some(ServoCommand::SetAngle(_))));
        assert_eq!(commands.last(), Some(&ServoCommand::Disable));
        let disables = commands.iter().filter(|c| **c == ServoCommand::Disable).count();
        assert_eq!(disables, 1);
        assert!(!state.enabled);
    }
}

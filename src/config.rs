//! Tuning constants for the arm
//!
//! All parameters are compiled in. [`ArmConfig::default`] carries the values
//! tuned for cheap 180° hobby servos on a 16-bit joystick ADC, and
//! [`ArmConfig::validate`] rejects inconsistent values at startup.

use anyhow::Result;
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Full-scale analog reading
pub const MAX_JOYSTICK: u16 = 65535;

/// Fraction of the full joystick range ignored on each side of center
pub const DEADBAND_FRACTION: f32 = 0.08;

/// Safety limits that keep servos off their mechanical endpoints
pub const MIN_ANGLE: f32 = 5.0;
pub const MAX_ANGLE: f32 = 175.0;

/// Angle all servos are driven to at startup
pub const HOME_ANGLE: f32 = 90.0;

/// Minimum angle change (degrees) before a new position is sent
pub const SERVO_UPDATE_THRESHOLD: f32 = 0.3;

/// Idle time after which a servo's drive signal is cut
pub const SERVO_TIMEOUT: Duration = Duration::from_millis(15);

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArmConfig {
    pub joystick: JoystickConfig,
    pub limits: AngleLimits,
    pub pan: AxisConfig,
    pub tilt: AxisConfig,
    pub actuator: ActuatorConfig,
    pub claw: ClawConfig,
}

/// Analog input domain and dead-band
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoystickConfig {
    /// Largest raw reading the ADC reports
    pub max_reading: u16,
    /// Dead-band half-width as a fraction of `max_reading`
    pub deadband_fraction: f32,
}

impl JoystickConfig {
    /// Reading of a centered stick
    pub fn center(&self) -> f32 {
        f32::from(self.max_reading / 2)
    }

    /// Dead-band half-width in raw counts
    pub fn deadband(&self) -> f32 {
        f32::from(self.max_reading) * self.deadband_fraction
    }
}

/// Angle safety limits (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AngleLimits {
    pub min_angle: f32,
    pub max_angle: f32,
    pub home_angle: f32,
}

impl AngleLimits {
    pub fn clamp(&self, angle: f32) -> f32 {
        angle.clamp(self.min_angle, self.max_angle)
    }
}

/// Per-axis filter and speed tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisConfig {
    /// EMA weight of a new sample, in (0, 1)
    pub filter_alpha: f32,
    /// Degrees per cycle just outside the dead-band
    pub min_speed: f32,
    /// Degrees per cycle at full deflection
    pub max_speed: f32,
    pub ramp: SpeedRamp,
}

/// How the per-cycle step reaches its target speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpeedRamp {
    /// Use the distance-proportional speed as-is
    Direct,
    /// Limit the speed change per cycle and coast down when centered
    AccelLimited {
        /// Largest speed change allowed in one cycle
        max_accel: f32,
        /// Speed multiplier applied each centered cycle, in (0, 1)
        decay: f32,
    },
}

/// Servo update gating and idle power-down
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActuatorConfig {
    /// Minimum angle change (degrees) before a new position is sent
    pub update_threshold: f32,
    /// Idle time after which the drive signal is cut
    #[serde(serialize_with = "serialize_millis")]
    pub servo_timeout: Duration,
}

/// Claw (toggle actuator) positions and hold behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClawConfig {
    pub open_angle: f32,
    pub closed_angle: f32,
    /// Time the claw servo stays driven after a toggle
    #[serde(serialize_with = "serialize_millis")]
    pub hold: Duration,
    pub hold_mode: HoldMode,
}

/// What the loop does while the claw settles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldMode {
    /// Sleep through the hold; the whole loop pauses
    Blocking,
    /// Schedule the disable and keep cycling
    Deferred,
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            joystick: JoystickConfig {
                max_reading: MAX_JOYSTICK,
                deadband_fraction: DEADBAND_FRACTION,
            },
            limits: AngleLimits {
                min_angle: MIN_ANGLE,
                max_angle: MAX_ANGLE,
                home_angle: HOME_ANGLE,
            },
            // Base carries little load
            pan: AxisConfig {
                filter_alpha: 0.25,
                min_speed: 0.05,
                max_speed: 0.25,
                ramp: SpeedRamp::Direct,
            },
            // Elbow lifts the platform: heavier filter, ramped speed
            tilt: AxisConfig {
                filter_alpha: 0.15,
                min_speed: 0.05,
                max_speed: 0.25,
                ramp: SpeedRamp::AccelLimited {
                    max_accel: 1.5,
                    decay: 0.7,
                },
            },
            actuator: ActuatorConfig {
                update_threshold: SERVO_UPDATE_THRESHOLD,
                servo_timeout: SERVO_TIMEOUT,
            },
            claw: ClawConfig {
                open_angle: 0.0,
                closed_angle: 90.0,
                hold: Duration::from_millis(250),
                hold_mode: HoldMode::Blocking,
            },
        }
    }
}

impl ArmConfig {
    /// Validate configuration for correctness and consistency
    ///
    /// Any failure here is a programming error in the constants; callers are
    /// expected to abort startup.
    pub fn validate(&self) -> Result<()> {
        let joystick = &self.joystick;
        if joystick.max_reading == 0 {
            anyhow::bail!("Joystick max_reading must be greater than zero");
        }
        if !(0.0..0.5).contains(&joystick.deadband_fraction) {
            anyhow::bail!(
                "Dead-band fraction {} must be in [0, 0.5)",
                joystick.deadband_fraction
            );
        }
        if joystick.center() - joystick.deadband() <= 0.0 {
            anyhow::bail!("Dead-band leaves no usable stick travel");
        }

        let limits = &self.limits;
        if !(0.0 <= limits.min_angle && limits.min_angle < limits.max_angle && limits.max_angle <= 180.0) {
            anyhow::bail!(
                "Angle limits must satisfy 0 <= min < max <= 180 (got {}..{})",
                limits.min_angle,
                limits.max_angle
            );
        }
        if !(limits.min_angle..=limits.max_angle).contains(&limits.home_angle) {
            anyhow::bail!(
                "Home angle {} is outside the safety limits {}..{}",
                limits.home_angle,
                limits.min_angle,
                limits.max_angle
            );
        }

        validate_axis("pan", &self.pan)?;
        validate_axis("tilt", &self.tilt)?;

        if !(self.actuator.update_threshold >= 0.0) {
            anyhow::bail!(
                "Servo update threshold {} cannot be negative",
                self.actuator.update_threshold
            );
        }

        for (name, angle) in [("open", self.claw.open_angle), ("closed", self.claw.closed_angle)] {
            if !(0.0..=180.0).contains(&angle) {
                anyhow::bail!("Claw {} angle {} must be in [0, 180]", name, angle);
            }
        }

        Ok(())
    }
}

fn validate_axis(name: &str, axis: &AxisConfig) -> Result<()> {
    if !(axis.filter_alpha > 0.0 && axis.filter_alpha < 1.0) {
        anyhow::bail!("{} filter alpha {} must be in (0, 1)", name, axis.filter_alpha);
    }
    if !(axis.min_speed >= 0.0) {
        anyhow::bail!("{} min speed {} cannot be negative", name, axis.min_speed);
    }
    if axis.min_speed > axis.max_speed {
        anyhow::bail!(
            "{} min speed {} exceeds max speed {}",
            name,
            axis.min_speed,
            axis.max_speed
        );
    }
    if let SpeedRamp::AccelLimited { max_accel, decay } = axis.ramp {
        if !(max_accel > 0.0) {
            anyhow::bail!("{} max acceleration {} must be positive", name, max_accel);
        }
        if !(decay > 0.0 && decay < 1.0) {
            anyhow::bail!("{} speed decay {} must be in (0, 1)", name, decay);
        }
    }
    Ok(())
}

fn serialize_millis<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ArmConfig::default().validate().is_ok());
    }

    #[test]
    fn test_joystick_geometry() {
        let config = ArmConfig::default();
        assert_eq!(config.joystick.center(), 32767.0);
        assert!((config.joystick.deadband() - 5242.8).abs() < 0.01);
    }

    #[test]
    fn test_rejects_deadband_of_full_range() {
        let mut config = ArmConfig::default();
        config.joystick.deadband_fraction = 1.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Dead-band"));
    }

    #[test]
    fn test_rejects_min_speed_above_max() {
        let mut config = ArmConfig::default();
        config.tilt.min_speed = 0.5;
        config.tilt.max_speed = 0.25;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tilt min speed"));
    }

    #[test]
    fn test_rejects_alpha_out_of_range() {
        let mut config = ArmConfig::default();
        config.pan.filter_alpha = 0.0;
        assert!(config.validate().is_err());

        config.pan.filter_alpha = 1.0;
        assert!(config.validate().is_err());

        config.pan.filter_alpha = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_ramp() {
        let mut config = ArmConfig::default();
        config.tilt.ramp = SpeedRamp::AccelLimited {
            max_accel: 1.5,
            decay: 1.0,
        };
        assert!(config.validate().is_err());

        config.tilt.ramp = SpeedRamp::AccelLimited {
            max_accel: 0.0,
            decay: 0.7,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_angle_limits() {
        let mut config = ArmConfig::default();
        config.limits.min_angle = 120.0;
        config.limits.max_angle = 60.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_home_outside_limits() {
        let mut config = ArmConfig::default();
        config.limits.home_angle = 179.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Home angle"));
    }

    #[test]
    fn test_rejects_claw_angle_out_of_range() {
        let mut config = ArmConfig::default();
        config.claw.open_angle = -10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_dump_contains_tuning() {
        let yaml = serde_yaml::to_string(&ArmConfig::default()).unwrap();
        assert!(yaml.contains("deadband_fraction"));
        assert!(yaml.contains("accel_limited"));
        assert!(yaml.contains("servo_timeout: 15"));
        assert!(yaml.contains("hold_mode: blocking"));
    }
}

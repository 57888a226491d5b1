//! Distance-proportional step size with optional acceleration limiting
//!
//! Pushing the stick further from center moves the servo faster. Axes carrying
//! more mass use [`SpeedRamp::AccelLimited`], which caps how much the step may
//! change per cycle and lets the speed coast down while the stick is centered.

use super::deadzone::{DeadZone, Direction};
use crate::config::{AxisConfig, SpeedRamp};

/// Per-axis speed model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedModel {
    min_speed: f32,
    max_speed: f32,
    ramp: SpeedRamp,
}

impl SpeedModel {
    pub fn new(min_speed: f32, max_speed: f32, ramp: SpeedRamp) -> Self {
        Self {
            min_speed,
            max_speed,
            ramp,
        }
    }

    pub fn from_config(axis: &AxisConfig) -> Self {
        Self::new(axis.min_speed, axis.max_speed, axis.ramp)
    }

    /// Linear interpolation between the axis speed bounds
    pub fn desired_step(&self, deflection: f32) -> f32 {
        self.min_speed + deflection * (self.max_speed - self.min_speed)
    }

    /// Compute this cycle's angular step in degrees
    ///
    /// `last_speed` is only read and written by accel-limited axes.
    pub fn step(
        &self,
        direction: Direction,
        zone: &DeadZone,
        reading: f32,
        last_speed: &mut f32,
    ) -> f32 {
        match self.ramp {
            SpeedRamp::Direct => {
                if direction.is_directional() {
                    self.desired_step(zone.deflection(reading))
                } else {
                    self.min_speed
                }
            }
            SpeedRamp::AccelLimited { max_accel, decay } => {
                if direction.is_directional() {
                    let desired = self.desired_step(zone.deflection(reading));
                    let change = (desired - *last_speed).clamp(-max_accel, max_accel);
                    *last_speed += change;
                } else {
                    *last_speed *= decay;
                }
                *last_speed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ZONE: DeadZone = DeadZone {
        center: 32767.0,
        half_width: 5242.8,
    };

    fn pan_model() -> SpeedModel {
        SpeedModel::new(0.05, 0.25, SpeedRamp::Direct)
    }

    fn tilt_model(max_accel: f32) -> SpeedModel {
        SpeedModel::new(
            0.05,
            0.25,
            SpeedRamp::AccelLimited {
                max_accel,
                decay: 0.7,
            },
        )
    }

    #[test]
    fn test_direct_scales_with_deflection() {
        let model = pan_model();
        let mut unused = 0.0;

        let full = model.step(Direction::Negative, &ZONE, 0.0, &mut unused);
        assert!((full - 0.25).abs() < 1e-6);

        // Deflection is measured from center, so the band edge already sits
        // about 19% of the way up the speed range
        let edge = model.step(Direction::Positive, &ZONE, 38010.0, &mut unused);
        assert!(edge > 0.08 && edge < 0.09);

        assert_eq!(unused, 0.0);
    }

    #[test]
    fn test_direct_centered_uses_floor() {
        let model = pan_model();
        let mut unused = 0.0;
        assert_eq!(model.step(Direction::Centered, &ZONE, 32767.0, &mut unused), 0.05);
    }

    #[test]
    fn test_accel_limit_caps_jump() {
        let model = tilt_model(0.1);
        let mut last = 0.0;

        let first = model.step(Direction::Positive, &ZONE, 65535.0, &mut last);
        assert!((first - 0.1).abs() < 1e-6);
        assert_eq!(first, last);

        let second = model.step(Direction::Positive, &ZONE, 65535.0, &mut last);
        assert!((second - 0.2).abs() < 1e-6);

        let third = model.step(Direction::Positive, &ZONE, 65535.0, &mut last);
        assert!((third - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_decay_when_centered() {
        let model = tilt_model(1.5);
        let mut last = 0.25;

        model.step(Direction::Centered, &ZONE, 32767.0, &mut last);
        assert!((last - 0.175).abs() < 1e-6);

        model.step(Direction::Centered, &ZONE, 32767.0, &mut last);
        assert!((last - 0.1225).abs() < 1e-6);
    }

    #[test]
    fn test_decay_matches_geometric_series() {
        let model = tilt_model(1.5);
        let initial = 0.25f32;
        let mut last = initial;
        let mut previous = last;

        for n in 1..=40 {
            model.step(Direction::Centered, &ZONE, 32767.0, &mut last);
            let expected = initial * 0.7f32.powi(n);
            assert!((last - expected).abs() <= expected * 1e-4 + f32::EPSILON);
            assert!(last <= previous);
            assert!(last >= 0.0);
            previous = last;
        }
    }

    proptest! {
        #[test]
        fn prop_accel_limit_holds(
            last in 0.0f32..3.0,
            reading in 0.0f32..=65535.0,
            max_accel in 0.01f32..2.0,
        ) {
            let model = tilt_model(max_accel);
            let direction = ZONE.classify(reading);
            let mut speed = last;
            model.step(direction, &ZONE, reading, &mut speed);
            if direction.is_directional() {
                prop_assert!((speed - last).abs() <= max_accel + 1e-5);
            }
            prop_assert!(speed >= 0.0);
        }
    }
}

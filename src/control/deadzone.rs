//! Dead-zone classification of a filtered stick reading

use crate::config::JoystickConfig;
use std::fmt;

/// Which side of the dead-band the stick is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Below the band ("left" on pan, "up" on tilt)
    Negative,
    /// Above the band ("right" on pan, "down" on tilt)
    Positive,
    /// Inside the band
    #[default]
    Centered,
}

impl Direction {
    pub fn is_directional(self) -> bool {
        !matches!(self, Direction::Centered)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Negative => "negative",
            Direction::Positive => "positive",
            Direction::Centered => "centered",
        };
        f.write_str(name)
    }
}

/// Symmetric band around the stick's rest position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadZone {
    pub center: f32,
    pub half_width: f32,
}

impl DeadZone {
    pub fn new(center: f32, half_width: f32) -> Self {
        Self { center, half_width }
    }

    pub fn from_config(joystick: &JoystickConfig) -> Self {
        Self::new(joystick.center(), joystick.deadband())
    }

    /// Classify a reading. Readings exactly on the band edge count as centered.
    pub fn classify(&self, reading: f32) -> Direction {
        if reading < self.center - self.half_width {
            Direction::Negative
        } else if reading > self.center + self.half_width {
            Direction::Positive
        } else {
            Direction::Centered
        }
    }

    /// Distance from center, normalized by the largest distance outside the
    /// band and capped at 1.0
    pub fn deflection(&self, reading: f32) -> f32 {
        let max_distance = self.center - self.half_width;
        ((reading - self.center).abs() / max_distance).min(1.0)
    }
}

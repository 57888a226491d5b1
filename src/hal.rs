//! Collaborator interfaces consumed by the control loop
//!
//! The control core never touches peripherals directly. It samples analog
//! channels, commands servos and polls a debounced button through these
//! traits, and reads time from a monotonic [`Clock`].

use std::fmt;
use std::time::{Duration, Instant};

/// Analog joystick channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Horizontal stick axis, drives the base servo
    Pan,
    /// Vertical stick axis, drives the elbow servo
    Tilt,
}

/// Servo output identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServoId {
    Pan,
    Tilt,
    Claw,
}

impl fmt::Display for ServoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServoId::Pan => "pan",
            ServoId::Tilt => "tilt",
            ServoId::Claw => "claw",
        };
        f.write_str(name)
    }
}

/// Command sent to a servo
///
/// Disabling is a distinct command: it cuts the drive signal, which is not the
/// same thing as driving the servo to 0°.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ServoCommand {
    /// Drive the servo to an angle in degrees (0..=180)
    SetAngle(f32),
    /// Stop sending a drive signal
    Disable,
}

/// Synchronous analog sampler
pub trait AnalogInput {
    /// Read one raw sample in `0..=MAX_JOYSTICK`. Must not block.
    fn read(&mut self, channel: Channel) -> u16;
}

/// Servo drive output
pub trait ServoSink {
    fn command(&mut self, servo: ServoId, command: ServoCommand);
}

/// Debounced push button
pub trait ButtonInput {
    /// Refresh debounce state. Call exactly once per cycle.
    fn update(&mut self);

    /// True exactly once per physical press, on the debounced rising edge.
    fn pressed(&self) -> bool;
}

/// Monotonic time source
pub trait Clock {
    /// Time elapsed since the clock was created
    fn now(&self) -> Duration;

    /// Block the caller for `duration`
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock-independent clock backed by [`Instant`]
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start_instant: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start_instant: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.start_instant.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Hand-driven clock for tests and offline replays
///
/// `sleep` advances the clock instantly instead of blocking.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `step`
    pub fn advance(&mut self, step: Duration) {
        self.now += step;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
    }
}

//! Servo command sinks
//!
//! PWM generation lives outside this crate; these sinks stand in for it.

pub mod console;
pub mod recorder;

pub use console::{ConsoleServos, ServoTally};
pub use recorder::RecordingServos;

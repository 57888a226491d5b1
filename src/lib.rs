//! Nudge Arm - joystick-to-servo control loop
//!
//! Drives a small pan/tilt robot arm from a self-centering analog joystick,
//! plus a button-toggled claw. A nudge of the stick moves the arm a little in
//! that direction; pushing further moves it faster. Servos are powered down
//! between movements so cheap hobby servos stop buzzing.
//!
//! The crate is split into:
//! - [`config`] - compiled-in tuning constants and their validation
//! - [`hal`] - collaborator traits (analog input, servos, button, clock)
//! - [`control`] - the per-cycle signal-processing and motion pipeline
//! - [`input`] - joystick/button backends (gilrs gamepad, scripted, debouncer)
//! - [`output`] - servo sinks (logging console, command recorder)

pub mod config;
pub mod control;
pub mod hal;
pub mod input;
pub mod output;

pub use config::ArmConfig;
pub use control::ControlLoop;
pub use hal::{Channel, ServoCommand, ServoId};

//! Joystick and button sources
//!
//! - [`gamepad`] - real gamepad stick and button via GilRs
//! - [`debounce`] - count-based button debouncer
//! - [`scripted`] - replayed samples for the simulator and tests
//! - [`diagnostics`] - gamepad enumeration report

pub mod debounce;
pub mod diagnostics;
pub mod gamepad;
pub mod scripted;

pub use debounce::Debouncer;
pub use diagnostics::print_gamepad_diagnostics;
pub use gamepad::{GamepadButton, GamepadJoystick, StickMapping};
pub use scripted::{demo_script, ScriptedButton, ScriptedJoystick};

//! Gamepad joystick backend using GilRs
//!
//! Maps a gamepad stick onto the 16-bit analog domain the control loop
//! expects, and exposes one gamepad button as the claw button. GilRs is not
//! thread-safe, which suits the single-threaded loop: the joystick and the
//! button share one `Gilrs` handle through `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};
use tracing::{debug, info, warn};

use super::debounce::{Debouncer, DEFAULT_THRESHOLD};
use crate::hal::{AnalogInput, Channel};

/// Claw button backed by a debounced gamepad button
pub type GamepadButton = Debouncer<Box<dyn FnMut() -> bool>>;

/// Stick axis assignment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickMapping {
    pub pan_axis: Axis,
    pub tilt_axis: Axis,
    pub invert_pan: bool,
    /// GilRs reports stick-up as positive; analog joysticks read low when
    /// pushed up, so tilt is inverted by default
    pub invert_tilt: bool,
}

impl Default for StickMapping {
    fn default() -> Self {
        Self {
            pan_axis: Axis::LeftStickX,
            tilt_axis: Axis::LeftStickY,
            invert_pan: false,
            invert_tilt: true,
        }
    }
}

struct Shared {
    gilrs: Gilrs,
    active: Option<GamepadId>,
}

impl Shared {
    /// Drain pending events so cached axis/button state is current, and
    /// track which gamepad is in use
    fn pump(&mut self) {
        while let Some(event) = self.gilrs.next_event() {
            match event.event {
                EventType::Connected => {
                    if self.active.is_none() {
                        info!("Gamepad connected: {:?}", event.id);
                        self.active = Some(event.id);
                    }
                }
                EventType::Disconnected if self.active == Some(event.id) => {
                    warn!("Active gamepad disconnected: {:?}", event.id);
                    self.active = None;
                }
                _ => {}
            }
        }

        if self.active.is_none() {
            self.active = first_connected(&self.gilrs);
            if let Some(id) = self.active {
                info!("Using gamepad {:?}: \"{}\"", id, self.gilrs.gamepad(id).name());
            }
        }
    }

    fn axis_value(&self, axis: Axis) -> Option<f32> {
        self.active.map(|id| self.gilrs.gamepad(id).value(axis))
    }

    fn is_pressed(&self, button: Button) -> bool {
        self.active
            .map(|id| self.gilrs.gamepad(id).is_pressed(button))
            .unwrap_or(false)
    }
}

fn first_connected(gilrs: &Gilrs) -> Option<GamepadId> {
    gilrs
        .gamepads()
        .find(|(_, gamepad)| gamepad.is_connected())
        .map(|(id, _)| id)
}

/// Joystick channels read from a gamepad stick
pub struct GamepadJoystick {
    shared: Rc<RefCell<Shared>>,
    mapping: StickMapping,
    max_reading: u16,
}

impl GamepadJoystick {
    /// Open GilRs and build the joystick plus a debounced claw button
    pub fn open(mapping: StickMapping, claw_button: Button, max_reading: u16) -> Result<(Self, GamepadButton)> {
        let gilrs = Gilrs::new().map_err(|e| anyhow!("Failed to initialize GilRs: {:?}", e))?;
        info!("GilRs initialized");

        let active = first_connected(&gilrs);
        match active {
            Some(id) => {
                info!("Using gamepad {:?}: \"{}\"", id, gilrs.gamepad(id).name());
            }
            None => {
                warn!("⚠️  No gamepad connected yet, stick reads centered until one appears");
            }
        }

        let shared = Rc::new(RefCell::new(Shared { gilrs, active }));

        let button_shared = Rc::clone(&shared);
        let read_level: Box<dyn FnMut() -> bool> = Box::new(move || {
            let mut shared = button_shared.borrow_mut();
            shared.pump();
            shared.is_pressed(claw_button)
        });
        let button = Debouncer::new(read_level, DEFAULT_THRESHOLD);

        debug!("Stick mapping: {:?}, claw button: {:?}", mapping, claw_button);

        Ok((
            Self {
                shared,
                mapping,
                max_reading,
            },
            button,
        ))
    }
}

impl AnalogInput for GamepadJoystick {
    fn read(&mut self, channel: Channel) -> u16 {
        let mut shared = self.shared.borrow_mut();
        shared.pump();

        let (axis, invert) = match channel {
            Channel::Pan => (self.mapping.pan_axis, self.mapping.invert_pan),
            Channel::Tilt => (self.mapping.tilt_axis, self.mapping.invert_tilt),
        };
        let value = shared.axis_value(axis).unwrap_or(0.0);
        stick_to_reading(value, invert, self.max_reading)
    }
}

/// Map a GilRs axis value in [-1.0, 1.0] onto `0..=max_reading`
pub fn stick_to_reading(value: f32, invert: bool, max_reading: u16) -> u16 {
    let value = if invert { -value } else { value };
    let unit = ((value.clamp(-1.0, 1.0) + 1.0) / 2.0).clamp(0.0, 1.0);
    (unit * f32::from(max_reading)).round() as u16
}

/// Parse a claw button name
///
/// Accepts GilRs position names (`south`, `east`, ...) as printed by the
/// diagnostics, or Xbox-style letters.
pub fn parse_button(name: &str) -> Result<Button> {
    let button = match name.to_ascii_lowercase().as_str() {
        "south" | "a" => Button::South,
        "east" | "b" => Button::East,
        "north" | "y" => Button::North,
        "west" | "x" => Button::West,
        "lb" => Button::LeftTrigger,
        "rb" => Button::RightTrigger,
        "lt" => Button::LeftTrigger2,
        "rt" => Button::RightTrigger2,
        "select" | "back" => Button::Select,
        "start" => Button::Start,
        "l3" => Button::LeftThumb,
        "r3" => Button::RightThumb,
        other => anyhow::bail!("Unknown gamepad button: {}", other),
    };
    Ok(button)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stick_to_reading_range() {
        assert_eq!(stick_to_reading(-1.0, false, 65535), 0);
        assert_eq!(stick_to_reading(1.0, false, 65535), 65535);
        assert_eq!(stick_to_reading(0.0, false, 65535), 32768);
    }

    #[test]
    fn test_stick_to_reading_inversion() {
        assert_eq!(stick_to_reading(1.0, true, 65535), 0);
        assert_eq!(stick_to_reading(-1.0, true, 65535), 65535);
    }

    #[test]
    fn test_stick_to_reading_clamps_overshoot() {
        assert_eq!(stick_to_reading(1.7, false, 65535), 65535);
        assert_eq!(stick_to_reading(-3.0, false, 1023), 0);
    }

    #[test]
    fn test_centered_stick_is_inside_deadband() {
        let config = crate::config::ArmConfig::default();
        let zone = crate::control::DeadZone::from_config(&config.joystick);
        let reading = stick_to_reading(0.0, false, config.joystick.max_reading);
        assert_eq!(zone.classify(f32::from(reading)), crate::control::Direction::Centered);
    }

    #[test]
    fn test_parse_button() {
        assert_eq!(parse_button("south").unwrap(), Button::South);
        assert_eq!(parse_button("A").unwrap(), Button::South);
        assert_eq!(parse_button("rb").unwrap(), Button::RightTrigger);
        assert!(parse_button("turbo").is_err());
    }
}

//! Gamepad diagnostics for picking the stick and claw button

use gilrs::{Axis, Button, Event, EventType, Gilrs};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

use super::gamepad::stick_to_reading;

const BUTTONS: [Button; 12] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
];

const AXES: [Axis; 4] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::RightStickX,
    Axis::RightStickY,
];

/// Print every detected gamepad with its current button and stick state
///
/// Stick values are shown both raw and as the 16-bit reading the control
/// loop would see.
pub fn print_gamepad_diagnostics(max_reading: u16) {
    info!("=== Gamepad Diagnostics ===");
    info!("Platform: {}", std::env::consts::OS);

    let mut gilrs = match Gilrs::new() {
        Ok(g) => {
            info!("✅ GilRs initialized successfully");
            g
        }
        Err(e) => {
            info!("❌ Failed to initialize GilRs: {:?}", e);
            info!("This may indicate missing system libraries or permissions issues.");
            return;
        }
    };

    info!("⏳ Waiting for gamepads to connect (3 seconds)...");
    let start = Instant::now();
    while start.elapsed() < Duration::from_secs(3) {
        while let Some(Event { event, .. }) = gilrs.next_event() {
            if event == EventType::Connected {
                info!("   📶 Gamepad connection detected...");
            }
        }
        thread::sleep(Duration::from_millis(100));
    }

    let gamepads: Vec<_> = gilrs.gamepads().collect();
    if gamepads.is_empty() {
        info!("⚠️  No gamepads detected");
        info!("   Check the gamepad is connected and its drivers are installed");
        return;
    }

    info!("✅ Found {} gamepad(s):", gamepads.len());
    for (id, gamepad) in gamepads {
        info!("📋 Gamepad ID: {:?}", id);
        info!("   Name: \"{}\"", gamepad.name());
        info!("   Connected: {}", gamepad.is_connected());

        let pressed: Vec<_> = BUTTONS
            .iter()
            .filter(|button| gamepad.is_pressed(**button))
            .map(|button| format!("{:?}", button))
            .collect();
        if pressed.is_empty() {
            info!("   🎮 Buttons: (none pressed)");
        } else {
            info!("   🎮 Buttons pressed: {}", pressed.join(", "));
        }

        info!("   🕹️  Axes:");
        for axis in AXES {
            let value = gamepad.value(axis);
            info!(
                "      {:?}: {:+.3} -> reading {}",
                axis,
                value,
                stick_to_reading(value, false, max_reading)
            );
        }
    }

    info!("=== End Diagnostics ===");
    info!("💡 Pass a button name (e.g. 'south') to --claw-button");
}

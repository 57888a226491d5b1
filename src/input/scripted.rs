//! Scripted joystick and button for simulation runs and tests
//!
//! Each channel replays its own queue of raw samples, one per `read`. When a
//! queue runs dry the last sample is held, like a stick left where it was.

use std::collections::VecDeque;

use crate::hal::{AnalogInput, ButtonInput, Channel};

/// Joystick that replays recorded samples
#[derive(Debug, Clone)]
pub struct ScriptedJoystick {
    pan: VecDeque<u16>,
    tilt: VecDeque<u16>,
    pan_hold: u16,
    tilt_hold: u16,
}

impl ScriptedJoystick {
    /// Joystick resting at `rest` on both channels
    pub fn new(rest: u16) -> Self {
        Self {
            pan: VecDeque::new(),
            tilt: VecDeque::new(),
            pan_hold: rest,
            tilt_hold: rest,
        }
    }

    /// Queue samples for one channel
    pub fn with_channel(mut self, channel: Channel, samples: impl IntoIterator<Item = u16>) -> Self {
        self.push(channel, samples);
        self
    }

    pub fn push(&mut self, channel: Channel, samples: impl IntoIterator<Item = u16>) {
        match channel {
            Channel::Pan => self.pan.extend(samples),
            Channel::Tilt => self.tilt.extend(samples),
        }
    }

    /// Samples not yet read on `channel`
    pub fn remaining(&self, channel: Channel) -> usize {
        match channel {
            Channel::Pan => self.pan.len(),
            Channel::Tilt => self.tilt.len(),
        }
    }
}

impl AnalogInput for ScriptedJoystick {
    fn read(&mut self, channel: Channel) -> u16 {
        let (queue, hold) = match channel {
            Channel::Pan => (&mut self.pan, &mut self.pan_hold),
            Channel::Tilt => (&mut self.tilt, &mut self.tilt_hold),
        };
        if let Some(sample) = queue.pop_front() {
            *hold = sample;
        }
        *hold
    }
}

/// Button that reports a scripted sequence of debounced press edges
///
/// Each `update` consumes one entry; after the script ends no further presses
/// are reported.
#[derive(Debug, Clone, Default)]
pub struct ScriptedButton {
    edges: VecDeque<bool>,
    pressed: bool,
}

impl ScriptedButton {
    pub fn new(edges: impl IntoIterator<Item = bool>) -> Self {
        Self {
            edges: edges.into_iter().collect(),
            pressed: false,
        }
    }

    /// Button that is never pressed
    pub fn idle() -> Self {
        Self::default()
    }
}

impl ButtonInput for ScriptedButton {
    fn update(&mut self) {
        self.pressed = self.edges.pop_front().unwrap_or(false);
    }

    fn pressed(&self) -> bool {
        self.pressed
    }
}

/// Built-in demo gesture: nudge pan left, tilt down, toggle the claw twice,
/// then nudge pan right
///
/// The first sample of each channel is the centered seed. Returns the
/// joystick, the button and the number of cycles the script covers.
pub fn demo_script(center: u16, max_reading: u16) -> (ScriptedJoystick, ScriptedButton, usize) {
    const PUSH: usize = 60;
    const REST: usize = 80;

    let mut pan = vec![center];
    let mut tilt = vec![center];
    let mut presses = Vec::new();

    let mut phase = |pan_value: u16, tilt_value: u16, cycles: usize| {
        pan.extend(std::iter::repeat(pan_value).take(cycles));
        tilt.extend(std::iter::repeat(tilt_value).take(cycles));
    };

    phase(0, center, PUSH);
    phase(center, center, REST);
    phase(center, max_reading, PUSH);
    phase(center, center, REST);
    phase(max_reading, center, PUSH);
    phase(center, center, REST);

    let cycles = pan.len() - 1;

    // Claw toggles during the rest after the tilt push
    let first_press = 2 * PUSH + REST + 10;
    presses.resize(first_press, false);
    presses.push(true);
    presses.resize(first_press + 30, false);
    presses.push(true);

    let joystick = ScriptedJoystick::new(center)
        .with_channel(Channel::Pan, pan)
        .with_channel(Channel::Tilt, tilt);
    (joystick, ScriptedButton::new(presses), cycles)
}

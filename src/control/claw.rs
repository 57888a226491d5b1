//! Button-toggled claw
//!
//! Each debounced press flips the claw between its open and closed angles,
//! holds the servo there long enough to settle, then cuts the drive signal.

use crate::config::{ClawConfig, HoldMode};
use crate::hal::{ButtonInput, Clock, ServoCommand, ServoId, ServoSink};
use std::time::Duration;
use tracing::{debug, info};

/// Claw toggle state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToggleState {
    pub is_open: bool,
    /// Pending disable time when holding in [`HoldMode::Deferred`]
    pub release_at: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClawController {
    open_angle: f32,
    closed_angle: f32,
    hold: Duration,
    hold_mode: HoldMode,
}

impl ClawController {
    pub fn new(config: &ClawConfig) -> Self {
        Self {
            open_angle: config.open_angle,
            closed_angle: config.closed_angle,
            hold: config.hold,
            hold_mode: config.hold_mode,
        }
    }

    /// Angle the claw is driven to for a given state
    pub fn target_angle(&self, is_open: bool) -> f32 {
        if is_open {
            self.open_angle
        } else {
            self.closed_angle
        }
    }

    /// Poll the button and drive the claw for one cycle
    ///
    /// In blocking mode a press sleeps on `clock` for the whole hold.
    pub fn run_cycle<B, S, C>(
        &self,
        state: &mut ToggleState,
        button: &mut B,
        servos: &mut S,
        clock: &mut C,
    ) where
        B: ButtonInput,
        S: ServoSink,
        C: Clock,
    {
        if let Some(release_at) = state.release_at {
            if clock.now() >= release_at {
                servos.command(ServoId::Claw, ServoCommand::Disable);
                state.release_at = None;
                debug!("claw servo released");
            }
        }

        button.update();
        if !button.pressed() {
            return;
        }

        state.is_open = !state.is_open;
        info!(
            "Button pressed & claw is {}",
            if state.is_open { "open" } else { "closed" }
        );
        servos.command(
            ServoId::Claw,
            ServoCommand::SetAngle(self.target_angle(state.is_open)),
        );

        match self.hold_mode {
            HoldMode::Blocking => {
                clock.sleep(self.hold);
                servos.command(ServoId::Claw, ServoCommand::Disable);
            }
            HoldMode::Deferred => {
                state.release_at = Some(clock.now() + self.hold);
            }
        }
    }
}

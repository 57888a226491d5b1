//! Control loop: joystick in, servo commands out
//!
//! Each cycle processes the pan axis, then the tilt axis, then the claw
//! button, always in that order. The loop owns all state; there is no
//! concurrency and no locking.

pub mod actuator;
pub mod axis;
pub mod claw;
pub mod deadzone;
pub mod filter;
pub mod integrator;
pub mod speed;


use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ArmConfig;
use crate::hal::{AnalogInput, ButtonInput, Channel, Clock, ServoCommand, ServoId, ServoSink};

pub use axis::{AxisController, AxisReport, AxisState};
pub use claw::{ClawController, ToggleState};
pub use deadzone::{DeadZone, Direction};
pub use speed::SpeedModel;

/// Per-cycle summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub pan: AxisReport,
    pub tilt: AxisReport,
}

/// The arm's control loop and its collaborators
pub struct ControlLoop<I, S, B, C> {
    config: ArmConfig,
    pan: AxisController,
    tilt: AxisController,
    claw: ClawController,
    pan_state: AxisState,
    tilt_state: AxisState,
    toggle: ToggleState,
    input: I,
    servos: S,
    button: B,
    clock: C,
    cycles: u64,
}

impl<I, S, B, C> ControlLoop<I, S, B, C>
where
    I: AnalogInput,
    S: ServoSink,
    B: ButtonInput,
    C: Clock,
{
    /// Validate `config` and seed both axis filters with one real sample
    pub fn new(config: ArmConfig, mut input: I, servos: S, button: B, clock: C) -> Result<Self> {
        config.validate()?;

        let pan = AxisController::new(ServoId::Pan, Channel::Pan, &config.pan, &config);
        let tilt = AxisController::new(ServoId::Tilt, Channel::Tilt, &config.tilt, &config);
        let claw = ClawController::new(&config.claw);

        let now = clock.now();
        let home = config.limits.home_angle;
        let center = config.joystick.center();

        let mut pan_state = AxisState::new(input.read(Channel::Pan), home, now);
        let mut tilt_state = AxisState::new(input.read(Channel::Tilt), home, now);
        // Direction confirmation starts from a centered stick
        pan_state.last_raw_reading = center;
        tilt_state.last_raw_reading = center;

        debug!(
            "Filters seeded: pan={}, tilt={}",
            pan_state.filtered_reading, tilt_state.filtered_reading
        );

        Ok(Self {
            config,
            pan,
            tilt,
            claw,
            pan_state,
            tilt_state,
            toggle: ToggleState::default(),
            input,
            servos,
            button,
            clock,
            cycles: 0,
        })
    }

    /// Drive every servo to the home angle, then cut all drive signals
    pub fn home(&mut self) {
        let home = self.config.limits.home_angle;
        for servo in [ServoId::Pan, ServoId::Tilt, ServoId::Claw] {
            self.servos.command(servo, ServoCommand::SetAngle(home));
        }
        for servo in [ServoId::Pan, ServoId::Tilt, ServoId::Claw] {
            self.servos.command(servo, ServoCommand::Disable);
        }

        let now = self.clock.now();
        for state in [&mut self.pan_state, &mut self.tilt_state] {
            state.current_angle = home;
            state.last_sent_angle = home;
            state.last_movement_time = now;
            state.enabled = false;
        }
        self.toggle = ToggleState::default();

        info!("Servos homed to {}° and disabled", home);
    }

    /// Run one control cycle
    pub fn cycle(&mut self) -> CycleReport {
        let pan_raw = self.input.read(self.pan.channel());
        let pan = self.pan.step(&mut self.pan_state, pan_raw, self.clock.now());
        if let Some(command) = pan.command {
            self.servos.command(self.pan.servo(), command);
        }

        let tilt_raw = self.input.read(self.tilt.channel());
        let tilt = self.tilt.step(&mut self.tilt_state, tilt_raw, self.clock.now());
        if let Some(command) = tilt.command {
            self.servos.command(self.tilt.servo(), command);
        }

        self.claw.run_cycle(
            &mut self.toggle,
            &mut self.button,
            &mut self.servos,
            &mut self.clock,
        );

        self.cycles += 1;
        CycleReport { pan, tilt }
    }

    /// Cycle until `max_cycles` is reached, or forever when `None`
    ///
    /// `pacing` sleeps between cycles; without it the loop spins as fast as
    /// sampling allows. Returns the number of cycles run by this call.
    pub fn run(&mut self, max_cycles: Option<u64>, pacing: Option<Duration>) -> u64 {
        info!("Control loop running");
        let mut ran = 0;
        while max_cycles.map_or(true, |max| ran < max) {
            self.cycle();
            ran += 1;
            if let Some(delay) = pacing {
                self.clock.sleep(delay);
            }
        }
        info!("Control loop stopped after {} cycles", ran);
        ran
    }

    pub fn config(&self) -> &ArmConfig {
        &self.config
    }

    pub fn pan_state(&self) -> &AxisState {
        &self.pan_state
    }

    pub fn tilt_state(&self) -> &AxisState {
        &self.tilt_state
    }

    pub fn toggle_state(&self) -> &ToggleState {
        &self.toggle
    }

    /// Total cycles run since construction
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn servos(&self) -> &S {
        &self.servos
    }

    pub fn servos_mut(&mut self) -> &mut S {
        &mut self.servos
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

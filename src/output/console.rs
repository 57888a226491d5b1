//! Console servo sink - logs every command instead of driving hardware
//!
//! Useful for:
//! - Running the simulator without servos attached
//! - Watching exactly when servos are moved and powered down

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::hal::{ServoCommand, ServoId, ServoSink};

/// Command counters for one servo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServoTally {
    pub moves: u64,
    pub disables: u64,
}

/// Servo sink that logs commands and keeps per-servo counters
#[derive(Debug, Default)]
pub struct ConsoleServos {
    tallies: BTreeMap<ServoId, ServoTally>,
    last_angle: BTreeMap<ServoId, f32>,
}

impl ConsoleServos {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tally(&self, servo: ServoId) -> ServoTally {
        self.tallies.get(&servo).copied().unwrap_or_default()
    }

    /// Last angle commanded to `servo`, if any
    pub fn last_angle(&self, servo: ServoId) -> Option<f32> {
        self.last_angle.get(&servo).copied()
    }

    /// Log a one-line summary per servo
    pub fn log_summary(&self) {
        for (servo, tally) in &self.tallies {
            let angle = self
                .last_angle(*servo)
                .map(|a| format!("{:.0}°", a))
                .unwrap_or_else(|| "-".to_string());
            info!(
                "📊 {} servo: {} moves, {} power-downs, last angle {}",
                servo, tally.moves, tally.disables, angle
            );
        }
    }
}

impl ServoSink for ConsoleServos {
    fn command(&mut self, servo: ServoId, command: ServoCommand) {
        let tally = self.tallies.entry(servo).or_default();
        match command {
            ServoCommand::SetAngle(angle) => {
                tally.moves += 1;
                self.last_angle.insert(servo, angle);
                debug!("🎛️  {} -> {:.0}°", servo, angle);
            }
            ServoCommand::Disable => {
                tally.disables += 1;
                debug!("💤 {} drive off", servo);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_commands_per_servo() {
        let mut servos = ConsoleServos::new();
        servos.command(ServoId::Pan, ServoCommand::SetAngle(91.0));
        servos.command(ServoId::Pan, ServoCommand::SetAngle(92.0));
        servos.command(ServoId::Pan, ServoCommand::Disable);
        servos.command(ServoId::Claw, ServoCommand::Disable);

        assert_eq!(servos.tally(ServoId::Pan), ServoTally { moves: 2, disables: 1 });
        assert_eq!(servos.tally(ServoId::Claw), ServoTally { moves: 0, disables: 1 });
        assert_eq!(servos.tally(ServoId::Tilt), ServoTally::default());
        assert_eq!(servos.last_angle(ServoId::Pan), Some(92.0));
        assert_eq!(servos.last_angle(ServoId::Claw), None);
    }
}

//! Servo sink that records every command in order

use crate::hal::{ServoCommand, ServoId, ServoSink};

#[derive(Debug, Clone, Default)]
pub struct RecordingServos {
    commands: Vec<(ServoId, ServoCommand)>,
}

impl RecordingServos {
    pub fn new() -> Self {
        Self::default()
    }

    /// All commands, oldest first
    pub fn commands(&self) -> &[(ServoId, ServoCommand)] {
        &self.commands
    }

    /// Commands sent to one servo, oldest first
    pub fn for_servo(&self, servo: ServoId) -> Vec<ServoCommand> {
        self.commands
            .iter()
            .filter(|(id, _)| *id == servo)
            .map(|(_, command)| *command)
            .collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl ServoSink for RecordingServos {
    fn command(&mut self, servo: ServoId, command: ServoCommand) {
        self.commands.push((servo, command));
    }
}

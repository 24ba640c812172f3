//! Command recording sink.

use crate::traits::{CommandSink, DrawCommand, DrawSubmission};

/// A [`CommandSink`] that stores every command it receives.
///
/// Useful for replaying a frame on another thread, for inspection tools and
/// for tests.
#[derive(Debug, Default, Clone)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded commands.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Takes the recorded commands, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns the draws recorded inside the named pass.
    pub fn draws_in(&self, pass: &str) -> Vec<&DrawSubmission> {
        let mut current: Option<&str> = None;
        let mut draws = Vec::new();

        for command in &self.commands {
            match command {
                DrawCommand::BeginPass { name, .. } => current = Some(*name),
                DrawCommand::EndPass => current = None,
                DrawCommand::Draw(draw) if current == Some(pass) => draws.push(draw),
                _ => {}
            }
        }

        draws
    }

    /// Returns the number of stencil clears recorded.
    pub fn stencil_clears(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::ClearStencil { .. }))
            .count()
    }
}

impl CommandSink for CommandRecorder {
    fn submit(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

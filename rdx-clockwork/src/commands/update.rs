//! The command that rotates the clock hands.

use super::{Command, CommandFactory};
use crate::error::{ClockError, Result};
use crate::model::ModelProxy;

/// Recomputes the hands from a `"<hour> <minute> <second>"` string.
///
/// Undo is a no-op: the coordinator restores the previous state by
/// re-executing the command below this one, which is safe because an
/// update is an idempotent recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCommand {
    time: String,
}

impl UpdateCommand {
    pub fn new(time: impl Into<String>) -> Self {
        Self { time: time.into() }
    }

    pub fn time(&self) -> &str {
        &self.time
    }
}

impl Command for UpdateCommand {
    fn name(&self) -> &str {
        "update"
    }

    fn help_message(&self) -> &'static str {
        "Rotate the Hand"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }

    fn check_precondition(&self) -> Result<()> {
        let count = self.time.split_whitespace().count();
        // Tokens past the third are ignored by the model.
        if count < 3 {
            return Err(ClockError::conversion(
                &self.time,
                format!("expected at least 3 tokens, found {}", count),
            ));
        }
        Ok(())
    }

    fn execute_impl(&self, model: &mut ModelProxy) -> Result<()> {
        model.update(&self.time, true)
    }

    fn undo_impl(&self, _model: &mut ModelProxy) -> Result<()> {
        Ok(())
    }
}

/// Creates `UpdateCommand`s for a fixed time string.
#[derive(Debug, Clone)]
pub struct UpdateCommandFactory {
    time: String,
}

impl UpdateCommandFactory {
    pub fn new(time: impl Into<String>) -> Self {
        Self { time: time.into() }
    }
}

impl CommandFactory for UpdateCommandFactory {
    fn create(&self) -> Box<dyn Command> {
        Box::new(UpdateCommand::new(self.time.clone()))
    }
}

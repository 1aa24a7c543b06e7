//! Translates raw `(command, sender)` input into coordinator actions.

use crate::commands::{CommandFactory, UpdateCommandFactory};
use crate::common::{EXIT, REDO, TIMER_SENDER, UNDO};
use crate::coordinator::Coordinator;
use crate::error::{ClockError, Result};
use crate::model::ModelProxy;
use crate::repository::CommandRepository;
use crate::view::UserInteraction;
use tracing::{debug, warn};

/// What the input loop should do after a command was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Continue,
    Exit,
}

/// The single entry point for entered commands.
#[derive(Debug)]
pub struct CommandDispatcher {
    coordinator: Coordinator,
    repository: CommandRepository,
}

impl CommandDispatcher {
    pub fn new(coordinator: Coordinator, repository: CommandRepository) -> Self {
        Self {
            coordinator,
            repository,
        }
    }

    /// Interprets one piece of input.
    ///
    /// `exit`, `undo` and `redo` are matched on `command`. Anything sent by
    /// the timer becomes an `UpdateCommand`. Other input is looked up in the
    /// repository by `sender`, not by `command`; an unknown name is reported
    /// to `ui` and is not an error.
    pub fn command_entered(
        &mut self,
        model: &mut ModelProxy,
        ui: &dyn UserInteraction,
        command: &str,
        sender: &str,
    ) -> Result<Dispatch> {
        debug!("Command '{}' entered by '{}'", command, sender);
        match command {
            EXIT => return Ok(Dispatch::Exit),
            UNDO => self.coordinator.undo(model)?,
            REDO => self.coordinator.redo(model)?,
            _ if sender == TIMER_SENDER => {
                let update = UpdateCommandFactory::new(command).create();
                self.coordinator.execute_command(update, model)?;
            }
            _ => match self.repository.get_command_by_name(sender) {
                Some(found) => self.coordinator.execute_command(found, model)?,
                None => {
                    let err = ClockError::UnknownCommand(command.to_string());
                    warn!("{}", err);
                    ui.send_message(&err.to_string());
                }
            },
        }
        Ok(Dispatch::Continue)
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn repository(&self) -> &CommandRepository {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut CommandRepository {
        &mut self.repository
    }
}

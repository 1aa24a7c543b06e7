//! Contains the command abstraction and the concrete clock commands.
//!
//! A command is a self-contained unit of work that owns everything it needs
//! to apply one state change to the model. Commands are cloned out of the
//! repository and moved into the undo/redo coordinator, which becomes their
//! only owner.

pub mod update;

use crate::error::Result;
use crate::model::ModelProxy;
use std::fmt;

pub use update::{UpdateCommand, UpdateCommandFactory};

/// An executable, undoable, cloneable unit of state change.
pub trait Command: Send + Sync + fmt::Debug {
    /// A short name for logs and diagnostics.
    fn name(&self) -> &str;

    /// The static help line shown by the repository.
    fn help_message(&self) -> &'static str;

    /// Returns an independent deep copy.
    fn clone_box(&self) -> Box<dyn Command>;

    /// The state-mutating action.
    fn execute_impl(&self, model: &mut ModelProxy) -> Result<()>;

    /// Reverts the most recent execution. The reverting policy is command-specific.
    fn undo_impl(&self, model: &mut ModelProxy) -> Result<()>;

    /// Runs before `execute_impl`. No-op by default.
    fn check_precondition(&self) -> Result<()> {
        Ok(())
    }

    /// Runs after `execute_impl`. No-op by default.
    fn check_postcondition(&self, _model: &ModelProxy) -> Result<()> {
        Ok(())
    }

    /// Checks the precondition, applies the command, then checks the postcondition.
    fn execute(&self, model: &mut ModelProxy) -> Result<()> {
        self.check_precondition()?;
        self.execute_impl(model)?;
        self.check_postcondition(model)
    }

    fn undo(&self, model: &mut ModelProxy) -> Result<()> {
        self.undo_impl(model)
    }
}

impl Clone for Box<dyn Command> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Builds commands on demand.
pub trait CommandFactory {
    fn create(&self) -> Box<dyn Command>;
}

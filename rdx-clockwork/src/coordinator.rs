//! The undo/redo coordinator and its storage strategies.
//!
//! Undo is apply-based: undoing a command moves it to the redo side and then
//! re-executes the command that is now on top of the undo side. The popped
//! command's own `undo` is never called. This restores the visible state for
//! idempotent commands such as `UpdateCommand`, and is unsound for anything
//! that is not an idempotent recomputation.
//!
//! History is linear. Executing a new command abandons everything that could
//! have been redone.

use crate::commands::Command;
use crate::config::StrategyKind;
use crate::error::Result;
use crate::model::ModelProxy;
use std::fmt;
use tracing::debug;

/// The storage and ordering policy behind a `Coordinator`.
pub trait UndoRedoStrategy: Send + Sync {
    /// Executes `command` and records it. On failure nothing is recorded.
    fn execute_command(&mut self, command: Box<dyn Command>, model: &mut ModelProxy) -> Result<()>;
    fn undo(&mut self, model: &mut ModelProxy) -> Result<()>;
    fn redo(&mut self, model: &mut ModelProxy) -> Result<()>;
    fn undo_len(&self) -> usize;
    fn redo_len(&self) -> usize;
    /// Drops every recorded command.
    fn clear(&mut self);
}

/// Two LIFO stacks.
#[derive(Debug, Default)]
pub struct StackStrategy {
    undo_stack: Vec<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
}

impl UndoRedoStrategy for StackStrategy {
    fn execute_command(&mut self, command: Box<dyn Command>, model: &mut ModelProxy) -> Result<()> {
        command.execute(model)?;
        self.undo_stack.push(command);
        self.redo_stack.clear();
        Ok(())
    }

    fn undo(&mut self, model: &mut ModelProxy) -> Result<()> {
        let Some(command) = self.undo_stack.pop() else {
            return Ok(());
        };
        self.redo_stack.push(command);
        if let Some(previous) = self.undo_stack.last() {
            previous.execute(model)?;
        }
        Ok(())
    }

    fn redo(&mut self, model: &mut ModelProxy) -> Result<()> {
        let Some(command) = self.redo_stack.pop() else {
            return Ok(());
        };
        if let Err(err) = command.execute(model) {
            self.redo_stack.push(command);
            return Err(err);
        }
        self.undo_stack.push(command);
        Ok(())
    }

    fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// A single history list with a cursor. Entries before the cursor are
/// undoable, entries from the cursor on are redoable.
#[derive(Debug, Default)]
pub struct HistoryListStrategy {
    history: Vec<Box<dyn Command>>,
    cursor: usize,
}

impl UndoRedoStrategy for HistoryListStrategy {
    fn execute_command(&mut self, command: Box<dyn Command>, model: &mut ModelProxy) -> Result<()> {
        command.execute(model)?;
        self.history.truncate(self.cursor);
        self.history.push(command);
        self.cursor = self.history.len();
        Ok(())
    }

    fn undo(&mut self, model: &mut ModelProxy) -> Result<()> {
        if self.cursor == 0 {
            return Ok(());
        }
        self.cursor -= 1;
        if self.cursor > 0 {
            self.history[self.cursor - 1].execute(model)?;
        }
        Ok(())
    }

    fn redo(&mut self, model: &mut ModelProxy) -> Result<()> {
        if let Some(command) = self.history.get(self.cursor) {
            command.execute(model)?;
            self.cursor += 1;
        }
        Ok(())
    }

    fn undo_len(&self) -> usize {
        self.cursor
    }

    fn redo_len(&self) -> usize {
        self.history.len() - self.cursor
    }

    fn clear(&mut self) {
        self.history.clear();
        self.cursor = 0;
    }
}

/// Executes commands and coordinates undo/redo through a pluggable strategy.
pub struct Coordinator {
    kind: StrategyKind,
    strategy: Box<dyn UndoRedoStrategy>,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("kind", &self.kind)
            .field("undo_len", &self.undo_len())
            .field("redo_len", &self.redo_len())
            .finish()
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(StrategyKind::Stack)
    }
}

impl Coordinator {
    pub fn new(kind: StrategyKind) -> Self {
        let strategy: Box<dyn UndoRedoStrategy> = match kind {
            StrategyKind::Stack => Box::new(StackStrategy::default()),
            StrategyKind::List => Box::new(HistoryListStrategy::default()),
        };
        Self { kind, strategy }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Takes ownership of `command`, executes it and clears the redo history.
    pub fn execute_command(&mut self, command: Box<dyn Command>, model: &mut ModelProxy) -> Result<()> {
        debug!("Executing {:?}", command);
        self.strategy.execute_command(command, model)
    }

    /// Moves the last command to the redo side and re-applies the one before it.
    pub fn undo(&mut self, model: &mut ModelProxy) -> Result<()> {
        debug!("Undo (undo={}, redo={})", self.undo_len(), self.redo_len());
        self.strategy.undo(model)
    }

    /// Re-applies the most recently undone command.
    pub fn redo(&mut self, model: &mut ModelProxy) -> Result<()> {
        debug!("Redo (undo={}, redo={})", self.undo_len(), self.redo_len());
        self.strategy.redo(model)
    }

    pub fn undo_len(&self) -> usize {
        self.strategy.undo_len()
    }

    pub fn redo_len(&self) -> usize {
        self.strategy.redo_len()
    }

    pub fn clear(&mut self) {
        self.strategy.clear();
    }
}

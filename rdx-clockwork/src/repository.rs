//! A name-to-prototype registry of commands.
//!
//! The repository never hands out its stored prototypes. Lookups return a
//! fresh clone that the caller owns outright.

use crate::commands::Command;
use crate::error::{ClockError, Result};
use std::collections::{BTreeSet, HashMap};
use std::io::{self, Write};
use tracing::debug;

#[derive(Debug, Default)]
pub struct CommandRepository {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `command` as the prototype for `name`.
    pub fn register_command(&mut self, name: &str, command: Box<dyn Command>) -> Result<()> {
        if self.has_key(name) {
            return Err(ClockError::DuplicateCommand(name.to_string()));
        }
        debug!("Registered command '{}'", name);
        self.commands.insert(name.to_string(), command);
        Ok(())
    }

    /// Removes the prototype for `name` and hands ownership back.
    pub fn deregister_command(&mut self, name: &str) -> Option<Box<dyn Command>> {
        self.commands.remove(name)
    }

    /// Returns a clone of the prototype for `name`, or `None` if it is unknown.
    pub fn get_command_by_name(&self, name: &str) -> Option<Box<dyn Command>> {
        self.commands.get(name).map(|command| command.clone_box())
    }

    pub fn has_key(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn count(&self) -> usize {
        self.commands.len()
    }

    pub fn command_names(&self) -> BTreeSet<String> {
        self.commands.keys().cloned().collect()
    }

    /// Writes `"<name>: <help>"`, or a fallback line when `name` is unknown.
    pub fn print_help(&self, name: &str, out: &mut impl Write) -> io::Result<()> {
        match self.commands.get(name) {
            Some(command) => writeln!(out, "{}: {}", name, command.help_message()),
            None => writeln!(out, "{}: no help entry found", name),
        }
    }

    pub fn clear_all_commands(&mut self) {
        self.commands.clear();
    }
}

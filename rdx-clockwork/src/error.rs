//! Error types shared by every Clockwork component.
//!
//! All failures are synchronous and propagate to the caller. None of them
//! are retried internally. `UnknownCommand` is the only one the dispatcher
//! reports to the user surface instead of returning.

use thiserror::Error;

/// The error type for the Clockwork core.
#[derive(Debug, Error)]
pub enum ClockError {
    /// An operation named an event that was never registered.
    #[error("Event with name '{0}' not supported")]
    UnknownEvent(String),

    /// `register_event` was called twice for the same name.
    #[error("Event '{0}' already registered")]
    DuplicateEvent(String),

    /// An observer with the same name is already subscribed to the event.
    #[error("Observer '{observer}' is already registered for '{event}'")]
    DuplicateObserver { event: String, observer: String },

    /// The observer to remove is not subscribed to the event.
    #[error("Observer '{observer}' not found registered for '{event}'")]
    ObserverNotFound { event: String, observer: String },

    /// A prototype is already stored under this command name.
    #[error("Command {0} already registered")]
    DuplicateCommand(String),

    /// A time string token was missing or was not an integer.
    #[error("cannot convert time '{input}': {reason}")]
    Conversion { input: String, reason: String },

    /// The dispatcher could not resolve a command name.
    #[error("Command {0} is not a known command")]
    UnknownCommand(String),

    /// The configuration could not be loaded or deserialized.
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl ClockError {
    pub(crate) fn conversion(input: &str, reason: impl Into<String>) -> Self {
        Self::Conversion {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// A `Result` alias using [`ClockError`].
pub type Result<T> = std::result::Result<T, ClockError>;

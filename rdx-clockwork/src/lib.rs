//! # Clockwork
//!
//! An observer-driven clock core with command undo/redo.
//!
//! Clockwork turns raw input (a timer tick or a line typed by a user) into
//! commands, runs them through an undo/redo coordinator, and pushes the
//! resulting clock-hand angles to any number of views over a named-event bus.
//!
//! ## Core Concepts
//!
//! - **Publisher**: A named-event registry. Observers subscribe under an event
//!   name and receive shared, read-only `Payload`s.
//! - **Commands**: Cloneable units of work with pre/post-condition hooks.
//!   The `CommandRepository` stores prototypes and only hands out clones.
//! - **Coordinator**: Executes commands and keeps a linear undo/redo history
//!   behind a pluggable `UndoRedoStrategy`. Undo re-applies the previous
//!   command rather than inverting the last one.
//! - **ModelProxy**: Owns the three hands and computes their angles from a
//!   `"<hour> <minute> <second>"` string.
//! - **Dispatcher**: Interprets `(command, sender)` pairs: `exit`, `undo`,
//!   `redo`, and timer input.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use clockwork::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // 1. Create a default configuration.
//!     let config = ClockConfig::default();
//!
//!     // 2. Build the app, rendering to the terminal.
//!     let mut app = ClockApp::new(&config, Arc::new(TerminalView))?;
//!
//!     // 3. Feed it input, exactly as the timer would.
//!     app.input_entered("10 30 15", TIMER_SENDER)?;
//!     app.input_entered("undo", "")?;
//!
//!     // 4. Or let the timer drive it. It will shut down on Ctrl+C.
//!     let timer = ClockTimer::new(&config);
//!     run_until_ctrl_c(app.into_shared(), timer).await?;
//!
//!     Ok(())
//! }
//! ```

pub const ENGINE_NAME: &str = "Clockwork";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Declare all the modules in the crate.
pub mod app;
pub mod commands;
pub mod common;
pub mod config;
pub mod coordinator;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod model;
pub mod publisher;
pub mod repository;
pub mod timer;
pub mod view;

/// A prelude module for easy importing of the most common Clockwork types.
pub mod prelude {
    pub use crate::app::{run_until_ctrl_c, ClockApp, SharedApp};
    pub use crate::commands::{Command, CommandFactory, UpdateCommand, UpdateCommandFactory};
    pub use crate::common::{
        ObserverId, ADAM_ERROR, EXIT, INPUT_ENTERED, REDO, RESULT_AVAILABLE, TIMER_SENDER, UNDO,
    };
    pub use crate::config::{ClockConfig, ClockResolution, StrategyKind};
    pub use crate::coordinator::{Coordinator, UndoRedoStrategy};
    pub use crate::dispatcher::{CommandDispatcher, Dispatch};
    pub use crate::error::{ClockError, Result};
    pub use crate::events::{ModelErrorData, ModelOutputData, Payload, UserInputData};
    pub use crate::model::{ModelProxy, Rectangle};
    pub use crate::publisher::{Observer, Publisher};
    pub use crate::repository::CommandRepository;
    pub use crate::timer::ClockTimer;
    pub use crate::view::{TerminalView, UserInteraction};
}

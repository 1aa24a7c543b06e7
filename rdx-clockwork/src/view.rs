//! User-facing surfaces and the observers that feed them.
//!
//! A view receives plain messages from the dispatcher and model payloads
//! from the publisher bus. `TerminalView` renders both to stdout.

use crate::events::{Payload, UserInputData};
use crate::publisher::Observer;
use colored::Colorize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// A surface that can show output to the user.
pub trait UserInteraction: Send + Sync {
    /// Shows a plain text message, e.g. an unknown-command notice.
    fn send_message(&self, message: &str);

    /// Shows a payload published by the model.
    fn send_output(&self, payload: &Payload);
}

/// Renders the clock to the terminal, one line per hand update.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalView;

impl TerminalView {
    /// The line printed for `payload`, without colors.
    pub fn render(payload: &Payload) -> String {
        match payload {
            Payload::ModelOutput(out) => {
                format!("{} {} new angle: {}", out.shape_name, out.rectangle, out.angle)
            }
            Payload::ModelError(err) => format!("update '{}' failed: {}", err.input, err.message),
            Payload::Input(input) => format!("input '{}' from '{}'", input.text, input.sender),
            Payload::Message(text) => text.clone(),
        }
    }
}

impl UserInteraction for TerminalView {
    fn send_message(&self, message: &str) {
        println!("{} {}", "-->".dimmed(), message.yellow());
    }

    fn send_output(&self, payload: &Payload) {
        let line = Self::render(payload);
        match payload {
            Payload::ModelError(_) => println!("{} {}", "<--".dimmed(), line.red()),
            _ => println!("{} {}", "<--".dimmed(), line.cyan()),
        }
    }
}

/// Forwards model payloads to a view.
pub struct ModelObserver {
    ui: Arc<dyn UserInteraction>,
}

impl ModelObserver {
    pub const NAME: &'static str = "ModelObserver";

    pub fn new(ui: Arc<dyn UserInteraction>) -> Self {
        Self { ui }
    }
}

impl Observer for ModelObserver {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn notify(&self, payload: Arc<Payload>) {
        self.ui.send_output(&payload);
    }
}

/// Forwards entered input back to the owner of the dispatcher.
///
/// The observer only queues; the dispatcher drains the queue on its own
/// thread of control, so state is never mutated from inside a notify.
pub struct InputObserver {
    sender: mpsc::UnboundedSender<UserInputData>,
}

impl InputObserver {
    pub const NAME: &'static str = "UserInterfaceObserver";

    pub fn new(sender: mpsc::UnboundedSender<UserInputData>) -> Self {
        Self { sender }
    }
}

impl Observer for InputObserver {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn notify(&self, payload: Arc<Payload>) {
        match payload.as_ref() {
            Payload::Input(input) => {
                if let Err(e) = self.sender.send(input.clone()) {
                    warn!("{} dropped input '{}': {}", Self::NAME, e.0.text, e);
                }
            }
            other => warn!("{} ignored a non-input payload: {:?}", Self::NAME, other),
        }
    }
}

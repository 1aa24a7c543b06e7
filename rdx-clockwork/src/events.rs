//! Defines every payload that travels over the publisher bus.
//!
//! Payloads form a closed set. Observers match on the variant they care
//! about and ignore the rest, so a view never needs to know the concrete
//! type of the component that published.

use crate::model::Rectangle;

/// A payload delivered to observers by `Publisher::notify`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A hand was rotated by the model.
    ModelOutput(ModelOutputData),
    /// A model update failed.
    ModelError(ModelErrorData),
    /// Raw input entered on a user interface.
    Input(UserInputData),
    /// A plain text message for the user.
    Message(String),
}

/// The result of recomputing one hand.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutputData {
    /// The model key of the hand, e.g. `hoursHand`.
    pub shape_name: String,
    /// The hand's bounds before rotation.
    pub rectangle: Rectangle,
    /// The rotation angle in degrees.
    pub angle: f32,
}

/// Published under `AdamError` when the model rejects a time string.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelErrorData {
    pub input: String,
    pub message: String,
}

/// Input captured by a user interface together with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInputData {
    pub text: String,
    /// Who produced the input. The timer uses `"timer"`; interactive
    /// surfaces use their own name or an empty string.
    pub sender: String,
}

impl UserInputData {
    pub fn new(text: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: sender.into(),
        }
    }
}

//! Contains common, primitive types shared across the crate.
//!
//! This module defines the process-wide event names and special tokens used
//! by the publisher bus and the command dispatcher, along with the key type
//! that identifies a subscription.

use slotmap::new_key_type;

new_key_type! {
    /// Uniquely identifies one subscription on the publisher bus.
    ///
    /// The key is returned by `Publisher::subscribe` and is never reused,
    /// even after the observer is unsubscribed.
    pub struct ObserverId;
}

/// Event published by the model proxy when new hand angles are available.
pub const RESULT_AVAILABLE: &str = "result available";

/// Event published by the model proxy when an update fails.
pub const ADAM_ERROR: &str = "AdamError";

/// Event published by a user interface when input was entered.
pub const INPUT_ENTERED: &str = "Input entered";

/// Dispatcher token that ends the input loop.
pub const EXIT: &str = "exit";
/// Dispatcher token that undoes the last command.
pub const UNDO: &str = "undo";
/// Dispatcher token that redoes the last undone command.
pub const REDO: &str = "redo";
/// Sender name used by the clock timer.
pub const TIMER_SENDER: &str = "timer";

/// Names of the three clock hands held by the model.
pub const HOURS_HAND: &str = "hoursHand";
pub const MINUTES_HAND: &str = "minutesHand";
pub const SECONDS_HAND: &str = "secondsHand";

//! The clock model: hand shapes and the angle computation.
//!
//! `ModelProxy` is the only owner of hand state. It recomputes the hand
//! angles from a `"<hour> <minute> <second>"` string and pushes the results
//! to subscribed views through its own publisher.

use crate::common::{ObserverId, ADAM_ERROR, HOURS_HAND, MINUTES_HAND, RESULT_AVAILABLE, SECONDS_HAND};
use crate::config::HandsConfig;
use crate::error::{ClockError, Result};
use crate::events::{ModelErrorData, ModelOutputData, Payload};
use crate::publisher::{Observer, Publisher};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Axis-aligned bounds of a hand, in device-independent pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Rectangle {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rectangle {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{},{})", self.left, self.top, self.right, self.bottom)
    }
}

/// Hand name and the number of units in one full turn, in token order.
const HANDS: [(&str, u32); 3] = [(HOURS_HAND, 12), (MINUTES_HAND, 60), (SECONDS_HAND, 60)];

/// Holds the named hand shapes and publishes recomputed angles.
#[derive(Debug)]
pub struct ModelProxy {
    publisher: Publisher,
    shapes: BTreeMap<String, Rectangle>,
    last_angles: BTreeMap<String, f32>,
}

impl ModelProxy {
    /// Creates the model with its `result available` and `AdamError` events registered.
    pub fn new(hands: &HandsConfig) -> Result<Self> {
        let mut publisher = Publisher::new();
        publisher.register_event(RESULT_AVAILABLE)?;
        publisher.register_event(ADAM_ERROR)?;

        let mut shapes = BTreeMap::new();
        shapes.insert(HOURS_HAND.to_string(), hands.hours);
        shapes.insert(MINUTES_HAND.to_string(), hands.minutes);
        shapes.insert(SECONDS_HAND.to_string(), hands.seconds);

        Ok(Self {
            publisher,
            shapes,
            last_angles: BTreeMap::new(),
        })
    }

    /// Recomputes every hand from `time` and, if `notify` is set, publishes
    /// one `ModelOutputData` per hand under `result available`.
    ///
    /// Tokens are read positionally. A missing or non-integer token stops the
    /// update with `ClockError::Conversion`; hands before it have already been
    /// published. Values are not range-checked or wrapped.
    pub fn update(&mut self, time: &str, notify: bool) -> Result<()> {
        let tokens: Vec<&str> = time.split_whitespace().collect();
        for (index, (hand, period)) in HANDS.iter().enumerate() {
            let Some(rectangle) = self.shapes.get(*hand).copied() else {
                continue;
            };
            let value = match parse_token(time, &tokens, index) {
                Ok(value) => value,
                Err(err) => {
                    warn!("Model update rejected: {}", err);
                    if notify {
                        let data = ModelErrorData {
                            input: time.to_string(),
                            message: err.to_string(),
                        };
                        if let Err(e) = self
                            .publisher
                            .notify(ADAM_ERROR, Arc::new(Payload::ModelError(data)))
                        {
                            warn!("Could not publish the model error: {}", e);
                        }
                    }
                    return Err(err);
                }
            };
            let angle = (360.0 / *period as f32) * value as f32;
            self.last_angles.insert(hand.to_string(), angle);
            debug!("{} -> {} degrees", hand, angle);
            if notify {
                let data = ModelOutputData {
                    shape_name: hand.to_string(),
                    rectangle,
                    angle,
                };
                self.publisher
                    .notify(RESULT_AVAILABLE, Arc::new(Payload::ModelOutput(data)))?;
            }
        }
        Ok(())
    }

    pub fn subscribe(&mut self, event: &str, observer: Box<dyn Observer>) -> Result<ObserverId> {
        self.publisher.subscribe(event, observer)
    }

    pub fn unsubscribe(&mut self, event: &str, observer_name: &str) -> Result<Box<dyn Observer>> {
        self.publisher.unsubscribe(event, observer_name)
    }

    pub fn shape(&self, name: &str) -> Option<&Rectangle> {
        self.shapes.get(name)
    }

    pub fn shapes(&self) -> impl Iterator<Item = (&str, &Rectangle)> {
        self.shapes.iter().map(|(name, rect)| (name.as_str(), rect))
    }

    /// The most recently computed angle of `hand`, if it was ever updated.
    pub fn last_angle(&self, hand: &str) -> Option<f32> {
        self.last_angles.get(hand).copied()
    }
}

fn parse_token(time: &str, tokens: &[&str], index: usize) -> Result<i64> {
    let token = tokens
        .get(index)
        .ok_or_else(|| ClockError::conversion(time, format!("missing token #{}", index + 1)))?;
    token
        .parse::<i64>()
        .map_err(|e| ClockError::conversion(time, format!("token '{}': {}", token, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Collect {
        seen: Arc<Mutex<Vec<Payload>>>,
    }

    impl Observer for Collect {
        fn name(&self) -> &str {
            "collect"
        }

        fn notify(&self, payload: Arc<Payload>) {
            self.seen.lock().unwrap().push((*payload).clone());
        }
    }

    fn model_with_collector(event: &str) -> (ModelProxy, Arc<Mutex<Vec<Payload>>>) {
        let mut model = ModelProxy::new(&HandsConfig::default()).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        model
            .subscribe(event, Box::new(Collect { seen: Arc::clone(&seen) }))
            .unwrap();
        (model, seen)
    }

    fn angles(seen: &Arc<Mutex<Vec<Payload>>>) -> Vec<(String, f32)> {
        seen.lock()
            .unwrap()
            .iter()
            .filter_map(|p| match p {
                Payload::ModelOutput(out) => Some((out.shape_name.clone(), out.angle)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn publishes_three_angles_in_hand_order() {
        let (mut model, seen) = model_with_collector(RESULT_AVAILABLE);
        model.update("10 30 15", true).unwrap();
        assert_eq!(
            angles(&seen),
            vec![
                (HOURS_HAND.to_string(), 300.0),
                (MINUTES_HAND.to_string(), 180.0),
                (SECONDS_HAND.to_string(), 90.0),
            ]
        );
    }

    #[test]
    fn angles_follow_thirty_and_six_degree_steps() {
        let (mut model, seen) = model_with_collector(RESULT_AVAILABLE);
        for (h, m, s) in [(0, 0, 0), (3, 15, 45), (11, 59, 59), (7, 1, 30)] {
            seen.lock().unwrap().clear();
            model.update(&format!("{h} {m} {s}"), true).unwrap();
            let got: Vec<f32> = angles(&seen).into_iter().map(|(_, a)| a).collect();
            assert_eq!(got, vec![30.0 * h as f32, 6.0 * m as f32, 6.0 * s as f32]);
        }
    }

    #[test]
    fn out_of_range_values_are_not_wrapped() {
        let (mut model, _seen) = model_with_collector(RESULT_AVAILABLE);
        model.update("13 75 -1", true).unwrap();
        assert_eq!(model.last_angle(HOURS_HAND), Some(390.0));
        assert_eq!(model.last_angle(MINUTES_HAND), Some(450.0));
        assert_eq!(model.last_angle(SECONDS_HAND), Some(-6.0));
    }

    #[test]
    fn payload_carries_the_hand_rectangle() {
        let (mut model, seen) = model_with_collector(RESULT_AVAILABLE);
        model.update("1 2 3", true).unwrap();
        let seen = seen.lock().unwrap();
        match &seen[2] {
            Payload::ModelOutput(out) => {
                assert_eq!(out.rectangle, Rectangle::new(10.0, 10.0, 60.0, 20.0));
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn silent_update_still_recomputes() {
        let (mut model, seen) = model_with_collector(RESULT_AVAILABLE);
        model.update("4 0 0", false).unwrap();
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(model.last_angle(HOURS_HAND), Some(120.0));
    }

    #[test]
    fn two_tokens_publish_two_hands_then_fail() {
        let (mut model, seen) = model_with_collector(RESULT_AVAILABLE);
        let err = model.update("1 2", true).unwrap_err();
        assert!(matches!(err, ClockError::Conversion { .. }));
        assert_eq!(angles(&seen).len(), 2);
    }

    #[test]
    fn garbage_token_is_a_conversion_error() {
        let (mut model, _seen) = model_with_collector(RESULT_AVAILABLE);
        assert!(matches!(
            model.update("one 2 3", true),
            Err(ClockError::Conversion { .. })
        ));
        assert_eq!(model.last_angle(HOURS_HAND), None);
    }

    #[test]
    fn failure_is_published_as_adam_error() {
        let (mut model, seen) = model_with_collector(ADAM_ERROR);
        model.update("", true).unwrap_err();
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(matches!(&seen[0], Payload::ModelError(data) if data.input.is_empty()));
    }

    #[test]
    fn default_shapes_match_the_classic_geometry() {
        let model = ModelProxy::new(&HandsConfig::default()).unwrap();
        assert_eq!(model.shape(HOURS_HAND), Some(&Rectangle::new(10.0, 10.0, 20.0, 20.0)));
        assert_eq!(model.shape(MINUTES_HAND), Some(&Rectangle::new(10.0, 10.0, 40.0, 20.0)));
        assert_eq!(model.shapes().count(), 3);
        assert_eq!(Rectangle::new(1.0, 2.0, 3.5, 4.0).to_string(), "(1,2,3.5,4)");
    }
}

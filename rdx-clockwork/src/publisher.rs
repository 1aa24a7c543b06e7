//! A named-event publish/subscribe bus.
//!
//! Events must be registered before anyone can subscribe to or notify them.
//! Observer names are unique per event; the same name may subscribe to
//! several events.
//! Delivery is synchronous and happens on the caller's thread.

use crate::common::ObserverId;
use crate::error::{ClockError, Result};
use crate::events::Payload;
use slotmap::SlotMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A named subscriber that receives payloads from the bus.
pub trait Observer: Send + Sync {
    /// The name this observer is registered under. Must be unique per event.
    fn name(&self) -> &str;

    /// Receives a shared, read-only payload.
    fn notify(&self, payload: Arc<Payload>);
}

/// Registry of events and their observers.
///
/// Every observer lives in one bus-wide slot map, so an `ObserverId` is
/// unique across all events. Each event lists its subscriptions in the
/// order they were made.
#[derive(Default)]
pub struct Publisher {
    observers: SlotMap<ObserverId, Box<dyn Observer>>,
    events: HashMap<String, Vec<ObserverId>>,
}

impl fmt::Debug for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, ids) in &self.events {
            let names: Vec<&str> = ids
                .iter()
                .filter_map(|id| self.observers.get(*id))
                .map(|observer| observer.name())
                .collect();
            map.entry(name, &names);
        }
        map.finish()
    }
}

impl Publisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty subscriber list for `event`.
    pub fn register_event(&mut self, event: &str) -> Result<()> {
        if self.events.contains_key(event) {
            return Err(ClockError::DuplicateEvent(event.to_string()));
        }
        self.events.insert(event.to_string(), Vec::new());
        debug!("Registered event '{}'", event);
        Ok(())
    }

    /// Subscribes `observer` to `event`.
    ///
    /// # Errors
    /// `UnknownEvent` if the event was never registered, `DuplicateObserver`
    /// if an observer with the same name is already subscribed to it.
    pub fn subscribe(&mut self, event: &str, observer: Box<dyn Observer>) -> Result<ObserverId> {
        let ids = self
            .events
            .get_mut(event)
            .ok_or_else(|| ClockError::UnknownEvent(event.to_string()))?;
        let name = observer.name().to_string();
        let taken = ids
            .iter()
            .any(|id| self.observers.get(*id).is_some_and(|o| o.name() == name));
        if taken {
            return Err(ClockError::DuplicateObserver {
                event: event.to_string(),
                observer: name,
            });
        }
        let id = self.observers.insert(observer);
        ids.push(id);
        debug!("Observer '{}' subscribed to '{}'", name, event);
        Ok(id)
    }

    /// Removes the observer called `observer_name` from `event` and hands it back.
    pub fn unsubscribe(&mut self, event: &str, observer_name: &str) -> Result<Box<dyn Observer>> {
        let ids = self
            .events
            .get_mut(event)
            .ok_or_else(|| ClockError::UnknownEvent(event.to_string()))?;
        let position = ids.iter().position(|id| {
            self.observers
                .get(*id)
                .is_some_and(|o| o.name() == observer_name)
        });
        let removed = position.and_then(|pos| self.observers.remove(ids.remove(pos)));
        match removed {
            Some(observer) => {
                debug!("Observer '{}' unsubscribed from '{}'", observer_name, event);
                Ok(observer)
            }
            None => Err(ClockError::ObserverNotFound {
                event: event.to_string(),
                observer: observer_name.to_string(),
            }),
        }
    }

    /// Delivers `payload` to every observer of `event`, in subscription order.
    pub fn notify(&self, event: &str, payload: Arc<Payload>) -> Result<()> {
        let ids = self
            .events
            .get(event)
            .ok_or_else(|| ClockError::UnknownEvent(event.to_string()))?;
        trace!("Notifying {} observer(s) of '{}'", ids.len(), event);
        for observer in ids.iter().filter_map(|id| self.observers.get(*id)) {
            observer.notify(Arc::clone(&payload));
        }
        Ok(())
    }

    pub fn has_event(&self, event: &str) -> bool {
        self.events.contains_key(event)
    }

    /// Registered event names, sorted.
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.events.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of observers subscribed to `event`, or `None` if it is unknown.
    pub fn subscriber_count(&self, event: &str) -> Option<usize> {
        self.events.get(event).map(Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        name: String,
        seen: Arc<Mutex<Vec<Payload>>>,
    }

    impl Recorder {
        fn boxed(name: &str, seen: &Arc<Mutex<Vec<Payload>>>) -> Box<dyn Observer> {
            Box::new(Self {
                name: name.to_string(),
                seen: Arc::clone(seen),
            })
        }
    }

    impl Observer for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        fn notify(&self, payload: Arc<Payload>) {
            self.seen.lock().unwrap().push((*payload).clone());
        }
    }

    fn message(text: &str) -> Arc<Payload> {
        Arc::new(Payload::Message(text.to_string()))
    }

    #[test]
    fn duplicate_event_is_rejected() {
        let mut bus = Publisher::new();
        bus.register_event("tick").unwrap();
        assert!(matches!(
            bus.register_event("tick"),
            Err(ClockError::DuplicateEvent(name)) if name == "tick"
        ));
    }

    #[test]
    fn unknown_event_is_rejected_everywhere() {
        let mut bus = Publisher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        assert!(matches!(
            bus.subscribe("nope", Recorder::boxed("a", &seen)),
            Err(ClockError::UnknownEvent(_))
        ));
        assert!(matches!(
            bus.unsubscribe("nope", "a"),
            Err(ClockError::UnknownEvent(_))
        ));
        assert!(matches!(
            bus.notify("nope", message("x")),
            Err(ClockError::UnknownEvent(_))
        ));
    }

    #[test]
    fn same_observer_name_twice_fails() {
        let mut bus = Publisher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        bus.register_event("tick").unwrap();
        bus.subscribe("tick", Recorder::boxed("view", &seen)).unwrap();
        let err = bus.subscribe("tick", Recorder::boxed("view", &seen)).unwrap_err();
        assert!(matches!(err, ClockError::DuplicateObserver { .. }));
        assert_eq!(bus.subscriber_count("tick"), Some(1));
    }

    #[test]
    fn same_name_under_different_events_is_fine() {
        let mut bus = Publisher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        bus.register_event("a").unwrap();
        bus.register_event("b").unwrap();
        bus.subscribe("a", Recorder::boxed("view", &seen)).unwrap();
        bus.subscribe("b", Recorder::boxed("view", &seen)).unwrap();
    }

    #[test]
    fn distinct_observers_all_receive_notify() {
        let mut bus = Publisher::new();
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));
        bus.register_event("tick").unwrap();
        bus.subscribe("tick", Recorder::boxed("one", &first)).unwrap();
        bus.subscribe("tick", Recorder::boxed("two", &second)).unwrap();

        bus.notify("tick", message("hello")).unwrap();

        assert_eq!(*first.lock().unwrap(), vec![Payload::Message("hello".into())]);
        assert_eq!(*second.lock().unwrap(), vec![Payload::Message("hello".into())]);
    }

    #[test]
    fn notify_without_subscribers_is_a_no_op() {
        let mut bus = Publisher::new();
        bus.register_event("quiet").unwrap();
        bus.notify("quiet", message("x")).unwrap();
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut bus = Publisher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        bus.register_event("tick").unwrap();
        bus.subscribe("tick", Recorder::boxed("view", &seen)).unwrap();

        let removed = bus.unsubscribe("tick", "view").unwrap();
        assert_eq!(removed.name(), "view");
        bus.notify("tick", message("late")).unwrap();
        assert!(seen.lock().unwrap().is_empty());

        assert!(matches!(
            bus.unsubscribe("tick", "view"),
            Err(ClockError::ObserverNotFound { .. })
        ));
    }

    #[test]
    fn ids_are_unique_across_events() {
        let mut bus = Publisher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        bus.register_event("a").unwrap();
        bus.register_event("b").unwrap();
        let x = bus.subscribe("a", Recorder::boxed("x", &seen)).unwrap();
        let y = bus.subscribe("b", Recorder::boxed("y", &seen)).unwrap();
        assert_ne!(x, y);
    }

    #[test]
    fn unsubscribing_from_one_event_keeps_the_other() {
        let mut bus = Publisher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        bus.register_event("a").unwrap();
        bus.register_event("b").unwrap();
        bus.subscribe("a", Recorder::boxed("view", &seen)).unwrap();
        bus.subscribe("b", Recorder::boxed("view", &seen)).unwrap();

        bus.unsubscribe("a", "view").unwrap();
        bus.notify("b", message("still here")).unwrap();
        assert_eq!(bus.subscriber_count("a"), Some(0));
        assert_eq!(*seen.lock().unwrap(), vec![Payload::Message("still here".into())]);
    }

    #[test]
    fn resubscribing_after_removal_issues_a_new_id() {
        let mut bus = Publisher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        bus.register_event("tick").unwrap();
        let first = bus.subscribe("tick", Recorder::boxed("view", &seen)).unwrap();
        bus.unsubscribe("tick", "view").unwrap();
        let second = bus.subscribe("tick", Recorder::boxed("view", &seen)).unwrap();
        assert_ne!(first, second);
    }
}

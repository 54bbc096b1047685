//! Named-event subscribe/unsubscribe/publish registry.
//!
//! The dispatcher decouples the connection layer from its consumers: the
//! connection publishes `connection`, `message`, `error`, and the lowercase
//! type-specific events; the status projection and any other observers
//! subscribe without knowing each other.
//!
//! # Contract
//!
//! - Listeners for one event fire synchronously, in registration order.
//! - Registering the same closure twice is allowed and fires it twice.
//! - A panicking listener is reported and isolated: siblings still run and
//!   the publisher never observes the failure.
//! - No ordering is promised *between* event names.
//!
//! Removal is by the [`ListenerId`] token returned at registration time —
//! the Rust rendition of remove-by-callback-reference, since closures carry
//! no usable identity of their own.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::error;

/// A registered callback.  Payloads are JSON values: the bus is dynamically
/// typed by design, and typed decoding happens before publication.
pub type Listener = Arc<dyn Fn(&Value) + Send + Sync + 'static>;

/// Token identifying one registration on one event name.
///
/// Tokens are unique across the dispatcher's lifetime, so unsubscribing with
/// a stale or foreign token is a harmless no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: HashMap<String, Vec<(ListenerId, Listener)>>,
}

/// The event registry shared by all publishers and subscribers.
#[derive(Default)]
pub struct EventDispatcher {
    registry: Mutex<Registry>,
}

impl EventDispatcher {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for `event` and returns its removal token.
    pub fn subscribe(
        &self,
        event: &str,
        listener: impl Fn(&Value) + Send + Sync + 'static,
    ) -> ListenerId {
        self.subscribe_arc(event, Arc::new(listener))
    }

    /// Registers an already-shared listener.  The same `Arc` may be
    /// registered any number of times; each registration fires separately,
    /// in order.
    pub fn subscribe_arc(&self, event: &str, listener: Listener) -> ListenerId {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        registry.next_id += 1;
        let id = ListenerId(registry.next_id);
        registry
            .listeners
            .entry(event.to_string())
            .or_default()
            .push((id, listener));
        id
    }

    /// Removes the registration identified by `id` from `event`.
    ///
    /// Unknown event names and unknown tokens are silent no-ops.
    pub fn unsubscribe(&self, event: &str, id: ListenerId) {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(list) = registry.listeners.get_mut(event) {
            if let Some(pos) = list.iter().position(|(lid, _)| *lid == id) {
                list.remove(pos);
            }
            if list.is_empty() {
                registry.listeners.remove(event);
            }
        }
    }

    /// Invokes every listener currently registered for `event`, in
    /// registration order, passing `payload` to each.
    ///
    /// The listener list is snapshotted up front, so listeners may subscribe
    /// or unsubscribe from within a callback without deadlocking; such
    /// changes take effect from the next publication.
    pub fn publish(&self, event: &str, payload: &Value) {
        let snapshot: Vec<Listener> = {
            let registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
            match registry.listeners.get(event) {
                Some(list) => list.iter().map(|(_, l)| Arc::clone(l)).collect(),
                None => return,
            }
        };

        for listener in snapshot {
            // One bad listener must never take down its siblings or the
            // publisher.
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| listener(payload))) {
                error!(event, "listener panicked: {}", panic_message(panic.as_ref()));
            }
        }
    }

    /// Number of registrations currently held for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        let registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        registry.listeners.get(event).map_or(0, Vec::len)
    }
}

/// Extracts a human-readable message from a panic payload.
fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "<non-string panic payload>"
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_publish_invokes_listeners_in_registration_order() {
        // Arrange
        let dispatcher = EventDispatcher::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            dispatcher.subscribe("connection", move |_| {
                order.lock().unwrap().push(tag);
            });
        }

        // Act
        dispatcher.publish("connection", &json!({"connected": true}));

        // Assert
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_duplicate_registration_fires_twice_in_order() {
        let dispatcher = EventDispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_l = Arc::clone(&hits);
        let listener: Listener = Arc::new(move |_| {
            hits_l.fetch_add(1, Ordering::SeqCst);
        });
        let first = dispatcher.subscribe_arc("message", Arc::clone(&listener));
        let _second = dispatcher.subscribe_arc("message", listener);

        dispatcher.publish("message", &json!({}));
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        // Removing one registration leaves the other live.
        dispatcher.unsubscribe("message", first);
        dispatcher.publish("message", &json!({}));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unsubscribed_listener_is_never_invoked_again() {
        let dispatcher = EventDispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_l = Arc::clone(&hits);
        let id = dispatcher.subscribe("status_update", move |_| {
            hits_l.fetch_add(1, Ordering::SeqCst);
        });

        dispatcher.publish("status_update", &json!({}));
        dispatcher.unsubscribe("status_update", id);
        dispatcher.publish("status_update", &json!({}));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_unknown_event_or_token_is_a_noop() {
        let dispatcher = EventDispatcher::new();
        let id = dispatcher.subscribe("connection", |_| {});

        // Wrong event name, then a token that was never issued for it.
        dispatcher.unsubscribe("no_such_event", id);
        dispatcher.unsubscribe("connection", ListenerId(9999));

        assert_eq!(dispatcher.listener_count("connection"), 1);
    }

    #[test]
    fn test_publish_with_no_listeners_is_a_noop() {
        let dispatcher = EventDispatcher::new();
        dispatcher.publish("nobody_home", &json!({"ignored": true}));
    }

    #[test]
    fn test_panicking_listener_does_not_stop_siblings() {
        let dispatcher = EventDispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let before = Arc::clone(&hits);
        dispatcher.subscribe("error", move |_| {
            before.fetch_add(1, Ordering::SeqCst);
        });
        dispatcher.subscribe("error", |_| panic!("listener blew up"));
        let after = Arc::clone(&hits);
        dispatcher.subscribe("error", move |_| {
            after.fetch_add(1, Ordering::SeqCst);
        });

        // The publisher must not observe the panic either.
        dispatcher.publish("error", &json!({"reason": "test"}));

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_listener_receives_the_published_payload() {
        let dispatcher = EventDispatcher::new();
        let seen = Arc::new(Mutex::new(None));

        let seen_l = Arc::clone(&seen);
        dispatcher.subscribe("connection", move |payload| {
            *seen_l.lock().unwrap() = Some(payload.clone());
        });

        dispatcher.publish("connection", &json!({"connected": false}));

        assert_eq!(
            seen.lock().unwrap().take(),
            Some(json!({"connected": false}))
        );
    }

    #[test]
    fn test_events_are_isolated_by_name() {
        let dispatcher = EventDispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_l = Arc::clone(&hits);
        dispatcher.subscribe("connection", move |_| {
            hits_l.fetch_add(1, Ordering::SeqCst);
        });

        dispatcher.publish("message", &json!({}));

        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_may_unsubscribe_itself_during_publish() {
        // The snapshot makes self-removal safe; the removal applies from the
        // next publication.
        let dispatcher = Arc::new(EventDispatcher::new());
        let hits = Arc::new(AtomicUsize::new(0));

        let d = Arc::clone(&dispatcher);
        let hits_l = Arc::clone(&hits);
        let id_cell = Arc::new(Mutex::new(None::<ListenerId>));
        let id_cell_l = Arc::clone(&id_cell);
        let id = dispatcher.subscribe("once", move |_| {
            hits_l.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = id_cell_l.lock().unwrap().take() {
                d.unsubscribe("once", id);
            }
        });
        *id_cell.lock().unwrap() = Some(id);

        dispatcher.publish("once", &json!({}));
        dispatcher.publish("once", &json!({}));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}

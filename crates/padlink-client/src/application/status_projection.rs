//! UI-facing projection of connection and lobby status.
//!
//! The presentation layer (status dot, occupancy counters) never talks to the
//! connection directly: it reads a snapshot that this projection keeps
//! current by listening on the dispatcher.  One more subscriber could be
//! added or removed without either side knowing.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::debug;

use padlink_core::dispatch::{EventDispatcher, ListenerId};
use padlink_core::protocol::messages::{ServerMessage, EVENT_CONNECTION, EVENT_STATUS_UPDATE};

/// Presentational snapshot: connectivity plus lobby occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    /// Current connection state, as last published.
    pub connected: bool,
    /// Number of games registered with the server.
    pub games: u32,
    /// Number of controllers connected to the server.
    pub controllers: u32,
}

/// Dispatcher-fed holder of the latest [`StatusSnapshot`].
pub struct StatusProjection {
    dispatcher: Arc<EventDispatcher>,
    snapshot: Arc<Mutex<StatusSnapshot>>,
    subscriptions: Vec<(&'static str, ListenerId)>,
}

impl StatusProjection {
    /// Subscribes to `connection` and `status_update` on `dispatcher`.
    pub fn attach(dispatcher: Arc<EventDispatcher>) -> Self {
        let snapshot = Arc::new(Mutex::new(StatusSnapshot::default()));

        let conn_snapshot = Arc::clone(&snapshot);
        let conn_id = dispatcher.subscribe(EVENT_CONNECTION, move |payload: &Value| {
            if let Some(connected) = payload.get("connected").and_then(Value::as_bool) {
                conn_snapshot
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .connected = connected;
            }
        });

        let status_snapshot = Arc::clone(&snapshot);
        let status_id = dispatcher.subscribe(EVENT_STATUS_UPDATE, move |payload: &Value| {
            // The type-specific event carries the full frame; decode it with
            // the shared protocol type rather than poking at fields.
            match serde_json::from_value::<ServerMessage>(payload.clone()) {
                Ok(ServerMessage::StatusUpdate { status }) => {
                    let mut snap = status_snapshot.lock().unwrap_or_else(|e| e.into_inner());
                    snap.games = status.games;
                    snap.controllers = status.controllers;
                }
                Ok(_) | Err(_) => {
                    debug!("ignoring status_update payload with unexpected shape");
                }
            }
        });

        Self {
            dispatcher,
            snapshot,
            subscriptions: vec![(EVENT_CONNECTION, conn_id), (EVENT_STATUS_UPDATE, status_id)],
        }
    }

    /// The latest snapshot.
    pub fn snapshot(&self) -> StatusSnapshot {
        *self.snapshot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Removes this projection's listeners from the dispatcher.
    ///
    /// Called automatically on drop; safe to call more than once.
    pub fn detach(&mut self) {
        for (event, id) in self.subscriptions.drain(..) {
            self.dispatcher.unsubscribe(event, id);
        }
    }
}

impl Drop for StatusProjection {
    fn drop(&mut self) {
        self.detach();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Channel-scripted transport for tests.
//!
//! [`MockConnector`] stands in for the WebSocket dialer: each dial either
//! succeeds with an in-memory [`MockTransport`] or fails on cue.  For every
//! accepted dial the test receives a [`MockRemote`] — the "server side" of
//! the connection — on which it can inject inbound frames, force errors and
//! closes, and inspect everything the client sent.
//!
//! Shipped as a regular module (not `#[cfg(test)]`) so both the unit tests
//! and the integration tests in `tests/` can drive it.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{Transport, TransportConnector, TransportError, TransportEvent};

/// Behaviour of one scripted dial attempt.
#[derive(Debug, Clone)]
pub enum DialScript {
    /// The dial succeeds and yields a live [`MockTransport`].
    Accept,
    /// The dial fails with the given reason.
    Refuse(String),
}

/// The test-facing side of one accepted mock connection.
pub struct MockRemote {
    event_tx: mpsc::UnboundedSender<TransportEvent>,
    sent_rx: mpsc::UnboundedReceiver<String>,
    closed_by_client: Arc<AtomicBool>,
}

impl MockRemote {
    /// Delivers one inbound text frame to the client.
    pub fn push_text(&self, frame: &str) {
        self.push_event(TransportEvent::Message(frame.to_string()));
    }

    /// Delivers a raw transport event to the client.
    pub fn push_event(&self, event: TransportEvent) {
        // The client may already have dropped the transport; that is fine.
        let _ = self.event_tx.send(event);
    }

    /// Simulates the server (or network) dropping the connection.
    pub fn close(&self) {
        self.push_event(TransportEvent::Closed);
    }

    /// Waits for the next frame the client sent on this connection.
    pub async fn next_sent(&mut self) -> Option<String> {
        self.sent_rx.recv().await
    }

    /// Non-blocking check for an already-transmitted frame.
    pub fn try_next_sent(&mut self) -> Option<String> {
        self.sent_rx.try_recv().ok()
    }

    /// `true` once the client has called [`Transport::close`] on its side.
    pub fn closed_by_client(&self) -> bool {
        self.closed_by_client.load(Ordering::SeqCst)
    }
}

/// Scripted stand-in for the WebSocket dialer.
pub struct MockConnector {
    scripts: Mutex<VecDeque<DialScript>>,
    dials: AtomicUsize,
    remote_tx: mpsc::UnboundedSender<MockRemote>,
}

impl MockConnector {
    /// Creates a connector plus the receiver on which the test obtains one
    /// [`MockRemote`] per accepted dial.  With no scripts queued, every dial
    /// is accepted.
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<MockRemote>) {
        let (remote_tx, remote_rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                scripts: Mutex::new(VecDeque::new()),
                dials: AtomicUsize::new(0),
                remote_tx,
            }),
            remote_rx,
        )
    }

    /// Queues behaviour for the next dial attempts, consumed in order.
    pub fn script(&self, script: DialScript) {
        self.scripts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(script);
    }

    /// Number of dial attempts made so far (accepted or refused).
    pub fn dial_count(&self) -> usize {
        self.dials.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransportConnector for MockConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, TransportError> {
        self.dials.fetch_add(1, Ordering::SeqCst);

        let script = self
            .scripts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(DialScript::Accept);

        match script {
            DialScript::Refuse(reason) => Err(TransportError::Dial {
                url: url.to_string(),
                reason,
            }),
            DialScript::Accept => {
                let (event_tx, event_rx) = mpsc::unbounded_channel();
                let (sent_tx, sent_rx) = mpsc::unbounded_channel();
                let closed_by_client = Arc::new(AtomicBool::new(false));

                let remote = MockRemote {
                    event_tx,
                    sent_rx,
                    closed_by_client: Arc::clone(&closed_by_client),
                };
                // If the test dropped the remote receiver it does not care
                // about this connection; the transport still works.
                let _ = self.remote_tx.send(remote);

                Ok(Box::new(MockTransport {
                    events: event_rx,
                    sent: sent_tx,
                    closed: false,
                    closed_by_client,
                }))
            }
        }
    }
}

/// The client side of one scripted connection.
pub struct MockTransport {
    events: mpsc::UnboundedReceiver<TransportEvent>,
    sent: mpsc::UnboundedSender<String>,
    closed: bool,
    closed_by_client: Arc<AtomicBool>,
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, frame: String) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Io("transport closed".to_string()));
        }
        self.sent
            .send(frame)
            .map_err(|_| TransportError::Io("remote receiver dropped".to_string()))
    }

    async fn next_event(&mut self) -> Option<TransportEvent> {
        if self.closed {
            return None;
        }
        match self.events.recv().await {
            Some(TransportEvent::Closed) | None => {
                self.closed = true;
                Some(TransportEvent::Closed)
            }
            Some(event) => Some(event),
        }
    }

    async fn close(&mut self) {
        self.closed = true;
        self.closed_by_client.store(true, Ordering::SeqCst);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_accepted_dial_yields_a_paired_remote() {
        // Arrange
        let (connector, mut remotes) = MockConnector::new();

        // Act
        let mut transport = connector.connect("ws://mock").await.unwrap();
        let mut remote = remotes.recv().await.unwrap();

        // Assert: frames flow both ways through the pair
        transport.send("hello".to_string()).await.unwrap();
        assert_eq!(remote.next_sent().await.unwrap(), "hello");

        remote.push_text("world");
        assert_eq!(
            transport.next_event().await,
            Some(TransportEvent::Message("world".to_string()))
        );
    }

    #[tokio::test]
    async fn test_refused_dial_returns_dial_error() {
        let (connector, _remotes) = MockConnector::new();
        connector.script(DialScript::Refuse("connection refused".to_string()));

        let result = connector.connect("ws://mock").await;

        assert!(matches!(result, Err(TransportError::Dial { .. })));
        assert_eq!(connector.dial_count(), 1);
    }

    #[tokio::test]
    async fn test_close_event_then_silence() {
        let (connector, mut remotes) = MockConnector::new();
        let mut transport = connector.connect("ws://mock").await.unwrap();
        let remote = remotes.recv().await.unwrap();

        remote.close();

        assert_eq!(transport.next_event().await, Some(TransportEvent::Closed));
        assert_eq!(transport.next_event().await, None);
    }

    #[tokio::test]
    async fn test_client_side_close_is_visible_to_the_remote() {
        let (connector, mut remotes) = MockConnector::new();
        let mut transport = connector.connect("ws://mock").await.unwrap();
        let remote = remotes.recv().await.unwrap();

        assert!(!remote.closed_by_client());
        transport.close().await;
        assert!(remote.closed_by_client());
    }
}

//! The resilient connection client.
//!
//! One actor task owns the transport, the connection state, and the reconnect
//! delay; a cheap [`ConnectionClient`] handle lets the rest of the program
//! queue sends and control the lifecycle.  Inbound traffic is republished
//! through the shared [`EventDispatcher`]:
//!
//! - `connection` — `{"connected": bool}` on every open and close.
//! - `message` — every parsed inbound frame, verbatim.
//! - the lowercase `"type"` tag — the same frame again (`STATUS_UPDATE` is
//!   also published as `status_update`), so generic and type-specific
//!   subscribers coexist.
//! - `error` — transport failures and malformed frames.
//!
//! # Failure posture
//!
//! Nothing here is fatal.  Transport errors funnel into the close path, close
//! arms exactly one fixed-delay re-dial (cancel-before-arm, so reconnection
//! is single-flight), parse failures drop the one frame, and sends while
//! disconnected are reported drops — the heartbeat cadence compensates for
//! them.  The cycle runs until [`ConnectionClient::shutdown`], the only exit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use padlink_core::dispatch::EventDispatcher;
use padlink_core::joystick::Direction;
use padlink_core::protocol::codec::{decode_inbound, encode_outbound};
use padlink_core::protocol::messages::{
    ControllerMessage, ServerMessage, EVENT_CONNECTION, EVENT_ERROR, EVENT_MESSAGE,
};

use crate::domain::config::ConnectionConfig;
use crate::infrastructure::transport::{Transport, TransportConnector, TransportEvent};

/// Commands accepted by the connection actor.
enum Command {
    Send(ControllerMessage),
    Connect,
    Shutdown,
}

/// State shared between the actor and the handle, read-only to consumers.
#[derive(Default)]
struct Shared {
    connected: AtomicBool,
    client_id: Mutex<Option<String>>,
}

/// Handle to the connection actor.
///
/// Construct with [`ConnectionClient::start`]; wrap in an `Arc` to share.
/// All methods are fire-and-forget queueing except `shutdown`, which awaits
/// the actor's exit.
pub struct ConnectionClient {
    cmd_tx: mpsc::UnboundedSender<Command>,
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectionClient {
    /// Spawns the connection actor and begins the first dial immediately.
    pub fn start(
        connector: Arc<dyn TransportConnector>,
        config: ConnectionConfig,
        dispatcher: Arc<EventDispatcher>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared::default());
        let actor = ConnectionActor {
            connector,
            config,
            dispatcher,
            shared: Arc::clone(&shared),
            cmd_rx,
        };
        let task = tokio::spawn(actor.run());
        Self {
            cmd_tx,
            shared,
            task: Mutex::new(Some(task)),
        }
    }

    /// Queues one outbound message.
    ///
    /// Delivery is best-effort: while disconnected the message is dropped
    /// with a report and the caller is not told — the protocol's at-most-once
    /// contract.
    pub fn send(&self, message: ControllerMessage) {
        let _ = self.cmd_tx.send(Command::Send(message));
    }

    /// Sends the current direction snapshot, stamped with the epoch-ms time.
    pub fn send_joystick_update(&self, directions: Vec<Direction>) {
        self.send(ControllerMessage::joystick_update(directions, epoch_millis()));
    }

    /// Tears down any open transport and re-dials immediately.
    ///
    /// Safe to call in any state: a pending reconnect delay is cancelled, an
    /// open connection is closed first, nothing leaks.
    pub fn connect(&self) {
        let _ = self.cmd_tx.send(Command::Connect);
    }

    /// `true` while a transport is open and the handshake has been sent.
    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    /// The identity the server assigned on this connection, if any.
    ///
    /// Reset to `None` whenever the connection drops.
    pub fn client_id(&self) -> Option<String> {
        self.shared
            .client_id
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Stops the reconnect cycle, closes the transport, and awaits the actor.
    ///
    /// This is the only path out of the reconnect loop; afterwards the client
    /// stays quiescently disconnected.
    pub async fn shutdown(&self) {
        let _ = self.cmd_tx.send(Command::Shutdown);
        let task = self
            .task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(task) = task {
            if task.await.is_err() {
                error!("connection actor ended abnormally");
            }
        }
    }
}

/// Milliseconds since the Unix epoch, for `JOYSTICK_UPDATE` stamps.
fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ── The actor ─────────────────────────────────────────────────────────────────

/// Outcome of one dial attempt.
enum DialOutcome {
    Connected(Box<dyn Transport>),
    Failed,
    Restart,
    Shutdown,
}

/// Outcome of one connected session.
enum SessionEnd {
    Closed,
    Restart,
    Shutdown,
}

struct ConnectionActor {
    connector: Arc<dyn TransportConnector>,
    config: ConnectionConfig,
    dispatcher: Arc<EventDispatcher>,
    shared: Arc<Shared>,
    cmd_rx: mpsc::UnboundedReceiver<Command>,
}

impl ConnectionActor {
    /// The connect → session → backoff cycle.  Exits only on shutdown.
    async fn run(mut self) {
        loop {
            match self.dial().await {
                DialOutcome::Connected(transport) => match self.session(transport).await {
                    SessionEnd::Closed => self.mark_disconnected(),
                    SessionEnd::Restart => {
                        self.mark_disconnected();
                        continue;
                    }
                    SessionEnd::Shutdown => {
                        self.mark_disconnected();
                        return;
                    }
                },
                DialOutcome::Failed => {}
                DialOutcome::Restart => continue,
                DialOutcome::Shutdown => return,
            }
            if !self.backoff().await {
                return;
            }
        }
    }

    /// Opens a transport, staying responsive to commands while dialling.
    async fn dial(&mut self) -> DialOutcome {
        debug!("connecting to {}", self.config.server_url);
        let connector = Arc::clone(&self.connector);
        let url = self.config.server_url.clone();
        let attempt = async move { connector.connect(&url).await };
        tokio::pin!(attempt);

        loop {
            tokio::select! {
                result = &mut attempt => {
                    return match result {
                        Ok(transport) => DialOutcome::Connected(transport),
                        Err(e) => {
                            warn!("could not connect to {}: {e}", self.config.server_url);
                            self.report_error("transport", &e.to_string());
                            // A refused dial behaves like an immediate close:
                            // observers see the same connection:false they
                            // would for a dropped socket.
                            self.publish_connection(false);
                            DialOutcome::Failed
                        }
                    };
                }
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(Command::Send(msg)) => self.drop_message(&msg),
                    Some(Command::Connect) => return DialOutcome::Restart,
                    Some(Command::Shutdown) | None => return DialOutcome::Shutdown,
                }
            }
        }
    }

    /// Runs one connected session until it ends.
    async fn session(&mut self, mut transport: Box<dyn Transport>) -> SessionEnd {
        info!("connected to {}", self.config.server_url);
        self.shared.connected.store(true, Ordering::SeqCst);

        // The handshake must be the first frame on every connection.
        self.transmit(transport.as_mut(), &ControllerMessage::identify())
            .await;
        self.publish_connection(true);

        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(Command::Send(msg)) => {
                        self.transmit(transport.as_mut(), &msg).await;
                    }
                    Some(Command::Connect) => {
                        // Idempotent re-entry: tear down cleanly, then
                        // re-dial at once without leaking this transport.
                        transport.close().await;
                        return SessionEnd::Restart;
                    }
                    Some(Command::Shutdown) | None => {
                        transport.close().await;
                        return SessionEnd::Shutdown;
                    }
                },
                event = transport.next_event() => match event {
                    Some(TransportEvent::Message(text)) => self.handle_frame(&text),
                    Some(TransportEvent::Error(reason)) => {
                        // Reported only; reconnection is driven by the close
                        // that follows a fatal failure.
                        warn!("transport error: {reason}");
                        self.report_error("transport", &reason);
                    }
                    Some(TransportEvent::Closed) | None => {
                        info!("connection closed");
                        return SessionEnd::Closed;
                    }
                }
            }
        }
    }

    /// Waits out the fixed reconnect delay.  Returns `false` on shutdown.
    ///
    /// This function *is* the pending reconnect timer, and at most one runs
    /// at a time; an explicit connect command cancels the remainder of the
    /// delay, a shutdown cancels the reconnect altogether.
    async fn backoff(&mut self) -> bool {
        debug!("reconnecting in {:?}", self.config.reconnect_delay());
        let delay = sleep(self.config.reconnect_delay());
        tokio::pin!(delay);

        loop {
            tokio::select! {
                _ = &mut delay => return true,
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(Command::Send(msg)) => self.drop_message(&msg),
                    Some(Command::Connect) => return true,
                    Some(Command::Shutdown) | None => return false,
                }
            }
        }
    }

    /// Encodes and writes one frame; failures are reported, never fatal.
    async fn transmit(&self, transport: &mut dyn Transport, msg: &ControllerMessage) {
        match encode_outbound(msg) {
            Ok(frame) => {
                if let Err(e) = transport.send(frame).await {
                    // If the socket is really gone, the close event follows.
                    error!("failed to send frame: {e}");
                }
            }
            Err(e) => error!("failed to encode outbound message: {e}"),
        }
    }

    /// Parses one inbound frame and fans it out.
    fn handle_frame(&self, text: &str) {
        match decode_inbound(text) {
            Ok(frame) => {
                debug!("received {}", frame.type_tag);

                if let Some(ServerMessage::Connected { client_id }) = &frame.message {
                    info!("server assigned client id {client_id}");
                    *self
                        .shared
                        .client_id
                        .lock()
                        .unwrap_or_else(|e| e.into_inner()) = Some(client_id.clone());
                }

                // Generic subscribers first, then the type-specific event.
                self.dispatcher.publish(EVENT_MESSAGE, &frame.payload);
                self.dispatcher.publish(&frame.event, &frame.payload);
            }
            Err(e) => {
                warn!("dropping malformed inbound frame: {e}");
                self.report_error("parse", &e.to_string());
            }
        }
    }

    /// At-most-once contract: a send while disconnected is a reported drop.
    fn drop_message(&self, msg: &ControllerMessage) {
        warn!("not connected; dropping outbound message: {msg:?}");
    }

    fn mark_disconnected(&self) {
        self.shared.connected.store(false, Ordering::SeqCst);
        // The identity was assigned for the dropped connection only.
        *self
            .shared
            .client_id
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = None;
        self.publish_connection(false);
    }

    fn publish_connection(&self, connected: bool) {
        self.dispatcher
            .publish(EVENT_CONNECTION, &json!({ "connected": connected }));
    }

    fn report_error(&self, kind: &str, message: &str) {
        self.dispatcher
            .publish(EVENT_ERROR, &json!({ "kind": kind, "message": message }));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! The transport seam.
//!
//! The connection actor never touches a socket type directly: it dials
//! through a [`TransportConnector`] and drives the resulting [`Transport`].
//! Production wires the WebSocket implementation ([`ws::WsConnector`]); tests
//! inject the channel-scripted [`mock::MockConnector`] so every reconnect and
//! failure path is exercised without a network.

pub mod mock;
pub mod ws;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint could not be reached.
    #[error("failed to reach {url}: {reason}")]
    Dial { url: String, reason: String },

    /// An I/O failure on an established connection.
    #[error("transport I/O error: {0}")]
    Io(String),
}

/// One event surfaced by a live transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A complete inbound text frame.
    Message(String),
    /// A transport-level failure.  Not itself a disconnect: a fatal failure
    /// is followed by [`TransportEvent::Closed`].
    Error(String),
    /// The connection is gone (remote close or dead socket).
    Closed,
}

/// A single live, message-oriented, duplex connection.
#[async_trait]
pub trait Transport: Send {
    /// Transmits one text frame.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] if the frame could not be handed to the
    /// socket; the caller treats this as non-fatal (the close event follows
    /// if the connection is really gone).
    async fn send(&mut self, frame: String) -> Result<(), TransportError>;

    /// Waits for the next transport event.
    ///
    /// Returns `None` once the transport has reported [`TransportEvent::Closed`]
    /// and has nothing further to deliver.
    async fn next_event(&mut self) -> Option<TransportEvent>;

    /// Closes the connection.  Idempotent.
    async fn close(&mut self);
}

/// Dials new [`Transport`] connections.
#[async_trait]
pub trait TransportConnector: Send + Sync {
    /// Opens a connection to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Dial`] when the endpoint cannot be reached;
    /// the connection actor treats that like an immediate close and re-dials
    /// after its fixed delay.
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, TransportError>;
}

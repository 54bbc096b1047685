//! WebSocket transport over tokio-tungstenite.
//!
//! The game server speaks JSON text frames, so only text matters here:
//! protocol-level ping/pong is answered by tungstenite itself, binary frames
//! are not part of the controller protocol and are dropped with a log line.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async, tungstenite::Message as WsMessage, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, warn};

use super::{Transport, TransportConnector, TransportError, TransportEvent};

/// Dials WebSocket connections with [`connect_async`].
#[derive(Debug, Default)]
pub struct WsConnector;

#[async_trait]
impl TransportConnector for WsConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, TransportError> {
        // `connect_async` performs the TCP connect plus the RFC 6455 upgrade
        // handshake; awaiting it yields to the runtime while in progress.
        let (stream, _response) =
            connect_async(url)
                .await
                .map_err(|e| TransportError::Dial {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;
        debug!("WebSocket connection to {url} established");
        Ok(Box::new(WsTransport {
            stream,
            closed: false,
        }))
    }
}

/// One live WebSocket connection.
pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    closed: bool,
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&mut self, frame: String) -> Result<(), TransportError> {
        self.stream
            .send(WsMessage::Text(frame))
            .await
            .map_err(|e| TransportError::Io(e.to_string()))
    }

    async fn next_event(&mut self) -> Option<TransportEvent> {
        if self.closed {
            return None;
        }
        loop {
            match self.stream.next().await {
                Some(Ok(WsMessage::Text(text))) => return Some(TransportEvent::Message(text)),
                Some(Ok(WsMessage::Close(_))) | None => {
                    self.closed = true;
                    return Some(TransportEvent::Closed);
                }
                Some(Ok(WsMessage::Binary(bytes))) => {
                    // Not part of the controller protocol.
                    warn!("ignoring unexpected {}-byte binary frame", bytes.len());
                }
                Some(Ok(_)) => {
                    // Ping/pong frames; tungstenite already replied.
                }
                Some(Err(e)) => return Some(TransportEvent::Error(e.to_string())),
            }
        }
    }

    async fn close(&mut self) {
        // A close error just means the socket is already gone.
        let _ = self.stream.close(None).await;
        self.closed = true;
    }
}

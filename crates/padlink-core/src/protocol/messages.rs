//! JSON message types for the controller ↔ game-server protocol.
//!
//! Every message is a JSON object with a `"type"` field that identifies the
//! variant; all other fields are flattened into the same object.  For example:
//!
//! ```json
//! {"type":"JOYSTICK_UPDATE","directions":["up","left"],"timestamp":1712345678901}
//! ```
//!
//! Serde's `#[serde(tag = "type")]` attribute handles this automatically; the
//! SCREAMING_SNAKE rename gives the upper-case tags the server expects.
//!
//! # Why separate controller→server and server→controller message types?
//!
//! The two directions carry different information: the controller *sends* its
//! handshake and input snapshots, the server *sends* identity assignment and
//! lobby status.  Two distinct enums make it a compile-time error to send a
//! server-only message from the controller, and vice versa.

use serde::{Deserialize, Serialize};

use crate::joystick::Direction;

/// The role this endpoint declares in its `IDENTIFY` handshake.
pub const CONTROLLER_CLIENT_TYPE: &str = "controller";

// ── Well-known dispatcher event names ─────────────────────────────────────────
//
// The connection layer publishes inbound frames under the lowercase form of
// their `"type"` tag, plus these fixed names.  They are part of the
// collaborator-facing contract, so they live here with the wire types.

/// Connection state changes: payload `{"connected": bool}`.
pub const EVENT_CONNECTION: &str = "connection";
/// Every parsed inbound frame, verbatim.
pub const EVENT_MESSAGE: &str = "message";
/// Reported, non-fatal failures: payload `{"kind": ..., "message": ...}`.
pub const EVENT_ERROR: &str = "error";
/// Lowercase republication of `STATUS_UPDATE` frames.
pub const EVENT_STATUS_UPDATE: &str = "status_update";

// ── Controller → Server messages ──────────────────────────────────────────────

/// All messages the controller sends to the game server.
///
/// # Serde representation
///
/// ```json
/// {"type":"IDENTIFY","clientType":"controller"}
/// {"type":"JOYSTICK_UPDATE","directions":["down","right"],"timestamp":1712000000000}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControllerMessage {
    /// Handshake declaring this endpoint's role as an input-producing client.
    ///
    /// Must be the first frame sent after every successful connection, before
    /// any other traffic.
    Identify {
        /// Role label; always [`CONTROLLER_CLIENT_TYPE`] for this client.
        #[serde(rename = "clientType")]
        client_type: String,
    },

    /// Snapshot of the currently asserted directions.
    ///
    /// Sent on every change of the active set and again on the heartbeat
    /// cadence, so the server's last-known state self-corrects even when an
    /// individual update is lost.
    JoystickUpdate {
        /// The asserted directions, lowercase on the wire.
        directions: Vec<Direction>,
        /// Milliseconds since the Unix epoch at the time of the snapshot.
        timestamp: u64,
    },
}

impl ControllerMessage {
    /// Builds the standard controller handshake.
    pub fn identify() -> Self {
        ControllerMessage::Identify {
            client_type: CONTROLLER_CLIENT_TYPE.to_string(),
        }
    }

    /// Builds a directional snapshot with the given epoch-ms timestamp.
    pub fn joystick_update(directions: Vec<Direction>, timestamp: u64) -> Self {
        ControllerMessage::JoystickUpdate {
            directions,
            timestamp,
        }
    }
}

// ── Server → Controller messages ──────────────────────────────────────────────

/// The known messages the game server sends to a controller.
///
/// Unknown `"type"` tags are *not* an error at the connection layer — they are
/// republished verbatim under their lowercase tag (see
/// [`crate::protocol::codec::decode_inbound`]); this enum only covers the tags
/// the client reacts to itself.
///
/// # Serde representation
///
/// ```json
/// {"type":"CONNECTED","clientId":"c-42"}
/// {"type":"STATUS_UPDATE","status":{"games":2,"controllers":3}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// Identity assignment delivered once the server accepts the handshake.
    Connected {
        /// Opaque identifier for this controller, chosen by the server.
        #[serde(rename = "clientId")]
        client_id: String,
    },

    /// Lobby occupancy counts for presentational display.
    StatusUpdate {
        /// Current game/controller counts.
        status: GameStatus,
    },
}

/// Occupancy counts carried by `STATUS_UPDATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    /// Number of games currently registered with the server.
    pub games: u32,
    /// Number of controllers currently connected to the server.
    pub controllers: u32,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Encoding and decoding of controller protocol frames.
//!
//! Frames are JSON text.  Outbound encoding is a thin serde wrapper; inbound
//! decoding does a little more work because the event layer needs three views
//! of every frame:
//!
//! 1. the full parsed value (republished under the generic `message` event),
//! 2. the lowercase form of the `"type"` tag (the type-specific event name),
//! 3. the typed [`ServerMessage`] when the tag is one the client reacts to.
//!
//! The tag→type mapping is a single explicit `match` in [`decode_inbound`]
//! with a fallthrough for tags this client does not know; unknown tags are
//! not an error, they simply carry no typed view.

use serde_json::Value;
use thiserror::Error;

use super::messages::{ControllerMessage, ServerMessage};

/// Errors produced while encoding or decoding protocol frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame was not valid JSON, or a known-type frame had the wrong shape.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The frame parsed as JSON but carries no string `"type"` discriminant.
    #[error("frame has no string \"type\" field")]
    MissingType,
}

/// One decoded inbound frame, ready for dual publication.
#[derive(Debug, Clone)]
pub struct InboundFrame {
    /// The `"type"` tag exactly as received (e.g. `"STATUS_UPDATE"`).
    pub type_tag: String,
    /// Lowercase tag, used as the type-specific event name (`"status_update"`).
    pub event: String,
    /// Typed view, present when the tag is a known [`ServerMessage`].
    pub message: Option<ServerMessage>,
    /// The full parsed frame, published under the generic `message` event.
    pub payload: Value,
}

/// Serializes an outbound controller message to its wire form.
///
/// # Errors
///
/// Returns [`ProtocolError::Malformed`] if serialization fails; with these
/// message types that cannot happen in practice, but the signature matches
/// the decoding side.
pub fn encode_outbound(msg: &ControllerMessage) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(msg)?)
}

/// Parses one inbound text frame.
///
/// # Errors
///
/// - [`ProtocolError::Malformed`] if `text` is not valid JSON, or if a frame
///   with a known tag fails to match that tag's expected shape (e.g. a
///   `CONNECTED` frame without a `clientId`).
/// - [`ProtocolError::MissingType`] if the object has no string `"type"`
///   field — the protocol has no way to route such a frame.
pub fn decode_inbound(text: &str) -> Result<InboundFrame, ProtocolError> {
    let payload: Value = serde_json::from_str(text)?;

    let type_tag = payload
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?
        .to_string();

    // The explicit tag→type mapping.  Adding a reactive message type means
    // adding a tag here and a variant to `ServerMessage`; everything else
    // flows through untyped.
    let message = match type_tag.as_str() {
        "CONNECTED" | "STATUS_UPDATE" => Some(serde_json::from_value(payload.clone())?),
        _ => None,
    };

    let event = type_tag.to_ascii_lowercase();

    Ok(InboundFrame {
        type_tag,
        event,
        message,
        payload,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joystick::Direction;
    use crate::protocol::messages::GameStatus;

    #[test]
    fn test_encode_identify_matches_wire_form() {
        // Arrange / Act
        let wire = encode_outbound(&ControllerMessage::identify()).unwrap();

        // Assert: exactly the handshake the server expects
        assert_eq!(wire, r#"{"type":"IDENTIFY","clientType":"controller"}"#);
    }

    #[test]
    fn test_encode_joystick_update_contains_snapshot() {
        let wire = encode_outbound(&ControllerMessage::joystick_update(
            vec![Direction::Up],
            1_000,
        ))
        .unwrap();

        assert!(wire.contains(r#""type":"JOYSTICK_UPDATE""#));
        assert!(wire.contains(r#""directions":["up"]"#));
    }

    #[test]
    fn test_decode_connected_yields_typed_view() {
        let frame = decode_inbound(r#"{"type":"CONNECTED","clientId":"c-9"}"#).unwrap();

        assert_eq!(frame.type_tag, "CONNECTED");
        assert_eq!(frame.event, "connected");
        assert_eq!(
            frame.message,
            Some(ServerMessage::Connected {
                client_id: "c-9".to_string()
            })
        );
    }

    #[test]
    fn test_decode_status_update_yields_typed_view() {
        let frame =
            decode_inbound(r#"{"type":"STATUS_UPDATE","status":{"games":2,"controllers":3}}"#)
                .unwrap();

        assert_eq!(frame.event, "status_update");
        assert_eq!(
            frame.message,
            Some(ServerMessage::StatusUpdate {
                status: GameStatus {
                    games: 2,
                    controllers: 3
                }
            })
        );
    }

    #[test]
    fn test_decode_unknown_type_is_untyped_but_routable() {
        // Unknown tags are republished under their lowercase tag, so decoding
        // must succeed and preserve the payload.
        let frame = decode_inbound(r#"{"type":"GAME_OVER","winner":"p1"}"#).unwrap();

        assert_eq!(frame.type_tag, "GAME_OVER");
        assert_eq!(frame.event, "game_over");
        assert!(frame.message.is_none());
        assert_eq!(frame.payload["winner"], "p1");
    }

    #[test]
    fn test_decode_invalid_json_is_malformed() {
        let result = decode_inbound("{not json");
        assert!(matches!(result, Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_decode_non_object_or_untyped_frame_is_missing_type() {
        assert!(matches!(
            decode_inbound("[1,2,3]"),
            Err(ProtocolError::MissingType)
        ));
        assert!(matches!(
            decode_inbound(r#"{"status":{"games":1,"controllers":1}}"#),
            Err(ProtocolError::MissingType)
        ));
    }

    #[test]
    fn test_decode_known_tag_with_wrong_shape_is_malformed() {
        // A CONNECTED frame must carry a clientId string.
        let result = decode_inbound(r#"{"type":"CONNECTED"}"#);
        assert!(matches!(result, Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_decode_preserves_full_payload_for_generic_subscribers() {
        let frame =
            decode_inbound(r#"{"type":"STATUS_UPDATE","status":{"games":1,"controllers":4}}"#)
                .unwrap();

        // The generic `message` event receives the whole frame, type tag included.
        assert_eq!(frame.payload["type"], "STATUS_UPDATE");
        assert_eq!(frame.payload["status"]["controllers"], 4);
    }
}

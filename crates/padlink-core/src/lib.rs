//! # padlink-core
//!
//! Shared library for Padlink containing the controller wire protocol, the
//! named-event dispatcher, and the joystick movement state machine.
//!
//! This crate is used by the client application and by anything that wants to
//! speak the controller protocol.  It has zero dependencies on sockets, async
//! runtimes, or UI frameworks.
//!
//! # Architecture overview
//!
//! Padlink turns a handheld control surface into a remote game controller: the
//! client holds one persistent WebSocket connection to a game server and
//! streams directional input snapshots to it.  This crate is the shared
//! foundation.  It defines:
//!
//! - **`protocol`** – What travels over the wire.  Messages are JSON objects
//!   discriminated by a `"type"` field (`IDENTIFY`, `JOYSTICK_UPDATE`,
//!   `CONNECTED`, `STATUS_UPDATE`) and are encoded/decoded here.
//!
//! - **`dispatch`** – The event registry that decouples the connection layer
//!   from its consumers: named events, ordered listeners, isolated failures.
//!
//! - **`joystick`** – Pure input logic: which directions are currently
//!   asserted, under the movement-lock and double-tap-reversal rules.

pub mod dispatch;
pub mod joystick;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `padlink_core::Direction` instead of `padlink_core::joystick::direction::Direction`.
pub use dispatch::{EventDispatcher, ListenerId};
pub use joystick::{Direction, JoystickState, MotionState, PadEvent, Transition};
pub use protocol::codec::{decode_inbound, encode_outbound, InboundFrame, ProtocolError};
pub use protocol::messages::{ControllerMessage, GameStatus, ServerMessage};

//! padlink-client library crate.
//!
//! The controller client holds one persistent WebSocket connection to a game
//! server and streams directional input snapshots to it.  The connection
//! self-heals: a dropped socket is re-dialled after a fixed delay, forever,
//! because losing control input must never require user intervention.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Control surface (stdin lines / UI)
//!         ↓ press & release events
//! [padlink-client]
//!   ├── domain/          ControllerConfig (pure settings, no I/O)
//!   ├── application/     DrivePad use case, haptic gate, status projection
//!   └── infrastructure/
//!         ├── transport/   Transport seam: WebSocket impl + scripted mock
//!         ├── connection/  Reconnecting connection actor + event publishing
//!         └── control_surface/  stdin line protocol parser
//!         ↓
//! Game server (JSON over WebSocket, padlink-core protocol)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `padlink-core` only, plus the
//!   connection handle it drives.
//! - `infrastructure` depends on everything plus `tokio` and `tungstenite`.
//!
//! Cross-component communication happens through the
//! [`padlink_core::EventDispatcher`] (connection state, inbound messages) and
//! message channels (input events); nothing shares mutable state across
//! components.

/// Domain layer: pure configuration types.
pub mod domain;

/// Application layer: input-driving use case and projections.
pub mod application;

/// Infrastructure layer: transports, the connection actor, and the control
/// surface adapter.
pub mod infrastructure;

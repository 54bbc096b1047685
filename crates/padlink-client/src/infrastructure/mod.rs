//! Infrastructure layer: transports, the connection actor, and the control
//! surface adapter.

pub mod connection;
pub mod control_surface;
pub mod haptics;
pub mod transport;

pub use connection::ConnectionClient;
pub use transport::{Transport, TransportConnector, TransportError, TransportEvent};

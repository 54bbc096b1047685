//! Application layer: use cases driving the core from the outside world.

pub mod drive_pad;
pub mod haptics;
pub mod status_projection;

pub use drive_pad::DrivePad;
pub use haptics::{HapticDriver, HapticGate};
pub use status_projection::{StatusProjection, StatusSnapshot};

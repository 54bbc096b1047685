//! Haptic driver implementations.
//!
//! The physical actuator belongs to the presentation layer (the touch UI
//! vibrates the device); a standalone client run has no hardware to shake,
//! so the shipped driver makes pulses observable in the log instead.

use tracing::debug;

use crate::application::haptics::HapticDriver;

/// Logs pulses instead of actuating hardware.
#[derive(Debug, Default)]
pub struct LogHapticDriver;

impl HapticDriver for LogHapticDriver {
    fn pulse(&self) {
        debug!("haptic pulse");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

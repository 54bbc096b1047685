//! Tactile feedback seam.
//!
//! Haptics are presentation: the core decides *when* a gesture deserves
//! feedback, an external collaborator decides *how* it feels.  The
//! [`HapticDriver`] trait is that seam; [`HapticGate`] sits in front of it
//! and enforces the enabled flag and the minimum inter-pulse cooldown, so
//! feedback stays bounded however fast transitions occur.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::config::HapticsConfig;

/// External collaborator that produces one tactile pulse.
#[cfg_attr(test, mockall::automock)]
pub trait HapticDriver: Send + Sync {
    /// Fires one feedback pulse.
    fn pulse(&self);
}

/// Throttling front-end for a [`HapticDriver`].
///
/// Time is an explicit argument, so the cooldown is testable without sleeps.
pub struct HapticGate {
    driver: Arc<dyn HapticDriver>,
    enabled: bool,
    cooldown: Duration,
    last_pulse: Option<Instant>,
}

impl HapticGate {
    /// Creates a gate with the configured enable flag and cooldown.
    pub fn new(config: &HapticsConfig, driver: Arc<dyn HapticDriver>) -> Self {
        Self {
            driver,
            enabled: config.enabled,
            cooldown: config.cooldown(),
            last_pulse: None,
        }
    }

    /// Requests feedback at `now`.  Returns whether a pulse actually fired.
    ///
    /// Disabled gates and requests inside the cooldown are silently absorbed.
    pub fn feedback(&mut self, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        if let Some(last) = self.last_pulse {
            if now.saturating_duration_since(last) < self.cooldown {
                return false;
            }
        }
        self.last_pulse = Some(now);
        self.driver.pulse();
        true
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

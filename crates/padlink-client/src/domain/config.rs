//! Controller configuration types.
//!
//! [`ControllerConfig`] is the single source of truth for all runtime
//! settings.  It can be constructed from defaults, loaded from a TOML file,
//! or assembled by the CLI layer (CLI overrides > file values > defaults).
//!
//! Keeping configuration as a plain struct — no global state, no environment
//! reads inside the domain — makes the client easy to embed in tests; the
//! binary is responsible for populating it.
//!
//! Durations are stored as integer milliseconds so the TOML form stays flat:
//!
//! ```toml
//! [connection]
//! server_url = "ws://192.168.18.177:8080"
//! reconnect_delay_ms = 3000
//!
//! [joystick]
//! heartbeat_ms = 100
//! double_tap_ms = 300
//!
//! [haptics]
//! enabled = true
//! cooldown_ms = 75
//! ```
//!
//! Every field carries a `#[serde(default = "...")]` so a partial file — or
//! no file at all — still yields a working configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ControllerConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub joystick: JoystickConfig,
    #[serde(default)]
    pub haptics: HapticsConfig,
}

/// Settings for the connection to the game server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionConfig {
    /// WebSocket URL of the controller-ingest endpoint.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Fixed delay before re-dialling after the connection closes.
    ///
    /// Deliberately not exponential: this is a control channel on a local
    /// network, and input loss must self-heal promptly.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

/// Settings for the joystick state machine and its heartbeat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JoystickConfig {
    /// Cadence at which the current direction snapshot is re-sent even when
    /// unchanged, so the server's last-known state self-corrects.
    #[serde(default = "default_heartbeat_ms")]
    pub heartbeat_ms: u64,
    /// Width of the window distinguishing a reversal double-tap from a
    /// brake tap.
    #[serde(default = "default_double_tap_ms")]
    pub double_tap_ms: u64,
}

/// Settings for tactile feedback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HapticsConfig {
    /// Master switch for haptic pulses.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Minimum spacing between pulses, however fast transitions occur.
    #[serde(default = "default_haptic_cooldown_ms")]
    pub cooldown_ms: u64,
}

fn default_server_url() -> String {
    "ws://127.0.0.1:8080".to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    3000
}

fn default_heartbeat_ms() -> u64 {
    100
}

fn default_double_tap_ms() -> u64 {
    300
}

fn default_haptic_cooldown_ms() -> u64 {
    75
}

fn default_true() -> bool {
    true
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            heartbeat_ms: default_heartbeat_ms(),
            double_tap_ms: default_double_tap_ms(),
        }
    }
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            cooldown_ms: default_haptic_cooldown_ms(),
        }
    }
}

impl ConnectionConfig {
    /// The reconnect delay as a [`Duration`].
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

impl JoystickConfig {
    /// The heartbeat interval as a [`Duration`].
    pub fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms)
    }

    /// The double-tap window as a [`Duration`].
    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_ms)
    }
}

impl HapticsConfig {
    /// The inter-pulse cooldown as a [`Duration`].
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl ControllerConfig {
    /// Loads configuration from a TOML file.
    ///
    /// Missing fields fall back to their defaults, so a file containing only
    /// the server URL is enough for a typical deployment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Padlink controller client — entry point.
//!
//! Wires together the dispatcher, the reconnecting connection client, the
//! drive-pad use case, and the stdin control surface, then runs until `quit`
//! or Ctrl+C.
//!
//! # Usage
//!
//! ```text
//! padlink-client [OPTIONS]
//!
//! Options:
//!   --config <PATH>             TOML config file [env: PADLINK_CONFIG]
//!   --server-url <URL>          Game server WebSocket URL [default: ws://127.0.0.1:8080]
//!   --reconnect-delay-ms <MS>   Fixed reconnect delay [default: 3000]
//!   --heartbeat-ms <MS>         Snapshot re-send cadence [default: 100]
//!   --double-tap-ms <MS>        Reversal double-tap window [default: 300]
//!   --haptics <BOOL>            Enable/disable haptic pulses [default: true]
//! ```
//!
//! CLI flags override config-file values, which override the built-in
//! defaults.  Once running, the client accepts the control-surface line
//! protocol on stdin (`press up`, `release left`, `status`, `quit`).
//!
//! # Architecture overview
//!
//! ```text
//! stdin lines ──parse──▶ DrivePad (state machine + heartbeat)
//!                              │ JOYSTICK_UPDATE
//!                              ▼
//!                       ConnectionClient ──WebSocket──▶ game server
//!                              │ connection / message / status_update events
//!                              ▼
//!                       EventDispatcher ──▶ StatusProjection, log indicator
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use padlink_client::application::{DrivePad, HapticGate, StatusProjection};
use padlink_client::domain::ControllerConfig;
use padlink_client::infrastructure::connection::ConnectionClient;
use padlink_client::infrastructure::control_surface::{parse_line, SurfaceCommand};
use padlink_client::infrastructure::haptics::LogHapticDriver;
use padlink_client::infrastructure::transport::ws::WsConnector;
use padlink_core::dispatch::EventDispatcher;
use padlink_core::protocol::messages::EVENT_CONNECTION;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Padlink controller client.
///
/// Streams directional input from the control surface to a game server over
/// a self-healing WebSocket connection.
#[derive(Debug, Parser)]
#[command(
    name = "padlink-client",
    about = "Remote game-controller input transport over WebSocket",
    version
)]
struct Cli {
    /// Path to a TOML configuration file.
    ///
    /// Omitted fields fall back to the built-in defaults; every value can
    /// still be overridden by the flags below.
    #[arg(long, env = "PADLINK_CONFIG")]
    config: Option<PathBuf>,

    /// WebSocket URL of the game server's controller-ingest endpoint.
    #[arg(long, env = "PADLINK_SERVER_URL")]
    server_url: Option<String>,

    /// Fixed delay in milliseconds before re-dialling a dropped connection.
    #[arg(long, env = "PADLINK_RECONNECT_DELAY_MS")]
    reconnect_delay_ms: Option<u64>,

    /// Cadence in milliseconds at which the current direction snapshot is
    /// re-sent even when unchanged.
    #[arg(long, env = "PADLINK_HEARTBEAT_MS")]
    heartbeat_ms: Option<u64>,

    /// Width in milliseconds of the double-tap window distinguishing a
    /// reversal gesture from a brake tap.
    #[arg(long, env = "PADLINK_DOUBLE_TAP_MS")]
    double_tap_ms: Option<u64>,

    /// Enable or disable haptic feedback pulses.
    #[arg(long, env = "PADLINK_HAPTICS")]
    haptics: Option<bool>,
}

impl Cli {
    /// Resolves the effective configuration: CLI > file > defaults.
    fn into_controller_config(self) -> anyhow::Result<ControllerConfig> {
        let mut config = match &self.config {
            Some(path) => ControllerConfig::load(path)
                .with_context(|| format!("loading config file {}", path.display()))?,
            None => ControllerConfig::default(),
        };

        if let Some(url) = self.server_url {
            config.connection.server_url = url;
        }
        if let Some(ms) = self.reconnect_delay_ms {
            config.connection.reconnect_delay_ms = ms;
        }
        if let Some(ms) = self.heartbeat_ms {
            config.joystick.heartbeat_ms = ms;
        }
        if let Some(ms) = self.double_tap_ms {
            config.joystick.double_tap_ms = ms;
        }
        if let Some(enabled) = self.haptics {
            config.haptics.enabled = enabled;
        }

        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `RUST_LOG` controls verbosity; `info` is the default.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.into_controller_config()?;

    info!(
        "Padlink controller starting — server={}",
        config.connection.server_url
    );

    let dispatcher = Arc::new(EventDispatcher::new());

    // The terminal's connectivity indicator.
    dispatcher.subscribe(EVENT_CONNECTION, |payload| {
        match payload.get("connected").and_then(serde_json::Value::as_bool) {
            Some(true) => info!("connected to the game"),
            _ => info!("connecting…"),
        }
    });

    let projection = StatusProjection::attach(Arc::clone(&dispatcher));

    let client = Arc::new(ConnectionClient::start(
        Arc::new(WsConnector),
        config.connection.clone(),
        Arc::clone(&dispatcher),
    ));

    let haptics = HapticGate::new(&config.haptics, Arc::new(LogHapticDriver));
    let pad = DrivePad::start(Arc::clone(&client), &config.joystick, haptics);

    info!("control surface ready — press/release <up|down|left|right>, status, quit");

    // ── Control-surface loop ──────────────────────────────────────────────────
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => match parse_line(&line) {
                    Ok(Some(SurfaceCommand::Input(event))) => pad.input(event),
                    Ok(Some(SurfaceCommand::Status)) => {
                        let snap = projection.snapshot();
                        info!(
                            "connected={} games={} controllers={} client_id={}",
                            snap.connected,
                            snap.games,
                            snap.controllers,
                            client.client_id().unwrap_or_else(|| "-".to_string())
                        );
                    }
                    Ok(Some(SurfaceCommand::Quit)) => break,
                    Ok(None) => {}
                    Err(e) => warn!("{e}"),
                },
                // stdin closed: nothing can drive the pad any more.
                Ok(None) => break,
                Err(e) => {
                    warn!("stdin error: {e}");
                    break;
                }
            }
        }
    }

    pad.shutdown().await;
    client.shutdown().await;

    info!("Padlink controller stopped");
    Ok(())
}

//! The drive-pad use case: from discrete presses to outbound snapshots.
//!
//! A worker task owns the [`JoystickState`] and the heartbeat timer; the
//! [`DrivePad`] handle feeds it press/release events from whatever control
//! surface the binary wires up.  On every set change the worker sends a
//! `JOYSTICK_UPDATE` and restarts the heartbeat, so the periodic re-send is
//! always measured from the latest snapshot.  The heartbeat keeps running
//! while nothing changes — the remote side's last-known state self-corrects
//! even if a discrete update was dropped — and dies with the worker, never
//! outliving its owner.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error};

use padlink_core::joystick::{Direction, JoystickState, PadEvent};

use crate::application::haptics::HapticGate;
use crate::domain::config::JoystickConfig;
use crate::infrastructure::connection::ConnectionClient;

enum PadCommand {
    Input(PadEvent),
    Shutdown,
}

/// Handle to the pad worker task.
///
/// Press/release entry points return nothing: effects are observed through
/// the emitted updates and the haptic hook, per the collaborator contract.
pub struct DrivePad {
    event_tx: mpsc::UnboundedSender<PadCommand>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl DrivePad {
    /// Spawns the worker with its state machine and heartbeat.
    pub fn start(
        client: Arc<ConnectionClient>,
        config: &JoystickConfig,
        haptics: HapticGate,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let worker = PadWorker {
            state: JoystickState::new(config.double_tap_window()),
            heartbeat_period: config.heartbeat(),
            client,
            haptics,
            event_rx,
        };
        let task = tokio::spawn(worker.run());
        Self {
            event_tx,
            task: Mutex::new(Some(task)),
        }
    }

    /// Feeds one discrete input event to the worker.
    pub fn input(&self, event: PadEvent) {
        let _ = self.event_tx.send(PadCommand::Input(event));
    }

    /// A button on the control surface was pushed down.
    pub fn press(&self, direction: Direction) {
        self.input(PadEvent::Press(direction));
    }

    /// A button on the control surface was let go.
    pub fn release(&self, direction: Direction) {
        self.input(PadEvent::Release(direction));
    }

    /// Stops the worker and its heartbeat, then awaits its exit.
    pub async fn shutdown(&self) {
        let _ = self.event_tx.send(PadCommand::Shutdown);
        let task = self
            .task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(task) = task {
            if task.await.is_err() {
                error!("pad worker ended abnormally");
            }
        }
    }
}

struct PadWorker {
    state: JoystickState,
    heartbeat_period: Duration,
    client: Arc<ConnectionClient>,
    haptics: HapticGate,
    event_rx: mpsc::UnboundedReceiver<PadCommand>,
}

impl PadWorker {
    async fn run(mut self) {
        let mut heartbeat = interval(self.heartbeat_period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // `interval` fires immediately by default; the first beat should come
        // one full period after start.
        heartbeat.reset();

        loop {
            tokio::select! {
                cmd = self.event_rx.recv() => match cmd {
                    Some(PadCommand::Input(event)) => {
                        let now = Instant::now();
                        let transition = self.state.apply(event, now);
                        if transition.haptic {
                            self.haptics.feedback(now);
                        }
                        if transition.changed {
                            let directions = self.state.active_directions();
                            debug!("direction set changed: {directions:?}");
                            self.client.send_joystick_update(directions);
                            // Restart the cadence relative to this snapshot.
                            heartbeat.reset();
                        }
                    }
                    Some(PadCommand::Shutdown) | None => break,
                },
                _ = heartbeat.tick() => {
                    self.client
                        .send_joystick_update(self.state.active_directions());
                }
            }
        }
        debug!("pad worker stopped");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

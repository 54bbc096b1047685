//! The directional movement state machine.
//!
//! Two input families with different policies:
//!
//! - **Lateral** (left/right) is *momentary*: a press asserts the direction,
//!   the matching release clears it, independently of everything else.
//! - **Longitudinal** (up/down) is a *toggle with movement lock*: forward and
//!   backward are mutually exclusive, a single opposite tap while moving acts
//!   as a brake, and only a double-tap reverses motion immediately.  This
//!   models a vehicle-style control where momentum makes an accidental
//!   instant reversal undesirable.
//!
//! The transition function is pure: it takes the triggering event and the
//! current instant, mutates the state, and reports what the host must do
//! (send an update, pulse haptics).  No timers run in here.

use std::time::{Duration, Instant};

use crate::joystick::direction::Direction;

/// Default width of the double-tap window.
///
/// A second longitudinal press within this much of the previous press is
/// interpreted as part of the same gesture (re-affirmation or reversal)
/// rather than as a new deliberate tap.
pub const DEFAULT_DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(300);

/// Longitudinal motion state of the joystick (the up/down axis).
///
/// Forward and backward can never be asserted simultaneously; the enum makes
/// that invariant structural rather than checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    /// No longitudinal movement asserted.
    Idle,
    /// "up" is asserted.
    Forward,
    /// "down" is asserted.
    Backward,
}

/// A discrete input event from the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadEvent {
    /// A button was pushed down.
    Press(Direction),
    /// A button was let go.
    Release(Direction),
}

impl PadEvent {
    /// The direction this event refers to.
    pub fn direction(self) -> Direction {
        match self {
            PadEvent::Press(dir) | PadEvent::Release(dir) => dir,
        }
    }
}

/// Observable outcome of applying one [`PadEvent`].
///
/// The host reacts to this: `changed` means the active-direction set is
/// different and an update must be sent to the remote side; `haptic` means
/// the gesture warrants tactile feedback (subject to the host's cooldown).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The active-direction set changed.
    pub changed: bool,
    /// Tactile feedback is requested for this transition.
    pub haptic: bool,
}

/// The joystick state machine.
///
/// Tracks the lateral memberships, the longitudinal [`MotionState`], and the
/// per-direction last-press timestamps used to classify double-taps.  Created
/// empty at client start and mutated per interaction for the lifetime of the
/// control surface.
#[derive(Debug, Clone)]
pub struct JoystickState {
    motion: MotionState,
    left: bool,
    right: bool,
    last_up_press: Option<Instant>,
    last_down_press: Option<Instant>,
    double_tap_window: Duration,
}

impl JoystickState {
    /// Creates an idle state with the given double-tap window.
    pub fn new(double_tap_window: Duration) -> Self {
        Self {
            motion: MotionState::Idle,
            left: false,
            right: false,
            last_up_press: None,
            last_down_press: None,
            double_tap_window,
        }
    }

    /// Current longitudinal motion state.
    pub fn motion(&self) -> MotionState {
        self.motion
    }

    /// Whether `dir` is currently asserted.
    pub fn contains(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.motion == MotionState::Forward,
            Direction::Down => self.motion == MotionState::Backward,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// The currently asserted directions, longitudinal first.
    ///
    /// This is the snapshot that travels in `JOYSTICK_UPDATE.directions`.
    /// At most one of up/down can appear (movement lock); left and right are
    /// independent of each other and of the longitudinal state.
    pub fn active_directions(&self) -> Vec<Direction> {
        let mut directions = Vec::with_capacity(3);
        match self.motion {
            MotionState::Forward => directions.push(Direction::Up),
            MotionState::Backward => directions.push(Direction::Down),
            MotionState::Idle => {}
        }
        if self.left {
            directions.push(Direction::Left);
        }
        if self.right {
            directions.push(Direction::Right);
        }
        directions
    }

    /// Applies one input event at the given instant.
    pub fn apply(&mut self, event: PadEvent, now: Instant) -> Transition {
        match event {
            PadEvent::Press(dir) if dir.is_lateral() => self.press_lateral(dir),
            PadEvent::Release(dir) if dir.is_lateral() => self.release_lateral(dir),
            PadEvent::Press(dir) => self.press_longitudinal(dir, now),
            // Up/down follow the toggle policy: the release edge carries no
            // meaning.
            PadEvent::Release(_) => Transition {
                changed: false,
                haptic: false,
            },
        }
    }

    fn press_lateral(&mut self, dir: Direction) -> Transition {
        let slot = match dir {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
            Direction::Up | Direction::Down => {
                return Transition {
                    changed: false,
                    haptic: false,
                }
            }
        };
        if *slot {
            // Already engaged: repeated presses are idempotent.
            return Transition {
                changed: false,
                haptic: false,
            };
        }
        *slot = true;
        Transition {
            changed: true,
            haptic: true,
        }
    }

    fn release_lateral(&mut self, dir: Direction) -> Transition {
        let slot = match dir {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
            Direction::Up | Direction::Down => {
                return Transition {
                    changed: false,
                    haptic: false,
                }
            }
        };
        if !*slot {
            return Transition {
                changed: false,
                haptic: false,
            };
        }
        *slot = false;
        // A release changes the set but is not a felt gesture.
        Transition {
            changed: true,
            haptic: false,
        }
    }

    fn press_longitudinal(&mut self, dir: Direction, now: Instant) -> Transition {
        let engaged = match dir {
            Direction::Up => MotionState::Forward,
            Direction::Down => MotionState::Backward,
            Direction::Left | Direction::Right => {
                return Transition {
                    changed: false,
                    haptic: false,
                }
            }
        };

        // Classify the gesture against the timestamps as they were *before*
        // this press; the window is always pairwise with the immediately
        // preceding press.
        let same_recent = self.within_window(self.last_press(dir), now);
        let previous_recent = self.within_window(self.last_longitudinal_press(), now);

        let next = if self.motion == MotionState::Idle {
            // From rest, any longitudinal press engages its motion.
            engaged
        } else if self.motion == engaged {
            // Re-pressing the active direction: a quick re-tap re-affirms the
            // current motion, a deliberate tap stops it.
            if same_recent {
                engaged
            } else {
                MotionState::Idle
            }
        } else {
            // Opposite press while moving: within the window it is a reversal
            // gesture, otherwise a brake.
            if previous_recent {
                engaged
            } else {
                MotionState::Idle
            }
        };

        self.stamp(dir, now);

        if next == self.motion {
            return Transition {
                changed: false,
                haptic: false,
            };
        }
        self.motion = next;
        Transition {
            changed: true,
            haptic: true,
        }
    }

    fn last_press(&self, dir: Direction) -> Option<Instant> {
        match dir {
            Direction::Up => self.last_up_press,
            Direction::Down => self.last_down_press,
            Direction::Left | Direction::Right => None,
        }
    }

    /// Timestamp of the most recent longitudinal press of either direction.
    fn last_longitudinal_press(&self) -> Option<Instant> {
        self.last_up_press.max(self.last_down_press)
    }

    fn within_window(&self, previous: Option<Instant>, now: Instant) -> bool {
        previous.is_some_and(|t| now.saturating_duration_since(t) <= self.double_tap_window)
    }

    fn stamp(&mut self, dir: Direction, now: Instant) {
        match dir {
            Direction::Up => self.last_up_press = Some(now),
            Direction::Down => self.last_down_press = Some(now),
            Direction::Left | Direction::Right => {}
        }
    }
}

impl Default for JoystickState {
    fn default() -> Self {
        Self::new(DEFAULT_DOUBLE_TAP_WINDOW)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

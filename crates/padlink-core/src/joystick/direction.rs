//! The four logical input axes of the control surface.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One directional input axis on the control surface.
///
/// Directions serialize as lowercase strings (`"up"`, `"down"`, `"left"`,
/// `"right"`), which is the representation the game server expects inside
/// `JOYSTICK_UPDATE.directions`.  Absence of a direction is expressed by
/// omission from the active set, never by a null member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// `true` for the up/down axis group, which follows the
    /// toggle-with-lock-and-double-tap policy.
    pub fn is_longitudinal(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// `true` for the left/right axis group, which follows the momentary
    /// press/release policy.
    pub fn is_lateral(self) -> bool {
        !self.is_longitudinal()
    }

    /// The opposing direction on the same axis.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The lowercase wire form of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a direction from an unrecognised string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction '{0}' (expected up, down, left, or right)")]
pub struct UnknownDirection(pub String);

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(UnknownDirection(other.to_string())),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

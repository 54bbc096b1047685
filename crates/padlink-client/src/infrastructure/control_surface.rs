//! Line protocol for driving the pad from stdin.
//!
//! The touch UI this client was built for is a separate presentation layer;
//! when the binary runs standalone, a tiny stdin protocol stands in for it:
//!
//! ```text
//! press up        # push a button down
//! release left    # let a button go
//! status          # print the connection/lobby snapshot
//! quit            # shut the client down
//! ```
//!
//! Blank lines and `#` comments are ignored.  The parser is pure; the read
//! loop lives in the binary.

use thiserror::Error;

use padlink_core::joystick::direction::UnknownDirection;
use padlink_core::joystick::{Direction, PadEvent};

/// One parsed control-surface command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceCommand {
    /// A press or release to feed into the pad.
    Input(PadEvent),
    /// Print the status snapshot.
    Status,
    /// Shut down and exit.
    Quit,
}

/// Errors for lines that look like commands but are not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("unknown command '{0}' (expected press, release, status, or quit)")]
    UnknownCommand(String),

    #[error("'{0}' needs a direction argument")]
    MissingDirection(String),

    #[error(transparent)]
    BadDirection(#[from] UnknownDirection),
}

/// Parses one input line.  `Ok(None)` means the line carries no command
/// (blank or comment).
pub fn parse_line(line: &str) -> Result<Option<SurfaceCommand>, SurfaceError> {
    let mut tokens = line.split_whitespace();
    let Some(command) = tokens.next() else {
        return Ok(None);
    };
    if command.starts_with('#') {
        return Ok(None);
    }

    match command {
        "press" | "release" => {
            let direction: Direction = tokens
                .next()
                .ok_or_else(|| SurfaceError::MissingDirection(command.to_string()))?
                .parse()?;
            let event = if command == "press" {
                PadEvent::Press(direction)
            } else {
                PadEvent::Release(direction)
            };
            Ok(Some(SurfaceCommand::Input(event)))
        }
        "status" => Ok(Some(SurfaceCommand::Status)),
        "quit" | "exit" => Ok(Some(SurfaceCommand::Quit)),
        other => Err(SurfaceError::UnknownCommand(other.to_string())),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release_parse_to_pad_events() {
        assert_eq!(
            parse_line("press up").unwrap(),
            Some(SurfaceCommand::Input(PadEvent::Press(Direction::Up)))
        );
        assert_eq!(
            parse_line("release left").unwrap(),
            Some(SurfaceCommand::Input(PadEvent::Release(Direction::Left)))
        );
    }

    #[test]
    fn test_whitespace_is_forgiven() {
        assert_eq!(
            parse_line("  press   down  ").unwrap(),
            Some(SurfaceCommand::Input(PadEvent::Press(Direction::Down)))
        );
    }

    #[test]
    fn test_status_and_quit() {
        assert_eq!(parse_line("status").unwrap(), Some(SurfaceCommand::Status));
        assert_eq!(parse_line("quit").unwrap(), Some(SurfaceCommand::Quit));
        assert_eq!(parse_line("exit").unwrap(), Some(SurfaceCommand::Quit));
    }

    #[test]
    fn test_blank_lines_and_comments_carry_nothing() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# a remark").unwrap(), None);
    }

    #[test]
    fn test_missing_direction_is_reported() {
        assert_eq!(
            parse_line("press"),
            Err(SurfaceError::MissingDirection("press".to_string()))
        );
    }

    #[test]
    fn test_bad_direction_is_reported() {
        assert!(matches!(
            parse_line("press sideways"),
            Err(SurfaceError::BadDirection(_))
        ));
    }

    #[test]
    fn test_unknown_command_is_reported() {
        assert_eq!(
            parse_line("jump high"),
            Err(SurfaceError::UnknownCommand("jump".to_string()))
        );
    }
}

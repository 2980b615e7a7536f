//! Action identifiers and fired-action events
//!
//! The engine's only output: which configured action a satisfied key combo
//! maps to. Movement actions carry their direction bound at registration
//! time; nothing is parsed out of the key spec itself.

use serde::{Deserialize, Serialize};

/// Direction parameter for window-movement actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Handle for one bindable action, carrying zero or one bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionId {
    /// Capture a screenshot of the active screen
    Screenshot,
    /// Send captured screenshots off for a solution
    GenerateSolution,
    /// Show or hide the application window
    ToggleVisibility,
    /// Request an optimized version of the last solution
    OptimizeSolution,
    /// Clear the accumulated session history
    ResetHistory,
    /// Emergency hide-and-quit
    Panic,
    /// Nudge the window in a fixed direction
    MoveWindow { direction: Direction },
}

/// Event handed to the host whenever a binding fires on its Idle->Active edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredAction {
    #[serde(flatten)]
    pub action: ActionId,
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionId::Screenshot => write!(f, "screenshot"),
            ActionId::GenerateSolution => write!(f, "generate_solution"),
            ActionId::ToggleVisibility => write!(f, "toggle_visibility"),
            ActionId::OptimizeSolution => write!(f, "optimize_solution"),
            ActionId::ResetHistory => write!(f, "reset_history"),
            ActionId::Panic => write!(f, "panic"),
            ActionId::MoveWindow { direction } => {
                let dir = match direction {
                    Direction::Up => "up",
                    Direction::Down => "down",
                    Direction::Left => "left",
                    Direction::Right => "right",
                };
                write!(f, "move_window_{}", dir)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serialization() {
        let fired = FiredAction {
            action: ActionId::Screenshot,
        };
        let json = serde_json::to_string(&fired).unwrap();
        assert!(json.contains("screenshot"));
    }

    #[test]
    fn test_move_window_carries_direction() {
        let fired = FiredAction {
            action: ActionId::MoveWindow {
                direction: Direction::Left,
            },
        };
        let json = serde_json::to_string(&fired).unwrap();
        assert!(json.contains("move_window"));
        assert!(json.contains("left"));
    }

    #[test]
    fn test_action_deserialization() {
        let json = r#"{"action":"toggle_visibility"}"#;
        let fired: FiredAction = serde_json::from_str(json).unwrap();
        assert_eq!(fired.action, ActionId::ToggleVisibility);
    }
}

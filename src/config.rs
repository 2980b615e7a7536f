//! Hotkey configuration
//!
//! One spec string per action, with platform-specific defaults and
//! `KEYWATCH_HOTKEY_*` environment overrides. Validation that a spec has
//! at least one modifier plus a primary key belongs to the editing UI
//! that writes these values; here an invalid spec just produces a
//! dormant binding.

use crate::action::{ActionId, Direction};
use crate::hotkey::Binding;

/// Spec strings for every bindable action.
#[derive(Debug, Clone)]
pub struct Config {
    pub screenshot: String,
    pub generate_solution: String,
    pub toggle_visibility: String,
    pub optimize_solution: String,
    pub reset_history: String,
    pub panic: String,
    pub move_up: String,
    pub move_down: String,
    pub move_left: String,
    pub move_right: String,

    /// Skip installing the global hook entirely (`KEYWATCH_DISABLE_GLOBAL`).
    pub disable_global: bool,
}

fn pick(mac: &str, other: &str) -> String {
    if cfg!(target_os = "macos") {
        mac.to_string()
    } else {
        other.to_string()
    }
}

fn env_or(var: &str, default: String) -> String {
    std::env::var(var).unwrap_or(default)
}

impl Config {
    /// Load configuration from environment and platform defaults.
    pub fn load() -> Self {
        let disable_global = std::env::var("KEYWATCH_DISABLE_GLOBAL")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            screenshot: env_or("KEYWATCH_HOTKEY_SCREENSHOT", pick("Cmd+Ctrl+1", "Ctrl+Alt+1")),
            generate_solution: env_or(
                "KEYWATCH_HOTKEY_GENERATE_SOLUTION",
                pick("Cmd+Ctrl+2", "Ctrl+Alt+2"),
            ),
            toggle_visibility: env_or(
                "KEYWATCH_HOTKEY_TOGGLE_VISIBILITY",
                pick("Cmd+Ctrl+B", "Ctrl+Alt+B"),
            ),
            optimize_solution: env_or(
                "KEYWATCH_HOTKEY_OPTIMIZE_SOLUTION",
                pick("Cmd+Ctrl+O", "Ctrl+Alt+O"),
            ),
            reset_history: env_or(
                "KEYWATCH_HOTKEY_RESET_HISTORY",
                pick("Cmd+Ctrl+R", "Ctrl+Alt+R"),
            ),
            panic: env_or("KEYWATCH_HOTKEY_PANIC", pick("Cmd+Q", "Alt+Q")),
            move_up: env_or("KEYWATCH_HOTKEY_MOVE_UP", pick("Cmd+Up", "Win+Up")),
            move_down: env_or("KEYWATCH_HOTKEY_MOVE_DOWN", pick("Cmd+Down", "Win+Down")),
            move_left: env_or("KEYWATCH_HOTKEY_MOVE_LEFT", pick("Cmd+Left", "Win+Left")),
            move_right: env_or("KEYWATCH_HOTKEY_MOVE_RIGHT", pick("Cmd+Right", "Win+Right")),
            disable_global,
        }
    }

    /// Compile the full binding table, in stable registration order.
    pub fn bindings(&self) -> Vec<Binding> {
        vec![
            Binding::compile(ActionId::Screenshot, &self.screenshot),
            Binding::compile(ActionId::GenerateSolution, &self.generate_solution),
            Binding::compile(ActionId::ToggleVisibility, &self.toggle_visibility),
            Binding::compile(ActionId::OptimizeSolution, &self.optimize_solution),
            Binding::compile(ActionId::ResetHistory, &self.reset_history),
            Binding::compile(ActionId::Panic, &self.panic),
            Binding::compile(
                ActionId::MoveWindow {
                    direction: Direction::Up,
                },
                &self.move_up,
            ),
            Binding::compile(
                ActionId::MoveWindow {
                    direction: Direction::Down,
                },
                &self.move_down,
            ),
            Binding::compile(
                ActionId::MoveWindow {
                    direction: Direction::Left,
                },
                &self.move_left,
            ),
            Binding::compile(
                ActionId::MoveWindow {
                    direction: Direction::Right,
                },
                &self.move_right,
            ),
        ]
    }
}

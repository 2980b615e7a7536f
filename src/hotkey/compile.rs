//! Combo spec compiler
//!
//! Turns a configured spec string like `"Ctrl+Alt+1"` into the canonical
//! set of [`AbstractKey`] tokens the matcher works with. Pure functions,
//! no engine state involved.

use std::collections::HashSet;

use tracing::warn;

use super::keys::{AbstractKey, Modifier, SpecialKey};

/// Compile target, so the macOS modifier alias is testable on any host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }
}

/// Compile a spec string for the build host's platform.
pub fn compile(spec: &str) -> HashSet<AbstractKey> {
    compile_on(spec, Platform::current())
}

/// Compile a spec string for an explicit platform.
///
/// Tokens are split on `+`, trimmed, and matched case-insensitively.
/// `"ctrl"` is aliased to the OS-native primary modifier: plain Control
/// everywhere except macOS, where it compiles to Command. `"cmd"` and
/// `"win"` always mean [`Modifier::CmdOrWin`].
///
/// Unrecognized tokens are dropped with a diagnostic; a spec that loses
/// every token compiles to the empty set, which never matches anything.
pub fn compile_on(spec: &str, platform: Platform) -> HashSet<AbstractKey> {
    let mut keys = HashSet::new();

    for part in spec.split('+') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match parse_token(part, platform) {
            Some(key) => {
                keys.insert(key);
            }
            None => {
                warn!(token = part, spec, "unrecognized token in hotkey spec, dropping");
            }
        }
    }

    keys
}

fn parse_token(token: &str, platform: Platform) -> Option<AbstractKey> {
    let lower = token.to_ascii_lowercase();

    let key = match lower.as_str() {
        "ctrl" => match platform {
            Platform::MacOs => AbstractKey::Modifier(Modifier::CmdOrWin),
            Platform::Other => AbstractKey::Modifier(Modifier::Ctrl),
        },
        "cmd" | "win" => AbstractKey::Modifier(Modifier::CmdOrWin),
        "alt" => AbstractKey::Modifier(Modifier::Alt),
        "shift" => AbstractKey::Modifier(Modifier::Shift),

        "return" | "enter" => AbstractKey::Special(SpecialKey::Enter),
        "up" => AbstractKey::Special(SpecialKey::Up),
        "down" => AbstractKey::Special(SpecialKey::Down),
        "left" => AbstractKey::Special(SpecialKey::Left),
        "right" => AbstractKey::Special(SpecialKey::Right),
        "esc" => AbstractKey::Special(SpecialKey::Esc),
        "tab" => AbstractKey::Special(SpecialKey::Tab),
        "space" => AbstractKey::Special(SpecialKey::Space),

        _ => {
            let mut chars = lower.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphanumeric() => AbstractKey::character(c),
                _ => return None,
            }
        }
    };

    Some(key)
}

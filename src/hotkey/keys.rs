//! Normalized key model
//!
//! `AbstractKey` is the platform-independent representation every other part
//! of the engine works with. The only place raw `rdev` key codes appear is
//! the `from_rdev` adapter at the bottom of this file.

use std::fmt;

/// Canonical modifier identity. Left/right physical variants collapse to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Ctrl,
    Alt,
    Shift,
    /// Command on macOS, Windows/Super key elsewhere.
    CmdOrWin,
}

/// Named non-character keys recognized in combo specs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Tab,
    Space,
}

/// One normalized keyboard key, as used for all combo matching.
///
/// `Character` always holds the lowercase form (see [`AbstractKey::character`]),
/// so plain structural equality is shift- and caps-state independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbstractKey {
    Modifier(Modifier),
    Character(char),
    Special(SpecialKey),
}

impl AbstractKey {
    /// Build a character key, normalizing to lowercase.
    pub fn character(c: char) -> Self {
        AbstractKey::Character(c.to_ascii_lowercase())
    }

    /// Translate an `rdev` key code into the normalized model.
    ///
    /// Returns `None` for keys the engine has no representation for
    /// (function keys, punctuation, keypad, ...); the caller drops those.
    pub fn from_rdev(key: rdev::Key) -> Option<Self> {
        use rdev::Key;

        let abstract_key = match key {
            Key::ControlLeft | Key::ControlRight => AbstractKey::Modifier(Modifier::Ctrl),
            Key::Alt | Key::AltGr => AbstractKey::Modifier(Modifier::Alt),
            Key::ShiftLeft | Key::ShiftRight => AbstractKey::Modifier(Modifier::Shift),
            Key::MetaLeft | Key::MetaRight => AbstractKey::Modifier(Modifier::CmdOrWin),

            Key::UpArrow => AbstractKey::Special(SpecialKey::Up),
            Key::DownArrow => AbstractKey::Special(SpecialKey::Down),
            Key::LeftArrow => AbstractKey::Special(SpecialKey::Left),
            Key::RightArrow => AbstractKey::Special(SpecialKey::Right),
            Key::Return => AbstractKey::Special(SpecialKey::Enter),
            Key::Escape => AbstractKey::Special(SpecialKey::Esc),
            Key::Tab => AbstractKey::Special(SpecialKey::Tab),
            Key::Space => AbstractKey::Special(SpecialKey::Space),

            Key::KeyA => AbstractKey::Character('a'),
            Key::KeyB => AbstractKey::Character('b'),
            Key::KeyC => AbstractKey::Character('c'),
            Key::KeyD => AbstractKey::Character('d'),
            Key::KeyE => AbstractKey::Character('e'),
            Key::KeyF => AbstractKey::Character('f'),
            Key::KeyG => AbstractKey::Character('g'),
            Key::KeyH => AbstractKey::Character('h'),
            Key::KeyI => AbstractKey::Character('i'),
            Key::KeyJ => AbstractKey::Character('j'),
            Key::KeyK => AbstractKey::Character('k'),
            Key::KeyL => AbstractKey::Character('l'),
            Key::KeyM => AbstractKey::Character('m'),
            Key::KeyN => AbstractKey::Character('n'),
            Key::KeyO => AbstractKey::Character('o'),
            Key::KeyP => AbstractKey::Character('p'),
            Key::KeyQ => AbstractKey::Character('q'),
            Key::KeyR => AbstractKey::Character('r'),
            Key::KeyS => AbstractKey::Character('s'),
            Key::KeyT => AbstractKey::Character('t'),
            Key::KeyU => AbstractKey::Character('u'),
            Key::KeyV => AbstractKey::Character('v'),
            Key::KeyW => AbstractKey::Character('w'),
            Key::KeyX => AbstractKey::Character('x'),
            Key::KeyY => AbstractKey::Character('y'),
            Key::KeyZ => AbstractKey::Character('z'),

            Key::Num0 => AbstractKey::Character('0'),
            Key::Num1 => AbstractKey::Character('1'),
            Key::Num2 => AbstractKey::Character('2'),
            Key::Num3 => AbstractKey::Character('3'),
            Key::Num4 => AbstractKey::Character('4'),
            Key::Num5 => AbstractKey::Character('5'),
            Key::Num6 => AbstractKey::Character('6'),
            Key::Num7 => AbstractKey::Character('7'),
            Key::Num8 => AbstractKey::Character('8'),
            Key::Num9 => AbstractKey::Character('9'),

            _ => return None,
        };

        Some(abstract_key)
    }
}

impl fmt::Display for AbstractKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbstractKey::Modifier(Modifier::Ctrl) => write!(f, "ctrl"),
            AbstractKey::Modifier(Modifier::Alt) => write!(f, "alt"),
            AbstractKey::Modifier(Modifier::Shift) => write!(f, "shift"),
            AbstractKey::Modifier(Modifier::CmdOrWin) => write!(f, "cmd"),
            AbstractKey::Character(c) => write!(f, "{}", c),
            AbstractKey::Special(s) => {
                let name = match s {
                    SpecialKey::Up => "up",
                    SpecialKey::Down => "down",
                    SpecialKey::Left => "left",
                    SpecialKey::Right => "right",
                    SpecialKey::Enter => "enter",
                    SpecialKey::Esc => "esc",
                    SpecialKey::Tab => "tab",
                    SpecialKey::Space => "space",
                };
                write!(f, "{}", name)
            }
        }
    }
}

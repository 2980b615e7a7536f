//! Hotkey recognition engine
//!
//! Compiles configured key-combination specs into normalized key sets and
//! matches them, edge-triggered, against a system-wide keyboard hook.

pub mod compile;
mod engine;
mod keys;
mod listener;

pub use engine::{Binding, HotkeyEngine};
pub use keys::{AbstractKey, Modifier, SpecialKey};
pub use listener::{GlobalListener, ListenerError};

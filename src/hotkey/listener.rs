//! Global keyboard hook
//!
//! Feeds raw press/release events into the engine from anywhere on the
//! system, regardless of input focus. `rdev::listen` is a blocking OS-level
//! call with no shutdown API, so it runs on a dedicated named thread and
//! the callback checks a stop flag before forwarding anything.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use rdev::{Event, EventType};
use tracing::{debug, info, warn};

use super::engine::HotkeyEngine;
use super::keys::AbstractKey;

/// Errors from installing or running the keyboard hook.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("failed to install keyboard hook: {0} - check input/Accessibility permissions")]
    HookUnavailable(String),

    #[error("failed to spawn listener thread: {0}")]
    ThreadSpawn(String),
}

/// Global keyboard listener bound to one engine instance.
///
/// The engine's pressed-key state lives exactly as long as the hook: it is
/// cleared on `stop()` so nothing appears held across a restart.
pub struct GlobalListener {
    engine: Arc<HotkeyEngine>,
    running: Arc<AtomicBool>,
}

impl GlobalListener {
    pub fn new(engine: Arc<HotkeyEngine>) -> Self {
        Self {
            engine,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the hook thread. Starting an already-running listener is a
    /// no-op. If the OS later refuses the hook (permission denied, no
    /// display server) the thread logs [`ListenerError::HookUnavailable`]
    /// and clears the running flag; the rest of the application keeps
    /// working without global reach.
    pub fn start(&self) -> Result<(), ListenerError> {
        if self.running.swap(true, Ordering::SeqCst) {
            info!("global listener already running");
            return Ok(());
        }

        let engine = Arc::clone(&self.engine);
        let running = Arc::clone(&self.running);

        thread::Builder::new()
            .name("keyboard-hook".to_string())
            .spawn(move || {
                info!("keyboard hook thread started");

                if let Err(e) = run_hook(engine, Arc::clone(&running)) {
                    warn!(%e, "global hotkeys unavailable - in-focus shortcuts are unaffected");
                }

                running.store(false, Ordering::SeqCst);
                info!("keyboard hook thread exited");
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                ListenerError::ThreadSpawn(e.to_string())
            })?;

        Ok(())
    }

    /// Stop forwarding events. Stopping an already-stopped listener is a
    /// no-op. rdev offers no way to tear the hook down, so the thread
    /// stays blocked in the OS call but discards everything it sees.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.engine.clear_key_state();
        info!("global listener stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Install the hook and block in it. Returns only when the OS refuses
/// the hook (permission denied, no display server).
fn run_hook(engine: Arc<HotkeyEngine>, running: Arc<AtomicBool>) -> Result<(), ListenerError> {
    rdev::listen(move |event: Event| {
        if !running.load(Ordering::SeqCst) {
            return;
        }
        forward(&engine, &event);
    })
    .map_err(|e| ListenerError::HookUnavailable(format!("{:?}", e)))
}

/// Translate one hook event and hand it to the engine. Events are
/// processed synchronously here so they reach the engine in arrival
/// order; the engine itself never blocks on dispatch.
fn forward(engine: &HotkeyEngine, event: &Event) {
    match event.event_type {
        EventType::KeyPress(key) => {
            if let Some(key) = AbstractKey::from_rdev(key) {
                engine.on_press(key);
            } else {
                debug!(?key, "untracked key press ignored");
            }
        }
        EventType::KeyRelease(key) => {
            if let Some(key) = AbstractKey::from_rdev(key) {
                engine.on_release(key);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_listener_starts_stopped() {
        let (tx, _rx) = mpsc::channel(8);
        let listener = GlobalListener::new(Arc::new(HotkeyEngine::new(tx)));
        assert!(!listener.is_running());
    }

    #[test]
    fn test_stop_when_stopped_is_noop() {
        let (tx, _rx) = mpsc::channel(8);
        let listener = GlobalListener::new(Arc::new(HotkeyEngine::new(tx)));
        listener.stop();
        listener.stop();
        assert!(!listener.is_running());
    }
}

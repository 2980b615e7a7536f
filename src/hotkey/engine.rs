//! Combo matching engine
//!
//! Owns the binding table, the set of currently-pressed keys, and the
//! per-binding activation flags. Bindings fire exactly once on the edge
//! where their key set becomes fully pressed, and re-arm once any of
//! their keys is released.

use std::collections::HashSet;
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::compile;
use super::keys::AbstractKey;
use crate::action::{ActionId, FiredAction};

/// One compiled hotkey binding. Read-only once built; a binding whose
/// spec produced no usable tokens has an empty key set and never fires.
#[derive(Debug, Clone)]
pub struct Binding {
    pub action: ActionId,
    pub spec: String,
    pub keys: HashSet<AbstractKey>,
}

impl Binding {
    pub fn compile(action: ActionId, spec: &str) -> Self {
        let keys = compile::compile(spec);
        if keys.is_empty() {
            warn!(%action, spec, "hotkey spec compiled to nothing, binding is dormant");
        }
        Self {
            action,
            spec: spec.to_string(),
            keys,
        }
    }
}

/// A binding plus its runtime activation flag.
struct Slot {
    binding: Binding,
    /// True between the moment the combo became fully pressed (and fired)
    /// and the moment one of its keys was released.
    active: bool,
}

/// Everything the hook thread and the daemon API both touch. One lock
/// serializes hook events against rebuild/clear; updates are O(bindings).
struct EngineState {
    slots: Vec<Slot>,
    pressed: HashSet<AbstractKey>,
    /// Union of all compiled key sets; key traffic outside it is discarded
    /// before touching `pressed`.
    watched: HashSet<AbstractKey>,
}

impl EngineState {
    fn empty() -> Self {
        Self {
            slots: Vec::new(),
            pressed: HashSet::new(),
            watched: HashSet::new(),
        }
    }
}

/// The hotkey recognition engine facade.
///
/// Press/release events arrive from the listener's hook thread; fired
/// actions leave over a bounded channel so a slow consumer can never
/// stall event processing.
pub struct HotkeyEngine {
    state: Mutex<EngineState>,
    action_tx: mpsc::Sender<FiredAction>,
}

impl HotkeyEngine {
    pub fn new(action_tx: mpsc::Sender<FiredAction>) -> Self {
        Self {
            state: Mutex::new(EngineState::empty()),
            action_tx,
        }
    }

    /// Replace the binding table.
    ///
    /// Pressed-key state and all activation flags are cleared in the same
    /// critical section, so no binding can stay active across a rebuild
    /// and no stale key can satisfy a redefined combo.
    pub fn rebuild(&self, bindings: Vec<Binding>) {
        let mut state = self.state.lock().unwrap();

        let mut watched = HashSet::new();
        for binding in &bindings {
            watched.extend(binding.keys.iter().copied());
        }

        let live = bindings.iter().filter(|b| !b.keys.is_empty()).count();
        info!(
            bindings = bindings.len(),
            live,
            watched_keys = watched.len(),
            "binding table rebuilt"
        );

        state.slots = bindings
            .into_iter()
            .map(|binding| Slot {
                binding,
                active: false,
            })
            .collect();
        state.watched = watched;
        state.pressed.clear();
    }

    /// Handle a key-down from the hook.
    ///
    /// Keys outside the watched set are discarded without touching any
    /// state. A binding fires only on the transition into fully-pressed;
    /// OS key-repeat resends while held hit the already-active flag and
    /// are silently ignored.
    pub fn on_press(&self, key: AbstractKey) {
        let mut state = self.state.lock().unwrap();

        if !state.watched.contains(&key) {
            return;
        }
        state.pressed.insert(key);
        debug!(%key, pressed = state.pressed.len(), "key down");

        // Table order, so simultaneously satisfied bindings fire in a
        // stable order. Overlapping bindings all fire independently.
        let EngineState { slots, pressed, .. } = &mut *state;
        for slot in slots.iter_mut() {
            if slot.binding.keys.is_empty() || slot.active {
                continue;
            }
            if slot.binding.keys.is_subset(pressed) {
                slot.active = true;
                info!(action = %slot.binding.action, spec = %slot.binding.spec, "hotkey fired");
                self.fire(slot.binding.action);
            }
        }
    }

    /// Handle a key-up from the hook.
    ///
    /// Characters are stored lowercase on both the press and compile
    /// paths, so the exact-match removal also covers a key released with
    /// a different shift state than it was pressed with. Any binding
    /// that loses subset-ness re-arms silently.
    pub fn on_release(&self, key: AbstractKey) {
        let mut state = self.state.lock().unwrap();

        if !state.pressed.remove(&key) {
            return;
        }
        debug!(%key, pressed = state.pressed.len(), "key up");

        let EngineState { slots, pressed, .. } = &mut *state;
        for slot in slots.iter_mut() {
            if slot.active && !slot.binding.keys.is_subset(pressed) {
                slot.active = false;
                debug!(action = %slot.binding.action, "binding re-armed");
            }
        }
    }

    /// Forget all held keys and reset every binding to idle. Called when
    /// the listener stops, so nothing stays "held" across a restart.
    pub fn clear_key_state(&self) {
        let mut state = self.state.lock().unwrap();
        state.pressed.clear();
        for slot in &mut state.slots {
            slot.active = false;
        }
    }

    fn fire(&self, action: ActionId) {
        // Never block the hook thread; a full channel means the host is
        // hopelessly behind and the press is dropped.
        if let Err(e) = self.action_tx.try_send(FiredAction { action }) {
            warn!(%action, ?e, "failed to dispatch fired action");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Direction;
    use crate::hotkey::compile::{compile_on, Platform};
    use crate::hotkey::keys::{Modifier, SpecialKey};

    fn binding_on(action: ActionId, spec: &str, platform: Platform) -> Binding {
        Binding {
            action,
            spec: spec.to_string(),
            keys: compile_on(spec, platform),
        }
    }

    fn engine_with(bindings: Vec<Binding>) -> (HotkeyEngine, mpsc::Receiver<FiredAction>) {
        let (tx, rx) = mpsc::channel(16);
        let engine = HotkeyEngine::new(tx);
        engine.rebuild(bindings);
        (engine, rx)
    }

    fn fired_actions(rx: &mut mpsc::Receiver<FiredAction>) -> Vec<ActionId> {
        let mut out = Vec::new();
        while let Ok(fired) = rx.try_recv() {
            out.push(fired.action);
        }
        out
    }

    const CTRL: AbstractKey = AbstractKey::Modifier(Modifier::Ctrl);
    const ALT: AbstractKey = AbstractKey::Modifier(Modifier::Alt);
    const CMD: AbstractKey = AbstractKey::Modifier(Modifier::CmdOrWin);

    #[test]
    fn test_fires_once_on_full_press() {
        let (engine, mut rx) = engine_with(vec![binding_on(
            ActionId::Screenshot,
            "Ctrl+Alt+1",
            Platform::Other,
        )]);

        engine.on_press(CTRL);
        engine.on_press(ALT);
        assert!(fired_actions(&mut rx).is_empty());

        engine.on_press(AbstractKey::Character('1'));
        assert_eq!(fired_actions(&mut rx), vec![ActionId::Screenshot]);
    }

    #[test]
    fn test_key_repeat_does_not_refire() {
        let (engine, mut rx) = engine_with(vec![binding_on(
            ActionId::Screenshot,
            "Ctrl+Alt+1",
            Platform::Other,
        )]);

        engine.on_press(CTRL);
        engine.on_press(ALT);
        engine.on_press(AbstractKey::Character('1'));
        // OS auto-repeat resends the character while everything is held
        engine.on_press(AbstractKey::Character('1'));
        engine.on_press(AbstractKey::Character('1'));

        assert_eq!(fired_actions(&mut rx), vec![ActionId::Screenshot]);
    }

    #[test]
    fn test_release_rearms_and_fires_again() {
        let (engine, mut rx) = engine_with(vec![binding_on(
            ActionId::Screenshot,
            "Ctrl+Alt+1",
            Platform::Other,
        )]);

        engine.on_press(CTRL);
        engine.on_press(ALT);
        engine.on_press(AbstractKey::Character('1'));
        engine.on_release(AbstractKey::Character('1'));
        engine.on_press(AbstractKey::Character('1'));

        assert_eq!(
            fired_actions(&mut rx),
            vec![ActionId::Screenshot, ActionId::Screenshot]
        );
    }

    #[test]
    fn test_releasing_any_required_key_rearms() {
        let (engine, mut rx) = engine_with(vec![binding_on(
            ActionId::Screenshot,
            "Ctrl+Alt+1",
            Platform::Other,
        )]);

        engine.on_press(CTRL);
        engine.on_press(ALT);
        engine.on_press(AbstractKey::Character('1'));
        engine.on_release(ALT);
        engine.on_press(ALT);

        assert_eq!(
            fired_actions(&mut rx),
            vec![ActionId::Screenshot, ActionId::Screenshot]
        );
    }

    #[test]
    fn test_empty_spec_never_fires() {
        let (engine, mut rx) =
            engine_with(vec![binding_on(ActionId::Panic, "", Platform::Other)]);

        engine.on_press(CTRL);
        engine.on_press(ALT);
        engine.on_press(AbstractKey::Character('q'));
        engine.on_release(AbstractKey::Character('q'));
        engine.on_press(AbstractKey::Character('q'));

        assert!(fired_actions(&mut rx).is_empty());
    }

    #[test]
    fn test_unwatched_keys_are_discarded() {
        let (engine, mut rx) = engine_with(vec![binding_on(
            ActionId::Screenshot,
            "Ctrl+Alt+1",
            Platform::Other,
        )]);

        // 'z' appears in no binding and must not be tracked
        engine.on_press(AbstractKey::Character('z'));
        engine.on_press(CTRL);
        engine.on_press(ALT);
        assert!(fired_actions(&mut rx).is_empty());
        assert!(engine.state.lock().unwrap().pressed.len() == 2);
    }

    #[test]
    fn test_overlapping_bindings_both_fire() {
        let (engine, mut rx) = engine_with(vec![
            binding_on(ActionId::ResetHistory, "Ctrl+Alt", Platform::Other),
            binding_on(ActionId::Screenshot, "Ctrl+Alt+1", Platform::Other),
        ]);

        engine.on_press(CTRL);
        engine.on_press(ALT);
        assert_eq!(fired_actions(&mut rx), vec![ActionId::ResetHistory]);

        engine.on_press(AbstractKey::Character('1'));
        assert_eq!(fired_actions(&mut rx), vec![ActionId::Screenshot]);
    }

    #[test]
    fn test_move_binding_platforms() {
        // "Win+Up" compiled on a non-mac host and "Cmd+Up" on a mac host
        // resolve to the same token set; the engine is platform-agnostic
        // once given resolved tokens.
        let action = ActionId::MoveWindow {
            direction: Direction::Up,
        };
        let (engine, mut rx) =
            engine_with(vec![binding_on(action, "Win+Up", Platform::Other)]);

        engine.on_press(CMD);
        engine.on_press(AbstractKey::Special(SpecialKey::Up));
        assert_eq!(fired_actions(&mut rx), vec![action]);

        let (engine, mut rx) =
            engine_with(vec![binding_on(action, "Cmd+Up", Platform::MacOs)]);

        engine.on_press(CMD);
        engine.on_press(AbstractKey::Special(SpecialKey::Up));
        assert_eq!(fired_actions(&mut rx), vec![action]);
    }

    #[test]
    fn test_rebuild_clears_pressed_and_active_state() {
        let (engine, mut rx) = engine_with(vec![binding_on(
            ActionId::Screenshot,
            "Ctrl+Alt+1",
            Platform::Other,
        )]);

        engine.on_press(CTRL);
        engine.on_press(ALT);
        engine.on_press(AbstractKey::Character('1'));
        assert_eq!(fired_actions(&mut rx), vec![ActionId::Screenshot]);

        // Redefine the same action; held keys must not carry over
        engine.rebuild(vec![binding_on(
            ActionId::Screenshot,
            "Ctrl+Alt+2",
            Platform::Other,
        )]);
        engine.on_press(AbstractKey::Character('2'));
        assert!(fired_actions(&mut rx).is_empty());

        engine.on_press(CTRL);
        engine.on_press(ALT);
        assert_eq!(fired_actions(&mut rx), vec![ActionId::Screenshot]);
    }

    #[test]
    fn test_clear_key_state_resets_to_idle() {
        let (engine, mut rx) = engine_with(vec![binding_on(
            ActionId::Screenshot,
            "Ctrl+Alt+1",
            Platform::Other,
        )]);

        engine.on_press(CTRL);
        engine.on_press(ALT);
        engine.on_press(AbstractKey::Character('1'));
        assert_eq!(fired_actions(&mut rx), vec![ActionId::Screenshot]);

        engine.clear_key_state();

        // All keys must be re-pressed from scratch
        engine.on_press(CTRL);
        engine.on_press(ALT);
        assert!(fired_actions(&mut rx).is_empty());
        engine.on_press(AbstractKey::Character('1'));
        assert_eq!(fired_actions(&mut rx), vec![ActionId::Screenshot]);
    }

    #[test]
    fn test_dispatch_reaches_async_consumer() {
        let (engine, mut rx) = engine_with(vec![binding_on(
            ActionId::ToggleVisibility,
            "Ctrl+Alt+B",
            Platform::Other,
        )]);

        engine.on_press(CTRL);
        engine.on_press(ALT);
        engine.on_press(AbstractKey::character('B'));

        let fired = tokio_test::block_on(rx.recv()).unwrap();
        assert_eq!(fired.action, ActionId::ToggleVisibility);
    }
}

//! Key event controller.
//!
//! `EventController` sits between the host's event delivery and the engine.
//! For every event it walks a fixed decision tree (first match wins):
//!
//! 1. anything but key-down passes through
//! 2. Control+Space flips the session's enabled state (even while disabled)
//! 3. while disabled, everything else passes through
//! 4. Command, Option or Control held: pass through so system shortcuts work
//! 5. otherwise the key goes to the engine with `caps = shift XOR capsLock`
//! 6. no engine result: pass through
//! 7. a result is applied as N single deletions followed by one insertion
//!
//! The enabled flag is session-local. The hotkey never writes it back to the
//! configuration store; the persisted value is only read at construction.

use crate::backend::EngineBackend;
use crate::client::TextClient;
use crate::gateway::SharedGateway;
use crate::keycode;
use crate::settings::ConfigurationStore;
use crate::store::KeyValueStore;

bitflags::bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const CAPS_LOCK = 1 << 2;
        const COMMAND = 1 << 3;
        const OPTION = 1 << 4;
    }
}

/// Kind of key event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyEventKind {
    #[default]
    KeyDown,
    KeyUp,
    /// Modifier-only change
    FlagsChanged,
}

/// A raw key event from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Engine virtual key code (see `keycode`)
    pub key_code: u16,
    pub kind: KeyEventKind,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn key_down(key_code: u16, modifiers: Modifiers) -> Self {
        Self {
            key_code,
            kind: KeyEventKind::KeyDown,
            modifiers,
        }
    }

    pub fn key_up(key_code: u16, modifiers: Modifiers) -> Self {
        Self {
            key_code,
            kind: KeyEventKind::KeyUp,
            modifiers,
        }
    }

    /// Control+Space, the fixed enable/disable binding.
    pub fn is_toggle_hotkey(&self) -> bool {
        self.modifiers.contains(Modifiers::CONTROL) && self.key_code == keycode::SPACE
    }
}

/// Result of handling a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    /// Key was consumed, the host must not process it
    Handled,
    /// Key was not consumed (pass through to application)
    NotHandled,
}

impl KeyResult {
    pub fn from_consumed(consumed: bool) -> Self {
        if consumed {
            Self::Handled
        } else {
            Self::NotHandled
        }
    }

    pub fn is_handled(self) -> bool {
        self == Self::Handled
    }
}

/// Whether the engine should produce uppercase output: Shift XOR Caps Lock.
pub fn calculate_caps(modifiers: Modifiers) -> bool {
    modifiers.contains(Modifiers::SHIFT) != modifiers.contains(Modifiers::CAPS_LOCK)
}

type ToggleObserver = Box<dyn FnMut(bool)>;

pub struct EventController<B> {
    gateway: SharedGateway<B>,
    enabled: bool,
    observers: Vec<ToggleObserver>,
}

impl<B: EngineBackend> EventController<B> {
    /// Build a controller, pushing the full stored configuration to the engine
    /// and seeding the session's enabled state from it.
    pub fn new<S: KeyValueStore>(settings: &ConfigurationStore<S, B>) -> Self {
        settings.apply_all();
        let enabled = settings.enabled();
        tracing::debug!(enabled, "controller created");
        Self {
            gateway: settings.gateway().clone(),
            enabled,
            observers: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn gateway(&self) -> &SharedGateway<B> {
        &self.gateway
    }

    /// Register an observer for enabled-state changes made by the hotkey.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(bool) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Handle one key event, mutating `client` as the engine directs.
    pub fn handle(&mut self, event: &KeyEvent, client: &mut dyn TextClient) -> KeyResult {
        if event.kind != KeyEventKind::KeyDown {
            return KeyResult::NotHandled;
        }

        if event.is_toggle_hotkey() {
            self.toggle_enabled();
            return KeyResult::Handled;
        }

        if !self.enabled {
            return KeyResult::NotHandled;
        }

        if event
            .modifiers
            .intersects(Modifiers::COMMAND | Modifiers::OPTION | Modifiers::CONTROL)
        {
            tracing::debug!(key_code = event.key_code, modifiers = ?event.modifiers, "system shortcut, passing through");
            return KeyResult::NotHandled;
        }

        let caps = calculate_caps(event.modifiers);
        let ctrl = event.modifiers.contains(Modifiers::CONTROL);
        let shift = event.modifiers.contains(Modifiers::SHIFT);

        let result = self
            .gateway
            .borrow_mut()
            .process_key(event.key_code, caps, ctrl, shift);

        let Some(result) = result else {
            return KeyResult::NotHandled;
        };

        // One deletion at a time; clients may track intermediate states.
        for _ in 0..result.backspace_count {
            client.delete_backward();
        }
        if !result.text.is_empty() {
            client.insert_text(&result.text);
        }

        if result.has_mutation() {
            tracing::debug!(
                key_code = event.key_code,
                backspace = result.backspace_count,
                text = %result.text,
                consumed = result.consumed,
                "engine result applied"
            );
        } else {
            tracing::debug!(key_code = event.key_code, consumed = result.consumed, "no edits");
        }
        KeyResult::from_consumed(result.consumed)
    }

    /// The input session gained focus (app or field switch).
    pub fn activate(&mut self) {
        self.gateway.borrow_mut().clear_all();
    }

    /// The input session lost focus.
    pub fn deactivate(&mut self) {
        self.gateway.borrow_mut().clear_all();
    }

    fn toggle_enabled(&mut self) {
        self.enabled = !self.enabled;
        self.gateway.borrow_mut().set_enabled(self.enabled);
        tracing::info!(enabled = self.enabled, "toggled by hotkey");
        for observer in &mut self.observers {
            observer(self.enabled);
        }
    }
}

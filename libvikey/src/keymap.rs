// libvikey/src/keymap.rs
//
// Translation of Linux (X11/IBus) key events into engine key events.
//
// IBus hands engines X11 keycodes, which are evdev scancodes offset by 8, and
// a modifier state mask. The engine only understands macOS virtual key codes,
// so keys are looked up in a static table; keys with no engine equivalent are
// left to the host.

use std::collections::HashMap;

use libvikey_core::keycode;
use libvikey_core::{KeyEvent, KeyEventKind, Modifiers};
use once_cell::sync::Lazy;

pub const IBUS_SHIFT_MASK: u32 = 1 << 0;
pub const IBUS_LOCK_MASK: u32 = 1 << 1;
pub const IBUS_CONTROL_MASK: u32 = 1 << 2;
/// Usually Alt
pub const IBUS_MOD1_MASK: u32 = 1 << 3;
pub const IBUS_SUPER_MASK: u32 = 1 << 26;
pub const IBUS_RELEASE_MASK: u32 = 1 << 30;

/// X11 keycode -> engine key code
static X11_TO_ENGINE: Lazy<HashMap<u32, u16>> = Lazy::new(|| {
    let mut m = HashMap::new();

    m.insert(9, keycode::ESC);

    // Number row: 1..9, 0, -, =, backspace
    m.insert(10, keycode::N1);
    m.insert(11, keycode::N2);
    m.insert(12, keycode::N3);
    m.insert(13, keycode::N4);
    m.insert(14, keycode::N5);
    m.insert(15, keycode::N6);
    m.insert(16, keycode::N7);
    m.insert(17, keycode::N8);
    m.insert(18, keycode::N9);
    m.insert(19, keycode::N0);
    m.insert(20, keycode::MINUS);
    m.insert(21, keycode::EQUAL);
    m.insert(22, keycode::DELETE);
    m.insert(23, keycode::TAB);

    // Top row
    m.insert(24, keycode::Q);
    m.insert(25, keycode::W);
    m.insert(26, keycode::E);
    m.insert(27, keycode::R);
    m.insert(28, keycode::T);
    m.insert(29, keycode::Y);
    m.insert(30, keycode::U);
    m.insert(31, keycode::I);
    m.insert(32, keycode::O);
    m.insert(33, keycode::P);
    m.insert(34, keycode::LEFT_BRACKET);
    m.insert(35, keycode::RIGHT_BRACKET);
    m.insert(36, keycode::RETURN);

    // Home row
    m.insert(38, keycode::A);
    m.insert(39, keycode::S);
    m.insert(40, keycode::D);
    m.insert(41, keycode::F);
    m.insert(42, keycode::G);
    m.insert(43, keycode::H);
    m.insert(44, keycode::J);
    m.insert(45, keycode::K);
    m.insert(46, keycode::L);
    m.insert(47, keycode::SEMICOLON);
    m.insert(48, keycode::QUOTE);
    m.insert(49, keycode::BACKQUOTE);
    m.insert(51, keycode::BACKSLASH);

    // Bottom row
    m.insert(52, keycode::Z);
    m.insert(53, keycode::X);
    m.insert(54, keycode::C);
    m.insert(55, keycode::V);
    m.insert(56, keycode::B);
    m.insert(57, keycode::N);
    m.insert(58, keycode::M);
    m.insert(59, keycode::COMMA);
    m.insert(60, keycode::DOT);
    m.insert(61, keycode::SLASH);

    m.insert(65, keycode::SPACE);
    m.insert(104, keycode::ENTER); // keypad enter

    // Arrows
    m.insert(111, keycode::UP);
    m.insert(113, keycode::LEFT);
    m.insert(114, keycode::RIGHT);
    m.insert(116, keycode::DOWN);

    m
});

/// Engine key code for an X11 keycode, if the engine knows the key.
pub fn linux_to_mac(x11_keycode: u32) -> Option<u16> {
    X11_TO_ENGINE.get(&x11_keycode).copied()
}

/// Modifier set for an IBus state mask.
pub fn modifiers_from_ibus(state: u32) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    if state & IBUS_SHIFT_MASK != 0 {
        modifiers |= Modifiers::SHIFT;
    }
    if state & IBUS_LOCK_MASK != 0 {
        modifiers |= Modifiers::CAPS_LOCK;
    }
    if state & IBUS_CONTROL_MASK != 0 {
        modifiers |= Modifiers::CONTROL;
    }
    if state & IBUS_MOD1_MASK != 0 {
        modifiers |= Modifiers::OPTION;
    }
    if state & IBUS_SUPER_MASK != 0 {
        modifiers |= Modifiers::COMMAND;
    }
    modifiers
}

/// Build a controller event from an IBus key event.
///
/// Returns `None` for keys the engine has no code for; the host should let
/// those through untouched.
pub fn event_from_ibus(x11_keycode: u32, state: u32) -> Option<KeyEvent> {
    let key_code = linux_to_mac(x11_keycode)?;
    let kind = if state & IBUS_RELEASE_MASK != 0 {
        KeyEventKind::KeyUp
    } else {
        KeyEventKind::KeyDown
    };
    Some(KeyEvent {
        key_code,
        kind,
        modifiers: modifiers_from_ibus(state),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters() {
        assert_eq!(linux_to_mac(38), Some(keycode::A));
        assert_eq!(linux_to_mac(25), Some(keycode::W));
        assert_eq!(linux_to_mac(52), Some(keycode::Z));
        assert_eq!(linux_to_mac(58), Some(keycode::M));
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(linux_to_mac(0), None);
        assert_eq!(linux_to_mac(37), None); // left control
        assert_eq!(linux_to_mac(67), None); // F1
    }

    #[test]
    fn test_modifier_mask() {
        let mods = modifiers_from_ibus(IBUS_SHIFT_MASK | IBUS_LOCK_MASK);
        assert_eq!(mods, Modifiers::SHIFT | Modifiers::CAPS_LOCK);
        let mods = modifiers_from_ibus(IBUS_MOD1_MASK | IBUS_SUPER_MASK);
        assert_eq!(mods, Modifiers::OPTION | Modifiers::COMMAND);
    }

    #[test]
    fn test_ibus_event() {
        let event = event_from_ibus(65, IBUS_CONTROL_MASK).unwrap();
        assert!(event.is_toggle_hotkey());
        assert_eq!(event.kind, KeyEventKind::KeyDown);

        let release = event_from_ibus(38, IBUS_RELEASE_MASK).unwrap();
        assert_eq!(release.kind, KeyEventKind::KeyUp);

        assert!(event_from_ibus(67, 0).is_none());
    }
}

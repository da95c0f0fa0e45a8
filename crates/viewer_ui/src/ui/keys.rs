//! Native key code to toolkit key table

use std::collections::HashMap;

use imgui::Key;

use crate::input::native::key;

#[rustfmt::skip]
const LETTERS: [Key; 26] = [
    Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
    Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
    Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
];

#[rustfmt::skip]
const DIGITS: [Key; 10] = [
    Key::Alpha0, Key::Alpha1, Key::Alpha2, Key::Alpha3, Key::Alpha4,
    Key::Alpha5, Key::Alpha6, Key::Alpha7, Key::Alpha8, Key::Alpha9,
];

#[rustfmt::skip]
const KEYPAD_DIGITS: [Key; 10] = [
    Key::Keypad0, Key::Keypad1, Key::Keypad2, Key::Keypad3, Key::Keypad4,
    Key::Keypad5, Key::Keypad6, Key::Keypad7, Key::Keypad8, Key::Keypad9,
];

#[rustfmt::skip]
const FUNCTION_KEYS: [Key; 12] = [
    Key::F1, Key::F2, Key::F3, Key::F4, Key::F5, Key::F6,
    Key::F7, Key::F8, Key::F9, Key::F10, Key::F11, Key::F12,
];

const NAMED: [(i32, Key); 47] = [
    (key::TAB, Key::Tab),
    (key::LEFT, Key::LeftArrow),
    (key::RIGHT, Key::RightArrow),
    (key::UP, Key::UpArrow),
    (key::DOWN, Key::DownArrow),
    (key::PAGE_UP, Key::PageUp),
    (key::PAGE_DOWN, Key::PageDown),
    (key::HOME, Key::Home),
    (key::END, Key::End),
    (key::INSERT, Key::Insert),
    (key::DELETE, Key::Delete),
    (key::BACKSPACE, Key::Backspace),
    (key::SPACE, Key::Space),
    (key::ENTER, Key::Enter),
    (key::ESCAPE, Key::Escape),
    (key::APOSTROPHE, Key::Apostrophe),
    (key::COMMA, Key::Comma),
    (key::MINUS, Key::Minus),
    (key::PERIOD, Key::Period),
    (key::SLASH, Key::Slash),
    (key::SEMICOLON, Key::Semicolon),
    (key::EQUAL, Key::Equal),
    (key::LEFT_BRACKET, Key::LeftBracket),
    (key::BACKSLASH, Key::Backslash),
    (key::RIGHT_BRACKET, Key::RightBracket),
    (key::GRAVE_ACCENT, Key::GraveAccent),
    (key::CAPS_LOCK, Key::CapsLock),
    (key::SCROLL_LOCK, Key::ScrollLock),
    (key::NUM_LOCK, Key::NumLock),
    (key::PRINT_SCREEN, Key::PrintScreen),
    (key::PAUSE, Key::Pause),
    (key::KP_DECIMAL, Key::KeypadDecimal),
    (key::KP_DIVIDE, Key::KeypadDivide),
    (key::KP_MULTIPLY, Key::KeypadMultiply),
    (key::KP_SUBTRACT, Key::KeypadSubtract),
    (key::KP_ADD, Key::KeypadAdd),
    (key::KP_ENTER, Key::KeypadEnter),
    (key::KP_EQUAL, Key::KeypadEqual),
    (key::LEFT_SHIFT, Key::LeftShift),
    (key::LEFT_CONTROL, Key::LeftCtrl),
    (key::LEFT_ALT, Key::LeftAlt),
    (key::LEFT_SUPER, Key::LeftSuper),
    (key::RIGHT_SHIFT, Key::RightShift),
    (key::RIGHT_CONTROL, Key::RightCtrl),
    (key::RIGHT_ALT, Key::RightAlt),
    (key::RIGHT_SUPER, Key::RightSuper),
    (key::MENU, Key::Menu),
];

/// Native key code to toolkit key, built once per session
pub struct KeyTable {
    keys: HashMap<i32, Key>,
}

impl KeyTable {
    /// Build the full table
    pub fn new() -> Self {
        let ranges = [
            (key::A, &LETTERS[..]),
            (key::NUM_0, &DIGITS[..]),
            (key::KP_0, &KEYPAD_DIGITS[..]),
            (key::F1, &FUNCTION_KEYS[..]),
        ];

        let mut keys: HashMap<i32, Key> = NAMED.iter().copied().collect();
        for (first, range) in ranges {
            keys.extend((first..).zip(range.iter().copied()));
        }
        Self { keys }
    }

    /// Toolkit key for a native code; `None` for keys the toolkit lacks
    pub fn get(&self, native_key: i32) -> Option<Key> {
        self.keys.get(&native_key).copied()
    }

    /// Number of mapped native codes
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::new()
    }
}

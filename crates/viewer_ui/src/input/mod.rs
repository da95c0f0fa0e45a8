//! Portable input codes
//!
//! Converts the native (GLFW) integer codes carried by [`NativeEvent`]s into
//! portable enumerations. The conversions are total: any integer maps to a
//! defined value, unknown keys to [`KeyCode::Unknown`] and unknown mouse
//! buttons to [`MouseButton::Button1`].
//!
//! [`NativeEvent`]: crate::render::window::backend::NativeEvent

use bitflags::bitflags;

/// Native GLFW codes, as delivered by the windowing layer
pub mod native {
    /// Key released
    pub const RELEASE: i32 = 0;
    /// Key or button pressed
    pub const PRESS: i32 = 1;
    /// Key held down long enough to repeat
    pub const REPEAT: i32 = 2;

    /// Shift modifier bit
    pub const MOD_SHIFT: i32 = 0x0001;
    /// Control modifier bit
    pub const MOD_CONTROL: i32 = 0x0002;
    /// Alt modifier bit
    pub const MOD_ALT: i32 = 0x0004;
    /// Super modifier bit
    pub const MOD_SUPER: i32 = 0x0008;

    /// Highest native mouse button index
    pub const MOUSE_BUTTON_LAST: i32 = 7;

    #[allow(missing_docs)]
    pub mod key {
        pub const UNKNOWN: i32 = -1;
        pub const SPACE: i32 = 32;
        pub const APOSTROPHE: i32 = 39;
        pub const COMMA: i32 = 44;
        pub const MINUS: i32 = 45;
        pub const PERIOD: i32 = 46;
        pub const SLASH: i32 = 47;
        pub const NUM_0: i32 = 48;
        pub const NUM_9: i32 = 57;
        pub const SEMICOLON: i32 = 59;
        pub const EQUAL: i32 = 61;
        pub const A: i32 = 65;
        pub const C: i32 = 67;
        pub const V: i32 = 86;
        pub const X: i32 = 88;
        pub const Y: i32 = 89;
        pub const Z: i32 = 90;
        pub const LEFT_BRACKET: i32 = 91;
        pub const BACKSLASH: i32 = 92;
        pub const RIGHT_BRACKET: i32 = 93;
        pub const GRAVE_ACCENT: i32 = 96;
        pub const WORLD_1: i32 = 161;
        pub const WORLD_2: i32 = 162;
        pub const ESCAPE: i32 = 256;
        pub const ENTER: i32 = 257;
        pub const TAB: i32 = 258;
        pub const BACKSPACE: i32 = 259;
        pub const INSERT: i32 = 260;
        pub const DELETE: i32 = 261;
        pub const RIGHT: i32 = 262;
        pub const LEFT: i32 = 263;
        pub const DOWN: i32 = 264;
        pub const UP: i32 = 265;
        pub const PAGE_UP: i32 = 266;
        pub const PAGE_DOWN: i32 = 267;
        pub const HOME: i32 = 268;
        pub const END: i32 = 269;
        pub const CAPS_LOCK: i32 = 280;
        pub const SCROLL_LOCK: i32 = 281;
        pub const NUM_LOCK: i32 = 282;
        pub const PRINT_SCREEN: i32 = 283;
        pub const PAUSE: i32 = 284;
        pub const F1: i32 = 290;
        pub const F25: i32 = 314;
        pub const KP_0: i32 = 320;
        pub const KP_9: i32 = 329;
        pub const KP_DECIMAL: i32 = 330;
        pub const KP_DIVIDE: i32 = 331;
        pub const KP_MULTIPLY: i32 = 332;
        pub const KP_SUBTRACT: i32 = 333;
        pub const KP_ADD: i32 = 334;
        pub const KP_ENTER: i32 = 335;
        pub const KP_EQUAL: i32 = 336;
        pub const LEFT_SHIFT: i32 = 340;
        pub const LEFT_CONTROL: i32 = 341;
        pub const LEFT_ALT: i32 = 342;
        pub const LEFT_SUPER: i32 = 343;
        pub const RIGHT_SHIFT: i32 = 344;
        pub const RIGHT_CONTROL: i32 = 345;
        pub const RIGHT_ALT: i32 = 346;
        pub const RIGHT_SUPER: i32 = 347;
        pub const MENU: i32 = 348;
        pub const LAST: i32 = MENU;
    }
}

/// Mouse button identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) button
    Button1,
    /// Secondary (right) button
    Button2,
    /// Middle button
    Button3,
    /// Extra button 4
    Button4,
    /// Extra button 5
    Button5,
    /// Extra button 6
    Button6,
    /// Extra button 7
    Button7,
    /// Extra button 8
    Button8,
}

/// Keyboard key codes
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Unknown,
    Space,
    Apostrophe,
    Comma,
    Minus,
    Period,
    Slash,
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Semicolon,
    Equal,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    LeftBracket,
    Backslash,
    RightBracket,
    GraveAccent,
    World1,
    World2,
    Escape,
    Enter,
    Tab,
    Backspace,
    Insert,
    Delete,
    Right,
    Left,
    Down,
    Up,
    PageUp,
    PageDown,
    Home,
    End,
    CapsLock,
    ScrollLock,
    NumLock,
    PrintScreen,
    Pause,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    F16,
    F17,
    F18,
    F19,
    F20,
    F21,
    F22,
    F23,
    F24,
    F25,
    Kp0,
    Kp1,
    Kp2,
    Kp3,
    Kp4,
    Kp5,
    Kp6,
    Kp7,
    Kp8,
    Kp9,
    KpDecimal,
    KpDivide,
    KpMultiply,
    KpSubtract,
    KpAdd,
    KpEnter,
    KpEqual,
    LeftShift,
    LeftControl,
    LeftAlt,
    LeftSuper,
    RightShift,
    RightControl,
    RightAlt,
    RightSuper,
    Menu,
}

bitflags! {
    /// Keyboard modifiers held during an input event
    ///
    /// Combine with `|`; the empty set means no modifier.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Either shift key
        const SHIFT = 1;
        /// Either control key
        const CONTROL = 2;
        /// Either alt key
        const ALT = 4;
        /// Either super (logo) key
        const SUPER = 8;
    }
}

const DIGITS: [KeyCode; 10] = [
    KeyCode::Zero,
    KeyCode::One,
    KeyCode::Two,
    KeyCode::Three,
    KeyCode::Four,
    KeyCode::Five,
    KeyCode::Six,
    KeyCode::Seven,
    KeyCode::Eight,
    KeyCode::Nine,
];

const LETTERS: [KeyCode; 26] = [
    KeyCode::A,
    KeyCode::B,
    KeyCode::C,
    KeyCode::D,
    KeyCode::E,
    KeyCode::F,
    KeyCode::G,
    KeyCode::H,
    KeyCode::I,
    KeyCode::J,
    KeyCode::K,
    KeyCode::L,
    KeyCode::M,
    KeyCode::N,
    KeyCode::O,
    KeyCode::P,
    KeyCode::Q,
    KeyCode::R,
    KeyCode::S,
    KeyCode::T,
    KeyCode::U,
    KeyCode::V,
    KeyCode::W,
    KeyCode::X,
    KeyCode::Y,
    KeyCode::Z,
];

const FUNCTION_KEYS: [KeyCode; 25] = [
    KeyCode::F1,
    KeyCode::F2,
    KeyCode::F3,
    KeyCode::F4,
    KeyCode::F5,
    KeyCode::F6,
    KeyCode::F7,
    KeyCode::F8,
    KeyCode::F9,
    KeyCode::F10,
    KeyCode::F11,
    KeyCode::F12,
    KeyCode::F13,
    KeyCode::F14,
    KeyCode::F15,
    KeyCode::F16,
    KeyCode::F17,
    KeyCode::F18,
    KeyCode::F19,
    KeyCode::F20,
    KeyCode::F21,
    KeyCode::F22,
    KeyCode::F23,
    KeyCode::F24,
    KeyCode::F25,
];

const KEYPAD_DIGITS: [KeyCode; 10] = [
    KeyCode::Kp0,
    KeyCode::Kp1,
    KeyCode::Kp2,
    KeyCode::Kp3,
    KeyCode::Kp4,
    KeyCode::Kp5,
    KeyCode::Kp6,
    KeyCode::Kp7,
    KeyCode::Kp8,
    KeyCode::Kp9,
];

const MOUSE_BUTTONS: [MouseButton; 8] = [
    MouseButton::Button1,
    MouseButton::Button2,
    MouseButton::Button3,
    MouseButton::Button4,
    MouseButton::Button5,
    MouseButton::Button6,
    MouseButton::Button7,
    MouseButton::Button8,
];

/// Convert a native mouse button index to a [`MouseButton`]
///
/// Indices outside the native range fall back to [`MouseButton::Button1`].
pub fn to_mouse_button(native_button: i32) -> MouseButton {
    usize::try_from(native_button)
        .ok()
        .and_then(|index| MOUSE_BUTTONS.get(index).copied())
        .unwrap_or(MouseButton::Button1)
}

/// Convert a native key code to a [`KeyCode`]
pub fn to_key_code(native_key: i32) -> KeyCode {
    use native::key;

    // Offsets inside each range are non-negative and bounded by the arrays.
    let lookup = |table: &[KeyCode], base: i32| table[(native_key - base) as usize];

    match native_key {
        key::SPACE => KeyCode::Space,
        key::APOSTROPHE => KeyCode::Apostrophe,
        key::COMMA => KeyCode::Comma,
        key::MINUS => KeyCode::Minus,
        key::PERIOD => KeyCode::Period,
        key::SLASH => KeyCode::Slash,
        key::NUM_0..=key::NUM_9 => lookup(&DIGITS, key::NUM_0),
        key::SEMICOLON => KeyCode::Semicolon,
        key::EQUAL => KeyCode::Equal,
        key::A..=key::Z => lookup(&LETTERS, key::A),
        key::LEFT_BRACKET => KeyCode::LeftBracket,
        key::BACKSLASH => KeyCode::Backslash,
        key::RIGHT_BRACKET => KeyCode::RightBracket,
        key::GRAVE_ACCENT => KeyCode::GraveAccent,
        key::WORLD_1 => KeyCode::World1,
        key::WORLD_2 => KeyCode::World2,
        key::ESCAPE => KeyCode::Escape,
        key::ENTER => KeyCode::Enter,
        key::TAB => KeyCode::Tab,
        key::BACKSPACE => KeyCode::Backspace,
        key::INSERT => KeyCode::Insert,
        key::DELETE => KeyCode::Delete,
        key::RIGHT => KeyCode::Right,
        key::LEFT => KeyCode::Left,
        key::DOWN => KeyCode::Down,
        key::UP => KeyCode::Up,
        key::PAGE_UP => KeyCode::PageUp,
        key::PAGE_DOWN => KeyCode::PageDown,
        key::HOME => KeyCode::Home,
        key::END => KeyCode::End,
        key::CAPS_LOCK => KeyCode::CapsLock,
        key::SCROLL_LOCK => KeyCode::ScrollLock,
        key::NUM_LOCK => KeyCode::NumLock,
        key::PRINT_SCREEN => KeyCode::PrintScreen,
        key::PAUSE => KeyCode::Pause,
        key::F1..=key::F25 => lookup(&FUNCTION_KEYS, key::F1),
        key::KP_0..=key::KP_9 => lookup(&KEYPAD_DIGITS, key::KP_0),
        key::KP_DECIMAL => KeyCode::KpDecimal,
        key::KP_DIVIDE => KeyCode::KpDivide,
        key::KP_MULTIPLY => KeyCode::KpMultiply,
        key::KP_SUBTRACT => KeyCode::KpSubtract,
        key::KP_ADD => KeyCode::KpAdd,
        key::KP_ENTER => KeyCode::KpEnter,
        key::KP_EQUAL => KeyCode::KpEqual,
        key::LEFT_SHIFT => KeyCode::LeftShift,
        key::LEFT_CONTROL => KeyCode::LeftControl,
        key::LEFT_ALT => KeyCode::LeftAlt,
        key::LEFT_SUPER => KeyCode::LeftSuper,
        key::RIGHT_SHIFT => KeyCode::RightShift,
        key::RIGHT_CONTROL => KeyCode::RightControl,
        key::RIGHT_ALT => KeyCode::RightAlt,
        key::RIGHT_SUPER => KeyCode::RightSuper,
        key::MENU => KeyCode::Menu,
        _ => KeyCode::Unknown,
    }
}

/// Convert a native modifier mask to [`Modifiers`]
///
/// Only the shift, control, alt and super bits are considered; lock-key bits
/// and anything above them are ignored.
pub fn to_modifiers(native_mods: i32) -> Modifiers {
    let mut result = Modifiers::empty();
    if native_mods & native::MOD_SHIFT != 0 {
        result |= Modifiers::SHIFT;
    }
    if native_mods & native::MOD_CONTROL != 0 {
        result |= Modifiers::CONTROL;
    }
    if native_mods & native::MOD_ALT != 0 {
        result |= Modifiers::ALT;
    }
    if native_mods & native::MOD_SUPER != 0 {
        result |= Modifiers::SUPER;
    }
    result
}

//! Per-frame UI input
//!
//! [`InputAccumulator`] collects transient input between polls: events can
//! arrive several times per frame, and a click that starts and ends between
//! two frames must still register. [`FrameSample`] is the pure part of frame
//! setup (display metrics, timing, pointer).

use crate::input::{native, Modifiers};
use crate::render::window::{NativeEvent, NativeWindow};

/// Delta time used for the very first frame of a session
pub const FIRST_FRAME_DELTA: f32 = 1.0 / 60.0;

/// Smallest delta time handed to the toolkit, which requires a positive one
pub const MIN_DELTA_TIME: f32 = 1.0e-5;

/// Pointer position reported while the window has no focus
pub const POINTER_OFFSCREEN: [f32; 2] = [-f32::MAX, -f32::MAX];

/// Number of mouse buttons tracked for the UI
pub const TRACKED_BUTTONS: usize = 3;

const MODIFIER_KEYS: [(i32, Modifiers); 8] = [
    (native::key::LEFT_SHIFT, Modifiers::SHIFT),
    (native::key::RIGHT_SHIFT, Modifiers::SHIFT),
    (native::key::LEFT_CONTROL, Modifiers::CONTROL),
    (native::key::RIGHT_CONTROL, Modifiers::CONTROL),
    (native::key::LEFT_ALT, Modifiers::ALT),
    (native::key::RIGHT_ALT, Modifiers::ALT),
    (native::key::LEFT_SUPER, Modifiers::SUPER),
    (native::key::RIGHT_SUPER, Modifiers::SUPER),
];

const MODIFIER_FLAGS: [Modifiers; 4] = [
    Modifiers::CONTROL,
    Modifiers::SHIFT,
    Modifiers::ALT,
    Modifiers::SUPER,
];

/// One entry of the ordered key stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Native key transition: `(key, down)`
    Key(i32, bool),
    /// A modifier became held (by either side's key) or fully released
    Modifier(Modifiers, bool),
}

/// Input gathered since the previous frame
#[derive(Debug, Default, Clone)]
pub struct InputAccumulator {
    mouse_pressed: [bool; TRACKED_BUTTONS],
    scroll: (f32, f32),
    keys: Vec<KeyInput>,
    chars: Vec<char>,
    held_modifiers: [bool; MODIFIER_KEYS.len()],
}

/// Everything the UI consumes for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct InputFrame {
    /// Button held now or pressed at any time since the last frame
    pub mouse_down: [bool; TRACKED_BUTTONS],
    /// Accumulated `(horizontal, vertical)` scroll
    pub scroll: (f32, f32),
    /// Key and modifier transitions in arrival order
    ///
    /// A modifier change is queued just before the key transition that
    /// caused it, so chords replay in the order they were typed.
    pub keys: Vec<KeyInput>,
    /// Typed characters in arrival order
    pub chars: Vec<char>,
    /// Modifier keys held at the end of the interval
    pub modifiers: Modifiers,
}

impl InputAccumulator {
    /// Nothing pending, no modifier held
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one native event into the pending state
    pub fn observe(&mut self, event: &NativeEvent) {
        match *event {
            NativeEvent::MouseButton(button, action, _) => {
                if action == native::PRESS {
                    if let Some(pressed) = usize::try_from(button)
                        .ok()
                        .and_then(|index| self.mouse_pressed.get_mut(index))
                    {
                        *pressed = true;
                    }
                }
            }
            NativeEvent::Scroll(x, y) => {
                self.scroll.0 += x as f32;
                self.scroll.1 += y as f32;
            }
            NativeEvent::Key(key, _, action, _) => {
                let down = match action {
                    native::PRESS => true,
                    native::RELEASE => false,
                    _ => return,
                };
                let before = self.modifiers();
                for (held, (code, _)) in self.held_modifiers.iter_mut().zip(MODIFIER_KEYS) {
                    if code == key {
                        *held = down;
                    }
                }
                let after = self.modifiers();
                for flag in MODIFIER_FLAGS {
                    if before.contains(flag) != after.contains(flag) {
                        self.keys.push(KeyInput::Modifier(flag, after.contains(flag)));
                    }
                }
                self.keys.push(KeyInput::Key(key, down));
            }
            NativeEvent::Char(code_point) => {
                if code_point > 0 && code_point < 0x1_0000 {
                    if let Some(c) = char::from_u32(code_point) {
                        self.chars.push(c);
                    }
                }
            }
            _ => {}
        }
    }

    /// Buttons pressed since the last frame
    pub fn mouse_pressed(&self) -> [bool; TRACKED_BUTTONS] {
        self.mouse_pressed
    }

    /// Scroll accumulated since the last frame, `(horizontal, vertical)`
    pub fn scroll(&self) -> (f32, f32) {
        self.scroll
    }

    /// Modifier keys currently held
    pub fn modifiers(&self) -> Modifiers {
        self.held_modifiers
            .iter()
            .zip(MODIFIER_KEYS)
            .filter(|(held, _)| **held)
            .fold(Modifiers::empty(), |mods, (_, (_, flag))| mods | flag)
    }

    /// Produce this frame's input and reset the transient state
    ///
    /// `live_buttons` is the button state read from the window right now; a
    /// button counts as down if it is held or was pressed at any point since
    /// the previous frame.
    pub fn take_frame(&mut self, live_buttons: [bool; TRACKED_BUTTONS]) -> InputFrame {
        let mut mouse_down = live_buttons;
        for (down, pressed) in mouse_down.iter_mut().zip(&mut self.mouse_pressed) {
            *down |= std::mem::take(pressed);
        }

        InputFrame {
            mouse_down,
            scroll: std::mem::take(&mut self.scroll),
            keys: std::mem::take(&mut self.keys),
            chars: std::mem::take(&mut self.chars),
            modifiers: self.modifiers(),
        }
    }
}

/// Window state read at the start of a UI frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowMetrics {
    /// Client area, screen coordinates
    pub window_size: (i32, i32),
    /// Drawable area, pixels
    pub framebuffer_size: (i32, i32),
    /// Seconds from the native time source
    pub time: f64,
    /// Whether the window has input focus
    pub focused: bool,
    /// Cursor position, screen coordinates
    pub cursor: (f64, f64),
}

impl WindowMetrics {
    /// Read everything from a native window
    pub fn read(native: &dyn NativeWindow) -> Self {
        Self {
            window_size: native.window_size(),
            framebuffer_size: native.framebuffer_size(),
            time: native.time(),
            focused: native.is_focused(),
            cursor: native.cursor_pos(),
        }
    }
}

/// Display and timing values for one UI frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    /// Logical display size
    pub display_size: [f32; 2],
    /// Pixels per logical unit on each axis
    pub framebuffer_scale: [f32; 2],
    /// Seconds since the previous frame
    pub delta_time: f32,
    /// Pointer position or [`POINTER_OFFSCREEN`]
    pub mouse_pos: [f32; 2],
}

impl FrameSample {
    /// Compute a frame from window metrics and the previous frame's time
    pub fn compute(metrics: &WindowMetrics, last_frame: Option<f64>) -> Self {
        let (width, height) = metrics.window_size;
        let (fb_width, fb_height) = metrics.framebuffer_size;

        let scale = |pixels: i32, logical: i32| {
            if pixels > 0 && logical > 0 {
                pixels as f32 / logical as f32
            } else {
                1.0
            }
        };

        let delta_time = match last_frame {
            Some(last) => ((metrics.time - last) as f32).max(MIN_DELTA_TIME),
            None => FIRST_FRAME_DELTA,
        };

        let mouse_pos = if metrics.focused {
            [metrics.cursor.0 as f32, metrics.cursor.1 as f32]
        } else {
            POINTER_OFFSCREEN
        };

        Self {
            display_size: [width.max(0) as f32, height.max(0) as f32],
            framebuffer_scale: [scale(fb_width, width), scale(fb_height, height)],
            delta_time,
            mouse_pos,
        }
    }
}

//! Backend-agnostic native window interface
//!
//! This module defines the trait that native window backends implement. The
//! high-level [`Window`](super::Window) owns a `Box<dyn NativeWindow>` and never
//! touches the windowing library directly, which is what lets the dispatch
//! and UI layers be exercised without a display.
//!
//! # Events
//! Backends deliver [`NativeEvent`]s with the windowing library's raw codes
//! (key, button, action and modifier integers). Translation into
//! [`KeyCode`](crate::input::KeyCode) and friends happens once, in the
//! dispatcher, so every backend shares the same mapping.

use std::any::Any;
use std::fmt;
use std::path::PathBuf;

use super::WindowError;

/// Identity of a native window
///
/// Derived from the backend's own window pointer. It is only used as a
/// lookup key in the [`WindowRegistry`](super::WindowRegistry) and never
/// dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(usize);

impl NativeHandle {
    /// Wrap a raw backend identity
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// The raw backend identity
    pub const fn as_raw(self) -> usize {
        self.0
    }
}

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A window event as reported by the windowing library
///
/// Integer fields carry the library's native codes.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    /// Window moved; new top-left corner in screen coordinates
    Pos(i32, i32),
    /// Client area resized, in screen coordinates
    Size(i32, i32),
    /// Close button (or equivalent) pressed
    Close,
    /// Contents need redrawing
    Refresh,
    /// Input focus gained (`true`) or lost
    Focus(bool),
    /// Minimised (`true`) or restored
    Iconify(bool),
    /// Framebuffer resized, in pixels
    FramebufferSize(i32, i32),
    /// Mouse button transition: `(button, action, mods)`
    MouseButton(i32, i32, i32),
    /// Cursor moved, client-area coordinates
    CursorPos(f64, f64),
    /// Cursor entered (`true`) or left the client area
    CursorEnter(bool),
    /// Scroll offsets
    Scroll(f64, f64),
    /// Key transition: `(key, scancode, action, mods)`
    Key(i32, i32, i32, i32),
    /// Unicode code point of a typed character
    Char(u32),
    /// Typed character together with the held modifiers: `(code_point, mods)`
    CharModifiers(u32, i32),
    /// Paths dropped onto the window
    FileDrop(Vec<PathBuf>),
}

/// Where queued native events come from
///
/// Implemented by the windowing platform. Each call drains everything queued
/// since the previous one, tagged with the window it belongs to.
pub trait EventSource {
    /// Process pending platform events and return them in arrival order
    fn poll_events(&mut self) -> Vec<(NativeHandle, NativeEvent)>;
}

/// System clipboard access bound to one native window
pub trait ClipboardProvider {
    /// Current clipboard text, `None` if empty or not text
    fn get(&self) -> Option<String>;
    /// Replace the clipboard contents
    fn set(&self, text: &str);
}

/// A GL context that can be made current on another thread
///
/// Handed to worker threads, so it must be `Send`. The context is only ever
/// current on one thread at a time; callers pair `make_current` with
/// `release`.
pub trait SharedContext: Send {
    /// Make this context current on the calling thread
    fn make_current(&mut self);
    /// Detach whatever context is current on the calling thread
    fn release(&mut self);
}

/// An invisible window sharing GL objects with its parent
///
/// The hidden window itself has to stay on the thread that created it; only
/// its [`SharedContext`] may travel. Dropping the `OffscreenContext` destroys
/// the hidden window, so it must outlive every use of the shared context.
pub struct OffscreenContext {
    owner: Box<dyn Any>,
    context: Option<Box<dyn SharedContext>>,
}

impl OffscreenContext {
    /// Pair a hidden window (kept alive, otherwise opaque) with its context
    pub fn new(owner: Box<dyn Any>, context: Box<dyn SharedContext>) -> Self {
        Self {
            owner,
            context: Some(context),
        }
    }

    /// Move the shared context out, e.g. into a worker thread
    ///
    /// Returns `None` once it has been taken.
    pub fn take_shared(&mut self) -> Option<Box<dyn SharedContext>> {
        self.context.take()
    }

    /// Whether the hidden window is of backend type `T`
    pub fn is_owned_by<T: Any>(&self) -> bool {
        self.owner.is::<T>()
    }
}

impl fmt::Debug for OffscreenContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OffscreenContext")
            .field("shared_taken", &self.context.is_none())
            .finish_non_exhaustive()
    }
}

/// Native window operations needed by the window, UI and dispatch layers
///
/// # Threading
/// Native windows are not `Send`: like the underlying library, every call
/// must come from the thread that created the window.
pub trait NativeWindow {
    /// Registry key of this window
    fn handle(&self) -> NativeHandle;

    /// Whether the user (or the application) asked the window to close
    fn should_close(&self) -> bool;

    /// Set or clear the close request
    fn set_should_close(&mut self, value: bool);

    /// Make this window's GL context current on the calling thread
    fn make_current(&mut self);

    /// Present the back buffer
    fn swap_buffers(&mut self);

    /// Client area size in screen coordinates
    fn window_size(&self) -> (i32, i32);

    /// Drawable size in pixels
    fn framebuffer_size(&self) -> (i32, i32);

    /// Whether the window has input focus
    fn is_focused(&self) -> bool;

    /// Cursor position relative to the client area, in screen coordinates
    fn cursor_pos(&self) -> (f64, f64);

    /// Live state of mouse button `button` (0 = left)
    fn is_mouse_button_down(&self, button: usize) -> bool;

    /// Hide the OS cursor (the UI draws its own) or show it again
    fn set_cursor_hidden(&mut self, hidden: bool);

    /// Seconds since the windowing library was initialised
    fn time(&self) -> f64;

    /// Clipboard bound to this window
    fn clipboard(&self) -> Box<dyn ClipboardProvider>;

    /// Create a hidden window whose context shares objects with this one
    ///
    /// # Errors
    /// [`WindowError::ContextBindingUnsupported`] if the backend cannot hand
    /// out a shareable context, or [`WindowError::WindowCreationFailed`] if
    /// the hidden window could not be created.
    fn create_offscreen_context(&mut self) -> Result<OffscreenContext, WindowError>;
}

//! High-level window and event dispatch
//!
//! [`Window`] is what applications hold. It composes a native window, the GL
//! device bound to its context, an application supplied [`WindowHandler`] and,
//! for windows that draw a UI, a [`UiSession`]. Input events are offered to
//! the session first and then to the handler, so the UI always sees input
//! but the application is never starved of raw events.
//!
//! # Lifetime
//! A window registers itself in the [`WindowRegistry`] on construction and
//! unregisters on drop, before its native window is destroyed. A native event
//! that is still queued for a destroyed window resolves to
//! [`WindowError::UnknownHandle`].

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::backend::opengl::GlDevice;
use crate::input::{self, native, KeyCode, Modifiers, MouseButton};
use crate::ui::{UiError, UiSession};

use super::{NativeEvent, NativeHandle, NativeWindow, OffscreenContext, WindowError, WindowRegistry};

/// Application callbacks for one window
///
/// Every method has an empty default body; implement the events you care
/// about. Codes are already translated from the native layer. For keys,
/// `pressed` is true for both the initial press and auto-repeat.
#[allow(unused_variables)]
pub trait WindowHandler {
    /// Window moved
    fn on_window_pos(&mut self, x: i32, y: i32) {}
    /// Client area resized (screen coordinates)
    fn on_window_size(&mut self, width: i32, height: i32) {}
    /// Close requested by the user
    fn on_window_close(&mut self) {}
    /// Contents damaged and need redrawing
    fn on_window_refresh(&mut self) {}
    /// Focus gained or lost
    fn on_window_focus(&mut self, focused: bool) {}
    /// Minimised or restored
    fn on_window_iconify(&mut self, iconified: bool) {}
    /// Framebuffer resized (pixels)
    fn on_framebuffer_size(&mut self, width: i32, height: i32) {}
    /// Mouse button pressed or released
    fn on_mouse_button(&mut self, button: MouseButton, pressed: bool, mods: Modifiers) {}
    /// Cursor moved
    fn on_cursor_pos(&mut self, x: f64, y: f64) {}
    /// Cursor entered or left the client area
    fn on_cursor_enter(&mut self, entered: bool) {}
    /// Scroll wheel or touchpad scroll
    fn on_scroll(&mut self, x_offset: f64, y_offset: f64) {}
    /// Key pressed, repeated or released
    fn on_key(&mut self, key: KeyCode, scan_code: i32, pressed: bool, mods: Modifiers) {}
    /// Character typed
    fn on_char(&mut self, code_point: u32) {}
    /// Character typed, with the modifiers held at the time
    fn on_char_mods(&mut self, code_point: u32, mods: Modifiers) {}
    /// Files dropped onto the window
    fn on_drop(&mut self, paths: &[PathBuf]) {}

    /// Declare this frame's UI; only called for windows with a UI session
    fn define_ui(&mut self, ui: &imgui::Ui) {
        ui.window("A Window")
            .size([200.0, 100.0], imgui::Condition::FirstUseEver)
            .build(|| {
                ui.text("Override define_ui() to declare your own UI.");
            });
    }
}

/// An application window
///
/// Not `Clone`: identity is tied to the native window and its registry entry.
/// Shared as `Rc<RefCell<Window>>` so the registry can hold a weak reference.
pub struct Window {
    ui: Option<UiSession>,
    handler: Box<dyn WindowHandler>,
    gl: Rc<dyn GlDevice>,
    native: Box<dyn NativeWindow>,
    registry: Rc<WindowRegistry>,
    registered: bool,
    framebuffer: (i32, i32),
}

impl Window {
    /// Wrap a native window and register it
    ///
    /// # Errors
    /// [`WindowError::DuplicateHandle`] if another live window already owns
    /// the native handle.
    pub fn new(
        native: Box<dyn NativeWindow>,
        gl: Rc<dyn GlDevice>,
        registry: &Rc<WindowRegistry>,
        handler: Box<dyn WindowHandler>,
    ) -> Result<Rc<RefCell<Self>>, WindowError> {
        let handle = native.handle();
        let framebuffer = native.framebuffer_size();
        let window = Rc::new(RefCell::new(Self {
            ui: None,
            handler,
            gl,
            native,
            registry: Rc::clone(registry),
            registered: false,
            framebuffer,
        }));

        registry.register(handle, &window)?;
        window.borrow_mut().registered = true;
        log::debug!("Window {handle} created");
        Ok(window)
    }

    /// Attach a UI session to this window
    ///
    /// Creates the toolkit context and all GPU objects with this window's
    /// context current. Replaces any previous session.
    ///
    /// # Errors
    /// Propagates [`UiError`] from session creation.
    pub fn enable_ui(&mut self) -> Result<(), UiError> {
        self.native.make_current();
        self.ui = None;
        self.ui = Some(UiSession::new(Rc::clone(&self.gl), self.native.as_ref())?);
        Ok(())
    }

    /// Whether a UI session is attached
    pub fn has_ui(&self) -> bool {
        self.ui.is_some()
    }

    /// Native handle of this window
    pub fn native_handle(&self) -> NativeHandle {
        self.native.handle()
    }

    /// Whether a close was requested
    pub fn should_close(&self) -> bool {
        self.native.should_close()
    }

    /// Request (or cancel) closing the window
    pub fn set_should_close(&mut self, value: bool) {
        self.native.set_should_close(value);
    }

    /// Start a frame
    ///
    /// Makes this window's context current, re-reads the framebuffer size and
    /// sets a full-framebuffer viewport.
    pub fn begin_frame(&mut self) {
        self.native.make_current();
        self.framebuffer = self.native.framebuffer_size();
        let (width, height) = self.framebuffer;
        self.gl.viewport(0, 0, width, height);
    }

    /// Present the back buffer
    pub fn swap_buffers(&mut self) {
        self.native.swap_buffers();
    }

    /// Framebuffer size read by the last [`begin_frame`](Self::begin_frame)
    pub fn framebuffer_size(&self) -> (i32, i32) {
        self.framebuffer
    }

    /// Framebuffer width in pixels
    pub fn framebuffer_width(&self) -> i32 {
        self.framebuffer.0
    }

    /// Framebuffer height in pixels
    pub fn framebuffer_height(&self) -> i32 {
        self.framebuffer.1
    }

    /// GL device bound to this window's context
    pub fn gl(&self) -> &Rc<dyn GlDevice> {
        &self.gl
    }

    /// Create a hidden window sharing this window's GL objects
    ///
    /// # Errors
    /// See [`NativeWindow::create_offscreen_context`].
    pub fn create_offscreen_context(&mut self) -> Result<OffscreenContext, WindowError> {
        let context = self.native.create_offscreen_context();
        // Creating the hidden window may have switched the current context.
        self.native.make_current();
        context
    }

    /// Run one UI frame: begin, let the handler declare widgets, end and draw
    ///
    /// # Errors
    /// [`UiError::NoUiSession`] without a session, or the session's protocol
    /// errors.
    pub fn paint_ui(&mut self) -> Result<(), UiError> {
        let session = self.ui.as_mut().ok_or(UiError::NoUiSession)?;
        let ui = session.begin_ui(self.native.as_mut())?;
        self.handler.define_ui(ui);
        session.end_ui()
    }

    /// Route one native event to the UI session and then the handler
    pub fn handle_event(&mut self, event: &NativeEvent) {
        if let Some(session) = self.ui.as_mut() {
            session.observe(event);
        }

        let handler = self.handler.as_mut();
        match *event {
            NativeEvent::Pos(x, y) => handler.on_window_pos(x, y),
            NativeEvent::Size(width, height) => handler.on_window_size(width, height),
            NativeEvent::Close => handler.on_window_close(),
            NativeEvent::Refresh => handler.on_window_refresh(),
            NativeEvent::Focus(focused) => handler.on_window_focus(focused),
            NativeEvent::Iconify(iconified) => handler.on_window_iconify(iconified),
            NativeEvent::FramebufferSize(width, height) => {
                handler.on_framebuffer_size(width, height);
            }
            NativeEvent::MouseButton(button, action, mods) => handler.on_mouse_button(
                input::to_mouse_button(button),
                action != native::RELEASE,
                input::to_modifiers(mods),
            ),
            NativeEvent::CursorPos(x, y) => handler.on_cursor_pos(x, y),
            NativeEvent::CursorEnter(entered) => handler.on_cursor_enter(entered),
            NativeEvent::Scroll(x, y) => handler.on_scroll(x, y),
            NativeEvent::Key(key, scan_code, action, mods) => handler.on_key(
                input::to_key_code(key),
                scan_code,
                action != native::RELEASE,
                input::to_modifiers(mods),
            ),
            NativeEvent::Char(code_point) => handler.on_char(code_point),
            NativeEvent::CharModifiers(code_point, mods) => {
                handler.on_char_mods(code_point, input::to_modifiers(mods));
            }
            NativeEvent::FileDrop(ref paths) => handler.on_drop(paths),
        }
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        let handle = self.native.handle();
        if self.ui.is_some() {
            // GPU objects are deleted against this window's context.
            self.native.make_current();
            self.ui = None;
        }
        if self.registered {
            self.registry.unregister(handle);
        }
        log::debug!("Window {handle} destroyed");
    }
}

/// Deliver a batch of native events to their windows
///
/// # Errors
/// Stops at the first event whose handle does not resolve
/// ([`WindowError::UnknownHandle`]) or whose window is already busy handling
/// an event ([`WindowError::ReentrantDispatch`]). Events before it have been
/// delivered.
pub fn dispatch_events<I>(registry: &WindowRegistry, events: I) -> Result<(), WindowError>
where
    I: IntoIterator<Item = (NativeHandle, NativeEvent)>,
{
    for (handle, event) in events {
        let owner = registry.resolve(handle)?;
        let mut window = owner
            .try_borrow_mut()
            .map_err(|_| WindowError::ReentrantDispatch(handle))?;
        window.handle_event(&event);
    }
    Ok(())
}

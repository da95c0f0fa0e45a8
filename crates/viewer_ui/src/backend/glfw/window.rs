use glfw::Context as _;

use super::{apply_context_hints, GlfwClipboard, Receivers};
use crate::config::ContextHints;
use crate::render::window::{
    ClipboardProvider, NativeHandle, NativeWindow, OffscreenContext, SharedContext, WindowError,
};

/// A visible GLFW window with its own GL context
///
/// Dropping it destroys the native window and forgets its event queue.
pub struct GlfwWindow {
    window: glfw::PWindow,
    handle: NativeHandle,
    hints: ContextHints,
    receivers: Receivers,
}

impl GlfwWindow {
    pub(super) fn new(window: glfw::PWindow, hints: ContextHints, receivers: Receivers) -> Self {
        let handle = NativeHandle::from_raw(window.window_ptr() as usize);
        Self {
            window,
            handle,
            hints,
            receivers,
        }
    }

    /// Registry key of this window
    pub fn native_handle(&self) -> NativeHandle {
        self.handle
    }

    /// Change the title bar text
    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }
}

impl Drop for GlfwWindow {
    fn drop(&mut self) {
        self.receivers.borrow_mut().remove(&self.handle);
        log::debug!("Destroyed native window {}", self.handle);
    }
}

impl NativeWindow for GlfwWindow {
    fn handle(&self) -> NativeHandle {
        self.handle
    }

    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn set_should_close(&mut self, value: bool) {
        self.window.set_should_close(value);
    }

    fn make_current(&mut self) {
        self.window.make_current();
    }

    fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    fn window_size(&self) -> (i32, i32) {
        self.window.get_size()
    }

    fn framebuffer_size(&self) -> (i32, i32) {
        self.window.get_framebuffer_size()
    }

    fn is_focused(&self) -> bool {
        self.window.is_focused()
    }

    fn cursor_pos(&self) -> (f64, f64) {
        self.window.get_cursor_pos()
    }

    fn is_mouse_button_down(&self, button: usize) -> bool {
        let button = match button {
            0 => glfw::MouseButton::Button1,
            1 => glfw::MouseButton::Button2,
            2 => glfw::MouseButton::Button3,
            3 => glfw::MouseButton::Button4,
            4 => glfw::MouseButton::Button5,
            _ => return false,
        };
        self.window.get_mouse_button(button) == glfw::Action::Press
    }

    fn set_cursor_hidden(&mut self, hidden: bool) {
        self.window.set_cursor_mode(if hidden {
            glfw::CursorMode::Hidden
        } else {
            glfw::CursorMode::Normal
        });
    }

    fn time(&self) -> f64 {
        self.window.glfw.get_time()
    }

    fn clipboard(&self) -> Box<dyn ClipboardProvider> {
        Box::new(GlfwClipboard::new(self.window.window_ptr()))
    }

    fn create_offscreen_context(&mut self) -> Result<OffscreenContext, WindowError> {
        let mut glfw = self.window.glfw.clone();
        apply_context_hints(&mut glfw, &self.hints, false);

        let created = self
            .window
            .create_shared(1, 1, "offscreen", glfw::WindowMode::Windowed);
        glfw.default_window_hints();

        let (mut hidden, _events) = created.ok_or_else(|| {
            log::error!("Failed to create a context sharing objects with {}", self.handle);
            WindowError::ContextBindingUnsupported
        })?;

        let context = GlfwSharedContext(hidden.render_context());
        log::debug!("Created offscreen context for {}", self.handle);
        Ok(OffscreenContext::new(
            Box::new(hidden),
            Box::new(context),
        ))
    }
}

/// Render context of a hidden GLFW window, movable to another thread
pub struct GlfwSharedContext(glfw::PRenderContext);

impl SharedContext for GlfwSharedContext {
    fn make_current(&mut self) {
        self.0.make_current();
    }

    fn release(&mut self) {
        glfw::make_context_current(None);
    }
}

//! GLFW native windowing backend
//!
//! [`Platform`] owns the GLFW library handle and the event receivers of every
//! window it created. Its [`EventSource`] impl drains all of them into one
//! batch of `(NativeHandle, NativeEvent)` pairs, which is what
//! [`dispatch_events`](crate::render::window::dispatch_events) consumes.
//!
//! # Threading
//! GLFW must be driven from the main thread. Nothing here is `Send`.

mod clipboard;
mod window;

pub use clipboard::GlfwClipboard;
pub use window::{GlfwSharedContext, GlfwWindow};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glfw::{Context as _, GlfwReceiver, WindowEvent};

use crate::backend::opengl::{GlDevice, GlVersion, GlowDevice};
use crate::config::{ContextHints, WindowConfig};
use crate::render::window::{EventSource, NativeEvent, NativeHandle, WindowError};

pub(crate) type EventReceiver = GlfwReceiver<(f64, WindowEvent)>;
pub(crate) type Receivers = Rc<RefCell<HashMap<NativeHandle, EventReceiver>>>;

/// The GLFW library and the event queues of its windows
pub struct Platform {
    glfw: glfw::Glfw,
    receivers: Receivers,
}

impl Platform {
    /// Initialise GLFW
    ///
    /// GLFW errors reported later are logged, never fatal.
    ///
    /// # Errors
    /// [`WindowError::PlatformInitFailed`] if the library can't start
    /// (e.g. no display).
    pub fn init() -> Result<Self, WindowError> {
        let glfw = glfw::init(glfw::log_errors).map_err(|err| {
            log::error!("GLFW initialization failed: {err:?}");
            WindowError::PlatformInitFailed
        })?;
        log::info!("GLFW {}", glfw::get_version_string());

        Ok(Self {
            glfw,
            receivers: Rc::new(RefCell::new(HashMap::new())),
        })
    }

    /// Create a visible window with a current GL context
    ///
    /// Applies the context hints, enables polling for every event kind,
    /// loads GL entry points, checks the context version and sets the swap
    /// interval.
    ///
    /// # Errors
    /// [`WindowError::WindowCreationFailed`] if GLFW can't satisfy the hints,
    /// [`WindowError::GraphicsContextInitFailed`] if the context is older than
    /// requested.
    pub fn create_window(
        &mut self,
        config: &WindowConfig,
    ) -> Result<(GlfwWindow, Rc<dyn GlDevice>), WindowError> {
        apply_context_hints(&mut self.glfw, &config.context, true);

        let (mut window, events) = self
            .glfw
            .create_window(
                config.width,
                config.height,
                &config.title,
                glfw::WindowMode::Windowed,
            )
            .ok_or_else(|| {
                log::error!(
                    "Failed to create {}x{} window with OpenGL {}.{}",
                    config.width,
                    config.height,
                    config.context.major,
                    config.context.minor
                );
                WindowError::WindowCreationFailed
            })?;

        enable_polling(&mut window);
        window.make_current();

        // SAFETY: the window's context was made current just above and the
        // loader resolves symbols for exactly that context.
        #[allow(unsafe_code)]
        let gl = unsafe {
            GlowDevice::from_loader(|symbol| window.get_proc_address(symbol) as *const _)
        };

        let required = GlVersion {
            major: config.context.major,
            minor: config.context.minor,
        };
        let found = GlVersion::from(gl.version());
        if found < required {
            log::error!("OpenGL {required} required, context provides {found}");
            return Err(WindowError::GraphicsContextInitFailed { required, found });
        }
        log::info!("Created window \"{}\" with OpenGL {found}", config.title);

        self.glfw.set_swap_interval(if config.context.vsync {
            glfw::SwapInterval::Sync(1)
        } else {
            glfw::SwapInterval::None
        });

        let window = GlfwWindow::new(window, config.context.clone(), Rc::clone(&self.receivers));
        self.receivers.borrow_mut().insert(window.native_handle(), events);
        Ok((window, Rc::new(gl)))
    }

    /// Seconds since GLFW was initialised
    pub fn time(&self) -> f64 {
        self.glfw.get_time()
    }

    /// Number of windows with a live event queue
    pub fn window_count(&self) -> usize {
        self.receivers.borrow().len()
    }
}

impl EventSource for Platform {
    /// Poll GLFW and collect pending events of every live window
    ///
    /// Within one window events keep their arrival order.
    fn poll_events(&mut self) -> Vec<(NativeHandle, NativeEvent)> {
        self.glfw.poll_events();

        let receivers = self.receivers.borrow();
        let mut batch = Vec::new();
        for (&handle, receiver) in receivers.iter() {
            batch.extend(
                glfw::flush_messages(receiver)
                    .filter_map(|(_, event)| translate_event(event))
                    .map(|event| (handle, event)),
            );
        }
        batch
    }
}

pub(crate) fn apply_context_hints(glfw: &mut glfw::Glfw, hints: &ContextHints, visible: bool) {
    glfw.default_window_hints();
    glfw.window_hint(glfw::WindowHint::ContextVersion(hints.major, hints.minor));
    if hints.core_profile {
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(
            glfw::OpenGlProfileHint::Core,
        ));
    }
    glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(hints.forward_compatible));
    glfw.window_hint(glfw::WindowHint::Visible(visible));
}

fn enable_polling(window: &mut glfw::PWindow) {
    window.set_pos_polling(true);
    window.set_size_polling(true);
    window.set_close_polling(true);
    window.set_refresh_polling(true);
    window.set_focus_polling(true);
    window.set_iconify_polling(true);
    window.set_framebuffer_size_polling(true);
    window.set_key_polling(true);
    window.set_char_polling(true);
    window.set_char_mods_polling(true);
    window.set_mouse_button_polling(true);
    window.set_cursor_pos_polling(true);
    window.set_cursor_enter_polling(true);
    window.set_scroll_polling(true);
    window.set_drag_and_drop_polling(true);
}

/// Strip a GLFW event down to native codes; `None` for kinds not forwarded
fn translate_event(event: WindowEvent) -> Option<NativeEvent> {
    Some(match event {
        WindowEvent::Pos(x, y) => NativeEvent::Pos(x, y),
        WindowEvent::Size(width, height) => NativeEvent::Size(width, height),
        WindowEvent::Close => NativeEvent::Close,
        WindowEvent::Refresh => NativeEvent::Refresh,
        WindowEvent::Focus(focused) => NativeEvent::Focus(focused),
        WindowEvent::Iconify(iconified) => NativeEvent::Iconify(iconified),
        WindowEvent::FramebufferSize(width, height) => NativeEvent::FramebufferSize(width, height),
        WindowEvent::MouseButton(button, action, mods) => {
            NativeEvent::MouseButton(button as i32, action as i32, mods.bits())
        }
        WindowEvent::CursorPos(x, y) => NativeEvent::CursorPos(x, y),
        WindowEvent::CursorEnter(entered) => NativeEvent::CursorEnter(entered),
        WindowEvent::Scroll(x, y) => NativeEvent::Scroll(x, y),
        WindowEvent::Key(key, scan_code, action, mods) => {
            NativeEvent::Key(key as i32, scan_code, action as i32, mods.bits())
        }
        WindowEvent::Char(c) => NativeEvent::Char(u32::from(c)),
        WindowEvent::CharModifiers(c, mods) => NativeEvent::CharModifiers(u32::from(c), mods.bits()),
        WindowEvent::FileDrop(paths) => NativeEvent::FileDrop(paths),
        _ => return None,
    })
}

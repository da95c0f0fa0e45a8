//! Application lifecycle: platform, window creation and event pumping

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::backend::glfw::Platform;
use crate::config::{ConfigError, WindowConfig};
use crate::render::window::{
    dispatch_events, EventSource, NativeWindow, Window, WindowError, WindowHandler,
    WindowRegistry,
};
use crate::ui::UiError;

/// Owns the windowing platform and the registry every window joins
///
/// Windows are handed back as `Rc<RefCell<Window>>`; the registry only keeps
/// weak references, so a window lives exactly as long as the caller holds it.
pub struct Application {
    platform: Platform,
    registry: Rc<WindowRegistry>,
}

impl Application {
    /// Start the windowing platform
    ///
    /// # Errors
    /// [`WindowError::PlatformInitFailed`] wrapped in [`AppError::Window`].
    pub fn new() -> Result<Self, AppError> {
        Ok(Self {
            platform: Platform::init()?,
            registry: Rc::new(WindowRegistry::new()),
        })
    }

    /// Open a plain window driven by `handler`
    ///
    /// # Errors
    /// Native window or GL context creation failures.
    pub fn open_window(
        &mut self,
        config: &WindowConfig,
        handler: Box<dyn WindowHandler>,
    ) -> Result<Rc<RefCell<Window>>, AppError> {
        self.open_window_with(config, false, |_| Ok(handler))
    }

    /// Open a window with a UI session attached
    ///
    /// # Errors
    /// As [`open_window`](Self::open_window), plus UI session creation.
    pub fn open_ui_window(
        &mut self,
        config: &WindowConfig,
        handler: Box<dyn WindowHandler>,
    ) -> Result<Rc<RefCell<Window>>, AppError> {
        self.open_window_with(config, true, |_| Ok(handler))
    }

    /// Open a window whose handler is built from the native window
    ///
    /// `build` runs after the native window and its context exist, before
    /// the window is registered. Handlers that need an offscreen shared
    /// context create it there.
    ///
    /// # Errors
    /// Creation failures, or whatever `build` returns.
    pub fn open_window_with<F>(
        &mut self,
        config: &WindowConfig,
        with_ui: bool,
        build: F,
    ) -> Result<Rc<RefCell<Window>>, AppError>
    where
        F: FnOnce(&mut dyn NativeWindow) -> Result<Box<dyn WindowHandler>, AppError>,
    {
        let (mut native, gl) = self.platform.create_window(config)?;
        let handler = build(&mut native)?;
        native.make_current();

        let window = Window::new(Box::new(native), gl, &self.registry, handler)?;
        if with_ui {
            window.borrow_mut().enable_ui()?;
        }
        Ok(window)
    }

    /// Poll the platform and deliver pending events to their windows
    ///
    /// # Errors
    /// [`WindowError::UnknownHandle`] if an event targets a window that no
    /// longer exists, [`WindowError::ReentrantDispatch`] if a window is still
    /// borrowed.
    pub fn poll_events(&mut self) -> Result<(), AppError> {
        pump_events(&self.registry, &mut self.platform)
    }

    /// The registry windows of this application join
    pub fn registry(&self) -> &Rc<WindowRegistry> {
        &self.registry
    }

    /// Seconds since the platform started
    pub fn time(&self) -> f64 {
        self.platform.time()
    }
}

fn pump_events(registry: &WindowRegistry, source: &mut dyn EventSource) -> Result<(), AppError> {
    dispatch_events(registry, source.poll_events())?;
    Ok(())
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Windowing or dispatch failure
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// UI session failure
    #[error("UI error: {0}")]
    Ui(#[from] UiError),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}

//! Window management
//!
//! A [`Window`] owns one native window, the GL device bound to its context,
//! the application's [`WindowHandler`] and optionally a UI session. Native
//! events reach windows through the [`WindowRegistry`], which maps native
//! handles back to their owners without ever owning them.

pub mod backend;
pub mod handle;
pub mod registry;

pub use backend::{
    ClipboardProvider, EventSource, NativeEvent, NativeHandle, NativeWindow, OffscreenContext,
    SharedContext,
};
pub use handle::{dispatch_events, Window, WindowHandler};
pub use registry::{Registry, WindowRegistry};

use thiserror::Error;

use crate::backend::opengl::GlVersion;

/// Window construction and event dispatch errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// The windowing library could not be initialised
    #[error("GLFW initialization failed")]
    PlatformInitFailed,

    /// The native window (or its hidden offscreen sibling) was not created
    #[error("Window creation failed")]
    WindowCreationFailed,

    /// The context's GL version is older than requested
    #[error("OpenGL {required} or newer required, context provides {found}")]
    GraphicsContextInitFailed {
        /// Version asked for in the context hints
        required: GlVersion,
        /// Version the driver actually provided
        found: GlVersion,
    },

    /// The backend cannot hand out a context shared with this window
    #[error("Shared GL contexts are not supported by this backend")]
    ContextBindingUnsupported,

    /// A live window already owns this native handle
    #[error("Native window {0} is already registered")]
    DuplicateHandle(NativeHandle),

    /// No live window owns this native handle
    #[error("No window registered for native handle {0}")]
    UnknownHandle(NativeHandle),

    /// The target window was already borrowed when its event arrived
    #[error("Event for window {0} arrived while it was handling another")]
    ReentrantDispatch(NativeHandle),
}

//! Immediate-mode UI bridge
//!
//! Runs imgui on top of a [`Window`](crate::render::window::Window): input
//! aggregation between polls, per-frame setup, and a GL renderer for the
//! toolkit's draw lists that leaves the caller's GL state untouched.

pub mod active;
pub mod clipboard;
pub mod device;
pub mod draw;
pub mod input;
pub mod keys;
pub mod renderer;
pub mod session;

pub use device::{FontAtlasImage, ShaderLocations, UiDeviceObjects};
pub use draw::{DrawCommand, DrawFrame, DrawListView, DrawVertex};
pub use input::{FrameSample, InputAccumulator, InputFrame, KeyInput, WindowMetrics};
pub use renderer::{DrawListRenderer, GlStateSnapshot};
pub use session::UiSession;

use thiserror::Error;

/// UI session protocol and resource errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    /// `begin_ui` was called while a frame was open on this thread
    #[error("Another UI frame is already in progress")]
    SessionAlreadyActive,

    /// `end_ui` was called without a matching `begin_ui`
    #[error("No UI frame in progress")]
    NoActiveSession,

    /// The window was asked to paint UI but has no session attached
    #[error("Window has no UI session")]
    NoUiSession,

    /// GPU objects for the UI could not be created
    #[error("Failed to create UI device objects: {0}")]
    DeviceObjects(String),
}

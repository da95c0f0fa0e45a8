//! Rendering surfaces: windows and their event routing

pub mod window;

pub use window::{Window, WindowError, WindowHandler, WindowRegistry};

//! # Viewer UI
//!
//! GLFW windows with an OpenGL context, native event dispatch to per-window
//! handlers, and an imgui overlay drawn on top of whatever the application
//! renders.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use viewer_ui::prelude::*;
//!
//! struct Hello;
//!
//! impl WindowHandler for Hello {
//!     fn define_ui(&mut self, ui: &imgui::Ui) {
//!         ui.window("Hello").build(|| ui.text("Hello, world!"));
//!     }
//! }
//!
//! fn main() -> Result<(), AppError> {
//!     let mut app = Application::new()?;
//!     let window = app.open_ui_window(&WindowConfig::default(), Box::new(Hello))?;
//!
//!     while !window.borrow().should_close() {
//!         app.poll_events()?;
//!         let mut window = window.borrow_mut();
//!         window.begin_frame();
//!         window.paint_ui()?;
//!         window.swap_buffers();
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod backend;
pub mod config;
pub mod foundation;
pub mod input;
pub mod render;
pub mod ui;

mod application;

#[cfg(test)]
mod testing;

pub use application::{AppError, Application};

/// Common imports for viewer applications
pub mod prelude {
    pub use crate::{
        backend::opengl::GlDevice,
        config::{Config, ViewerConfig, WindowConfig},
        input::{KeyCode, Modifiers, MouseButton},
        render::window::{NativeWindow, OffscreenContext, SharedContext, Window, WindowHandler},
        AppError, Application,
    };
}

//! Platform backends
//!
//! `glfw` provides native windows and event queues, `opengl` the GL device
//! those windows draw with.

pub mod glfw;
pub mod opengl;

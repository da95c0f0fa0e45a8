use std::ffi::{CStr, CString};

use crate::render::window::ClipboardProvider;

/// System clipboard through GLFW
///
/// Holds the raw window pointer GLFW wants for clipboard calls. The provider
/// is owned by the window's UI session, which is dropped before the window.
pub struct GlfwClipboard {
    window: *mut glfw::ffi::GLFWwindow,
}

impl GlfwClipboard {
    pub(super) fn new(window: *mut glfw::ffi::GLFWwindow) -> Self {
        Self { window }
    }
}

#[allow(unsafe_code)]
impl ClipboardProvider for GlfwClipboard {
    fn get(&self) -> Option<String> {
        // SAFETY: the window outlives the provider; GLFW owns the returned
        // string until the next clipboard call, so it is copied immediately.
        unsafe {
            let text = glfw::ffi::glfwGetClipboardString(self.window);
            if text.is_null() {
                None
            } else {
                Some(CStr::from_ptr(text).to_string_lossy().into_owned())
            }
        }
    }

    fn set(&self, text: &str) {
        let Ok(text) = CString::new(text) else {
            log::warn!("Clipboard text contains a NUL byte, ignored");
            return;
        };
        // SAFETY: the window outlives the provider and GLFW copies the string.
        unsafe {
            glfw::ffi::glfwSetClipboardString(self.window, text.as_ptr());
        }
    }
}

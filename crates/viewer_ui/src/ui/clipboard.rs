//! Clipboard backend for the UI toolkit

use crate::render::window::ClipboardProvider;

/// Forwards the toolkit's clipboard requests to a native window
pub struct ClipboardBridge {
    provider: Box<dyn ClipboardProvider>,
}

impl ClipboardBridge {
    /// Bridge to `provider`
    pub fn new(provider: Box<dyn ClipboardProvider>) -> Self {
        Self { provider }
    }
}

impl imgui::ClipboardBackend for ClipboardBridge {
    fn get(&mut self) -> Option<String> {
        self.provider.get()
    }

    fn set(&mut self, value: &str) {
        self.provider.set(value);
    }
}

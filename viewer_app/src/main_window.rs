//! The viewer's main window handler

use std::cell::Cell;
use std::rc::Rc;

use viewer_ui::prelude::*;

use crate::worker::MainWindowWorker;

/// UI state of the main window
pub struct MainWindow {
    worker: Option<MainWindowWorker>,
    show_main_window: bool,
    show_another_window: bool,
    value: f32,
    counter: u32,
    clear_color: Rc<Cell<[f32; 4]>>,
}

impl MainWindow {
    /// Handler forwarding resizes to `worker`, if any
    ///
    /// `clear_color` is shared with the render loop and edited from the UI.
    pub fn new(worker: Option<MainWindowWorker>, clear_color: Rc<Cell<[f32; 4]>>) -> Self {
        Self {
            worker,
            show_main_window: true,
            show_another_window: false,
            value: 0.0,
            counter: 0,
            clear_color,
        }
    }

    /// Whether the main UI window is shown; closing it hides it for good
    pub fn show_main_window(&self) -> bool {
        self.show_main_window
    }

    /// Whether the second window is shown
    pub fn show_another_window(&self) -> bool {
        self.show_another_window
    }

    fn main_window_contents(&mut self, ui: &imgui::Ui) {
        ui.text("Hello, world!");
        ui.slider("float", 0.0, 1.0, &mut self.value);
        let [r, g, b, a] = self.clear_color.get();
        let mut rgb = [r, g, b];
        if ui.color_edit3("clear color", &mut rgb) {
            self.clear_color.set([rgb[0], rgb[1], rgb[2], a]);
        }

        if ui.button("Another Window") {
            self.show_another_window = !self.show_another_window;
        }

        if ui.button("Button") {
            self.counter += 1;
        }
        ui.same_line();
        ui.text(format!("counter = {}", self.counter));

        let framerate = ui.io().framerate;
        ui.text(format!(
            "Application average {:.3} ms/frame ({:.1} FPS)",
            1000.0 / framerate,
            framerate
        ));
    }
}

impl WindowHandler for MainWindow {
    fn on_framebuffer_size(&mut self, width: i32, height: i32) {
        if let Some(worker) = &self.worker {
            worker.resize(width, height);
        }
    }

    fn on_key(&mut self, key: KeyCode, _scan_code: i32, pressed: bool, mods: Modifiers) {
        if pressed && key == KeyCode::F1 && mods.is_empty() {
            self.show_another_window = !self.show_another_window;
        }
    }

    fn define_ui(&mut self, ui: &imgui::Ui) {
        if self.show_main_window {
            let mut open = true;
            ui.window("Main Window")
                .size([400.0, 200.0], imgui::Condition::FirstUseEver)
                .opened(&mut open)
                .build(|| self.main_window_contents(ui));
            if !open {
                self.show_main_window = false;
            }
        }

        if self.show_another_window {
            let mut open = true;
            ui.window("Another Window")
                .size([200.0, 100.0], imgui::Condition::FirstUseEver)
                .opened(&mut open)
                .build(|| {
                    ui.text("Hello from another window!");
                    if ui.button("Close Me") {
                        self.show_another_window = false;
                    }
                });
            if !open {
                self.show_another_window = false;
            }
        }
    }
}

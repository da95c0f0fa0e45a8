//! Viewer application
//!
//! Opens the main window with its UI and background worker and runs the
//! frame loop until the window is closed.

mod main_window;
mod worker;

use std::cell::Cell;
use std::rc::Rc;

use viewer_ui::backend::opengl::COLOR_BUFFER_BIT;
use viewer_ui::foundation::logging;
use viewer_ui::prelude::*;

use main_window::MainWindow;
use worker::MainWindowWorker;

const CONFIG_PATH: &str = "viewer.toml";

fn run() -> Result<(), AppError> {
    let config = ViewerConfig::load_or_default(CONFIG_PATH)?;
    logging::init(&config.logging.to_logging_config());
    log::info!("Starting viewer");

    let mut app = Application::new()?;
    let clear_color = Rc::new(Cell::new(config.clear_color));

    let handler_color = Rc::clone(&clear_color);
    let window = app.open_window_with(&config.window, true, move |native| {
        let worker = MainWindowWorker::spawn(native.create_offscreen_context()?)?;
        let handler: Box<dyn WindowHandler> = Box::new(MainWindow::new(Some(worker), handler_color));
        Ok(handler)
    })?;

    while !window.borrow().should_close() {
        app.poll_events()?;

        let mut window = window.borrow_mut();
        window.begin_frame();
        let [r, g, b, a] = clear_color.get();
        window.gl().clear_color(r, g, b, a);
        window.gl().clear(COLOR_BUFFER_BIT);
        window.paint_ui()?;
        window.swap_buffers();
    }

    log::info!("Viewer closed");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

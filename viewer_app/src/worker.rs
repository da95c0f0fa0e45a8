//! Background thread bound to the main window's offscreen context

use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use viewer_ui::prelude::*;

/// Commands that may be queued before the worker catches up
pub const COMMAND_CAPACITY: usize = 16;

/// Messages from the main thread to the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerCommand {
    /// Main window framebuffer changed size
    Resize(i32, i32),
    /// Release the context and exit
    Shutdown,
}

/// Worker thread with a GL context shared with the main window
///
/// The hidden window behind the context stays here on the main thread; only
/// the context itself moves to the worker. Dropping the worker shuts the
/// thread down and joins it before the hidden window goes away.
pub struct MainWindowWorker {
    sender: Sender<WorkerCommand>,
    thread: Option<thread::JoinHandle<()>>,
    _offscreen: OffscreenContext,
}

impl MainWindowWorker {
    /// Spawn the worker on `offscreen`'s shared context
    ///
    /// # Errors
    /// If the shared context was already taken or the thread can't start.
    pub fn spawn(mut offscreen: OffscreenContext) -> Result<Self, AppError> {
        let context = offscreen
            .take_shared()
            .ok_or_else(|| AppError::Custom("offscreen context already in use".to_string()))?;

        let (sender, receiver) = bounded(COMMAND_CAPACITY);
        let thread = thread::Builder::new()
            .name("main-window-worker".to_string())
            .spawn(move || run(context, &receiver))
            .map_err(|e| AppError::Custom(format!("failed to spawn worker thread: {e}")))?;

        Ok(Self {
            sender,
            thread: Some(thread),
            _offscreen: offscreen,
        })
    }

    /// Tell the worker the main framebuffer is now `width` x `height`
    ///
    /// Never blocks. A resize that finds the queue full is dropped; a later
    /// one supersedes it anyway.
    pub fn resize(&self, width: i32, height: i32) {
        match self.sender.try_send(WorkerCommand::Resize(width, height)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                log::trace!("Worker busy, resize to {width}x{height} dropped");
            }
            Err(TrySendError::Disconnected(_)) => {
                log::warn!("Worker thread is gone, resize to {width}x{height} dropped");
            }
        }
    }
}

impl Drop for MainWindowWorker {
    fn drop(&mut self) {
        self.sender.send(WorkerCommand::Shutdown).ok();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Worker thread panicked");
            }
        }
    }
}

fn run(mut context: Box<dyn SharedContext>, commands: &Receiver<WorkerCommand>) {
    context.make_current();
    log::debug!("Worker started");

    while let Ok(command) = commands.recv() {
        match command {
            WorkerCommand::Resize(width, height) => {
                // Offscreen surfaces keep their size; only the request is noted.
                log::debug!("Worker: framebuffer resized to {width}x{height}");
            }
            WorkerCommand::Shutdown => break,
        }
    }

    context.release();
    log::debug!("Worker stopped");
}

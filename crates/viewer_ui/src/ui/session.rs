//! UI session: one imgui context per window
//!
//! A session is `Idle` (its imgui context suspended) or `Active` (between
//! [`UiSession::begin_ui`] and [`UiSession::end_ui`], context current). The
//! thread's [active marker](super::active) guarantees at most one active
//! session; [`Window::paint_ui`](crate::render::window::Window::paint_ui) is
//! the only way to drive a frame from outside the crate.

use std::rc::Rc;

use imgui::{Context, Key, SuspendedContext};

use crate::backend::opengl::GlDevice;
use crate::input::Modifiers;
use crate::render::window::{NativeEvent, NativeWindow};

use super::active::{self, SessionId};
use super::clipboard::ClipboardBridge;
use super::device::FontAtlasImage;
use super::draw::DrawFrame;
use super::input::{
    FrameSample, InputAccumulator, InputFrame, KeyInput, WindowMetrics, TRACKED_BUTTONS,
};
use super::keys::KeyTable;
use super::renderer::DrawListRenderer;
use super::UiError;

const MOUSE_BUTTONS: [imgui::MouseButton; TRACKED_BUTTONS] = [
    imgui::MouseButton::Left,
    imgui::MouseButton::Right,
    imgui::MouseButton::Middle,
];

/// Per-window UI state
pub struct UiSession {
    id: SessionId,
    idle: Option<SuspendedContext>,
    active: Option<Context>,
    renderer: DrawListRenderer,
    input: InputAccumulator,
    keys: KeyTable,
    last_frame: Option<f64>,
}

impl UiSession {
    /// Create a session drawing with `gl` for `native`
    ///
    /// The window's GL context must be current. Settings and log files are
    /// disabled, the clipboard is routed to `native`, the font atlas is
    /// rasterised and uploaded.
    ///
    /// # Errors
    /// [`UiError::SessionAlreadyActive`] if called while another session is
    /// mid-frame, [`UiError::DeviceObjects`] if GPU objects can't be created.
    pub fn new(gl: Rc<dyn GlDevice>, native: &dyn NativeWindow) -> Result<Self, UiError> {
        if active::current().is_some() {
            return Err(UiError::SessionAlreadyActive);
        }
        let mut context = SuspendedContext::create()
            .activate()
            .map_err(|_| UiError::SessionAlreadyActive)?;

        context.set_ini_filename(None);
        context.set_log_filename(None);
        context.set_clipboard_backend(ClipboardBridge::new(native.clipboard()));

        let renderer = {
            let fonts = context.fonts();
            let atlas = fonts.build_rgba32_texture();
            let renderer = DrawListRenderer::new(
                gl,
                &FontAtlasImage {
                    width: atlas.width,
                    height: atlas.height,
                    pixels: atlas.data,
                },
            )?;
            fonts.tex_id = imgui::TextureId::new(renderer.objects().font_texture() as usize);
            renderer
        };

        let id = SessionId::next();
        log::debug!("UI session {id:?} created");
        Ok(Self {
            id,
            idle: Some(context.suspend()),
            active: None,
            renderer,
            input: InputAccumulator::new(),
            keys: KeyTable::new(),
            last_frame: None,
        })
    }

    /// Session identity, as stored in the active marker
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Whether this session is between `begin_ui` and `end_ui`
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Input gathered since the last frame
    pub fn input(&self) -> &InputAccumulator {
        &self.input
    }

    /// Renderer and its GPU objects
    pub fn renderer(&self) -> &DrawListRenderer {
        &self.renderer
    }

    /// Offer a native event to the session before the window's handler
    pub fn observe(&mut self, event: &NativeEvent) {
        self.input.observe(event);
    }

    /// Idle -> Active: sample input and start a UI frame
    ///
    /// # Errors
    /// [`UiError::SessionAlreadyActive`] if this or any other session on the
    /// thread is already active. Nothing changes in that case.
    pub(crate) fn begin_ui(&mut self, native: &mut dyn NativeWindow) -> Result<&mut imgui::Ui, UiError> {
        active::mark(self.id)?;

        let Some(idle) = self.idle.take() else {
            active::clear(self.id)?;
            return Err(UiError::SessionAlreadyActive);
        };
        let mut context = match idle.activate() {
            Ok(context) => context,
            Err(idle) => {
                self.idle = Some(idle);
                active::clear(self.id)?;
                return Err(UiError::SessionAlreadyActive);
            }
        };

        let metrics = WindowMetrics::read(native);
        let sample = FrameSample::compute(&metrics, self.last_frame);
        self.last_frame = Some(metrics.time);

        let live = [0, 1, 2].map(|button| native.is_mouse_button_down(button));
        let frame = self.input.take_frame(live);

        let io = context.io_mut();
        apply_sample(io, &sample);
        apply_input(io, &frame, &self.keys);
        native.set_cursor_hidden(io.mouse_draw_cursor);

        Ok(self.active.insert(context).new_frame())
    }

    /// Active -> Idle: finish the frame and draw it
    ///
    /// # Errors
    /// [`UiError::NoActiveSession`] without a matching
    /// [`begin_ui`](Self::begin_ui).
    pub(crate) fn end_ui(&mut self) -> Result<(), UiError> {
        if active::current() != Some(self.id) {
            return Err(UiError::NoActiveSession);
        }
        let mut context = self.active.take().ok_or(UiError::NoActiveSession)?;

        self.renderer.render(DrawFrame::from_imgui(context.render()));

        self.idle = Some(context.suspend());
        active::clear(self.id)
    }
}

impl Drop for UiSession {
    fn drop(&mut self) {
        if self.active.is_some() && active::clear(self.id).is_ok() {
            log::warn!("UI session {:?} dropped mid-frame", self.id);
        }
    }
}

fn apply_sample(io: &mut imgui::Io, sample: &FrameSample) {
    io.display_size = sample.display_size;
    io.display_framebuffer_scale = sample.framebuffer_scale;
    io.delta_time = sample.delta_time;
    io.add_mouse_pos_event(sample.mouse_pos);
}

fn apply_input(io: &mut imgui::Io, frame: &InputFrame, keys: &KeyTable) {
    for (button, down) in MOUSE_BUTTONS.into_iter().zip(frame.mouse_down) {
        io.add_mouse_button_event(button, down);
    }
    if frame.scroll != (0.0, 0.0) {
        io.add_mouse_wheel_event([frame.scroll.0, frame.scroll.1]);
    }

    for (key, down) in key_events(frame, keys) {
        io.add_key_event(key, down);
    }
    for &c in &frame.chars {
        io.add_input_character(c);
    }
}

/// Toolkit key events for `frame`, in arrival order
fn key_events(frame: &InputFrame, keys: &KeyTable) -> Vec<(Key, bool)> {
    frame
        .keys
        .iter()
        .filter_map(|&entry| match entry {
            KeyInput::Key(native_key, down) => keys.get(native_key).map(|key| (key, down)),
            KeyInput::Modifier(flag, down) => modifier_key(flag).map(|key| (key, down)),
        })
        .collect()
}

fn modifier_key(flag: Modifiers) -> Option<Key> {
    if flag == Modifiers::CONTROL {
        Some(Key::ModCtrl)
    } else if flag == Modifiers::SHIFT {
        Some(Key::ModShift)
    } else if flag == Modifiers::ALT {
        Some(Key::ModAlt)
    } else if flag == Modifiers::SUPER {
        Some(Key::ModSuper)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::native;
    use crate::testing::{imgui_lock, FakeGl, FakeNativeWindow};

    fn session(gl: &Rc<FakeGl>, native: &FakeNativeWindow) -> UiSession {
        UiSession::new(gl.clone(), native).unwrap()
    }

    #[test]
    fn test_begin_twice_is_rejected() {
        let _lock = imgui_lock();
        let gl = Rc::new(FakeGl::new());
        let mut native = FakeNativeWindow::new(1, 1024, 576);
        let mut ui = session(&gl, &native);

        ui.begin_ui(&mut native).unwrap();
        assert_eq!(
            ui.begin_ui(&mut native).err(),
            Some(UiError::SessionAlreadyActive)
        );
        assert!(ui.is_active());
        ui.end_ui().unwrap();
        assert_eq!(active::current(), None);
    }

    #[test]
    fn test_end_without_begin_is_rejected() {
        let _lock = imgui_lock();
        let gl = Rc::new(FakeGl::new());
        let native = FakeNativeWindow::new(1, 1024, 576);
        let mut ui = session(&gl, &native);

        assert_eq!(ui.end_ui(), Err(UiError::NoActiveSession));
        assert_eq!(active::current(), None);
    }

    #[test]
    fn test_two_sessions_cannot_overlap() {
        let _lock = imgui_lock();
        let gl = Rc::new(FakeGl::new());
        let mut first_native = FakeNativeWindow::new(1, 640, 480);
        let mut second_native = FakeNativeWindow::new(2, 640, 480);
        let mut first = session(&gl, &first_native);
        let mut second = session(&gl, &second_native);

        first.begin_ui(&mut first_native).unwrap();
        assert_eq!(
            second.begin_ui(&mut second_native).err(),
            Some(UiError::SessionAlreadyActive)
        );
        assert_eq!(second.end_ui(), Err(UiError::NoActiveSession));
        assert_eq!(active::current(), Some(first.id()));
        first.end_ui().unwrap();

        second.begin_ui(&mut second_native).unwrap();
        second.end_ui().unwrap();
    }

    #[test]
    fn test_frames_leave_no_marker_behind() {
        let _lock = imgui_lock();
        let gl = Rc::new(FakeGl::new());
        let mut native = FakeNativeWindow::new(1, 1024, 576);
        let mut ui = session(&gl, &native);

        for frame in 0..2 {
            assert_eq!(active::current(), None);
            native.state.time.set(f64::from(frame) * 0.5);
            let widgets = ui.begin_ui(&mut native).unwrap();
            widgets.window("Test").build(|| widgets.text("frame"));
            ui.end_ui().unwrap();
            assert_eq!(active::current(), None);
            assert!(!ui.is_active());
        }
        assert!(!gl.draws().is_empty());
    }

    #[test]
    fn test_begin_consumes_pending_input() {
        let _lock = imgui_lock();
        let gl = Rc::new(FakeGl::new());
        let mut native = FakeNativeWindow::new(1, 1024, 576);
        let mut ui = session(&gl, &native);

        ui.observe(&NativeEvent::MouseButton(0, native::PRESS, 0));
        ui.observe(&NativeEvent::MouseButton(0, native::RELEASE, 0));
        ui.observe(&NativeEvent::Scroll(0.0, 2.0));
        ui.observe(&NativeEvent::Char(u32::from('x')));

        ui.begin_ui(&mut native).unwrap();
        ui.end_ui().unwrap();

        assert_eq!(ui.input().mouse_pressed(), [false; 3]);
        assert_eq!(ui.input().scroll(), (0.0, 0.0));
    }

    #[test]
    fn test_font_texture_is_uploaded_once() {
        let _lock = imgui_lock();
        let gl = Rc::new(FakeGl::new());
        let native = FakeNativeWindow::new(1, 1024, 576);
        let ui = session(&gl, &native);

        assert_ne!(ui.renderer().objects().font_texture(), 0);
        assert_eq!(
            gl.log().iter().filter(|c| c.starts_with("tex_image_2d")).count(),
            1
        );
    }

    #[test]
    fn test_drop_mid_frame_clears_marker() {
        let _lock = imgui_lock();
        let gl = Rc::new(FakeGl::new());
        let mut native = FakeNativeWindow::new(1, 1024, 576);
        let mut ui = session(&gl, &native);

        ui.begin_ui(&mut native).unwrap();
        drop(ui);

        assert_eq!(active::current(), None);
        assert_eq!(gl.live_objects(), 0);
    }

    #[test]
    fn test_chord_within_one_poll_keeps_modifier_order() {
        let mut input = InputAccumulator::new();
        for (key, action) in [
            (native::key::LEFT_CONTROL, native::PRESS),
            (native::key::C, native::PRESS),
            (native::key::C, native::RELEASE),
            (native::key::LEFT_CONTROL, native::RELEASE),
        ] {
            input.observe(&NativeEvent::Key(key, 0, action, 0));
        }
        let frame = input.take_frame([false; TRACKED_BUTTONS]);

        assert_eq!(
            key_events(&frame, &KeyTable::new()),
            vec![
                (Key::ModCtrl, true),
                (Key::LeftCtrl, true),
                (Key::C, true),
                (Key::C, false),
                (Key::ModCtrl, false),
                (Key::LeftCtrl, false),
            ]
        );
    }
}

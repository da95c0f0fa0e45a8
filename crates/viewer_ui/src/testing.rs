//! Test doubles shared by the unit tests
//!
//! `FakeGl` models the slice of GL state the crate touches (bindings,
//! capabilities, blend state, viewport/scissor) and keeps a textual call log.
//! `FakeNativeWindow` stands in for a glfw window.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::{Mutex, MutexGuard};

use crate::backend::opengl::{GlDevice, GlHandle};
use crate::input::{KeyCode, Modifiers, MouseButton};
use crate::render::window::backend::{
    ClipboardProvider, EventSource, NativeEvent, NativeHandle, NativeWindow, OffscreenContext,
    SharedContext,
};
use crate::render::window::handle::WindowHandler;
use crate::render::window::WindowError;

static IMGUI_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that create imgui contexts; the toolkit's current context
/// is a process-wide global.
pub fn imgui_lock() -> MutexGuard<'static, ()> {
    IMGUI_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// One indexed draw as seen by the fake device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub count: i32,
    pub offset: i32,
    pub element_type: u32,
    pub texture: GlHandle,
    pub scissor: [i32; 4],
    pub program: GlHandle,
    pub vertex_array: GlHandle,
}

#[derive(Default)]
struct FakeState {
    integers: HashMap<u32, i32>,
    unit_textures: HashMap<u32, GlHandle>,
    enabled: HashSet<u32>,
    viewport: [i32; 4],
    scissor_box: [i32; 4],
    next_handle: GlHandle,
    live: HashSet<GlHandle>,
    linked: HashSet<GlHandle>,
    uniforms: HashMap<u32, Vec<f32>>,
    uploads: Vec<(u32, usize)>,
    draws: Vec<DrawCall>,
    log: Vec<String>,
}

/// In-memory GL device used by the unit tests
pub struct FakeGl {
    state: RefCell<FakeState>,
    version: Cell<(u32, u32)>,
    fail_compile: Cell<bool>,
    fail_link: Cell<bool>,
}

impl FakeGl {
    pub fn new() -> Self {
        let mut state = FakeState {
            next_handle: 1,
            ..FakeState::default()
        };
        state.integers.insert(glow::ACTIVE_TEXTURE, glow::TEXTURE0 as i32);
        state.integers.insert(glow::BLEND_SRC_RGB, glow::ONE as i32);
        state.integers.insert(glow::BLEND_SRC_ALPHA, glow::ONE as i32);
        state.integers.insert(glow::BLEND_DST_RGB, glow::ZERO as i32);
        state.integers.insert(glow::BLEND_DST_ALPHA, glow::ZERO as i32);
        state.integers.insert(glow::BLEND_EQUATION_RGB, glow::FUNC_ADD as i32);
        state.integers.insert(glow::BLEND_EQUATION_ALPHA, glow::FUNC_ADD as i32);
        Self {
            state: RefCell::new(state),
            version: Cell::new((3, 2)),
            fail_compile: Cell::new(false),
            fail_link: Cell::new(false),
        }
    }

    pub fn set_version(&self, major: u32, minor: u32) {
        self.version.set((major, minor));
    }

    pub fn fail_shader_compilation(&self, fail: bool) {
        self.fail_compile.set(fail);
    }

    pub fn fail_program_link(&self, fail: bool) {
        self.fail_link.set(fail);
    }

    pub fn log(&self) -> Vec<String> {
        self.state.borrow().log.clone()
    }

    pub fn clear_log(&self) {
        self.state.borrow_mut().log.clear();
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.state.borrow().draws.clone()
    }

    pub fn uploads(&self) -> Vec<(u32, usize)> {
        self.state.borrow().uploads.clone()
    }

    pub fn uniform(&self, location: u32) -> Option<Vec<f32>> {
        self.state.borrow().uniforms.get(&location).cloned()
    }

    pub fn live_objects(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub fn is_live(&self, handle: GlHandle) -> bool {
        self.state.borrow().live.contains(&handle)
    }

    /// Seed an arbitrary integer state value
    pub fn set_integer(&self, pname: u32, value: i32) {
        self.state.borrow_mut().integers.insert(pname, value);
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().log.push(call);
    }

    fn allocate(&self, kind: &str) -> GlHandle {
        let mut state = self.state.borrow_mut();
        let handle = state.next_handle;
        state.next_handle += 1;
        state.live.insert(handle);
        state.log.push(format!("create_{kind} {handle}"));
        handle
    }

    fn release(&self, kind: &str, handle: GlHandle) {
        let mut state = self.state.borrow_mut();
        assert!(
            handle == 0 || state.live.remove(&handle),
            "{kind} {handle} deleted twice or never created"
        );
        state.log.push(format!("delete_{kind} {handle}"));
    }

    fn active_unit(state: &FakeState) -> u32 {
        state
            .integers
            .get(&glow::ACTIVE_TEXTURE)
            .copied()
            .unwrap_or(glow::TEXTURE0 as i32) as u32
    }

    fn set(&self, pname: u32, value: i32) {
        self.state.borrow_mut().integers.insert(pname, value);
    }
}

impl GlDevice for FakeGl {
    fn version(&self) -> (u32, u32) {
        self.version.get()
    }

    fn get_integer(&self, pname: u32) -> i32 {
        let state = self.state.borrow();
        if pname == glow::TEXTURE_BINDING_2D {
            let unit = Self::active_unit(&state);
            return state.unit_textures.get(&unit).copied().unwrap_or(0) as i32;
        }
        state.integers.get(&pname).copied().unwrap_or(0)
    }

    fn get_integer4(&self, pname: u32) -> [i32; 4] {
        let state = self.state.borrow();
        match pname {
            glow::VIEWPORT => state.viewport,
            glow::SCISSOR_BOX => state.scissor_box,
            _ => [0; 4],
        }
    }

    fn is_enabled(&self, cap: u32) -> bool {
        self.state.borrow().enabled.contains(&cap)
    }

    fn enable(&self, cap: u32) {
        self.state.borrow_mut().enabled.insert(cap);
    }

    fn disable(&self, cap: u32) {
        self.state.borrow_mut().enabled.remove(&cap);
    }

    fn blend_equation(&self, mode: u32) {
        self.blend_equation_separate(mode, mode);
    }

    fn blend_equation_separate(&self, mode_rgb: u32, mode_alpha: u32) {
        self.set(glow::BLEND_EQUATION_RGB, mode_rgb as i32);
        self.set(glow::BLEND_EQUATION_ALPHA, mode_alpha as i32);
    }

    fn blend_func(&self, src: u32, dst: u32) {
        self.blend_func_separate(src, dst, src, dst);
    }

    fn blend_func_separate(&self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        self.set(glow::BLEND_SRC_RGB, src_rgb as i32);
        self.set(glow::BLEND_DST_RGB, dst_rgb as i32);
        self.set(glow::BLEND_SRC_ALPHA, src_alpha as i32);
        self.set(glow::BLEND_DST_ALPHA, dst_alpha as i32);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.state.borrow_mut().viewport = [x, y, width, height];
    }

    fn scissor(&self, x: i32, y: i32, width: i32, height: i32) {
        self.state.borrow_mut().scissor_box = [x, y, width, height];
    }

    fn clear_color(&self, _red: f32, _green: f32, _blue: f32, _alpha: f32) {}

    fn clear(&self, mask: u32) {
        self.record(format!("clear {mask}"));
    }

    fn create_buffer(&self) -> Result<GlHandle, String> {
        Ok(self.allocate("buffer"))
    }

    fn delete_buffer(&self, buffer: GlHandle) {
        self.release("buffer", buffer);
    }

    fn bind_buffer(&self, target: u32, buffer: GlHandle) {
        let pname = match target {
            glow::ARRAY_BUFFER => glow::ARRAY_BUFFER_BINDING,
            _ => glow::ELEMENT_ARRAY_BUFFER_BINDING,
        };
        self.set(pname, buffer as i32);
    }

    fn buffer_data(&self, target: u32, data: &[u8], _usage: u32) {
        self.state.borrow_mut().uploads.push((target, data.len()));
    }

    fn create_vertex_array(&self) -> Result<GlHandle, String> {
        Ok(self.allocate("vertex_array"))
    }

    fn delete_vertex_array(&self, vertex_array: GlHandle) {
        self.release("vertex_array", vertex_array);
    }

    fn bind_vertex_array(&self, vertex_array: GlHandle) {
        self.set(glow::VERTEX_ARRAY_BINDING, vertex_array as i32);
    }

    fn create_texture(&self) -> Result<GlHandle, String> {
        Ok(self.allocate("texture"))
    }

    fn delete_texture(&self, texture: GlHandle) {
        self.release("texture", texture);
    }

    fn bind_texture(&self, _target: u32, texture: GlHandle) {
        let mut state = self.state.borrow_mut();
        let unit = Self::active_unit(&state);
        state.unit_textures.insert(unit, texture);
    }

    fn active_texture(&self, unit: u32) {
        self.set(glow::ACTIVE_TEXTURE, unit as i32);
    }

    fn tex_parameter_i32(&self, _target: u32, _pname: u32, _value: i32) {}

    fn tex_image_2d_rgba(&self, width: i32, height: i32, pixels: &[u8]) {
        assert_eq!(pixels.len(), (width * height * 4) as usize);
        self.record(format!("tex_image_2d {width}x{height}"));
    }

    fn create_shader(&self, _kind: u32) -> Result<GlHandle, String> {
        Ok(self.allocate("shader"))
    }

    fn shader_source(&self, _shader: GlHandle, _source: &str) {}

    fn compile_shader(&self, _shader: GlHandle) {}

    fn shader_compile_status(&self, _shader: GlHandle) -> bool {
        !self.fail_compile.get()
    }

    fn shader_info_log(&self, _shader: GlHandle) -> String {
        "0:1(1): error: syntax error".to_string()
    }

    fn delete_shader(&self, shader: GlHandle) {
        self.release("shader", shader);
    }

    fn create_program(&self) -> Result<GlHandle, String> {
        Ok(self.allocate("program"))
    }

    fn attach_shader(&self, program: GlHandle, shader: GlHandle) {
        self.record(format!("attach_shader {program} {shader}"));
    }

    fn detach_shader(&self, program: GlHandle, shader: GlHandle) {
        self.record(format!("detach_shader {program} {shader}"));
    }

    fn link_program(&self, program: GlHandle) {
        if !self.fail_link.get() {
            self.state.borrow_mut().linked.insert(program);
        }
    }

    fn program_link_status(&self, program: GlHandle) -> bool {
        self.state.borrow().linked.contains(&program)
    }

    fn program_info_log(&self, _program: GlHandle) -> String {
        "error: linking failed".to_string()
    }

    fn delete_program(&self, program: GlHandle) {
        self.state.borrow_mut().linked.remove(&program);
        self.release("program", program);
    }

    fn use_program(&self, program: GlHandle) {
        self.set(glow::CURRENT_PROGRAM, program as i32);
    }

    fn attrib_location(&self, program: GlHandle, name: &str) -> Option<u32> {
        if !self.state.borrow().linked.contains(&program) {
            return None;
        }
        ["Position", "UV", "Color"]
            .iter()
            .position(|attrib| *attrib == name)
            .map(|index| index as u32)
    }

    fn uniform_location(&self, program: GlHandle, name: &str) -> Option<u32> {
        if !self.state.borrow().linked.contains(&program) {
            return None;
        }
        ["Texture", "ProjMtx"]
            .iter()
            .position(|uniform| *uniform == name)
            .map(|index| index as u32)
    }

    fn uniform_1_i32(&self, location: Option<u32>, value: i32) {
        if let Some(location) = location {
            self.state
                .borrow_mut()
                .uniforms
                .insert(location, vec![value as f32]);
        }
    }

    fn uniform_matrix4(&self, location: Option<u32>, matrix: &[f32; 16]) {
        if let Some(location) = location {
            self.state
                .borrow_mut()
                .uniforms
                .insert(location, matrix.to_vec());
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(format!("enable_vertex_attrib_array {index}"));
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        _data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.record(format!(
            "vertex_attrib_pointer {index} {size} {normalized} {stride} {offset}"
        ));
    }

    fn draw_elements(&self, _mode: u32, count: i32, element_type: u32, offset: i32) {
        let texture = self.get_integer(glow::TEXTURE_BINDING_2D) as GlHandle;
        let mut state = self.state.borrow_mut();
        let call = DrawCall {
            count,
            offset,
            element_type,
            texture,
            scissor: state.scissor_box,
            program: state.integers.get(&glow::CURRENT_PROGRAM).copied().unwrap_or(0) as GlHandle,
            vertex_array: state
                .integers
                .get(&glow::VERTEX_ARRAY_BINDING)
                .copied()
                .unwrap_or(0) as GlHandle,
        };
        state.draws.push(call);
    }
}

/// Observable state of a [`FakeNativeWindow`], shared with the test body
#[derive(Default)]
pub struct FakeNativeState {
    pub should_close: Cell<bool>,
    pub window_size: Cell<(i32, i32)>,
    pub framebuffer_size: Cell<(i32, i32)>,
    pub focused: Cell<bool>,
    pub cursor: Cell<(f64, f64)>,
    pub buttons_down: Cell<[bool; 3]>,
    pub time: Cell<f64>,
    pub cursor_hidden: Cell<bool>,
    pub make_current_calls: Cell<usize>,
    pub swaps: Cell<usize>,
    pub clipboard: RefCell<Option<String>>,
}

/// Scripted native window
pub struct FakeNativeWindow {
    handle: NativeHandle,
    pub state: Rc<FakeNativeState>,
}

impl FakeNativeWindow {
    /// A focused window with a 2x framebuffer scale
    pub fn new(handle: usize, width: i32, height: i32) -> Self {
        let state = FakeNativeState::default();
        state.window_size.set((width, height));
        state.framebuffer_size.set((width * 2, height * 2));
        state.focused.set(true);
        Self {
            handle: NativeHandle::from_raw(handle),
            state: Rc::new(state),
        }
    }
}

struct FakeClipboard(Rc<FakeNativeState>);

impl ClipboardProvider for FakeClipboard {
    fn get(&self) -> Option<String> {
        self.0.clipboard.borrow().clone()
    }

    fn set(&self, text: &str) {
        *self.0.clipboard.borrow_mut() = Some(text.to_string());
    }
}

/// Shared context that only counts transitions
pub struct FakeSharedContext {
    pub current: std::sync::Arc<std::sync::atomic::AtomicI32>,
}

impl SharedContext for FakeSharedContext {
    fn make_current(&mut self) {
        self.current.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }

    fn release(&mut self) {
        self.current.fetch_sub(1, std::sync::atomic::Ordering::SeqCst);
    }
}

impl NativeWindow for FakeNativeWindow {
    fn handle(&self) -> NativeHandle {
        self.handle
    }

    fn should_close(&self) -> bool {
        self.state.should_close.get()
    }

    fn set_should_close(&mut self, value: bool) {
        self.state.should_close.set(value);
    }

    fn make_current(&mut self) {
        let calls = self.state.make_current_calls.get();
        self.state.make_current_calls.set(calls + 1);
    }

    fn swap_buffers(&mut self) {
        self.state.swaps.set(self.state.swaps.get() + 1);
    }

    fn window_size(&self) -> (i32, i32) {
        self.state.window_size.get()
    }

    fn framebuffer_size(&self) -> (i32, i32) {
        self.state.framebuffer_size.get()
    }

    fn is_focused(&self) -> bool {
        self.state.focused.get()
    }

    fn cursor_pos(&self) -> (f64, f64) {
        self.state.cursor.get()
    }

    fn is_mouse_button_down(&self, button: usize) -> bool {
        self.state.buttons_down.get().get(button).copied().unwrap_or(false)
    }

    fn set_cursor_hidden(&mut self, hidden: bool) {
        self.state.cursor_hidden.set(hidden);
    }

    fn time(&self) -> f64 {
        self.state.time.get()
    }

    fn clipboard(&self) -> Box<dyn ClipboardProvider> {
        Box::new(FakeClipboard(Rc::clone(&self.state)))
    }

    fn create_offscreen_context(&mut self) -> Result<OffscreenContext, WindowError> {
        let context = FakeSharedContext {
            current: std::sync::Arc::default(),
        };
        Ok(OffscreenContext::new(Box::new(()), Box::new(context)))
    }
}

/// Event source handing out a scripted queue on the next poll
#[derive(Default)]
pub struct FakeEventSource {
    queue: Vec<(NativeHandle, NativeEvent)>,
}

impl FakeEventSource {
    pub fn push(&mut self, handle: NativeHandle, event: NativeEvent) {
        self.queue.push((handle, event));
    }

    pub fn is_drained(&self) -> bool {
        self.queue.is_empty()
    }
}

impl EventSource for FakeEventSource {
    fn poll_events(&mut self) -> Vec<(NativeHandle, NativeEvent)> {
        std::mem::take(&mut self.queue)
    }
}

/// Handler that appends a line per received event to a shared log
#[derive(Default, Clone)]
pub struct RecordingHandler {
    pub events: Rc<RefCell<Vec<String>>>,
    pub ui_frames: Rc<Cell<usize>>,
}

impl RecordingHandler {
    fn push(&self, line: String) {
        self.events.borrow_mut().push(line);
    }
}

impl WindowHandler for RecordingHandler {
    fn on_window_pos(&mut self, x: i32, y: i32) {
        self.push(format!("pos {x} {y}"));
    }

    fn on_window_close(&mut self) {
        self.push("close".to_string());
    }

    fn on_framebuffer_size(&mut self, width: i32, height: i32) {
        self.push(format!("framebuffer {width} {height}"));
    }

    fn on_mouse_button(&mut self, button: MouseButton, pressed: bool, mods: Modifiers) {
        self.push(format!("button {button:?} {pressed} {mods:?}"));
    }

    fn on_scroll(&mut self, x_offset: f64, y_offset: f64) {
        self.push(format!("scroll {x_offset} {y_offset}"));
    }

    fn on_key(&mut self, key: KeyCode, scan_code: i32, pressed: bool, mods: Modifiers) {
        self.push(format!("key {key:?} {scan_code} {pressed} {mods:?}"));
    }

    fn on_char(&mut self, code_point: u32) {
        self.push(format!("char {code_point}"));
    }

    fn on_drop(&mut self, paths: &[std::path::PathBuf]) {
        self.push(format!("drop {}", paths.len()));
    }

    fn define_ui(&mut self, ui: &imgui::Ui) {
        self.ui_frames.set(self.ui_frames.get() + 1);
        ui.text("test");
    }
}

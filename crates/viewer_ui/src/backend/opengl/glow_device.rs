//! [`GlDevice`] over a `glow` context

use std::num::NonZeroU32;
use std::os::raw::c_void;

use glow::HasContext;

use super::{GlDevice, GlHandle};

/// OpenGL device backed by a loaded `glow::Context`
///
/// The context must be current on the calling thread for every call; the
/// owning window guarantees this by making its context current in
/// `begin_frame` and on construction.
pub struct GlowDevice {
    gl: glow::Context,
}

impl GlowDevice {
    /// Load GL entry points through `loader`
    ///
    /// # Safety
    /// The context the loader resolves symbols for must be current on this
    /// thread, and the returned pointers must be valid GL entry points.
    #[allow(unsafe_code)]
    pub unsafe fn from_loader<F>(loader: F) -> Self
    where
        F: FnMut(&str) -> *const c_void,
    {
        Self {
            gl: glow::Context::from_loader_function(loader),
        }
    }
}

fn object<T>(handle: GlHandle, wrap: impl FnOnce(NonZeroU32) -> T) -> Option<T> {
    NonZeroU32::new(handle).map(wrap)
}

// Every method forwards a single GL call. The device is only reachable from
// the thread that owns the current context, which is what the GL calls need.
#[allow(unsafe_code)]
impl GlDevice for GlowDevice {
    fn version(&self) -> (u32, u32) {
        let version = self.gl.version();
        (version.major, version.minor)
    }

    fn get_integer(&self, pname: u32) -> i32 {
        unsafe { self.gl.get_parameter_i32(pname) }
    }

    fn get_integer4(&self, pname: u32) -> [i32; 4] {
        let mut values = [0; 4];
        unsafe { self.gl.get_parameter_i32_slice(pname, &mut values) };
        values
    }

    fn is_enabled(&self, cap: u32) -> bool {
        unsafe { self.gl.is_enabled(cap) }
    }

    fn enable(&self, cap: u32) {
        unsafe { self.gl.enable(cap) }
    }

    fn disable(&self, cap: u32) {
        unsafe { self.gl.disable(cap) }
    }

    fn blend_equation(&self, mode: u32) {
        unsafe { self.gl.blend_equation(mode) }
    }

    fn blend_equation_separate(&self, mode_rgb: u32, mode_alpha: u32) {
        unsafe { self.gl.blend_equation_separate(mode_rgb, mode_alpha) }
    }

    fn blend_func(&self, src: u32, dst: u32) {
        unsafe { self.gl.blend_func(src, dst) }
    }

    fn blend_func_separate(&self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        unsafe { self.gl.blend_func_separate(src_rgb, dst_rgb, src_alpha, dst_alpha) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn scissor(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.scissor(x, y, width, height) }
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { self.gl.clear_color(red, green, blue, alpha) }
    }

    fn clear(&self, mask: u32) {
        unsafe { self.gl.clear(mask) }
    }

    fn create_buffer(&self) -> Result<GlHandle, String> {
        unsafe { self.gl.create_buffer().map(|buffer| buffer.0.get()) }
    }

    fn delete_buffer(&self, buffer: GlHandle) {
        if let Some(buffer) = object(buffer, glow::NativeBuffer) {
            unsafe { self.gl.delete_buffer(buffer) }
        }
    }

    fn bind_buffer(&self, target: u32, buffer: GlHandle) {
        unsafe { self.gl.bind_buffer(target, object(buffer, glow::NativeBuffer)) }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.gl.buffer_data_u8_slice(target, data, usage) }
    }

    fn create_vertex_array(&self) -> Result<GlHandle, String> {
        unsafe { self.gl.create_vertex_array().map(|vao| vao.0.get()) }
    }

    fn delete_vertex_array(&self, vertex_array: GlHandle) {
        if let Some(vao) = object(vertex_array, glow::NativeVertexArray) {
            unsafe { self.gl.delete_vertex_array(vao) }
        }
    }

    fn bind_vertex_array(&self, vertex_array: GlHandle) {
        unsafe {
            self.gl
                .bind_vertex_array(object(vertex_array, glow::NativeVertexArray));
        }
    }

    fn create_texture(&self) -> Result<GlHandle, String> {
        unsafe { self.gl.create_texture().map(|texture| texture.0.get()) }
    }

    fn delete_texture(&self, texture: GlHandle) {
        if let Some(texture) = object(texture, glow::NativeTexture) {
            unsafe { self.gl.delete_texture(texture) }
        }
    }

    fn bind_texture(&self, target: u32, texture: GlHandle) {
        unsafe { self.gl.bind_texture(target, object(texture, glow::NativeTexture)) }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(unit) }
    }

    fn tex_parameter_i32(&self, target: u32, pname: u32, value: i32) {
        unsafe { self.gl.tex_parameter_i32(target, pname, value) }
    }

    fn tex_image_2d_rgba(&self, width: i32, height: i32, pixels: &[u8]) {
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(pixels),
            );
        }
    }

    fn create_shader(&self, kind: u32) -> Result<GlHandle, String> {
        unsafe { self.gl.create_shader(kind).map(|shader| shader.0.get()) }
    }

    fn shader_source(&self, shader: GlHandle, source: &str) {
        if let Some(shader) = object(shader, glow::NativeShader) {
            unsafe { self.gl.shader_source(shader, source) }
        }
    }

    fn compile_shader(&self, shader: GlHandle) {
        if let Some(shader) = object(shader, glow::NativeShader) {
            unsafe { self.gl.compile_shader(shader) }
        }
    }

    fn shader_compile_status(&self, shader: GlHandle) -> bool {
        object(shader, glow::NativeShader)
            .is_some_and(|shader| unsafe { self.gl.get_shader_compile_status(shader) })
    }

    fn shader_info_log(&self, shader: GlHandle) -> String {
        object(shader, glow::NativeShader)
            .map(|shader| unsafe { self.gl.get_shader_info_log(shader) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: GlHandle) {
        if let Some(shader) = object(shader, glow::NativeShader) {
            unsafe { self.gl.delete_shader(shader) }
        }
    }

    fn create_program(&self) -> Result<GlHandle, String> {
        unsafe { self.gl.create_program().map(|program| program.0.get()) }
    }

    fn attach_shader(&self, program: GlHandle, shader: GlHandle) {
        if let (Some(program), Some(shader)) = (
            object(program, glow::NativeProgram),
            object(shader, glow::NativeShader),
        ) {
            unsafe { self.gl.attach_shader(program, shader) }
        }
    }

    fn detach_shader(&self, program: GlHandle, shader: GlHandle) {
        if let (Some(program), Some(shader)) = (
            object(program, glow::NativeProgram),
            object(shader, glow::NativeShader),
        ) {
            unsafe { self.gl.detach_shader(program, shader) }
        }
    }

    fn link_program(&self, program: GlHandle) {
        if let Some(program) = object(program, glow::NativeProgram) {
            unsafe { self.gl.link_program(program) }
        }
    }

    fn program_link_status(&self, program: GlHandle) -> bool {
        object(program, glow::NativeProgram)
            .is_some_and(|program| unsafe { self.gl.get_program_link_status(program) })
    }

    fn program_info_log(&self, program: GlHandle) -> String {
        object(program, glow::NativeProgram)
            .map(|program| unsafe { self.gl.get_program_info_log(program) })
            .unwrap_or_default()
    }

    fn delete_program(&self, program: GlHandle) {
        if let Some(program) = object(program, glow::NativeProgram) {
            unsafe { self.gl.delete_program(program) }
        }
    }

    fn use_program(&self, program: GlHandle) {
        unsafe { self.gl.use_program(object(program, glow::NativeProgram)) }
    }

    fn attrib_location(&self, program: GlHandle, name: &str) -> Option<u32> {
        let program = object(program, glow::NativeProgram)?;
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn uniform_location(&self, program: GlHandle, name: &str) -> Option<u32> {
        let program = object(program, glow::NativeProgram)?;
        unsafe { self.gl.get_uniform_location(program, name) }.map(|location| location.0)
    }

    fn uniform_1_i32(&self, location: Option<u32>, value: i32) {
        let location = location.map(glow::NativeUniformLocation);
        unsafe { self.gl.uniform_1_i32(location.as_ref(), value) }
    }

    fn uniform_matrix4(&self, location: Option<u32>, matrix: &[f32; 16]) {
        let location = location.map(glow::NativeUniformLocation);
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(location.as_ref(), false, matrix);
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, size, data_type, normalized, stride, offset);
        }
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        unsafe { self.gl.draw_elements(mode, count, element_type, offset) }
    }
}

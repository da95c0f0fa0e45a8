//! OpenGL device abstraction
//!
//! The window, the shader wrapper and the UI renderer only talk to OpenGL
//! through [`GlDevice`]. This keeps every GL call the crate makes in one
//! narrow, mockable surface. Parameter and target names are the regular GL
//! enums as defined by `glow`, object handles are plain `u32` with `0`
//! meaning "no object".
//!
//! All methods take `&self`: like the underlying GL context, a device is
//! bound to the thread whose context is current and carries its own state.

mod glow_device;
pub mod shader;

pub use glow_device::GlowDevice;
pub use shader::Shader;

/// Clear masks for [`GlDevice::clear`]
pub use glow::{COLOR_BUFFER_BIT, DEPTH_BUFFER_BIT, STENCIL_BUFFER_BIT};

/// Raw OpenGL object name; `0` is the null object
pub type GlHandle = u32;

/// OpenGL context version, ordered by `(major, minor)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GlVersion {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
}

impl From<(u32, u32)> for GlVersion {
    fn from((major, minor): (u32, u32)) -> Self {
        Self { major, minor }
    }
}

impl std::fmt::Display for GlVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The subset of OpenGL 3.2 core used by this crate
#[allow(missing_docs)]
pub trait GlDevice {
    /// `(major, minor)` of the context behind this device
    fn version(&self) -> (u32, u32);

    // State queries
    fn get_integer(&self, pname: u32) -> i32;
    fn get_integer4(&self, pname: u32) -> [i32; 4];
    fn is_enabled(&self, cap: u32) -> bool;

    // Fixed-function state
    fn enable(&self, cap: u32);
    fn disable(&self, cap: u32);
    fn blend_equation(&self, mode: u32);
    fn blend_equation_separate(&self, mode_rgb: u32, mode_alpha: u32);
    fn blend_func(&self, src: u32, dst: u32);
    fn blend_func_separate(&self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn scissor(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32);
    fn clear(&self, mask: u32);

    // Objects and bindings
    fn create_buffer(&self) -> Result<GlHandle, String>;
    fn delete_buffer(&self, buffer: GlHandle);
    fn bind_buffer(&self, target: u32, buffer: GlHandle);
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    fn create_vertex_array(&self) -> Result<GlHandle, String>;
    fn delete_vertex_array(&self, vertex_array: GlHandle);
    fn bind_vertex_array(&self, vertex_array: GlHandle);
    fn create_texture(&self) -> Result<GlHandle, String>;
    fn delete_texture(&self, texture: GlHandle);
    fn bind_texture(&self, target: u32, texture: GlHandle);
    fn active_texture(&self, unit: u32);
    fn tex_parameter_i32(&self, target: u32, pname: u32, value: i32);
    fn tex_image_2d_rgba(&self, width: i32, height: i32, pixels: &[u8]);

    // Shaders
    fn create_shader(&self, kind: u32) -> Result<GlHandle, String>;
    fn shader_source(&self, shader: GlHandle, source: &str);
    fn compile_shader(&self, shader: GlHandle);
    fn shader_compile_status(&self, shader: GlHandle) -> bool;
    fn shader_info_log(&self, shader: GlHandle) -> String;
    fn delete_shader(&self, shader: GlHandle);
    fn create_program(&self) -> Result<GlHandle, String>;
    fn attach_shader(&self, program: GlHandle, shader: GlHandle);
    fn detach_shader(&self, program: GlHandle, shader: GlHandle);
    fn link_program(&self, program: GlHandle);
    fn program_link_status(&self, program: GlHandle) -> bool;
    fn program_info_log(&self, program: GlHandle) -> String;
    fn delete_program(&self, program: GlHandle);
    fn use_program(&self, program: GlHandle);
    fn attrib_location(&self, program: GlHandle, name: &str) -> Option<u32>;
    fn uniform_location(&self, program: GlHandle, name: &str) -> Option<u32>;
    fn uniform_1_i32(&self, location: Option<u32>, value: i32);
    fn uniform_matrix4(&self, location: Option<u32>, matrix: &[f32; 16]);

    // Vertex layout and drawing
    fn enable_vertex_attrib_array(&self, index: u32);
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32);
}

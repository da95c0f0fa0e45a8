//! GPU objects owned by a UI session
//!
//! [`UiDeviceObjects`] holds the shader, vertex/index buffers, vertex array
//! and font texture. Objects are created one at a time into a value that
//! already owns the ones before, so a failure partway through releases
//! everything created so far. Release order is fixed: vertex array, buffers,
//! shader (stages detached before deletion), font texture last.

use std::rc::Rc;

use crate::backend::opengl::{GlDevice, GlHandle, Shader};

use super::draw::DrawVertex;
use super::UiError;

const VERTEX_SHADER: &str = "#version 150
uniform mat4 ProjMtx;
in vec2 Position;
in vec2 UV;
in vec4 Color;
out vec2 Frag_UV;
out vec4 Frag_Color;
void main()
{
  Frag_UV = UV;
  Frag_Color = Color;
  gl_Position = ProjMtx * vec4(Position.xy,0,1);
}
";

const FRAGMENT_SHADER: &str = "#version 150
uniform sampler2D Texture;
in vec2 Frag_UV;
in vec4 Frag_Color;
out vec4 Out_Color;
void main()
{
  Out_Color = Frag_Color * texture( Texture, Frag_UV.st);
}
";

/// Shader input locations resolved after linking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShaderLocations {
    /// `Texture` sampler
    pub texture: Option<u32>,
    /// `ProjMtx` projection matrix
    pub proj_mtx: Option<u32>,
    /// `Position` attribute
    pub position: Option<u32>,
    /// `UV` attribute
    pub uv: Option<u32>,
    /// `Color` attribute
    pub color: Option<u32>,
}

/// Font atlas pixels ready for upload
#[derive(Debug, Clone, Copy)]
pub struct FontAtlasImage<'a> {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// RGBA8 pixels, row major
    pub pixels: &'a [u8],
}

/// All GPU objects of one UI session
pub struct UiDeviceObjects {
    gl: Rc<dyn GlDevice>,
    shader: Option<Shader>,
    locations: ShaderLocations,
    vbo: GlHandle,
    ebo: GlHandle,
    vao: GlHandle,
    font_texture: GlHandle,
}

impl UiDeviceObjects {
    /// Compile the UI shader, allocate buffers and vertex array, wire the
    /// vertex layout and upload `font`
    ///
    /// Texture, array buffer and vertex array bindings are restored before
    /// returning.
    ///
    /// # Errors
    /// [`UiError::DeviceObjects`] if the driver refuses to create an object.
    /// Shader compile or link failures are not errors; see [`Shader`].
    pub fn create(gl: Rc<dyn GlDevice>, font: &FontAtlasImage<'_>) -> Result<Self, UiError> {
        let last_texture = gl.get_integer(glow::TEXTURE_BINDING_2D) as GlHandle;
        let last_array_buffer = gl.get_integer(glow::ARRAY_BUFFER_BINDING) as GlHandle;
        let last_vertex_array = gl.get_integer(glow::VERTEX_ARRAY_BINDING) as GlHandle;

        let mut objects = Self {
            gl: Rc::clone(&gl),
            shader: None,
            locations: ShaderLocations::default(),
            vbo: 0,
            ebo: 0,
            vao: 0,
            font_texture: 0,
        };
        let result = objects.build(font);

        gl.bind_texture(glow::TEXTURE_2D, last_texture);
        gl.bind_buffer(glow::ARRAY_BUFFER, last_array_buffer);
        gl.bind_vertex_array(last_vertex_array);

        result.map(|()| objects)
    }

    fn build(&mut self, font: &FontAtlasImage<'_>) -> Result<(), UiError> {
        let gl = Rc::clone(&self.gl);

        let shader = self
            .shader
            .insert(Shader::compile(Rc::clone(&gl), VERTEX_SHADER, FRAGMENT_SHADER));
        self.locations = ShaderLocations {
            texture: shader.uniform_location("Texture"),
            proj_mtx: shader.uniform_location("ProjMtx"),
            position: shader.attrib_location("Position"),
            uv: shader.attrib_location("UV"),
            color: shader.attrib_location("Color"),
        };

        self.vbo = gl.create_buffer().map_err(UiError::DeviceObjects)?;
        self.ebo = gl.create_buffer().map_err(UiError::DeviceObjects)?;
        self.vao = gl.create_vertex_array().map_err(UiError::DeviceObjects)?;

        gl.bind_vertex_array(self.vao);
        gl.bind_buffer(glow::ARRAY_BUFFER, self.vbo);
        let layout = [
            (self.locations.position, 2, glow::FLOAT, false, DrawVertex::POS_OFFSET),
            (self.locations.uv, 2, glow::FLOAT, false, DrawVertex::UV_OFFSET),
            (self.locations.color, 4, glow::UNSIGNED_BYTE, true, DrawVertex::COL_OFFSET),
        ];
        for (location, size, data_type, normalized, offset) in layout {
            // An attribute the driver optimised away (or an unlinked shader)
            // has no location to wire.
            if let Some(index) = location {
                gl.enable_vertex_attrib_array(index);
                gl.vertex_attrib_pointer(
                    index,
                    size,
                    data_type,
                    normalized,
                    DrawVertex::STRIDE,
                    offset,
                );
            }
        }

        self.create_fonts_texture(font)
    }

    /// Upload the font atlas as one RGBA texture
    ///
    /// Restores the previous texture binding.
    fn create_fonts_texture(&mut self, font: &FontAtlasImage<'_>) -> Result<(), UiError> {
        let gl = Rc::clone(&self.gl);
        let last_texture = gl.get_integer(glow::TEXTURE_BINDING_2D) as GlHandle;

        self.font_texture = gl.create_texture().map_err(UiError::DeviceObjects)?;
        gl.bind_texture(glow::TEXTURE_2D, self.font_texture);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
        gl.tex_image_2d_rgba(font.width as i32, font.height as i32, font.pixels);

        gl.bind_texture(glow::TEXTURE_2D, last_texture);
        log::debug!(
            "Uploaded {}x{} font atlas as texture {}",
            font.width,
            font.height,
            self.font_texture
        );
        Ok(())
    }

    /// The UI shader, if it was created
    pub fn shader(&self) -> Option<&Shader> {
        self.shader.as_ref()
    }

    /// Resolved shader locations
    pub fn locations(&self) -> ShaderLocations {
        self.locations
    }

    /// Vertex buffer
    pub fn vbo(&self) -> GlHandle {
        self.vbo
    }

    /// Index buffer
    pub fn ebo(&self) -> GlHandle {
        self.ebo
    }

    /// Vertex array
    pub fn vao(&self) -> GlHandle {
        self.vao
    }

    /// Font atlas texture; its name is also the toolkit's font texture id
    pub fn font_texture(&self) -> GlHandle {
        self.font_texture
    }

    /// Device the objects live on
    pub fn gl(&self) -> &Rc<dyn GlDevice> {
        &self.gl
    }
}

impl Drop for UiDeviceObjects {
    fn drop(&mut self) {
        let gl = Rc::clone(&self.gl);
        if self.vao != 0 {
            gl.delete_vertex_array(std::mem::take(&mut self.vao));
        }
        if self.vbo != 0 {
            gl.delete_buffer(std::mem::take(&mut self.vbo));
        }
        if self.ebo != 0 {
            gl.delete_buffer(std::mem::take(&mut self.ebo));
        }
        if let Some(mut shader) = self.shader.take() {
            shader.delete();
        }
        if self.font_texture != 0 {
            gl.delete_texture(std::mem::take(&mut self.font_texture));
        }
    }
}

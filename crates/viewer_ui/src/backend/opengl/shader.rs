//! Vertex/fragment shader program wrapper
//!
//! Compile and link failures are not fatal: they are logged with the driver's
//! info log and the program stays unlinked. An unlinked program answers every
//! location query with `None` and ignores `use_program`, so whatever renders
//! with it simply draws nothing until the sources are fixed.

use std::rc::Rc;

use super::{GlDevice, GlHandle};

/// A linked (or failed) OpenGL shader program and its two stages
pub struct Shader {
    gl: Rc<dyn GlDevice>,
    program: GlHandle,
    vertex: GlHandle,
    fragment: GlHandle,
    linked: bool,
}

impl Shader {
    /// Compile and link a vertex/fragment pair
    pub fn compile(gl: Rc<dyn GlDevice>, vertex_src: &str, fragment_src: &str) -> Self {
        let mut shader = Self {
            gl,
            program: 0,
            vertex: 0,
            fragment: 0,
            linked: false,
        };
        shader.linked = shader.build(vertex_src, fragment_src);
        shader
    }

    fn build(&mut self, vertex_src: &str, fragment_src: &str) -> bool {
        let gl = Rc::clone(&self.gl);

        match gl.create_program() {
            Ok(program) => self.program = program,
            Err(err) => {
                log::error!("Shader program creation failed: {err}");
                return false;
            }
        }

        self.vertex = match compile_stage(gl.as_ref(), glow::VERTEX_SHADER, vertex_src) {
            Some(stage) => stage,
            None => return false,
        };
        self.fragment = match compile_stage(gl.as_ref(), glow::FRAGMENT_SHADER, fragment_src) {
            Some(stage) => stage,
            None => return false,
        };

        gl.attach_shader(self.program, self.vertex);
        gl.attach_shader(self.program, self.fragment);
        gl.link_program(self.program);
        if !gl.program_link_status(self.program) {
            log::error!("Shader program: {}", gl.program_info_log(self.program));
            return false;
        }

        true
    }

    /// Whether compilation and linking succeeded
    pub fn linked(&self) -> bool {
        self.linked
    }

    /// Program object name (0 if none was created)
    pub fn handle(&self) -> GlHandle {
        self.program
    }

    /// Location of a vertex attribute, `None` if unlinked or absent
    pub fn attrib_location(&self, name: &str) -> Option<u32> {
        if self.linked {
            self.gl.attrib_location(self.program, name)
        } else {
            None
        }
    }

    /// Location of a uniform, `None` if unlinked or absent
    pub fn uniform_location(&self, name: &str) -> Option<u32> {
        if self.linked {
            self.gl.uniform_location(self.program, name)
        } else {
            None
        }
    }

    /// Bind the program; no-op if it failed to link
    pub fn use_program(&self) {
        if self.linked {
            self.gl.use_program(self.program);
        }
    }

    /// Detach and delete both stages, then the program
    ///
    /// Safe to call more than once.
    pub fn delete(&mut self) {
        if self.program != 0 {
            for stage in [&mut self.vertex, &mut self.fragment] {
                if *stage != 0 {
                    self.gl.detach_shader(self.program, *stage);
                    self.gl.delete_shader(*stage);
                    *stage = 0;
                }
            }
            self.gl.delete_program(self.program);
            self.program = 0;
        }
        self.linked = false;
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        self.delete();
    }
}

/// Compile one stage. A stage that fails to compile is deleted here and
/// never attached.
fn compile_stage(gl: &dyn GlDevice, kind: u32, source: &str) -> Option<GlHandle> {
    let stage = match gl.create_shader(kind) {
        Ok(stage) => stage,
        Err(err) => {
            log::error!("Shader creation failed: {err}");
            return None;
        }
    };
    gl.shader_source(stage, source);
    gl.compile_shader(stage);
    if gl.shader_compile_status(stage) {
        Some(stage)
    } else {
        log::error!("Shader error: {}", gl.shader_info_log(stage));
        gl.delete_shader(stage);
        None
    }
}

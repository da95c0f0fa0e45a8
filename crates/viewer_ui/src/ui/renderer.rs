//! Draw-list renderer
//!
//! Renders one finished UI frame as an overlay without disturbing the GL
//! state of whoever called it: every piece of state the renderer touches is
//! captured in a [`GlStateSnapshot`] first and restored afterwards.
//!
//! There is no error path. A missing uniform or an unlinked shader only
//! degrades what ends up on screen.

use std::mem::size_of;
use std::rc::Rc;

use crate::backend::opengl::{GlDevice, GlHandle};

use super::device::{FontAtlasImage, UiDeviceObjects};
use super::draw::{DrawCommand, DrawFrame, DrawIndex};
use super::UiError;

/// GL state touched by the renderer
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlStateSnapshot {
    pub program: GlHandle,
    pub active_texture: u32,
    pub texture: GlHandle,
    pub array_buffer: GlHandle,
    pub vertex_array: GlHandle,
    pub element_array_buffer: GlHandle,
    pub blend_src_rgb: u32,
    pub blend_dst_rgb: u32,
    pub blend_src_alpha: u32,
    pub blend_dst_alpha: u32,
    pub blend_equation_rgb: u32,
    pub blend_equation_alpha: u32,
    pub viewport: [i32; 4],
    pub scissor_box: [i32; 4],
    pub blend: bool,
    pub cull_face: bool,
    pub depth_test: bool,
    pub scissor_test: bool,
}

impl GlStateSnapshot {
    /// Read the current state
    ///
    /// The texture binding is the one on unit 0, which is the unit the
    /// renderer draws with.
    pub fn capture(gl: &dyn GlDevice) -> Self {
        let int = |pname| gl.get_integer(pname) as u32;
        let active_texture = int(glow::ACTIVE_TEXTURE);
        gl.active_texture(glow::TEXTURE0);
        let texture = int(glow::TEXTURE_BINDING_2D);
        gl.active_texture(active_texture);

        // The element buffer binding is vertex array state; read it while
        // the caller's vertex array is still bound.
        Self {
            program: int(glow::CURRENT_PROGRAM),
            active_texture,
            texture,
            array_buffer: int(glow::ARRAY_BUFFER_BINDING),
            vertex_array: int(glow::VERTEX_ARRAY_BINDING),
            element_array_buffer: int(glow::ELEMENT_ARRAY_BUFFER_BINDING),
            blend_src_rgb: int(glow::BLEND_SRC_RGB),
            blend_dst_rgb: int(glow::BLEND_DST_RGB),
            blend_src_alpha: int(glow::BLEND_SRC_ALPHA),
            blend_dst_alpha: int(glow::BLEND_DST_ALPHA),
            blend_equation_rgb: int(glow::BLEND_EQUATION_RGB),
            blend_equation_alpha: int(glow::BLEND_EQUATION_ALPHA),
            viewport: gl.get_integer4(glow::VIEWPORT),
            scissor_box: gl.get_integer4(glow::SCISSOR_BOX),
            blend: gl.is_enabled(glow::BLEND),
            cull_face: gl.is_enabled(glow::CULL_FACE),
            depth_test: gl.is_enabled(glow::DEPTH_TEST),
            scissor_test: gl.is_enabled(glow::SCISSOR_TEST),
        }
    }

    /// Put back everything captured
    pub fn restore(&self, gl: &dyn GlDevice) {
        gl.use_program(self.program);
        gl.active_texture(glow::TEXTURE0);
        gl.bind_texture(glow::TEXTURE_2D, self.texture);
        gl.active_texture(self.active_texture);
        gl.bind_buffer(glow::ARRAY_BUFFER, self.array_buffer);
        gl.bind_vertex_array(self.vertex_array);
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, self.element_array_buffer);
        gl.blend_equation_separate(self.blend_equation_rgb, self.blend_equation_alpha);
        gl.blend_func_separate(
            self.blend_src_rgb,
            self.blend_dst_rgb,
            self.blend_src_alpha,
            self.blend_dst_alpha,
        );
        for (cap, enabled) in [
            (glow::BLEND, self.blend),
            (glow::CULL_FACE, self.cull_face),
            (glow::DEPTH_TEST, self.depth_test),
            (glow::SCISSOR_TEST, self.scissor_test),
        ] {
            if enabled {
                gl.enable(cap);
            } else {
                gl.disable(cap);
            }
        }
        let [x, y, width, height] = self.viewport;
        gl.viewport(x, y, width, height);
        let [x, y, width, height] = self.scissor_box;
        gl.scissor(x, y, width, height);
    }
}

/// Column-major orthographic projection from display space to clip space
///
/// Maps `display_pos` to the top-left corner and `display_pos +
/// display_size` to the bottom-right, with y pointing down.
pub fn ortho_projection(display_pos: [f32; 2], display_size: [f32; 2]) -> [f32; 16] {
    let left = display_pos[0];
    let right = display_pos[0] + display_size[0];
    let top = display_pos[1];
    let bottom = display_pos[1] + display_size[1];

    #[rustfmt::skip]
    let matrix = [
        2.0 / (right - left),            0.0,                             0.0,  0.0,
        0.0,                             2.0 / (top - bottom),            0.0,  0.0,
        0.0,                             0.0,                             -1.0, 0.0,
        (right + left) / (left - right), (top + bottom) / (bottom - top), 0.0,  1.0,
    ];
    matrix
}

/// Convert a UI clip rectangle into a GL scissor box `[x, y, width, height]`
///
/// `clip_rect` is `[x1, y1, x2, y2]` in logical display coordinates with the
/// origin at the top left. The result is in framebuffer pixels with the
/// origin at the bottom left.
pub fn scissor_rect(
    clip_rect: [f32; 4],
    display_pos: [f32; 2],
    framebuffer_scale: [f32; 2],
    framebuffer_height: i32,
) -> [i32; 4] {
    let x1 = (clip_rect[0] - display_pos[0]) * framebuffer_scale[0];
    let y1 = (clip_rect[1] - display_pos[1]) * framebuffer_scale[1];
    let x2 = (clip_rect[2] - display_pos[0]) * framebuffer_scale[0];
    let y2 = (clip_rect[3] - display_pos[1]) * framebuffer_scale[1];

    [
        x1 as i32,
        framebuffer_height - y2 as i32,
        (x2 - x1) as i32,
        (y2 - y1) as i32,
    ]
}

/// Draws UI frames with the session's GPU objects
pub struct DrawListRenderer {
    objects: UiDeviceObjects,
}

impl DrawListRenderer {
    /// Create all GPU objects and upload the font atlas
    ///
    /// # Errors
    /// See [`UiDeviceObjects::create`].
    pub fn new(gl: Rc<dyn GlDevice>, font: &FontAtlasImage<'_>) -> Result<Self, UiError> {
        Ok(Self {
            objects: UiDeviceObjects::create(gl, font)?,
        })
    }

    /// GPU objects used for drawing
    pub fn objects(&self) -> &UiDeviceObjects {
        &self.objects
    }

    fn setup_render_state(
        &self,
        display_pos: [f32; 2],
        display_size: [f32; 2],
        fb_width: i32,
        fb_height: i32,
    ) {
        let gl = self.objects.gl().as_ref();
        gl.enable(glow::BLEND);
        gl.blend_equation(glow::FUNC_ADD);
        gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
        gl.disable(glow::CULL_FACE);
        gl.disable(glow::DEPTH_TEST);
        gl.enable(glow::SCISSOR_TEST);
        gl.active_texture(glow::TEXTURE0);
        gl.viewport(0, 0, fb_width, fb_height);

        let locations = self.objects.locations();
        if let Some(shader) = self.objects.shader() {
            shader.use_program();
        }
        gl.uniform_1_i32(locations.texture, 0);
        gl.uniform_matrix4(
            locations.proj_mtx,
            &ortho_projection(display_pos, display_size),
        );
        gl.bind_vertex_array(self.objects.vao());
    }

    /// Draw one frame, leaving the caller's GL state as it was
    ///
    /// Frames with an empty framebuffer (e.g. a minimised window) are
    /// skipped.
    pub fn render(&mut self, frame: DrawFrame<'_>) {
        let (fb_width, fb_height) = frame.framebuffer_size();
        if fb_width <= 0 || fb_height <= 0 {
            return;
        }

        let DrawFrame {
            display_pos,
            display_size,
            framebuffer_scale,
            lists,
        } = frame;

        let gl = Rc::clone(self.objects.gl());
        let saved = GlStateSnapshot::capture(gl.as_ref());
        self.setup_render_state(display_pos, display_size, fb_width, fb_height);

        for list in lists {
            gl.bind_buffer(glow::ARRAY_BUFFER, self.objects.vbo());
            gl.buffer_data(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(list.vertices),
                glow::STREAM_DRAW,
            );
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, self.objects.ebo());
            gl.buffer_data(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(list.indices),
                glow::STREAM_DRAW,
            );

            let mut index_offset = 0;
            for command in list.commands {
                match command {
                    DrawCommand::Elements {
                        count,
                        clip_rect,
                        texture,
                    } => {
                        let [x, y, width, height] =
                            scissor_rect(clip_rect, display_pos, framebuffer_scale, fb_height);
                        gl.bind_texture(glow::TEXTURE_2D, texture as GlHandle);
                        gl.scissor(x, y, width, height);
                        gl.draw_elements(
                            glow::TRIANGLES,
                            count as i32,
                            glow::UNSIGNED_SHORT,
                            (index_offset * size_of::<DrawIndex>()) as i32,
                        );
                        index_offset += count;
                    }
                    DrawCommand::ResetRenderState => {
                        self.setup_render_state(display_pos, display_size, fb_width, fb_height);
                    }
                    DrawCommand::Callback(mut callback) => callback(),
                }
            }
        }

        saved.restore(gl.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeGl;
    use crate::ui::draw::{DrawListView, DrawVertex};
    use approx::assert_relative_eq;

    const PIXELS: [u8; 4] = [255; 4];

    fn renderer(gl: &Rc<FakeGl>) -> DrawListRenderer {
        let font = FontAtlasImage {
            width: 1,
            height: 1,
            pixels: &PIXELS,
        };
        DrawListRenderer::new(gl.clone(), &font).unwrap()
    }

    /// Arbitrary caller state that differs from the overlay state everywhere
    fn seed_caller_state(gl: &FakeGl) {
        gl.use_program(901);
        gl.active_texture(glow::TEXTURE0);
        gl.bind_texture(glow::TEXTURE_2D, 42);
        gl.active_texture(glow::TEXTURE0 + 3);
        gl.bind_texture(glow::TEXTURE_2D, 43);
        gl.bind_buffer(glow::ARRAY_BUFFER, 902);
        gl.bind_vertex_array(903);
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, 904);
        gl.blend_equation_separate(glow::FUNC_SUBTRACT, glow::MAX);
        gl.blend_func_separate(glow::ONE, glow::ZERO, glow::DST_COLOR, glow::SRC_COLOR);
        gl.disable(glow::BLEND);
        gl.enable(glow::CULL_FACE);
        gl.enable(glow::DEPTH_TEST);
        gl.disable(glow::SCISSOR_TEST);
        gl.viewport(5, 6, 700, 800);
        gl.scissor(1, 2, 3, 4);
    }

    fn quad() -> ([DrawVertex; 4], [DrawIndex; 12]) {
        let vertex = DrawVertex {
            pos: [0.0, 0.0],
            uv: [0.0, 0.0],
            col: [255; 4],
        };
        ([vertex; 4], [0, 1, 2, 0, 2, 3, 0, 1, 2, 0, 2, 3])
    }

    fn frame<'a>(
        vertices: &'a [DrawVertex],
        indices: &'a [DrawIndex],
        commands: Vec<DrawCommand<'a>>,
    ) -> DrawFrame<'a> {
        DrawFrame {
            display_pos: [0.0, 0.0],
            display_size: [1024.0, 576.0],
            framebuffer_scale: [2.0, 2.0],
            lists: vec![DrawListView {
                vertices,
                indices,
                commands,
            }],
        }
    }

    #[test]
    fn test_full_framebuffer_scissor() {
        assert_eq!(
            scissor_rect([0.0, 0.0, 1024.0, 576.0], [0.0, 0.0], [2.0, 2.0], 1152),
            [0, 0, 2048, 1152]
        );
        assert_eq!(
            scissor_rect([0.0, 0.0, 800.0, 600.0], [0.0, 0.0], [1.0, 1.0], 600),
            [0, 0, 800, 600]
        );
    }

    #[test]
    fn test_scissor_flips_y_axis() {
        // 100x50 box whose top-left is at (10, 20) on a 600 pixel high target.
        assert_eq!(
            scissor_rect([10.0, 20.0, 110.0, 70.0], [0.0, 0.0], [1.0, 1.0], 600),
            [10, 530, 100, 50]
        );
        // Display origin is subtracted before scaling.
        assert_eq!(
            scissor_rect([110.0, 220.0, 160.0, 245.0], [100.0, 200.0], [2.0, 2.0], 400),
            [20, 310, 100, 50]
        );
    }

    #[test]
    fn test_ortho_projection_maps_corners() {
        let m = ortho_projection([0.0, 0.0], [1024.0, 576.0]);
        let project = |x: f32, y: f32| [m[0] * x + m[12], m[5] * y + m[13]];

        let top_left = project(0.0, 0.0);
        assert_relative_eq!(top_left[0], -1.0);
        assert_relative_eq!(top_left[1], 1.0);

        let bottom_right = project(1024.0, 576.0);
        assert_relative_eq!(bottom_right[0], 1.0);
        assert_relative_eq!(bottom_right[1], -1.0);
        assert_relative_eq!(m[10], -1.0);
        assert_relative_eq!(m[15], 1.0);
    }

    #[test]
    fn test_ortho_projection_with_display_offset() {
        let m = ortho_projection([100.0, 50.0], [200.0, 100.0]);
        assert_relative_eq!(m[0] * 100.0 + m[12], -1.0);
        assert_relative_eq!(m[5] * 50.0 + m[13], 1.0);
        assert_relative_eq!(m[0] * 300.0 + m[12], 1.0);
        assert_relative_eq!(m[5] * 150.0 + m[13], -1.0);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let gl = FakeGl::new();
        seed_caller_state(&gl);
        let before = GlStateSnapshot::capture(&gl);

        gl.use_program(0);
        gl.bind_vertex_array(0);
        gl.enable(glow::SCISSOR_TEST);
        gl.viewport(0, 0, 1, 1);
        before.restore(&gl);

        assert_eq!(GlStateSnapshot::capture(&gl), before);
    }

    #[test]
    fn test_render_preserves_caller_state() {
        let gl = Rc::new(FakeGl::new());
        let mut renderer = renderer(&gl);
        seed_caller_state(&gl);
        let before = GlStateSnapshot::capture(gl.as_ref());

        let (vertices, indices) = quad();
        let font = renderer.objects().font_texture() as usize;
        renderer.render(frame(
            &vertices,
            &indices,
            vec![
                DrawCommand::Elements {
                    count: 6,
                    clip_rect: [0.0, 0.0, 1024.0, 576.0],
                    texture: font,
                },
                DrawCommand::ResetRenderState,
                DrawCommand::Elements {
                    count: 6,
                    clip_rect: [10.0, 10.0, 20.0, 20.0],
                    texture: 7,
                },
            ],
        ));

        assert_eq!(gl.draws().len(), 2);
        assert_eq!(GlStateSnapshot::capture(gl.as_ref()), before);
        assert_eq!(gl.get_integer(glow::TEXTURE_BINDING_2D), 43);
    }

    #[test]
    fn test_render_issues_draws_with_advancing_offsets() {
        let gl = Rc::new(FakeGl::new());
        let mut renderer = renderer(&gl);
        let program = renderer.objects().shader().unwrap().handle();
        let vao = renderer.objects().vao();

        let (vertices, indices) = quad();
        renderer.render(frame(
            &vertices,
            &indices,
            vec![
                DrawCommand::Elements {
                    count: 6,
                    clip_rect: [0.0, 0.0, 1024.0, 576.0],
                    texture: 11,
                },
                DrawCommand::Elements {
                    count: 6,
                    clip_rect: [10.0, 20.0, 110.0, 70.0],
                    texture: 12,
                },
            ],
        ));

        let draws = gl.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].offset, 0);
        assert_eq!(draws[1].offset, 12);
        assert_eq!(draws[0].element_type, glow::UNSIGNED_SHORT);
        assert_eq!(draws[0].texture, 11);
        assert_eq!(draws[1].texture, 12);
        assert_eq!(draws[0].scissor, [0, 0, 2048, 1152]);
        assert_eq!(draws[1].scissor, [20, 1152 - 140, 200, 100]);
        assert!(draws.iter().all(|d| d.program == program && d.vertex_array == vao));

        assert_eq!(
            gl.uploads(),
            vec![
                (glow::ARRAY_BUFFER, 4 * DrawVertex::STRIDE as usize),
                (glow::ELEMENT_ARRAY_BUFFER, 12 * size_of::<DrawIndex>()),
            ]
        );
        let projection = gl.uniform(renderer.objects().locations().proj_mtx.unwrap()).unwrap();
        assert_relative_eq!(projection[0], 2.0 / 1024.0);
    }

    #[test]
    fn test_callback_replaces_draw() {
        let gl = Rc::new(FakeGl::new());
        let mut renderer = renderer(&gl);
        let mut calls = 0;

        let (vertices, indices) = quad();
        renderer.render(frame(
            &vertices,
            &indices,
            vec![
                DrawCommand::Callback(Box::new(|| calls += 1)),
                DrawCommand::Elements {
                    count: 3,
                    clip_rect: [0.0, 0.0, 1.0, 1.0],
                    texture: 1,
                },
            ],
        ));

        assert_eq!(calls, 1);
        let draws = gl.draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].offset, 0);
    }

    #[test]
    fn test_empty_framebuffer_is_skipped() {
        let gl = Rc::new(FakeGl::new());
        let mut renderer = renderer(&gl);
        let (vertices, indices) = quad();
        let mut minimized = frame(
            &vertices,
            &indices,
            vec![DrawCommand::Elements {
                count: 6,
                clip_rect: [0.0, 0.0, 1.0, 1.0],
                texture: 1,
            }],
        );
        minimized.display_size = [0.0, 0.0];
        gl.clear_log();

        renderer.render(minimized);

        assert!(gl.draws().is_empty());
        assert!(gl.uploads().is_empty());
        assert!(gl.log().is_empty());
    }

    #[test]
    fn test_unlinked_shader_degrades_without_panicking() {
        let gl = Rc::new(FakeGl::new());
        gl.fail_program_link(true);
        let mut renderer = renderer(&gl);
        seed_caller_state(&gl);
        let before = GlStateSnapshot::capture(gl.as_ref());

        let (vertices, indices) = quad();
        renderer.render(frame(
            &vertices,
            &indices,
            vec![DrawCommand::Elements {
                count: 6,
                clip_rect: [0.0, 0.0, 1024.0, 576.0],
                texture: 1,
            }],
        ));

        assert_eq!(GlStateSnapshot::capture(gl.as_ref()), before);
    }
}

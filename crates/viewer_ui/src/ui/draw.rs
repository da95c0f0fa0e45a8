//! Toolkit-neutral view of one finished UI frame
//!
//! The renderer consumes [`DrawFrame`]s rather than imgui's draw data
//! directly. Vertex and index slices borrow the toolkit's buffers; nothing is
//! copied on conversion.

use std::mem::{align_of, size_of};

use bytemuck::{Pod, Zeroable};

/// Interleaved UI vertex: position, texture coordinate, packed RGBA colour
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DrawVertex {
    /// Position in logical display coordinates
    pub pos: [f32; 2],
    /// Font atlas / texture coordinate
    pub uv: [f32; 2],
    /// RGBA, one byte per channel
    pub col: [u8; 4],
}

impl DrawVertex {
    /// Byte stride of one vertex
    pub const STRIDE: i32 = size_of::<Self>() as i32;
    /// Byte offset of [`pos`](Self::pos)
    pub const POS_OFFSET: i32 = 0;
    /// Byte offset of [`uv`](Self::uv)
    pub const UV_OFFSET: i32 = 8;
    /// Byte offset of [`col`](Self::col)
    pub const COL_OFFSET: i32 = 16;
}

/// UI index type
pub type DrawIndex = u16;

// `DrawVertex` must be layout compatible with the toolkit's vertex for the
// zero-copy conversion below.
const _: () = {
    assert!(size_of::<DrawVertex>() == size_of::<imgui::DrawVert>());
    assert!(align_of::<DrawVertex>() == align_of::<imgui::DrawVert>());
    assert!(size_of::<DrawIndex>() == size_of::<imgui::DrawIdx>());
    assert!(DrawVertex::STRIDE == 20);
};

/// One command of a draw list
pub enum DrawCommand<'a> {
    /// Draw `count` indices with `texture`, clipped to `clip_rect`
    Elements {
        /// Number of indices
        count: usize,
        /// `[x1, y1, x2, y2]` in logical display coordinates
        clip_rect: [f32; 4],
        /// GL texture name
        texture: usize,
    },
    /// Re-apply the overlay render state
    ResetRenderState,
    /// Opaque user callback, invoked with whatever it captured
    Callback(Box<dyn FnMut() + 'a>),
}

impl std::fmt::Debug for DrawCommand<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Elements {
                count,
                clip_rect,
                texture,
            } => f
                .debug_struct("Elements")
                .field("count", count)
                .field("clip_rect", clip_rect)
                .field("texture", texture)
                .finish(),
            Self::ResetRenderState => f.write_str("ResetRenderState"),
            Self::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// Vertices, indices and commands of one draw list
#[derive(Debug)]
pub struct DrawListView<'a> {
    /// Vertex buffer
    pub vertices: &'a [DrawVertex],
    /// Index buffer
    pub indices: &'a [DrawIndex],
    /// Commands in submission order
    pub commands: Vec<DrawCommand<'a>>,
}

/// One finished UI frame
#[derive(Debug)]
pub struct DrawFrame<'a> {
    /// Top-left of the display in logical coordinates
    pub display_pos: [f32; 2],
    /// Logical display size
    pub display_size: [f32; 2],
    /// Pixels per logical unit
    pub framebuffer_scale: [f32; 2],
    /// Draw lists, back to front
    pub lists: Vec<DrawListView<'a>>,
}

impl DrawFrame<'_> {
    /// Framebuffer size in pixels implied by display size and scale
    pub fn framebuffer_size(&self) -> (i32, i32) {
        (
            (self.display_size[0] * self.framebuffer_scale[0]) as i32,
            (self.display_size[1] * self.framebuffer_scale[1]) as i32,
        )
    }
}

impl<'a> DrawFrame<'a> {
    /// Borrow imgui's draw data
    pub fn from_imgui(draw_data: &'a imgui::DrawData) -> Self {
        Self {
            display_pos: draw_data.display_pos,
            display_size: draw_data.display_size,
            framebuffer_scale: draw_data.framebuffer_scale,
            lists: draw_data.draw_lists().map(list_from_imgui).collect(),
        }
    }
}

fn list_from_imgui(list: &imgui::DrawList) -> DrawListView<'_> {
    let vtx = list.vtx_buffer();
    // SAFETY: layout equality is asserted at compile time above, and the
    // slice keeps the borrow of `list`.
    #[allow(unsafe_code)]
    let vertices =
        unsafe { std::slice::from_raw_parts(vtx.as_ptr().cast::<DrawVertex>(), vtx.len()) };
    let raw_list: *const imgui::sys::ImDrawList = (list as *const imgui::DrawList).cast();

    let commands = list
        .commands()
        .map(|command| match command {
            imgui::DrawCmd::Elements { count, cmd_params } => DrawCommand::Elements {
                count,
                clip_rect: cmd_params.clip_rect,
                texture: cmd_params.texture_id.id(),
            },
            imgui::DrawCmd::ResetRenderState => DrawCommand::ResetRenderState,
            imgui::DrawCmd::RawCallback { callback, raw_cmd } => {
                // SAFETY: both pointers come from the draw list being
                // rendered, which outlives the returned view.
                #[allow(unsafe_code)]
                let invoke = move || unsafe { callback(raw_list, raw_cmd) };
                DrawCommand::Callback(Box::new(invoke))
            }
        })
        .collect();

    DrawListView {
        vertices,
        indices: list.idx_buffer(),
        commands,
    }
}

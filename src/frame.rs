//! Per-frame command recording.
//!
//! The scenes are written against an immediate-mode model: bind a program, set
//! a uniform, draw, set the uniform again, draw again. wgpu only sees buffers
//! once the whole frame is encoded, so a [`Frame`] captures that stream
//! instead. Every draw copies its geometry into the frame's vertex and index
//! arenas and snapshots the issuing program's [`UniformBlock`] into its own
//! slot, which makes per-draw uniform changes behave as they would on GL.
//!
//! # Key types
//!
//! - [`Frame`] is the ordered recording handed to
//!   [`GraphicsDevice::present`](crate::backend::GraphicsDevice::present)
//! - [`DrawCall`] is one indexed draw with the state it was issued under
//! - [`UniformBlock`] is the 256 byte uniform storage of one program

use std::ops::Range;

use crate::{
    backend::{ProgramId, TextureId},
    data_structures::model::{ColoredVertex, Index, Vertex},
};

/// Number of `f32`s in a [`UniformBlock`].
pub const UNIFORM_FLOATS: usize = 64;

/// CPU copy of a program's uniform struct. 256 bytes, which is also the
/// stride between per-draw slots in the uniform buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UniformBlock(pub [f32; UNIFORM_FLOATS]);

impl UniformBlock {
    pub const SIZE: u64 = (UNIFORM_FLOATS * std::mem::size_of::<f32>()) as u64;

    /// Writes `values` at the given byte offset.
    pub fn write(&mut self, byte_offset: u32, values: &[f32]) {
        let start = byte_offset as usize / std::mem::size_of::<f32>();
        let end = start + values.len();
        if end > UNIFORM_FLOATS {
            log::error!(
                "uniform write of {} floats at byte {} overflows the block",
                values.len(),
                byte_offset
            );
            return;
        }
        self.0[start..end].copy_from_slice(values);
    }

    pub fn read(&self, byte_offset: u32, len: usize) -> &[f32] {
        let start = (byte_offset as usize / std::mem::size_of::<f32>()).min(UNIFORM_FLOATS);
        &self.0[start..(start + len).min(UNIFORM_FLOATS)]
    }
}

impl Default for UniformBlock {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Topology {
    #[default]
    Triangles,
    Lines,
}

/// Which vertex arena a draw reads from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VertexKind {
    Textured,
    Colored,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub program: ProgramId,
    pub kind: VertexKind,
    pub topology: Topology,
    pub depth_test: bool,
    /// Index into [`Frame::uniforms`].
    pub uniform_slot: usize,
    /// Only meaningful for textured draws; `None` binds the blank texture.
    pub texture: Option<TextureId>,
    /// Offset of the draw's first vertex inside its arena.
    pub base_vertex: i32,
    /// Range inside [`Frame::indices`].
    pub indices: Range<u32>,
}

/// One recorded frame. Clears always apply at the start of the frame.
#[derive(Clone, Debug)]
pub struct Frame {
    clear_color: bool,
    clear_depth: bool,
    depth_test: bool,
    active_program: Option<ProgramId>,
    textured_vertices: Vec<Vertex>,
    colored_vertices: Vec<ColoredVertex>,
    indices: Vec<Index>,
    uniforms: Vec<UniformBlock>,
    draws: Vec<DrawCall>,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    pub fn new() -> Self {
        Self {
            clear_color: false,
            clear_depth: false,
            depth_test: true,
            active_program: None,
            textured_vertices: Vec::new(),
            colored_vertices: Vec::new(),
            indices: Vec::new(),
            uniforms: Vec::new(),
            draws: Vec::new(),
        }
    }

    pub fn clear(&mut self, color: bool, depth: bool) {
        if !self.draws.is_empty() {
            log::warn!("clear requested after {} draws; it applies to the whole frame", self.draws.len());
        }
        self.clear_color |= color;
        self.clear_depth |= depth;
    }

    pub fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    pub fn use_program(&mut self, program: ProgramId) {
        self.active_program = Some(program);
    }

    pub fn active_program(&self) -> Option<ProgramId> {
        self.active_program
    }

    pub fn clears_color(&self) -> bool {
        self.clear_color
    }

    pub fn clears_depth(&self) -> bool {
        self.clear_depth
    }

    pub fn depth_test(&self) -> bool {
        self.depth_test
    }

    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    pub fn uniforms(&self) -> &[UniformBlock] {
        &self.uniforms
    }

    pub fn textured_vertices(&self) -> &[Vertex] {
        &self.textured_vertices
    }

    pub fn colored_vertices(&self) -> &[ColoredVertex] {
        &self.colored_vertices
    }

    pub fn indices(&self) -> &[Index] {
        &self.indices
    }

    /// Vertices of a textured draw, in the order they were recorded.
    pub fn textured_vertices_of(&self, draw: &DrawCall) -> &[Vertex] {
        let end = self.draw_vertex_end(draw);
        &self.textured_vertices[draw.base_vertex as usize..end.min(self.textured_vertices.len())]
    }

    pub fn colored_vertices_of(&self, draw: &DrawCall) -> &[ColoredVertex] {
        let end = self.draw_vertex_end(draw);
        &self.colored_vertices[draw.base_vertex as usize..end.min(self.colored_vertices.len())]
    }

    fn draw_vertex_end(&self, draw: &DrawCall) -> usize {
        let indices = &self.indices[draw.indices.start as usize..draw.indices.end as usize];
        let highest = indices.iter().copied().max().map_or(0, |i| i as usize + 1);
        draw.base_vertex as usize + highest
    }

    pub(crate) fn record_textured(
        &mut self,
        program: ProgramId,
        uniforms: &UniformBlock,
        vertices: &[Vertex],
        indices: &[Index],
        texture: Option<TextureId>,
    ) -> bool {
        if !validate(indices, vertices.len()) {
            return false;
        }
        let base_vertex = self.textured_vertices.len() as i32;
        self.textured_vertices.extend_from_slice(vertices);
        self.push_draw(
            program,
            VertexKind::Textured,
            Topology::Triangles,
            uniforms,
            texture,
            base_vertex,
            indices,
        );
        true
    }

    pub(crate) fn record_colored(
        &mut self,
        program: ProgramId,
        uniforms: &UniformBlock,
        vertices: &[ColoredVertex],
        indices: &[Index],
        topology: Topology,
    ) -> bool {
        if !validate(indices, vertices.len()) {
            return false;
        }
        let base_vertex = self.colored_vertices.len() as i32;
        self.colored_vertices.extend_from_slice(vertices);
        self.push_draw(
            program,
            VertexKind::Colored,
            topology,
            uniforms,
            None,
            base_vertex,
            indices,
        );
        true
    }

    #[allow(clippy::too_many_arguments)]
    fn push_draw(
        &mut self,
        program: ProgramId,
        kind: VertexKind,
        topology: Topology,
        uniforms: &UniformBlock,
        texture: Option<TextureId>,
        base_vertex: i32,
        indices: &[Index],
    ) {
        if self.active_program != Some(program) {
            log::debug!("draw issued by program {:?} while {:?} is bound", program, self.active_program);
        }
        let first = self.indices.len() as u32;
        self.indices.extend_from_slice(indices);
        let uniform_slot = match self.uniforms.last() {
            Some(last) if last == uniforms => self.uniforms.len() - 1,
            _ => {
                self.uniforms.push(*uniforms);
                self.uniforms.len() - 1
            }
        };
        self.draws.push(DrawCall {
            program,
            kind,
            topology,
            depth_test: self.depth_test,
            uniform_slot,
            texture,
            base_vertex,
            indices: first..first + indices.len() as u32,
        });
    }
}

fn validate(indices: &[Index], vertex_count: usize) -> bool {
    if indices.is_empty() {
        return false;
    }
    match indices.iter().find(|&&i| i as usize >= vertex_count) {
        Some(bad) => {
            log::error!("index {} out of range for {} vertices; draw dropped", bad, vertex_count);
            false
        }
        None => true,
    }
}

//! Vertex formats and the mesh containers the scenes are built from.

use crate::backend::TextureId;

/// 16-bit index into a vertex slice. Triples form triangles, pairs form lines.
pub type Index = u16;

/// Interleaved position + texture coordinate, 20 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }

    /// Attribute list for the given shader locations of `position` and `uv`.
    pub fn attributes(position: u32, uv: u32) -> [wgpu::VertexAttribute; 2] {
        [
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: position,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                shader_location: uv,
                format: wgpu::VertexFormat::Float32x2,
            },
        ]
    }
}

/// Interleaved position + RGBA color, 28 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColoredVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl ColoredVertex {
    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    pub fn attributes(position: u32, color: u32) -> [wgpu::VertexAttribute; 2] {
        [
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: position,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                shader_location: color,
                format: wgpu::VertexFormat::Float32x4,
            },
        ]
    }
}

/// Builds a vertex buffer layout with `V`'s stride around `attributes`.
pub fn vertex_layout<V>(attributes: &[wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'_> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<V>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}

/// A textured mesh. Owns its geometry; the texture handle is shared with
/// whoever loaded it and may be `None` when the load failed.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<Index>,
    pub texture: Option<TextureId>,
}

impl Model {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<Index>, texture: Option<TextureId>) -> Self {
        Self {
            vertices,
            indices,
            texture,
        }
    }
}

/// An untextured mesh drawn by the colored shader.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColoredMesh {
    pub vertices: Vec<ColoredVertex>,
    pub indices: Vec<Index>,
}

impl ColoredMesh {
    pub fn new(vertices: Vec<ColoredVertex>, indices: Vec<Index>) -> Self {
        Self { vertices, indices }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }
}

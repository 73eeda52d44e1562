//! Frame replay on wgpu.
//!
//! [`Gpu`] owns the device, the queue and every program and texture handed
//! out as a [`ProgramId`] or [`TextureId`]. [`Gpu::encode_frame`] turns a
//! recorded [`Frame`] into one render pass: all geometry goes into three
//! buffers, all uniform snapshots into one buffer addressed by dynamic offset,
//! and each draw call becomes a pipeline switch, two bind groups and one
//! indexed draw.
//!
//! # Key types
//!
//! - [`Gpu`] is the window-independent half of the backend, also usable headless
//! - [`FrameTarget`] names the attachments a frame is drawn into

use std::{collections::HashMap, num::NonZeroU64};

use anyhow::Context as _;
use wgpu::util::DeviceExt;

use crate::{
    backend::{PresentError, ProgramCompiler, ProgramId, TextureId, TextureLoader, Wrap},
    data_structures::texture::Texture,
    frame::{Frame, Topology, UniformBlock, VertexKind},
    pipelines::{ProgramPipelines, uniform_layout},
    resources::{
        AssetDir,
        texture::{load_texture, texture_bind_group, texture_layout},
    },
    shader::{ProgramDesc, ShaderError},
};

#[derive(Debug)]
struct BoundTexture {
    #[allow(unused)]
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// Attachments and load behavior for one encoded frame.
pub struct FrameTarget<'a> {
    pub color: &'a wgpu::TextureView,
    pub depth: &'a wgpu::TextureView,
    pub size: (u32, u32),
    pub clear_color: wgpu::Color,
    /// Clears depth even when the frame does not ask for it, used for a
    /// depth texture that has never been written.
    pub force_depth_clear: bool,
}

#[derive(Debug)]
pub struct Gpu {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub color_format: wgpu::TextureFormat,
    assets: AssetDir,
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    programs: HashMap<ProgramId, ProgramPipelines>,
    textures: HashMap<TextureId, BoundTexture>,
    blank: BoundTexture,
    next_program: u32,
    next_texture: u32,
}

impl Gpu {
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        color_format: wgpu::TextureFormat,
        assets: AssetDir,
    ) -> anyhow::Result<Self> {
        let uniform_layout = uniform_layout(&device);
        let texture_layout = texture_layout(&device);
        let blank = Texture::create_blank(&device, &queue)?;
        let blank = BoundTexture {
            bind_group: texture_bind_group(&device, &texture_layout, &blank),
            texture: blank,
        };
        if !assets.exists() {
            log::warn!("Asset directory {} does not exist", assets.root().display());
        }
        Ok(Self {
            device,
            queue,
            color_format,
            assets,
            uniform_layout,
            texture_layout,
            programs: HashMap::new(),
            textures: HashMap::new(),
            blank,
            next_program: 1,
            next_texture: 1,
        })
    }

    /// A device without a surface, rendering into `color_format` targets.
    pub async fn headless(color_format: wgpu::TextureFormat, assets: AssetDir) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::new_without_display_handle());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .context("no graphics adapter available")?;
        log::info!("Headless adapter: {:?}", adapter.get_info());
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .context("requesting a device")?;
        Self::new(device, queue, color_format, assets)
    }

    pub fn assets(&self) -> &AssetDir {
        &self.assets
    }

    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn insert_texture(&mut self, texture: Texture) -> TextureId {
        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        let bind_group = texture_bind_group(&self.device, &self.texture_layout, &texture);
        self.textures.insert(id, BoundTexture { texture, bind_group });
        id
    }

    /// Runs `f` inside a validation error scope and reports what it caught.
    fn validated<T>(&self, f: impl FnOnce(&Self) -> T) -> (T, Option<wgpu::Error>) {
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = f(self);
        let error = futures::executor::block_on(scope.pop());
        (value, error)
    }

    /// Records `frame` into a command buffer drawing into `target`.
    pub fn encode_frame(
        &mut self,
        frame: &Frame,
        target: &FrameTarget<'_>,
    ) -> Result<wgpu::CommandBuffer, PresentError> {
        for draw in frame.draws() {
            let program = self
                .programs
                .get_mut(&draw.program)
                .ok_or(PresentError::UnknownProgram(draw.program))?;
            program.prepare(&self.device, draw.topology, draw.depth_test);
        }

        let textured = vertex_buffer(&self.device, "textured vertices", frame.textured_vertices());
        let colored = vertex_buffer(&self.device, "colored vertices", frame.colored_vertices());
        let indices = (!frame.indices().is_empty()).then(|| {
            self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("indices"),
                contents: bytemuck::cast_slice(frame.indices()),
                usage: wgpu::BufferUsages::INDEX,
            })
        });
        let uniforms = (!frame.uniforms().is_empty()).then(|| {
            let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("uniform slots"),
                contents: bytemuck::cast_slice(frame.uniforms()),
                usage: wgpu::BufferUsages::UNIFORM,
            });
            self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &self.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &buffer,
                        offset: 0,
                        size: NonZeroU64::new(UniformBlock::SIZE),
                    }),
                }],
                label: Some("uniform_bind_group"),
            })
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        {
            let color_load = if frame.clears_color() {
                wgpu::LoadOp::Clear(target.clear_color)
            } else {
                wgpu::LoadOp::Load
            };
            let depth_load = if frame.clears_depth() || target.force_depth_clear {
                wgpu::LoadOp::Clear(1.0)
            } else {
                wgpu::LoadOp::Load
            };
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: target.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            let (width, height) = target.size;
            pass.set_viewport(0.0, 0.0, width.max(1) as f32, height.max(1) as f32, 0.0, 1.0);

            if let (Some(indices), Some(uniforms)) = (&indices, &uniforms) {
                pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint16);
                for draw in frame.draws() {
                    let Some(pipeline) = self
                        .programs
                        .get(&draw.program)
                        .and_then(|program| program.get(draw.topology, draw.depth_test))
                    else {
                        continue;
                    };
                    let vertices = match draw.kind {
                        VertexKind::Textured => textured.as_ref(),
                        VertexKind::Colored => colored.as_ref(),
                    };
                    let Some(vertices) = vertices else {
                        continue;
                    };
                    pass.set_pipeline(pipeline);
                    let offset = (draw.uniform_slot as u64 * UniformBlock::SIZE) as u32;
                    pass.set_bind_group(0, uniforms, &[offset]);
                    if draw.kind == VertexKind::Textured {
                        let bound = match draw.texture.and_then(|id| self.textures.get(&id)) {
                            Some(bound) => bound,
                            None => {
                                log::trace!("draw without a live texture, binding blank");
                                &self.blank
                            }
                        };
                        pass.set_bind_group(1, &bound.bind_group, &[]);
                    }
                    pass.set_vertex_buffer(0, vertices.slice(..));
                    pass.draw_indexed(draw.indices.clone(), draw.base_vertex, 0..1);
                }
            }
        }
        Ok(encoder.finish())
    }
}

fn vertex_buffer<V: bytemuck::Pod>(
    device: &wgpu::Device,
    label: &str,
    vertices: &[V],
) -> Option<wgpu::Buffer> {
    (!vertices.is_empty()).then(|| {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        })
    })
}

impl ProgramCompiler for Gpu {
    fn compile_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId, ShaderError> {
        let (program, error) = self.validated(|gpu| {
            let mut program = ProgramPipelines::new(
                &gpu.device,
                desc,
                gpu.color_format,
                &gpu.uniform_layout,
                &gpu.texture_layout,
            );
            // building the default variant validates both stages against the layout
            program.prepare(&gpu.device, Topology::Triangles, true);
            program
        });
        if let Some(error) = error {
            log::error!("Could not compile program `{}`:\n{}", desc.label, error);
            return Err(ShaderError::Compile {
                program: desc.label.to_string(),
                log: error.to_string(),
            });
        }
        let id = ProgramId(self.next_program);
        self.next_program += 1;
        log::info!("Compiled program `{}` as {:?}", program.label(), id);
        self.programs.insert(id, program);
        Ok(id)
    }

    fn delete_program(&mut self, program: ProgramId) {
        if self.programs.remove(&program).is_none() {
            log::warn!("Deleting unknown program {:?}", program);
        }
    }
}

impl TextureLoader for Gpu {
    fn load_texture(&mut self, name: &str) -> anyhow::Result<TextureId> {
        let texture = load_texture(&self.assets, name, &self.device, &self.queue, Wrap::Repeat)?;
        let id = self.insert_texture(texture);
        log::debug!("Loaded {} as {}", name, id);
        Ok(id)
    }

    fn create_texture_rgba(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
        wrap: Wrap,
    ) -> anyhow::Result<TextureId> {
        let texture = Texture::from_rgba(
            &self.device,
            &self.queue,
            width,
            height,
            pixels,
            Some("rgba texture"),
            wrap,
        )?;
        Ok(self.insert_texture(texture))
    }

    fn delete_texture(&mut self, texture: TextureId) {
        if self.textures.remove(&texture).is_none() {
            log::warn!("Deleting unknown {}", texture);
        }
    }

    fn assets_available(&self) -> bool {
        self.assets.exists()
    }
}

//! Render pipelines of the compiled programs.
//!
//! A program is one WGSL module with `vs_main`/`fs_main` entry points. The
//! pipeline state a GL program would switch at runtime (primitive topology and
//! the depth test) is baked into wgpu pipelines, so every program keeps one
//! pipeline per `(Topology, depth_test)` pair it has been drawn with.

use std::collections::HashMap;

use crate::{
    data_structures::{
        model::{ColoredVertex, Vertex, vertex_layout},
        texture::DepthTexture,
    },
    frame::Topology,
    shader::{ProgramDesc, ProgramKind},
};

/// Group 0 of every program: the uniform block at a per-draw dynamic offset.
pub fn uniform_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("uniform_bind_group_layout"),
    })
}

/// One compiled program and the pipeline variants built from it so far.
#[derive(Debug)]
pub struct ProgramPipelines {
    pub kind: ProgramKind,
    label: String,
    module: wgpu::ShaderModule,
    layout: wgpu::PipelineLayout,
    attribute_locations: [u32; 2],
    color_format: wgpu::TextureFormat,
    pipelines: HashMap<(Topology, bool), wgpu::RenderPipeline>,
}

impl ProgramPipelines {
    /// Creates the shader module and the pipeline layout. No pipeline is
    /// built until [`prepare`](Self::prepare) is called.
    pub fn new(
        device: &wgpu::Device,
        desc: &ProgramDesc<'_>,
        color_format: wgpu::TextureFormat,
        uniform_layout: &wgpu::BindGroupLayout,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(desc.source.into()),
        });
        let all_layouts = [Some(uniform_layout), Some(texture_layout)];
        let bind_group_layouts = match desc.kind {
            ProgramKind::Textured => &all_layouts[..],
            ProgramKind::Colored => &all_layouts[..1],
        };
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts,
            immediate_size: 0,
        });

        Self {
            kind: desc.kind,
            label: desc.label.to_string(),
            module,
            layout,
            attribute_locations: desc.attribute_locations,
            color_format,
            pipelines: HashMap::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Builds the variant for `topology` and `depth_test` unless it exists.
    pub fn prepare(&mut self, device: &wgpu::Device, topology: Topology, depth_test: bool) {
        if self.pipelines.contains_key(&(topology, depth_test)) {
            return;
        }
        let [position, second] = self.attribute_locations;
        let pipeline = match self.kind {
            ProgramKind::Textured => {
                let attributes = Vertex::attributes(position, second);
                self.build(device, topology, depth_test, &[vertex_layout::<Vertex>(&attributes)])
            }
            ProgramKind::Colored => {
                let attributes = ColoredVertex::attributes(position, second);
                self.build(
                    device,
                    topology,
                    depth_test,
                    &[vertex_layout::<ColoredVertex>(&attributes)],
                )
            }
        };
        log::debug!(
            "Built pipeline `{}` ({:?}, depth test {})",
            self.label,
            topology,
            depth_test
        );
        self.pipelines.insert((topology, depth_test), pipeline);
    }

    pub fn get(&self, topology: Topology, depth_test: bool) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(&(topology, depth_test))
    }

    pub fn variant_count(&self) -> usize {
        self.pipelines.len()
    }

    fn build(
        &self,
        device: &wgpu::Device,
        topology: Topology,
        depth_test: bool,
        vertex_layouts: &[wgpu::VertexBufferLayout],
    ) -> wgpu::RenderPipeline {
        mk_render_pipeline(
            device,
            &self.layout,
            self.color_format,
            Some(wgpu::BlendState::ALPHA_BLENDING),
            Some(DepthTexture::FORMAT),
            depth_test,
            topology,
            vertex_layouts,
            &self.module,
            &self.label,
        )
    }
}

#[allow(clippy::too_many_arguments)]
pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_format: Option<wgpu::TextureFormat>,
    depth_test: bool,
    topology: Topology,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: &wgpu::ShaderModule,
    label: &str,
) -> wgpu::RenderPipeline {
    let topology = match topology {
        Topology::Triangles => wgpu::PrimitiveTopology::TriangleList,
        Topology::Lines => wgpu::PrimitiveTopology::LineList,
    };
    // with the test off, depth is neither compared nor written
    let (depth_write, depth_compare) = if depth_test {
        (true, wgpu::CompareFunction::LessEqual)
    } else {
        (false, wgpu::CompareFunction::Always)
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // several examples show both sides of a face
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: Some(depth_write),
            depth_compare: Some(depth_compare),
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
    })
}

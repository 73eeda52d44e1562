#![cfg(feature = "integration-tests")]

use genesis_v::{
    Frame, ProgramCompiler, TextureLoader, Wrap,
    data_structures::{model::ColoredVertex, texture::DepthTexture},
    frame::Topology,
    math,
    render::{FrameTarget, Gpu},
    resources::AssetDir,
    shader::{COLORED_WGSL, ColorShader, ShaderError, TEXTURED_WGSL, TexturedShader},
};

fn gpu() -> Gpu {
    futures::executor::block_on(Gpu::headless(
        wgpu::TextureFormat::Rgba8Unorm,
        AssetDir::new("assets"),
    ))
    .expect("a headless adapter")
}

#[test]
fn both_programs_compile() {
    let mut gpu = gpu();
    let textured =
        TexturedShader::load(&mut gpu, TEXTURED_WGSL, "in_position", "in_uv", "u_projection").unwrap();
    let colored = ColorShader::load(&mut gpu, COLORED_WGSL).unwrap();
    assert_eq!(gpu.program_count(), 2);

    textured.destroy(&mut gpu);
    colored.destroy(&mut gpu);
    assert_eq!(gpu.program_count(), 0);
}

#[test]
fn invalid_wgsl_reports_the_compiler_log() {
    let mut gpu = gpu();
    let broken = COLORED_WGSL.replace("fn vs_main", "fn vs_main_missing");
    let err = ColorShader::load(&mut gpu, &broken).err().unwrap();
    assert!(matches!(err, ShaderError::Compile { .. }));
    assert_eq!(gpu.program_count(), 0);
}

#[test]
fn a_recorded_frame_encodes() {
    let mut gpu = gpu();
    let mut colored = ColorShader::load(&mut gpu, COLORED_WGSL).unwrap();
    let label = gpu.create_texture_rgba(1, 1, &[255; 4], Wrap::ClampToEdge).unwrap();

    let mut frame = Frame::new();
    frame.clear(true, true);
    colored.activate(&mut frame);
    colored.set_mvp(&math::identity());
    let red = [1.0, 0.0, 0.0, 1.0];
    let triangle = [
        ColoredVertex::new([0.0, 0.5, 0.0], red),
        ColoredVertex::new([-0.5, -0.5, 0.0], red),
        ColoredVertex::new([0.5, -0.5, 0.0], red),
    ];
    colored.draw(&mut frame, &triangle, &[0, 1, 2], Topology::Triangles);
    frame.set_depth_test(false);
    colored.draw(&mut frame, &triangle, &[0, 1, 1, 2, 2, 0], Topology::Lines);

    let size = wgpu::Extent3d {
        width: 64,
        height: 64,
        depth_or_array_layers: 1,
    };
    let target = gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("target"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let color = target.create_view(&wgpu::TextureViewDescriptor::default());
    let depth = DepthTexture::new(&gpu.device, [64, 64], "depth");
    assert_eq!(depth.size(), [64, 64]);

    let commands = gpu
        .encode_frame(
            &frame,
            &FrameTarget {
                color: &color,
                depth: &depth.view,
                size: (64, 64),
                clear_color: wgpu::Color::BLACK,
                force_depth_clear: true,
            },
        )
        .unwrap();
    gpu.queue.submit(std::iter::once(commands));

    gpu.delete_texture(label);
    assert_eq!(gpu.texture_count(), 0);
}

#[test]
fn zero_sized_depth_buffer_is_clamped() {
    let gpu = gpu();
    let depth = DepthTexture::new(&gpu.device, [0, 0], "depth");
    assert_eq!(depth.size(), [1, 1]);
    assert_eq!(depth.texture.format(), DepthTexture::FORMAT);
    assert_eq!(depth.texture.usage(), wgpu::TextureUsages::RENDER_ATTACHMENT);
}

mod common;

use common::test_utils::RecordingDevice;
use genesis_v::{
    frame::UniformBlock,
    shader::{COLORED_WGSL, ColorShader, ShaderError, TEXTURED_WGSL, TexturedShader},
};

const OVERSIZED_TEXTURED: &str = r#"
struct VertexInput {
    @location(0) in_position: vec3<f32>,
    @location(1) in_uv: vec2<f32>,
};

struct Uniforms {
    a: mat4x4<f32>,
    b: mat4x4<f32>,
    c: mat4x4<f32>,
    d: mat4x4<f32>,
    u_projection: mat4x4<f32>,
    u_tex_offset: vec2<f32>,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;
"#;

const OVERSIZED_COLORED: &str = r#"
struct VertexInput {
    @location(0) in_position: vec3<f32>,
    @location(1) in_color: vec4<f32>,
};

struct Uniforms {
    u_mvp: mat4x4<f32>,
    a: mat4x4<f32>,
    b: mat4x4<f32>,
    c: mat4x4<f32>,
    u_tint: vec4<f32>,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;
"#;

#[test]
fn bundled_programs_fit_a_uniform_slot() {
    let mut device = RecordingDevice::new(64, 64);
    let mut textured =
        TexturedShader::load(&mut device, TEXTURED_WGSL, "in_position", "in_uv", "u_projection").unwrap();
    let colored = ColorShader::load(&mut device, COLORED_WGSL).unwrap();

    let projection: [f32; 16] = std::array::from_fn(|i| i as f32);
    textured.set_projection_matrix(&projection);
    assert_eq!(textured.projection_matrix(), projection);

    textured.destroy(&mut device);
    colored.destroy(&mut device);
    assert!(device.live_programs.is_empty());
}

#[test]
fn oversized_uniform_block_is_rejected_before_compiling() {
    let mut device = RecordingDevice::new(64, 64);
    let err = TexturedShader::load(&mut device, OVERSIZED_TEXTURED, "in_position", "in_uv", "u_projection")
        .unwrap_err();
    match err {
        ShaderError::UniformBlockTooLarge { program, size, limit } => {
            assert_eq!(program, "textured");
            assert_eq!(size, 336);
            assert_eq!(limit, UniformBlock::SIZE);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(device.compiled.is_empty());
}

#[test]
fn oversized_color_uniforms_are_rejected() {
    let mut device = RecordingDevice::new(64, 64);
    let err = ColorShader::load(&mut device, OVERSIZED_COLORED).unwrap_err();
    assert!(matches!(err, ShaderError::UniformBlockTooLarge { ref program, .. } if program == "colored"));
    assert!(device.compiled.is_empty());
}

#[test]
fn out_of_range_uniform_reads_are_empty() {
    let block = UniformBlock::default();
    assert!(block.read(UniformBlock::SIZE as u32 + 64, 16).is_empty());
    assert_eq!(block.read(248, 16).len(), 2);
}

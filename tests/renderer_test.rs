mod common;

use std::{collections::HashSet, path::Path, sync::Arc};

use common::test_utils::{RecordingDevice, white_pixels};
use genesis_v::{
    Renderer, Wrap,
    frame::{Topology, VertexKind},
    platform::{PlatformState, Selection},
    shader::ShaderError,
};

fn start(selection: Selection, device: &mut RecordingDevice) -> (Renderer, Arc<PlatformState>) {
    let platform = PlatformState::new(selection);
    let renderer = Renderer::new(device, platform.clone(), None).unwrap();
    (renderer, platform)
}

fn kinds(device: &RecordingDevice) -> Vec<VertexKind> {
    device.last_frame().draws().iter().map(|d| d.kind).collect()
}

#[test]
fn base_scene_clears_color_only_and_draws_the_robot() {
    let mut device = RecordingDevice::new(800, 600);
    let (mut renderer, _) = start(Selection::default(), &mut device);
    renderer.render(&mut device);

    assert_eq!(device.compiled, vec!["textured", "colored"]);
    assert_eq!(device.clear_color, Some([0.0, 0.0, 0.0, 1.0]));
    assert_eq!(device.loaded, vec!["android_robot.png"]);
    let frame = device.last_frame();
    assert!(frame.clears_color());
    assert!(!frame.clears_depth());
    assert_eq!(kinds(&device), vec![VertexKind::Textured]);
    assert_eq!(renderer.animation().angle, 0.0);
}

#[test]
fn colored_example_draws_its_mesh_then_the_overlay() {
    let mut device = RecordingDevice::new(800, 600);
    let (mut renderer, platform) = start(Selection::example(1), &mut device);
    platform.set_pending(4, 2, white_pixels(4, 2)).unwrap();
    renderer.render(&mut device);

    let frame = device.last_frame();
    assert!(frame.clears_color() && frame.clears_depth());
    assert_eq!(
        kinds(&device),
        vec![VertexKind::Colored, VertexKind::Colored, VertexKind::Textured]
    );
    let depth: Vec<_> = frame.draws().iter().map(|d| d.depth_test).collect();
    assert_eq!(depth, vec![true, false, false]);
    assert_eq!(device.created_rgba, vec![(4, 2, Wrap::ClampToEdge)]);
    assert_eq!(frame.draws()[2].texture, renderer.overlay().texture());
    assert!(platform.try_take_pending().is_none());
}

#[test]
fn overlay_background_is_drawn_without_a_label() {
    let mut device = RecordingDevice::new(800, 600);
    let (mut renderer, _) = start(Selection::example(5), &mut device);
    renderer.render(&mut device);

    assert_eq!(kinds(&device), vec![VertexKind::Colored; 3]);
    assert!(device.created_rgba.is_empty());
    assert!(renderer.overlay().texture().is_none());
}

#[test]
fn wireframe_cube_draws_lines() {
    let mut device = RecordingDevice::new(640, 480);
    let (mut renderer, _) = start(Selection::example(3), &mut device);
    renderer.render(&mut device);

    let first = &device.last_frame().draws()[0];
    assert_eq!(first.topology, Topology::Lines);
    assert_eq!(first.indices.len(), 24);
}

#[test]
fn grass_covers_only_the_top_face() {
    let mut device = RecordingDevice::new(800, 600);
    let (mut renderer, _) = start(Selection::example(8), &mut device);
    renderer.render(&mut device);

    assert_eq!(device.loaded, vec!["wood.jpg", "grass.jpg"]);
    let faces = &device.last_frame().draws()[..6];
    assert!(faces.iter().all(|d| d.kind == VertexKind::Textured));
    let grass = faces[2].texture;
    assert_eq!(faces.iter().filter(|d| d.texture == grass).count(), 1);
    let distinct: HashSet<_> = faces.iter().map(|d| d.texture).collect();
    assert_eq!(distinct.len(), 2);
}

#[test]
fn every_object_gets_its_own_uniform_snapshot() {
    let mut device = RecordingDevice::new(800, 600);
    let (mut renderer, _) = start(Selection::example(12), &mut device);
    renderer.render(&mut device);

    let frame = device.last_frame();
    let (cube, pyramid) = (&frame.draws()[0], &frame.draws()[1]);
    assert_ne!(cube.uniform_slot, pyramid.uniform_slot);
    assert_ne!(frame.uniforms()[cube.uniform_slot], frame.uniforms()[pyramid.uniform_slot]);
}

#[test]
fn ground_scene_draws_four_models() {
    let mut device = RecordingDevice::new(800, 600);
    let (mut renderer, _) = start(Selection::example(14), &mut device);
    renderer.render(&mut device);

    assert_eq!(renderer.geometry().models.len(), 4);
    assert_eq!(
        kinds(&device),
        vec![
            VertexKind::Textured,
            VertexKind::Textured,
            VertexKind::Textured,
            VertexKind::Textured,
            VertexKind::Colored,
        ]
    );
}

#[test]
fn a_missing_texture_still_draws() {
    let mut device = RecordingDevice::new(800, 600).with_missing(&["wood.jpg"]);
    let (mut renderer, _) = start(Selection::example(7), &mut device);
    renderer.render(&mut device);

    let cube = &device.last_frame().draws()[0];
    assert_eq!(cube.kind, VertexKind::Textured);
    assert_eq!(cube.texture, None);
    assert_eq!(cube.indices.len(), 36);
}

#[test]
fn animation_advances_once_per_frame() {
    let mut device = RecordingDevice::new(800, 600);
    let (mut renderer, _) = start(Selection::example(9), &mut device);
    renderer.render(&mut device);
    renderer.render(&mut device);

    assert_eq!(renderer.animation().angle, 1.0);
    let [u, v] = renderer.textured_shader().tex_offset();
    assert!((u - 0.004).abs() < 1e-6 && (v - 0.004).abs() < 1e-6);
    assert_eq!(device.frames.len(), 2);
}

#[test]
fn level_scene_draws_the_built_in_level() {
    let mut device = RecordingDevice::new(800, 600);
    let (mut renderer, _) = start(Selection::scene(0), &mut device);
    renderer.render(&mut device);

    assert_eq!(renderer.level_tiles().len(), 8);
    assert_eq!(device.loaded.len(), 5);
    let frame = device.last_frame();
    assert!(frame.clears_color() && frame.clears_depth());
    assert_eq!(frame.draws().len(), 9);
}

#[test]
fn a_broken_level_file_falls_back_to_the_built_in_level() {
    let mut device = RecordingDevice::new(800, 600);
    let platform = PlatformState::new(Selection::scene(0));
    let renderer =
        Renderer::new(&mut device, platform, Some(Path::new("no/such/level.txt"))).unwrap();
    assert_eq!(renderer.level_tiles().len(), 8);
}

#[test]
fn unfinished_scenes_show_the_base_scene() {
    let mut device = RecordingDevice::new(800, 600);
    let (mut renderer, _) = start(Selection::scene(3), &mut device);
    renderer.render(&mut device);

    assert!(renderer.level_tiles().is_empty());
    assert_eq!(device.loaded, vec!["android_robot.png"]);
    assert!(!device.last_frame().clears_depth());
}

#[test]
fn an_empty_surface_skips_the_overlay() {
    let mut device = RecordingDevice::new(0, 0);
    let (mut renderer, _) = start(Selection::example(2), &mut device);
    renderer.render(&mut device);

    assert_eq!(kinds(&device), vec![VertexKind::Colored]);
}

#[test]
fn pointer_on_the_back_button_requests_finish() {
    let mut device = RecordingDevice::new(800, 600);
    let (renderer, platform) = start(Selection::example(4), &mut device);
    assert!(!renderer.handle_pointer_down(500.0, 500.0));
    assert!(renderer.handle_pointer_down(25.0, 25.0));
    assert!(platform.take_finish_request());
}

#[test]
fn release_deletes_everything() {
    let mut device = RecordingDevice::new(800, 600);
    let (mut renderer, platform) = start(Selection::example(14), &mut device);
    platform.set_pending(1, 1, white_pixels(1, 1)).unwrap();
    renderer.render(&mut device);
    assert_eq!(device.live_textures.len(), 4);

    renderer.release(&mut device);
    assert!(device.live_textures.is_empty());
    assert!(device.live_programs.is_empty());
}

#[test]
fn release_deletes_the_level_textures() {
    let mut device = RecordingDevice::new(800, 600);
    let (renderer, _) = start(Selection::scene(0), &mut device);
    renderer.release(&mut device);
    assert_eq!(device.deleted_textures.len(), 5);
    assert!(device.live_textures.is_empty());
}

#[test]
fn compile_failure_propagates_and_frees_the_first_program() {
    let mut device = RecordingDevice::new(800, 600);
    device.fail_compile = Some("colored");
    let platform = PlatformState::new(Selection::example(1));
    let err = Renderer::new(&mut device, platform, None).err().unwrap();
    assert!(matches!(err, ShaderError::Compile { ref program, .. } if program == "colored"));
    assert!(device.live_programs.is_empty());
}

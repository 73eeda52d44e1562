//! The per-frame scene dispatcher.
//!
//! A [`Renderer`] is built for one [`Selection`]: it compiles both programs,
//! builds the selected example's geometry (or the tile level) once, and then
//! records and presents one [`Frame`] per call to [`Renderer::render`].
//!
//! Three branches exist per frame:
//!
//! - the level scene clears everything and draws the tiles orthographically
//! - a numbered example advances the animation and evaluates its [`Recipe`]
//! - the base scene clears color only and draws its models orthographically
//!
//! The back button overlay is drawn last whenever a level scene or a numbered
//! example is on screen.

pub mod animation;
pub mod geometry;
pub mod overlay;
pub mod recipes;

use std::{path::Path, sync::Arc};

use crate::{
    backend::GraphicsDevice,
    frame::Frame,
    level::{LevelRenderer, TileEntity, default_level},
    math::{self, Mat4},
    platform::{LEVEL_SCENE, PlatformState, Selection},
    shader::{COLORED_WGSL, ColorShader, ShaderError, TEXTURED_WGSL, TexturedShader},
    tiles::TileTextureCache,
};

pub use animation::{AngleSource, AnimationState};
pub use geometry::SceneGeometry;
pub use overlay::BackButtonOverlay;
pub use recipes::{MeshRef, Recipe, TexOffset};

pub const POSITION_ATTRIBUTE: &str = "in_position";
pub const UV_ATTRIBUTE: &str = "in_uv";
pub const PROJECTION_UNIFORM: &str = "u_projection";

const CLEAR_COLOR: [f64; 4] = [0.0, 0.0, 0.0, 1.0];
/// Half height of the orthographic view used by the base and level scenes.
const ORTHO_HALF_HEIGHT: f32 = 2.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// The tile level and the cache that owns its textures.
#[derive(Debug, Default)]
struct LevelScene {
    tiles: TileTextureCache,
    renderer: LevelRenderer,
}

#[derive(Debug)]
pub struct Renderer {
    platform: Arc<PlatformState>,
    selection: Selection,
    textured: TexturedShader,
    colored: ColorShader,
    animation: AnimationState,
    geometry: SceneGeometry,
    level: Option<LevelScene>,
    overlay: BackButtonOverlay,
    viewport: Option<(u32, u32)>,
    ortho_stale: bool,
}

impl Renderer {
    /// Compiles both programs and builds the scene currently selected on
    /// `platform`. `level_file` replaces the built-in level when it loads.
    pub fn new<G: GraphicsDevice + ?Sized>(
        gpu: &mut G,
        platform: Arc<PlatformState>,
        level_file: Option<&Path>,
    ) -> Result<Self, ShaderError> {
        let selection = platform.selection();
        gpu.set_clear_color(CLEAR_COLOR);

        let textured = TexturedShader::load(
            gpu,
            TEXTURED_WGSL,
            POSITION_ATTRIBUTE,
            UV_ATTRIBUTE,
            PROJECTION_UNIFORM,
        )?;
        let colored = match ColorShader::load(gpu, COLORED_WGSL) {
            Ok(colored) => colored,
            Err(e) => {
                textured.destroy(gpu);
                return Err(e);
            }
        };

        let mut level = None;
        let geometry = match selection.scene_index() {
            LEVEL_SCENE => {
                log::info!("Starting scene {}: {}", LEVEL_SCENE, recipes::scene_title(LEVEL_SCENE));
                level = Some(build_level(gpu, level_file));
                SceneGeometry::default()
            }
            scene @ 1.. => {
                log::info!(
                    "Scene {} ({}) is under construction, showing the base scene",
                    scene,
                    recipes::scene_title(scene)
                );
                SceneGeometry::build(selection.example_index(), gpu)
            }
            _ => {
                let example = selection.example_index();
                log::info!("Starting example {}: {}", example, recipes::example_title(example));
                SceneGeometry::build(example, gpu)
            }
        };

        Ok(Self {
            platform,
            selection,
            textured,
            colored,
            animation: AnimationState::default(),
            geometry,
            level,
            overlay: BackButtonOverlay::new(),
            viewport: None,
            ortho_stale: true,
        })
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn geometry(&self) -> &SceneGeometry {
        &self.geometry
    }

    /// Tiles of the level scene; empty for every other selection.
    pub fn level_tiles(&self) -> &[TileEntity] {
        self.level
            .as_ref()
            .map(|level| level.renderer.tiles())
            .unwrap_or_default()
    }

    pub fn overlay(&self) -> &BackButtonOverlay {
        &self.overlay
    }

    pub fn textured_shader(&self) -> &TexturedShader {
        &self.textured
    }

    pub fn color_shader(&self) -> &ColorShader {
        &self.colored
    }

    /// Records one frame of the active scene and presents it.
    ///
    /// # Panics
    ///
    /// When the device fails to present. A broken surface cannot be recovered
    /// from here.
    pub fn render<G: GraphicsDevice + ?Sized>(&mut self, gpu: &mut G) {
        let frame = self.record(gpu);
        if let Err(e) = gpu.present(&frame) {
            log::error!("Presenting frame failed: {}", e);
            panic!("Presenting frame failed: {}", e);
        }
    }

    /// Forwards a pointer-down in window pixels to the back button.
    pub fn handle_pointer_down(&self, x: f32, y: f32) -> bool {
        self.platform.pointer_down(x, y)
    }

    /// Deletes every texture and program this renderer created.
    pub fn release<G: GraphicsDevice + ?Sized>(mut self, gpu: &mut G) {
        self.overlay.release(gpu);
        self.geometry.release(gpu);
        if let Some(mut level) = self.level.take() {
            level.tiles.release(gpu);
        }
        self.textured.destroy(gpu);
        self.colored.destroy(gpu);
        log::debug!("Renderer released");
    }

    fn record<G: GraphicsDevice + ?Sized>(&mut self, gpu: &mut G) -> Frame {
        let size = gpu.surface_size();
        if self.viewport != Some(size) {
            log::debug!("Viewport changed to {}x{}", size.0, size.1);
            self.viewport = Some(size);
            self.ortho_stale = true;
        }
        let aspect = aspect_ratio(size);
        let mut frame = Frame::new();

        let example = self.selection.example_index();
        if self.selection.scene_index() == LEVEL_SCENE {
            self.draw_level(&mut frame, aspect);
        } else if let Some(recipe) = recipes::recipe(example) {
            self.animation.advance();
            frame.clear(true, true);
            self.draw_recipe(recipe, &mut frame, aspect);
        } else {
            self.draw_base(&mut frame, aspect);
        }

        if self.selection.scene_index() == LEVEL_SCENE || example >= 1 {
            self.overlay.draw(
                &self.platform,
                gpu,
                &mut frame,
                &mut self.textured,
                &mut self.colored,
                size,
            );
            // the overlay leaves its own projection on the textured program
            self.ortho_stale = true;
        }
        frame
    }

    fn draw_level(&mut self, frame: &mut Frame, aspect: f32) {
        frame.clear(true, true);
        self.textured.activate(frame);
        self.textured
            .set_projection_matrix(&math::orthographic(ORTHO_HALF_HEIGHT, aspect, -1.0, 1.0));
        self.textured.set_tex_offset(0.0, 0.0);
        if let Some(level) = &self.level {
            level.renderer.draw(&self.textured, frame);
        }
    }

    fn draw_base(&mut self, frame: &mut Frame, aspect: f32) {
        if self.ortho_stale {
            self.textured
                .set_projection_matrix(&math::orthographic(ORTHO_HALF_HEIGHT, aspect, -1.0, 1.0));
            self.ortho_stale = false;
        }
        // the base scene has no depth
        frame.clear(true, false);
        self.textured.activate(frame);
        for model in &self.geometry.models {
            self.textured.draw_model(frame, model);
        }
    }

    fn draw_recipe(&mut self, recipe: &Recipe, frame: &mut Frame, aspect: f32) {
        let projection =
            math::perspective(math::PERSPECTIVE_FOV_DEGREES.to_radians(), aspect, NEAR, FAR);
        let [cx, cy, cz] = recipes::CAMERA_TRANSLATION;
        let camera = math::multiply(&projection, &math::translation(cx, cy, cz));

        let textured = recipe
            .objects
            .iter()
            .any(|object| !matches!(object.mesh, MeshRef::Colored(_)));
        if textured {
            self.textured.activate(frame);
            match recipe.tex_offset {
                TexOffset::Keep => {}
                TexOffset::Zero => self.textured.set_tex_offset(0.0, 0.0),
                TexOffset::Scroll => {
                    let offset = self.animation.texture_offset;
                    self.textured.set_tex_offset(offset, offset);
                }
            }
        }

        for object in recipe.objects {
            let mvp = self.object_transform(&camera, object);
            match object.mesh {
                MeshRef::Colored(index) => {
                    let Some(mesh) = self.geometry.colored.get(index).filter(|m| !m.is_empty()) else {
                        continue;
                    };
                    self.colored.activate(frame);
                    self.colored.set_mvp(&mvp);
                    self.colored.draw_mesh(frame, mesh, self.geometry.topology);
                }
                MeshRef::Model(index) => {
                    let Some(model) = self.geometry.models.get(index) else {
                        continue;
                    };
                    self.textured.set_projection_matrix(&mvp);
                    self.textured.draw_model(frame, model);
                }
                MeshRef::AllModels => {
                    self.textured.set_projection_matrix(&mvp);
                    for model in &self.geometry.models {
                        self.textured.draw_model(frame, model);
                    }
                }
            }
        }
    }

    /// `camera * Tobj * R1 * R2 ...`
    fn object_transform(&self, camera: &Mat4, object: &recipes::ObjectRecipe) -> Mat4 {
        let [x, y, z] = object.translation;
        let mut mvp = math::multiply(camera, &math::translation(x, y, z));
        for spin in object.spins {
            let degrees = spin.factor * self.animation.get(spin.source);
            let rotation = match spin.axis {
                recipes::Axis::X => math::rotation_x(degrees),
                recipes::Axis::Y => math::rotation_y(degrees),
                recipes::Axis::Z => math::rotation_z(degrees),
            };
            math::post_multiply(&mut mvp, &rotation);
        }
        mvp
    }
}

/// Width over height, or 1 for a zero-height surface.
pub fn aspect_ratio((width, height): (u32, u32)) -> f32 {
    if height > 0 {
        width as f32 / height as f32
    } else {
        1.0
    }
}

fn build_level<G: GraphicsDevice + ?Sized>(gpu: &mut G, level_file: Option<&Path>) -> LevelScene {
    let mut scene = LevelScene::default();
    let LevelScene { tiles, renderer } = &mut scene;
    let mut resolve = |tile_id| tiles.texture_id(tile_id, &mut *gpu);

    let loaded = match level_file {
        Some(path) => match renderer.load_level_from_file(path, &mut resolve) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{}; using the built-in level", e);
                false
            }
        },
        None => false,
    };
    if !loaded {
        renderer.load_level(&default_level(), &mut resolve);
    }
    scene
}

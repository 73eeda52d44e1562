//! The seam between the scene code and whatever executes it.
//!
//! Scenes never touch wgpu directly. They record a [`Frame`] and ask a
//! [`GraphicsDevice`] to present it, compile programs through a
//! [`ProgramCompiler`] and obtain textures from a [`TextureLoader`]. The
//! window-backed [`Context`](crate::context::Context) implements all three;
//! tests implement them with a recorder.

use std::fmt;

use thiserror::Error;

use crate::{frame::Frame, shader::ProgramDesc, shader::ShaderError};

/// Handle of a GPU texture owned by a device. Never zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub(crate) u32);

impl TextureId {
    pub fn new(raw: u32) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "texture#{}", self.0)
    }
}

/// Handle of a compiled program owned by a device. Never zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProgramId(pub(crate) u32);

impl ProgramId {
    pub fn new(raw: u32) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// How a texture samples outside of `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Wrap {
    #[default]
    Repeat,
    ClampToEdge,
}

#[derive(Debug, Error)]
pub enum PresentError {
    #[error("the window surface was lost")]
    SurfaceLost,
    #[error("the window surface failed validation")]
    Validation,
    #[error("frame references unknown program {0:?}")]
    UnknownProgram(ProgramId),
}

pub trait ProgramCompiler {
    /// Compiles and links `desc`. Errors carry the full compiler output.
    fn compile_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId, ShaderError>;

    fn delete_program(&mut self, program: ProgramId);
}

pub trait TextureLoader {
    /// Loads `name`, relative to the asset root, into a new texture.
    fn load_texture(&mut self, name: &str) -> anyhow::Result<TextureId>;

    /// Uploads tightly packed RGBA8 pixels into a new texture.
    fn create_texture_rgba(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
        wrap: Wrap,
    ) -> anyhow::Result<TextureId>;

    fn delete_texture(&mut self, texture: TextureId);

    /// `false` when there is no asset root to load from at all.
    fn assets_available(&self) -> bool {
        true
    }
}

pub trait GraphicsDevice: ProgramCompiler + TextureLoader {
    /// Current drawable size in pixels.
    fn surface_size(&self) -> (u32, u32);

    fn set_clear_color(&mut self, rgba: [f64; 4]);

    /// Executes `frame` and swaps it onto the surface.
    fn present(&mut self, frame: &Frame) -> Result<(), PresentError>;
}

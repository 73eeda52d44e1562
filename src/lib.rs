//! genesis-v
//!
//! A set of small numbered rendering demos on wgpu: rotating colored
//! primitives, textured cubes and pyramids, a scrolling texture, tiles cut
//! from an atlas and a tile level loaded from text, each with a back button
//! overlay. Scenes are recorded immediate-mode style into a frame and then
//! replayed by the backend in one render pass.
//!
//! High-level modules
//! - `backend`: the device traits (program compiler, texture loader, presenter)
//! - `context`: window surface and depth buffer around the [`render::Gpu`]
//! - `frame`: the recorded frame: draws, uniform snapshots and clear flags
//! - `shader`: WGSL programs, their reflection and the two shader wrappers
//! - `scene`: the per-frame dispatcher, example recipes, geometry and overlay
//! - `level` / `tiles`: the tile level and its texture cache
//! - `platform`: selection, pending label and finish request shared with the window loop
//! - `flow`: the winit event loop
//! - `config` / `logging`: run configuration and logger setup
//!

pub mod backend;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod frame;
pub mod level;
pub mod logging;
pub mod math;
pub mod pipelines;
pub mod platform;
pub mod render;
pub mod resources;
pub mod scene;
pub mod shader;
pub mod tiles;

// Re-exports commonly used types for convenience in downstream code.
pub use backend::{GraphicsDevice, PresentError, ProgramCompiler, ProgramId, TextureId, TextureLoader, Wrap};
pub use config::AppConfig;
pub use frame::Frame;
pub use platform::{PlatformState, Selection};
pub use scene::Renderer;

//! Data structures: vertex formats, meshes and GPU textures.
//!
//! - `model` contains the vertex layouts and the CPU-side mesh containers
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod model;
pub mod texture;

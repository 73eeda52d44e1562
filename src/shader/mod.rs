//! Shader program wrappers.
//!
//! Each wrapper owns one compiled program and a CPU copy of its uniform block.
//! Loading resolves the caller's attribute and uniform names against the WGSL
//! source (see [`reflect`]) before anything reaches the GPU, so a misspelt
//! name fails the same way a failed GL location lookup would.
//!
//! # Key types
//!
//! - [`TexturedShader`] draws position + UV geometry with one bound texture
//! - [`ColorShader`] draws position + color geometry as triangles or lines
//! - [`ShaderError`] covers every way loading can fail

pub mod colored;
pub mod reflect;
pub mod textured;

use thiserror::Error;

pub use colored::ColorShader;
pub use reflect::Reflection;
pub use textured::TexturedShader;

/// WGSL source of the textured-quad program.
pub const TEXTURED_WGSL: &str = include_str!("textured.wgsl");
/// WGSL source of the colored-vertex program.
pub const COLORED_WGSL: &str = include_str!("colored.wgsl");

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("program `{program}` has no vertex attribute named `{name}`")]
    MissingAttribute { program: String, name: String },
    #[error("program `{program}` has no uniform named `{name}`")]
    MissingUniform { program: String, name: String },
    #[error("program `{program}` failed to compile:\n{log}")]
    Compile { program: String, log: String },
    #[error("program `{program}` has a {size} byte uniform block, at most {limit} fit a draw slot")]
    UniformBlockTooLarge { program: String, size: u32, limit: u64 },
}

/// The vertex format a program consumes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    /// [`Vertex`](crate::data_structures::model::Vertex) input and one texture.
    Textured,
    /// [`ColoredVertex`](crate::data_structures::model::ColoredVertex) input.
    Colored,
}

/// Everything a [`ProgramCompiler`](crate::backend::ProgramCompiler) needs to
/// build a program once its names have been resolved.
#[derive(Clone, Debug)]
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub kind: ProgramKind,
    pub source: &'a str,
    /// Shader locations of the position and the second attribute (UV or color).
    pub attribute_locations: [u32; 2],
    pub uniform_block_size: u32,
}

/// Fails when the uniform struct of `reflection` does not fit a
/// [`UniformBlock`](crate::frame::UniformBlock).
pub(crate) fn check_uniform_block(reflection: &Reflection, program: &str) -> Result<(), ShaderError> {
    let size = reflection.uniform_block_size();
    let limit = crate::frame::UniformBlock::SIZE;
    if u64::from(size) > limit {
        log::error!("Uniform block of program `{}` is {} bytes, limit is {}", program, size, limit);
        return Err(ShaderError::UniformBlockTooLarge {
            program: program.to_string(),
            size,
            limit,
        });
    }
    Ok(())
}

pub(crate) fn resolve_attribute(
    reflection: &Reflection,
    program: &str,
    name: &str,
) -> Result<u32, ShaderError> {
    reflection.attribute_location(name).ok_or_else(|| {
        log::error!("Could not find attribute `{}` in program `{}`", name, program);
        ShaderError::MissingAttribute {
            program: program.to_string(),
            name: name.to_string(),
        }
    })
}

pub(crate) fn resolve_uniform(
    reflection: &Reflection,
    program: &str,
    name: &str,
) -> Result<u32, ShaderError> {
    reflection.uniform_offset(name).ok_or_else(|| {
        log::error!("Could not find uniform `{}` in program `{}`", name, program);
        ShaderError::MissingUniform {
            program: program.to_string(),
            name: name.to_string(),
        }
    })
}

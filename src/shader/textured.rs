use crate::{
    backend::{ProgramCompiler, ProgramId, TextureId},
    data_structures::model::{Index, Model, Vertex},
    frame::{Frame, UniformBlock},
    math::Mat4,
    shader::{
        ProgramDesc, ProgramKind, Reflection, ShaderError, check_uniform_block, resolve_attribute,
        resolve_uniform,
    },
};

/// Uniform carrying the UV scroll offset. Optional: programs without it
/// simply ignore [`TexturedShader::set_tex_offset`].
pub const TEX_OFFSET_UNIFORM: &str = "u_tex_offset";

/// Position + UV program drawing indexed triangles with one texture bound.
#[derive(Debug)]
pub struct TexturedShader {
    program: ProgramId,
    projection: u32,
    tex_offset: Option<u32>,
    uniforms: UniformBlock,
}

impl TexturedShader {
    /// Compiles `source` and resolves the three required names.
    pub fn load<C: ProgramCompiler + ?Sized>(
        compiler: &mut C,
        source: &str,
        position_attribute: &str,
        uv_attribute: &str,
        projection_uniform: &str,
    ) -> Result<Self, ShaderError> {
        const LABEL: &str = "textured";
        let reflection = Reflection::parse(source);
        check_uniform_block(&reflection, LABEL)?;
        let position = resolve_attribute(&reflection, LABEL, position_attribute)?;
        let uv = resolve_attribute(&reflection, LABEL, uv_attribute)?;
        let projection = resolve_uniform(&reflection, LABEL, projection_uniform)?;
        let tex_offset = reflection.uniform_offset(TEX_OFFSET_UNIFORM);
        if tex_offset.is_none() {
            log::debug!("program `{}` has no `{}`; UV scrolling disabled", LABEL, TEX_OFFSET_UNIFORM);
        }

        let program = compiler.compile_program(&ProgramDesc {
            label: LABEL,
            kind: ProgramKind::Textured,
            source,
            attribute_locations: [position, uv],
            uniform_block_size: reflection.uniform_block_size(),
        })?;

        Ok(Self {
            program,
            projection,
            tex_offset,
            uniforms: UniformBlock::default(),
        })
    }

    pub fn program(&self) -> ProgramId {
        self.program
    }

    pub fn uniforms(&self) -> &UniformBlock {
        &self.uniforms
    }

    /// Binds this program for the following draws of `frame`.
    pub fn activate(&self, frame: &mut Frame) {
        frame.use_program(self.program);
    }

    pub fn set_projection_matrix(&mut self, projection: &Mat4) {
        self.uniforms.write(self.projection, projection);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let mut out = [0.0; 16];
        out.copy_from_slice(self.uniforms.read(self.projection, 16));
        out
    }

    pub fn set_tex_offset(&mut self, u: f32, v: f32) {
        if let Some(offset) = self.tex_offset {
            self.uniforms.write(offset, &[u, v]);
        }
    }

    pub fn tex_offset(&self) -> [f32; 2] {
        match self.tex_offset {
            Some(offset) => {
                let uv = self.uniforms.read(offset, 2);
                [uv[0], uv[1]]
            }
            None => [0.0, 0.0],
        }
    }

    /// Draws `indices` as triangles over `vertices` with `texture` bound. The
    /// geometry is copied into the frame, the slices only need to live for
    /// the call.
    pub fn draw_textured_quad(
        &self,
        frame: &mut Frame,
        vertices: &[Vertex],
        indices: &[Index],
        texture: Option<TextureId>,
    ) {
        frame.record_textured(self.program, &self.uniforms, vertices, indices, texture);
    }

    pub fn draw_model(&self, frame: &mut Frame, model: &Model) {
        self.draw_textured_quad(frame, &model.vertices, &model.indices, model.texture);
    }

    pub fn destroy<C: ProgramCompiler + ?Sized>(self, compiler: &mut C) {
        compiler.delete_program(self.program);
    }
}

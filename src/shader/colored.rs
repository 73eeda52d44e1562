use crate::{
    backend::{ProgramCompiler, ProgramId},
    data_structures::model::{ColoredMesh, ColoredVertex, Index},
    frame::{Frame, Topology, UniformBlock},
    math::Mat4,
    shader::{
        ProgramDesc, ProgramKind, Reflection, ShaderError, check_uniform_block, resolve_attribute,
        resolve_uniform,
    },
};

pub const POSITION_ATTRIBUTE: &str = "in_position";
pub const COLOR_ATTRIBUTE: &str = "in_color";
pub const MVP_UNIFORM: &str = "u_mvp";

/// Position + RGBA program with a single MVP uniform. Serves both the solid
/// (triangle list) and the wireframe (line list) examples.
#[derive(Debug)]
pub struct ColorShader {
    program: ProgramId,
    mvp: u32,
    uniforms: UniformBlock,
}

impl ColorShader {
    pub fn load<C: ProgramCompiler + ?Sized>(
        compiler: &mut C,
        source: &str,
    ) -> Result<Self, ShaderError> {
        const LABEL: &str = "colored";
        let reflection = Reflection::parse(source);
        check_uniform_block(&reflection, LABEL)?;
        let position = resolve_attribute(&reflection, LABEL, POSITION_ATTRIBUTE)?;
        let color = resolve_attribute(&reflection, LABEL, COLOR_ATTRIBUTE)?;
        let mvp = resolve_uniform(&reflection, LABEL, MVP_UNIFORM)?;

        let program = compiler.compile_program(&ProgramDesc {
            label: LABEL,
            kind: ProgramKind::Colored,
            source,
            attribute_locations: [position, color],
            uniform_block_size: reflection.uniform_block_size(),
        })?;

        Ok(Self {
            program,
            mvp,
            uniforms: UniformBlock::default(),
        })
    }

    pub fn program(&self) -> ProgramId {
        self.program
    }

    pub fn uniforms(&self) -> &UniformBlock {
        &self.uniforms
    }

    pub fn activate(&self, frame: &mut Frame) {
        frame.use_program(self.program);
    }

    pub fn set_mvp(&mut self, mvp: &Mat4) {
        self.uniforms.write(self.mvp, mvp);
    }

    pub fn mvp(&self) -> Mat4 {
        let mut out = [0.0; 16];
        out.copy_from_slice(self.uniforms.read(self.mvp, 16));
        out
    }

    pub fn draw(
        &self,
        frame: &mut Frame,
        vertices: &[ColoredVertex],
        indices: &[Index],
        topology: Topology,
    ) {
        frame.record_colored(self.program, &self.uniforms, vertices, indices, topology);
    }

    pub fn draw_mesh(&self, frame: &mut Frame, mesh: &ColoredMesh, topology: Topology) {
        self.draw(frame, &mesh.vertices, &mesh.indices, topology);
    }

    pub fn destroy<C: ProgramCompiler + ?Sized>(self, compiler: &mut C) {
        compiler.delete_program(self.program);
    }
}

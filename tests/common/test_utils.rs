use std::collections::{BTreeSet, HashSet};

use anyhow::anyhow;
use genesis_v::{
    Frame, GraphicsDevice, PresentError, ProgramCompiler, ProgramId, TextureId, TextureLoader, Wrap,
    shader::{ProgramDesc, ShaderError},
};

/// A device that keeps everything it is asked to do instead of drawing.
#[allow(dead_code)]
pub struct RecordingDevice {
    pub size: (u32, u32),
    pub clear_color: Option<[f64; 4]>,
    pub frames: Vec<Frame>,
    pub compiled: Vec<String>,
    pub live_programs: HashSet<ProgramId>,
    pub loaded: Vec<String>,
    pub created_rgba: Vec<(u32, u32, Wrap)>,
    pub live_textures: BTreeSet<TextureId>,
    pub deleted_textures: Vec<TextureId>,
    /// Program label whose compilation fails.
    pub fail_compile: Option<&'static str>,
    /// Asset names whose loading fails.
    pub missing: HashSet<String>,
    pub assets_available: bool,
    next_id: u32,
}

#[allow(dead_code)]
impl RecordingDevice {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            clear_color: None,
            frames: Vec::new(),
            compiled: Vec::new(),
            live_programs: HashSet::new(),
            loaded: Vec::new(),
            created_rgba: Vec::new(),
            live_textures: BTreeSet::new(),
            deleted_textures: Vec::new(),
            fail_compile: None,
            missing: HashSet::new(),
            assets_available: true,
            next_id: 1,
        }
    }

    pub fn with_missing(mut self, names: &[&str]) -> Self {
        self.missing.extend(names.iter().map(|n| n.to_string()));
        self
    }

    pub fn last_frame(&self) -> &Frame {
        self.frames.last().expect("no frame presented")
    }

    fn next(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl ProgramCompiler for RecordingDevice {
    fn compile_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId, ShaderError> {
        if self.fail_compile == Some(desc.label) {
            return Err(ShaderError::Compile {
                program: desc.label.to_string(),
                log: "error: injected failure".to_string(),
            });
        }
        self.compiled.push(desc.label.to_string());
        let id = ProgramId::new(self.next()).expect("ids start at one");
        self.live_programs.insert(id);
        Ok(id)
    }

    fn delete_program(&mut self, program: ProgramId) {
        assert!(self.live_programs.remove(&program), "{:?} deleted twice", program);
    }
}

impl TextureLoader for RecordingDevice {
    fn load_texture(&mut self, name: &str) -> anyhow::Result<TextureId> {
        self.loaded.push(name.to_string());
        if self.missing.contains(name) {
            return Err(anyhow!("{} not found", name));
        }
        let id = TextureId::new(self.next()).expect("ids start at one");
        self.live_textures.insert(id);
        Ok(id)
    }

    fn create_texture_rgba(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
        wrap: Wrap,
    ) -> anyhow::Result<TextureId> {
        assert_eq!(pixels.len(), (width * height * 4) as usize);
        self.created_rgba.push((width, height, wrap));
        let id = TextureId::new(self.next()).expect("ids start at one");
        self.live_textures.insert(id);
        Ok(id)
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.deleted_textures.push(texture);
        self.live_textures.remove(&texture);
    }

    fn assets_available(&self) -> bool {
        self.assets_available
    }
}

impl GraphicsDevice for RecordingDevice {
    fn surface_size(&self) -> (u32, u32) {
        self.size
    }

    fn set_clear_color(&mut self, rgba: [f64; 4]) {
        self.clear_color = Some(rgba);
    }

    fn present(&mut self, frame: &Frame) -> Result<(), PresentError> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// A texture loader that only counts calls.
#[allow(dead_code)]
#[derive(Default)]
pub struct CountingLoader {
    pub loads: Vec<String>,
    pub failing: HashSet<&'static str>,
    pub no_assets: bool,
    next_id: u32,
}

impl TextureLoader for CountingLoader {
    fn load_texture(&mut self, name: &str) -> anyhow::Result<TextureId> {
        self.loads.push(name.to_string());
        if self.failing.contains(name) {
            return Err(anyhow!("{} is corrupt", name));
        }
        self.next_id += 1;
        Ok(TextureId::new(self.next_id).expect("ids start at one"))
    }

    fn create_texture_rgba(&mut self, _: u32, _: u32, _: &[u8], _: Wrap) -> anyhow::Result<TextureId> {
        self.next_id += 1;
        Ok(TextureId::new(self.next_id).expect("ids start at one"))
    }

    fn delete_texture(&mut self, _: TextureId) {}

    fn assets_available(&self) -> bool {
        !self.no_assets
    }
}

/// Four bytes per pixel, all opaque white.
#[allow(dead_code)]
pub fn white_pixels(width: u32, height: u32) -> Vec<u8> {
    vec![255; (width * height * 4) as usize]
}

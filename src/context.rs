use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    backend::{GraphicsDevice, PresentError, ProgramCompiler, ProgramId, TextureId, TextureLoader, Wrap},
    data_structures::texture::DepthTexture,
    frame::Frame,
    render::{FrameTarget, Gpu},
    resources::AssetDir,
    shader::{ProgramDesc, ShaderError},
};

/// The window-backed graphics device: a configured surface, its depth buffer
/// and the [`Gpu`] that owns everything else.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: DepthTexture,
    depth_needs_clear: bool,
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    pub gpu: Gpu,
    clear_color: wgpu::Color,
}

impl Context {
    pub async fn new(window: Arc<Window>, assets: AssetDir) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..wgpu::InstanceDescriptor::new_without_display_handle()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating the window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no adapter can present to the window")?;
        log::info!("Adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await
            .context("requesting a device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colors are written as given, so prefer a surface that does not
        // re-encode them to sRGB.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface supports no formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            DepthTexture::new(&device, [config.width, config.height], "depth_texture");
        let gpu = Gpu::new(device, queue, surface_format, assets)?;

        Ok(Self {
            window,
            depth_texture,
            depth_needs_clear: true,
            surface,
            config,
            gpu,
            clear_color: wgpu::Color::BLACK,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Reconfigures the surface and recreates the depth buffer. Zero sizes
    /// are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.gpu.device, &self.config);
        self.depth_texture =
            DepthTexture::new(&self.gpu.device, [width, height], "depth_texture");
        self.depth_needs_clear = true;
        true
    }

    fn reconfigure(&mut self) {
        let size = self.window.inner_size();
        if !self.resize(size.width, size.height) {
            self.surface.configure(&self.gpu.device, &self.config);
        }
    }
}

impl ProgramCompiler for Context {
    fn compile_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId, ShaderError> {
        self.gpu.compile_program(desc)
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.gpu.delete_program(program)
    }
}

impl TextureLoader for Context {
    fn load_texture(&mut self, name: &str) -> anyhow::Result<TextureId> {
        self.gpu.load_texture(name)
    }

    fn create_texture_rgba(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
        wrap: Wrap,
    ) -> anyhow::Result<TextureId> {
        self.gpu.create_texture_rgba(width, height, pixels, wrap)
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.gpu.delete_texture(texture)
    }

    fn assets_available(&self) -> bool {
        self.gpu.assets_available()
    }
}

impl GraphicsDevice for Context {
    fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn set_clear_color(&mut self, [r, g, b, a]: [f64; 4]) {
        self.clear_color = wgpu::Color { r, g, b, a };
    }

    /// Skips the frame and reconfigures when the surface is outdated,
    /// occluded or timed out. Lost and invalid surfaces are errors.
    fn present(&mut self, frame: &Frame) -> Result<(), PresentError> {
        let (output, suboptimal) = match self.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(output) => (output, false),
            wgpu::CurrentSurfaceTexture::Suboptimal(output) => (output, true),
            wgpu::CurrentSurfaceTexture::Timeout
            | wgpu::CurrentSurfaceTexture::Occluded
            | wgpu::CurrentSurfaceTexture::Outdated => {
                log::debug!("Surface unavailable, skipping frame");
                self.reconfigure();
                return Ok(());
            }
            wgpu::CurrentSurfaceTexture::Lost => return Err(PresentError::SurfaceLost),
            wgpu::CurrentSurfaceTexture::Validation => return Err(PresentError::Validation),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let commands = self.gpu.encode_frame(
            frame,
            &FrameTarget {
                color: &view,
                depth: &self.depth_texture.view,
                size: (self.config.width, self.config.height),
                clear_color: self.clear_color,
                force_depth_clear: self.depth_needs_clear,
            },
        )?;
        self.gpu.queue.submit(std::iter::once(commands));
        self.window.pre_present_notify();
        output.present();
        self.depth_needs_clear = false;
        if suboptimal {
            log::debug!("Surface is suboptimal, reconfiguring");
            self.reconfigure();
        }
        Ok(())
    }
}

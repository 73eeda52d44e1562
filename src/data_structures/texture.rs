//! GPU textures and texture creation utilities.
//!
//! This module provides [`Texture`], a wrapper around a sampled wgpu texture,
//! with the helpers that upload decoded images or raw RGBA8 pixels and create
//! the 1x1 blank texture bound when a draw has none. [`DepthTexture`] is the
//! render-attachment-only depth buffer.

use anyhow::{Context, Result, bail};
use image::GenericImageView;

use crate::backend::Wrap;

/// A GPU texture with a view and a sampler.
#[derive(Clone, Debug)]
pub struct Texture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Depth buffer of the window surface. It is only ever a render attachment,
/// so it carries no sampler.
#[derive(Clone, Debug)]
pub struct DepthTexture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    /// Standard depth buffer texture format (32-bit float).
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth buffer of `size` pixels, each side clamped to at least 1.
    pub fn new(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    pub fn size(&self) -> [u32; 2] {
        [self.texture.width(), self.texture.height()]
    }
}

impl Texture {
    /// Color textures are stored linear, matching the non-sRGB surface.
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Decode image file contents (PNG, JPEG) and upload them.
    ///
    /// # Arguments
    ///
    /// * `bytes` represent raw image file data, the format is guessed
    /// * `label` is used as a debug name for the GPU resource
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
        wrap: Wrap,
    ) -> Result<Self> {
        let img = image::load_from_memory(bytes).with_context(|| format!("decoding {}", label))?;
        Self::from_image(device, queue, &img, Some(label), wrap)
    }

    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: Option<&str>,
        wrap: Wrap,
    ) -> Result<Self> {
        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();
        Self::from_rgba(device, queue, width, height, &rgba, label, wrap)
    }

    /// Upload tightly packed RGBA8 pixels, `width * height * 4` bytes.
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        pixels: &[u8],
        label: Option<&str>,
        wrap: Wrap,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("texture {:?} has an empty size {}x{}", label, width, height);
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() < expected {
            bail!(
                "texture {:?} needs {} bytes of pixels, got {}",
                label,
                expected,
                pixels.len()
            );
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &pixels[..expected],
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = create_sampler(device, wrap);

        Ok(Self {
            texture,
            view,
            sampler,
        })
    }

    /// Opaque white 1x1 texture, bound for draws without a texture.
    pub fn create_blank(device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Self> {
        Self::from_rgba(device, queue, 1, 1, &[255; 4], Some("blank"), Wrap::Repeat)
    }
}

pub fn create_sampler(device: &wgpu::Device, wrap: Wrap) -> wgpu::Sampler {
    let address_mode = match wrap {
        Wrap::Repeat => wgpu::AddressMode::Repeat,
        Wrap::ClampToEdge => wgpu::AddressMode::ClampToEdge,
    };
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}

use image::GenericImageView;

use crate::{
    backend::Wrap,
    data_structures::texture::Texture,
    platform::LabelBitmap,
    resources::AssetDir,
};

/// Group 1 of the textured program: the texture at binding 0 and its sampler
/// at binding 1.
pub fn texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("texture_bind_group_layout"),
    })
}

pub fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
        label: Some("texture_bind_group"),
    })
}

pub fn load_texture(
    assets: &AssetDir,
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    wrap: Wrap,
) -> anyhow::Result<Texture> {
    let data = assets.load_binary(file_name)?;
    Texture::from_bytes(device, queue, &data, file_name, wrap)
}

/// Decodes the overlay label image into RGBA8 pixels.
pub fn load_label_bitmap(assets: &AssetDir, file_name: &str) -> anyhow::Result<LabelBitmap> {
    let data = assets.load_binary(file_name)?;
    let img = image::load_from_memory(&data)?;
    let (width, height) = img.dimensions();
    Ok(LabelBitmap::new(width, height, img.to_rgba8().into_raw())?)
}

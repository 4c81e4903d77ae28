use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Dimension;

/// Decoded sprite pixels, ready for upload.
pub struct SpriteImage {
    rgba8: image::RgbaImage,
}

impl SpriteImage {
    pub fn open(path: &Path) -> Result<Self> {
        let image = image::open(path).map_err(|source| Error::Sprite {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            rgba8: image.to_rgba8(),
        })
    }

    pub fn dimension(&self) -> Dimension {
        let (width, height) = self.rgba8.dimensions();
        Dimension::new(width as i32, height as i32)
    }
}

pub(crate) struct SpriteTexture {
    pub bind_group: wgpu::BindGroup,
}

impl SpriteTexture {
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: None,
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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
        })
    }

    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        sprite: &SpriteImage,
        bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let (width, height) = sprite.rgba8.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Sprite Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            sprite.rgba8.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let (address_mode, border_color) = edge_sampling(device.features());
        // pixel art: sharp when shrunk, smooth when stretched
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: None,
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            border_color,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sprite Bind Group"),
            layout: bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self { bind_group }
    }
}

/// Samples outside the sprite as transparent where the device allows it, so
/// edge texels are not smeared. Falls back to clamping to the edge.
pub(crate) fn edge_sampling(
    features: wgpu::Features,
) -> (wgpu::AddressMode, Option<wgpu::SamplerBorderColor>) {
    if features.contains(wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER) {
        (
            wgpu::AddressMode::ClampToBorder,
            Some(wgpu::SamplerBorderColor::TransparentBlack),
        )
    } else {
        (wgpu::AddressMode::ClampToEdge, None)
    }
}

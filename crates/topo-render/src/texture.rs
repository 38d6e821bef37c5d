//! Upload of decoded RGBA8 images as sampled, mipmapped GPU textures.

use image::RgbaImage;
use image::imageops::FilterType;

/// Errors that can occur during texture creation.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("texture {width}x{height} exceeds the device limit of {max} texels per side")]
    TooLarge { width: u32, height: u32, max: u32 },
}

/// Number of mip levels down to 1x1 for the given dimensions.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// A 2D texture and its default view.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub dimensions: (u32, u32),
    pub mip_level_count: u32,
}

impl GpuTexture {
    /// Upload `image` with a full mip chain built on the CPU.
    ///
    /// Color maps use `srgb = true` so they are sampled in linear space; data
    /// maps such as the bump map are uploaded as plain unorm.
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &RgbaImage,
        srgb: bool,
    ) -> Result<Self, TextureError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroDimensions { width, height });
        }
        let max = device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            return Err(TextureError::TooLarge { width, height, max });
        }

        let format = if srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };
        let mip_levels = mip_level_count(width, height);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: mip_levels,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        write_level(queue, &texture, 0, image);
        let mut previous = image.clone();
        for level in 1..mip_levels {
            let w = (width >> level).max(1);
            let h = (height >> level).max(1);
            previous = image::imageops::resize(&previous, w, h, FilterType::Triangle);
            write_level(queue, &texture, level, &previous);
        }

        log::info!("Uploaded texture '{label}' ({width}x{height}, {mip_levels} mips)");

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Self {
            texture,
            view,
            dimensions: (width, height),
            mip_level_count: mip_levels,
        })
    }
}

fn write_level(queue: &wgpu::Queue, texture: &wgpu::Texture, level: u32, image: &RgbaImage) {
    let (width, height) = image.dimensions();
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: level,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.as_raw(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

/// Trilinear sampler for planet surface maps. Wraps around in longitude,
/// clamps at the poles.
pub fn create_surface_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("planet-surface-sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Linear,
        ..Default::default()
    })
}

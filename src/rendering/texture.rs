use std::{collections::HashMap, num::NonZeroU32};

use image::{imageops::FilterType, RgbaImage};
use wgpu::{util::DeviceExt, TexelCopyBufferLayout, TexelCopyTextureInfo};

use crate::scene::{
    texture_registry::check_dimensions, TextureBackend, TextureError, TextureHandle,
    MAX_TEXTURE_SLOTS,
};

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const PLACEHOLDER_COLOR: [u8; 4] = [255, 0, 255, 255];

pub struct DepthTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    label: String,
}

impl DepthTexture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: impl Into<String>,
    ) -> Self {
        let label: String = label.into();
        let texture = Self::create_wgpu_texture(device, config, &label);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        DepthTexture {
            texture,
            view,
            label,
        }
    }

    fn create_wgpu_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) {
        self.texture.destroy();
        self.texture = Self::create_wgpu_texture(device, config, &self.label);
        self.view = self
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// Scene textures on the GPU, exposed to the shader as a fixed-size array of
/// [`MAX_TEXTURE_SLOTS`] views sharing one repeating, trilinear sampler.
/// Unbound slots show a magenta placeholder.
pub struct GpuTextures {
    device: wgpu::Device,
    queue: wgpu::Queue,

    textures: HashMap<TextureHandle, GpuTexture>,
    slots: [Option<TextureHandle>; MAX_TEXTURE_SLOTS],
    next_handle: u32,

    placeholder: GpuTexture,
    sampler: wgpu::Sampler,

    bind_group_layout: wgpu::BindGroupLayout,
    // Rebuilt lazily after the slot assignment changes
    bind_group: Option<wgpu::BindGroup>,
}

impl GpuTextures {
    pub const REQUIRED_FEATURES: wgpu::Features = wgpu::Features::TEXTURE_BINDING_ARRAY;

    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let placeholder = Self::create_placeholder_texture(device, queue);

        let sampler = device.create_sampler(&scene_sampler_descriptor());

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene textures bind group layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: NonZeroU32::new(MAX_TEXTURE_SLOTS as u32),
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        Self {
            device: device.clone(),
            queue: queue.clone(),
            textures: HashMap::new(),
            slots: [None; MAX_TEXTURE_SLOTS],
            next_handle: 1,
            placeholder,
            sampler,
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&mut self) -> &wgpu::BindGroup {
        let Self {
            device,
            textures,
            slots,
            placeholder,
            sampler,
            bind_group_layout,
            bind_group,
            ..
        } = self;

        bind_group.get_or_insert_with(|| {
            let texture_views: Vec<&wgpu::TextureView> = slots
                .iter()
                .map(|slot| {
                    slot.and_then(|handle| textures.get(&handle))
                        .map_or(&placeholder.view, |texture| &texture.view)
                })
                .collect();

            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Scene textures bind group"),
                layout: bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureViewArray(&texture_views),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            })
        })
    }

    fn create_placeholder_texture(device: &wgpu::Device, queue: &wgpu::Queue) -> GpuTexture {
        let size = wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Missing texture placeholder"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &PLACEHOLDER_COLOR,
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: None,
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        GpuTexture { texture, view }
    }
}

impl TextureBackend for GpuTextures {
    fn upload(&mut self, tag: &str, image: &RgbaImage) -> Result<TextureHandle, TextureError> {
        check_dimensions(tag, image, self.device.limits().max_texture_dimension_2d)?;

        let (width, height) = image.dimensions();
        let mip_level_count = mip_level_count(width, height);

        let texture = self.device.create_texture_with_data(
            &self.queue,
            &wgpu::TextureDescriptor {
                label: Some(tag),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: COLOR_FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::wgt::TextureDataOrder::LayerMajor,
            &build_mip_chain(image),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let handle = TextureHandle(self.next_handle);
        self.next_handle += 1;
        self.textures.insert(handle, GpuTexture { texture, view });

        log::debug!("Uploaded texture '{tag}' ({width}x{height}, {mip_level_count} mip levels)");

        Ok(handle)
    }

    fn bind(&mut self, slot: usize, handle: TextureHandle) {
        let Some(target) = self.slots.get_mut(slot) else {
            log::warn!("Texture slot {slot} is out of range");
            return;
        };

        *target = Some(handle);
        self.bind_group = None;
    }

    fn release(&mut self, handle: TextureHandle) {
        if let Some(gpu_texture) = self.textures.remove(&handle) {
            gpu_texture.texture.destroy();
        }

        for slot in self.slots.iter_mut().filter(|slot| **slot == Some(handle)) {
            *slot = None;
        }
        self.bind_group = None;
    }
}

/// Repeat addressing with bilinear filtering inside a level and linear blending
/// between levels. Minified textures read the generated mip chain.
pub fn scene_sampler_descriptor() -> wgpu::SamplerDescriptor<'static> {
    wgpu::SamplerDescriptor {
        label: Some("Scene texture sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        lod_min_clamp: 0.0,
        lod_max_clamp: 32.0,
        compare: None,
        anisotropy_clamp: 1,
        border_color: None,
    }
}

/// Number of levels in a full mip chain down to 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Every mip level of `image`, tightly packed one after another, largest first.
pub fn build_mip_chain(image: &RgbaImage) -> Vec<u8> {
    let (width, height) = image.dimensions();
    let levels = mip_level_count(width, height);

    let mut data = image.as_raw().clone();
    let mut previous = image.clone();

    for _ in 1..levels {
        let next = image::imageops::resize(
            &previous,
            (previous.width() / 2).max(1),
            (previous.height() / 2).max(1),
            FilterType::Triangle,
        );
        data.extend_from_slice(next.as_raw());
        previous = next;
    }

    data
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    #[test]
    fn scene_sampler_repeats_and_blends_mip_levels() {
        let descriptor = scene_sampler_descriptor();

        assert_eq!(descriptor.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(descriptor.address_mode_v, wgpu::AddressMode::Repeat);
        assert_eq!(descriptor.min_filter, wgpu::FilterMode::Linear);
        assert_eq!(descriptor.mipmap_filter, wgpu::FilterMode::Linear);
        // Must reach the smallest level of the largest texture a device allows
        assert!(descriptor.lod_max_clamp >= mip_level_count(u16::MAX as u32, 1) as f32);
    }

    #[test]
    fn mip_level_counts() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(4, 2), 3);
        assert_eq!(mip_level_count(1024, 512), 11);
        assert_eq!(mip_level_count(640, 480), 10);
    }

    #[test]
    fn mip_chain_packs_every_level() {
        let image = RgbaImage::from_pixel(4, 2, Rgba([10, 20, 30, 255]));
        let data = build_mip_chain(&image);

        // 4x2 + 2x1 + 1x1 pixels
        assert_eq!(data.len(), (8 + 2 + 1) * 4);
        assert_eq!(&data[..4], &[10, 20, 30, 255]);
        assert_eq!(&data[data.len() - 4..], &[10, 20, 30, 255]);
    }
}

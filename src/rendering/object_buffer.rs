use std::num::NonZeroU64;

use crate::rendering::program::{DrawCommand, ObjectUniform};

/// One [`ObjectUniform`] per draw, each at its own dynamic offset.
pub struct ObjectBuffer {
    buffer: wgpu::Buffer,
    stride: u64,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl ObjectBuffer {
    pub const MAX_DRAWS: usize = 256;

    pub fn new(device: &wgpu::Device) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = object_stride(alignment);
        let binding_size = NonZeroU64::new(std::mem::size_of::<ObjectUniform>() as u64);

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object uniform buffer"),
            size: stride * Self::MAX_DRAWS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object uniform bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: binding_size,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object uniform bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: binding_size,
                }),
            }],
        });

        Self {
            buffer,
            stride,
            bind_group_layout,
            bind_group,
        }
    }

    /// Uploads the draws' uniforms and returns how many fit.
    pub fn write(&self, queue: &wgpu::Queue, draws: &[DrawCommand]) -> usize {
        if draws.len() > Self::MAX_DRAWS {
            log::warn!(
                "{} draws recorded, only the first {} are rendered",
                draws.len(),
                Self::MAX_DRAWS
            );
        }

        let objects: Vec<ObjectUniform> = draws
            .iter()
            .take(Self::MAX_DRAWS)
            .map(|draw| draw.object)
            .collect();

        if !objects.is_empty() {
            queue.write_buffer(&self.buffer, 0, &pack_objects(&objects, self.stride));
        }

        objects.len()
    }

    pub fn offset(&self, draw_index: usize) -> wgpu::DynamicOffset {
        (draw_index as u64 * self.stride) as wgpu::DynamicOffset
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

fn object_stride(alignment: u64) -> u64 {
    wgpu::util::align_to(std::mem::size_of::<ObjectUniform>() as u64, alignment)
}

/// Lays the objects out `stride` bytes apart.
fn pack_objects(objects: &[ObjectUniform], stride: u64) -> Vec<u8> {
    let stride = stride as usize;
    let mut bytes = vec![0u8; stride * objects.len()];

    for (chunk, object) in bytes.chunks_exact_mut(stride).zip(objects) {
        let object_bytes = bytemuck::bytes_of(object);
        chunk[..object_bytes.len()].copy_from_slice(object_bytes);
    }

    bytes
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    #[test]
    fn stride_respects_offset_alignment() {
        assert_eq!(object_stride(256), 256);
        assert_eq!(object_stride(64), 256);
        assert_eq!(object_stride(16), 208);
    }

    #[test]
    fn objects_are_packed_at_stride() {
        let first = ObjectUniform::default();
        let second = ObjectUniform {
            object_color: Vec4::new(0.25, 0.5, 0.75, 1.0),
            ..Default::default()
        };

        let bytes = pack_objects(&[first, second], 256);

        assert_eq!(bytes.len(), 512);
        assert_eq!(&bytes[..208], bytemuck::bytes_of(&first));
        assert!(bytes[208..256].iter().all(|&byte| byte == 0));
        assert_eq!(&bytes[256..464], bytemuck::bytes_of(&second));
    }
}

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::{
    rendering::shapes::MeshData,
    scene::{MeshKind, MeshLoader},
};

pub struct RenderPrimitive {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl RenderPrimitive {
    pub fn from_mesh(device: &wgpu::Device, name: &str, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} vertex buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} index buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// GPU buffers of the basic shapes, uploaded on demand.
pub struct ShapeMeshes {
    device: wgpu::Device,
    primitives: HashMap<MeshKind, RenderPrimitive>,
}

impl ShapeMeshes {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            device: device.clone(),
            primitives: HashMap::new(),
        }
    }

    pub fn get(&self, kind: MeshKind) -> Option<&RenderPrimitive> {
        self.primitives.get(&kind)
    }
}

impl MeshLoader for ShapeMeshes {
    fn load_mesh(&mut self, kind: MeshKind) -> anyhow::Result<()> {
        if self.primitives.contains_key(&kind) {
            return Ok(());
        }

        let mesh = MeshData::generate(kind);
        if mesh.indices.is_empty() {
            anyhow::bail!("{kind} mesh has no triangles");
        }

        log::debug!(
            "Loaded {kind} mesh with {} vertices and {} triangles",
            mesh.vertices.len(),
            mesh.indices.len() / 3
        );

        let primitive = RenderPrimitive::from_mesh(&self.device, kind.name(), &mesh);
        self.primitives.insert(kind, primitive);

        Ok(())
    }
}

use std::{f32::consts::TAU, mem::offset_of};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use itertools::iproduct;

use crate::scene::MeshKind;

const RADIAL_SEGMENTS: u32 = 36;
const SPHERE_STACKS: u32 = 18;
const TORUS_TUBE_SEGMENTS: u32 = 12;

pub const TORUS_MAIN_RADIUS: f32 = 1.0;
pub const TORUS_TUBE_RADIUS: f32 = 0.1;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3, tex_coords: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coords,
        }
    }
}

pub const VERTEX_BUFFER_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, position) as wgpu::BufferAddress,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, normal) as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, tex_coords) as wgpu::BufferAddress,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32x2,
        },
    ],
};

/// Indexed triangle list, counter-clockwise when seen from the outside.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn generate(kind: MeshKind) -> Self {
        match kind {
            MeshKind::Plane => plane(),
            MeshKind::Box => cube(),
            MeshKind::Sphere => sphere(),
            MeshKind::Cylinder => cylinder(),
            MeshKind::Torus => torus(),
            MeshKind::Prism => prism(),
        }
    }

    /// Quad spanning `center ± half_u ± half_v`. `half_u × half_v` must point along `normal`.
    fn push_quad(&mut self, center: Vec3, half_u: Vec3, half_v: Vec3, normal: Vec3) {
        let base = self.vertices.len() as u32;

        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            self.vertices.push(Vertex::new(
                center + half_u * su + half_v * sv,
                normal,
                Vec2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5),
            ));
        }

        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Parametric patch over `(s, t) ∈ [0,1]²`. Increasing `s` crossed with
    /// increasing `t` must point outwards.
    fn push_grid(&mut self, columns: u32, rows: u32, surface: impl Fn(f32, f32) -> (Vec3, Vec3)) {
        let base = self.vertices.len() as u32;

        for (row, column) in iproduct!(0..=rows, 0..=columns) {
            let s = column as f32 / columns as f32;
            let t = row as f32 / rows as f32;
            let (position, normal) = surface(s, t);
            self.vertices
                .push(Vertex::new(position, normal, Vec2::new(s, t)));
        }

        let stride = columns + 1;
        for (row, column) in iproduct!(0..rows, 0..columns) {
            let i0 = base + row * stride + column;
            let i1 = i0 + 1;
            let i2 = i0 + stride;
            let i3 = i2 + 1;
            self.indices.extend_from_slice(&[i0, i1, i3, i0, i3, i2]);
        }
    }

    /// Triangle fan closing a cylinder end at height `y`.
    fn push_disc(&mut self, y: f32, normal: Vec3) {
        let center = self.vertices.len() as u32;
        self.vertices.push(Vertex::new(
            Vec3::new(0.0, y, 0.0),
            normal,
            Vec2::splat(0.5),
        ));

        for segment in 0..=RADIAL_SEGMENTS {
            let angle = segment as f32 / RADIAL_SEGMENTS as f32 * TAU;
            let (sin, cos) = angle.sin_cos();
            self.vertices.push(Vertex::new(
                Vec3::new(sin, y, cos),
                normal,
                Vec2::new(0.5 + 0.5 * sin, 0.5 + 0.5 * cos),
            ));
        }

        for segment in 0..RADIAL_SEGMENTS {
            let a = center + 1 + segment;
            let b = a + 1;
            if normal.y > 0.0 {
                self.indices.extend_from_slice(&[center, a, b]);
            } else {
                self.indices.extend_from_slice(&[center, b, a]);
            }
        }
    }
}

/// The XZ square [-1, 1]², facing +Y.
fn plane() -> MeshData {
    let mut mesh = MeshData::default();
    mesh.push_quad(Vec3::ZERO, Vec3::X, Vec3::NEG_Z, Vec3::Y);
    mesh
}

/// Unit cube centred on the origin.
fn cube() -> MeshData {
    let mut mesh = MeshData::default();

    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    for (normal, u, v) in faces {
        mesh.push_quad(normal * 0.5, u * 0.5, v * 0.5, normal);
    }

    mesh
}

/// Radius 1, poles on the Y axis.
fn sphere() -> MeshData {
    let mut mesh = MeshData::default();

    mesh.push_grid(RADIAL_SEGMENTS, SPHERE_STACKS, |s, t| {
        let longitude = s * TAU;
        let latitude = (t - 0.5) * std::f32::consts::PI;
        let normal = Vec3::new(
            latitude.cos() * longitude.sin(),
            latitude.sin(),
            latitude.cos() * longitude.cos(),
        );
        (normal, normal)
    });

    mesh
}

/// Radius 1, from y = 0 to y = 1, capped at both ends.
fn cylinder() -> MeshData {
    let mut mesh = MeshData::default();

    mesh.push_grid(RADIAL_SEGMENTS, 1, |s, t| {
        let (sin, cos) = (s * TAU).sin_cos();
        (Vec3::new(sin, t, cos), Vec3::new(sin, 0.0, cos))
    });
    mesh.push_disc(1.0, Vec3::Y);
    mesh.push_disc(0.0, Vec3::NEG_Y);

    mesh
}

/// Ring around the Z axis in the XY plane.
fn torus() -> MeshData {
    let mut mesh = MeshData::default();

    mesh.push_grid(RADIAL_SEGMENTS, TORUS_TUBE_SEGMENTS, |s, t| {
        let (main_sin, main_cos) = (s * TAU).sin_cos();
        let (tube_sin, tube_cos) = (t * TAU).sin_cos();
        let radial = Vec3::new(main_cos, main_sin, 0.0);
        let normal = radial * tube_cos + Vec3::Z * tube_sin;
        (
            radial * TORUS_MAIN_RADIUS + normal * TORUS_TUBE_RADIUS,
            normal,
        )
    });

    mesh
}

/// Triangle in the XZ plane extruded over y ∈ [-0.5, 0.5].
fn prism() -> MeshData {
    let mut mesh = MeshData::default();

    let corners = [
        Vec3::new(-0.5, 0.0, 0.5),
        Vec3::new(0.5, 0.0, 0.5),
        Vec3::new(0.0, 0.0, -0.5),
    ];
    let uvs = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.5, 1.0)];
    let half_height = Vec3::new(0.0, 0.5, 0.0);

    for (normal, order) in [(Vec3::Y, [0, 1, 2]), (Vec3::NEG_Y, [0, 2, 1])] {
        let base = mesh.vertices.len() as u32;
        for index in order {
            mesh.vertices.push(Vertex::new(
                corners[index] + half_height * normal.y,
                normal,
                uvs[index],
            ));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2]);
    }

    for index in 0..corners.len() {
        let start = corners[index];
        let end = corners[(index + 1) % corners.len()];
        let edge = end - start;
        let normal = edge.cross(Vec3::Y).normalize();
        mesh.push_quad((start + end) * 0.5, edge * 0.5, half_height, normal);
    }

    mesh
}

//! Recording fakes for the scene traits, shared by unit and integration tests.

use std::collections::HashMap;

use glam::{Mat4, Vec2, Vec3, Vec4};
use image::RgbaImage;

use crate::scene::{
    texture_registry::check_dimensions, MeshDrawer, MeshKind, MeshLoader, TextureBackend,
    TextureError, TextureHandle, UniformSink,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub tag: String,
    pub width: u32,
    pub height: u32,
    pub first_pixel: [u8; 4],
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub uploads: Vec<Upload>,
    pub bindings: Vec<(usize, TextureHandle)>,
    pub released: Vec<TextureHandle>,
    /// Uploads with a larger side are refused, like a device size limit.
    pub max_dimension: Option<u32>,
    next_handle: u32,
}

impl RecordingBackend {
    pub fn with_max_dimension(max: u32) -> Self {
        Self {
            max_dimension: Some(max),
            ..Self::default()
        }
    }
}

impl TextureBackend for RecordingBackend {
    fn upload(&mut self, tag: &str, image: &RgbaImage) -> Result<TextureHandle, TextureError> {
        if let Some(max) = self.max_dimension {
            check_dimensions(tag, image, max)?;
        }

        self.uploads.push(Upload {
            tag: tag.to_string(),
            width: image.width(),
            height: image.height(),
            first_pixel: image.get_pixel(0, 0).0,
        });

        // Start above zero so handles and slots never coincide by accident.
        self.next_handle += 1;
        Ok(TextureHandle(100 + self.next_handle))
    }

    fn bind(&mut self, slot: usize, handle: TextureHandle) {
        self.bindings.push((slot, handle));
    }

    fn release(&mut self, handle: TextureHandle) {
        self.released.push(handle);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Mat4(Mat4),
    Vec4(Vec4),
    Vec3(Vec3),
    Vec2(Vec2),
    Float(f32),
    Int(i32),
    Bool(bool),
    Sampler(u32),
}

/// Keeps the latest value per uniform and a snapshot of that state per draw.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub state: HashMap<String, UniformValue>,
    pub draws: Vec<(MeshKind, HashMap<String, UniformValue>)>,
}

impl RecordingSink {
    fn set(&mut self, name: &str, value: UniformValue) {
        self.state.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.state.get(name)
    }
}

impl UniformSink for RecordingSink {
    fn set_mat4(&mut self, name: &str, value: Mat4) {
        self.set(name, UniformValue::Mat4(value));
    }

    fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.set(name, UniformValue::Vec4(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.set(name, UniformValue::Vec3(value));
    }

    fn set_vec2(&mut self, name: &str, value: Vec2) {
        self.set(name, UniformValue::Vec2(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.set(name, UniformValue::Float(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.set(name, UniformValue::Int(value));
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.set(name, UniformValue::Bool(value));
    }

    fn set_sampler(&mut self, name: &str, slot: u32) {
        self.set(name, UniformValue::Sampler(slot));
    }
}

impl MeshDrawer for RecordingSink {
    fn draw_mesh(&mut self, kind: MeshKind) {
        self.draws.push((kind, self.state.clone()));
    }
}

#[derive(Debug, Default)]
pub struct RecordingMeshes {
    pub loaded: Vec<MeshKind>,
}

impl MeshLoader for RecordingMeshes {
    fn load_mesh(&mut self, kind: MeshKind) -> anyhow::Result<()> {
        self.loaded.push(kind);
        Ok(())
    }
}

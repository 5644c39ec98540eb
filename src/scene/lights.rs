use glam::Vec3;

use crate::scene::uniforms::{self, light_uniform, UniformSink};

pub const LIGHT_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub position: Vec3,
    pub ambient_color: Vec3,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    pub focal_strength: f32,
    pub specular_intensity: f32,
}

/// The fixed set of scene lights. Configured once, static afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    pub sources: [LightSource; LIGHT_COUNT],
    pub enabled: bool,
}

impl Lighting {
    pub fn apply(&self, sink: &mut impl UniformSink) {
        for (index, light) in self.sources.iter().enumerate() {
            sink.set_vec3(
                &light_uniform(index, uniforms::LIGHT_POSITION),
                light.position,
            );
            sink.set_vec3(
                &light_uniform(index, uniforms::LIGHT_AMBIENT_COLOR),
                light.ambient_color,
            );
            sink.set_vec3(
                &light_uniform(index, uniforms::LIGHT_DIFFUSE_COLOR),
                light.diffuse_color,
            );
            sink.set_vec3(
                &light_uniform(index, uniforms::LIGHT_SPECULAR_COLOR),
                light.specular_color,
            );
            sink.set_float(
                &light_uniform(index, uniforms::LIGHT_FOCAL_STRENGTH),
                light.focal_strength,
            );
            sink.set_float(
                &light_uniform(index, uniforms::LIGHT_SPECULAR_INTENSITY),
                light.specular_intensity,
            );
        }

        sink.set_bool(uniforms::USE_LIGHTING, self.enabled);
    }
}

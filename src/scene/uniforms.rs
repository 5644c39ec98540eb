use glam::{Mat4, Vec2, Vec3, Vec4};

pub const MODEL: &str = "model";
pub const OBJECT_COLOR: &str = "objectColor";
pub const OBJECT_TEXTURE: &str = "objectTexture";
pub const USE_TEXTURE: &str = "bUseTexture";
pub const USE_LIGHTING: &str = "bUseLighting";
pub const UV_SCALE: &str = "UVscale";

pub const MATERIAL_AMBIENT_COLOR: &str = "material.ambientColor";
pub const MATERIAL_AMBIENT_STRENGTH: &str = "material.ambientStrength";
pub const MATERIAL_DIFFUSE_COLOR: &str = "material.diffuseColor";
pub const MATERIAL_SPECULAR_COLOR: &str = "material.specularColor";
pub const MATERIAL_SHININESS: &str = "material.shininess";

pub const LIGHT_SOURCES: &str = "lightSources";

pub const LIGHT_POSITION: &str = "position";
pub const LIGHT_AMBIENT_COLOR: &str = "ambientColor";
pub const LIGHT_DIFFUSE_COLOR: &str = "diffuseColor";
pub const LIGHT_SPECULAR_COLOR: &str = "specularColor";
pub const LIGHT_FOCAL_STRENGTH: &str = "focalStrength";
pub const LIGHT_SPECULAR_INTENSITY: &str = "specularIntensity";

/// `lightSources[index].field`
pub fn light_uniform(index: usize, field: &str) -> String {
    format!("{LIGHT_SOURCES}[{index}].{field}")
}

/// Receives named shader parameters for the next draw call.
///
/// Values persist until overwritten, like uniforms on a bound program.
pub trait UniformSink {
    fn set_mat4(&mut self, name: &str, value: Mat4);
    fn set_vec4(&mut self, name: &str, value: Vec4);
    fn set_vec3(&mut self, name: &str, value: Vec3);
    fn set_vec2(&mut self, name: &str, value: Vec2);
    fn set_float(&mut self, name: &str, value: f32);
    fn set_int(&mut self, name: &str, value: i32);
    fn set_bool(&mut self, name: &str, value: bool);
    fn set_sampler(&mut self, name: &str, slot: u32);
}

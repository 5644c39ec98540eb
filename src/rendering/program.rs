use std::collections::HashSet;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::scene::{
    uniforms::{self, UniformSink},
    MeshDrawer, MeshKind, LIGHT_COUNT,
};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    pub ambient_color: Vec3,
    pub ambient_strength: f32,
    pub diffuse_color: Vec3,
    pub shininess: f32,
    pub specular_color: Vec3,
    _padding: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub position: Vec3,
    pub focal_strength: f32,
    pub ambient_color: Vec3,
    pub specular_intensity: f32,
    pub diffuse_color: Vec3,
    _padding0: f32,
    pub specular_color: Vec3,
    _padding1: f32,
}

/// Per-draw state, bound with a dynamic offset.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: Mat4,
    pub normal_matrix: Mat4,
    pub object_color: Vec4,
    pub uv_scale: Vec2,
    pub use_texture: u32,
    pub texture_slot: u32,
    pub material: MaterialUniform,
}

impl Default for ObjectUniform {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            normal_matrix: Mat4::IDENTITY,
            object_color: Vec4::ONE,
            uv_scale: Vec2::ONE,
            use_texture: 0,
            texture_slot: 0,
            material: MaterialUniform::default(),
        }
    }
}

/// Per-frame state: camera and lights.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: Mat4,
    pub view_position: Vec3,
    pub use_lighting: u32,
    pub lights: [LightUniform; LIGHT_COUNT],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialField {
    AmbientColor,
    AmbientStrength,
    DiffuseColor,
    SpecularColor,
    Shininess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightField {
    Position,
    AmbientColor,
    DiffuseColor,
    SpecularColor,
    FocalStrength,
    SpecularIntensity,
}

/// A shader parameter name resolved to a field of the uniform blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformName {
    Model,
    ObjectColor,
    ObjectTexture,
    UseTexture,
    UseLighting,
    UvScale,
    Material(MaterialField),
    Light(usize, LightField),
}

impl UniformName {
    pub fn parse(name: &str) -> Option<Self> {
        let parsed = match name {
            uniforms::MODEL => Self::Model,
            uniforms::OBJECT_COLOR => Self::ObjectColor,
            uniforms::OBJECT_TEXTURE => Self::ObjectTexture,
            uniforms::USE_TEXTURE => Self::UseTexture,
            uniforms::USE_LIGHTING => Self::UseLighting,
            uniforms::UV_SCALE => Self::UvScale,
            uniforms::MATERIAL_AMBIENT_COLOR => Self::Material(MaterialField::AmbientColor),
            uniforms::MATERIAL_AMBIENT_STRENGTH => Self::Material(MaterialField::AmbientStrength),
            uniforms::MATERIAL_DIFFUSE_COLOR => Self::Material(MaterialField::DiffuseColor),
            uniforms::MATERIAL_SPECULAR_COLOR => Self::Material(MaterialField::SpecularColor),
            uniforms::MATERIAL_SHININESS => Self::Material(MaterialField::Shininess),
            _ => return Self::parse_light(name),
        };

        Some(parsed)
    }

    fn parse_light(name: &str) -> Option<Self> {
        let rest = name
            .strip_prefix(uniforms::LIGHT_SOURCES)?
            .strip_prefix('[')?;
        let (index, field) = rest.split_once("].")?;

        let index: usize = index.parse().ok()?;
        if index >= LIGHT_COUNT {
            return None;
        }

        let field = match field {
            uniforms::LIGHT_POSITION => LightField::Position,
            uniforms::LIGHT_AMBIENT_COLOR => LightField::AmbientColor,
            uniforms::LIGHT_DIFFUSE_COLOR => LightField::DiffuseColor,
            uniforms::LIGHT_SPECULAR_COLOR => LightField::SpecularColor,
            uniforms::LIGHT_FOCAL_STRENGTH => LightField::FocalStrength,
            uniforms::LIGHT_SPECULAR_INTENSITY => LightField::SpecularIntensity,
            _ => return None,
        };

        Some(Self::Light(index, field))
    }
}

/// CPU copy of the scene program's uniforms. Writes through [`UniformSink`]
/// are resolved by name; names the program does not have are ignored.
#[derive(Debug, Default)]
pub struct ProgramUniforms {
    pub frame: FrameUniform,
    pub object: ObjectUniform,
    rejected: HashSet<String>,
}

impl ProgramUniforms {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve(&mut self, name: &str) -> Option<UniformName> {
        let resolved = UniformName::parse(name);
        if resolved.is_none() {
            self.reject(name, "unknown uniform");
        }
        resolved
    }

    fn reject(&mut self, name: &str, reason: &str) {
        // Warn once per name, draws happen every frame
        if self.rejected.insert(name.to_string()) {
            log::warn!("Ignoring write to '{name}': {reason}");
        }
    }

    fn light_mut(&mut self, index: usize) -> &mut LightUniform {
        &mut self.frame.lights[index]
    }
}

impl UniformSink for ProgramUniforms {
    fn set_mat4(&mut self, name: &str, value: Mat4) {
        match self.resolve(name) {
            Some(UniformName::Model) => {
                self.object.model = value;
                self.object.normal_matrix = value.inverse().transpose();
            }
            Some(_) => self.reject(name, "not a mat4"),
            None => {}
        }
    }

    fn set_vec4(&mut self, name: &str, value: Vec4) {
        match self.resolve(name) {
            Some(UniformName::ObjectColor) => self.object.object_color = value,
            Some(_) => self.reject(name, "not a vec4"),
            None => {}
        }
    }

    fn set_vec3(&mut self, name: &str, value: Vec3) {
        match self.resolve(name) {
            Some(UniformName::Material(MaterialField::AmbientColor)) => {
                self.object.material.ambient_color = value
            }
            Some(UniformName::Material(MaterialField::DiffuseColor)) => {
                self.object.material.diffuse_color = value
            }
            Some(UniformName::Material(MaterialField::SpecularColor)) => {
                self.object.material.specular_color = value
            }
            Some(UniformName::Light(index, LightField::Position)) => {
                self.light_mut(index).position = value
            }
            Some(UniformName::Light(index, LightField::AmbientColor)) => {
                self.light_mut(index).ambient_color = value
            }
            Some(UniformName::Light(index, LightField::DiffuseColor)) => {
                self.light_mut(index).diffuse_color = value
            }
            Some(UniformName::Light(index, LightField::SpecularColor)) => {
                self.light_mut(index).specular_color = value
            }
            Some(_) => self.reject(name, "not a vec3"),
            None => {}
        }
    }

    fn set_vec2(&mut self, name: &str, value: Vec2) {
        match self.resolve(name) {
            Some(UniformName::UvScale) => self.object.uv_scale = value,
            Some(_) => self.reject(name, "not a vec2"),
            None => {}
        }
    }

    fn set_float(&mut self, name: &str, value: f32) {
        match self.resolve(name) {
            Some(UniformName::Material(MaterialField::AmbientStrength)) => {
                self.object.material.ambient_strength = value
            }
            Some(UniformName::Material(MaterialField::Shininess)) => {
                self.object.material.shininess = value
            }
            Some(UniformName::Light(index, LightField::FocalStrength)) => {
                self.light_mut(index).focal_strength = value
            }
            Some(UniformName::Light(index, LightField::SpecularIntensity)) => {
                self.light_mut(index).specular_intensity = value
            }
            Some(_) => self.reject(name, "not a float"),
            None => {}
        }
    }

    fn set_int(&mut self, name: &str, value: i32) {
        match self.resolve(name) {
            Some(UniformName::ObjectTexture) => match u32::try_from(value) {
                Ok(slot) => self.object.texture_slot = slot,
                Err(_) => self.reject(name, "negative texture slot"),
            },
            Some(UniformName::UseTexture) => self.object.use_texture = (value != 0) as u32,
            Some(UniformName::UseLighting) => self.frame.use_lighting = (value != 0) as u32,
            Some(_) => self.reject(name, "not an int"),
            None => {}
        }
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        match self.resolve(name) {
            Some(UniformName::UseTexture) => self.object.use_texture = value as u32,
            Some(UniformName::UseLighting) => self.frame.use_lighting = value as u32,
            Some(_) => self.reject(name, "not a bool"),
            None => {}
        }
    }

    fn set_sampler(&mut self, name: &str, slot: u32) {
        match self.resolve(name) {
            Some(UniformName::ObjectTexture) => self.object.texture_slot = slot,
            Some(_) => self.reject(name, "not a sampler"),
            None => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub mesh: MeshKind,
    pub object: ObjectUniform,
}

/// Collects the draws of one frame, snapshotting the object uniforms at each
/// draw call.
pub struct FrameRecorder<'a> {
    uniforms: &'a mut ProgramUniforms,
    draws: Vec<DrawCommand>,
}

impl<'a> FrameRecorder<'a> {
    pub fn new(uniforms: &'a mut ProgramUniforms) -> Self {
        Self {
            uniforms,
            draws: Vec::new(),
        }
    }

    pub fn finish(self) -> Vec<DrawCommand> {
        self.draws
    }
}

impl UniformSink for FrameRecorder<'_> {
    fn set_mat4(&mut self, name: &str, value: Mat4) {
        self.uniforms.set_mat4(name, value);
    }

    fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.uniforms.set_vec4(name, value);
    }

    fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.uniforms.set_vec3(name, value);
    }

    fn set_vec2(&mut self, name: &str, value: Vec2) {
        self.uniforms.set_vec2(name, value);
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.uniforms.set_float(name, value);
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.uniforms.set_int(name, value);
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.uniforms.set_bool(name, value);
    }

    fn set_sampler(&mut self, name: &str, slot: u32) {
        self.uniforms.set_sampler(name, slot);
    }
}

impl MeshDrawer for FrameRecorder<'_> {
    fn draw_mesh(&mut self, kind: MeshKind) {
        self.draws.push(DrawCommand {
            mesh: kind,
            object: self.uniforms.object,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::uniforms::light_uniform;

    #[test]
    fn layouts_match_the_shader() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);
        assert_eq!(std::mem::size_of::<LightUniform>(), 64);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 208);
        assert_eq!(std::mem::size_of::<FrameUniform>(), 336);
    }

    #[test]
    fn parses_every_program_uniform() {
        assert_eq!(UniformName::parse("model"), Some(UniformName::Model));
        assert_eq!(UniformName::parse("UVscale"), Some(UniformName::UvScale));
        assert_eq!(
            UniformName::parse("material.shininess"),
            Some(UniformName::Material(MaterialField::Shininess))
        );
        assert_eq!(
            UniformName::parse("lightSources[3].specularIntensity"),
            Some(UniformName::Light(3, LightField::SpecularIntensity))
        );
    }

    #[test]
    fn rejects_unknown_names() {
        for name in [
            "",
            "uvScale",
            "material.roughness",
            "lightSources[4].position",
            "lightSources[x].position",
            "lightSources[0]position",
            "lightSources[0].radius",
        ] {
            assert_eq!(UniformName::parse(name), None, "{name}");
        }
    }

    #[test]
    fn writes_land_in_their_blocks() {
        let mut program = ProgramUniforms::new();
        let model = Mat4::from_scale(Vec3::new(2.0, 4.0, 8.0));

        program.set_mat4(uniforms::MODEL, model);
        program.set_bool(uniforms::USE_TEXTURE, true);
        program.set_sampler(uniforms::OBJECT_TEXTURE, 5);
        program.set_float(uniforms::MATERIAL_SHININESS, 8.0);
        program.set_vec3(&light_uniform(1, uniforms::LIGHT_POSITION), Vec3::X);
        program.set_float(&light_uniform(1, uniforms::LIGHT_FOCAL_STRENGTH), 25.0);
        program.set_bool(uniforms::USE_LIGHTING, true);

        assert_eq!(program.object.model, model);
        assert!(program
            .object
            .normal_matrix
            .abs_diff_eq(Mat4::from_scale(Vec3::new(0.5, 0.25, 0.125)), 1e-6));
        assert_eq!(program.object.use_texture, 1);
        assert_eq!(program.object.texture_slot, 5);
        assert_eq!(program.object.material.shininess, 8.0);
        assert_eq!(program.frame.lights[1].position, Vec3::X);
        assert_eq!(program.frame.lights[1].focal_strength, 25.0);
        assert_eq!(program.frame.use_lighting, 1);
    }

    #[test]
    fn mismatched_types_are_ignored() {
        let mut program = ProgramUniforms::new();

        program.set_float(uniforms::OBJECT_COLOR, 1.0);
        program.set_vec3(&light_uniform(0, uniforms::LIGHT_FOCAL_STRENGTH), Vec3::ONE);
        program.set_vec4("noSuchUniform", Vec4::ZERO);

        assert_eq!(program.object, ObjectUniform::default());
        assert_eq!(program.frame, FrameUniform::default());
    }

    #[test]
    fn recorder_snapshots_state_per_draw() {
        let mut program = ProgramUniforms::new();
        let mut recorder = FrameRecorder::new(&mut program);

        recorder.set_vec4(uniforms::OBJECT_COLOR, Vec4::new(1.0, 0.0, 0.0, 1.0));
        recorder.draw_mesh(MeshKind::Sphere);
        recorder.set_vec4(uniforms::OBJECT_COLOR, Vec4::new(0.0, 1.0, 0.0, 1.0));
        recorder.draw_mesh(MeshKind::Box);

        let draws = recorder.finish();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].mesh, MeshKind::Sphere);
        assert_eq!(draws[0].object.object_color, Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(draws[1].object.object_color, Vec4::new(0.0, 1.0, 0.0, 1.0));

        // State persists into the next frame like a bound program
        assert_eq!(program.object.object_color, Vec4::new(0.0, 1.0, 0.0, 1.0));
    }
}

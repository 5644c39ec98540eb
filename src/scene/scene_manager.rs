use std::{collections::BTreeSet, path::PathBuf};

use anyhow::Context;
use glam::{Vec2, Vec4};
use thiserror::Error;

use crate::scene::{
    material_manager::MaterialManager,
    meshes::{MeshDrawer, MeshKind, MeshLoader},
    still_life::{SceneDescription, SceneObject, Surface},
    texture_registry::{TextureBackend, TextureRegistry},
    transform::TransformSpec,
    uniforms::{self, UniformSink},
};

/// Drawn instead of a texture that never got registered.
pub const MISSING_TEXTURE_COLOR: Vec4 = Vec4::new(1.0, 0.0, 1.0, 1.0);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("no texture registered for tag '{0}'")]
    UnknownTexture(String),
    #[error("no material defined for tag '{0}'")]
    UnknownMaterial(String),
}

/// Owns the texture and material registries of one scene and turns its
/// description into uniform writes and draw calls.
pub struct SceneManager<B> {
    asset_dir: PathBuf,
    description: SceneDescription,
    textures: TextureRegistry<B>,
    materials: MaterialManager,
}

impl<B: TextureBackend> SceneManager<B> {
    pub fn new(backend: B, asset_dir: impl Into<PathBuf>, description: SceneDescription) -> Self {
        Self {
            asset_dir: asset_dir.into(),
            description,
            textures: TextureRegistry::new(backend),
            materials: MaterialManager::new(),
        }
    }

    /// Loads textures, defines materials, configures the lights and loads every
    /// mesh kind once. Texture failures only cost the affected tag.
    pub fn prepare_scene(
        &mut self,
        sink: &mut impl UniformSink,
        meshes: &mut impl MeshLoader,
    ) -> anyhow::Result<()> {
        self.load_scene_textures();
        self.define_object_materials();
        self.setup_scene_lights(sink);

        for kind in MeshKind::ALL {
            meshes
                .load_mesh(kind)
                .with_context(|| format!("Failed to load {kind} mesh"))?;
        }

        self.report_unresolved_tags();

        Ok(())
    }

    /// Registers every texture of the description, then binds them. Returns the
    /// number of bound textures.
    pub fn load_scene_textures(&mut self) -> usize {
        for source in &self.description.textures {
            let path = self.asset_dir.join(&source.path);
            if let Err(err) = self.textures.register(&path, source.tag.as_str()) {
                log::debug!("Texture '{}' left unregistered: {err}", source.tag);
            }
        }

        let bound = self.textures.bind_all();
        log::info!(
            "Bound {bound} of {} scene textures",
            self.description.textures.len()
        );

        bound
    }

    pub fn define_object_materials(&mut self) {
        for (tag, material) in &self.description.materials {
            self.materials.define(tag.as_str(), *material);
        }
    }

    pub fn setup_scene_lights(&self, sink: &mut impl UniformSink) {
        self.description.lighting.apply(sink);
    }

    pub fn render_scene<T>(&self, target: &mut T)
    where
        T: UniformSink + MeshDrawer,
    {
        for object in &self.description.objects {
            if let Err(err) = self.draw_object(object, target) {
                log::trace!("Drawing {}: {}", object.name, err);
            }
        }
    }

    /// Pushes the object's uniforms and draws it. The mesh is drawn even when a
    /// tag does not resolve; the first unresolved tag is returned.
    pub fn draw_object<T>(&self, object: &SceneObject, target: &mut T) -> Result<(), SceneError>
    where
        T: UniformSink + MeshDrawer,
    {
        set_transformations(target, &object.transform);

        let uv_scale = object.uv_scale.unwrap_or(Vec2::ONE);
        set_texture_uv_scale(target, uv_scale.x, uv_scale.y);

        let surface = match object.surface {
            Surface::Color(color) => {
                set_shader_color(target, Vec4::from_array(color));
                Ok(())
            }
            Surface::Texture(tag) => self.set_shader_texture(target, tag),
        };

        let material = match object.material {
            Some(tag) => self.set_shader_material(target, tag),
            None => Ok(()),
        };

        target.draw_mesh(object.mesh);

        surface.and(material)
    }

    /// Enables texturing and points the sampler at the tag's slot. An unknown
    /// tag falls back to a solid [`MISSING_TEXTURE_COLOR`].
    pub fn set_shader_texture(
        &self,
        sink: &mut impl UniformSink,
        texture_tag: &str,
    ) -> Result<(), SceneError> {
        match self.textures.find_slot(texture_tag) {
            Some(slot) => {
                sink.set_bool(uniforms::USE_TEXTURE, true);
                sink.set_sampler(uniforms::OBJECT_TEXTURE, slot as u32);
                Ok(())
            }
            None => {
                set_shader_color(sink, MISSING_TEXTURE_COLOR);
                Err(SceneError::UnknownTexture(texture_tag.to_string()))
            }
        }
    }

    /// Forwards the material's fields. An unknown tag leaves the current
    /// material uniforms untouched.
    pub fn set_shader_material(
        &self,
        sink: &mut impl UniformSink,
        material_tag: &str,
    ) -> Result<(), SceneError> {
        let material = self
            .materials
            .find(material_tag)
            .ok_or_else(|| SceneError::UnknownMaterial(material_tag.to_string()))?;

        sink.set_vec3(uniforms::MATERIAL_AMBIENT_COLOR, material.ambient_color);
        sink.set_float(
            uniforms::MATERIAL_AMBIENT_STRENGTH,
            material.ambient_strength,
        );
        sink.set_vec3(uniforms::MATERIAL_DIFFUSE_COLOR, material.diffuse_color);
        sink.set_vec3(uniforms::MATERIAL_SPECULAR_COLOR, material.specular_color);
        sink.set_float(uniforms::MATERIAL_SHININESS, material.shininess);

        Ok(())
    }

    /// Releases every GPU texture owned by the scene.
    pub fn destroy_textures(&mut self) {
        let count = self.textures.len();
        self.textures.release_all();
        log::debug!("Released {count} scene textures");
    }

    pub fn textures(&self) -> &TextureRegistry<B> {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureRegistry<B> {
        &mut self.textures
    }

    pub fn materials(&self) -> &MaterialManager {
        &self.materials
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.description.objects
    }

    fn report_unresolved_tags(&self) {
        let mut missing_textures = BTreeSet::new();
        let mut missing_materials = BTreeSet::new();

        for object in &self.description.objects {
            if let Some(tag) = object.texture() {
                if self.textures.find_slot(tag).is_none() {
                    missing_textures.insert(tag);
                }
            }
            if let Some(tag) = object.material {
                if self.materials.find(tag).is_none() {
                    missing_materials.insert(tag);
                }
            }
        }

        for tag in missing_textures {
            log::warn!("Texture '{tag}' is not loaded, objects using it are drawn in magenta");
        }
        for tag in missing_materials {
            log::warn!("Material '{tag}' is not defined, objects using it keep the previous material");
        }
    }
}

pub fn set_transformations(sink: &mut impl UniformSink, transform: &TransformSpec) {
    sink.set_mat4(uniforms::MODEL, transform.model_matrix());
}

/// Disables texturing and sets a solid colour.
pub fn set_shader_color(sink: &mut impl UniformSink, color: Vec4) {
    sink.set_bool(uniforms::USE_TEXTURE, false);
    sink.set_vec4(uniforms::OBJECT_COLOR, color);
}

pub fn set_texture_uv_scale(sink: &mut impl UniformSink, u: f32, v: f32) {
    sink.set_vec2(uniforms::UV_SCALE, Vec2::new(u, v));
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use image::{DynamicImage, RgbImage};

    use super::*;
    use crate::scene::{
        lights::{LightSource, Lighting},
        material_manager::Material,
        testing::{RecordingBackend, RecordingMeshes, RecordingSink, UniformValue},
        TextureSource,
    };

    fn lighting() -> Lighting {
        let light = LightSource {
            position: Vec3::Y,
            ambient_color: Vec3::ONE,
            diffuse_color: Vec3::ONE,
            specular_color: Vec3::ONE,
            focal_strength: 1.0,
            specular_intensity: 1.0,
        };
        Lighting {
            sources: [light; 4],
            enabled: true,
        }
    }

    fn material(shininess: f32) -> Material {
        Material {
            ambient_color: Vec3::ONE,
            ambient_strength: 0.2,
            diffuse_color: Vec3::new(0.8, 0.1, 0.1),
            specular_color: Vec3::ONE,
            shininess,
        }
    }

    fn object(surface: Surface, material: Option<&'static str>) -> SceneObject {
        SceneObject {
            name: "test object",
            mesh: MeshKind::Sphere,
            transform: TransformSpec::new(
                Vec3::new(2.0, 1.0, 1.0),
                Vec3::new(0.0, 90.0, 0.0),
                Vec3::X,
            ),
            surface,
            material,
            uv_scale: None,
        }
    }

    fn manager(objects: Vec<SceneObject>) -> SceneManager<RecordingBackend> {
        let mut description = SceneDescription::empty(lighting());
        description.materials = vec![
            ("shine".to_string(), material(8.0)),
            ("matte".to_string(), material(1.0)),
        ];
        description.objects = objects;

        let mut manager = SceneManager::new(RecordingBackend::default(), "assets", description);
        manager.define_object_materials();
        for tag in ["wood", "apple"] {
            manager
                .textures_mut()
                .register_image(tag, DynamicImage::ImageRgb8(RgbImage::new(2, 2)))
                .unwrap();
        }
        manager.textures_mut().bind_all();
        manager
    }

    #[test]
    fn textured_object_selects_its_slot() {
        let object = object(Surface::Texture("apple"), None);
        let manager = manager(vec![object]);
        let mut sink = RecordingSink::default();

        manager.draw_object(&object, &mut sink).unwrap();

        assert_eq!(sink.draws.len(), 1);
        let (kind, state) = &sink.draws[0];
        assert_eq!(*kind, MeshKind::Sphere);
        assert_eq!(state["bUseTexture"], UniformValue::Bool(true));
        assert_eq!(state["objectTexture"], UniformValue::Sampler(1));
        assert_eq!(state["UVscale"], UniformValue::Vec2(Vec2::ONE));
        assert_eq!(
            state["model"],
            UniformValue::Mat4(object.transform.model_matrix())
        );
    }

    #[test]
    fn colored_object_disables_texturing() {
        let object = object(Surface::Color([0.5, 0.25, 0.0, 1.0]), None);
        let manager = manager(vec![object]);
        let mut sink = RecordingSink::default();

        manager.draw_object(&object, &mut sink).unwrap();

        let state = &sink.draws[0].1;
        assert_eq!(state["bUseTexture"], UniformValue::Bool(false));
        assert_eq!(
            state["objectColor"],
            UniformValue::Vec4(Vec4::new(0.5, 0.25, 0.0, 1.0))
        );
    }

    #[test]
    fn unknown_texture_is_reported_and_still_drawn() {
        let object = object(Surface::Texture("marble"), None);
        let manager = manager(vec![object]);
        let mut sink = RecordingSink::default();

        let err = manager.draw_object(&object, &mut sink).unwrap_err();

        assert_eq!(err, SceneError::UnknownTexture("marble".to_string()));
        assert_eq!(sink.draws.len(), 1);
        let state = &sink.draws[0].1;
        assert_eq!(state["bUseTexture"], UniformValue::Bool(false));
        assert_eq!(state["objectColor"], UniformValue::Vec4(MISSING_TEXTURE_COLOR));
    }

    #[test]
    fn material_fields_are_forwarded() {
        let manager = manager(Vec::new());
        let mut sink = RecordingSink::default();

        manager.set_shader_material(&mut sink, "shine").unwrap();

        let expected = material(8.0);
        assert_eq!(
            sink.get("material.ambientColor"),
            Some(&UniformValue::Vec3(expected.ambient_color))
        );
        assert_eq!(
            sink.get("material.ambientStrength"),
            Some(&UniformValue::Float(expected.ambient_strength))
        );
        assert_eq!(
            sink.get("material.diffuseColor"),
            Some(&UniformValue::Vec3(expected.diffuse_color))
        );
        assert_eq!(
            sink.get("material.specularColor"),
            Some(&UniformValue::Vec3(expected.specular_color))
        );
        assert_eq!(
            sink.get("material.shininess"),
            Some(&UniformValue::Float(8.0))
        );
    }

    #[test]
    fn unknown_material_leaves_previous_material() {
        let manager = manager(Vec::new());
        let mut sink = RecordingSink::default();
        manager.set_shader_material(&mut sink, "matte").unwrap();

        let err = manager.set_shader_material(&mut sink, "velvet").unwrap_err();

        assert_eq!(err, SceneError::UnknownMaterial("velvet".to_string()));
        assert_eq!(
            sink.get("material.shininess"),
            Some(&UniformValue::Float(1.0))
        );
    }

    #[test]
    fn objects_without_material_inherit_the_previous_one() {
        let objects = vec![
            object(Surface::Texture("wood"), Some("shine")),
            object(Surface::Texture("apple"), None),
            object(Surface::Texture("apple"), Some("matte")),
        ];
        let manager = manager(objects);
        let mut sink = RecordingSink::default();

        manager.render_scene(&mut sink);

        let shininess: Vec<_> = sink
            .draws
            .iter()
            .map(|(_, state)| state["material.shininess"].clone())
            .collect();
        assert_eq!(
            shininess,
            vec![
                UniformValue::Float(8.0),
                UniformValue::Float(8.0),
                UniformValue::Float(1.0)
            ]
        );
    }

    #[test]
    fn render_scene_draws_every_object_in_order() {
        let mut objects = vec![
            object(Surface::Texture("wood"), Some("shine")),
            object(Surface::Texture("missing"), Some("unknown")),
            object(Surface::Color([1.0; 4]), None),
        ];
        objects[0].mesh = MeshKind::Box;
        objects[2].mesh = MeshKind::Torus;
        let manager = manager(objects);
        let mut sink = RecordingSink::default();

        manager.render_scene(&mut sink);

        let kinds: Vec<_> = sink.draws.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, vec![MeshKind::Box, MeshKind::Sphere, MeshKind::Torus]);
    }

    #[test]
    fn prepare_scene_loads_meshes_materials_and_lights() {
        let mut description = SceneDescription::empty(lighting());
        description.textures = vec![TextureSource::new("textures/nope.jpg", "nope")];
        description.materials = vec![("shine".to_string(), material(8.0))];
        let mut manager = SceneManager::new(
            RecordingBackend::default(),
            "/nonexistent-asset-dir",
            description,
        );
        let mut sink = RecordingSink::default();
        let mut meshes = RecordingMeshes::default();

        manager.prepare_scene(&mut sink, &mut meshes).unwrap();

        assert_eq!(meshes.loaded, MeshKind::ALL.to_vec());
        assert!(manager.materials().find("shine").is_some());
        assert!(manager.textures().is_empty());
        assert!(manager.textures().backend().bindings.is_empty());
        assert_eq!(sink.get("bUseLighting"), Some(&UniformValue::Bool(true)));
        assert_eq!(
            sink.get("lightSources[0].position"),
            Some(&UniformValue::Vec3(Vec3::Y))
        );
    }

    #[test]
    fn destroy_textures_releases_each_handle_once() {
        let mut manager = manager(Vec::new());
        let handles: Vec<_> = manager
            .textures()
            .entries()
            .iter()
            .map(|entry| entry.handle)
            .collect();

        manager.destroy_textures();
        manager.destroy_textures();

        assert_eq!(manager.textures().backend().released, handles);
        assert!(manager.textures().is_empty());
    }
}

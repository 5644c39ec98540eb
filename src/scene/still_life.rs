use glam::{Vec2, Vec3};

use crate::scene::{
    lights::{LightSource, Lighting},
    material_manager::Material,
    meshes::MeshKind::{self, *},
    transform::TransformSpec,
};

/// How an object is coloured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    Color([f32; 4]),
    Texture(&'static str),
}

/// One draw in the still-life.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    pub name: &'static str,
    pub mesh: MeshKind,
    pub transform: TransformSpec,
    pub surface: Surface,
    /// `None` leaves the previously set material in place.
    pub material: Option<&'static str>,
    /// `None` draws with a UV scale of (1, 1).
    pub uv_scale: Option<Vec2>,
}

impl SceneObject {
    pub fn texture(&self) -> Option<&'static str> {
        match self.surface {
            Surface::Texture(tag) => Some(tag),
            Surface::Color(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureSource {
    /// Relative to the asset directory.
    pub path: String,
    pub tag: String,
}

impl TextureSource {
    pub fn new(path: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            tag: tag.into(),
        }
    }
}

/// Everything needed to prepare and draw a scene.
#[derive(Debug, Clone)]
pub struct SceneDescription {
    pub textures: Vec<TextureSource>,
    pub materials: Vec<(String, Material)>,
    pub lighting: Lighting,
    pub objects: Vec<SceneObject>,
}

impl SceneDescription {
    /// Apples, a basket and leaves on a table in front of an orchard window.
    pub fn still_life() -> Self {
        Self {
            textures: [
                ("textures/sphere.jpg", "sphere"),
                ("textures/torus.jpg", "torus"),
                ("textures/plane.jpg", "plane"),
                ("textures/cylinder.jpg", "cylinder"),
                ("textures/prism.jpg", "prism"),
                ("textures/orchard.jpg", "plane2"),
            ]
            .into_iter()
            .map(|(path, tag)| TextureSource::new(path, tag))
            .collect(),
            materials: vec![(
                "shine".to_string(),
                Material {
                    ambient_color: Vec3::ONE,
                    ambient_strength: 0.1,
                    diffuse_color: Vec3::ONE,
                    specular_color: Vec3::ONE,
                    shininess: 8.0,
                },
            )],
            lighting: Lighting {
                sources: [
                    light(Vec3::new(0.0, 25.0, -12.0), 0.5),
                    light(Vec3::new(-25.0, 5.0, 0.0), 0.05),
                    light(Vec3::new(25.0, 5.0, 0.0), 0.05),
                    light(Vec3::new(0.0, 0.0, 25.0), 0.05),
                ],
                enabled: true,
            },
            objects: STILL_LIFE.to_vec(),
        }
    }

    /// A description with no textures, materials or objects, lit by `lighting`.
    pub fn empty(lighting: Lighting) -> Self {
        Self {
            textures: Vec::new(),
            materials: Vec::new(),
            lighting,
            objects: Vec::new(),
        }
    }
}

fn light(position: Vec3, specular_intensity: f32) -> LightSource {
    LightSource {
        position,
        ambient_color: Vec3::splat(0.7),
        diffuse_color: Vec3::ONE,
        specular_color: Vec3::ONE,
        focal_strength: 25.01,
        specular_intensity,
    }
}

const fn object(
    name: &'static str,
    mesh: MeshKind,
    scale: [f32; 3],
    rotation_degrees: [f32; 3],
    position: [f32; 3],
    surface: Surface,
    material: Option<&'static str>,
) -> SceneObject {
    SceneObject {
        name,
        mesh,
        transform: TransformSpec::new(
            Vec3::from_array(scale),
            Vec3::from_array(rotation_degrees),
            Vec3::from_array(position),
        ),
        surface,
        material,
        uv_scale: None,
    }
}

use Surface::{Color, Texture};

#[rustfmt::skip]
pub const STILL_LIFE: &[SceneObject] = &[
    object("table", Box, [40.0, 5.0, 20.0], [0.0, 0.0, 0.0], [0.0, -2.5, -2.0], Texture("plane"), Some("shine")),
    object("tablecloth", Plane, [20.0, 25.0, 8.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0], Texture("plane"), Some("shine")),
    object("orchard backdrop", Plane, [20.0, 25.0, 12.0], [90.0, 0.0, 0.0], [0.0, 12.0, -12.0], Texture("plane2"), Some("shine")),
    object("window mullion", Cylinder, [0.1, 23.9, 0.08], [0.0, 0.0, 0.0], [-20.0, 0.0, -12.0], Color([1.0, 1.0, 1.0, 1.0]), None),
    object("window mullion", Cylinder, [0.1, 23.9, 0.08], [0.0, 0.0, 0.0], [20.0, 0.0, -12.0], Color([1.0, 1.0, 1.0, 1.0]), None),
    object("window mullion", Cylinder, [0.1, 23.9, 0.08], [0.0, 0.0, 0.0], [7.0, 0.0, -12.0], Color([1.0, 1.0, 1.0, 1.0]), None),
    object("window mullion", Cylinder, [0.1, 23.9, 0.08], [0.0, 0.0, 0.0], [-7.0, 0.0, -12.0], Color([1.0, 1.0, 1.0, 1.0]), None),
    object("window rail", Cylinder, [0.25, 40.0, 0.08], [90.0, 90.0, 0.0], [-20.0, 17.0, -12.0], Color([1.0, 1.0, 1.0, 1.0]), None),
    object("window rail", Cylinder, [0.25, 40.0, 0.08], [90.0, 90.0, 0.0], [-20.0, 24.0, -12.0], Color([1.0, 1.0, 1.0, 1.0]), None),
    object("window rail", Cylinder, [0.25, 40.0, 0.08], [90.0, 90.0, 0.0], [-20.0, 8.0, -12.0], Color([1.0, 1.0, 1.0, 1.0]), None),
    object("window rail", Cylinder, [0.25, 40.0, 0.08], [90.0, 90.0, 0.0], [-20.0, 0.0, -12.0], Color([1.0, 1.0, 1.0, 1.0]), None),
    object("apple stem", Cylinder, [0.04, 0.9, 0.1], [0.0, 0.0, -20.0], [-0.2, 2.15, 2.0], Texture("cylinder"), None),
    object("apple", Sphere, [1.25, 1.1, 1.25], [0.0, 0.0, 0.0], [-0.2, 1.15, 2.0], Texture("sphere"), None),
    object("apple stem", Cylinder, [0.04, 0.9, 0.1], [90.0, -90.0, 20.0], [-8.0, 1.3, 2.0], Texture("cylinder"), None),
    object("apple", Sphere, [1.25, 1.1, 1.25], [0.0, -90.0, 0.0], [-7.0, 1.15, 2.0], Texture("sphere"), None),
    object("apple stem", Cylinder, [0.04, 0.9, 0.1], [0.0, 0.0, -40.0], [-2.0, 1.75, 2.0], Texture("cylinder"), None),
    object("apple", Sphere, [1.25, 1.1, 1.25], [0.0, 0.0, 40.0], [-2.5, 1.15, 2.0], Texture("sphere"), None),
    object("basket base", Cylinder, [5.0, 5.0, 5.0], [0.0, 0.0, 0.0], [6.0, 0.15, 0.0], Texture("torus"), None),
    object("basket handle", Torus, [4.0, 4.5, 4.0], [0.0, 0.0, 0.0], [6.0, 5.0, 0.6], Texture("torus"), None),
    object("basket fill", Sphere, [4.0, 4.1, 0.1], [90.0, 0.0, 0.0], [6.0, 5.2, 0.0], Texture("torus"), None),
    object("basket rim", Torus, [4.2, 4.2, 4.2], [90.0, 0.0, 0.0], [6.0, 5.0, 0.0], Texture("torus"), None),
    object("leaf stem", Cylinder, [0.02, 0.5, 0.1], [0.0, 0.0, 55.0], [-0.12, 2.45, 2.0], Texture("prism"), None),
    object("leaf", Prism, [0.5, 0.1, 0.5], [90.0, 0.0, -125.0], [-0.65, 2.85, 2.0], Texture("prism"), None),
    object("apple", Sphere, [1.25, 1.1, 1.25], [0.0, 0.0, 40.0], [7.6, 5.15, 2.0], Texture("sphere"), None),
    object("apple stem", Cylinder, [0.04, 0.9, 0.1], [20.0, 0.0, -20.0], [7.35, 5.9, 2.0], Texture("cylinder"), None),
    object("apple", Sphere, [1.2, 1.05, 1.2], [0.0, 0.0, 40.0], [5.7, 5.15, 2.25], Texture("sphere"), None),
    object("apple stem", Cylinder, [0.04, 0.9, 0.1], [0.0, 0.0, 20.0], [5.6, 5.8, 2.25], Texture("cylinder"), None),
    object("apple", Sphere, [1.05, 1.0, 1.05], [0.0, 0.0, 40.0], [3.7, 5.15, 2.25], Texture("sphere"), None),
    object("apple stem", Cylinder, [0.04, 0.9, 0.1], [-60.0, 0.0, 0.0], [3.6, 5.9, 2.25], Texture("cylinder"), None),
    object("apple", Sphere, [1.25, 1.1, 1.25], [0.0, 0.0, 40.0], [7.75, 5.15, 0.0], Texture("sphere"), None),
    object("apple stem", Cylinder, [0.04, 0.9, 0.1], [0.0, 0.0, -25.0], [7.75, 5.75, 0.0], Texture("cylinder"), None),
    object("apple", Sphere, [1.25, 1.1, 1.25], [0.0, 0.0, 40.0], [5.75, 5.15, 0.25], Texture("sphere"), None),
    object("apple stem", Cylinder, [0.04, 0.9, 0.1], [0.0, 0.0, 25.0], [5.75, 6.0, 0.25], Texture("cylinder"), None),
    object("apple", Sphere, [1.25, 1.1, 1.25], [0.0, 0.0, 40.0], [3.75, 5.15, 0.25], Texture("sphere"), None),
    object("apple stem", Cylinder, [0.04, 0.9, 0.1], [0.0, 0.0, 0.0], [3.75, 5.75, 0.25], Texture("cylinder"), None),
    object("apple", Sphere, [1.25, 1.1, 1.25], [0.0, 0.0, 40.0], [6.25, 5.15, -0.9], Texture("sphere"), None),
    object("apple stem", Cylinder, [0.04, 0.9, 0.1], [0.0, 0.0, -20.0], [6.25, 5.8, -0.9], Texture("cylinder"), None),
    object("apple", Sphere, [1.25, 1.1, 1.25], [0.0, 0.0, 40.0], [4.25, 5.15, -0.9], Texture("sphere"), None),
    object("apple stem", Cylinder, [0.04, 0.9, 0.1], [0.0, 0.0, 20.0], [4.25, 5.9, -0.9], Texture("cylinder"), None),
    object("apple", Sphere, [1.25, 1.1, 1.25], [0.0, 0.0, 40.0], [6.75, 5.15, -2.9], Texture("sphere"), None),
    object("apple stem", Cylinder, [0.04, 0.9, 0.1], [0.0, 0.0, 0.0], [6.75, 6.0, -2.9], Texture("cylinder"), None),
    object("leaf", Prism, [0.6, 0.1, 0.6], [90.0, 0.0, 100.0], [8.15, 5.65, -2.25], Texture("prism"), None),
    object("leaf", Prism, [0.6, 0.1, 0.6], [90.0, 0.0, 100.0], [5.15, 5.65, -2.25], Texture("prism"), None),
    object("leaf", Prism, [0.6, 0.1, 0.6], [45.0, 0.0, 0.0], [2.15, 5.92, 2.05], Texture("prism"), None),
    object("leaf", Prism, [0.6, 0.1, 0.6], [90.0, 0.0, 50.0], [8.3, 5.65, -2.0], Texture("prism"), None),
    object("leaf", Prism, [0.6, 0.1, 0.6], [-90.0, 0.0, 75.0], [8.4, 5.65, -1.75], Texture("prism"), None),
    object("leaf stem", Cylinder, [0.02, 0.5, 0.05], [0.0, 0.0, 55.0], [7.1, 5.28, 3.08], Texture("prism"), None),
    object("leaf", Prism, [0.5, 0.1, 0.5], [90.0, 0.0, -125.0], [6.65, 5.55, 3.12], Texture("prism"), None),
    object("fallen leaf", Prism, [1.0, 0.1, 1.0], [0.0, 90.0, 5.0], [-11.0, 0.01, 3.0], Texture("prism"), None),
    object("fallen leaf", Prism, [1.0, 0.1, 1.0], [0.0, 75.0, 5.0], [-11.25, 0.01, 3.0], Texture("prism"), None),
    object("fallen leaf", Prism, [1.0, 0.1, 1.0], [0.0, 25.0, 0.0], [-11.5, 0.01, 2.5], Texture("prism"), None),
    object("fallen leaf", Prism, [1.0, 0.1, 1.0], [0.0, 15.0, 3.0], [-12.0, 0.01, 3.0], Texture("prism"), None),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_tag_in_the_table_is_defined() {
        let description = SceneDescription::still_life();
        let textures: HashSet<_> = description.textures.iter().map(|t| t.tag.as_str()).collect();
        let materials: HashSet<_> = description.materials.iter().map(|(tag, _)| tag.as_str()).collect();

        for object in &description.objects {
            if let Some(tag) = object.texture() {
                assert!(textures.contains(tag), "{} uses unknown texture {tag}", object.name);
            }
            if let Some(tag) = object.material {
                assert!(materials.contains(tag), "{} uses unknown material {tag}", object.name);
            }
        }
    }

    #[test]
    fn first_object_sets_a_material() {
        // Later objects inherit it, so the first draw must not rely on a default.
        assert!(STILL_LIFE[0].material.is_some());
    }

    #[test]
    fn mesh_usage_matches_the_arrangement() {
        let count = |kind: MeshKind| STILL_LIFE.iter().filter(|o| o.mesh == kind).count();

        assert_eq!(STILL_LIFE.len(), 52);
        assert_eq!(count(Box), 1);
        assert_eq!(count(Plane), 2);
        assert_eq!(count(Cylinder), 23);
        assert_eq!(count(Sphere), 13);
        assert_eq!(count(Torus), 2);
        assert_eq!(count(Prism), 11);
    }

    #[test]
    fn texture_count_fits_in_the_sampler_array() {
        let description = SceneDescription::still_life();
        assert!(description.textures.len() <= crate::scene::MAX_TEXTURE_SLOTS);
    }
}

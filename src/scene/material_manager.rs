use std::collections::HashMap;

use glam::Vec3;
use id_arena::{Arena, Id};

/// Phong material parameters forwarded to the `material.*` uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient_color: Vec3,
    pub ambient_strength: f32,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    pub shininess: f32,
}

pub type MaterialId = Id<Material>;

pub struct MaterialManager {
    materials: Arena<Material>,
    tags: Vec<String>,
    materials_by_tag: HashMap<String, MaterialId>,
}

impl MaterialManager {
    pub fn new() -> Self {
        Self {
            materials: Arena::new(),
            tags: Vec::new(),
            materials_by_tag: HashMap::new(),
        }
    }

    /// Adds a material. A tag that is already defined keeps resolving to the
    /// first definition.
    pub fn define(&mut self, tag: impl Into<String>, material: Material) -> MaterialId {
        let tag = tag.into();
        let id = self.materials.alloc(material);

        if self.materials_by_tag.contains_key(&tag) {
            log::debug!("Material '{tag}' is already defined, keeping the first definition");
        } else {
            self.materials_by_tag.insert(tag.clone(), id);
        }

        self.tags.push(tag);
        id
    }

    pub fn find(&self, tag: &str) -> Option<&Material> {
        self.find_id(tag).and_then(|id| self.materials.get(id))
    }

    pub fn find_id(&self, tag: &str) -> Option<MaterialId> {
        self.materials_by_tag.get(tag).copied()
    }

    /// All definitions in definition order, shadowed duplicates included.
    pub fn materials(&self) -> impl Iterator<Item = (&str, &Material)> {
        self.tags
            .iter()
            .zip(self.materials.iter())
            .map(|(tag, (_, material))| (tag.as_str(), material))
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.len() == 0
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material(shininess: f32) -> Material {
        Material {
            ambient_color: Vec3::ONE,
            ambient_strength: 0.1,
            diffuse_color: Vec3::new(0.5, 0.5, 0.5),
            specular_color: Vec3::ONE,
            shininess,
        }
    }

    #[test]
    fn first_definition_wins() {
        let mut manager = MaterialManager::new();
        let first = manager.define("shine", material(8.0));
        manager.define("shine", material(64.0));

        assert_eq!(manager.len(), 2);
        assert_eq!(manager.find("shine"), Some(&material(8.0)));
        assert_eq!(manager.find_id("shine"), Some(first));
    }

    #[test]
    fn unknown_tag_is_not_found_in_non_empty_manager() {
        let mut manager = MaterialManager::new();
        manager.define("shine", material(8.0));
        manager.define("matte", material(1.0));

        assert!(manager.find("glass").is_none());
        assert!(manager.find_id("glass").is_none());
    }

    #[test]
    fn empty_manager_finds_nothing() {
        let manager = MaterialManager::new();

        assert!(manager.is_empty());
        assert!(manager.find("shine").is_none());
    }

    #[test]
    fn materials_iterate_in_definition_order() {
        let mut manager = MaterialManager::new();
        manager.define("a", material(1.0));
        manager.define("b", material(2.0));
        manager.define("a", material(3.0));

        let listed: Vec<_> = manager
            .materials()
            .map(|(tag, material)| (tag.to_string(), material.shininess))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("a".to_string(), 1.0),
                ("b".to_string(), 2.0),
                ("a".to_string(), 3.0)
            ]
        );
    }
}

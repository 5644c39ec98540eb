pub mod lights;
pub mod material_manager;
pub mod meshes;
pub mod scene_manager;
pub mod still_life;
pub mod texture_registry;
pub mod transform;
pub mod uniforms;

#[doc(hidden)]
pub mod testing;

// Re-export main types for convenience
pub use lights::{LightSource, Lighting, LIGHT_COUNT};
pub use material_manager::{Material, MaterialId, MaterialManager};
pub use meshes::{MeshDrawer, MeshKind, MeshLoader};
pub use scene_manager::{SceneError, SceneManager};
pub use still_life::{SceneDescription, SceneObject, Surface, TextureSource};
pub use texture_registry::{
    TextureBackend, TextureEntry, TextureError, TextureHandle, TextureRegistry, MAX_TEXTURE_SLOTS,
};
pub use transform::TransformSpec;
pub use uniforms::UniformSink;

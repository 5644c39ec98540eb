pub mod config;
pub mod global_uniform;
pub mod object_buffer;
pub mod program;
pub mod renderer;
pub mod shader_loader;
pub mod shape_meshes;
pub mod shapes;
pub mod texture;

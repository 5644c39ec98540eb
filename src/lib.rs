pub mod camera;
pub mod rendering;
pub mod scene;
pub mod window;

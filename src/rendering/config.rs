use std::path::PathBuf;

use crate::camera::Camera;

pub const ASSET_DIR_ENV: &str = "STILL_LIFE_ASSET_DIR";

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub window_title: String,
    /// Texture paths of the scene are resolved against this folder.
    pub asset_dir: PathBuf,
    pub shader_dir: PathBuf,
    pub hot_reload_shaders: bool,
    pub clear_color: wgpu::Color,
    pub camera: Camera,
}

impl RenderConfig {
    /// Defaults, with the asset folder taken from `STILL_LIFE_ASSET_DIR` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(asset_dir) = std::env::var_os(ASSET_DIR_ENV) {
            config.asset_dir = PathBuf::from(asset_dir);
        }

        config
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_title: "Still life".to_string(),
            asset_dir: PathBuf::from("assets"),
            shader_dir: PathBuf::from("src/shaders"),
            hot_reload_shaders: true,
            clear_color: wgpu::Color {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            },
            camera: Camera::default(),
        }
    }
}

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::RgbImage;

/// Texture files the still-life scene loads, relative to the asset folder.
pub const STILL_LIFE_TEXTURES: [&str; 6] = [
    "textures/sphere.jpg",
    "textures/torus.jpg",
    "textures/plane.jpg",
    "textures/cylinder.jpg",
    "textures/prism.jpg",
    "textures/orchard.jpg",
];

/// Creates an empty asset folder under the cargo test scratch directory.
pub fn asset_dir(name: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join(name);
    if dir.exists() {
        std::fs::remove_dir_all(&dir).expect("failed to clear fixture folder");
    }
    std::fs::create_dir_all(dir.join("textures")).expect("failed to create fixture folder");
    dir
}

/// Writes a small solid-colour JPEG at `relative_path` below `dir`.
pub fn write_texture(dir: &Path, relative_path: &str) {
    let image = RgbImage::from_pixel(8, 4, image::Rgb([200, 120, 40]));
    image
        .save(dir.join(relative_path))
        .expect("failed to write fixture texture");
}

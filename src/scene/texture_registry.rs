use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage};
use thiserror::Error;

/// Size of the sampler array in the scene shader.
pub const MAX_TEXTURE_SLOTS: usize = 16;

/// Opaque identifier handed out by a [`TextureBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// GPU side of the registry: owns the actual texture objects.
pub trait TextureBackend {
    /// Uploads an RGBA8 image (rows already bottom-up) and generates its mip chain.
    /// A refused upload leaves no GPU texture behind.
    fn upload(&mut self, tag: &str, image: &RgbaImage) -> Result<TextureHandle, TextureError>;
    /// Attaches a texture to a sampler slot.
    fn bind(&mut self, slot: usize, handle: TextureHandle);
    /// Frees the texture. The handle must not be used afterwards.
    fn release(&mut self, handle: TextureHandle);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureEntry {
    pub tag: String,
    pub handle: TextureHandle,
    pub slot: usize,
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("could not load image {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture '{tag}': images with {channels} channels are not supported")]
    UnsupportedChannels { tag: String, channels: u8 },
    #[error("texture '{tag}': all {capacity} texture slots are in use")]
    CapacityExceeded { tag: String, capacity: usize },
    #[error("texture '{tag}': {width}x{height} exceeds the {max} pixel size limit")]
    TooLarge {
        tag: String,
        width: u32,
        height: u32,
        max: u32,
    },
}

/// Fails with [`TextureError::TooLarge`] when either side of `image` exceeds `max`.
pub fn check_dimensions(tag: &str, image: &RgbaImage, max: u32) -> Result<(), TextureError> {
    let (width, height) = image.dimensions();
    if width > max || height > max {
        return Err(TextureError::TooLarge {
            tag: tag.to_string(),
            width,
            height,
            max,
        });
    }

    Ok(())
}

/// Tagged textures in registration order. The index of an entry is its slot.
///
/// Tags are not deduplicated: registering a tag twice takes a second slot, and
/// lookups keep returning the first one.
pub struct TextureRegistry<B> {
    backend: B,
    entries: Vec<TextureEntry>,
}

impl<B: TextureBackend> TextureRegistry<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            entries: Vec::with_capacity(MAX_TEXTURE_SLOTS),
        }
    }

    /// Decodes `path` and registers it under `tag`, returning the assigned slot.
    pub fn register(
        &mut self,
        path: impl AsRef<Path>,
        tag: impl Into<String>,
    ) -> Result<usize, TextureError> {
        let path = path.as_ref();
        let tag = tag.into();

        self.check_capacity(&tag)?;

        let image = image::open(path).map_err(|source| {
            log::error!("Could not load image {}: {}", path.display(), source);
            TextureError::Decode {
                path: path.to_path_buf(),
                source,
            }
        })?;

        log::info!(
            "Loaded image {}, width: {}, height: {}, channels: {}",
            path.display(),
            image.width(),
            image.height(),
            image.color().channel_count()
        );

        self.register_image(tag, image)
    }

    /// Registers an already decoded image. Only 3 and 4 channel images are accepted.
    pub fn register_image(
        &mut self,
        tag: impl Into<String>,
        image: DynamicImage,
    ) -> Result<usize, TextureError> {
        let tag = tag.into();

        self.check_capacity(&tag)?;

        let channels = image.color().channel_count();
        if channels != 3 && channels != 4 {
            log::warn!("Texture '{tag}': no support for images with {channels} channels");
            return Err(TextureError::UnsupportedChannels { tag, channels });
        }

        // Image rows are stored top-down, texture coordinates start at the bottom.
        let pixels = image.flipv().into_rgba8();
        let handle = self.backend.upload(&tag, &pixels).map_err(|err| {
            log::error!("Could not upload texture: {err}");
            err
        })?;

        let slot = self.entries.len();
        self.entries.push(TextureEntry { tag, handle, slot });

        Ok(slot)
    }

    /// Binds every registered texture to the slot matching its registration index.
    pub fn bind_all(&mut self) -> usize {
        for entry in &self.entries {
            self.backend.bind(entry.slot, entry.handle);
        }

        self.entries.len()
    }

    pub fn find_handle(&self, tag: &str) -> Option<TextureHandle> {
        self.find(tag).map(|entry| entry.handle)
    }

    pub fn find_slot(&self, tag: &str) -> Option<usize> {
        self.find(tag).map(|entry| entry.slot)
    }

    pub fn find(&self, tag: &str) -> Option<&TextureEntry> {
        self.entries.iter().find(|entry| entry.tag == tag)
    }

    /// Releases every texture and empties the registry.
    pub fn release_all(&mut self) {
        for entry in self.entries.drain(..) {
            self.backend.release(entry.handle);
        }
    }

    pub fn entries(&self) -> &[TextureEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn check_capacity(&self, tag: &str) -> Result<(), TextureError> {
        if self.entries.len() >= MAX_TEXTURE_SLOTS {
            log::warn!("Texture '{tag}': all {MAX_TEXTURE_SLOTS} texture slots are in use");
            return Err(TextureError::CapacityExceeded {
                tag: tag.to_string(),
                capacity: MAX_TEXTURE_SLOTS,
            });
        }

        Ok(())
    }
}

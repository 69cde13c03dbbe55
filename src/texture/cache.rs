//! Decoded textures for one loaded model.

use super::animation::AnimatedTexture;
use crate::resolver::{texture_path, ResolvedModel};
use crate::resource_pack::texture::load_texture_from_bytes;
use crate::resource_pack::AssetSource;
use image::RgbaImage;
use std::collections::HashMap;
use std::time::Duration;

/// Decoded images keyed by texture path, plus the animated ones.
///
/// Built wholesale for each model and replaced, never patched.
#[derive(Debug, Clone, Default)]
pub struct TextureCache {
    images: HashMap<String, RgbaImage>,
    animated: HashMap<String, AnimatedTexture>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every concrete texture the model's slots name.
    ///
    /// Textures that fail to fetch or decode are logged and left out; missing
    /// or malformed animation metadata means the texture is static.
    pub fn load<S: AssetSource + ?Sized>(model: &ResolvedModel, source: &S) -> Self {
        let mut cache = Self::new();

        for path in model.texture_paths() {
            let image = match source
                .texture_bytes(path)
                .and_then(|bytes| load_texture_from_bytes(&bytes))
            {
                Ok(image) => image,
                Err(e) => {
                    tracing::warn!("Error while loading texture {}: {}", path, e);
                    continue;
                }
            };

            let meta = match source.animation_meta(path) {
                Ok(meta) => meta,
                Err(e) => {
                    tracing::debug!("No animation metadata for {}: {}", path, e);
                    None
                }
            };

            if let Some(meta) = meta {
                if let Some(animated) = AnimatedTexture::new(image.clone(), meta) {
                    cache.animated.insert(path.to_string(), animated);
                }
            }
            cache.images.insert(path.to_string(), image);
        }

        tracing::debug!(
            "Loaded {} textures ({} animated)",
            cache.images.len(),
            cache.animated.len()
        );

        cache
    }

    pub fn insert_image(&mut self, path: &str, image: RgbaImage) {
        self.images.insert(texture_path(path).to_string(), image);
    }

    pub fn insert_animated(&mut self, path: &str, texture: AnimatedTexture) {
        self.animated.insert(texture_path(path).to_string(), texture);
    }

    pub fn image(&self, path: &str) -> Option<&RgbaImage> {
        self.images.get(texture_path(path))
    }

    pub fn animated(&self, path: &str) -> Option<&AnimatedTexture> {
        self.animated.get(texture_path(path))
    }

    pub fn is_animated(&self, path: &str) -> bool {
        self.animated.contains_key(texture_path(path))
    }

    /// Advance every animated texture. Returns true if any frame changed.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let mut changed = false;
        for texture in self.animated.values_mut() {
            if texture.advance(delta) > 0 {
                changed = true;
            }
        }
        changed
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn animated_count(&self) -> usize {
        self.animated.len()
    }
}

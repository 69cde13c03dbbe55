//! Asset sources: catalog listing and raw model/texture/metadata fetches.
//!
//! The [`AssetSource`] trait is the boundary to wherever assets live. The
//! in-memory [`ResourcePack`] implements it for resource packs loaded from a
//! ZIP file or a directory.

pub mod loader;
pub mod model;
pub mod texture;

pub use model::{ModelElement, ModelFace, RawModel};
pub use texture::{AnimationFrame, AnimationMeta};

use crate::error::{ExporterError, Result};
use crate::types::strip_namespace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Asset ids split by the `block/` and `item/` folders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetGroups {
    #[serde(default)]
    pub block: Vec<String>,
    #[serde(default)]
    pub item: Vec<String>,
}

impl AssetGroups {
    pub fn len(&self) -> usize {
        self.block.len() + self.item.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Listing of every model and texture an asset source can serve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetCatalog {
    #[serde(default)]
    pub models: AssetGroups,
    #[serde(default)]
    pub textures: AssetGroups,
}

/// Raw access to models, textures and animation metadata.
///
/// Paths are pack-relative ids without namespace or extension, e.g.
/// `block/stone` for both `models/block/stone.json` and
/// `textures/block/stone.png`.
pub trait AssetSource {
    /// List the available assets.
    fn catalog(&self) -> Result<AssetCatalog>;

    /// Fetch and parse a model document.
    fn model(&self, path: &str) -> Result<RawModel>;

    /// Fetch the raw bytes of a texture image.
    fn texture_bytes(&self, path: &str) -> Result<Vec<u8>>;

    /// Fetch the animation metadata stored next to a texture.
    ///
    /// `Ok(None)` when the texture has no `.png.mcmeta` or it is not animated.
    fn animation_meta(&self, texture_path: &str) -> Result<Option<AnimationMeta>>;
}

/// A loaded resource pack held in memory.
///
/// Model documents are kept as JSON text and parsed on fetch, so a malformed
/// model only fails the asset that asks for it.
#[derive(Debug, Default, Clone)]
pub struct ResourcePack {
    /// Model JSON by model path (e.g., "block/stone").
    pub models: HashMap<String, String>,

    /// PNG bytes by texture path (e.g., "block/stone").
    pub textures: HashMap<String, Vec<u8>>,

    /// `.png.mcmeta` contents by texture path.
    pub texture_meta: HashMap<String, String>,
}

impl ResourcePack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model from its JSON text.
    pub fn add_model_json(&mut self, model_path: &str, json: impl Into<String>) {
        self.models
            .insert(strip_namespace(model_path).to_string(), json.into());
    }

    /// Add an already parsed model.
    pub fn add_model(&mut self, model_path: &str, model: &RawModel) {
        match serde_json::to_string(model) {
            Ok(json) => self.add_model_json(model_path, json),
            Err(e) => tracing::warn!("Failed to store model {}: {}", model_path, e),
        }
    }

    /// Add texture bytes (PNG).
    pub fn add_texture(&mut self, texture_path: &str, data: Vec<u8>) {
        self.textures
            .insert(strip_namespace(texture_path).to_string(), data);
    }

    /// Store `data` under every path in `texture_paths` that has no texture
    /// yet. Returns the paths that were filled.
    pub fn add_missing_textures<'p>(
        &mut self,
        texture_paths: impl IntoIterator<Item = &'p str>,
        data: &[u8],
    ) -> Vec<String> {
        let mut filled = Vec::new();
        for path in texture_paths {
            let path = strip_namespace(path);
            if !self.textures.contains_key(path) {
                self.textures.insert(path.to_string(), data.to_vec());
                filled.push(path.to_string());
            }
        }
        filled
    }

    /// Add the `.png.mcmeta` contents for a texture.
    pub fn add_texture_meta(&mut self, texture_path: &str, contents: impl Into<String>) {
        self.texture_meta
            .insert(strip_namespace(texture_path).to_string(), contents.into());
    }

    /// Get the total number of models.
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Get the total number of textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Get the number of textures with animation metadata.
    pub fn animated_texture_count(&self) -> usize {
        self.texture_meta.len()
    }
}

impl AssetSource for ResourcePack {
    fn catalog(&self) -> Result<AssetCatalog> {
        Ok(AssetCatalog {
            models: group_paths(self.models.keys()),
            textures: group_paths(self.textures.keys()),
        })
    }

    fn model(&self, path: &str) -> Result<RawModel> {
        let path = strip_namespace(path);
        let json = self
            .models
            .get(path)
            .ok_or_else(|| ExporterError::ResourceNotFound(format!("model {}", path)))?;
        Ok(RawModel::from_json(json)?)
    }

    fn texture_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let path = strip_namespace(path);
        self.textures
            .get(path)
            .cloned()
            .ok_or_else(|| ExporterError::ResourceNotFound(format!("texture {}", path)))
    }

    fn animation_meta(&self, texture_path: &str) -> Result<Option<AnimationMeta>> {
        Ok(self
            .texture_meta
            .get(strip_namespace(texture_path))
            .and_then(|contents| texture::parse_mcmeta(contents)))
    }
}

/// Split paths into sorted `block/` and `item/` groups; other folders are not listed.
fn group_paths<'a>(paths: impl Iterator<Item = &'a String>) -> AssetGroups {
    let mut groups = AssetGroups::default();
    for path in paths {
        if path.starts_with("block/") {
            groups.block.push(path.clone());
        } else if path.starts_with("item/") {
            groups.item.push(path.clone());
        }
    }
    groups.block.sort();
    groups.item.sort();
    groups
}

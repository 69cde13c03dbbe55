//! WASM bindings for block-model-exporter.
//!
//! This module provides JavaScript-friendly APIs for use in the browser.

use crate::atlas::{pack_sprites, SpriteImage, DEFAULT_TILE_SIZE};
use crate::render::{RenderOptions, SoftwareSurface};
use crate::resolver::ModelResolver;
use crate::resource_pack::AssetSource;
use js_sys::Uint8Array;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the browser console
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// Load a resource pack from bytes and return a handle.
#[wasm_bindgen]
pub struct ResourcePackHandle {
    inner: crate::ResourcePack,
}

#[wasm_bindgen]
impl ResourcePackHandle {
    /// Load a resource pack from a ZIP file's bytes.
    #[wasm_bindgen(constructor)]
    pub fn new(data: &[u8]) -> Result<ResourcePackHandle, JsError> {
        let pack = crate::load_resource_pack_from_bytes(data).map_err(js_error)?;
        Ok(ResourcePackHandle { inner: pack })
    }

    /// Get the number of models in the pack.
    #[wasm_bindgen(getter)]
    pub fn model_count(&self) -> usize {
        self.inner.model_count()
    }

    /// Get the number of textures in the pack.
    #[wasm_bindgen(getter)]
    pub fn texture_count(&self) -> usize {
        self.inner.texture_count()
    }

    /// The asset catalog as JSON.
    pub fn catalog_json(&self) -> Result<String, JsError> {
        let catalog = self.inner.catalog().map_err(js_error)?;
        serde_json::to_string(&catalog).map_err(js_error)
    }
}

/// Display options for rendering.
#[wasm_bindgen]
pub struct RenderSettings {
    options: RenderOptions,
    ticks: u32,
}

#[wasm_bindgen]
impl RenderSettings {
    #[wasm_bindgen(constructor)]
    pub fn new() -> RenderSettings {
        RenderSettings {
            options: RenderOptions::default(),
            ticks: 0,
        }
    }

    #[wasm_bindgen(setter)]
    pub fn set_size(&mut self, value: u32) {
        self.options.size = value;
    }

    #[wasm_bindgen(setter)]
    pub fn set_show_grid(&mut self, value: bool) {
        self.options.show_grid = value;
    }

    #[wasm_bindgen(setter)]
    pub fn set_show_axes(&mut self, value: bool) {
        self.options.show_axes = value;
    }

    #[wasm_bindgen(setter)]
    pub fn set_auto_rotate(&mut self, value: bool) {
        self.options.auto_rotate = value;
    }

    /// Game ticks of animation (and auto-rotate) to run before capturing.
    #[wasm_bindgen(setter)]
    pub fn set_ticks(&mut self, value: u32) {
        self.ticks = value;
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a model through its parents and return it as pretty JSON.
#[wasm_bindgen]
pub fn resolve_model(pack: &ResourcePackHandle, model: &str) -> Result<String, JsError> {
    let resolved = ModelResolver::new(&pack.inner)
        .resolve_path(model)
        .map_err(js_error)?;
    resolved.to_json_pretty().map_err(js_error)
}

/// Render a model and return PNG bytes.
#[wasm_bindgen]
pub fn render_model(
    pack: &ResourcePackHandle,
    model: &str,
    settings: Option<RenderSettings>,
) -> Result<Uint8Array, JsError> {
    let settings = settings.unwrap_or_default();
    let resolved = ModelResolver::new(&pack.inner)
        .resolve_path(model)
        .map_err(js_error)?;

    let mut surface = SoftwareSurface::new(&pack.inner, settings.options);
    surface.load(model, &resolved);
    if settings.ticks > 0 {
        surface.advance_ticks(settings.ticks);
    }
    let png = surface.snapshot().map_err(js_error)?;
    Ok(Uint8Array::from(png.as_slice()))
}

/// A packed sprite map.
#[wasm_bindgen]
pub struct SpritemapResult {
    png: Vec<u8>,
    manifest: String,
}

#[wasm_bindgen]
impl SpritemapResult {
    /// Get the atlas PNG data.
    #[wasm_bindgen(getter)]
    pub fn png(&self) -> Uint8Array {
        Uint8Array::from(self.png.as_slice())
    }

    /// Get the manifest JSON.
    #[wasm_bindgen(getter)]
    pub fn manifest(&self) -> String {
        self.manifest.clone()
    }
}

/// Pack the named textures of a resource pack into a sprite map.
///
/// `names` are texture ids like `item/apple`; missing ones are skipped.
#[wasm_bindgen]
pub fn pack_textures(
    pack: &ResourcePackHandle,
    names: Vec<String>,
    tile_size: Option<u32>,
) -> Result<SpritemapResult, JsError> {
    let mut images = Vec::with_capacity(names.len());
    for name in names {
        match pack.inner.texture_bytes(&name) {
            Ok(data) => images.push(SpriteImage::new(name, data)),
            Err(e) => tracing::warn!("Skipping {}: {}", name, e),
        }
    }
    images.sort_by(|a, b| a.name.cmp(&b.name));

    let atlas = pack_sprites(&images, tile_size.unwrap_or(DEFAULT_TILE_SIZE)).map_err(js_error)?;
    Ok(SpritemapResult {
        png: atlas.to_png().map_err(js_error)?,
        manifest: atlas.manifest_json().map_err(js_error)?,
    })
}

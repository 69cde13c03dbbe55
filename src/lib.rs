//! # Block Model Exporter
//!
//! A Rust library for rendering Minecraft block models and exporting them in
//! bulk.
//!
//! ## Overview
//!
//! This library takes a resource pack as input, resolves block and item
//! models through their parent chains, builds one textured box per model
//! element, and renders models into PNG images. Whole packs can be exported
//! into a ZIP, either as individual images or as a combined sprite map.
//!
//! ## Quick Start
//!
//! ```ignore
//! use block_model_exporter::{load_resource_pack, ModelResolver, RenderOptions, SoftwareSurface};
//!
//! // Load a resource pack
//! let pack = load_resource_pack("path/to/pack.zip")?;
//!
//! // Resolve a model with all of its parents merged in
//! let model = ModelResolver::new(&pack).resolve_path("block/stone")?;
//!
//! // Render it
//! let mut surface = SoftwareSurface::new(&pack, RenderOptions::default());
//! surface.load("stone", &model);
//! let png = surface.snapshot()?;
//! ```
//!
//! ## Bulk Export
//!
//! The [`ExportOrchestrator`] renders every eligible block model one at a
//! time and collects the item textures:
//!
//! ```ignore
//! use block_model_exporter::{DirectorySink, ExportConfig, ExportMode, ExportOrchestrator};
//!
//! let surface = SoftwareSurface::new(&pack, RenderOptions::default());
//! let orchestrator: ExportOrchestrator<_, _> =
//!     ExportOrchestrator::new(&pack, surface, ExportConfig::default());
//! let outcome = orchestrator
//!     .start_export(ExportMode::Atlas, &mut DirectorySink::new("out"))
//!     .await?;
//! ```

pub mod atlas;
pub mod error;
pub mod export;
pub mod mesher;
pub mod render;
pub mod resolver;
pub mod resource_pack;
pub mod texture;
pub mod types;

// Re-export main types for convenience
pub use atlas::{pack_sprites, SpriteAtlas, SpriteAtlasManifest, SpriteImage};
pub use error::{ExporterError, Result};
pub use export::{
    DirectorySink, DownloadSink, ExportConfig, ExportMode, ExportOrchestrator, ExportOutcome,
    ExportProgress, ExportState, MemorySink, StopHandle,
};
pub use mesher::{build_meshes, Material, RenderableMesh};
pub use render::{RenderOptions, RenderRequest, RenderSurface, SoftwareSurface};
pub use resolver::{ModelResolver, ResolvedModel};
pub use resource_pack::{AssetCatalog, AssetSource, ModelElement, RawModel, ResourcePack};
pub use texture::TextureCache;
pub use types::Direction;

/// Load a resource pack from a file path (ZIP or directory).
pub fn load_resource_pack<P: AsRef<std::path::Path>>(path: P) -> Result<ResourcePack> {
    resource_pack::loader::load_from_path(path)
}

/// Load a resource pack from bytes (for WASM compatibility).
pub fn load_resource_pack_from_bytes(data: &[u8]) -> Result<ResourcePack> {
    resource_pack::loader::load_from_bytes(data)
}

#[cfg(feature = "wasm")]
pub mod wasm;

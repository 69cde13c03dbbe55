//! Bulk export of rendered block models and item textures.
//!
//! [`ExportOrchestrator`] walks the asset catalog, renders one block model at
//! a time through a [`RenderSurface`](crate::render::RenderSurface), and
//! packages the results into a ZIP, either as individual PNGs or as one
//! combined sprite map.

pub mod archive;
pub mod filter;
pub mod orchestrator;

pub use archive::{ArchiveWriter, DirectorySink, DownloadSink, MemorySink, ZipArchiveWriter};
pub use filter::should_ignore_model;
pub use orchestrator::{
    archive_name, ExportConfig, ExportMode, ExportOrchestrator, ExportOutcome, ExportProgress,
    ExportState, StopHandle, SPRITEMAP_IMAGE, SPRITEMAP_MANIFEST,
};

//! Error types for the model exporter.

use thiserror::Error;

/// Result type alias using ExporterError.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Main error type for model rendering and export operations.
#[derive(Error, Debug)]
pub enum ExporterError {
    /// Failed to read or write a ZIP archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read or process an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found in the asset source.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Invalid resource pack structure.
    #[error("Invalid resource pack: {0}")]
    InvalidResourcePack(String),

    /// Failed to resolve a model.
    #[error("Model resolution error: {0}")]
    ModelResolution(String),

    /// A parent chain or texture slot chain refers back to itself.
    #[error("Cyclic reference: {}", .0.join(" -> "))]
    CyclicReference(Vec<String>),

    /// Failed to build the sprite atlas.
    #[error("Atlas building error: {0}")]
    AtlasBuild(String),

    /// The render surface failed to produce a frame.
    #[error("Render error: {0}")]
    Render(String),

    /// The asset catalog could not be loaded.
    #[error("Catalog unavailable: {0}")]
    Catalog(String),

    /// An export was started while another one is running.
    #[error("An export is already running")]
    ExportInProgress,

    /// Failed to export assets.
    #[error("Export error: {0}")]
    Export(String),
}

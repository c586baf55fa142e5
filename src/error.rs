//! Error types for prefab import and reporting.

use thiserror::Error;

/// Result type alias using PrefabError.
pub type Result<T> = std::result::Result<T, PrefabError>;

/// Main error type for prefab import, persistence and export.
#[derive(Error, Debug)]
pub enum PrefabError {
    /// Input text is not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Input parsed but has no `blocks` array at the root.
    #[error("JSON must contain a blocks array")]
    MissingBlocks,

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to read a ZIP archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to encode an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The key-value store rejected a read or write.
    #[error("Store error: {0}")]
    Store(String),

    /// Text could not be read as an `hsl(...)` color.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Failed to export a report or grid.
    #[error("Export error: {0}")]
    Export(String),
}

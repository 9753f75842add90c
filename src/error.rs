//! Error types for the map generator

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while drawing or persisting the map asset
#[derive(Error, Debug)]
pub enum Error {
    /// Could not create the directory that should hold the asset
    #[error("Failed to create directory {}: {}", .path.display(), .source)]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write the asset file itself
    #[error("Failed to write {}: {}", .path.display(), .source)]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to draw a single element (labels only; recovered by the renderer)
    #[error("Rendering failed: {0}")]
    Render(String),

    /// The canvas could not be encoded
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Invalid scene or generator configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl Error {
    /// True for the errors that come from the file system
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::CreateDir { .. } | Error::WriteFile { .. })
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Encode(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}

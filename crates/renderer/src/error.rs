//! Error types for figure rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while building or writing a figure.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),

    #[error("Invalid style: {0}")]
    InvalidStyle(String),

    #[error("Invalid figure geometry: {0}")]
    InvalidGeometry(String),

    #[error("Failed to read style {path}: {message}")]
    StyleFile { path: PathBuf, message: String },

    #[error("Failed to load font {0}")]
    Font(PathBuf),

    #[error("Image encoding failed: {0}")]
    Encode(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<image::ImageError> for RenderError {
    fn from(err: image::ImageError) -> Self {
        RenderError::Encode(err.to_string())
    }
}

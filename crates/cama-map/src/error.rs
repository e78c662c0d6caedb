//! Error types for CaMa map loading.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using MapError.
pub type MapResult<T> = Result<T, MapError>;

/// Errors raised while reading map descriptors, grids and shapefiles.
#[derive(Debug, Error)]
pub enum MapError {
    /// File could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fixed-position token is absent.
    #[error("{path}: line {line} has no token {token}")]
    MissingToken {
        path: PathBuf,
        line: usize,
        token: usize,
    },

    /// A fixed-position token is not a valid number.
    #[error("{path}: line {line} token {token} ('{value}') is not a valid {expected}")]
    InvalidToken {
        path: PathBuf,
        line: usize,
        token: usize,
        value: String,
        expected: &'static str,
    },

    /// Binary grid length does not match the declared shape.
    #[error("{path}: expected {expected} bytes, found {actual}")]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    /// Declared dimensions are unusable (zero, inconsistent).
    #[error("invalid grid shape: {0}")]
    InvalidShape(String),

    /// Malformed ESRI shapefile.
    #[error("invalid shapefile {path}: {message}")]
    Shapefile { path: PathBuf, message: String },
}

impl MapError {
    /// Create an Io error bound to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an InvalidShape error.
    pub fn invalid_shape(msg: impl Into<String>) -> Self {
        Self::InvalidShape(msg.into())
    }

    /// Create a Shapefile error.
    pub fn shapefile(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Shapefile {
            path: path.into(),
            message: msg.into(),
        }
    }
}

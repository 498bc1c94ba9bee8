//! Error types for mask generation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while turning annotation documents into masks.
///
/// Document-level variants are contained by the batch loop, shape-level
/// variants by the rasterizer. Only the directory variants abort a batch.
#[derive(Error, Debug)]
pub enum MaskError {
    /// Annotation document could not be read
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Annotation document is not valid JSON (or has the wrong structure)
    #[error("failed to parse JSON {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `imageWidth` or `imageHeight` is absent or not positive
    #[error("{path:?} is missing imageWidth or imageHeight")]
    MissingDimensions { path: PathBuf },

    /// Declared dimensions are too large to allocate a mask for
    #[error("{path:?} declares an oversized image ({width}x{height})")]
    InvalidDimensions { path: PathBuf, width: u32, height: u32 },

    /// Shape points do not form a fillable polygon
    #[error("shape '{label}' has malformed points: {reason}")]
    MalformedShape { label: String, reason: String },

    /// Shape label has no configured color
    #[error("label '{label}' is not in the color map")]
    UnknownLabel { label: String },

    /// Mask could not be encoded or written
    #[error("failed to write mask {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Input directory does not exist
    #[error("input directory does not exist: {path:?}")]
    DirectoryNotFound { path: PathBuf },

    /// Output directory could not be created
    #[error("failed to create output directory {path:?}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration value could not be parsed or loaded
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MaskError {
    /// True for errors that abort a whole batch run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MaskError::DirectoryNotFound { .. } | MaskError::DirectoryCreate { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MaskError>;

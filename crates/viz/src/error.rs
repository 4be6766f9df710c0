//! Error types for classification, rendering and artifact storage.

use sheetviz_sheet::SheetError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for sheetviz-viz operations.
pub type VizResult<T> = Result<T, VizError>;

/// Errors that can occur while rendering or serving chart artifacts.
#[derive(Debug, Error)]
pub enum VizError {
    /// Reading, cleaning or persisting the workbook failed.
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// Artifact write or read failure.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PNG encoding failure.
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    /// A column expected to be numeric had no usable numbers.
    #[error("Column '{column}' has no numeric values")]
    NoNumericData { column: String },

    /// An artifact name that is not a plain file name.
    #[error("Invalid artifact name: {0}")]
    InvalidName(String),

    /// The requested artifact does not exist.
    #[error("Artifact not found: {0}")]
    NotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl VizError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error aborts a whole processing request.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Sheet(SheetError::Format { .. }) | Self::Config(_))
    }
}

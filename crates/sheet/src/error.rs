use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, cleaning or writing workbooks
#[derive(Error, Debug)]
pub enum SheetError {
    /// The input could not be parsed as a spreadsheet. Fatal for the request.
    #[error("Cannot read '{path}' as a spreadsheet: {message}")]
    Format { path: PathBuf, message: String },

    #[error("Column not found: {name}")]
    ColumnNotFound { name: String },

    #[error("Sheet not found: {name}")]
    SheetNotFound { name: String },

    #[error("Failed to write workbook '{path}': {message}")]
    Write { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SheetError {
    pub(crate) fn format(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        SheetError::Format {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        SheetError::Write {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;

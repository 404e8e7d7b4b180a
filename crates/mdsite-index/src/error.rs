//! Index builder error types.

use std::path::PathBuf;

/// Error building or writing a directory index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Root path missing or not a directory.
    #[error("directory not found: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error during the scan or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Temporary file could not be persisted over the outline file.
    #[error("failed to write outline: {0}")]
    Write(String),
}

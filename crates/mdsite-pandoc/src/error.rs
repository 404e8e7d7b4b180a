//! Conversion error types.

use std::path::PathBuf;

/// Error converting a source document with pandoc.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Source file missing.
    #[error("source file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The pandoc binary could not be spawned.
    #[error("'{0}' not found: install Pandoc and make sure it is on PATH")]
    ToolNotFound(String),

    /// Pandoc ran but reported failure.
    #[error("pandoc failed{}: {stderr}", .code.map(|c| format!(" (exit code {c})")).unwrap_or_default())]
    Failed {
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
        /// Captured standard error output.
        stderr: String,
    },

    /// I/O error preparing the conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

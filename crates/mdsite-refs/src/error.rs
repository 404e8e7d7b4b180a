//! Reference rewriter error types.

use std::path::PathBuf;

use quick_xml::events::attributes::AttrError;

/// Error rewriting cross-references in a rendered document.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    /// Input file missing.
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Document could not be parsed as a markup tree.
    #[error("malformed document: {0}")]
    Parse(#[from] quick_xml::Error),

    /// An element attribute could not be parsed.
    #[error("malformed attribute: {0}")]
    Attr(#[from] AttrError),

    /// I/O error reading the input or staging the output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Temporary file could not be persisted over the destination.
    #[error("failed to write output: {0}")]
    Write(String),
}

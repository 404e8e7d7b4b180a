//! Directory index tree builder and outline rendering.
//!
//! This crate implements the table-of-contents half of mdsite:
//!
//! 1. [`IndexBuilder`] walks a directory tree once and produces an immutable
//!    [`DirectoryIndex`] tree of documents and subsections.
//! 2. [`render`] turns that tree into a Markdown bulleted outline.
//! 3. [`write_index_file`] drives both and writes the outline into the root
//!    of the indexed tree, deleting any stale outline file before scanning so
//!    the index never lists itself.
//!
//! Building and rendering are separate so the tree can be inspected (and
//! tested) without touching the filesystem again.

mod builder;
mod error;
mod outline;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub use builder::{DirectoryIndex, IndexBuilder};
pub use error::IndexError;
pub use outline::{OutlineStyle, render};

/// Build an index over `root` and write the rendered outline to
/// `<root>/<filename>`.
///
/// If a file named `filename` already exists in `root` it is removed *before*
/// the directory scan, so a previously generated outline is never listed as a
/// document of the fresh index. The outline is written through a temporary
/// file in `root` and atomically renamed into place, so a failure mid-write
/// never leaves a truncated outline behind.
///
/// Returns the path of the written outline file.
///
/// # Errors
///
/// Returns [`IndexError::NotFound`] if `root` is not a directory, and
/// [`IndexError::Io`] / [`IndexError::Write`] on filesystem failures.
pub fn write_index_file(
    builder: &IndexBuilder,
    root: &Path,
    style: &OutlineStyle,
    filename: &str,
) -> Result<PathBuf, IndexError> {
    if !root.is_dir() {
        return Err(IndexError::NotFound(root.to_path_buf()));
    }
    let root = &std::path::absolute(root)?;

    let outline_path = root.join(filename);
    if outline_path.exists() {
        tracing::debug!(path = %outline_path.display(), "removing stale outline");
        fs::remove_file(&outline_path)?;
    }

    let index = builder.build(root)?;
    let rendered = render(&index, style);

    let mut tmp = tempfile::NamedTempFile::new_in(root)?;
    tmp.write_all(rendered.as_bytes())?;
    tmp.persist(&outline_path)
        .map_err(|e| IndexError::Write(e.to_string()))?;

    tracing::info!(path = %outline_path.display(), "wrote index file");
    Ok(outline_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_outline_is_not_listed() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("guide.md"), "# Guide").unwrap();
        fs::write(temp.path().join("index.md"), "stale outline").unwrap();

        let builder = IndexBuilder::new("md");
        let path =
            write_index_file(&builder, temp.path(), &OutlineStyle::default(), "index.md").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("[guide](guide.md)"));
        assert!(!content.contains("index.md)"), "outline listed itself: {content}");
    }

    #[test]
    fn outline_lands_in_root() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("a.md"), "").unwrap();

        let builder = IndexBuilder::new("md");
        let path =
            write_index_file(&builder, temp.path(), &OutlineStyle::default(), "toc.md").unwrap();

        assert_eq!(path, temp.path().join("toc.md"));
        assert!(path.is_file());
    }

    #[test]
    fn missing_root_is_not_found() {
        let builder = IndexBuilder::new("md");
        let err = write_index_file(
            &builder,
            Path::new("/nonexistent/docs"),
            &OutlineStyle::default(),
            "index.md",
        )
        .unwrap_err();
        assert!(matches!(err, IndexError::NotFound(_)));
    }
}

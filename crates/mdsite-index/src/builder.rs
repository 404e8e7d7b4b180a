//! Directory tree scanning.
//!
//! The builder performs one full recursive scan per invocation and returns an
//! immutable tree. It deliberately knows nothing about rendering; the outline
//! module consumes the tree afterwards.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::IndexError;

/// One node of the index tree: a directory with its documents and child
/// directories.
///
/// `documents` is sorted by name and `subsections` is keyed in a [`BTreeMap`],
/// so traversal order is deterministic across runs regardless of the order the
/// filesystem returned entries in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryIndex {
    /// Base name of the directory.
    pub name: String,
    /// Absolutized path of the directory.
    pub path: PathBuf,
    /// Document file names found directly in this directory, sorted.
    pub documents: Vec<String>,
    /// Immediate child directories, keyed by base name.
    pub subsections: BTreeMap<String, DirectoryIndex>,
}

impl DirectoryIndex {
    /// Total number of documents in this node and all nested subsections.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents.len()
            + self
                .subsections
                .values()
                .map(DirectoryIndex::document_count)
                .sum::<usize>()
    }
}

/// Builds a [`DirectoryIndex`] by recursively scanning a directory tree.
///
/// Entry classification:
/// - regular files named `<non-empty-prefix>.<ext>` become documents
///   (case-sensitive match; a file named just `.<ext>` is not a document),
/// - directories become subsections and are recursed into,
/// - everything else (symlinks, sockets, devices, non-matching files) is
///   ignored. This is deliberate policy, not an accident of the filesystem
///   API: the index describes plain documents and sections only.
///
/// The scan reflects the tree's state at call time; a concurrent mutation of
/// the tree yields an arbitrary but non-crashing result.
pub struct IndexBuilder {
    source_ext: String,
}

impl IndexBuilder {
    /// Create a builder matching documents with the given extension
    /// (without the leading dot, e.g. `"md"`).
    #[must_use]
    pub fn new(source_ext: impl Into<String>) -> Self {
        Self {
            source_ext: source_ext.into(),
        }
    }

    /// Scan the tree rooted at `root` and build its index.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::NotFound`] if `root` is not a directory, or
    /// [`IndexError::Io`] if a directory listing fails mid-scan.
    pub fn build(&self, root: &Path) -> Result<DirectoryIndex, IndexError> {
        if !root.is_dir() {
            return Err(IndexError::NotFound(root.to_path_buf()));
        }
        let root = std::path::absolute(root)?;
        self.scan_directory(&root)
    }

    fn scan_directory(&self, dir: &Path) -> Result<DirectoryIndex, IndexError> {
        let mut documents = Vec::new();
        let mut subsections = BTreeMap::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;

            // Non-Unicode names cannot appear in the outline; skip them.
            let Ok(name) = entry.file_name().into_string() else {
                tracing::warn!(path = %entry.path().display(), "skipping non-Unicode name");
                continue;
            };

            if file_type.is_dir() {
                let child = self.scan_directory(&entry.path())?;
                subsections.insert(name, child);
            } else if file_type.is_file() && is_document(&name, &self.source_ext) {
                documents.push(name);
            }
            // Symlinks and special files fall through: ignored by policy.
        }

        documents.sort();

        Ok(DirectoryIndex {
            name: dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: dir.to_path_buf(),
            documents,
            subsections,
        })
    }
}

/// Whether `name` is `<non-empty-prefix>.<ext>`.
///
/// A name consisting solely of the extension (e.g. a hidden file named
/// `.md`) does not match.
fn is_document(name: &str, ext: &str) -> bool {
    name.strip_suffix(ext)
        .and_then(|rest| rest.strip_suffix('.'))
        .is_some_and(|prefix| !prefix.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_document() {
        assert!(is_document("guide.md", "md"));
        assert!(is_document("a.b.md", "md"));
        // Extension-only names are not documents
        assert!(!is_document(".md", "md"));
        // Case-sensitive
        assert!(!is_document("guide.MD", "md"));
        assert!(!is_document("guide.md.bak", "md"));
        assert!(!is_document("md", "md"));
        assert!(!is_document("guidemd", "md"));
    }

    #[test]
    fn test_build_missing_root() {
        let builder = IndexBuilder::new("md");
        let err = builder.build(Path::new("/nonexistent")).unwrap_err();
        assert!(matches!(err, IndexError::NotFound(_)));
    }

    #[test]
    fn test_build_classifies_entries() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("b.md"), "").unwrap();
        fs::write(temp.path().join("a.md"), "").unwrap();
        fs::write(temp.path().join("image.png"), "").unwrap();
        fs::write(temp.path().join(".md"), "").unwrap();
        fs::create_dir(temp.path().join("section")).unwrap();
        fs::write(temp.path().join("section").join("nested.md"), "").unwrap();

        let index = IndexBuilder::new("md").build(temp.path()).unwrap();

        assert_eq!(index.documents, vec!["a.md", "b.md"]);
        assert_eq!(index.subsections.len(), 1);
        assert_eq!(index.subsections["section"].documents, vec!["nested.md"]);
        assert_eq!(index.document_count(), 3);
    }

    #[test]
    fn test_build_empty_directory() {
        let temp = tempfile::tempdir().unwrap();
        let index = IndexBuilder::new("md").build(temp.path()).unwrap();
        assert!(index.documents.is_empty());
        assert!(index.subsections.is_empty());
    }

    #[test]
    fn test_build_absolutizes_path() {
        let temp = tempfile::tempdir().unwrap();
        let index = IndexBuilder::new("md").build(temp.path()).unwrap();
        assert!(index.path.is_absolute());
        assert_eq!(
            index.name,
            temp.path().file_name().unwrap().to_string_lossy()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_build_ignores_symlinks() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("real.md"), "").unwrap();
        std::os::unix::fs::symlink(temp.path().join("real.md"), temp.path().join("link.md"))
            .unwrap();

        let index = IndexBuilder::new("md").build(temp.path()).unwrap();
        assert_eq!(index.documents, vec!["real.md"]);
    }

    #[test]
    fn test_build_is_deterministic() {
        let temp = tempfile::tempdir().unwrap();
        for name in ["zeta.md", "alpha.md", "mid.md"] {
            fs::write(temp.path().join(name), "").unwrap();
        }
        for dir in ["b-section", "a-section"] {
            fs::create_dir(temp.path().join(dir)).unwrap();
        }

        let builder = IndexBuilder::new("md");
        let first = builder.build(temp.path()).unwrap();
        let second = builder.build(temp.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.documents, vec!["alpha.md", "mid.md", "zeta.md"]);
        let keys: Vec<_> = first.subsections.keys().collect();
        assert_eq!(keys, vec!["a-section", "b-section"]);
    }

    #[test]
    fn test_custom_extension() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("page.rst"), "").unwrap();
        fs::write(temp.path().join("page.md"), "").unwrap();

        let index = IndexBuilder::new("rst").build(temp.path()).unwrap();
        assert_eq!(index.documents, vec!["page.rst"]);
    }
}

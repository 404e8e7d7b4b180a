//! Structural rewriting of anchor targets in rendered HTML.
//!
//! The document is streamed as parser events and every event is re-emitted
//! verbatim; only `<a>` start tags whose `href` targets a source document are
//! rebuilt. Working on raw bytes end-to-end means untouched content round-trips
//! byte-identically and the document's character encoding is never transcoded,
//! whatever it is. Line-oriented substitution is deliberately avoided: a link
//! element may span lines and a line may hold several links.

use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::RewriteError;
use crate::href::rewrite_href;

/// Rewrites intra-site cross-references in rendered documents.
///
/// Anchors whose `href` path component ends in `.<source_ext>` are retargeted
/// to `.<target_ext>`; backslash separators are normalized to forward slashes
/// and query/fragment suffixes are preserved verbatim. Everything else in the
/// document, including non-matching anchors, passes through unchanged.
pub struct RefRewriter {
    source_ext: String,
    target_ext: String,
}

impl RefRewriter {
    /// Create a rewriter mapping `.<source_ext>` targets to `.<target_ext>`.
    #[must_use]
    pub fn new(source_ext: impl Into<String>, target_ext: impl Into<String>) -> Self {
        Self {
            source_ext: source_ext.into(),
            target_ext: target_ext.into(),
        }
    }

    /// Rewrite a document held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Parse`] if the document cannot be parsed as a
    /// markup tree.
    pub fn rewrite(&self, input: &[u8]) -> Result<Vec<u8>, RewriteError> {
        let mut reader = Reader::from_reader(input);
        // Rendered HTML is not guaranteed to be well-formed XML: void
        // elements and stray end tags must not abort the rewrite.
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        let mut writer = Writer::new(Vec::with_capacity(input.len()));
        let mut buf = Vec::new();
        let mut rewritten = 0usize;
        let mut span_start = 0usize;

        loop {
            let event = reader.read_event_into(&mut buf)?;
            let span_end = usize::try_from(reader.buffer_position()).unwrap_or(input.len());
            match event {
                Event::Start(e) if is_anchor(&e) => {
                    match self.rewrite_anchor(&e)? {
                        Some(anchor) => {
                            rewritten += 1;
                            writer.write_event(Event::Start(anchor))?;
                        }
                        None => writer.write_event(Event::Start(e))?,
                    }
                }
                Event::Empty(e) if is_anchor(&e) => {
                    match self.rewrite_anchor(&e)? {
                        Some(anchor) => {
                            rewritten += 1;
                            writer.write_event(Event::Empty(anchor))?;
                        }
                        None => writer.write_event(Event::Empty(e))?,
                    }
                }
                // The parser normalizes the doctype keyword, so re-serializing
                // would turn `<!doctype html>` into `<!DOCTYPE html>`. Copy
                // the raw input span to keep it as written.
                Event::DocType(_) => {
                    writer.get_mut().extend_from_slice(&input[span_start..span_end]);
                }
                Event::Eof => break,
                event => writer.write_event(event)?,
            }
            span_start = span_end;
            buf.clear();
        }

        tracing::debug!(rewritten, "rewrote cross-references");
        Ok(writer.into_inner())
    }

    /// Rewrite `input` and atomically replace `output` (or `input` itself
    /// when `output` is `None`) with the result.
    ///
    /// The result is staged in a temporary file next to the destination and
    /// renamed into place only on full success, so a failure mid-rewrite
    /// leaves the original file intact.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::NotFound`] if `input` is missing,
    /// [`RewriteError::Parse`] on a malformed document and
    /// [`RewriteError::Write`] if the result cannot be persisted.
    pub fn rewrite_file(
        &self,
        input: &Path,
        output: Option<&Path>,
    ) -> Result<PathBuf, RewriteError> {
        if !input.is_file() {
            return Err(RewriteError::NotFound(input.to_path_buf()));
        }
        let content = fs::read(input)?;
        let result = self.rewrite(&content)?;

        let dest = output.unwrap_or(input);
        let dest_dir = match dest.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
            Some(parent) => parent,
            None => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dest_dir)?;
        tmp.write_all(&result)?;
        tmp.persist(dest)
            .map_err(|e| RewriteError::Write(e.to_string()))?;

        tracing::info!(path = %dest.display(), "rewrote references");
        Ok(dest.to_path_buf())
    }

    /// Rebuild an anchor tag if its `href` matches, preserving attribute
    /// order and raw attribute values. Returns `None` when nothing matched so
    /// the caller can emit the original event untouched.
    fn rewrite_anchor(
        &self,
        element: &BytesStart<'_>,
    ) -> Result<Option<BytesStart<'static>>, RewriteError> {
        let attrs = element
            .attributes()
            .with_checks(false)
            .collect::<Result<Vec<_>, _>>()?;

        let mut replacement: Option<(usize, String)> = None;
        for (idx, attr) in attrs.iter().enumerate() {
            if !attr.key.as_ref().eq_ignore_ascii_case(b"href") {
                continue;
            }
            // The raw attribute value keeps its entity escapes; the extension
            // tail we edit is plain ASCII either way. Non-UTF-8 values cannot
            // be intra-site references and pass through.
            if let Ok(raw) = std::str::from_utf8(&attr.value) {
                if let Some(new_href) = rewrite_href(raw, &self.source_ext, &self.target_ext) {
                    tracing::debug!(from = raw, to = %new_href, "retargeting anchor");
                    replacement = Some((idx, new_href));
                }
            }
            // The first href attribute decides.
            break;
        }

        let Some((href_idx, new_href)) = replacement else {
            return Ok(None);
        };

        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        let mut rebuilt = BytesStart::new(name);
        for (idx, attr) in attrs.iter().enumerate() {
            if idx == href_idx {
                rebuilt.push_attribute(Attribute {
                    key: attr.key,
                    value: Cow::Owned(new_href.clone().into_bytes()),
                });
            } else {
                rebuilt.push_attribute(attr.clone());
            }
        }
        Ok(Some(rebuilt))
    }
}

fn is_anchor(element: &BytesStart<'_>) -> bool {
    element.name().as_ref().eq_ignore_ascii_case(b"a")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rewriter() -> RefRewriter {
        RefRewriter::new("md", "html")
    }

    fn rewrite_str(input: &str) -> String {
        String::from_utf8(rewriter().rewrite(input.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn test_simple_anchor_retargeted() {
        assert_eq!(
            rewrite_str(r#"<p><a href="notes.md">x</a></p>"#),
            r#"<p><a href="notes.html">x</a></p>"#
        );
    }

    #[test]
    fn test_backslash_separator_normalized() {
        assert_eq!(
            rewrite_str(r#"<a href="sub\page.md">y</a>"#),
            r#"<a href="sub/page.html">y</a>"#
        );
    }

    #[test]
    fn test_non_source_anchor_byte_unchanged() {
        let input = r#"<a  class="img"   href="image.png" >z</a>"#;
        assert_eq!(rewrite_str(input), input);
    }

    #[test]
    fn test_external_link_unchanged() {
        let input = r#"<a href="https://example.com/readme.md">ext</a>"#;
        assert_eq!(rewrite_str(input), input);
    }

    #[test]
    fn test_multiple_links_per_line() {
        assert_eq!(
            rewrite_str(r#"<a href="a.md">1</a> and <a href="b.md">2</a>"#),
            r#"<a href="a.html">1</a> and <a href="b.html">2</a>"#
        );
    }

    #[test]
    fn test_anchor_spanning_lines() {
        let input = "<a\n  class=\"wide\"\n  href=\"page.md\">text</a>";
        let output = rewrite_str(input);
        assert!(output.contains(r#"href="page.html""#), "got: {output}");
        assert!(output.contains(">text</a>"));
    }

    #[test]
    fn test_attributes_and_order_preserved_on_rewrite() {
        assert_eq!(
            rewrite_str(r#"<a class="ref" href="doc.md" title="Doc">t</a>"#),
            r#"<a class="ref" href="doc.html" title="Doc">t</a>"#
        );
    }

    #[test]
    fn test_fragment_preserved() {
        assert_eq!(
            rewrite_str(r##"<a href="page.md#intro">t</a>"##),
            r##"<a href="page.html#intro">t</a>"##
        );
    }

    #[test]
    fn test_entity_escapes_untouched() {
        let input = r#"<p>a &amp; b <a href="x.md">&lt;x&gt;</a></p>"#;
        assert_eq!(
            rewrite_str(input),
            r#"<p>a &amp; b <a href="x.html">&lt;x&gt;</a></p>"#
        );
    }

    #[test]
    fn test_surrounding_document_untouched() {
        let input = "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\"/>\n\
                     <title>T</title>\n</head>\n<body>\n<p>no links here</p>\n</body>\n</html>\n";
        assert_eq!(rewrite_str(input), input);
    }

    #[test]
    fn test_lowercase_doctype_preserved() {
        let input = "<!doctype html>\n<p><a href=\"a.md\">a</a></p>\n";
        assert_eq!(
            rewrite_str(input),
            "<!doctype html>\n<p><a href=\"a.html\">a</a></p>\n"
        );
    }

    #[test]
    fn test_anchor_without_href_unchanged() {
        let input = r#"<a name="top">anchor</a>"#;
        assert_eq!(rewrite_str(input), input);
    }

    #[test]
    fn test_rewrite_file_in_place() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("page.html");
        std::fs::write(&path, r#"<a href="other.md">o</a>"#).unwrap();

        rewriter().rewrite_file(&path, None).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, r#"<a href="other.html">o</a>"#);
    }

    #[test]
    fn test_rewrite_file_to_separate_output() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("in.html");
        let output = temp.path().join("out.html");
        std::fs::write(&input, r#"<a href="other.md">o</a>"#).unwrap();

        rewriter().rewrite_file(&input, Some(&output)).unwrap();

        assert_eq!(
            std::fs::read_to_string(&input).unwrap(),
            r#"<a href="other.md">o</a>"#,
            "input must be untouched"
        );
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            r#"<a href="other.html">o</a>"#
        );
    }

    #[test]
    fn test_rewrite_file_missing_input() {
        let err = rewriter()
            .rewrite_file(Path::new("/nonexistent/in.html"), None)
            .unwrap_err();
        assert!(matches!(err, RewriteError::NotFound(_)));
    }

    #[test]
    fn test_failed_rewrite_leaves_original_intact() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("in.html");
        let original = r#"<a href="other.md">o</a>"#;
        std::fs::write(&input, original).unwrap();

        // Destination directory does not exist: staging the temp file fails
        // before the original could ever be touched.
        let missing = temp.path().join("missing-dir").join("out.html");
        rewriter().rewrite_file(&input, Some(&missing)).unwrap_err();

        assert_eq!(std::fs::read_to_string(&input).unwrap(), original);
        assert!(!missing.exists());
    }

    #[test]
    fn test_failed_replace_leaves_original_intact() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("in.html");
        let original = r#"<a href="other.md">o</a>"#;
        std::fs::write(&input, original).unwrap();

        // The destination path is an existing directory: the rewritten bytes
        // are fully staged in the temp file, then the final rename fails.
        let occupied = temp.path().join("occupied");
        std::fs::create_dir(&occupied).unwrap();

        let err = rewriter().rewrite_file(&input, Some(&occupied)).unwrap_err();
        assert!(matches!(err, RewriteError::Write(_)));
        assert_eq!(std::fs::read_to_string(&input).unwrap(), original);
        assert!(occupied.is_dir());
    }
}

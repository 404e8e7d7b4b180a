//! Rendering a [`DirectoryIndex`] to a Markdown outline.

use std::fmt::Write;

use crate::builder::DirectoryIndex;

/// Formatting knobs for the rendered outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineStyle {
    /// Bullet character for every line.
    pub bullet: char,
    /// Indent string repeated once per nesting depth.
    pub indent: String,
    /// Separator joining path segments in section labels.
    pub separator: String,
}

impl Default for OutlineStyle {
    fn default() -> Self {
        Self {
            bullet: '*',
            indent: "  ".to_owned(),
            separator: "/".to_owned(),
        }
    }
}

/// Render the index tree as a nested bulleted outline.
///
/// Each document becomes `<indent><bullet> [<stem>](<relative-path>)`, where
/// the link target joins the ancestor directory names and the file name with
/// forward slashes. Each subsection becomes `<indent><bullet> <label>` (the
/// path from the root, joined with the configured separator) followed by its
/// own entries one level deeper. The root node has an empty label and its
/// section line is suppressed.
///
/// Output is deterministic for a given tree: documents are sorted at build
/// time and subsections iterate in key order.
#[must_use]
pub fn render(index: &DirectoryIndex, style: &OutlineStyle) -> String {
    let mut out = String::new();
    render_node(index, &mut Vec::new(), 1, style, &mut out);
    out
}

fn render_node(
    node: &DirectoryIndex,
    ancestors: &mut Vec<String>,
    depth: usize,
    style: &OutlineStyle,
    out: &mut String,
) {
    let label = ancestors.join(&style.separator);
    if !label.is_empty() {
        let _ = writeln!(
            out,
            "{}{} {label}",
            style.indent.repeat(depth - 1),
            style.bullet
        );
    }

    for document in &node.documents {
        let stem = document
            .rsplit_once('.')
            .map_or(document.as_str(), |(stem, _)| stem);
        let mut target = ancestors.join("/");
        if !target.is_empty() {
            target.push('/');
        }
        target.push_str(document);
        let _ = writeln!(
            out,
            "{}{} [{stem}]({target})",
            style.indent.repeat(depth),
            style.bullet
        );
    }

    for (name, subsection) in &node.subsections {
        ancestors.push(name.clone());
        render_node(subsection, ancestors, depth + 1, style, out);
        ancestors.pop();
    }
}

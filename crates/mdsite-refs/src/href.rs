//! Hyperlink target matching and rewriting.
//!
//! Pure string logic, separated from the HTML event plumbing so the matching
//! policy is testable on its own. Policy: the target is split into path,
//! query and fragment; only the path component is matched against
//! `<non-empty-prefix>.<source-ext>` (case-insensitive on the extension);
//! query and fragment are reattached verbatim. Targets carrying a URL scheme
//! are never rewritten.

/// A hyperlink target split into its components.
///
/// `query` includes the leading `?` and `fragment` the leading `#` so
/// reassembly is pure concatenation.
struct SplitTarget<'a> {
    path: &'a str,
    query: &'a str,
    fragment: &'a str,
}

fn split_target(href: &str) -> SplitTarget<'_> {
    let (rest, fragment) = match href.find('#') {
        Some(pos) => href.split_at(pos),
        None => (href, ""),
    };
    let (path, query) = match rest.find('?') {
        Some(pos) => rest.split_at(pos),
        None => (rest, ""),
    };
    SplitTarget {
        path,
        query,
        fragment,
    }
}

/// Whether the target starts with a URL scheme (`https:`, `mailto:`, ...).
///
/// RFC 3986: a scheme is a letter followed by letters, digits, `+`, `-` or
/// `.`, terminated by `:`. A Windows drive letter (`c:\...`) also matches
/// this shape; treating it as a scheme is fine because absolute local paths
/// are not intra-site references either.
fn has_scheme(target: &str) -> bool {
    let Some(colon) = target.find(':') else {
        return false;
    };
    let prefix = &target[..colon];
    let mut chars = prefix.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Whether the path's final component is `<non-empty-prefix>.<ext>`.
///
/// The extension comparison is case-insensitive; a file name that is just the
/// extension (`.md`) does not match.
fn path_matches(path: &str, source_ext: &str) -> bool {
    let file_name = path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path);
    let Some(dot) = file_name.len().checked_sub(source_ext.len() + 1) else {
        return false;
    };
    file_name.is_char_boundary(dot)
        && file_name[dot..].starts_with('.')
        && file_name[dot + 1..].eq_ignore_ascii_case(source_ext)
        && dot > 0
}

/// Rewrite `href` if it targets a source document.
///
/// Returns `None` when the target should pass through unchanged: it carries a
/// scheme, or its path component does not end in `.<source_ext>`. On a match,
/// the extension is replaced with `target_ext`, backslash separators are
/// normalized to forward slashes, and query/fragment are preserved verbatim.
pub(crate) fn rewrite_href(href: &str, source_ext: &str, target_ext: &str) -> Option<String> {
    let target = split_target(href);
    if target.path.is_empty() || has_scheme(target.path) {
        return None;
    }
    if !path_matches(target.path, source_ext) {
        return None;
    }

    let stem = &target.path[..target.path.len() - source_ext.len() - 1];
    let mut rewritten = stem.replace('\\', "/");
    rewritten.push('.');
    rewritten.push_str(target_ext);
    rewritten.push_str(target.query);
    rewritten.push_str(target.fragment);
    Some(rewritten)
}

//! Cross-reference rewriting for rendered HTML documents.
//!
//! When Markdown sources link to each other (`[guide](guide.md)`), the
//! rendered HTML still points at the `.md` file. [`RefRewriter`] retargets
//! those anchors to the converted output's extension while leaving the rest
//! of the document byte-identical.
//!
//! The rewrite is structural: the document is parsed as an event stream
//! (quick-xml) and only matching `href` attributes are rebuilt. No regex over
//! lines, no decode/re-encode of text content.

mod error;
mod href;
mod rewriter;

pub use error::RewriteError;
pub use rewriter::RefRewriter;

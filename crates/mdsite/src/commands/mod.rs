//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod convert;
pub(crate) mod fix_refs;
pub(crate) mod index;

pub(crate) use build::BuildArgs;
pub(crate) use convert::ConvertArgs;
pub(crate) use fix_refs::FixRefsArgs;
pub(crate) use index::IndexArgs;

//! CLI error types.

use mdsite_config::ConfigError;
use mdsite_index::IndexError;
use mdsite_pandoc::ConvertError;
use mdsite_refs::RewriteError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Index(#[from] IndexError),

    #[error("{0}")]
    Convert(#[from] ConvertError),

    #[error("{0}")]
    Rewrite(#[from] RewriteError),

    #[error("{failed} of {total} documents failed")]
    Batch {
        /// Number of documents that failed to build.
        failed: usize,
        /// Number of documents attempted.
        total: usize,
    },
}

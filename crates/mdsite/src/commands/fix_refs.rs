//! `mdsite fix-refs` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdsite_config::Config;
use mdsite_refs::RefRewriter;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the fix-refs command.
#[derive(Args)]
pub(crate) struct FixRefsArgs {
    /// Converted document to rewrite.
    input: PathBuf,

    /// Output path (rewrites in place when omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover mdsite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl FixRefsArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;

        let rewriter = RefRewriter::new(&config.docs.source_ext, &config.docs.target_ext);
        let written = rewriter.rewrite_file(&self.input, self.output.as_deref())?;

        output.success(&format!("References rewritten in {}", written.display()));
        Ok(())
    }
}

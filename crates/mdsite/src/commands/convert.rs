//! `mdsite convert` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdsite_config::{CliSettings, Config};
use mdsite_pandoc::{ConvertOptions, PandocConverter};
use mdsite_refs::RefRewriter;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Source document to convert.
    input: PathBuf,

    /// Output path (default: input with the target extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stylesheet to link into the rendered page.
    #[arg(long)]
    css: Option<PathBuf>,

    /// Do not insert a table of contents into the rendered page.
    #[arg(long)]
    no_toc: bool,

    /// Do not rewrite Markdown cross-references in the output.
    #[arg(long)]
    skip_refs: bool,

    /// Extra flag passed through to pandoc (repeatable).
    #[arg(long = "pandoc-arg", value_name = "FLAG")]
    pandoc_args: Vec<String>,

    /// Path to configuration file (default: auto-discover mdsite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ConvertArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            stylesheet: self.css.clone(),
            toc: self.no_toc.then_some(false),
            extra_args: self.pandoc_args.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let output_path = self
            .output
            .unwrap_or_else(|| self.input.with_extension(&config.docs.target_ext));

        convert_document(&config, &self.input, &output_path, self.skip_refs)?;

        output.success(&format!("Converted to {}", output_path.display()));
        Ok(())
    }
}

/// Convert one source document and, unless `skip_refs`, rewrite the
/// cross-references in the rendered output.
pub(crate) fn convert_document(
    config: &Config,
    input: &std::path::Path,
    output: &std::path::Path,
    skip_refs: bool,
) -> Result<(), CliError> {
    let converter = PandocConverter::with_program(&config.pandoc.program);
    let options = ConvertOptions {
        toc: config.pandoc.toc,
        stylesheet: config.pandoc.stylesheet_resolved.clone(),
        extra_args: config.pandoc.extra_args.clone(),
    };
    converter.convert(input, output, &options)?;

    if !skip_refs {
        let rewriter = RefRewriter::new(&config.docs.source_ext, &config.docs.target_ext);
        rewriter.rewrite_file(output, None)?;
    }
    Ok(())
}

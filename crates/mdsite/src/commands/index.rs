//! `mdsite index` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdsite_config::{CliSettings, Config};
use mdsite_index::{IndexBuilder, OutlineStyle, write_index_file};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the index command.
#[derive(Args)]
pub(crate) struct IndexArgs {
    /// Root directory to index.
    dir: PathBuf,

    /// Outline filename, written into the root directory (default: index.md).
    #[arg(short, long)]
    output: Option<String>,

    /// Path to configuration file (default: auto-discover mdsite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl IndexArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            index_filename: self.output.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let builder = IndexBuilder::new(&config.docs.source_ext);
        let style = outline_style(&config);
        let path = write_index_file(&builder, &self.dir, &style, &config.index.filename)?;

        output.success(&format!("Index written to {}", path.display()));
        Ok(())
    }
}

/// Outline style from the loaded configuration.
pub(crate) fn outline_style(config: &Config) -> OutlineStyle {
    OutlineStyle {
        bullet: config.index.bullet,
        indent: config.index.indent.clone(),
        separator: config.index.separator.clone(),
    }
}

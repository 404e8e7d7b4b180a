//! `mdsite build` command implementation.
//!
//! Whole-tree batch: write the outline first (so it is part of the site),
//! then convert every source document in the tree and rewrite its
//! cross-references. Documents are independent, so conversion runs in
//! parallel; failures are collected per document and reported at the end
//! instead of aborting the batch.

use std::path::PathBuf;

use clap::Args;
use mdsite_config::{CliSettings, Config};
use mdsite_index::{DirectoryIndex, IndexBuilder, write_index_file};
use rayon::prelude::*;

use crate::commands::convert::convert_document;
use crate::commands::index::outline_style;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Root directory of the documentation tree.
    dir: PathBuf,

    /// Outline filename, written into the root directory (default: index.md).
    #[arg(short, long)]
    output: Option<String>,

    /// Stylesheet to link into every rendered page.
    #[arg(long)]
    css: Option<PathBuf>,

    /// Do not insert tables of contents into rendered pages.
    #[arg(long)]
    no_toc: bool,

    /// Path to configuration file (default: auto-discover mdsite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            index_filename: self.output.clone(),
            stylesheet: self.css.clone(),
            toc: self.no_toc.then_some(false),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        // The outline is written before collecting documents so it gets
        // converted along with everything else and becomes the site's entry
        // page. write_index_file deletes any stale outline before scanning.
        let builder = IndexBuilder::new(&config.docs.source_ext);
        let style = outline_style(&config);
        let outline = write_index_file(&builder, &self.dir, &style, &config.index.filename)?;
        output.info(&format!("Index written to {}", outline.display()));

        let index = builder.build(&self.dir)?;
        let mut sources = collect_documents(&index);
        // The second scan sees the outline we just wrote; keep exactly one
        // entry for it.
        sources.retain(|p| p != &outline);
        sources.push(outline);

        let total = sources.len();
        let failures: Vec<(PathBuf, CliError)> = sources
            .par_iter()
            .filter_map(|source| {
                let target = source.with_extension(&config.docs.target_ext);
                convert_document(&config, source, &target, false)
                    .err()
                    .map(|e| (source.clone(), e))
            })
            .collect();

        for (source, err) in &failures {
            output.warning(&format!("{}: {err}", source.display()));
        }
        if failures.is_empty() {
            output.success(&format!("Built {total} documents"));
            Ok(())
        } else {
            Err(CliError::Batch {
                failed: failures.len(),
                total,
            })
        }
    }
}

/// Flatten the index tree into absolute source document paths.
fn collect_documents(index: &DirectoryIndex) -> Vec<PathBuf> {
    let mut documents = Vec::with_capacity(index.document_count());
    collect_into(index, &mut documents);
    documents
}

fn collect_into(node: &DirectoryIndex, out: &mut Vec<PathBuf>) {
    for document in &node.documents {
        out.push(node.path.join(document));
    }
    for subsection in node.subsections.values() {
        collect_into(subsection, out);
    }
}

//! mdsite CLI - static documentation site builder.
//!
//! Provides commands for:
//! - `index`: Write a table-of-contents outline for a directory tree
//! - `convert`: Convert one Markdown document to HTML via pandoc
//! - `fix-refs`: Rewrite `.md` cross-references in a converted document
//! - `build`: Index and convert a whole tree

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, ConvertArgs, FixRefsArgs, IndexArgs};
use output::Output;

/// mdsite - static documentation site builder.
#[derive(Parser)]
#[command(name = "mdsite", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a table-of-contents outline into the root of a directory tree.
    Index(IndexArgs),
    /// Convert one Markdown document to a standalone HTML page.
    Convert(ConvertArgs),
    /// Rewrite Markdown cross-references in an already-converted document.
    FixRefs(FixRefsArgs),
    /// Build a whole tree: write the outline, then convert every document.
    Build(BuildArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Index(args) => args.verbose,
        Commands::Convert(args) => args.verbose,
        Commands::FixRefs(args) => args.verbose,
        Commands::Build(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Index(args) => args.execute(&output),
        Commands::Convert(args) => args.execute(&output),
        Commands::FixRefs(args) => args.execute(&output),
        Commands::Build(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

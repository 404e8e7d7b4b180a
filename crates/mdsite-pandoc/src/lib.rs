//! Pandoc invocation for converting Markdown documents to HTML.
//!
//! Pandoc is an external collaborator: this crate builds the argument list,
//! runs the child process and classifies failures. The child's working
//! directory is set to the source file's parent so Pandoc resolves relative
//! asset references (images, includes) against the source document; the
//! parent process's working directory is never touched.

mod error;

use std::path::{Path, PathBuf};
use std::process::Command;

pub use error::ConvertError;

/// Default pandoc input format: GitHub-flavored Markdown.
const INPUT_FORMAT: &str = "gfm";
/// Default pandoc output format.
const OUTPUT_FORMAT: &str = "html5";

/// Options for one conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Insert a table of contents into the rendered page.
    pub toc: bool,
    /// Stylesheet to link into the rendered page.
    pub stylesheet: Option<PathBuf>,
    /// Opaque flags passed through to pandoc verbatim, after the flags this
    /// crate sets itself.
    pub extra_args: Vec<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            toc: true,
            stylesheet: None,
            extra_args: Vec::new(),
        }
    }
}

/// Runs pandoc to convert one source document to a standalone HTML page.
pub struct PandocConverter {
    program: String,
}

impl PandocConverter {
    /// Create a converter invoking `pandoc` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_program("pandoc")
    }

    /// Create a converter invoking a specific program.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Convert `source` to `output`.
    ///
    /// The output file's parent directory is created if missing. Pandoc runs
    /// with its working directory set to the source file's directory, so
    /// relative asset references inside the document resolve against the
    /// source tree.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::NotFound`] if `source` is missing,
    /// [`ConvertError::ToolNotFound`] if the pandoc binary cannot be spawned
    /// and [`ConvertError::Failed`] if pandoc exits non-zero.
    pub fn convert(
        &self,
        source: &Path,
        output: &Path,
        options: &ConvertOptions,
    ) -> Result<(), ConvertError> {
        if !source.is_file() {
            return Err(ConvertError::NotFound(source.to_path_buf()));
        }
        let source = std::path::absolute(source)?;
        let output = std::path::absolute(output)?;

        if let Some(parent) = output.parent() {
            if !parent.exists() {
                tracing::info!(dir = %parent.display(), "creating output directory");
                std::fs::create_dir_all(parent)?;
            }
        }

        let args = build_args(&source, &output, options);
        tracing::debug!(program = %self.program, ?args, "invoking pandoc");

        let mut command = Command::new(&self.program);
        command.args(&args);
        // Relative asset references resolve against the source directory.
        if let Some(dir) = source.parent() {
            command.current_dir(dir);
        }

        let result = command.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConvertError::ToolNotFound(self.program.clone())
            } else {
                ConvertError::Io(e)
            }
        })?;

        if !result.status.success() {
            return Err(ConvertError::Failed {
                code: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }

        tracing::info!(source = %source.display(), output = %output.display(), "converted");
        Ok(())
    }
}

impl Default for PandocConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the pandoc argument list for one conversion.
fn build_args(source: &Path, output: &Path, options: &ConvertOptions) -> Vec<String> {
    let mut args = vec![
        format!("--from={INPUT_FORMAT}"),
        format!("--to={OUTPUT_FORMAT}"),
        "--standalone".to_owned(),
        "--embed-resources".to_owned(),
    ];
    if options.toc {
        args.push("--toc".to_owned());
    }
    if let Some(stylesheet) = &options.stylesheet {
        args.push(format!("--css={}", stylesheet.display()));
    }
    args.extend(options.extra_args.iter().cloned());
    args.push(format!("--output={}", output.display()));
    args.push(source.display().to_string());
    args
}

//! Configuration management for mdsite.
//!
//! Parses `mdsite.toml` with serde and provides auto-discovery of the config
//! file in parent directories. Every section has full defaults, so a missing
//! config file is not an error. CLI flags are applied during load via
//! [`CliSettings`]; only non-`None` values override the file.
//!
//! The stylesheet path supports `~` and `${VAR}` expansion and is resolved
//! relative to the config file's directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdsite.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the outline filename.
    pub index_filename: Option<String>,
    /// Override the stylesheet path.
    pub stylesheet: Option<PathBuf>,
    /// Override table-of-contents insertion.
    pub toc: Option<bool>,
    /// Extra flags passed through to pandoc.
    pub extra_args: Vec<String>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document extension configuration.
    pub docs: DocsConfig,
    /// Outline formatting configuration.
    pub index: IndexConfig,
    /// Pandoc invocation configuration.
    pub pandoc: PandocConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs: DocsConfig::default(),
            index: IndexConfig::default(),
            pandoc: PandocConfig::default(),
            config_path: None,
        }
    }
}

/// Document extension configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Extension of source documents, without the leading dot.
    pub source_ext: String,
    /// Extension of converted documents, without the leading dot.
    pub target_ext: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            source_ext: "md".to_owned(),
            target_ext: "html".to_owned(),
        }
    }
}

/// Outline formatting configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Filename of the generated outline, placed in the indexed root.
    pub filename: String,
    /// Bullet character for outline lines.
    pub bullet: char,
    /// Indent string repeated per nesting depth.
    pub indent: String,
    /// Separator joining path segments in section labels.
    pub separator: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            filename: "index.md".to_owned(),
            bullet: '*',
            indent: "  ".to_owned(),
            separator: "/".to_owned(),
        }
    }
}

/// Pandoc invocation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PandocConfig {
    /// Program to invoke.
    pub program: String,
    /// Stylesheet path as written in the config file; resolved during load.
    stylesheet: Option<String>,
    /// Insert a table of contents into rendered pages.
    pub toc: bool,
    /// Opaque flags passed through to pandoc.
    pub extra_args: Vec<String>,

    /// Resolved absolute stylesheet path (set after loading).
    #[serde(skip)]
    pub stylesheet_resolved: Option<PathBuf>,
}

impl Default for PandocConfig {
    fn default() -> Self {
        Self {
            program: "pandoc".to_owned(),
            stylesheet: None,
            toc: true,
            extra_args: Vec::new(),
            stylesheet_resolved: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("configuration error: {0}")]
    Validation(String),
    /// Variable expansion error in a path value.
    #[error("expansion error in {field}: {message}")]
    Expand {
        /// Config field path (e.g. `pandoc.stylesheet`).
        field: String,
        /// Underlying expansion failure.
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `mdsite.toml` in the current directory and parents,
    /// falling back to defaults when nothing is found.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist, parsing
    /// fails or a value fails validation.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(filename) = &settings.index_filename {
            self.index.filename.clone_from(filename);
        }
        if let Some(stylesheet) = &settings.stylesheet {
            self.pandoc.stylesheet_resolved = Some(stylesheet.clone());
        }
        if let Some(toc) = settings.toc {
            self.pandoc.toc = toc;
        }
        self.pandoc
            .extra_args
            .extend(settings.extra_args.iter().cloned());
    }

    /// Search for the config file in the current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        Self::discover_config_from(std::env::current_dir().ok()?)
    }

    /// Search for the config file in `start` and its parents.
    fn discover_config_from(start: PathBuf) -> Option<PathBuf> {
        let mut current = start;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_stylesheet(config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Expand and absolutize the stylesheet path relative to the config dir.
    fn resolve_stylesheet(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let Some(raw) = &self.pandoc.stylesheet else {
            return Ok(());
        };
        let expanded = shellexpand::full(raw).map_err(|e| ConfigError::Expand {
            field: "pandoc.stylesheet".to_owned(),
            message: e.to_string(),
        })?;
        let path = PathBuf::from(expanded.as_ref());
        self.pandoc.stylesheet_resolved = if path.is_absolute() {
            Some(path)
        } else {
            Some(config_dir.join(path))
        };
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_extension(&self.docs.source_ext, "docs.source_ext")?;
        require_extension(&self.docs.target_ext, "docs.target_ext")?;
        if self.index.filename.is_empty() {
            return Err(ConfigError::Validation(
                "index.filename cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Require an extension field to be non-empty and written without a dot.
fn require_extension(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    if value.contains('.') {
        return Err(ConfigError::Validation(format!(
            "{field} must be given without a dot (e.g. \"md\")"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        (temp, path)
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.docs.source_ext, "md");
        assert_eq!(config.docs.target_ext, "html");
        assert_eq!(config.index.filename, "index.md");
        assert_eq!(config.index.bullet, '*');
        assert_eq!(config.index.indent, "  ");
        assert_eq!(config.pandoc.program, "pandoc");
        assert!(config.pandoc.toc);
    }

    #[test]
    fn test_discovery_finds_nearest_parent_config() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILENAME),
            "[docs]\nsource_ext = \"markdown\"\n",
        )
        .unwrap();
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        // The nearest config above the start directory wins, so the search
        // never escapes the tempdir.
        assert_eq!(
            Config::discover_config_from(nested),
            Some(temp.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_load_explicit_file() {
        let (_temp, path) = write_config(
            r#"
            [docs]
            source_ext = "markdown"

            [index]
            filename = "toc.md"
            bullet = "-"

            [pandoc]
            program = "/opt/pandoc/bin/pandoc"
            toc = false
            extra_args = ["--mathjax"]
            "#,
        );
        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.docs.source_ext, "markdown");
        assert_eq!(config.docs.target_ext, "html");
        assert_eq!(config.index.filename, "toc.md");
        assert_eq!(config.index.bullet, '-');
        assert_eq!(config.pandoc.program, "/opt/pandoc/bin/pandoc");
        assert!(!config.pandoc.toc);
        assert_eq!(config.pandoc.extra_args, vec!["--mathjax"]);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/mdsite.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_cli_settings_override() {
        let (_temp, path) = write_config(
            r#"
            [index]
            filename = "toc.md"
            "#,
        );
        let settings = CliSettings {
            index_filename: Some("overview.md".to_owned()),
            toc: Some(false),
            stylesheet: Some(PathBuf::from("/styles/site.css")),
            extra_args: vec!["--mathjax".to_owned()],
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.index.filename, "overview.md");
        assert!(!config.pandoc.toc);
        assert_eq!(
            config.pandoc.stylesheet_resolved,
            Some(PathBuf::from("/styles/site.css"))
        );
        assert_eq!(config.pandoc.extra_args, vec!["--mathjax"]);
    }

    #[test]
    fn test_relative_stylesheet_resolved_against_config_dir() {
        let (temp, path) = write_config(
            r#"
            [pandoc]
            stylesheet = "styles/site.css"
            "#,
        );
        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(
            config.pandoc.stylesheet_resolved,
            Some(temp.path().join("styles/site.css"))
        );
    }

    #[test]
    fn test_dotted_extension_rejected() {
        let (_temp, path) = write_config(
            r#"
            [docs]
            source_ext = ".md"
            "#,
        );
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_empty_index_filename_rejected() {
        let (_temp, path) = write_config(
            r#"
            [index]
            filename = ""
            "#,
        );
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}

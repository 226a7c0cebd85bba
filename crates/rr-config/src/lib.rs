//! Configuration management for rr.
//!
//! Reads the long description and its content type from the `[project]`
//! table of `pyproject.toml`, and checker settings from `[tool.rr]`:
//!
//! ```toml
//! [project]
//! name = "example"
//! readme = "README.rst"
//!
//! [tool.rr]
//! halt-level = "error"
//! report-level = "warning"
//! strict = true
//! ```
//!
//! `readme` may also be a table with exactly one of `file` or `text` and a
//! required `content-type`. With the string form the content type is
//! inferred from the file extension.
//!
//! The config file is discovered in the current directory and its parents.
//! CLI settings are applied after load via [`CliSettings`].

use std::path::{Path, PathBuf};

use rr_markup::{Markup, Severity};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "pyproject.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Read the description from this file instead of `project.readme`.
    pub readme: Option<PathBuf>,
    /// Override the declared content type.
    pub content_type: Option<String>,
    /// Override the severity at which rendering fails.
    pub halt_level: Option<Severity>,
    /// Override the minimum reported severity.
    pub report_level: Option<Severity>,
    /// Override strict mode.
    pub strict: Option<bool>,
}

/// `pyproject.toml` as parsed from TOML. Unknown tables are ignored.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PyProject {
    project: Option<ProjectRaw>,
    tool: ToolRaw,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ProjectRaw {
    name: Option<String>,
    readme: Option<ReadmeRaw>,
}

/// `project.readme`: a path, or a table.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReadmeRaw {
    Path(String),
    Table(ReadmeTable),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReadmeTable {
    file: Option<String>,
    text: Option<String>,
    content_type: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ToolRaw {
    rr: RrRaw,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "kebab-case")]
struct RrRaw {
    halt_level: Option<Severity>,
    report_level: Option<Severity>,
    strict: Option<bool>,
}

/// Resolved configuration.
#[derive(Debug)]
pub struct Config {
    /// `project.name`, if declared.
    pub project_name: Option<String>,
    /// Long description text. `None` when no readme is configured.
    pub description: Option<String>,
    /// Declared or inferred content type.
    pub content_type: Option<String>,
    /// File the description was read from, if any.
    pub readme_path: Option<PathBuf>,
    /// Severity at which reStructuredText rendering fails.
    pub halt_level: Severity,
    /// Minimum severity of reported renderer messages.
    pub report_level: Severity,
    /// Whether warnings should fail `rr check`.
    pub strict: bool,
    /// Path to the config file (set after loading).
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_name: None,
            description: None,
            content_type: None,
            readme_path: None,
            halt_level: Severity::Warning,
            report_level: Severity::Warning,
            strict: false,
            config_path: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// The readme file could not be read.
    #[error("Cannot read readme {}: {source}", path.display())]
    Readme {
        /// Resolved readme path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `pyproject.toml` in current directory and parents.
    /// Without any config file the description is absent.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// `project.readme` is malformed, or the readme cannot be read.
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
            tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings)?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) -> Result<(), ConfigError> {
        if let Some(readme) = &settings.readme {
            self.description = Some(read_readme(readme)?);
            self.readme_path = Some(readme.clone());
            if settings.content_type.is_none() {
                self.content_type = Some(infer_content_type(readme)?);
            }
        }
        if let Some(content_type) = &settings.content_type {
            self.content_type = Some(content_type.clone());
        }
        if let Some(halt_level) = settings.halt_level {
            self.halt_level = halt_level;
        }
        if let Some(report_level) = settings.report_level {
            self.report_level = report_level;
        }
        if let Some(strict) = settings.strict {
            self.strict = strict;
        }
        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "Discovered config file");
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
        Self::from_toml(&content, path)
    }

    /// Parse `content` as the config file at `path`.
    ///
    /// Relative readme paths resolve against the directory of `path`.
    fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: PyProject = toml::from_str(content)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let project = raw.project.unwrap_or_default();
        let rr = raw.tool.rr;

        let mut config = Self {
            project_name: project.name,
            halt_level: rr.halt_level.unwrap_or(Severity::Warning),
            report_level: rr.report_level.unwrap_or(Severity::Warning),
            strict: rr.strict.unwrap_or(false),
            config_path: Some(path.to_path_buf()),
            ..Self::default()
        };

        match project.readme {
            None => {}
            Some(ReadmeRaw::Path(file)) => {
                let file = config_dir.join(file);
                config.content_type = Some(infer_content_type(&file)?);
                config.description = Some(read_readme(&file)?);
                config.readme_path = Some(file);
            }
            Some(ReadmeRaw::Table(table)) => {
                let content_type = table.content_type.ok_or_else(|| {
                    ConfigError::Validation("project.readme.content-type is required".to_owned())
                })?;
                match (table.file, table.text) {
                    (Some(file), None) => {
                        let file = config_dir.join(file);
                        config.description = Some(read_readme(&file)?);
                        config.readme_path = Some(file);
                    }
                    (None, Some(text)) => config.description = Some(text),
                    _ => {
                        return Err(ConfigError::Validation(
                            "project.readme must set exactly one of file or text".to_owned(),
                        ));
                    }
                }
                config.content_type = Some(content_type);
            }
        }

        tracing::debug!(
            path = %path.display(),
            content_type = config.content_type.as_deref().unwrap_or("(unset)"),
            "Loaded config"
        );
        Ok(config)
    }
}

fn read_readme(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Readme {
        path: path.to_path_buf(),
        source,
    })
}

/// Content type for a readme file, from its extension.
fn infer_content_type(path: &Path) -> Result<String, ConfigError> {
    Markup::from_extension(path)
        .map(|markup| markup.essence().to_owned())
        .ok_or_else(|| {
            ConfigError::Validation(format!(
                "cannot infer content type of {}; set it explicitly",
                path.display()
            ))
        })
}

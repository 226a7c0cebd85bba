//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod render;

use std::path::PathBuf;

use clap::Args;
use rr_check::Host;
use rr_config::{CliSettings, Config};
use rr_markup::Severity;

use crate::error::CliError;
use crate::output::Output;

pub(crate) use check::CheckArgs;
pub(crate) use render::RenderArgs;

/// Where the long description comes from and how it is rendered.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Path to configuration file (default: auto-discover pyproject.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read the long description from this file (overrides config).
    #[arg(short, long)]
    readme: Option<PathBuf>,

    /// Content type of the long description, e.g. `text/markdown` (overrides config).
    #[arg(short = 't', long)]
    content_type: Option<String>,

    /// Severity at which reStructuredText rendering fails (overrides config).
    #[arg(long, value_name = "LEVEL")]
    halt_level: Option<Severity>,

    /// Minimum severity of reported messages (overrides config).
    #[arg(long, value_name = "LEVEL")]
    report_level: Option<Severity>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl SourceArgs {
    /// Load configuration with these arguments applied.
    fn load(self, strict: Option<bool>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            readme: self.readme,
            content_type: self.content_type,
            halt_level: self.halt_level,
            report_level: self.report_level,
            strict,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }
        Ok(config)
    }
}

/// Describe the description being checked, e.g. `Checking demo (README.rst)`.
fn source_summary(config: &Config) -> Option<String> {
    let readme = config.readme_path.as_ref()?;
    Some(match &config.project_name {
        Some(name) => format!("Checking {name} ({})", readme.display()),
        None => format!("Checking {}", readme.display()),
    })
}

/// [`Host`] backed by loaded configuration, reporting to the terminal.
pub(crate) struct ConsoleHost<'a> {
    config: &'a Config,
    output: &'a Output,
}

impl<'a> ConsoleHost<'a> {
    pub(crate) fn new(config: &'a Config, output: &'a Output) -> Self {
        Self { config, output }
    }
}

impl Host for ConsoleHost<'_> {
    fn description(&self) -> Option<&str> {
        self.config.description.as_deref()
    }

    fn content_type(&self) -> Option<&str> {
        self.config.content_type.as_deref()
    }

    fn warn(&self, message: &str) {
        self.output.warning(message);
    }

    fn announce(&self, message: &str) {
        self.output.success(message);
    }
}

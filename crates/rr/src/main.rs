//! rr CLI - long description checker and renderer.
//!
//! Provides commands for:
//! - `check`: Validate the long description and report warnings
//! - `render`: Render the long description to stdout

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use rr_check::Status;
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, RenderArgs};
use output::Output;

/// rr - Validate and preview package long descriptions.
#[derive(Parser)]
#[command(name = "rr", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the long description renders cleanly.
    Check(CheckArgs),
    /// Render the long description to stdout.
    Render(RenderArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Check(args) => args.source.verbose,
        Commands::Render(args) => args.source.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN.
    // Logs go to stderr so rendered output on stdout stays clean.
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(),
        Commands::Render(args) => args.execute(),
    };

    match result {
        Ok(Status::Success) => {}
        Ok(status) => std::process::exit(status.code()),
        Err(err) => {
            output.error(&format!("Error: {err}"));
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use rr_markup::Severity;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_args() {
        let cli = Cli::try_parse_from([
            "rr",
            "check",
            "--readme",
            "README.md",
            "--halt-level",
            "error",
            "--strict",
            "-v",
        ])
        .unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check command");
        };
        assert!(args.source.verbose);
    }

    #[test]
    fn test_parse_render_rejects_unknown_level() {
        assert!(Cli::try_parse_from(["rr", "render", "--report-level", "loud"]).is_err());
        assert!("severe".parse::<Severity>().is_ok());
    }
}

//! `rr render` command implementation.

use std::io::{self, Write};

use clap::Args;
use rr_check::{Printer, Status};

use super::{ConsoleHost, SourceArgs};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Disable colored messages.
    #[arg(long)]
    no_color: bool,
}

impl RenderArgs {
    /// Execute the render command, writing the rendered description to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails to load or stdout cannot be
    /// written.
    pub(crate) fn execute(self) -> Result<Status, CliError> {
        self.render_to(&mut io::stdout().lock())
    }

    /// Render the description into `out`; warnings still go to stderr.
    fn render_to(self, out: &mut impl Write) -> Result<Status, CliError> {
        let mut output = Output::new();
        let color = !self.no_color && output.is_term();
        if self.no_color {
            output = output.without_color();
        }
        let config = self.source.load(None)?;

        let printer = Printer::new()
            .with_halt_level(config.halt_level)
            .with_report_level(config.report_level)
            .with_color(color);
        Ok(printer.render(&ConsoleHost::new(&config, &output), out)?)
    }
}

//! `rr check` command implementation.

use clap::Args;
use rr_check::{Checker, Status};

use super::{ConsoleHost, SourceArgs, source_summary};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Exit with an error when any warning is reported (overrides config).
    #[arg(long)]
    strict: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Warnings never fail the command unless strict mode is on.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails to load.
    pub(crate) fn execute(self) -> Result<Status, CliError> {
        let output = Output::new();
        let config = self.source.load(self.strict.then_some(true))?;

        if let Some(summary) = source_summary(&config) {
            output.info(&summary);
        }

        let checker = Checker::new()
            .with_halt_level(config.halt_level)
            .with_report_level(config.report_level);
        let warnings = checker.check(&ConsoleHost::new(&config, &output));

        Ok(check_status(config.strict, warnings.len()))
    }
}

fn check_status(strict: bool, warnings: usize) -> Status {
    if strict && warnings > 0 {
        Status::Failure
    } else {
        Status::Success
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_warnings_only_fail_in_strict_mode() {
        assert_eq!(check_status(false, 0), Status::Success);
        assert_eq!(check_status(false, 1), Status::Success);
        assert_eq!(check_status(true, 0), Status::Success);
        assert_eq!(check_status(true, 1), Status::Failure);
    }
}

//! Command-line interface layer.
//!
//! Parses arguments, installs the log sink, runs the command and maps the
//! outcome to an [`ExitStatus`].

use anyhow::Result;

mod args;
mod commands;
mod exit_status;
mod logging;
mod report;
mod run;

pub use args::{
    Arguments, Command, CommonArgs, ExtractCommand, FormatCommand, ParseCommand,
};
pub use exit_status::ExitStatus;
pub use report::{SUCCESS_MARK, print_extract_report, print_extract_report_to};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    logging::init(args.verbose());
    run::run(args)
}

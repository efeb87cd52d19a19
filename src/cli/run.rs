use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{extract::extract, format::format, init::init, parse::parse},
    exit_status::ExitStatus,
};

/// Dispatch to the handler of the parsed command.
pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Extract(cmd)) => extract(cmd),
        Some(Command::Format(cmd)) => format(cmd),
        Some(Command::Parse(cmd)) => parse(cmd),
        Some(Command::Init) => init(),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}

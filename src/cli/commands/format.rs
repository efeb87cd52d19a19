use anyhow::{Context, Result};

use super::super::{args::FormatCommand, exit_status::ExitStatus};
use super::helper::Project;
use crate::runtime::{FormatOptions, MessageDescriptor, MessageVariables};

pub fn format(cmd: FormatCommand) -> Result<ExitStatus> {
    let project = Project::load(&cmd.common)?;

    let values: Option<MessageVariables> = cmd
        .values
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .context("Invalid --values: expected a JSON object of strings and numbers")?;

    let intl = project.intl()?;
    let descriptor = MessageDescriptor {
        id: cmd.id,
        default_message: cmd.default_message,
    };
    let options = FormatOptions {
        fallback: cmd.fallback,
    };
    let text = intl.format_message(descriptor, values.as_ref(), cmd.locale.as_deref(), &options);
    println!("{}", text);
    Ok(ExitStatus::Success)
}

use anyhow::{Context, Result};

use super::super::{args::ParseCommand, exit_status::ExitStatus};
use super::helper::Project;

pub fn parse(cmd: ParseCommand) -> Result<ExitStatus> {
    let project = Project::load(&cmd.common)?;
    let intl = project.intl()?;

    let variables = intl.extract_variables(cmd.id.as_str(), &cmd.text, cmd.locale.as_deref());
    let json = serde_json::to_string_pretty(&variables).context("Failed to serialize variables")?;
    println!("{}", json);
    Ok(ExitStatus::Success)
}

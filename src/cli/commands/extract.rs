use anyhow::Result;

use super::super::{args::ExtractCommand, exit_status::ExitStatus, report::print_extract_report};
use super::helper::Project;
use crate::extract::extract_messages;

pub fn extract(cmd: ExtractCommand) -> Result<ExitStatus> {
    let Project { root, mut config } = Project::load(&cmd.common)?;

    if !cmd.source_dirs.is_empty() {
        config.source_dir = cmd.source_dirs;
    }
    if let Some(dir) = cmd.output_dir {
        config.output_dir = dir;
    }
    if !cmd.locales.is_empty() {
        config.locales = cmd.locales;
    }
    if let Some(fallback) = cmd.fallback {
        config.fallback = Some(fallback);
    }
    if let Some(sort_by) = cmd.sort_by {
        config.sort_by = Some(sort_by);
    }

    let report = extract_messages(&root, &config)?;
    print_extract_report(&report, cmd.common.verbose);
    Ok(ExitStatus::Success)
}

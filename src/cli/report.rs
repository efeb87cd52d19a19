//! Report formatting and printing utilities.
//!
//! Kept apart from the extraction pipeline so the library never prints.

use std::io::{self, Write};

use colored::Colorize;

use crate::extract::ExtractReport;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

fn plural(count: usize, singular: &'static str, plural: &'static str) -> &'static str {
    if count == 1 { singular } else { plural }
}

/// Print the extraction summary to stdout.
pub fn print_extract_report(report: &ExtractReport, verbose: bool) {
    print_extract_report_to(report, verbose, &mut io::stdout().lock());
}

/// Print the extraction summary to a custom writer.
pub fn print_extract_report_to<W: Write>(report: &ExtractReport, verbose: bool, writer: &mut W) {
    let headline = format!(
        "Extracted {} {} from {} of {} source {}",
        report.messages_extracted,
        plural(report.messages_extracted, "message", "messages"),
        report.files_with_messages,
        report.files_processed,
        plural(report.files_processed, "file", "files"),
    );
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), headline.green());

    if report.parse_failures > 0 {
        let _ = writeln!(
            writer,
            "{} {} message {} could not be parsed{}",
            "warning:".bold().yellow(),
            report.parse_failures,
            plural(report.parse_failures, "descriptor", "descriptors"),
            if verbose { "" } else { " (see log output above)" }
        );
    }
    if report.skipped_paths > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} could not be accessed",
            "warning:".bold().yellow(),
            report.skipped_paths,
            plural(report.skipped_paths, "path", "paths"),
        );
    }

    let _ = writeln!(writer, "template: {}", report.template_path.display());
    let _ = writeln!(writer, "message map: {}", report.message_map_path.display());
    let _ = writeln!(writer, "file map: {}", report.file_map_path.display());
    let _ = writeln!(writer, "locales:");
    for locale in &report.locales {
        let mut line = format!(
            "  {} ({} {}",
            locale.path.display(),
            locale.total,
            plural(locale.total, "key", "keys")
        );
        if locale.added > 0 {
            line.push_str(&format!(", {} added", locale.added));
        }
        if locale.filled > 0 {
            line.push_str(&format!(", {} filled", locale.filled));
        }
        if locale.removed > 0 {
            line.push_str(&format!(", {} removed", locale.removed));
        }
        line.push(')');
        let _ = writeln!(writer, "{}", line);
    }
}

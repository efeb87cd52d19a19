//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Scan sources and rebuild locale dictionaries and artifacts
//! - `format`: Format one message with the configured locale files
//! - `parse`: Recover variables from already formatted text
//! - `init`: Initialize the `.intlrc.json` configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "intl", author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Format(cmd)) => cmd.common.verbose,
            Some(Command::Parse(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project directory; the config file is searched from here upward
    #[arg(long, env = "INTL_PROJECT_DIR")]
    pub path: Option<PathBuf>,

    /// Locales directory (overrides config file)
    #[arg(long)]
    pub locales_dir: Option<String>,

    /// Default language (overrides config file)
    #[arg(long)]
    pub default_language: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Source directory to scan (overrides config file)
    /// Can be specified multiple times: --source-dir client --source-dir server
    #[arg(long = "source-dir")]
    pub source_dirs: Vec<String>,

    /// Directory for template.json, message-map.json and file-map.json
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Locale to build (overrides config file)
    /// Can be specified multiple times: --locale en --locale fr
    #[arg(long = "locale")]
    pub locales: Vec<String>,

    /// Locale whose values fill gaps in the other locales
    #[arg(long)]
    pub fallback: Option<String>,

    /// Key order of locale files: keys, source or none
    #[arg(long)]
    pub sort_by: Option<String>,
}

#[derive(Debug, Args)]
pub struct FormatCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Message id
    pub id: String,

    /// Variables as a JSON object, e.g. '{"name": "Jack", "count": 2}'
    #[arg(long)]
    pub values: Option<String>,

    /// Locale to format in (defaults to the default language)
    #[arg(long)]
    pub locale: Option<String>,

    /// Text returned when the message or a variable is missing
    #[arg(long)]
    pub fallback: Option<String>,

    /// Template used when the id is not in the locale files
    #[arg(long)]
    pub default_message: Option<String>,
}

#[derive(Debug, Args)]
pub struct ParseCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Message id whose template is matched against the text
    pub id: String,

    /// Formatted text to recover variables from
    pub text: String,

    /// Locale of the text (defaults to the default language)
    #[arg(long)]
    pub locale: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan source files and update locale dictionaries
    Extract(ExtractCommand),
    /// Format a message from the locale dictionaries
    Format(FormatCommand),
    /// Recover variable values from formatted text
    Parse(ParseCommand),
    /// Initialize a new .intlrc.json configuration file
    Init,
}

//! Intl tools - message templates and source extraction
//!
//! The library resolves message ids to locale templates at runtime, fills
//! `{name}` placeholders (including nested `{@'message.id'}` references),
//! recovers variables from already formatted text, and at build time scans a
//! source tree for message usages to keep per-locale JSON dictionaries in sync.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (`intl extract`, `format`, `parse`, `init`)
//! - `config`: Extraction configuration loading and validation
//! - `extract`: Source scanning, descriptor parsing and dictionary building
//! - `runtime`: Template store, substitution engine and inverse parser
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod extract;
pub mod runtime;
pub mod utils;

//! Build-time message extraction.
//!
//! Scans a source tree with line-scoped regex rules, records every message
//! usage, and keeps the per-locale JSON dictionaries in sync:
//!
//! 1. **Discover**: walk the source dirs for files with configured extensions
//! 2. **Scan**: apply each rule to each line, parsing descriptor literals
//! 3. **Merge**: fill missing ids per locale without touching existing values
//! 4. **Write**: locale files plus `template.json`, `message-map.json` and
//!    `file-map.json` under the output dir
//!
//! ## Module Structure
//!
//! - `descriptor`: Restricted parser for `{ id, defaultMessage }` literals
//! - `dictionary`: Locale file reading, merge precedence and key ordering
//! - `files`: Source file discovery
//! - `pipeline`: The end-to-end `extract_messages` run
//! - `rules`: Extraction rule config, compilation and the built-in rules
//! - `scanner`: Line scanner producing message and file maps
//! - `writer`: JSON output with configurable indent

mod descriptor;
mod dictionary;
mod files;
mod pipeline;
mod rules;
mod scanner;
mod writer;

pub use descriptor::{DescriptorError, normalize_placeholders, parse_descriptor};
pub use dictionary::{
    Dictionary, MergeOptions, MergeOutcome, SortBy, merge_dictionary, read_dictionary,
};
pub use files::{DiscoveredFiles, FileFilter, discover_files, is_glob_pattern};
pub use pipeline::{
    ExtractReport, FILE_MAP_FILE, LocaleReport, MESSAGE_MAP_FILE, TEMPLATE_FILE, extract_messages,
};
pub use rules::{
    ExtractionRule, PatternConfig, RuleKind, compile_rules, default_patterns, extract_keys,
};
pub use scanner::{
    DefaultMessages, FileMap, FileOccurrence, MessageMap, Occurrence, ScanResult, Scanner,
    scan_files,
};
pub use writer::{render_json, write_json};

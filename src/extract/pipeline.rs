use std::path::{Path, PathBuf};

use anyhow::Result;
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

use super::{
    dictionary::{Dictionary, MergeOptions, merge_dictionary, read_dictionary},
    files::{FileFilter, discover_files},
    rules::compile_rules,
    scanner::scan_files,
    writer::write_json,
};
use crate::config::ExtractConfig;

pub const TEMPLATE_FILE: &str = "template.json";
pub const MESSAGE_MAP_FILE: &str = "message-map.json";
pub const FILE_MAP_FILE: &str = "file-map.json";

/// Per-locale result of an extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleReport {
    pub lang: String,
    /// Relative to the project root.
    pub path: PathBuf,
    pub total: usize,
    pub added: usize,
    pub filled: usize,
    pub removed: usize,
}

/// Summary of an extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    pub files_processed: usize,
    pub messages_extracted: usize,
    pub files_with_messages: usize,
    pub parse_failures: usize,
    pub skipped_paths: usize,
    pub template_path: PathBuf,
    pub message_map_path: PathBuf,
    pub file_map_path: PathBuf,
    pub locales: Vec<LocaleReport>,
}

fn locale_file(locales_dir: &str, lang: &str) -> PathBuf {
    Path::new(locales_dir).join(format!("{}.json", lang))
}

/// Scan the source tree under `root` and rebuild every locale dictionary
/// plus the template, message map and file map artifacts.
///
/// All locale files are read and merged before anything is written, so a
/// corrupt dictionary aborts the run with no output.
pub fn extract_messages(root: &Path, config: &ExtractConfig) -> Result<ExtractReport> {
    config.validate()?;
    let sort_by = config.sort_mode()?;
    let rules = compile_rules(&config.patterns)?;

    let discovered_files = discover_files(
        root,
        FileFilter {
            source_dirs: &config.source_dir,
            ignores: &config.ignores,
            extensions: &config.extensions,
        },
    );
    let scan = scan_files(root, &discovered_files.files, &rules)?;

    let ids: IndexSet<String> = scan.message_map.keys().cloned().collect();
    let template: IndexMap<&str, &str> = ids.iter().map(|id| (id.as_str(), "")).collect();

    let fallback: Option<Dictionary> = match &config.fallback {
        Some(lang) => {
            let path = root.join(locale_file(&config.locales_dir, lang));
            let dictionary = read_dictionary(&path)?;
            if dictionary.is_none() {
                warn!(path = %path.display(), "fallback locale file not found");
            }
            dictionary
        }
        None => None,
    };
    if !config.locales.contains(&config.default_language) {
        warn!(
            default_language = %config.default_language,
            "default language is not among the configured locales, default messages are not written"
        );
    }

    let mut merged = Vec::with_capacity(config.locales.len());
    for lang in &config.locales {
        let relative = locale_file(&config.locales_dir, lang);
        let existing = read_dictionary(&root.join(&relative))?.unwrap_or_default();
        let outcome = merge_dictionary(
            existing,
            &ids,
            &scan.default_messages,
            fallback.as_ref(),
            MergeOptions {
                is_default_language: *lang == config.default_language,
                empty_tags: config.empty_tags,
                reserve_keys: config.reserve_keys,
                sort_by,
            },
        );
        debug!(
            locale = %lang,
            added = outcome.added,
            filled = outcome.filled,
            removed = outcome.removed,
            "merged locale dictionary"
        );
        merged.push((lang, relative, outcome));
    }

    let mut locales = Vec::with_capacity(merged.len());
    for (lang, relative, outcome) in merged {
        write_json(&root.join(&relative), &outcome.dictionary, config.json_indent)?;
        locales.push(LocaleReport {
            lang: lang.clone(),
            path: relative,
            total: outcome.dictionary.len(),
            added: outcome.added,
            filled: outcome.filled,
            removed: outcome.removed,
        });
    }

    let output_dir = Path::new(&config.output_dir);
    let template_path = output_dir.join(TEMPLATE_FILE);
    let message_map_path = output_dir.join(MESSAGE_MAP_FILE);
    let file_map_path = output_dir.join(FILE_MAP_FILE);
    write_json(&root.join(&template_path), &template, config.json_indent)?;
    write_json(&root.join(&message_map_path), &scan.message_map, config.json_indent)?;
    write_json(&root.join(&file_map_path), &scan.file_map, config.json_indent)?;

    Ok(ExtractReport {
        files_processed: scan.files_scanned,
        messages_extracted: ids.len(),
        files_with_messages: scan.file_map.len(),
        parse_failures: scan.parse_failures,
        skipped_paths: discovered_files.skipped_count,
        template_path,
        message_map_path,
        file_map_path,
        locales,
    })
}

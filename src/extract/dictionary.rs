use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use indexmap::IndexSet;
use serde_json::{Map, Value};

use super::scanner::DefaultMessages;

/// A locale file as stored on disk. Values are kept as parsed so that
/// entries this tool does not manage survive a rebuild untouched.
pub type Dictionary = Map<String, Value>;

/// Key order of a rebuilt dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Lexicographic by id.
    #[default]
    Keys,
    /// Discovered ids in first-occurrence order, then the remaining keys
    /// in their existing order.
    Source,
    /// Existing keys first, new ids appended.
    None,
}

impl SortBy {
    /// Parse the `sortBy` option; `None` (JSON `null`) keeps insertion order.
    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value {
            Some("keys") => Ok(Self::Keys),
            Some("source") => Ok(Self::Source),
            Some("none") | None => Ok(Self::None),
            Some(other) => {
                bail!("Invalid 'sortBy': \"{other}\" (expected \"keys\", \"source\" or \"none\")")
            }
        }
    }
}

/// Read a locale dictionary. `Ok(None)` when the file does not exist.
pub fn read_dictionary(path: &Path) -> Result<Option<Dictionary>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read locale file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse locale file: {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(Some(map)),
        _ => bail!("Root of locale file must be an object: {}", path.display()),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MergeOptions {
    /// Whether extracted default messages apply to this locale.
    pub is_default_language: bool,
    pub empty_tags: bool,
    /// Keep on-disk ids that were not discovered in this run.
    pub reserve_keys: bool,
    pub sort_by: SortBy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub dictionary: Dictionary,
    /// Ids that were not in the file before.
    pub added: usize,
    /// Ids that were present but empty and received a value.
    pub filled: usize,
    /// Undiscovered ids dropped because `reserve_keys` is off.
    pub removed: usize,
}

/// Merge discovered ids into one locale's existing dictionary.
///
/// Per id, the first available of: the existing non-empty value, the
/// extracted default message (default language only), the fallback
/// locale's non-empty value, an empty stub (when `empty_tags` is on).
pub fn merge_dictionary(
    existing: Dictionary,
    discovered: &IndexSet<String>,
    default_messages: &DefaultMessages,
    fallback: Option<&Dictionary>,
    options: MergeOptions,
) -> MergeOutcome {
    let mut dictionary = existing;
    let mut added = 0;
    let mut filled = 0;
    let mut removed = 0;

    if !options.reserve_keys {
        let before = dictionary.len();
        dictionary.retain(|id, _| discovered.contains(id));
        removed = before - dictionary.len();
    }

    for id in discovered {
        let current = dictionary.get(id);
        if current.is_some_and(has_text) {
            continue;
        }
        let candidate = options
            .is_default_language
            .then(|| default_messages.get(id).cloned())
            .flatten()
            .or_else(|| {
                fallback
                    .and_then(|f| f.get(id))
                    .filter(|v| has_text(v))
                    .and_then(|v| v.as_str().map(str::to_string))
            })
            .or_else(|| options.empty_tags.then(String::new));
        let Some(candidate) = candidate else {
            continue;
        };
        let candidate = Value::String(candidate);
        match current {
            None => added += 1,
            Some(value) if *value == candidate => continue,
            Some(_) => filled += 1,
        }
        dictionary.insert(id.clone(), candidate);
    }

    MergeOutcome {
        dictionary: sort_dictionary(dictionary, discovered, options.sort_by),
        added,
        filled,
        removed,
    }
}

/// Present, non-null and not an empty string.
fn has_text(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn sort_dictionary(
    dictionary: Dictionary,
    discovered: &IndexSet<String>,
    sort_by: SortBy,
) -> Dictionary {
    match sort_by {
        SortBy::None => dictionary,
        SortBy::Keys => {
            let mut entries: Vec<(String, Value)> = dictionary.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            entries.into_iter().collect()
        }
        SortBy::Source => {
            let mut rest = dictionary;
            let mut sorted = Dictionary::new();
            for id in discovered {
                if let Some(value) = rest.remove(id) {
                    sorted.insert(id.clone(), value);
                }
            }
            sorted.extend(rest);
            sorted
        }
    }
}

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::types::{LocaleConfig, MessageDictionary};

/// Holds every locale's dictionary and answers exact-match lookups.
///
/// No region-to-language fallback happens here: a missing `fr-CA` never
/// tries `fr`. Callers apply their own fallback chain on `None`.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    locales: LocaleConfig,
}

impl TemplateStore {
    pub fn new(locales: LocaleConfig) -> Self {
        Self { locales }
    }

    /// Template for `id` in `locale`, if both exist.
    pub fn lookup(&self, id: &str, locale: &str) -> Option<&str> {
        self.locales
            .get(locale)
            .and_then(|messages| messages.get(id))
            .map(String::as_str)
    }

    pub fn messages(&self, locale: &str) -> Option<&MessageDictionary> {
        self.locales.get(locale)
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    pub fn contains_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    /// Replace empty templates in non-default locales with the default
    /// locale's text, tagged as `[<default>]text`.
    ///
    /// Ids whose default template is also empty or absent stay empty.
    pub fn fill_gaps(&mut self, default_language: &str) {
        let Some(defaults) = self.locales.get(default_language).cloned() else {
            return;
        };
        for (lang, messages) in self.locales.iter_mut() {
            if lang == default_language {
                continue;
            }
            let mut filled = 0;
            for (id, template) in messages.iter_mut() {
                if !template.is_empty() {
                    continue;
                }
                if let Some(default) = defaults.get(id).filter(|d| !d.is_empty()) {
                    *template = format!("[{}]{}", default_language, default);
                    filled += 1;
                }
            }
            if filled > 0 {
                debug!(locale = %lang, filled, "filled empty templates from default locale");
            }
        }
    }
}

/// Read `<dir>/<lang>.json` for each locale.
///
/// Absent files are skipped; a file that exists but is not a JSON object is
/// an error naming the path. Entries whose value is not a string (such as
/// `null` stubs) are skipped with a warning.
pub fn load_locales(dir: &Path, locales: &[String]) -> Result<LocaleConfig> {
    let mut config = LocaleConfig::new();
    for lang in locales {
        let path = dir.join(format!("{}.json", lang));
        if !path.exists() {
            debug!(path = %path.display(), "locale file not found, skipping");
            continue;
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read locale file: {}", path.display()))?;
        let entries: Map<String, Value> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse locale file: {}", path.display()))?;
        let mut messages = MessageDictionary::with_capacity(entries.len());
        for (id, value) in entries {
            match value {
                Value::String(template) => {
                    messages.insert(id, template);
                }
                other => {
                    warn!(
                        path = %path.display(),
                        %id,
                        value = %other,
                        "skipping non-string message"
                    );
                }
            }
        }
        config.insert(lang.clone(), messages);
    }
    Ok(config)
}

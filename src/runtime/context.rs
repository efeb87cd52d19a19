use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use super::{
    icu::{IcuFormatter, MessageFormatter},
    inverse::extract_variables,
    store::TemplateStore,
    types::{LanguageListItem, LocaleConfig, MessageDescriptor, MessageVariables},
};

/// Language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Message id holding each locale's name in its own language.
pub const LANGUAGE_NAME_ID: &str = "intl.language";

/// A formatting context: the shared translation corpus plus the language
/// formatting calls fall back to when they pass no locale.
///
/// Cloning is cheap; `with_language` derives a context for another language
/// (e.g. per request) without touching the shared store.
#[derive(Clone)]
pub struct Intl {
    pub(super) store: Arc<TemplateStore>,
    pub(super) formatter: Arc<dyn MessageFormatter>,
    default_language: String,
    pub(super) language: String,
}

impl fmt::Debug for Intl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Intl")
            .field("default_language", &self.default_language)
            .field("language", &self.language)
            .field("locales", &self.store.locales().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Intl {
    /// Build a context with `en` as default and current language.
    pub fn new(locales: LocaleConfig) -> Self {
        Self::with_default_language(locales, DEFAULT_LANGUAGE)
    }

    /// Build a context whose gaps are filled from `default_language`.
    pub fn with_default_language(
        locales: LocaleConfig,
        default_language: impl Into<String>,
    ) -> Self {
        let default_language = default_language.into();
        let mut store = TemplateStore::new(locales);
        store.fill_gaps(&default_language);
        Self {
            store: Arc::new(store),
            formatter: Arc::new(IcuFormatter),
            language: default_language.clone(),
            default_language,
        }
    }

    /// Replace the ICU-style formatting step.
    pub fn with_formatter(mut self, formatter: impl MessageFormatter + 'static) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }

    /// A context sharing this one's store, bound to `language`.
    pub fn with_language(&self, language: impl Into<String>) -> Self {
        let mut intl = self.clone();
        intl.language = language.into();
        intl
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Template for `id` in `locale`, or in the context language when `None`.
    pub fn lookup(&self, id: &str, locale: Option<&str>) -> Option<&str> {
        self.store.lookup(id, locale.unwrap_or(&self.language))
    }

    /// Recover variables from `text` using the descriptor's template.
    ///
    /// Returns an empty map when the template is missing or does not match.
    pub fn extract_variables(
        &self,
        descriptor: impl Into<MessageDescriptor>,
        text: &str,
        locale: Option<&str>,
    ) -> MessageVariables {
        let descriptor = descriptor.into();
        match self.lookup(&descriptor.id, locale) {
            Some(template) => extract_variables(template, text),
            None => MessageVariables::new(),
        }
    }

    /// Locale → its `intl.language` name, for locales that define one.
    pub fn native_names(&self) -> IndexMap<String, String> {
        self.store
            .locales()
            .filter_map(|lang| {
                self.store
                    .lookup(LANGUAGE_NAME_ID, lang)
                    .map(|name| (lang.to_string(), name.to_string()))
            })
            .collect()
    }

    /// Every configured locale with its native name, sorted by locale code.
    pub fn language_list(&self) -> Vec<LanguageListItem> {
        let mut list: Vec<LanguageListItem> = self
            .store
            .locales()
            .map(|lang| LanguageListItem {
                lang: lang.to_string(),
                name: self
                    .store
                    .lookup(LANGUAGE_NAME_ID, lang)
                    .filter(|name| !name.is_empty())
                    .unwrap_or(lang)
                    .to_string(),
            })
            .collect();
        list.sort_by(|a, b| a.lang.cmp(&b.lang));
        list
    }
}

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::extract::{PatternConfig, SortBy, compile_rules, default_patterns, is_glob_pattern};

pub const CONFIG_FILE_NAME: &str = ".intlrc.json";

/// Largest accepted `jsonIntend`.
pub const MAX_JSON_INDENT: usize = 10;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractConfig {
    #[serde(default)]
    pub source_dir: Vec<String>,
    #[serde(default = "default_locales_dir")]
    pub locales_dir: String,
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
    #[serde(default)]
    pub fallback: Option<String>,
    /// `"keys"`, `"source"`, `"none"`, or `null` for insertion order.
    #[serde(default = "default_sort_by")]
    pub sort_by: Option<String>,
    #[serde(default = "default_true")]
    pub reserve_keys: bool,
    #[serde(default = "default_true")]
    pub empty_tags: bool,
    #[serde(default = "default_json_indent", rename = "jsonIntend", alias = "jsonIndent")]
    pub json_indent: usize,
    #[serde(default = "default_patterns")]
    pub patterns: Vec<PatternConfig>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
}

fn default_locales_dir() -> String {
    "locales".to_string()
}

fn default_language() -> String {
    crate::runtime::DEFAULT_LANGUAGE.to_string()
}

fn default_output_dir() -> String {
    "locales/.extract".to_string()
}

fn default_extensions() -> Vec<String> {
    ["js", "jsx", "ts", "tsx"].map(String::from).to_vec()
}

fn default_locales() -> Vec<String> {
    ["en", "es", "fr", "it", "ja", "ko", "ru", "zh-cn", "zh-hk"]
        .map(String::from)
        .to_vec()
}

fn default_sort_by() -> Option<String> {
    Some("keys".to_string())
}

fn default_true() -> bool {
    true
}

fn default_json_indent() -> usize {
    4
}

fn default_ignores() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            source_dir: Vec::new(),
            locales_dir: default_locales_dir(),
            default_language: default_language(),
            output_dir: default_output_dir(),
            extensions: default_extensions(),
            locales: default_locales(),
            fallback: None,
            sort_by: default_sort_by(),
            reserve_keys: true,
            empty_tags: true,
            json_indent: default_json_indent(),
            patterns: default_patterns(),
            ignores: default_ignores(),
        }
    }
}

impl ExtractConfig {
    /// Validate configuration values.
    ///
    /// Runs before any file is touched; every error names the option.
    pub fn validate(&self) -> Result<()> {
        self.sort_mode()?;
        compile_rules(&self.patterns)?;

        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }
        for dir in self.source_dir.iter().filter(|d| is_glob_pattern(d)) {
            Pattern::new(dir)
                .with_context(|| format!("Invalid glob pattern in 'sourceDir': \"{}\"", dir))?;
        }

        if self.json_indent > MAX_JSON_INDENT {
            bail!(
                "Invalid 'jsonIntend': {} (must be at most {})",
                self.json_indent,
                MAX_JSON_INDENT
            );
        }
        if self.default_language.trim().is_empty() {
            bail!("Invalid 'defaultLanguage': must not be empty");
        }
        check_locale_name("defaultLanguage", &self.default_language)?;
        if let Some(fallback) = &self.fallback {
            check_locale_name("fallback", fallback)?;
        }
        for locale in &self.locales {
            check_locale_name("locales", locale)?;
        }

        Ok(())
    }

    pub fn sort_mode(&self) -> Result<SortBy> {
        SortBy::parse(self.sort_by.as_deref())
    }
}

/// Locale codes become file names, so they may not leave the locales dir.
fn check_locale_name(option: &str, locale: &str) -> Result<()> {
    if locale.is_empty() || locale.contains(['/', '\\']) || locale == "." || locale == ".." {
        bail!("Invalid locale in '{}': \"{}\"", option, locale);
    }
    Ok(())
}

pub fn default_config_json() -> Result<String> {
    let config = ExtractConfig::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    pub config: ExtractConfig,
    /// Where the config was loaded from; `None` when using defaults.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    /// Directory paths in the config are relative to: the config file's
    /// directory, or `start_dir` when using defaults.
    pub fn project_root(&self, start_dir: &Path) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| start_dir.to_path_buf(), Path::to_path_buf)
    }
}

/// Find and parse the config file without validating it, so that command
/// line overrides can be applied first.
pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: ExtractConfig = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: ExtractConfig::default(),
            path: None,
        }),
    }
}

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// How the first capture group of a rule is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// The capture is a descriptor literal, e.g. `{ id: 'a.b' }`.
    Object,
    /// The capture is the message id itself.
    String,
}

/// An extraction rule as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    #[serde(alias = "pattern")]
    pub regex: String,
    #[serde(alias = "kind")]
    pub parser: RuleKind,
}

impl PatternConfig {
    pub fn new(regex: &str, parser: RuleKind) -> Self {
        Self {
            regex: regex.to_string(),
            parser,
        }
    }
}

/// A compiled line-scoped extraction rule.
///
/// Capture group 1 holds the descriptor or id; an optional group 2 holds
/// an inline values object whose property names are recorded as `keys`.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    pub regex: Regex,
    pub kind: RuleKind,
}

impl ExtractionRule {
    pub fn compile(config: &PatternConfig) -> Result<Self> {
        let regex = Regex::new(&config.regex)
            .with_context(|| format!("Invalid regex in 'patterns': \"{}\"", config.regex))?;
        if regex.captures_len() < 2 {
            bail!(
                "Pattern in 'patterns' has no capture group: \"{}\"",
                config.regex
            );
        }
        Ok(Self {
            regex,
            kind: config.parser,
        })
    }
}

pub fn compile_rules(patterns: &[PatternConfig]) -> Result<Vec<ExtractionRule>> {
    patterns.iter().map(ExtractionRule::compile).collect()
}

/// The built-in rules: descriptor calls, shorthand descriptor calls,
/// shorthand id calls, `<FormattedMessage>` tags and `Meteor.Error` ids.
pub fn default_patterns() -> Vec<PatternConfig> {
    vec![
        PatternConfig::new(r"\bformatMessage\(\s*(\{.+?\})\s*[,)]", RuleKind::Object),
        PatternConfig::new(r"\b__\(\s*(\{.+?\})\s*[,)]", RuleKind::Object),
        PatternConfig::new(r"\b__\(\s*'((?:[^'\\]|\\.)*)'\s*\)", RuleKind::String),
        PatternConfig::new(
            r#"<FormattedMessage\s+id="([^"]+)"(?:\s*values=\{\s*\{\s*([^{]+?)\s*\}\s*\})?\s*/>"#,
            RuleKind::String,
        ),
        PatternConfig::new(r"Meteor\.Error\(\d+,\s?'([\w.]+)'.*\)", RuleKind::String),
    ]
}

/// Property names of an inline object literal body, e.g. `a: 1, b` → `[a, b]`.
pub fn extract_keys(source: &str) -> Vec<String> {
    source
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .split(',')
        .filter_map(|part| {
            let key = part.split(':').next().unwrap_or_default().trim();
            (!key.is_empty()).then(|| key.to_string())
        })
        .collect()
}

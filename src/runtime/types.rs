use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Message id → template string, for one locale.
pub type MessageDictionary = IndexMap<String, String>;

/// Locale code → dictionary. The whole runtime translation corpus.
pub type LocaleConfig = IndexMap<String, MessageDictionary>;

/// Placeholder name → value, supplied per formatting call.
pub type MessageVariables = IndexMap<String, MessageValue>;

/// Identifies a message and optionally carries its author-supplied default text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDescriptor {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_message: Option<String>,
}

impl MessageDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            default_message: None,
        }
    }

    pub fn with_default(id: impl Into<String>, default_message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            default_message: Some(default_message.into()),
        }
    }
}

impl From<&str> for MessageDescriptor {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MessageDescriptor {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&MessageDescriptor> for MessageDescriptor {
    fn from(descriptor: &MessageDescriptor) -> Self {
        descriptor.clone()
    }
}

/// A primitive placeholder value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageValue {
    Text(String),
    Number(f64),
}

impl MessageValue {
    /// Numeric view of the value. Text is accepted when it parses as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MessageValue::Number(n) => Some(*n),
            MessageValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for MessageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageValue::Text(s) => f.write_str(s),
            MessageValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for MessageValue {
    fn from(value: &str) -> Self {
        MessageValue::Text(value.to_string())
    }
}

impl From<String> for MessageValue {
    fn from(value: String) -> Self {
        MessageValue::Text(value)
    }
}

impl From<f64> for MessageValue {
    fn from(value: f64) -> Self {
        MessageValue::Number(value)
    }
}

impl From<i64> for MessageValue {
    fn from(value: i64) -> Self {
        MessageValue::Number(value as f64)
    }
}

impl From<i32> for MessageValue {
    fn from(value: i32) -> Self {
        MessageValue::Number(f64::from(value))
    }
}

/// Per-call overrides for `Intl::format_message`.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Returned instead of a partially substituted or id-only message.
    pub fallback: Option<String>,
}

impl FormatOptions {
    pub fn with_fallback(fallback: impl Into<String>) -> Self {
        Self {
            fallback: Some(fallback.into()),
        }
    }
}

/// A configured locale with its name in its own language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageListItem {
    pub lang: String,
    pub name: String,
}

/// Builds a `MessageVariables` map from `name => value` pairs.
///
/// ```
/// use intl_tools::variables;
///
/// let vars = variables! { "user" => "Jack", "count" => 3 };
/// assert_eq!(vars.len(), 2);
/// ```
#[macro_export]
macro_rules! variables {
    ($($name:expr => $value:expr),* $(,)?) => {{
        let mut vars = $crate::runtime::MessageVariables::new();
        $(vars.insert(($name).to_string(), $crate::runtime::MessageValue::from($value));)*
        vars
    }};
}

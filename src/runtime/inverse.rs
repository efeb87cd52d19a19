use std::sync::LazyLock;

use regex::Regex;

use super::types::{MessageValue, MessageVariables};

static VARIABLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").unwrap());

/// Recover placeholder values from `text`, which was produced by formatting
/// `template`.
///
/// The template is split into literal segments around its `{name}`
/// placeholders; each segment is located in the remaining text and whatever
/// precedes it becomes the pending placeholder's value. Unless exactly one
/// value is recovered per placeholder the result is empty, never partial.
///
/// This is a single left-to-right pass: when a literal segment also occurs
/// inside a preceding value, the split lands on the first occurrence.
///
/// # Examples
///
/// ```
/// use intl_tools::runtime::extract_variables;
///
/// let vars = extract_variables("Hello {name}!", "Hello Jack!");
/// assert_eq!(vars["name"].to_string(), "Jack");
/// assert!(extract_variables("Hello {name}!", "Goodbye").is_empty());
/// ```
pub fn extract_variables(template: &str, text: &str) -> MessageVariables {
    let names: Vec<&str> = VARIABLE_REGEX
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();
    if names.is_empty() {
        return MessageVariables::new();
    }

    let mut rest = text;
    let mut values: Vec<&str> = Vec::with_capacity(names.len());
    for (index, segment) in VARIABLE_REGEX.split(template).enumerate() {
        // An empty leading segment sits at the start; any other empty
        // segment swallows the rest of the text.
        let position = if segment.is_empty() {
            Some(if index == 0 { 0 } else { rest.len() })
        } else {
            rest.find(segment)
        };
        let Some(position) = position else {
            break;
        };
        if position > 0 {
            values.push(&rest[..position]);
        }
        rest = &rest[position + segment.len()..];
    }

    if values.len() != names.len() {
        return MessageVariables::new();
    }
    names
        .into_iter()
        .zip(values)
        .map(|(name, value)| (name.to_string(), MessageValue::from(value)))
        .collect()
}

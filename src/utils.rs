//! Common utility functions shared across the codebase.

use std::path::Path;

/// Converts text to lower camel case, splitting words on non-alphanumeric
/// characters and on case changes.
///
/// # Examples
///
/// ```
/// use intl_tools::utils::camel_case;
///
/// assert_eq!(camel_case("User Name"), "userName");
/// assert_eq!(camel_case("user_name"), "userName");
/// assert_eq!(camel_case("UserName"), "userName");
/// assert_eq!(camel_case("XMLHttpRequest"), "xmlHttpRequest");
/// assert_eq!(camel_case("count"), "count");
/// ```
pub fn camel_case(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        // `current` is only non-empty after at least one char, so `i >= 1` here.
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            if i == 0 {
                word.to_lowercase()
            } else {
                capitalize(word)
            }
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Display form of `path` relative to `root`, always with `/` separators.
///
/// Falls back to the full path when `path` is not under `root`.
pub fn relative_display(root: &Path, path: &Path) -> String {
    let Ok(relative) = path.strip_prefix(root) else {
        return path.to_string_lossy().into_owned();
    };
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

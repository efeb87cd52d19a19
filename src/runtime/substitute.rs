use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::{
    context::Intl,
    types::{FormatOptions, MessageDescriptor, MessageVariables},
};

/// `{name}` or `{@'message.id'}`, where the id may itself contain `{name}`.
static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z0-9_]+|@'((?:[A-Za-z0-9_.]+|\{[A-Za-z0-9_]+\})+?)')\}").unwrap()
});

/// How deep `{@'...'}` references may chain before resolution gives up and
/// leaves the placeholder text in place.
///
/// A reference back to a message already being resolved is left in place
/// at once, whatever the depth.
pub const MAX_NESTING_DEPTH: usize = 8;

impl Intl {
    /// Resolve a descriptor (or bare id) to text.
    ///
    /// The template comes from the store, else from the descriptor's default
    /// message. With neither, `options.fallback` is returned as is, otherwise
    /// the id itself is used. Placeholders are then substituted and the
    /// result goes through the ICU-style formatting step, which never fails
    /// the call.
    pub fn format_message(
        &self,
        descriptor: impl Into<MessageDescriptor>,
        values: Option<&MessageVariables>,
        locale: Option<&str>,
        options: &FormatOptions,
    ) -> String {
        self.format_at(
            &descriptor.into(),
            values,
            locale,
            options.fallback.as_deref(),
            &mut Vec::new(),
        )
    }

    /// Fill `{name}` and `{@'id'}` placeholders in `template`.
    ///
    /// When a placeholder has no value, `fallback` is returned if given;
    /// otherwise the unresolved placeholders stay in the text as written.
    pub fn replace_variables(
        &self,
        template: &str,
        values: Option<&MessageVariables>,
        locale: Option<&str>,
        fallback: Option<&str>,
    ) -> String {
        self.replace_at(template, values, locale, fallback, &mut Vec::new())
    }

    fn format_at(
        &self,
        descriptor: &MessageDescriptor,
        values: Option<&MessageVariables>,
        locale: Option<&str>,
        fallback: Option<&str>,
        chain: &mut Vec<String>,
    ) -> String {
        let template = self
            .lookup(&descriptor.id, locale)
            .filter(|t| !t.is_empty())
            .or_else(|| {
                descriptor
                    .default_message
                    .as_deref()
                    .filter(|m| !m.is_empty())
            });
        let template = match template {
            Some(template) => template.to_string(),
            None => {
                if let Some(fallback) = fallback {
                    return fallback.to_string();
                }
                warn!(id = %descriptor.id, "could not find message, falling back to message id");
                descriptor.id.clone()
            }
        };

        chain.push(descriptor.id.clone());
        let replaced = self.replace_at(&template, values, locale, fallback, chain);
        chain.pop();
        let locale = locale.unwrap_or(&self.language);
        let empty = MessageVariables::new();
        match self
            .formatter
            .format(&replaced, locale, values.unwrap_or(&empty))
        {
            Ok(formatted) => formatted,
            Err(err) => {
                warn!(text = %replaced, %err, "could not format message, using it unformatted");
                replaced
            }
        }
    }

    fn replace_at(
        &self,
        template: &str,
        values: Option<&MessageVariables>,
        locale: Option<&str>,
        fallback: Option<&str>,
        chain: &mut Vec<String>,
    ) -> String {
        if !PLACEHOLDER_REGEX.is_match(template) {
            return template.to_string();
        }
        if values.is_none() {
            warn!(template = %template, "values are not provided");
            if let Some(fallback) = fallback {
                return fallback.to_string();
            }
        }
        let empty = MessageVariables::new();
        let values = values.unwrap_or(&empty);

        let mut output = String::with_capacity(template.len());
        let mut missing: Vec<&str> = Vec::new();
        let mut last = 0;
        for caps in PLACEHOLDER_REGEX.captures_iter(template) {
            let Some(placeholder) = caps.get(0) else {
                continue;
            };
            let value = match caps.get(2) {
                Some(expression) => {
                    self.resolve_reference(expression.as_str(), values, locale, chain)
                }
                None => caps
                    .get(1)
                    .and_then(|name| values.get(name.as_str()))
                    .map(ToString::to_string),
            };

            output.push_str(&template[last..placeholder.start()]);
            match value {
                Some(value) => output.push_str(&value),
                None => {
                    output.push_str(placeholder.as_str());
                    missing.push(placeholder.as_str());
                }
            }
            last = placeholder.end();
        }
        output.push_str(&template[last..]);

        if !missing.is_empty() {
            warn!(template = %template, missing = %missing.join(", "), "missing variable value(s)");
            if let Some(fallback) = fallback {
                return fallback.to_string();
            }
        }
        output
    }

    /// Substitute the reference expression into a message id, then look that
    /// message up and format it with no variables of its own.
    ///
    /// `chain` holds the ids currently being resolved, outermost first.
    fn resolve_reference(
        &self,
        expression: &str,
        values: &MessageVariables,
        locale: Option<&str>,
        chain: &mut Vec<String>,
    ) -> Option<String> {
        let id = self.replace_at(expression, Some(values), locale, None, chain);
        if chain.contains(&id) {
            warn!(
                %id,
                chain = %chain.join(" -> "),
                "message references itself, leaving it unresolved"
            );
            return None;
        }
        if chain.len() >= MAX_NESTING_DEPTH {
            warn!(
                %id,
                depth = chain.len(),
                "nested message reference too deep, leaving it unresolved"
            );
            return None;
        }
        let nested_values = MessageVariables::new();
        Some(self.format_at(
            &MessageDescriptor::new(id),
            Some(&nested_values),
            locale,
            None,
            chain,
        ))
    }
}

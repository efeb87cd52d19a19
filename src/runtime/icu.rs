//! ICU-style message formatting step.
//!
//! Runs after placeholder substitution and handles the constructs that need
//! locale knowledge: `{n, number}`, `{n, plural, ...}` and `{x, select, ...}`.
//! Anything it cannot format is reported as a [`FormatError`]; the caller keeps
//! the unformatted text in that case.

use thiserror::Error;

use super::types::{MessageValue, MessageVariables};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("syntax error at offset {offset}: {reason}")]
    Syntax { offset: usize, reason: &'static str },
    #[error("no value provided for argument '{0}'")]
    MissingArgument(String),
    #[error("argument '{0}' has no 'other' branch")]
    MissingOther(String),
    #[error("unsupported argument type '{0}'")]
    UnsupportedType(String),
    #[error("value of argument '{0}' is not a number")]
    NotANumber(String),
}

/// Locale-aware formatting applied to an already substituted message.
pub trait MessageFormatter: Send + Sync {
    fn format(
        &self,
        message: &str,
        locale: &str,
        variables: &MessageVariables,
    ) -> Result<String, FormatError>;
}

/// Built-in formatter for the plural/select/number subset of ICU MessageFormat.
#[derive(Debug, Default, Clone, Copy)]
pub struct IcuFormatter;

impl MessageFormatter for IcuFormatter {
    fn format(
        &self,
        message: &str,
        locale: &str,
        variables: &MessageVariables,
    ) -> Result<String, FormatError> {
        let nodes = Parser::new(message).parse()?;
        let mut out = String::with_capacity(message.len());
        render(&nodes, locale, variables, None, &mut out)?;
        Ok(out)
    }
}

// ============================================================
// Plural rules
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "zero" => Some(Self::Zero),
            "one" => Some(Self::One),
            "two" => Some(Self::Two),
            "few" => Some(Self::Few),
            "many" => Some(Self::Many),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

fn language_of(locale: &str) -> String {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or(locale)
        .to_ascii_lowercase()
}

/// Cardinal plural category of `value` in `locale`.
///
/// A simplified table covering the common language families; fractional
/// values are always `Other`.
pub fn plural_category(locale: &str, value: f64) -> PluralCategory {
    let abs = value.abs();
    if abs.fract() != 0.0 {
        return PluralCategory::Other;
    }
    let count = abs as u64;
    let n100 = count % 100;
    let n10 = count % 10;

    match language_of(locale).as_str() {
        "ja" | "ko" | "zh" | "th" | "vi" | "id" | "ms" => PluralCategory::Other,
        "fr" => {
            if count <= 1 {
                PluralCategory::One
            } else {
                PluralCategory::Other
            }
        }
        "ru" | "uk" | "be" => {
            if n10 == 1 && n100 != 11 {
                PluralCategory::One
            } else if (2..=4).contains(&n10) && !(12..=14).contains(&n100) {
                PluralCategory::Few
            } else {
                PluralCategory::Many
            }
        }
        "pl" => {
            if count == 1 {
                PluralCategory::One
            } else if (2..=4).contains(&n10) && !(12..=14).contains(&n100) {
                PluralCategory::Few
            } else {
                PluralCategory::Many
            }
        }
        "ar" => match count {
            0 => PluralCategory::Zero,
            1 => PluralCategory::One,
            2 => PluralCategory::Two,
            _ if (3..=10).contains(&n100) => PluralCategory::Few,
            _ if (11..=99).contains(&n100) => PluralCategory::Many,
            _ => PluralCategory::Other,
        },
        _ => {
            if count == 1 {
                PluralCategory::One
            } else {
                PluralCategory::Other
            }
        }
    }
}

/// Formats a number with the locale's grouping and decimal separators,
/// keeping at most three fraction digits.
pub fn format_number(value: f64, locale: &str) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let (group, decimal) = match language_of(locale).as_str() {
        "de" | "es" | "it" | "pt" | "ru" | "nl" | "tr" => ('.', ','),
        "fr" => ('\u{202f}', ','),
        _ => (',', '.'),
    };

    let rounded = (value.abs() * 1000.0).round() / 1000.0;
    let fixed = format!("{:.3}", rounded);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(group);
        }
        grouped.push(digit);
    }

    let mut out = String::new();
    if value < 0.0 && rounded != 0.0 {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push(decimal);
        out.push_str(frac_part);
    }
    out
}

// ============================================================
// Parsing
// ============================================================

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Argument(String),
    Number(String),
    Plural {
        name: String,
        offset: f64,
        branches: Vec<(PluralKey, Vec<Node>)>,
    },
    Select {
        name: String,
        branches: Vec<(String, Vec<Node>)>,
    },
    Pound,
}

#[derive(Debug, Clone, PartialEq)]
enum PluralKey {
    Exact(f64),
    Category(PluralCategory),
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(message: &str) -> Self {
        Self {
            chars: message.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<Vec<Node>, FormatError> {
        let nodes = self.parse_message(false, false)?;
        if self.pos < self.chars.len() {
            return Err(self.error("unexpected '}'"));
        }
        Ok(nodes)
    }

    fn error(&self, reason: &'static str) -> FormatError {
        FormatError::Syntax {
            offset: self.pos,
            reason,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char, reason: &'static str) -> Result<(), FormatError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(reason))
        }
    }

    /// Reads a token up to whitespace or one of the ICU delimiters.
    fn word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '{' | '}' | ',') {
                break;
            }
            word.push(c);
            self.pos += 1;
        }
        word
    }

    fn parse_message(&mut self, in_plural: bool, nested: bool) -> Result<Vec<Node>, FormatError> {
        let mut nodes = Vec::new();
        let mut text = String::new();

        while let Some(c) = self.peek() {
            match c {
                '{' => {
                    flush_text(&mut text, &mut nodes);
                    nodes.push(self.parse_argument(in_plural)?);
                }
                '}' => {
                    if nested {
                        break;
                    }
                    return Err(self.error("unmatched '}'"));
                }
                '#' if in_plural => {
                    flush_text(&mut text, &mut nodes);
                    self.pos += 1;
                    nodes.push(Node::Pound);
                }
                '\'' => {
                    self.pos += 1;
                    self.parse_quoted(in_plural, &mut text);
                }
                _ => {
                    text.push(c);
                    self.pos += 1;
                }
            }
        }

        flush_text(&mut text, &mut nodes);
        Ok(nodes)
    }

    /// Called after an apostrophe. `''` is a literal apostrophe, `'{` starts
    /// a quoted run, anything else keeps the apostrophe as text.
    fn parse_quoted(&mut self, in_plural: bool, text: &mut String) {
        match self.peek() {
            Some('\'') => {
                self.pos += 1;
                text.push('\'');
            }
            Some(c) if c == '{' || c == '}' || (c == '#' && in_plural) => {
                while let Some(c) = self.bump() {
                    if c == '\'' {
                        if self.peek() == Some('\'') {
                            self.pos += 1;
                            text.push('\'');
                        } else {
                            return;
                        }
                    } else {
                        text.push(c);
                    }
                }
            }
            _ => text.push('\''),
        }
    }

    fn parse_argument(&mut self, in_plural: bool) -> Result<Node, FormatError> {
        self.expect('{', "expected '{'")?;
        self.skip_whitespace();
        let name = self.word();
        if name.is_empty() {
            return Err(self.error("empty argument name"));
        }
        if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(self.error("invalid argument name"));
        }
        self.skip_whitespace();
        match self.bump() {
            Some('}') => return Ok(Node::Argument(name)),
            Some(',') => {}
            _ => return Err(self.error("expected ',' or '}' after argument name")),
        }

        self.skip_whitespace();
        let kind = self.word();
        self.skip_whitespace();
        match kind.as_str() {
            "number" => {
                // Styles (`percent`, skeletons) are accepted and ignored.
                if self.peek() == Some(',') {
                    while let Some(c) = self.peek() {
                        if c == '}' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                self.expect('}', "unterminated number argument")?;
                Ok(Node::Number(name))
            }
            "plural" => {
                self.expect(',', "expected ',' after 'plural'")?;
                self.parse_plural(name)
            }
            "select" => {
                self.expect(',', "expected ',' after 'select'")?;
                self.parse_select(name, in_plural)
            }
            "" => Err(self.error("missing argument type")),
            _ => Err(FormatError::UnsupportedType(kind)),
        }
    }

    fn parse_plural(&mut self, name: String) -> Result<Node, FormatError> {
        self.skip_whitespace();
        let mut offset = 0.0;
        if self.chars[self.pos..].starts_with(&['o', 'f', 'f', 's', 'e', 't', ':']) {
            self.pos += "offset:".len();
            self.skip_whitespace();
            offset = self
                .word()
                .parse()
                .map_err(|_| self.error("invalid plural offset"))?;
        }

        let mut branches = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.pos += 1;
                break;
            }
            let selector = self.word();
            let key = if let Some(exact) = selector.strip_prefix('=') {
                PluralKey::Exact(
                    exact
                        .parse()
                        .map_err(|_| self.error("invalid exact plural selector"))?,
                )
            } else {
                PluralKey::Category(
                    PluralCategory::from_keyword(&selector)
                        .ok_or_else(|| self.error("unknown plural category"))?,
                )
            };
            self.skip_whitespace();
            self.expect('{', "expected '{' after plural selector")?;
            let body = self.parse_message(true, true)?;
            self.expect('}', "unterminated plural branch")?;
            branches.push((key, body));
        }

        if !branches
            .iter()
            .any(|(key, _)| *key == PluralKey::Category(PluralCategory::Other))
        {
            return Err(FormatError::MissingOther(name));
        }
        Ok(Node::Plural {
            name,
            offset,
            branches,
        })
    }

    fn parse_select(&mut self, name: String, in_plural: bool) -> Result<Node, FormatError> {
        let mut branches = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.pos += 1;
                break;
            }
            let selector = self.word();
            if selector.is_empty() {
                return Err(self.error("expected select branch"));
            }
            self.skip_whitespace();
            self.expect('{', "expected '{' after select key")?;
            let body = self.parse_message(in_plural, true)?;
            self.expect('}', "unterminated select branch")?;
            branches.push((selector, body));
        }

        if !branches.iter().any(|(key, _)| key == "other") {
            return Err(FormatError::MissingOther(name));
        }
        Ok(Node::Select { name, branches })
    }
}

fn flush_text(text: &mut String, nodes: &mut Vec<Node>) {
    if !text.is_empty() {
        nodes.push(Node::Text(std::mem::take(text)));
    }
}

// ============================================================
// Rendering
// ============================================================

fn lookup<'a>(
    variables: &'a MessageVariables,
    name: &str,
) -> Result<&'a MessageValue, FormatError> {
    variables
        .get(name)
        .ok_or_else(|| FormatError::MissingArgument(name.to_string()))
}

fn number_of(variables: &MessageVariables, name: &str) -> Result<f64, FormatError> {
    lookup(variables, name)?
        .as_number()
        .ok_or_else(|| FormatError::NotANumber(name.to_string()))
}

fn render(
    nodes: &[Node],
    locale: &str,
    variables: &MessageVariables,
    pound: Option<f64>,
    out: &mut String,
) -> Result<(), FormatError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Argument(name) => out.push_str(&lookup(variables, name)?.to_string()),
            Node::Number(name) => out.push_str(&format_number(number_of(variables, name)?, locale)),
            Node::Pound => match pound {
                Some(value) => out.push_str(&format_number(value, locale)),
                None => out.push('#'),
            },
            Node::Plural {
                name,
                offset,
                branches,
            } => {
                let value = number_of(variables, name)?;
                let adjusted = value - offset;
                let category = plural_category(locale, adjusted);
                let branch = branches
                    .iter()
                    .find(|(key, _)| *key == PluralKey::Exact(value))
                    .or_else(|| {
                        branches
                            .iter()
                            .find(|(key, _)| *key == PluralKey::Category(category))
                    })
                    .or_else(|| {
                        branches
                            .iter()
                            .find(|(key, _)| *key == PluralKey::Category(PluralCategory::Other))
                    })
                    .ok_or_else(|| FormatError::MissingOther(name.clone()))?;
                render(&branch.1, locale, variables, Some(adjusted), out)?;
            }
            Node::Select { name, branches } => {
                let key = lookup(variables, name)?.to_string();
                let branch = branches
                    .iter()
                    .find(|(k, _)| *k == key)
                    .or_else(|| branches.iter().find(|(k, _)| k == "other"))
                    .ok_or_else(|| FormatError::MissingOther(name.clone()))?;
                render(&branch.1, locale, variables, pound, out)?;
            }
        }
    }
    Ok(())
}

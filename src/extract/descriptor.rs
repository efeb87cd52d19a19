//! Restricted parser for message descriptor literals.
//!
//! Accepts object-literal text such as
//! `{ id: 'user.greeting', defaultMessage: "Hello {User Name}" }` and nothing
//! more: keys are identifiers or quoted strings, values are string, number,
//! boolean, `null` or `undefined` literals. Only `id` and `defaultMessage`
//! are kept; other keys must still hold literals.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::runtime::MessageDescriptor;
use crate::utils::camel_case;

static ID_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z_.\-]+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("expected {expected} at offset {offset}")]
    Expected {
        expected: &'static str,
        offset: usize,
    },
    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),
    #[error("value of '{0}' is not a literal")]
    NotALiteral(String),
    #[error("missing 'id'")]
    MissingId,
    #[error("'id' must be a string")]
    IdNotString,
    #[error("invalid message id '{0}'")]
    InvalidId(String),
    #[error("'defaultMessage' must be a string")]
    DefaultMessageNotString,
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Str(String),
    Number(String),
    Bool(bool),
    Null,
}

/// Parse a captured descriptor fragment.
///
/// The id must match `[a-zA-Z_.\-]+`. Placeholder names in the default
/// message are normalized to lower camel case.
pub fn parse_descriptor(fragment: &str) -> Result<MessageDescriptor, DescriptorError> {
    let mut cursor = Cursor::new(fragment);
    let mut id: Option<Literal> = None;
    let mut default_message: Option<Literal> = None;

    cursor.skip_whitespace();
    cursor.expect('{', "'{'")?;
    loop {
        cursor.skip_whitespace();
        if cursor.eat('}') {
            break;
        }
        let key = cursor.parse_key()?;
        cursor.skip_whitespace();
        cursor.expect(':', "':'")?;
        cursor.skip_whitespace();
        let value = cursor
            .parse_literal()?
            .ok_or_else(|| DescriptorError::NotALiteral(key.clone()))?;
        match key.as_str() {
            "id" => id = Some(value),
            "defaultMessage" => default_message = Some(value),
            _ => {}
        }
        cursor.skip_whitespace();
        if cursor.eat(',') {
            continue;
        }
        cursor.expect('}', "',' or '}'")?;
        break;
    }
    cursor.skip_whitespace();
    if !cursor.at_end() {
        return Err(DescriptorError::Expected {
            expected: "end of descriptor",
            offset: cursor.pos,
        });
    }

    let id = match id {
        Some(Literal::Str(id)) => id,
        None | Some(Literal::Null) => return Err(DescriptorError::MissingId),
        Some(_) => return Err(DescriptorError::IdNotString),
    };
    if !ID_REGEX.is_match(&id) {
        return Err(DescriptorError::InvalidId(id));
    }
    let default_message = match default_message {
        None | Some(Literal::Null) => None,
        Some(Literal::Str(message)) if message.is_empty() => None,
        Some(Literal::Str(message)) => Some(normalize_placeholders(&message)),
        Some(_) => return Err(DescriptorError::DefaultMessageNotString),
    };

    Ok(MessageDescriptor { id, default_message })
}

/// Rewrite each top-level `{name}` placeholder to `{lowerCamelName}`.
///
/// Only simple placeholders are touched: groups holding `,`, `'`, `@` or
/// nested braces (plural/select arguments, nested references) are kept as
/// written, and so is everything inside them.
pub fn normalize_placeholders(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open..];
        let Some(close) = matching_brace(after) else {
            out.push_str(after);
            return out;
        };
        let group = &after[..=close];
        let inner = &group[1..group.len() - 1];
        let simple = !inner.is_empty()
            && !inner.contains(['{', '}', ',', '\'', '@', '#'])
            && !camel_case(inner).is_empty();
        if simple {
            out.push('{');
            out.push_str(&camel_case(inner));
            out.push('}');
        } else {
            out.push_str(group);
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Byte index of the `}` closing the `{` that starts `text`.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char, what: &'static str) -> Result<(), DescriptorError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(DescriptorError::Expected {
                expected: what,
                offset: self.pos,
            })
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }
        ident
    }

    fn parse_key(&mut self) -> Result<String, DescriptorError> {
        match self.peek() {
            Some(quote @ ('\'' | '"')) => self.parse_string(quote),
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => Ok(self.identifier()),
            _ => Err(DescriptorError::Expected {
                expected: "property name",
                offset: self.pos,
            }),
        }
    }

    /// `Ok(None)` means the value is an expression rather than a literal.
    fn parse_literal(&mut self) -> Result<Option<Literal>, DescriptorError> {
        let literal = match self.peek() {
            Some(quote @ ('\'' | '"' | '`')) => Literal::Str(self.parse_string(quote)?),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+'))
                {
                    self.bump();
                }
                let number = &self.src[start..self.pos];
                if number.parse::<f64>().is_err() {
                    return Ok(None);
                }
                Literal::Number(number.to_string())
            }
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {
                match self.identifier().as_str() {
                    "true" => Literal::Bool(true),
                    "false" => Literal::Bool(false),
                    "null" | "undefined" => Literal::Null,
                    _ => return Ok(None),
                }
            }
            _ => return Ok(None),
        };
        // A literal followed by an operator or call is an expression.
        self.skip_whitespace();
        match self.peek() {
            None | Some(',') | Some('}') => Ok(Some(literal)),
            _ => Ok(None),
        }
    }

    /// Parse a quoted string. In template strings `${` loses its `$`, so
    /// `${name}` reads as the placeholder `{name}`.
    fn parse_string(&mut self, quote: char) -> Result<String, DescriptorError> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(DescriptorError::UnterminatedString(start));
            };
            match c {
                c if c == quote => return Ok(value),
                '\\' => {
                    let Some(escaped) = self.bump() else {
                        return Err(DescriptorError::UnterminatedString(start));
                    };
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '0' => value.push('\0'),
                        'u' => value.push(self.unicode_escape().unwrap_or('u')),
                        other => value.push(other),
                    }
                }
                '$' if quote == '`' && self.peek() == Some('{') => {}
                c => value.push(c),
            }
        }
    }

    /// `\uXXXX` or `\u{X...}`, after the `u`.
    fn unicode_escape(&mut self) -> Option<char> {
        let rest = self.rest();
        let (hex, consumed) = if let Some(braced) = rest.strip_prefix('{') {
            let end = braced.find('}')?;
            (&braced[..end], end + 2)
        } else {
            (rest.get(..4)?, 4)
        };
        let c = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)?;
        self.pos += consumed;
        Some(c)
    }
}

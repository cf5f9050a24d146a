//! Directive attribute parsing.
//!
//! Parses the `#id .class key="value" flag` attribute syntax used after a
//! directive name.

use std::collections::HashMap;

use super::DirectiveError;
use crate::node::SourcePos;

/// Parsed directive attributes.
///
/// # Example
///
/// ```
/// use quire_ast::directive::DirectiveArgs;
///
/// let args = DirectiveArgs::parse(r#"#my-id .foo .bar src="a.png" loop"#);
/// assert_eq!(args.id, Some("my-id".to_owned()));
/// assert_eq!(args.classes, vec!["foo", "bar"]);
/// assert_eq!(args.get("src"), Some("a.png"));
/// assert_eq!(args.get("loop"), Some("true"));
/// ```
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DirectiveArgs {
    /// ID from `#id`.
    pub id: Option<String>,
    /// Classes from `.class` tokens.
    pub classes: Vec<String>,
    /// Key-value attributes. Bare keys are stored with the value `"true"`.
    pub attrs: HashMap<String, String>,
}

impl DirectiveArgs {
    /// Parse an attribute string.
    #[must_use]
    pub fn parse(attrs_str: &str) -> Self {
        let mut args = Self::default();
        let mut remaining = attrs_str.trim();

        while !remaining.is_empty() {
            if let Some(rest) = remaining.strip_prefix('#') {
                let end = selector_end(rest);
                args.id = Some(rest[..end].to_owned());
                remaining = &rest[end..];
            } else if let Some(rest) = remaining.strip_prefix('.') {
                let end = selector_end(rest);
                if end > 0 {
                    args.classes.push(rest[..end].to_owned());
                }
                remaining = &rest[end..];
            } else if let Some((key, value, rest)) = parse_key_value(remaining) {
                args.attrs.insert(key.to_owned(), value.to_owned());
                remaining = rest;
            } else if let Some((key, rest)) = parse_bare_key(remaining) {
                args.attrs.insert(key.to_owned(), "true".to_owned());
                remaining = rest;
            } else {
                // Skip one unrecognized character
                let skip = remaining.chars().next().map_or(1, char::len_utf8);
                remaining = &remaining[skip..];
            }
            remaining = remaining.trim_start();
        }

        args
    }

    /// Get an attribute value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Remove and return an attribute value.
    pub fn take(&mut self, key: &str) -> Option<String> {
        self.attrs.remove(key)
    }

    /// Read a boolean flag. Absent flags are `None`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError::InvalidFlag`] for values other than `true`/`false`.
    pub fn flag(&mut self, key: &str, position: SourcePos) -> Result<Option<bool>, DirectiveError> {
        match self.take(key).as_deref() {
            None => Ok(None),
            Some("true") => Ok(Some(true)),
            Some("false") => Ok(Some(false)),
            Some(other) => Err(DirectiveError::InvalidFlag {
                flag: key.to_owned(),
                value: other.to_owned(),
                position,
            }),
        }
    }
}

/// End of an `#id` or `.class` token.
fn selector_end(s: &str) -> usize {
    s.find(|c: char| c.is_whitespace() || c == '.' || c == '#')
        .unwrap_or(s.len())
}

/// Parse a key-value pair from the attributes string.
///
/// Supports: `key="value"`, `key='value'`, `key=value`
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let eq_pos = s.find('=')?;
    let key = &s[..eq_pos];

    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }

    let after_eq = &s[eq_pos + 1..];

    if let Some(stripped) = after_eq.strip_prefix('"') {
        let end_quote = stripped.find('"')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else if let Some(stripped) = after_eq.strip_prefix('\'') {
        let end_quote = stripped.find('\'')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else {
        let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
        Some((key, &after_eq[..end], &after_eq[end..]))
    }
}

/// Parse a bare `flag` word.
fn parse_bare_key(s: &str) -> Option<(&str, &str)> {
    let end = s
        .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    Some((&s[..end], &s[end..]))
}

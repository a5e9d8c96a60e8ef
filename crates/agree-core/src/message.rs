//! # Message Templates
//!
//! Violation messages are rendered from templates with three placeholders:
//!
//! - `{name}`: the condition name,
//! - `{value}`: the failing value as compact JSON,
//! - `{path}`: the violation path (`items[2].name`, `(root)`).
//!
//! `{{` and `}}` produce literal braces. Templates are parsed once, when the
//! condition is built; a malformed template is a configuration error.

use std::fmt;

use serde_json::Value;

use crate::error::ConfigurationError;
use crate::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Name,
    Value,
    Path,
}

/// A parsed violation message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    source: String,
    parts: Vec<Part>,
}

impl MessageTemplate {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidTemplate`] for unknown
    /// placeholders and unbalanced braces.
    pub fn parse(source: &str) -> Result<Self, ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidTemplate {
            template: source.to_string(),
            reason,
        };

        let mut parts = Vec::new();
        let mut text = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    text.push('{');
                }
                '{' => {
                    let mut placeholder = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        placeholder.push(inner);
                    }
                    if !closed {
                        return Err(invalid("unclosed placeholder".to_string()));
                    }
                    let part = match placeholder.trim() {
                        "name" => Part::Name,
                        "value" => Part::Value,
                        "path" => Part::Path,
                        other => return Err(invalid(format!("unknown placeholder `{other}`"))),
                    };
                    if !text.is_empty() {
                        parts.push(Part::Text(std::mem::take(&mut text)));
                    }
                    parts.push(part);
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    text.push('}');
                }
                '}' => return Err(invalid("unmatched `}`".to_string())),
                other => text.push(other),
            }
        }
        if !text.is_empty() {
            parts.push(Part::Text(text));
        }

        Ok(Self {
            source: source.to_string(),
            parts,
        })
    }

    /// Template for built-in conditions: fixed text around the value.
    pub(crate) fn value_between(before: &str, after: &str) -> Self {
        let mut parts = Vec::with_capacity(3);
        if !before.is_empty() {
            parts.push(Part::Text(before.to_string()));
        }
        parts.push(Part::Value);
        if !after.is_empty() {
            parts.push(Part::Text(after.to_string()));
        }
        Self {
            source: format!(
                "{}{{value}}{}",
                before.replace('{', "{{").replace('}', "}}"),
                after.replace('{', "{{").replace('}', "}}")
            ),
            parts,
        }
    }

    /// The template text as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render for a failing value.
    pub fn render(&self, name: &str, value: &Value, path: &Path) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Text(t) => out.push_str(t),
                Part::Name => out.push_str(name),
                Part::Value => out.push_str(&value.to_string()),
                Part::Path => out.push_str(&path.to_string()),
            }
        }
        out
    }
}

impl fmt::Display for MessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_all_placeholders() {
        let t = MessageTemplate::parse("{path}: {value} fails `{name}`").unwrap();
        let path = Path::root().child("age");
        assert_eq!(t.render("positive", &json!(-1), &path), "age: -1 fails `positive`");
    }

    #[test]
    fn escaped_braces_are_literal() {
        let t = MessageTemplate::parse("{{literal}} {value}").unwrap();
        assert_eq!(t.render("n", &json!("x"), &Path::root()), "{literal} \"x\"");
    }

    #[test]
    fn unknown_placeholder_is_rejected() {
        let err = MessageTemplate::parse("bad {thing}").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidTemplate { .. }));
    }

    #[test]
    fn unbalanced_braces_are_rejected() {
        assert!(MessageTemplate::parse("open {value").is_err());
        assert!(MessageTemplate::parse("close }").is_err());
    }

    #[test]
    fn value_between_round_trips_through_parse() {
        let built = MessageTemplate::value_between("value ", " is not {a} string");
        let parsed = MessageTemplate::parse(built.source()).unwrap();
        assert_eq!(built, parsed);
    }
}

//! # Markdown Reference Pages
//!
//! Renders contracts and schemas as Markdown:
//!
//! - a contract gets a heading, a parameter table (position, name,
//!   requirement, rule expression) and its return rule;
//! - keyed schemas, wherever they appear as an argument, return value or
//!   entry, are expanded into nested bullet lists.
//!
//! [`MarkdownPage`] collects several sections under one title.

use agree_core::{Contract, Entry, Rule, Schema};

use crate::expression;

/// Bullet list for a keyed schema, one bullet per entry, nested schemas
/// indented below their entry.
pub fn schema(s: &Schema) -> String {
    let mut out = String::new();
    if s.is_strict() {
        out.push_str("Undeclared keys are rejected.\n\n");
    }
    push_entries(&mut out, s, 0);
    out
}

fn push_entries(out: &mut String, s: &Schema, depth: usize) {
    let indent = "  ".repeat(depth);
    for entry in s.entries() {
        out.push_str(&format!(
            "{indent}- `{}` ({}): `{}`\n",
            entry.key(),
            requirement(entry),
            expression::rule(entry.rule())
        ));
        if let Rule::Node(nested) = entry.rule() {
            push_entries(out, nested, depth + 1);
        }
    }
}

fn requirement(entry: &Entry) -> &'static str {
    if entry.is_variadic() {
        "variadic"
    } else if entry.is_required() {
        "required"
    } else {
        "optional"
    }
}

/// Reference section for a contract-wrapped function.
pub fn contract<F>(c: &Contract<F>) -> String {
    let mut out = format!("## `{}`\n\n", c.name());

    match c.precondition() {
        Some(Rule::Node(args)) if args.is_positional() => {
            out.push_str("| # | Parameter | Requirement | Rule |\n");
            out.push_str("|---|---|---|---|\n");
            let mut nested = Vec::new();
            for (position, entry) in args.entries().iter().enumerate() {
                let name = c
                    .descriptors()
                    .get(position)
                    .map(|d| d.name.as_str())
                    .unwrap_or("-");
                out.push_str(&format!(
                    "| {position} | `{name}` | {} | `{}` |\n",
                    requirement(entry),
                    expression::rule(entry.rule())
                ));
                if let Rule::Node(s) = entry.rule() {
                    if !s.is_positional() {
                        nested.push((name.to_string(), s.clone()));
                    }
                }
            }
            for (name, s) in nested {
                out.push_str(&format!("\n#### `{name}`\n\n"));
                out.push_str(&schema(&s));
            }
        }
        Some(rule) => {
            out.push_str(&format!("**Arguments:** `{}`\n", expression::rule(&rule)));
        }
        None => out.push_str("No argument checks.\n"),
    }

    if let Some(returns) = c.postcondition() {
        out.push_str(&format!("\n**Returns:** `{}`\n", expression::rule(returns)));
        if let Rule::Node(s) = returns {
            if !s.is_positional() {
                out.push('\n');
                out.push_str(&schema(s));
            }
        }
    }
    out
}

/// A Markdown document assembled from contract and schema sections.
#[derive(Debug, Clone)]
pub struct MarkdownPage {
    title: String,
    sections: Vec<String>,
}

impl MarkdownPage {
    /// Start a page with a top-level title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Append a contract section.
    pub fn contract<F>(mut self, c: &Contract<F>) -> Self {
        self.sections.push(contract(c));
        self
    }

    /// Append a schema section under `heading`.
    pub fn schema(mut self, heading: &str, s: &Schema) -> Self {
        self.sections.push(format!("## {heading}\n\n{}", schema(s)));
        self
    }

    /// Render the page.
    pub fn render(&self) -> String {
        let mut out = format!("# {}\n", self.title);
        for section in &self.sections {
            out.push('\n');
            out.push_str(section);
        }
        out
    }
}

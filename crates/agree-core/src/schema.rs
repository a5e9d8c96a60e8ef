//! # Schemas & Schema Evaluation
//!
//! A [`Schema`] is a structural contract: an ordered list of entries mapping
//! a key to a [`Rule`]. Keys are either all object member names (a *keyed*
//! schema) or all positional indices `0, 1, 2, ..` (a *positional* schema,
//! used for argument lists).
//!
//! ## Evaluation Rules
//!
//! 1. A keyed schema needs an object and a positional schema an array;
//!    otherwise one shape violation is reported and evaluation stops.
//! 2. A wholly absent required key yields one `required` violation and its
//!    rule is **not** evaluated (no cascade of follow-on violations).
//! 3. A present key (including a present `null`) is evaluated against its
//!    rule with the path extended by the key.
//! 4. Undeclared keys are ignored, except in strict mode where each yields
//!    an `unexpected-key` violation.
//! 5. The final positional entry may be variadic: every remaining value is
//!    evaluated against it.
//!
//! Schemas are immutable after construction and share their interior, so a
//! schema built once can be evaluated concurrently without locking.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coerce::Coercion;
use crate::condition::{Evaluate, Rule};
use crate::error::ConfigurationError;
use crate::path::{Context, PathSegment};
use crate::result::{ValidationResult, Violation};

/// Name reported for schemas that were not given one.
pub const DEFAULT_SCHEMA_NAME: &str = "schema";

/// Schema-wide options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaOptions {
    /// Report undeclared keys as `unexpected-key` violations.
    pub strict: bool,
}

impl SchemaOptions {
    /// Options with strict mode on.
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// How a schema addresses the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Object members by name.
    Keyed,
    /// Array / argument-list elements by position.
    Positional,
}

// ---------------------------------------------------------------------------
// Entry definitions
// ---------------------------------------------------------------------------

/// Declarative input for one schema entry.
///
/// The rule is optional here so that a forgotten rule is reported as a
/// [`ConfigurationError::MissingRule`] when the schema is built.
#[derive(Debug, Clone)]
pub struct EntryDef {
    key: PathSegment,
    required: bool,
    rule: Option<Rule>,
    variadic: bool,
    coerce: Option<Coercion>,
}

impl EntryDef {
    /// A required entry without a rule yet.
    pub fn new(key: impl Into<PathSegment>) -> Self {
        Self {
            key: key.into(),
            required: true,
            rule: None,
            variadic: false,
            coerce: None,
        }
    }

    /// A required entry checked by `rule`.
    pub fn required(key: impl Into<PathSegment>, rule: impl Into<Rule>) -> Self {
        Self::new(key).rule(rule)
    }

    /// An optional entry checked by `rule` when present.
    pub fn optional(key: impl Into<PathSegment>, rule: impl Into<Rule>) -> Self {
        Self::new(key).rule(rule).not_required()
    }

    /// Set the entry's rule.
    pub fn rule(mut self, rule: impl Into<Rule>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Allow the key to be absent.
    pub fn not_required(mut self) -> Self {
        self.required = false;
        self
    }

    /// Mark as the variadic tail of a positional schema.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self.required = false;
        self
    }

    /// Convert the value with `coercion` before the rule sees it.
    pub fn coerce(mut self, coercion: Coercion) -> Self {
        self.coerce = Some(coercion);
        self
    }
}

/// One built schema entry.
#[derive(Debug, Clone)]
pub struct Entry {
    key: PathSegment,
    required: bool,
    rule: Rule,
    variadic: bool,
    coerce: Option<Coercion>,
}

impl Entry {
    /// Entry key.
    pub fn key(&self) -> &PathSegment {
        &self.key
    }

    /// Whether absence is a violation.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether this entry absorbs all remaining positional values.
    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// The rule applied to present values.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Coercion applied before the rule, if any.
    pub fn coercion(&self) -> Option<&Coercion> {
        self.coerce.as_ref()
    }

    fn evaluate(&self, value: &Value, ctx: &Context<'_>) -> ValidationResult {
        match &self.coerce {
            Some(coercion) => self.rule.evaluate_in(&coercion.apply(value), ctx),
            None => self.rule.evaluate_in(value, ctx),
        }
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct SchemaInner {
    name: String,
    layout: Layout,
    entries: Vec<Entry>,
    options: SchemaOptions,
}

/// A structural contract over an object or an argument list.
#[derive(Debug, Clone)]
pub struct Schema {
    inner: Arc<SchemaInner>,
}

/// Build a schema from entry definitions.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] for entries without a rule, duplicate
/// keys, mixed named/positional keys, out-of-order positions and misplaced
/// variadic entries.
pub fn schema<I>(entries: I, options: SchemaOptions) -> Result<Schema, ConfigurationError>
where
    I: IntoIterator<Item = EntryDef>,
{
    Schema::from_defs(DEFAULT_SCHEMA_NAME.to_string(), entries, options, None)
}

impl Schema {
    /// Start a keyed (object) schema.
    pub fn keyed() -> SchemaBuilder {
        SchemaBuilder::new(Layout::Keyed)
    }

    /// Start a positional (argument list) schema.
    pub fn positional() -> SchemaBuilder {
        SchemaBuilder::new(Layout::Positional)
    }

    fn from_defs<I>(
        name: String,
        defs: I,
        options: SchemaOptions,
        layout: Option<Layout>,
    ) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = EntryDef>,
    {
        if name.trim().is_empty() {
            return Err(ConfigurationError::EmptyName);
        }
        let defs: Vec<EntryDef> = defs.into_iter().collect();
        let layout = layout.unwrap_or(match defs.first() {
            Some(first) if first.key.is_index() => Layout::Positional,
            _ => Layout::Keyed,
        });

        let mut entries: Vec<Entry> = Vec::with_capacity(defs.len());
        let count = defs.len();
        for (position, def) in defs.into_iter().enumerate() {
            let key_text = def.key.to_string();
            if def.key.is_index() != (layout == Layout::Positional) {
                return Err(ConfigurationError::MixedKeys);
            }
            if entries.iter().any(|e| e.key == def.key) {
                return Err(ConfigurationError::DuplicateKey { key: key_text });
            }
            if let PathSegment::Index(found) = def.key {
                if found != position {
                    return Err(ConfigurationError::PositionOutOfOrder {
                        expected: position,
                        found,
                    });
                }
            }
            if def.variadic {
                if layout == Layout::Keyed {
                    return Err(ConfigurationError::VariadicInKeyedSchema { key: key_text });
                }
                if position + 1 != count {
                    return Err(ConfigurationError::VariadicNotLast { key: key_text });
                }
            }
            let rule = def
                .rule
                .ok_or(ConfigurationError::MissingRule { key: key_text })?;
            entries.push(Entry {
                key: def.key,
                required: def.required,
                rule,
                variadic: def.variadic,
                coerce: def.coerce,
            });
        }

        Ok(Self {
            inner: Arc::new(SchemaInner {
                name,
                layout,
                entries,
                options,
            }),
        })
    }

    /// Schema name (`schema` unless one was given).
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Keyed or positional.
    pub fn layout(&self) -> Layout {
        self.inner.layout
    }

    /// Whether this schema addresses values by position.
    pub fn is_positional(&self) -> bool {
        self.inner.layout == Layout::Positional
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[Entry] {
        &self.inner.entries
    }

    /// Schema options.
    pub fn options(&self) -> SchemaOptions {
        self.inner.options
    }

    /// Whether undeclared keys are violations.
    pub fn is_strict(&self) -> bool {
        self.inner.options.strict
    }

    fn declares(&self, key: &str) -> bool {
        self.inner
            .entries
            .iter()
            .any(|e| matches!(&e.key, PathSegment::Key(k) if k == key))
    }

    fn evaluate_object(&self, members: &Map<String, Value>, ctx: &Context<'_>) -> ValidationResult {
        let mut result = ValidationResult::valid();
        for entry in &self.inner.entries {
            let PathSegment::Key(key) = &entry.key else {
                continue;
            };
            match members.get(key) {
                Some(value) => result.merge(entry.evaluate(value, &ctx.child(entry.key.clone()))),
                None if entry.required => {
                    result.push(Violation::required(ctx.path().child(entry.key.clone())));
                }
                None => {}
            }
        }
        if self.is_strict() {
            for (key, value) in members {
                if !self.declares(key) {
                    result.push(Violation::unexpected_key(ctx.path().child(key.as_str()), value));
                }
            }
        }
        result
    }

    /// Evaluate a positional schema directly against an argument slice.
    ///
    /// On a keyed schema the slice is treated like any other non-object
    /// candidate and yields a single shape violation.
    pub fn evaluate_positional(&self, items: &[Value], ctx: &Context<'_>) -> ValidationResult {
        if !self.is_positional() {
            return ValidationResult::single(Violation::type_mismatch(
                ctx.path().clone(),
                "object",
                &Value::Array(items.to_vec()),
            ));
        }
        let mut result = ValidationResult::valid();
        let mut variadic = false;
        for entry in &self.inner.entries {
            let PathSegment::Index(index) = entry.key else {
                continue;
            };
            if entry.variadic {
                variadic = true;
                for (position, item) in items.iter().enumerate().skip(index) {
                    result.merge(entry.evaluate(item, &ctx.child(position)));
                }
                continue;
            }
            match items.get(index) {
                Some(value) => result.merge(entry.evaluate(value, &ctx.child(index))),
                None if entry.required => result.push(Violation::required(ctx.path().child(index))),
                None => {}
            }
        }
        if self.is_strict() && !variadic {
            for (position, extra) in items.iter().enumerate().skip(self.inner.entries.len()) {
                result.push(Violation::unexpected_key(ctx.path().child(position), extra));
            }
        }
        result
    }
}

impl Evaluate for Schema {
    fn evaluate_in(&self, value: &Value, ctx: &Context<'_>) -> ValidationResult {
        match (self.inner.layout, value) {
            (Layout::Keyed, Value::Object(members)) => self.evaluate_object(members, ctx),
            (Layout::Positional, Value::Array(items)) => self.evaluate_positional(items, ctx),
            (Layout::Keyed, other) => {
                ValidationResult::single(Violation::type_mismatch(ctx.path().clone(), "object", other))
            }
            (Layout::Positional, other) => {
                ValidationResult::single(Violation::type_mismatch(ctx.path().clone(), "array", other))
            }
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self
            .inner
            .entries
            .iter()
            .map(|e| {
                let marker = if e.variadic {
                    "..."
                } else if e.required {
                    ""
                } else {
                    "?"
                };
                format!("{}{marker}: {}", e.key, e.rule.name())
            })
            .collect();
        write!(f, "{}{{{}}}", self.inner.name, keys.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Schema`].
///
/// Named fields and positional arguments can both be added; mixing them is
/// reported by [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: Option<String>,
    layout: Layout,
    defs: Vec<EntryDef>,
    options: SchemaOptions,
}

impl SchemaBuilder {
    fn new(layout: Layout) -> Self {
        Self {
            name: None,
            layout,
            defs: Vec::new(),
            options: SchemaOptions::default(),
        }
    }

    /// Name used in documentation and OR/NOT messages.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Report undeclared keys.
    pub fn strict(mut self) -> Self {
        self.options.strict = true;
        self
    }

    /// Set all options at once.
    pub fn options(mut self, options: SchemaOptions) -> Self {
        self.options = options;
        self
    }

    /// Add a raw entry definition.
    pub fn entry(mut self, def: EntryDef) -> Self {
        self.defs.push(def);
        self
    }

    /// Required named field.
    pub fn field(self, key: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.entry(EntryDef::required(PathSegment::Key(key.into()), rule))
    }

    /// Optional named field.
    pub fn optional_field(self, key: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.entry(EntryDef::optional(PathSegment::Key(key.into()), rule))
    }

    /// Required positional argument at the next index.
    pub fn arg(self, rule: impl Into<Rule>) -> Self {
        let index = self.defs.len();
        self.entry(EntryDef::required(index, rule))
    }

    /// Optional positional argument at the next index.
    pub fn optional_arg(self, rule: impl Into<Rule>) -> Self {
        let index = self.defs.len();
        self.entry(EntryDef::optional(index, rule))
    }

    /// Variadic tail: every remaining argument must satisfy `rule`.
    pub fn rest(self, rule: impl Into<Rule>) -> Self {
        let index = self.defs.len();
        self.entry(EntryDef::new(index).rule(rule).variadic())
    }

    /// Validate the definitions and build the schema.
    ///
    /// # Errors
    ///
    /// See [`schema`].
    pub fn build(self) -> Result<Schema, ConfigurationError> {
        let name = self.name.unwrap_or_else(|| DEFAULT_SCHEMA_NAME.to_string());
        Schema::from_defs(name, self.defs, self.options, Some(self.layout))
    }
}

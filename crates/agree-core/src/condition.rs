//! # Conditions & Rules
//!
//! A [`Condition`] is a named predicate over a single JSON value with
//! violation-reporting semantics. Conditions are immutable once built and
//! share their interior, so cloning is cheap and the same condition can be
//! evaluated from many threads at once.
//!
//! A [`Rule`] is the node type of the contract tree: either a leaf
//! [`Condition`] or a nested [`Schema`]. Combinators take `Rule`s as
//! children, which is what lets a schema stand wherever a condition is
//! expected. Evaluation is a single recursive dispatch on the tag.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::combinators;
use crate::error::ConfigurationError;
use crate::message::MessageTemplate;
use crate::path::Context;
use crate::result::{ValidationResult, Violation};
use crate::schema::Schema;

/// Predicate signature shared by all leaf conditions.
pub type Predicate = dyn Fn(&Value, &Context<'_>) -> bool + Send + Sync;

/// What a condition does when evaluated.
#[derive(Clone)]
pub enum ConditionKind {
    /// A user-supplied predicate.
    Predicate(Arc<Predicate>),
    /// AND: every child must hold. All children are evaluated.
    All(Vec<Rule>),
    /// OR: at least one child must hold. Stops at the first success.
    Any(Vec<Rule>),
    /// NOT: the child must fail.
    Not(Box<Rule>),
    /// At least `required` of `children` must hold.
    AtLeast {
        /// Minimum number of satisfied children.
        required: usize,
        /// Candidate children.
        children: Vec<Rule>,
    },
    /// Every element of an array must satisfy the child.
    Each(Box<Rule>),
}

impl fmt::Debug for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::All(children) => f.debug_tuple("All").field(children).finish(),
            Self::Any(children) => f.debug_tuple("Any").field(children).finish(),
            Self::Not(child) => f.debug_tuple("Not").field(child).finish(),
            Self::AtLeast { required, children } => f
                .debug_struct("AtLeast")
                .field("required", required)
                .field("children", children)
                .finish(),
            Self::Each(child) => f.debug_tuple("Each").field(child).finish(),
        }
    }
}

#[derive(Debug)]
struct Inner {
    name: String,
    description: Option<String>,
    message: Option<MessageTemplate>,
    kind: ConditionKind,
}

/// A named, composable predicate.
#[derive(Clone)]
pub struct Condition {
    inner: Arc<Inner>,
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("name", &self.inner.name)
            .field("kind", &self.inner.kind)
            .finish()
    }
}

/// Build a leaf condition from a name and a predicate.
///
/// # Errors
///
/// Returns [`ConfigurationError::EmptyName`] if `name` is blank.
pub fn condition<F>(name: impl Into<String>, predicate: F) -> Result<Condition, ConfigurationError>
where
    F: Fn(&Value, &Context<'_>) -> bool + Send + Sync + 'static,
{
    Condition::new(name, predicate)
}

impl Condition {
    /// Build a leaf condition from a name and a predicate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyName`] if `name` is blank.
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&Value, &Context<'_>) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigurationError::EmptyName);
        }
        Ok(Self::from_kind(name, ConditionKind::Predicate(Arc::new(predicate))))
    }

    /// Build a condition whose name is known to be valid.
    pub(crate) fn from_kind(name: impl Into<String>, kind: ConditionKind) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                description: None,
                message: None,
                kind,
            }),
        }
    }

    pub(crate) fn builtin<F>(name: &'static str, predicate: F) -> Self
    where
        F: Fn(&Value, &Context<'_>) -> bool + Send + Sync + 'static,
    {
        Self::from_kind(name, ConditionKind::Predicate(Arc::new(predicate)))
    }

    fn rebuild(&self, edit: impl FnOnce(&mut Inner)) -> Self {
        let mut inner = Inner {
            name: self.inner.name.clone(),
            description: self.inner.description.clone(),
            message: self.inner.message.clone(),
            kind: self.inner.kind.clone(),
        };
        edit(&mut inner);
        Self {
            inner: Arc::new(inner),
        }
    }

    /// A copy of this condition under another name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyName`] if `name` is blank.
    pub fn with_name(&self, name: impl Into<String>) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigurationError::EmptyName);
        }
        Ok(self.rebuild(|inner| inner.name = name))
    }

    /// A copy of this condition with a custom message template.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidTemplate`] if the template does
    /// not parse.
    pub fn with_message(&self, template: &str) -> Result<Self, ConfigurationError> {
        let template = MessageTemplate::parse(template)?;
        Ok(self.rebuild(|inner| inner.message = Some(template)))
    }

    pub(crate) fn with_template(self, template: MessageTemplate) -> Self {
        self.rebuild(|inner| inner.message = Some(template))
    }

    /// A copy of this condition with a human description used by
    /// documentation renderers (e.g. `length(1..=64)`).
    pub fn describe(&self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.rebuild(|inner| inner.description = Some(description))
    }

    /// Condition name, reported in every violation it produces.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Human description, if one was attached.
    pub fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }

    /// Custom message template, if one was attached.
    pub fn message(&self) -> Option<&MessageTemplate> {
        self.inner.message.as_ref()
    }

    /// What the condition does. Read-only view for renderers.
    pub fn kind(&self) -> &ConditionKind {
        &self.inner.kind
    }

    /// Whether the condition holds for `value`, without collecting violations.
    ///
    /// Always agrees with `evaluate(..).is_valid()`.
    pub fn test(&self, value: &Value, ctx: &Context<'_>) -> bool {
        match &self.inner.kind {
            ConditionKind::Predicate(predicate) => predicate(value, ctx),
            ConditionKind::All(children) => children.iter().all(|c| c.test(value, ctx)),
            ConditionKind::Any(children) => children.iter().any(|c| c.test(value, ctx)),
            ConditionKind::Not(child) => !child.test(value, ctx),
            ConditionKind::AtLeast { required, children } => {
                children.iter().filter(|c| c.test(value, ctx)).take(*required).count() >= *required
            }
            ConditionKind::Each(child) => match value.as_array() {
                Some(items) => items
                    .iter()
                    .enumerate()
                    .all(|(i, item)| child.test(item, &ctx.child(i))),
                None => false,
            },
        }
    }

    /// Build this condition's violation for `value`.
    ///
    /// Uses the custom template when present, otherwise `default_message`.
    pub(crate) fn violation(
        &self,
        value: &Value,
        ctx: &Context<'_>,
        default_message: impl FnOnce() -> String,
    ) -> Violation {
        let message = match &self.inner.message {
            Some(template) => template.render(self.name(), value, ctx.path()),
            None => default_message(),
        };
        Violation::new(ctx.path().clone(), self.name(), message, Some(value.clone()))
    }
}

/// Anything that can be evaluated against a value.
pub trait Evaluate {
    /// Evaluate `value` in `ctx`, collecting every violation.
    fn evaluate_in(&self, value: &Value, ctx: &Context<'_>) -> ValidationResult;
}

impl Evaluate for Condition {
    fn evaluate_in(&self, value: &Value, ctx: &Context<'_>) -> ValidationResult {
        match &self.inner.kind {
            ConditionKind::Predicate(predicate) => {
                if predicate(value, ctx) {
                    ValidationResult::valid()
                } else {
                    ValidationResult::single(self.violation(value, ctx, || {
                        format!("value {value} does not satisfy `{}`", self.name())
                    }))
                }
            }
            ConditionKind::All(children) => combinators::evaluate_all(children, value, ctx),
            ConditionKind::Any(children) => combinators::evaluate_any(self, children, value, ctx),
            ConditionKind::Not(child) => combinators::evaluate_not(self, child, value, ctx),
            ConditionKind::AtLeast { required, children } => {
                combinators::evaluate_at_least(self, *required, children, value, ctx)
            }
            ConditionKind::Each(child) => combinators::evaluate_each(child, value, ctx),
        }
    }
}

/// A node of the contract tree.
#[derive(Debug, Clone)]
pub enum Rule {
    /// A (possibly compound) condition.
    Leaf(Condition),
    /// A nested structural schema.
    Node(Schema),
}

impl Rule {
    /// Name reported for this node.
    pub fn name(&self) -> &str {
        match self {
            Self::Leaf(condition) => condition.name(),
            Self::Node(schema) => schema.name(),
        }
    }

    /// Whether `value` satisfies this rule, without collecting violations.
    pub fn test(&self, value: &Value, ctx: &Context<'_>) -> bool {
        match self {
            Self::Leaf(condition) => condition.test(value, ctx),
            Self::Node(schema) => schema.evaluate_in(value, ctx).is_valid(),
        }
    }
}

impl Evaluate for Rule {
    fn evaluate_in(&self, value: &Value, ctx: &Context<'_>) -> ValidationResult {
        match self {
            Self::Leaf(condition) => condition.evaluate_in(value, ctx),
            Self::Node(schema) => schema.evaluate_in(value, ctx),
        }
    }
}

impl From<Condition> for Rule {
    fn from(condition: Condition) -> Self {
        Self::Leaf(condition)
    }
}

impl From<&Condition> for Rule {
    fn from(condition: &Condition) -> Self {
        Self::Leaf(condition.clone())
    }
}

impl From<Schema> for Rule {
    fn from(schema: Schema) -> Self {
        Self::Node(schema)
    }
}

impl From<&Schema> for Rule {
    fn from(schema: &Schema) -> Self {
        Self::Node(schema.clone())
    }
}

impl From<&Rule> for Rule {
    fn from(rule: &Rule) -> Self {
        rule.clone()
    }
}

/// Evaluate `rule` against `value` from the root with an empty environment.
pub fn evaluate<R: Evaluate + ?Sized>(rule: &R, value: &Value) -> ValidationResult {
    rule.evaluate_in(value, &Context::root())
}

/// Evaluate `rule` against `value` with a caller-supplied environment for
/// cross-field conditions.
pub fn evaluate_with_env<R: Evaluate + ?Sized>(rule: &R, value: &Value, env: &Value) -> ValidationResult {
    rule.evaluate_in(value, &Context::with_env(env))
}

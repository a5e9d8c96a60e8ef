//! # Coercion Hooks
//!
//! A [`Coercion`] converts a value before a schema entry's rule sees it,
//! e.g. `"42"` → `42` for query-string parameters, which always arrive as
//! strings. Hooks are pure: the candidate value is never modified, the rule
//! is evaluated against the hook's output. A hook that cannot convert a
//! value leaves it unchanged, and the rule then reports on the original.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::{Number, Value};

type CoerceFn = dyn Fn(&Value) -> Option<Value> + Send + Sync;

/// A named, pure value conversion.
#[derive(Clone)]
pub struct Coercion {
    name: String,
    apply: Arc<CoerceFn>,
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coercion").field("name", &self.name).finish()
    }
}

impl Coercion {
    /// Wrap a conversion. Returning `None` keeps the original value.
    pub fn new<F>(name: impl Into<String>, apply: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            apply: Arc::new(apply),
        }
    }

    /// Name shown by documentation renderers.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the hook; borrows the input when no conversion happened.
    pub fn apply<'v>(&self, value: &'v Value) -> Cow<'v, Value> {
        match (self.apply)(value) {
            Some(converted) => Cow::Owned(converted),
            None => Cow::Borrowed(value),
        }
    }
}

/// `"42"` → `42`, `"2.5"` → `2.5`. Non-finite floats stay strings.
pub fn number_from_string() -> Coercion {
    Coercion::new("number", |value| {
        let text = value.as_str()?.trim();
        if let Ok(int) = text.parse::<i64>() {
            return Some(Value::from(int));
        }
        let float = text.parse::<f64>().ok()?;
        Number::from_f64(float).map(Value::Number)
    })
}

/// `"42"` → `42`; anything that is not an integer literal stays as is.
pub fn integer_from_string() -> Coercion {
    Coercion::new("integer", |value| {
        value.as_str()?.trim().parse::<i64>().ok().map(Value::from)
    })
}

/// `"true"`/`"1"`/`"yes"` → `true`, `"false"`/`"0"`/`"no"` → `false`.
pub fn boolean_from_string() -> Coercion {
    Coercion::new("boolean", |value| {
        match value.as_str()?.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(Value::Bool(true)),
            "false" | "0" | "no" => Some(Value::Bool(false)),
            _ => None,
        }
    })
}

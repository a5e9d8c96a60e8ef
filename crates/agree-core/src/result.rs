//! # Violations & Validation Results
//!
//! Every evaluation returns a fresh [`ValidationResult`] owned by the caller.
//! A result is valid exactly when it carries no [`Violation`]s; there is no
//! separate flag that could disagree with the violation list.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::path::{Path, PathSegment};

/// Condition name reported when a required key is absent.
pub const REQUIRED: &str = "required";
/// Condition name reported for undeclared keys in strict schemas.
pub const UNEXPECTED_KEY: &str = "unexpected-key";

/// A single reported contract failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Key chain from the evaluation root to the failing value.
    pub path: Path,
    /// Name of the condition that failed.
    pub condition_name: String,
    /// Rendered, human-readable message.
    pub message: String,
    /// The value that failed; absent for missing keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,
    /// OR-branch indices this violation was reported under, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<usize>,
}

impl Violation {
    /// Build a violation for `actual` at `path`.
    pub fn new(
        path: Path,
        condition_name: impl Into<String>,
        message: impl Into<String>,
        actual: Option<Value>,
    ) -> Self {
        Self {
            path,
            condition_name: condition_name.into(),
            message: message.into(),
            actual,
            alternatives: Vec::new(),
        }
    }

    pub(crate) fn required(path: Path) -> Self {
        let message = match path.last() {
            Some(PathSegment::Index(i)) => format!("missing required argument at position {i}"),
            Some(PathSegment::Key(k)) => format!("missing required key `{k}`"),
            None => "missing required value".to_string(),
        };
        Self::new(path, REQUIRED, message, None)
    }

    pub(crate) fn unexpected_key(path: Path, actual: &Value) -> Self {
        let message = match path.last() {
            Some(PathSegment::Index(i)) => format!("unexpected argument at position {i}"),
            Some(PathSegment::Key(k)) => format!("unexpected key `{k}`"),
            None => "unexpected value".to_string(),
        };
        Self::new(path, UNEXPECTED_KEY, message, Some(actual.clone()))
    }

    /// Shape mismatch: the value is not the JSON type a structural rule needs.
    pub(crate) fn type_mismatch(path: Path, expected: &'static str, actual: &Value) -> Self {
        let message = format!("expected {expected}, found {}", type_name(actual));
        Self::new(path, expected, message, Some(actual.clone()))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: {} [{}]", self.path, self.message, self.condition_name)
    }
}

/// Aggregate outcome of one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ValidationResult {
    violations: Vec<Violation>,
}

impl ValidationResult {
    /// A result with no violations.
    pub fn valid() -> Self {
        Self::default()
    }

    /// A result carrying exactly `violation`.
    pub fn single(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    /// Whether no violation was found.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations in reporting order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the violations.
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Same as [`is_valid`](Self::is_valid).
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Condition names in reporting order.
    pub fn condition_names(&self) -> Vec<&str> {
        self.violations
            .iter()
            .map(|v| v.condition_name.as_str())
            .collect()
    }

    /// Append one violation.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Append all violations of `other`, keeping their order.
    pub fn merge(&mut self, other: ValidationResult) {
        self.violations.extend(other.violations);
    }

    /// Mark every violation as reported under OR-branch `index`.
    pub(crate) fn tag_alternative(&mut self, index: usize) {
        for violation in &mut self.violations {
            violation.alternatives.insert(0, index);
        }
    }
}

impl From<Vec<Violation>> for ValidationResult {
    fn from(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

impl FromIterator<Violation> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self {
            violations: iter.into_iter().collect(),
        }
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationResult", 2)?;
        state.serialize_field("valid", &self.is_valid())?;
        state.serialize_field("violations", &self.violations)?;
        state.end()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return write!(f, "  (no violations)");
        }
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// JSON type name used in mismatch messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

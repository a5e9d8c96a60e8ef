//! # Assertions
//!
//! Turn a [`ValidationResult`] into a test failure with every violation in
//! the message. [`check`] returns a `Result` for tests that propagate with
//! `?`; the `assert_*` functions panic at the caller's location.

use agree_core::{evaluate, Evaluate, ValidationResult};
use serde_json::Value;
use thiserror::Error;

/// A value failed the rule it was checked against.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("value {value} violates `{rule}`:\n{result}")]
pub struct ValidationFailure {
    /// Name of the rule that was checked.
    pub rule: String,
    /// The rejected value.
    pub value: Value,
    /// The violations found.
    pub result: ValidationResult,
}

/// Anything with a reportable name that can be evaluated.
pub trait NamedRule: Evaluate {
    /// Name used in failure messages.
    fn rule_name(&self) -> &str;
}

impl NamedRule for agree_core::Condition {
    fn rule_name(&self) -> &str {
        self.name()
    }
}

impl NamedRule for agree_core::Schema {
    fn rule_name(&self) -> &str {
        self.name()
    }
}

impl NamedRule for agree_core::Rule {
    fn rule_name(&self) -> &str {
        self.name()
    }
}

/// Evaluate `rule` against `value`.
///
/// # Errors
///
/// Returns a [`ValidationFailure`] carrying every violation when the value
/// does not satisfy the rule.
pub fn check<R: NamedRule + ?Sized>(rule: &R, value: &Value) -> Result<(), ValidationFailure> {
    let result = evaluate(rule, value);
    if result.is_valid() {
        return Ok(());
    }
    Err(ValidationFailure {
        rule: rule.rule_name().to_string(),
        value: value.clone(),
        result,
    })
}

/// Panic unless `value` satisfies `rule`.
#[track_caller]
pub fn assert_valid<R: NamedRule + ?Sized>(rule: &R, value: &Value) {
    if let Err(failure) = check(rule, value) {
        panic!("expected a valid value: {failure}");
    }
}

/// Panic if `value` satisfies `rule`; otherwise return the violations.
#[track_caller]
pub fn assert_invalid<R: NamedRule + ?Sized>(rule: &R, value: &Value) -> ValidationResult {
    let result = evaluate(rule, value);
    assert!(
        !result.is_valid(),
        "expected value {value} to violate `{}`, but it was accepted",
        rule.rule_name()
    );
    result
}

/// Panic unless the violations are exactly `expected`, as
/// `(path, condition name)` pairs in reporting order.
///
/// Paths use the display form: `(root)`, `age`, `items[2].name`, `[1]`.
#[track_caller]
pub fn assert_violations<R: NamedRule + ?Sized>(rule: &R, value: &Value, expected: &[(&str, &str)]) {
    let result = evaluate(rule, value);
    let actual: Vec<(String, String)> = result
        .violations()
        .iter()
        .map(|v| (v.path.to_string(), v.condition_name.clone()))
        .collect();
    let expected: Vec<(String, String)> = expected
        .iter()
        .map(|(path, name)| (path.to_string(), name.to_string()))
        .collect();
    assert_eq!(
        actual, expected,
        "violations of `{}` for {value} differ:\n{result}",
        rule.rule_name()
    );
}

/// Assert that a value satisfies a rule.
///
/// ```ignore
/// assert_valid!(positive(), json!(3));
/// ```
#[macro_export]
macro_rules! assert_valid {
    ($rule:expr, $value:expr $(,)?) => {
        $crate::assert_valid(&$rule, &$value)
    };
}

/// Assert that a value violates a rule, optionally naming the expected
/// condition names in reporting order.
///
/// ```ignore
/// assert_invalid!(positive(), json!(-1));
/// assert_invalid!(user_schema, json!({}), ["required", "required"]);
/// ```
#[macro_export]
macro_rules! assert_invalid {
    ($rule:expr, $value:expr $(,)?) => {
        $crate::assert_invalid(&$rule, &$value)
    };
    ($rule:expr, $value:expr, [$($name:expr),* $(,)?] $(,)?) => {{
        let result = $crate::assert_invalid(&$rule, &$value);
        let expected: Vec<&str> = vec![$($name),*];
        assert_eq!(result.condition_names(), expected, "unexpected violations:\n{}", result);
        result
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use agree_core::conditions::{is_string, positive};
    use agree_core::Schema;
    use serde_json::json;

    #[test]
    fn check_reports_every_violation() {
        let s = Schema::keyed().field("a", positive()).field("b", is_string()).build().unwrap();
        let failure = check(&s, &json!({"a": -1, "b": 2})).unwrap_err();
        assert_eq!(failure.result.len(), 2);
        let message = failure.to_string();
        assert!(message.contains("violates `schema`"));
        assert!(message.contains("expected a positive number, found -1"));
    }

    #[test]
    fn passing_assertions() {
        assert_valid(&positive(), &json!(1));
        let result = assert_invalid(&positive(), &json!(0));
        assert_eq!(result.len(), 1);
        assert_violations(&positive(), &json!(-1), &[("(root)", "positive")]);
    }

    #[test]
    #[should_panic(expected = "expected a valid value")]
    fn assert_valid_panics_on_violation() {
        assert_valid(&positive(), &json!(-1));
    }

    #[test]
    #[should_panic(expected = "but it was accepted")]
    fn assert_invalid_panics_on_success() {
        assert_invalid(&positive(), &json!(1));
    }

    #[test]
    fn macros_accept_expressions() {
        crate::assert_valid!(positive(), json!(2));
        let result = crate::assert_invalid!(positive(), json!(-2), ["positive"]);
        assert_eq!(result.violations()[0].actual, Some(json!(-2)));
    }
}

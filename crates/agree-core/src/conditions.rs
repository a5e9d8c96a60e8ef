//! # Built-in Conditions
//!
//! Ready-made conditions for the common JSON checks. Every constructor
//! returns a fresh, immutable [`Condition`]; parameterized conditions
//! capture their parameters at construction time and carry a description
//! (`range(0..=130)`, `length(1..=64)`) for documentation renderers.
//!
//! Type conditions use the JSON type name as condition name (`string`,
//! `number`, ...), which matches the names of shape violations reported by
//! schemas.

use regex::Regex;
use serde_json::Value;

use crate::condition::{Condition, ConditionKind, Rule};
use crate::error::ConfigurationError;
use crate::message::MessageTemplate;

/// Accepts every value. Used for unannotated parameters.
pub fn anything() -> Condition {
    Condition::builtin("anything", |_, _| true)
}

/// Rejects `null`.
pub fn not_null() -> Condition {
    Condition::builtin("not-null", |v, _| !v.is_null())
        .with_template(MessageTemplate::value_between("value must not be ", ""))
}

/// Accepts only `null`.
pub fn is_null() -> Condition {
    Condition::builtin("null", |v, _| v.is_null())
        .with_template(MessageTemplate::value_between("expected null, found ", ""))
}

/// Accepts JSON strings.
pub fn is_string() -> Condition {
    Condition::builtin("string", |v, _| v.is_string())
        .with_template(MessageTemplate::value_between("expected a string, found ", ""))
}

/// Accepts JSON numbers.
pub fn is_number() -> Condition {
    Condition::builtin("number", |v, _| v.is_number())
        .with_template(MessageTemplate::value_between("expected a number, found ", ""))
}

/// Accepts numbers without a fractional part.
pub fn is_integer() -> Condition {
    Condition::builtin("integer", |v, _| v.is_i64() || v.is_u64())
        .with_template(MessageTemplate::value_between("expected an integer, found ", ""))
}

/// Accepts `true` and `false`.
pub fn is_boolean() -> Condition {
    Condition::builtin("boolean", |v, _| v.is_boolean())
        .with_template(MessageTemplate::value_between("expected a boolean, found ", ""))
}

/// Accepts arrays.
pub fn is_array() -> Condition {
    Condition::builtin("array", |v, _| v.is_array())
        .with_template(MessageTemplate::value_between("expected an array, found ", ""))
}

/// Accepts objects.
pub fn is_object() -> Condition {
    Condition::builtin("object", |v, _| v.is_object())
        .with_template(MessageTemplate::value_between("expected an object, found ", ""))
}

/// Numbers strictly greater than zero.
pub fn positive() -> Condition {
    Condition::builtin("positive", |v, _| v.as_f64().is_some_and(|n| n > 0.0))
        .with_template(MessageTemplate::value_between("expected a positive number, found ", ""))
}

/// Numbers greater than or equal to zero.
pub fn non_negative() -> Condition {
    Condition::builtin("non-negative", |v, _| v.as_f64().is_some_and(|n| n >= 0.0))
        .with_template(MessageTemplate::value_between("expected a non-negative number, found ", ""))
}

/// Numbers within `min..=max`.
pub fn in_range(min: f64, max: f64) -> Condition {
    Condition::builtin("range", move |v, _| {
        v.as_f64().is_some_and(|n| n >= min && n <= max)
    })
    .with_template(MessageTemplate::value_between(
        "",
        &format!(" is outside {min}..={max}"),
    ))
    .describe(format!("range({min}..={max})"))
}

/// Length of a string (in characters), array or object within `min..=max`.
pub fn length_between(min: usize, max: usize) -> Condition {
    Condition::builtin("length", move |v, _| {
        length_of(v).is_some_and(|len| len >= min && len <= max)
    })
    .with_template(MessageTemplate::value_between(
        "length of ",
        &format!(" is outside {min}..={max}"),
    ))
    .describe(format!("length({min}..={max})"))
}

/// Non-empty string, array or object.
pub fn non_empty() -> Condition {
    Condition::builtin("non-empty", |v, _| length_of(v).is_some_and(|len| len > 0))
        .with_template(MessageTemplate::value_between("expected a non-empty value, found ", ""))
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(members) => Some(members.len()),
        _ => None,
    }
}

/// Strings matching the regular expression `pattern`.
///
/// # Errors
///
/// Returns [`ConfigurationError::InvalidPattern`] if `pattern` does not
/// compile.
pub fn matches(pattern: &str) -> Result<Condition, ConfigurationError> {
    let regex = Regex::new(pattern).map_err(|e| ConfigurationError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;
    Ok(
        Condition::builtin("pattern", move |v, _| v.as_str().is_some_and(|s| regex.is_match(s)))
            .with_template(MessageTemplate::value_between(
                "",
                &format!(" does not match /{pattern}/"),
            ))
            .describe(format!("matches(/{pattern}/)")),
    )
}

/// Values equal to one of `allowed`.
pub fn one_of<I>(allowed: I) -> Condition
where
    I: IntoIterator<Item = Value>,
{
    let allowed: Vec<Value> = allowed.into_iter().collect();
    let listing = allowed
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Condition::builtin("one-of", move |v, _| allowed.contains(v))
        .with_template(MessageTemplate::value_between(
            "",
            &format!(" is not one of [{listing}]"),
        ))
        .describe(format!("one_of([{listing}])"))
}

/// Values equal to `expected`.
pub fn equals(expected: Value) -> Condition {
    let rendered = expected.to_string();
    Condition::builtin("equals", move |v, _| *v == expected)
        .with_template(MessageTemplate::value_between(
            "",
            &format!(" is not equal to {rendered}"),
        ))
        .describe(format!("equals({rendered})"))
}

/// Objects whose member `key` equals `expected`.
pub fn attribute_equals(key: &str, expected: Value) -> Condition {
    let rendered = format!("{key} == {expected}");
    let key = key.to_string();
    Condition::builtin("attribute-equals", move |v, _| v.get(&key) == Some(&expected))
        .with_template(MessageTemplate::value_between(
            "",
            &format!(" does not satisfy {rendered}"),
        ))
        .describe(format!("attribute({rendered})"))
}

/// Values equal to the environment member at JSON Pointer `pointer`.
///
/// Cross-field check: the caller passes the related data as environment,
/// e.g. the password when checking its confirmation.
pub fn equals_env(pointer: &str) -> Condition {
    let pointer = pointer.to_string();
    let rendered = format!("env{pointer}");
    Condition::builtin("equals-env", move |v, ctx| ctx.env().pointer(&pointer) == Some(v))
        .with_template(MessageTemplate::value_between(
            "",
            &format!(" is not equal to {rendered}"),
        ))
        .describe(format!("equals({rendered})"))
}

/// `null`, or a value satisfying `rule`.
pub fn optional(rule: impl Into<Rule>) -> Condition {
    let rule = rule.into();
    let description = format!("optional({})", rule.name());
    Condition::from_kind("optional", ConditionKind::Any(vec![is_null().into(), rule]))
        .describe(description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{evaluate, evaluate_with_env};
    use serde_json::json;

    #[test]
    fn type_conditions() {
        assert!(evaluate(&is_string(), &json!("x")).is_valid());
        assert!(!evaluate(&is_string(), &json!(1)).is_valid());
        assert!(evaluate(&is_integer(), &json!(3)).is_valid());
        assert!(!evaluate(&is_integer(), &json!(3.5)).is_valid());
        assert!(evaluate(&is_object(), &json!({})).is_valid());
        assert!(evaluate(&is_array(), &json!([])).is_valid());
        assert!(evaluate(&is_boolean(), &json!(false)).is_valid());
        assert!(evaluate(&is_null(), &json!(null)).is_valid());
        assert!(!evaluate(&not_null(), &json!(null)).is_valid());
    }

    #[test]
    fn builtin_messages_name_the_value() {
        let result = evaluate(&is_string(), &json!(12));
        assert_eq!(result.violations()[0].message, "expected a string, found 12");
    }

    #[test]
    fn numeric_conditions() {
        assert!(evaluate(&positive(), &json!(0.5)).is_valid());
        assert!(!evaluate(&positive(), &json!(0)).is_valid());
        assert!(!evaluate(&positive(), &json!("5")).is_valid());
        assert!(evaluate(&non_negative(), &json!(0)).is_valid());
        let age = in_range(0.0, 130.0);
        assert!(evaluate(&age, &json!(42)).is_valid());
        let result = evaluate(&age, &json!(131));
        assert_eq!(result.violations()[0].message, "131 is outside 0..=130");
        assert_eq!(age.description(), Some("range(0..=130)"));
    }

    #[test]
    fn length_counts_characters() {
        let c = length_between(1, 3);
        assert!(evaluate(&c, &json!("ééé")).is_valid());
        assert!(!evaluate(&c, &json!("")).is_valid());
        assert!(evaluate(&c, &json!([1, 2])).is_valid());
        assert!(!evaluate(&c, &json!(12)).is_valid());
        assert!(!evaluate(&non_empty(), &json!({})).is_valid());
    }

    #[test]
    fn pattern_condition() {
        let slug = matches("^[a-z0-9-]+$").unwrap();
        assert!(evaluate(&slug, &json!("hello-world")).is_valid());
        let result = evaluate(&slug, &json!("Hello World"));
        assert_eq!(result.condition_names(), vec!["pattern"]);
        assert!(matches!(matches("("), Err(ConfigurationError::InvalidPattern { .. })));
    }

    #[test]
    fn equality_conditions() {
        let role = one_of([json!("admin"), json!("user")]);
        assert!(evaluate(&role, &json!("user")).is_valid());
        assert_eq!(
            evaluate(&role, &json!("root")).violations()[0].message,
            "\"root\" is not one of [\"admin\", \"user\"]"
        );
        assert!(evaluate(&equals(json!(1)), &json!(1)).is_valid());
        let active = attribute_equals("status", json!("active"));
        assert!(evaluate(&active, &json!({"status": "active"})).is_valid());
        assert!(!evaluate(&active, &json!({"status": "gone"})).is_valid());
        assert!(!evaluate(&active, &json!("active")).is_valid());
    }

    #[test]
    fn env_cross_field_check() {
        let confirm = equals_env("/password");
        let env = json!({"password": "hunter2"});
        assert!(evaluate_with_env(&confirm, &json!("hunter2"), &env).is_valid());
        assert!(!evaluate_with_env(&confirm, &json!("hunter3"), &env).is_valid());
        assert!(!evaluate(&confirm, &json!("hunter2")).is_valid());
    }

    #[test]
    fn optional_accepts_null_or_rule() {
        let c = optional(is_string());
        assert_eq!(c.name(), "optional");
        assert!(evaluate(&c, &json!(null)).is_valid());
        assert!(evaluate(&c, &json!("x")).is_valid());
        let result = evaluate(&c, &json!(3));
        assert_eq!(result.condition_names(), vec!["optional", "null", "string"]);
    }
}

//! # Condition Combinators
//!
//! Algebraic operators building compound conditions:
//!
//! | combinator | holds when | evaluation |
//! |---|---|---|
//! | [`all`] | every child holds | all children, violations unioned |
//! | [`any_of`] | one child holds | stops at the first success |
//! | [`not`] | the child fails | child once |
//! | [`at_least`] | `n` children hold | stops once `n` are reached |
//! | [`each`] | every array element holds | every element |
//!
//! Violations are always reported in the order children were supplied.
//! `all` deliberately does not short-circuit: one evaluation surfaces every
//! failing rule.

use serde_json::Value;

use crate::condition::{Condition, ConditionKind, Evaluate, Rule};
use crate::error::ConfigurationError;
use crate::path::Context;
use crate::result::{ValidationResult, Violation};

/// Default name of the AND combinator.
pub const ALL: &str = "all";
/// Default name of the OR combinator.
pub const ANY: &str = "any";
/// Default name of the AT_LEAST_N combinator.
pub const AT_LEAST: &str = "at-least";
/// Default name of the element-wise combinator.
pub const EACH: &str = "each";

fn collect_children<I, R>(combinator: &str, children: I) -> Result<Vec<Rule>, ConfigurationError>
where
    I: IntoIterator<Item = R>,
    R: Into<Rule>,
{
    let children: Vec<Rule> = children.into_iter().map(Into::into).collect();
    if children.is_empty() {
        return Err(ConfigurationError::EmptyCombinator {
            combinator: combinator.to_string(),
        });
    }
    Ok(children)
}

/// AND: every child must hold.
///
/// # Errors
///
/// Returns [`ConfigurationError::EmptyCombinator`] without children.
pub fn all<I, R>(children: I) -> Result<Condition, ConfigurationError>
where
    I: IntoIterator<Item = R>,
    R: Into<Rule>,
{
    let children = collect_children(ALL, children)?;
    Ok(Condition::from_kind(ALL, ConditionKind::All(children)))
}

/// OR: at least one child must hold.
///
/// When every alternative fails the result starts with one summary
/// violation under this condition's name, followed by each alternative's
/// own violations tagged with its index.
///
/// # Errors
///
/// Returns [`ConfigurationError::EmptyCombinator`] without children.
pub fn any_of<I, R>(children: I) -> Result<Condition, ConfigurationError>
where
    I: IntoIterator<Item = R>,
    R: Into<Rule>,
{
    let children = collect_children(ANY, children)?;
    Ok(Condition::from_kind(ANY, ConditionKind::Any(children)))
}

/// NOT: holds exactly when `child` fails.
///
/// When `child` holds, reports a single violation named `not(<child>)`.
pub fn not(child: impl Into<Rule>) -> Condition {
    let child = child.into();
    let name = format!("not({})", child.name());
    Condition::from_kind(name, ConditionKind::Not(Box::new(child)))
}

/// AT_LEAST_N: at least `required` of `children` must hold.
///
/// # Errors
///
/// Returns [`ConfigurationError::EmptyCombinator`] without children and
/// [`ConfigurationError::AtLeastOutOfRange`] unless
/// `1 <= required <= children.len()`.
pub fn at_least<I, R>(required: usize, children: I) -> Result<Condition, ConfigurationError>
where
    I: IntoIterator<Item = R>,
    R: Into<Rule>,
{
    let children = collect_children(AT_LEAST, children)?;
    if required == 0 || required > children.len() {
        return Err(ConfigurationError::AtLeastOutOfRange {
            required,
            available: children.len(),
        });
    }
    Ok(Condition::from_kind(
        AT_LEAST,
        ConditionKind::AtLeast { required, children },
    ))
}

/// Every element of an array must satisfy `child`.
///
/// Elements are evaluated with their index appended to the path. A value
/// that is not an array yields one `array` violation.
pub fn each(child: impl Into<Rule>) -> Condition {
    Condition::from_kind(EACH, ConditionKind::Each(Box::new(child.into())))
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

pub(crate) fn evaluate_all(children: &[Rule], value: &Value, ctx: &Context<'_>) -> ValidationResult {
    let mut result = ValidationResult::valid();
    for child in children {
        result.merge(child.evaluate_in(value, ctx));
    }
    result
}

pub(crate) fn evaluate_any(
    condition: &Condition,
    children: &[Rule],
    value: &Value,
    ctx: &Context<'_>,
) -> ValidationResult {
    let mut diagnostics = Vec::with_capacity(children.len());
    for (index, child) in children.iter().enumerate() {
        let mut outcome = child.evaluate_in(value, ctx);
        if outcome.is_valid() {
            return ValidationResult::valid();
        }
        outcome.tag_alternative(index);
        diagnostics.push(outcome);
    }

    let mut result = ValidationResult::single(condition.violation(value, ctx, || {
        let names: Vec<&str> = children.iter().map(Rule::name).collect();
        format!(
            "none of the {} alternatives matched ({})",
            children.len(),
            names.join(" | ")
        )
    }));
    for outcome in diagnostics {
        result.merge(outcome);
    }
    result
}

pub(crate) fn evaluate_not(
    condition: &Condition,
    child: &Rule,
    value: &Value,
    ctx: &Context<'_>,
) -> ValidationResult {
    if !child.test(value, ctx) {
        return ValidationResult::valid();
    }
    ValidationResult::single(condition.violation(value, ctx, || {
        format!("value {value} must not satisfy `{}`", child.name())
    }))
}

pub(crate) fn evaluate_at_least(
    condition: &Condition,
    required: usize,
    children: &[Rule],
    value: &Value,
    ctx: &Context<'_>,
) -> ValidationResult {
    let mut achieved = 0;
    for child in children {
        if child.test(value, ctx) {
            achieved += 1;
            if achieved >= required {
                return ValidationResult::valid();
            }
        }
    }
    ValidationResult::single(condition.violation(value, ctx, || {
        format!(
            "{achieved} of {} conditions satisfied, at least {required} required",
            children.len()
        )
    }))
}

pub(crate) fn evaluate_each(child: &Rule, value: &Value, ctx: &Context<'_>) -> ValidationResult {
    let Some(items) = value.as_array() else {
        return ValidationResult::single(Violation::type_mismatch(ctx.path().clone(), "array", value));
    };
    let mut result = ValidationResult::valid();
    for (index, item) in items.iter().enumerate() {
        result.merge(child.evaluate_in(item, &ctx.child(index)));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{condition, evaluate};
    use serde_json::json;

    fn named(name: &'static str, pass: bool) -> Condition {
        condition(name, move |_, _| pass).unwrap()
    }

    fn gt(limit: i64) -> Condition {
        condition(format!("gt{limit}"), move |v, _| v.as_i64().is_some_and(|n| n > limit)).unwrap()
    }

    #[test]
    fn all_reports_every_failing_child_in_declared_order() {
        let c = all([named("a", false), named("b", true), named("c", false)]).unwrap();
        let result = evaluate(&c, &json!(1));
        assert_eq!(result.condition_names(), vec!["a", "c"]);
    }

    #[test]
    fn all_passes_when_every_child_passes() {
        let c = all([named("a", true), named("b", true)]).unwrap();
        assert!(evaluate(&c, &json!(null)).is_valid());
    }

    #[test]
    fn empty_combinators_are_rejected() {
        let none: Vec<Condition> = Vec::new();
        assert!(matches!(
            all(none.clone()),
            Err(ConfigurationError::EmptyCombinator { .. })
        ));
        assert!(any_of(none.clone()).is_err());
        assert!(at_least(1, none).is_err());
    }

    #[test]
    fn any_succeeds_on_one_alternative() {
        let c = any_of([gt(10), gt(0)]).unwrap();
        assert!(evaluate(&c, &json!(5)).is_valid());
    }

    #[test]
    fn any_failure_aggregates_tagged_alternatives() {
        let c = any_of([gt(10), gt(20)]).unwrap();
        let result = evaluate(&c, &json!(5));
        assert_eq!(result.condition_names(), vec!["any", "gt10", "gt20"]);
        assert!(result.violations()[0].alternatives.is_empty());
        assert_eq!(result.violations()[1].alternatives, vec![0]);
        assert_eq!(result.violations()[2].alternatives, vec![1]);
        assert!(result.violations()[0].message.contains("none of the 2 alternatives"));
    }

    #[test]
    fn any_message_can_be_replaced() {
        let c = any_of([gt(10), gt(20)])
            .unwrap()
            .with_message("{value} is too small")
            .unwrap();
        assert_eq!(evaluate(&c, &json!(1)).violations()[0].message, "1 is too small");
    }

    #[test]
    fn not_inverts_and_names_the_negated_condition() {
        let c = not(gt(0));
        assert!(evaluate(&c, &json!(-3)).is_valid());
        let result = evaluate(&c, &json!(3));
        assert_eq!(result.condition_names(), vec!["not(gt0)"]);
    }

    #[test]
    fn double_negation_preserves_validity() {
        let c = not(not(gt(0)));
        assert!(evaluate(&c, &json!(1)).is_valid());
        assert!(!evaluate(&c, &json!(-1)).is_valid());
    }

    #[test]
    fn at_least_reports_achieved_vs_required() {
        let c = at_least(2, [gt(0), gt(10), gt(20)]).unwrap();
        assert!(evaluate(&c, &json!(15)).is_valid());
        let result = evaluate(&c, &json!(5));
        assert_eq!(result.condition_names(), vec!["at-least"]);
        assert_eq!(
            result.violations()[0].message,
            "1 of 3 conditions satisfied, at least 2 required"
        );
    }

    #[test]
    fn at_least_bounds_are_checked() {
        assert!(matches!(
            at_least(0, [gt(0)]),
            Err(ConfigurationError::AtLeastOutOfRange { required: 0, available: 1 })
        ));
        assert!(matches!(
            at_least(3, [gt(0), gt(1)]),
            Err(ConfigurationError::AtLeastOutOfRange { required: 3, available: 2 })
        ));
    }

    #[test]
    fn each_extends_path_with_element_index() {
        let c = each(gt(0));
        let result = evaluate(&c, &json!([1, -1, 2, 0]));
        let paths: Vec<String> = result.violations().iter().map(|v| v.path.to_string()).collect();
        assert_eq!(paths, vec!["[1]", "[3]"]);
    }

    #[test]
    fn each_rejects_non_arrays() {
        let result = evaluate(&each(gt(0)), &json!({"a": 1}));
        assert_eq!(result.condition_names(), vec!["array"]);
    }
}

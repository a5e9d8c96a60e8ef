//! # Error Types
//!
//! The engine separates two failure tiers:
//!
//! - **Contract violations** are expected outcomes. `evaluate` reports them
//!   as a [`ValidationResult`](crate::ValidationResult) and never as an `Err`.
//!   Only the contract wrapper and [`Guarded`](crate::Guarded) escalate a
//!   failed check into a [`ContractViolation`], because at a call boundary the
//!   caller must not continue with invalid data.
//! - **Configuration errors** are programmer mistakes in a definition (an
//!   empty combinator, a malformed signature declaration). They surface from
//!   constructors as [`ConfigurationError`].
//!
//! Callers tell the tiers apart by type and variant, never by message text.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::result::ValidationResult;

/// A malformed condition, schema, signature or contract definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A condition or schema was given an empty name.
    #[error("condition name must not be empty")]
    EmptyName,

    /// A combinator was constructed without children.
    #[error("combinator `{combinator}` requires at least one child rule")]
    EmptyCombinator {
        /// Name of the combinator (`all`, `any`, `at-least`).
        combinator: String,
    },

    /// `at_least(n, ..)` with `n` outside `1..=children`.
    #[error("at_least requires between 1 and {available} satisfied children, got {required}")]
    AtLeastOutOfRange {
        /// Requested number of satisfied children.
        required: usize,
        /// Number of children supplied.
        available: usize,
    },

    /// A message template could not be parsed.
    #[error("invalid message template {template:?}: {reason}")]
    InvalidTemplate {
        /// The template source text.
        template: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A regular expression given to `matches` failed to compile.
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The pattern source text.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// A schema entry has neither a condition nor a nested schema.
    #[error("schema entry `{key}` has no condition or nested schema")]
    MissingRule {
        /// The entry key.
        key: String,
    },

    /// Two schema entries share a key.
    #[error("schema declares key `{key}` more than once")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },

    /// A schema mixes named keys and positional indices.
    #[error("schema mixes named keys and positional indices")]
    MixedKeys,

    /// Positional entries must be declared as `0, 1, 2, ..` in order.
    #[error("positional entry declared at index {found}, expected index {expected}")]
    PositionOutOfOrder {
        /// Index the entry should have had.
        expected: usize,
        /// Index it was declared with.
        found: usize,
    },

    /// A variadic entry was followed by further entries.
    #[error("variadic entry `{key}` must be the last entry")]
    VariadicNotLast {
        /// The variadic entry key.
        key: String,
    },

    /// Variadic tails only exist for positional schemas.
    #[error("named entry `{key}` cannot be variadic")]
    VariadicInKeyedSchema {
        /// The offending key.
        key: String,
    },

    /// A parameter declaration could not be understood.
    #[error("malformed signature {declaration:?}: {reason}")]
    MalformedSignature {
        /// The declaration text (or a rendering of builder input).
        declaration: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A parameter annotation names a parameter the function does not declare.
    #[error("function `{function}` has no parameter named `{parameter}`")]
    UnknownParameter {
        /// Contract name of the function.
        function: String,
        /// The annotated parameter name.
        parameter: String,
    },

    /// Parameter annotations were combined with an explicit argument rule.
    #[error("function `{function}` mixes parameter annotations with an explicit argument rule")]
    AnnotationsWithExplicitRule {
        /// Contract name of the function.
        function: String,
    },
}

impl ConfigurationError {
    pub(crate) fn malformed_signature(declaration: &str, reason: impl Into<String>) -> Self {
        Self::MalformedSignature {
            declaration: declaration.to_string(),
            reason: reason.into(),
        }
    }
}

/// Which check of a contract failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Argument check before the wrapped function runs.
    Precondition,
    /// Return-value check after the wrapped function returned.
    Postcondition,
    /// Invariant check on a guarded value.
    Invariant,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Precondition => write!(f, "precondition"),
            Self::Postcondition => write!(f, "postcondition"),
            Self::Invariant => write!(f, "invariant"),
        }
    }
}

/// A contract check failed at a call boundary.
///
/// Carries the full [`ValidationResult`] so the caller can render every
/// violation, not only the first.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("contract `{function}` violated ({phase}):\n{result}")]
pub struct ContractViolation {
    /// Contract name of the function or guarded value.
    pub function: String,
    /// The check that failed.
    pub phase: Phase,
    /// Every violation found by the check. Never valid.
    pub result: ValidationResult,
}

impl ContractViolation {
    /// The violations that caused the rejection.
    pub fn violations(&self) -> &[crate::Violation] {
        self.result.violations()
    }
}

/// Outcome of a failed contract-wrapped call.
///
/// The wrapped function's own error is forwarded untouched in
/// [`CallError::Function`]; the wrapper's own rejections arrive in
/// [`CallError::Contract`].
#[derive(Error, Debug)]
pub enum CallError<E> {
    /// A precondition or postcondition was not honored.
    #[error(transparent)]
    Contract(#[from] ContractViolation),

    /// The wrapped function ran and returned its own error.
    #[error("{0}")]
    Function(E),
}

impl<E> CallError<E> {
    /// The contract violation, if the wrapper rejected the call.
    pub fn contract(&self) -> Option<&ContractViolation> {
        match self {
            Self::Contract(violation) => Some(violation),
            Self::Function(_) => None,
        }
    }

    /// The wrapped function's error, if it ran and failed.
    pub fn into_function_error(self) -> Option<E> {
        match self {
            Self::Function(err) => Some(err),
            Self::Contract(_) => None,
        }
    }
}

/// Umbrella error for code that builds and enforces contracts in one place.
#[derive(Error, Debug)]
pub enum AgreeError {
    /// A definition was malformed.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A contract check failed.
    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_display_is_lowercase() {
        assert_eq!(Phase::Precondition.to_string(), "precondition");
        assert_eq!(Phase::Postcondition.to_string(), "postcondition");
        assert_eq!(Phase::Invariant.to_string(), "invariant");
    }

    #[test]
    fn call_error_exposes_contract_violation() {
        let violation = ContractViolation {
            function: "users::create".to_string(),
            phase: Phase::Precondition,
            result: ValidationResult::valid(),
        };
        let err: CallError<std::io::Error> = violation.clone().into();
        assert_eq!(err.contract(), Some(&violation));
        assert!(err.into_function_error().is_none());
    }

    #[test]
    fn configuration_error_converts_into_agree_error() {
        let err: AgreeError = ConfigurationError::MixedKeys.into();
        assert!(matches!(err, AgreeError::Configuration(ConfigurationError::MixedKeys)));
        assert!(err.to_string().contains("mixes named keys"));
    }
}

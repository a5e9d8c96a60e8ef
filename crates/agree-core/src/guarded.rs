//! # Guarded Values
//!
//! A [`Guarded`] value carries an invariant that holds after construction
//! and after every [`update`](Guarded::update). An update that breaks the
//! invariant is rolled back, so the guarded value is never observable in an
//! invalid state.

use std::ops::Deref;

use serde::Serialize;

use crate::condition::Rule;
use crate::contract::evaluate_serialized;
use crate::error::{ContractViolation, Phase};
use crate::result::ValidationResult;

/// A value with an invariant re-checked on every mutation.
#[derive(Debug, Clone)]
pub struct Guarded<T> {
    name: String,
    value: T,
    invariant: Rule,
}

impl<T: Serialize + Clone> Guarded<T> {
    /// Guard `value` with `invariant`.
    ///
    /// # Errors
    ///
    /// Returns a [`Phase::Invariant`] violation if `value` does not satisfy
    /// the invariant.
    pub fn new(name: impl Into<String>, value: T, invariant: impl Into<Rule>) -> Result<Self, ContractViolation> {
        let guarded = Self {
            name: name.into(),
            value,
            invariant: invariant.into(),
        };
        guarded.enforce(guarded.check())?;
        Ok(guarded)
    }

    /// The current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// The invariant.
    pub fn invariant(&self) -> &Rule {
        &self.invariant
    }

    /// Evaluate the invariant against the current value.
    pub fn check(&self) -> ValidationResult {
        evaluate_serialized(&self.invariant, &self.value)
    }

    /// Apply `mutate`, then re-check the invariant.
    ///
    /// # Errors
    ///
    /// Returns a [`Phase::Invariant`] violation when the mutated value breaks
    /// the invariant. The previous value is restored first.
    pub fn update<F>(&mut self, mutate: F) -> Result<(), ContractViolation>
    where
        F: FnOnce(&mut T),
    {
        let previous = self.value.clone();
        mutate(&mut self.value);
        let result = self.check();
        if !result.is_valid() {
            self.value = previous;
        }
        self.enforce(result)
    }

    /// Give up the guard.
    pub fn into_inner(self) -> T {
        self.value
    }

    fn enforce(&self, result: ValidationResult) -> Result<(), ContractViolation> {
        if result.is_valid() {
            return Ok(());
        }
        Err(ContractViolation {
            function: self.name.clone(),
            phase: Phase::Invariant,
            result,
        })
    }
}

impl<T> Deref for Guarded<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

//! # Contract Wrapper
//!
//! Wraps a function with call-boundary checks. Every call follows
//!
//! ```text
//! Invoke → Pre-check → (Execute | Reject) → Post-check → Return | Reject
//! ```
//!
//! - The pre-check uses the explicit argument rule when one was given, else
//!   the positional schema derived from the function's [`Signature`] and
//!   parameter annotations, else nothing.
//! - A failed pre-check rejects the call with a [`ContractViolation`] in
//!   phase [`Phase::Precondition`]; the function is never invoked.
//! - The function's own `Err` is forwarded as [`CallError::Function`]
//!   untouched.
//! - The optional return rule sees the output serialized to JSON. A failure
//!   rejects the call in phase [`Phase::Postcondition`] although the
//!   function already ran.
//! - [`Contract::call_async`] runs the pre-check when called and hands back
//!   the future only for valid arguments.
//!
//! Wrapped functions receive their arguments as a JSON argument list, the
//! same representation the checks see.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::condition::{Evaluate, Rule};
use crate::error::{CallError, ConfigurationError, ContractViolation, Phase};
use crate::introspection::{describe_parameters, positional_schema, FunctionId, ParameterDescriptor, Signature};
use crate::observe::{ContractEvent, ContractObserver};
use crate::path::{Context, Path};
use crate::result::{ValidationResult, Violation};
use crate::schema::Schema;

/// Condition name reported when a checked value cannot be serialized.
pub const SERIALIZABLE: &str = "serializable";

/// Where the argument check comes from.
#[derive(Debug, Clone, Default)]
pub enum ArgsSpec {
    /// Derive a positional schema from the signature and annotations.
    #[default]
    Auto,
    /// Check the argument list with this rule.
    Explicit(Rule),
}

/// Declarative contract definition.
#[derive(Debug, Clone)]
pub struct ContractSpec {
    /// Argument check.
    pub args: ArgsSpec,
    /// Return-value check.
    pub returns: Option<Rule>,
    /// Parameter metadata used by [`ArgsSpec::Auto`].
    pub signature: Signature,
    /// Per-parameter rules used by [`ArgsSpec::Auto`].
    pub annotations: Vec<(String, Rule)>,
}

impl Default for ContractSpec {
    fn default() -> Self {
        Self {
            args: ArgsSpec::Auto,
            returns: None,
            signature: Signature::Dynamic,
            annotations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
enum Precheck {
    None,
    Positional(Schema),
    WholeArguments(Rule),
}

/// A function wrapped with argument and return-value checks.
pub struct Contract<F> {
    name: String,
    function: F,
    precheck: Precheck,
    returns: Option<Rule>,
    descriptors: Arc<[ParameterDescriptor]>,
    observer: Option<Arc<dyn ContractObserver>>,
}

impl<F> fmt::Debug for Contract<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contract")
            .field("name", &self.name)
            .field("precheck", &self.precheck)
            .field("returns", &self.returns)
            .field("descriptors", &self.descriptors)
            .finish_non_exhaustive()
    }
}

/// Wrap `function` under `name` with the checks described by `spec`.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] for an empty name, a malformed
/// signature, annotations naming undeclared parameters, or annotations
/// combined with an explicit argument rule.
pub fn contract<F: 'static>(
    name: impl Into<String>,
    function: F,
    spec: ContractSpec,
) -> Result<Contract<F>, ConfigurationError> {
    let name = name.into();
    if name.trim().is_empty() {
        return Err(ConfigurationError::EmptyName);
    }
    let id = FunctionId::of::<F>(name.as_str());
    let descriptors = describe_parameters(&id, &spec.signature)?;

    let precheck = match spec.args {
        ArgsSpec::Explicit(_) if !spec.annotations.is_empty() => {
            return Err(ConfigurationError::AnnotationsWithExplicitRule { function: name });
        }
        ArgsSpec::Explicit(Rule::Node(schema)) if schema.is_positional() => Precheck::Positional(schema),
        ArgsSpec::Explicit(rule) => Precheck::WholeArguments(rule),
        ArgsSpec::Auto => match positional_schema(&name, &descriptors, &spec.annotations)? {
            Some(schema) => Precheck::Positional(schema),
            None => Precheck::None,
        },
    };

    Ok(Contract {
        name,
        function,
        precheck,
        returns: spec.returns,
        descriptors,
        observer: None,
    })
}

impl<F: 'static> Contract<F> {
    /// Start a builder for wrapping `function` under `name`.
    pub fn builder(name: impl Into<String>, function: F) -> ContractBuilder<F> {
        ContractBuilder {
            name: name.into(),
            function,
            spec: ContractSpec::default(),
            observer: None,
        }
    }
}

impl<F> Contract<F> {
    /// Attach an observer receiving every call event.
    pub fn with_observer(mut self, observer: Arc<dyn ContractObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Contract name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Described parameters (empty for dynamic signatures).
    pub fn descriptors(&self) -> &[ParameterDescriptor] {
        &self.descriptors
    }

    /// The rule applied to the argument list, if any.
    pub fn precondition(&self) -> Option<Rule> {
        match &self.precheck {
            Precheck::None => None,
            Precheck::Positional(schema) => Some(Rule::Node(schema.clone())),
            Precheck::WholeArguments(rule) => Some(rule.clone()),
        }
    }

    /// The rule applied to the return value, if any.
    pub fn postcondition(&self) -> Option<&Rule> {
        self.returns.as_ref()
    }

    /// The wrapped function.
    pub fn inner(&self) -> &F {
        &self.function
    }

    fn notify(&self, event: ContractEvent<'_>) {
        if let Some(observer) = &self.observer {
            observer.on_event(&event);
        }
    }

    fn settle(&self, phase: Phase, result: ValidationResult) -> Result<(), ContractViolation> {
        self.notify(ContractEvent::Checked {
            function: &self.name,
            phase,
            result: &result,
        });
        if result.is_valid() {
            return Ok(());
        }
        let violation = ContractViolation {
            function: self.name.clone(),
            phase,
            result,
        };
        self.notify(ContractEvent::Rejected {
            violation: &violation,
        });
        Err(violation)
    }

    /// Run the pre-check alone.
    ///
    /// # Errors
    ///
    /// Returns a [`Phase::Precondition`] violation when the arguments do not
    /// satisfy the argument rule.
    pub fn check_arguments(&self, args: &[Value]) -> Result<(), ContractViolation> {
        let result = match &self.precheck {
            Precheck::None => return Ok(()),
            Precheck::Positional(schema) => schema.evaluate_positional(args, &Context::root()),
            Precheck::WholeArguments(rule) => rule.evaluate_in(&Value::Array(args.to_vec()), &Context::root()),
        };
        self.settle(Phase::Precondition, result)
    }

    /// Run the post-check alone.
    ///
    /// # Errors
    ///
    /// Returns a [`Phase::Postcondition`] violation when `output` does not
    /// satisfy the return rule or cannot be serialized.
    pub fn check_return<R: Serialize + ?Sized>(&self, output: &R) -> Result<(), ContractViolation> {
        let Some(rule) = &self.returns else {
            return Ok(());
        };
        self.settle(Phase::Postcondition, evaluate_serialized(rule, output))
    }

    /// Call the wrapped function with `args`.
    ///
    /// # Errors
    ///
    /// [`CallError::Contract`] when a check fails, [`CallError::Function`]
    /// when the function itself returns an error.
    pub fn call<R, E>(&self, args: &[Value]) -> Result<R, CallError<E>>
    where
        F: Fn(&[Value]) -> Result<R, E>,
        R: Serialize,
    {
        self.check_arguments(args)?;
        self.notify(ContractEvent::Entered { function: &self.name });
        let outcome = (self.function)(args);
        self.notify(ContractEvent::Exited {
            function: &self.name,
            succeeded: outcome.is_ok(),
        });
        let output = outcome.map_err(CallError::Function)?;
        self.check_return(&output)?;
        Ok(output)
    }

    /// Call a wrapped function whose return type has no JSON form.
    ///
    /// Only the pre-check applies. A contract that registered a return rule
    /// refuses the call with a [`Phase::Postcondition`] violation, without
    /// running the function, because that rule could never be checked.
    ///
    /// # Errors
    ///
    /// As [`call`](Self::call).
    pub fn call_unchecked_return<R, E>(&self, args: &[Value]) -> Result<R, CallError<E>>
    where
        F: Fn(&[Value]) -> Result<R, E>,
    {
        if self.returns.is_some() {
            let result = ValidationResult::single(Violation::new(
                Path::root(),
                SERIALIZABLE,
                "a return rule is registered, use `call` with a serializable return type",
                None,
            ));
            self.settle(Phase::Postcondition, result)?;
        }
        self.check_arguments(args)?;
        self.notify(ContractEvent::Entered { function: &self.name });
        let outcome = (self.function)(args);
        self.notify(ContractEvent::Exited {
            function: &self.name,
            succeeded: outcome.is_ok(),
        });
        outcome.map_err(CallError::Function)
    }

    /// Call an async wrapped function with `args`.
    ///
    /// The pre-check runs now, before the function's future is created, so
    /// invalid arguments are rejected without awaiting anything. The
    /// returned future runs the function and then the post-check. Dropping
    /// it drops the wrapped future without further checks.
    ///
    /// # Errors
    ///
    /// A [`Phase::Precondition`] violation when `args` fail the pre-check.
    /// The future resolves to [`CallError::Contract`] for a failed
    /// post-check and to [`CallError::Function`] for the function's own
    /// error.
    pub fn call_async<'a, Fut, R, E>(
        &'a self,
        args: Vec<Value>,
    ) -> Result<impl Future<Output = Result<R, CallError<E>>> + 'a, ContractViolation>
    where
        F: Fn(Vec<Value>) -> Fut,
        Fut: Future<Output = Result<R, E>> + 'a,
        R: Serialize + 'a,
        E: 'a,
    {
        self.check_arguments(&args)?;
        self.notify(ContractEvent::Entered { function: &self.name });
        let pending = (self.function)(args);
        Ok(async move {
            let outcome = pending.await;
            self.notify(ContractEvent::Exited {
                function: &self.name,
                succeeded: outcome.is_ok(),
            });
            let output = outcome.map_err(CallError::Function)?;
            self.check_return(&output)?;
            Ok::<R, CallError<E>>(output)
        })
    }
}

/// Evaluate `rule` against the JSON form of `value`, reporting a
/// `serializable` violation when there is none.
pub(crate) fn evaluate_serialized<T: Serialize + ?Sized>(rule: &Rule, value: &T) -> ValidationResult {
    match serde_json::to_value(value) {
        Ok(json) => rule.evaluate_in(&json, &Context::root()),
        Err(err) => ValidationResult::single(Violation::new(
            Path::root(),
            SERIALIZABLE,
            format!("value cannot be represented as JSON: {err}"),
            None,
        )),
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Fluent construction of a [`Contract`].
pub struct ContractBuilder<F> {
    name: String,
    function: F,
    spec: ContractSpec,
    observer: Option<Arc<dyn ContractObserver>>,
}

impl<F: 'static> ContractBuilder<F> {
    /// Attach parameter metadata.
    pub fn signature(mut self, signature: Signature) -> Self {
        self.spec.signature = signature;
        self
    }

    /// Check parameter `name` with `rule`.
    pub fn annotate(mut self, name: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.spec.annotations.push((name.into(), rule.into()));
        self
    }

    /// Check the whole argument list with `rule` instead of annotations.
    pub fn args(mut self, rule: impl Into<Rule>) -> Self {
        self.spec.args = ArgsSpec::Explicit(rule.into());
        self
    }

    /// Check the return value with `rule`.
    pub fn returns(mut self, rule: impl Into<Rule>) -> Self {
        self.spec.returns = Some(rule.into());
        self
    }

    /// Receive call events.
    pub fn observe(mut self, observer: Arc<dyn ContractObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the contract.
    ///
    /// # Errors
    ///
    /// See [`contract`].
    pub fn build(self) -> Result<Contract<F>, ConfigurationError> {
        let built = contract(self.name, self.function, self.spec)?;
        Ok(match self.observer {
            Some(observer) => built.with_observer(observer),
            None => built,
        })
    }
}

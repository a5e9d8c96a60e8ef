#![deny(missing_docs)]

//! # agree-core — Declarative Contract Evaluation
//!
//! Contracts are built from named [`Condition`]s, composed with algebraic
//! combinators ([`all`], [`any_of`], [`not`], [`at_least`], [`each`]) and
//! nested in structural [`Schema`]s. Evaluating any of them against a JSON
//! value yields a [`ValidationResult`] listing every [`Violation`] with its
//! path, condition name and message.
//!
//! On top of the evaluator sit the call-boundary pieces: the introspector
//! describes a function's parameters from an attached [`Signature`], and
//! [`contract`] wraps a function so that its arguments and return value are
//! checked on every call.
//!
//! ## Key Design Principles
//!
//! 1. **Failed checks are data.** `evaluate` returns a result, never an
//!    error, and never stops at the first failure of an AND or a schema.
//!
//! 2. **Definitions are validated once.** Malformed definitions surface as a
//!    [`ConfigurationError`] from the constructor, not during evaluation.
//!
//! 3. **Immutable, shareable trees.** Conditions and schemas are `Send +
//!    Sync` and cheap to clone; evaluation takes no locks. The only shared
//!    mutable state is the process-wide parameter descriptor cache.
//!
//! ## Crate Policy
//!
//! - No logging inside the engine. Observation is opt-in via
//!   [`ContractObserver`] ([`TracingObserver`] forwards to `tracing`).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod coerce;
pub mod combinators;
pub mod condition;
pub mod conditions;
pub mod contract;
pub mod error;
pub mod guarded;
pub mod introspection;
pub mod message;
pub mod observe;
pub mod path;
pub mod result;
pub mod schema;

// Re-export primary types for ergonomic imports.
pub use coerce::Coercion;
pub use combinators::{all, any_of, at_least, each, not};
pub use condition::{condition, evaluate, evaluate_with_env, Condition, ConditionKind, Evaluate, Rule};
pub use contract::{contract, ArgsSpec, Contract, ContractBuilder, ContractSpec};
pub use error::{AgreeError, CallError, ConfigurationError, ContractViolation, Phase};
pub use guarded::Guarded;
pub use introspection::{describe_parameters, FunctionId, ParameterDescriptor, Signature, SignatureBuilder};
pub use message::MessageTemplate;
pub use observe::{ContractEvent, ContractObserver, TracingObserver};
pub use path::{Context, Path, PathSegment};
pub use result::{ValidationResult, Violation};
pub use schema::{schema, Entry, EntryDef, Layout, Schema, SchemaBuilder, SchemaOptions};

//! # agree-testing — Test Harness Helpers
//!
//! Helpers for asserting on agree contracts from unit, integration and
//! property tests:
//!
//! - [`check`], [`assert_valid`], [`assert_invalid`], [`assert_violations`]
//!   and the [`assert_valid!`]/[`assert_invalid!`] macros;
//! - [`Recorder`], a [`ContractObserver`](agree_core::ContractObserver)
//!   that keeps every call event for inspection;
//! - [`strategies`], proptest generators for JSON candidates;
//! - [`init_tracing`], a `tracing` subscriber wired to the test writer.

pub mod assertions;
pub mod logging;
pub mod recorder;
pub mod strategies;

pub use assertions::{assert_invalid, assert_valid, assert_violations, check, NamedRule, ValidationFailure};
pub use logging::init_tracing;
pub use recorder::{RecordedEvent, Recorder};

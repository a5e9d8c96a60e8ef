//! # Contract Observation
//!
//! Contracts emit a [`ContractEvent`] at every step of a call to an
//! optional [`ContractObserver`]. The engine itself never logs;
//! [`TracingObserver`] forwards events to `tracing` for callers that want
//! call-boundary diagnostics in their logs.

use std::fmt;

use crate::error::{ContractViolation, Phase};
use crate::result::ValidationResult;

/// One step of a contract-wrapped call.
#[derive(Debug, Clone, Copy)]
pub enum ContractEvent<'a> {
    /// A precondition, postcondition or invariant was evaluated.
    Checked {
        /// Contract name.
        function: &'a str,
        /// Which check ran.
        phase: Phase,
        /// Its outcome.
        result: &'a ValidationResult,
    },
    /// The wrapped function is about to run.
    Entered {
        /// Contract name.
        function: &'a str,
    },
    /// The wrapped function returned.
    Exited {
        /// Contract name.
        function: &'a str,
        /// Whether it returned `Ok`.
        succeeded: bool,
    },
    /// The call was rejected with a contract violation.
    Rejected {
        /// The violation returned to the caller.
        violation: &'a ContractViolation,
    },
}

impl ContractEvent<'_> {
    /// Short event label: `checked`, `entered`, `exited` or `rejected`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Checked { .. } => "checked",
            Self::Entered { .. } => "entered",
            Self::Exited { .. } => "exited",
            Self::Rejected { .. } => "rejected",
        }
    }

    /// Contract name the event belongs to.
    pub fn function(&self) -> &str {
        match self {
            Self::Checked { function, .. }
            | Self::Entered { function }
            | Self::Exited { function, .. } => function,
            Self::Rejected { violation } => &violation.function,
        }
    }
}

/// Receives the events of contract-wrapped calls.
///
/// Observers are shared between threads and must not panic.
pub trait ContractObserver: Send + Sync + fmt::Debug {
    /// Called synchronously for every event.
    fn on_event(&self, event: &ContractEvent<'_>);
}

/// Forwards contract events to `tracing`.
///
/// Checks and body entry/exit are logged at `DEBUG`, rejections at `WARN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ContractObserver for TracingObserver {
    fn on_event(&self, event: &ContractEvent<'_>) {
        match *event {
            ContractEvent::Checked {
                function,
                phase,
                result,
            } => {
                tracing::debug!(
                    function,
                    %phase,
                    valid = result.is_valid(),
                    violations = result.len(),
                    "contract check evaluated"
                );
            }
            ContractEvent::Entered { function } => {
                tracing::debug!(function, "entering contract-wrapped function");
            }
            ContractEvent::Exited {
                function,
                succeeded,
            } => {
                tracing::debug!(function, succeeded, "contract-wrapped function returned");
            }
            ContractEvent::Rejected { violation } => {
                tracing::warn!(
                    function = %violation.function,
                    phase = %violation.phase,
                    violations = violation.result.len(),
                    conditions = ?violation.result.condition_names(),
                    "contract violated"
                );
            }
        }
    }
}

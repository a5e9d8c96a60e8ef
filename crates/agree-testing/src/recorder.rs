//! Observer that records contract events for later assertions.

use agree_core::{ContractEvent, ContractObserver, Phase};
use parking_lot::Mutex;

/// Owned copy of one [`ContractEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    /// `checked`, `entered`, `exited` or `rejected`.
    pub kind: &'static str,
    /// Contract name.
    pub function: String,
    /// Phase for `checked` and `rejected` events.
    pub phase: Option<Phase>,
    /// Check outcome for `checked`, body outcome for `exited`.
    pub ok: Option<bool>,
    /// Condition names for `checked` and `rejected` events.
    pub conditions: Vec<String>,
}

/// Thread-safe event log. Attach with `Contract::builder(..).observe(..)`.
#[derive(Debug, Default)]
pub struct Recorder {
    events: Mutex<Vec<RecordedEvent>>,
}

impl Recorder {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event so far, oldest first.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    /// Event kinds so far, oldest first.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(|e| e.kind).collect()
    }

    /// Only the rejections.
    pub fn rejections(&self) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.kind == "rejected")
            .cloned()
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl ContractObserver for Recorder {
    fn on_event(&self, event: &ContractEvent<'_>) {
        let names = |result: &agree_core::ValidationResult| -> Vec<String> {
            result.condition_names().into_iter().map(String::from).collect()
        };
        let (phase, ok, conditions) = match *event {
            ContractEvent::Checked { phase, result, .. } => (Some(phase), Some(result.is_valid()), names(result)),
            ContractEvent::Entered { .. } => (None, None, Vec::new()),
            ContractEvent::Exited { succeeded, .. } => (None, Some(succeeded), Vec::new()),
            ContractEvent::Rejected { violation } => (Some(violation.phase), Some(false), names(&violation.result)),
        };
        self.events.lock().push(RecordedEvent {
            kind: event.kind(),
            function: event.function().to_string(),
            phase,
            ok,
            conditions,
        });
    }
}

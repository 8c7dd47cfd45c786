//! A diagnostic sink that records what it receives.

use couchfall_core::{DiagnosticSink, StoreError};
use parking_lot::Mutex;
use std::sync::Arc;

/// Severity of a recorded diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Recovered failure.
    Warn,
    /// Unrecovered failure.
    Error,
}

/// One recorded diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Severity.
    pub level: Level,
    /// Store operation that failed.
    pub operation: String,
    /// Name of the store that failed.
    pub store: String,
    /// The failure.
    pub error: StoreError,
}

/// Records diagnostics in memory for later assertions.
///
/// Clones share the same record, so one clone can be handed to a loader
/// while the test keeps another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    entries: Arc<Mutex<Vec<Diagnostic>>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded diagnostic, in order.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    /// Recorded warnings.
    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.with_level(Level::Warn)
    }

    /// Recorded errors.
    pub fn errors(&self) -> Vec<Diagnostic> {
        self.with_level(Level::Error)
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn with_level(&self, level: Level) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.level == level)
            .cloned()
            .collect()
    }

    fn record(&self, level: Level, operation: &str, store: &str, error: &StoreError) {
        self.entries.lock().push(Diagnostic {
            level,
            operation: operation.to_string(),
            store: store.to_string(),
            error: error.clone(),
        });
    }
}

impl DiagnosticSink for RecordingSink {
    fn warn(&self, operation: &str, store: &str, error: &StoreError) {
        self.record(Level::Warn, operation, store, error);
    }

    fn error(&self, operation: &str, store: &str, error: &StoreError) {
        self.record(Level::Error, operation, store, error);
    }
}

//! Diagnostic sinks.
//!
//! Loaders never write to an output stream directly. They report
//! recovered and unrecovered failures to a [`DiagnosticSink`], which by
//! default forwards to `tracing`.

use crate::error::StoreError;
use std::sync::Arc;

/// Receives warnings and errors raised while talking to stores.
pub trait DiagnosticSink: Send + Sync {
    /// A failure that was recovered from (e.g. by falling back).
    fn warn(&self, operation: &str, store: &str, error: &StoreError);

    /// A failure nobody above will see (e.g. a replication error).
    fn error(&self, operation: &str, store: &str, error: &StoreError);
}

/// Forwards diagnostics to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, operation: &str, store: &str, error: &StoreError) {
        tracing::warn!(operation, store, error = %error, "store operation failed");
    }

    fn error(&self, operation: &str, store: &str, error: &StoreError) {
        tracing::error!(operation, store, error = %error, "store operation failed");
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &T {
    fn warn(&self, operation: &str, store: &str, error: &StoreError) {
        (**self).warn(operation, store, error);
    }

    fn error(&self, operation: &str, store: &str, error: &StoreError) {
        (**self).error(operation, store, error);
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for Arc<T> {
    fn warn(&self, operation: &str, store: &str, error: &StoreError) {
        (**self).warn(operation, store, error);
    }

    fn error(&self, operation: &str, store: &str, error: &StoreError) {
        (**self).error(operation, store, error);
    }
}

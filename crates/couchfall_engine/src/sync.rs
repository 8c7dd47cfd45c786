//! Live replication setup.

use crate::fallback::InitialLoader;
use couchfall_core::{ChangeListener, DiagnosticSink, DocumentStore, SyncChange, SyncHandle};
use std::sync::Arc;

impl<'a, D> InitialLoader<'a, D>
where
    D: DiagnosticSink + Clone + 'static,
{
    /// Starts continuous two-way replication between the local and remote
    /// stores.
    ///
    /// Exactly one change listener (`on_change`, or a no-op) and one error
    /// listener are attached. Errors go to the sink's error channel and
    /// never reach `on_change`. Returns as soon as the listeners are in
    /// place.
    pub fn start_sync(&self, on_change: Option<ChangeListener>) -> SyncHandle {
        let on_change = on_change.unwrap_or_else(no_op_listener);

        let handle = self.local.sync(self.remote, &self.config.sync_options);
        self.stats.record_sync_session();

        let sink = self.sink.clone();
        let peer = self.remote.name().to_string();
        handle
            .on_change(move |change| (*on_change)(change))
            .on_error(move |err| sink.error("sync", &peer, err));

        tracing::info!(
            session = %handle.id(),
            local = self.local.name(),
            remote = self.remote.name(),
            "live sync started"
        );
        handle
    }
}

fn no_op_listener() -> ChangeListener {
    Arc::new(|_: &SyncChange| {})
}

/// Starts live two-way replication between `local` and `remote`.
///
/// `on_change` runs for every replicated batch. Replication errors are
/// logged at error level and do not stop the session.
pub fn initialize_db_sync(
    local: &dyn DocumentStore,
    remote: &dyn DocumentStore,
    on_change: Option<ChangeListener>,
) -> SyncHandle {
    InitialLoader::new(local, remote).start_sync(on_change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use couchfall_core::{Document, MockStore, StoreError, SyncDirection, SyncOptions};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct ErrorLog(Arc<Mutex<Vec<(String, StoreError)>>>);

    impl DiagnosticSink for ErrorLog {
        fn warn(&self, _operation: &str, _store: &str, _error: &StoreError) {}

        fn error(&self, operation: &str, _store: &str, error: &StoreError) {
            self.0.lock().push((operation.to_string(), error.clone()));
        }
    }

    #[test]
    fn sync_is_started_once_with_live() {
        let local = MockStore::new("local");
        let remote = MockStore::new("remote");

        let handle = initialize_db_sync(&local, &remote, None);
        let calls = local.sync_calls();

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].peer, "remote");
        assert!(calls[0].options.live);
        assert!(calls[0].handle.same_session(&handle));
        assert!(remote.sync_calls().is_empty());
        assert_eq!(local.read_calls() + remote.read_calls(), 0);
    }

    #[test]
    fn exactly_one_listener_of_each_kind() {
        let local = MockStore::new("local");
        let remote = MockStore::new("remote");

        let handle = initialize_db_sync(&local, &remote, None);

        assert_eq!(handle.change_listener_count(), 1);
        assert_eq!(handle.error_listener_count(), 1);
        assert_eq!(handle.events_emitted(), 0);
    }

    #[test]
    fn change_reaches_callback_and_error_does_not() {
        let local = MockStore::new("local");
        let remote = MockStore::new("remote");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = ErrorLog::default();

        let recorder = Arc::clone(&seen);
        let loader = InitialLoader::with_sink(&local, &remote, log.clone());
        let handle = loader.start_sync(Some(Arc::new(move |change: &SyncChange| {
            recorder.lock().push(change.clone());
        })));

        let change = SyncChange::new(SyncDirection::Pull, vec![Document::new("doc1")]);
        handle.emit_change(change.clone());
        handle.emit_error(StoreError::transport_retryable("socket closed"));

        assert_eq!(*seen.lock(), vec![change]);
        let errors = log.0.lock();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "sync");
    }

    #[test]
    fn session_keeps_running_after_error() {
        let local = MockStore::new("local");
        let remote = MockStore::new("remote");
        let count = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&count);
        let handle = InitialLoader::with_sink(&local, &remote, ErrorLog::default()).start_sync(
            Some(Arc::new(move |_: &SyncChange| {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        );

        handle.emit_change(SyncChange::new(SyncDirection::Push, Vec::new()));
        handle.emit_error(StoreError::Timeout);
        handle.emit_change(SyncChange::new(SyncDirection::Pull, Vec::new()));

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn default_callback_is_a_no_op() {
        let local = MockStore::new("local");
        let remote = MockStore::new("remote");

        let handle = initialize_db_sync(&local, &remote, None);
        handle.emit_change(SyncChange::new(SyncDirection::Pull, Vec::new()));
        handle.emit_error(StoreError::Closed);

        assert_eq!(handle.events_emitted(), 2);
    }

    #[test]
    fn configured_sync_options_are_used() {
        let local = MockStore::new("local");
        let remote = MockStore::new("remote");
        let config = crate::LoaderConfig::new()
            .with_sync_options(SyncOptions::default().with_retry(true).with_batch_size(25));

        let loader = InitialLoader::new(&local, &remote).with_config(config);
        let handle = loader.start_sync(None);

        assert!(handle.options().live);
        assert!(handle.options().retry);
        assert_eq!(handle.options().batch_size, Some(25));
        assert_eq!(loader.stats().sync_sessions(), 1);
    }
}

//! Loader statistics.
//!
//! ```rust
//! use couchfall_core::{Document, MockStore, StoreError};
//! use couchfall_engine::InitialLoader;
//!
//! let local = MockStore::new("local");
//! local.insert(Document::new("doc1"));
//! let remote = MockStore::failing("remote", StoreError::Timeout);
//!
//! let loader = InitialLoader::new(&local, &remote);
//! loader.all_docs(None).unwrap();
//!
//! let stats = loader.stats().snapshot();
//! assert_eq!(stats.local_fallbacks, 1);
//! assert_eq!(stats.remote_hits, 0);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one loader.
///
/// All counters are atomic and can be read while loads are in progress.
#[derive(Debug, Default)]
pub struct LoaderStats {
    /// Loads answered by the remote store.
    remote_hits: AtomicU64,
    /// Loads answered by the local store after a remote failure.
    local_fallbacks: AtomicU64,
    /// Loads where the local store failed too.
    local_failures: AtomicU64,
    /// Reserved documents dropped from bulk listings.
    reserved_filtered: AtomicU64,
    /// Replication sessions started.
    sync_sessions: AtomicU64,
}

impl LoaderStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_remote_hit(&self) {
        self.remote_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_local_fallback(&self) {
        self.local_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_local_failure(&self) {
        self.local_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_reserved_filtered(&self, count: u64) {
        self.reserved_filtered.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_sync_session(&self) {
        self.sync_sessions.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of loads answered by the remote store.
    pub fn remote_hits(&self) -> u64 {
        self.remote_hits.load(Ordering::Relaxed)
    }

    /// Returns the number of loads answered by the local store.
    pub fn local_fallbacks(&self) -> u64 {
        self.local_fallbacks.load(Ordering::Relaxed)
    }

    /// Returns the number of loads where both stores failed.
    pub fn local_failures(&self) -> u64 {
        self.local_failures.load(Ordering::Relaxed)
    }

    /// Returns the number of reserved documents dropped from listings.
    pub fn reserved_filtered(&self) -> u64 {
        self.reserved_filtered.load(Ordering::Relaxed)
    }

    /// Returns the number of replication sessions started.
    pub fn sync_sessions(&self) -> u64 {
        self.sync_sessions.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all counters.
    pub fn snapshot(&self) -> LoaderStatsSnapshot {
        LoaderStatsSnapshot {
            remote_hits: self.remote_hits(),
            local_fallbacks: self.local_fallbacks(),
            local_failures: self.local_failures(),
            reserved_filtered: self.reserved_filtered(),
            sync_sessions: self.sync_sessions(),
        }
    }
}

/// A point-in-time copy of [`LoaderStats`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoaderStatsSnapshot {
    /// Loads answered by the remote store.
    pub remote_hits: u64,
    /// Loads answered by the local store.
    pub local_fallbacks: u64,
    /// Loads where both stores failed.
    pub local_failures: u64,
    /// Reserved documents dropped from listings.
    pub reserved_filtered: u64,
    /// Replication sessions started.
    pub sync_sessions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        assert_eq!(LoaderStats::new().snapshot(), LoaderStatsSnapshot::default());
    }

    #[test]
    fn snapshot_reflects_records() {
        let stats = LoaderStats::new();
        stats.record_remote_hit();
        stats.record_remote_hit();
        stats.record_local_fallback();
        stats.record_local_failure();
        stats.record_reserved_filtered(3);
        stats.record_sync_session();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.remote_hits, 2);
        assert_eq!(snapshot.local_fallbacks, 1);
        assert_eq!(snapshot.local_failures, 1);
        assert_eq!(snapshot.reserved_filtered, 3);
        assert_eq!(snapshot.sync_sessions, 1);
    }
}

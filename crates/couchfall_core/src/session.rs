//! Replication session handles.
//!
//! A [`SyncHandle`] is what a store hands back from
//! [`DocumentStore::sync`](crate::DocumentStore::sync). The store keeps a
//! clone and emits events into it from wherever replication runs; the
//! caller keeps another clone and registers listeners on it.
//!
//! ```rust
//! use couchfall_core::{SyncChange, SyncDirection, SyncHandle, SyncOptions};
//!
//! let handle = SyncHandle::new(SyncOptions::live());
//! handle
//!     .on_change(|change| println!("{} docs {:?}", change.docs.len(), change.direction))
//!     .on_error(|err| eprintln!("sync failed: {err}"));
//!
//! handle.emit_change(SyncChange::new(SyncDirection::Pull, Vec::new()));
//! assert_eq!(handle.events_emitted(), 1);
//! ```

use crate::document::Document;
use crate::error::StoreError;
use crate::options::SyncOptions;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Listener invoked for every change event.
pub type ChangeListener = Arc<dyn Fn(&SyncChange) + Send + Sync>;

/// Listener invoked for every error event.
pub type ErrorListener = Arc<dyn Fn(&StoreError) + Send + Sync>;

/// Which way a batch of changes travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncDirection {
    /// Local changes written to the peer.
    Push,
    /// Peer changes written locally.
    Pull,
}

/// Payload of a change event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncChange {
    /// Direction of the replicated batch.
    pub direction: SyncDirection,
    /// Documents in the batch.
    pub docs: Vec<Document>,
    /// Documents read from the source so far.
    pub docs_read: u64,
    /// Documents written to the target so far.
    pub docs_written: u64,
    /// Last processed change-feed sequence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seq: Option<String>,
}

impl SyncChange {
    /// Creates a change for a single batch.
    pub fn new(direction: SyncDirection, docs: Vec<Document>) -> Self {
        let count = docs.len() as u64;
        Self {
            direction,
            docs,
            docs_read: count,
            docs_written: count,
            last_seq: None,
        }
    }

    /// Sets the last processed sequence.
    pub fn with_last_seq(mut self, seq: impl Into<String>) -> Self {
        self.last_seq = Some(seq.into());
        self
    }
}

/// An event emitted by a replication session.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// A batch of documents was replicated.
    Change(SyncChange),
    /// The session hit an error. It keeps running.
    Error(StoreError),
}

struct SessionInner {
    id: Uuid,
    options: SyncOptions,
    change_listeners: RwLock<Vec<ChangeListener>>,
    error_listeners: RwLock<Vec<ErrorListener>>,
    events_emitted: AtomicU64,
}

/// A handle to a live replication session.
///
/// Cloning is cheap and every clone refers to the same session.
#[derive(Clone)]
pub struct SyncHandle {
    inner: Arc<SessionInner>,
}

impl SyncHandle {
    /// Creates a session handle with no listeners.
    pub fn new(options: SyncOptions) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                id: Uuid::new_v4(),
                options,
                change_listeners: RwLock::new(Vec::new()),
                error_listeners: RwLock::new(Vec::new()),
                events_emitted: AtomicU64::new(0),
            }),
        }
    }

    /// Session id.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Options the session was opened with.
    pub fn options(&self) -> &SyncOptions {
        &self.inner.options
    }

    /// Registers a change listener.
    pub fn on_change<F>(&self, listener: F) -> &Self
    where
        F: Fn(&SyncChange) + Send + Sync + 'static,
    {
        self.inner.change_listeners.write().push(Arc::new(listener));
        self
    }

    /// Registers an error listener.
    pub fn on_error<F>(&self, listener: F) -> &Self
    where
        F: Fn(&StoreError) + Send + Sync + 'static,
    {
        self.inner.error_listeners.write().push(Arc::new(listener));
        self
    }

    /// Delivers an event to the listeners registered for its kind.
    ///
    /// Listeners run on the calling thread, in registration order. The
    /// listener list is snapshotted first, so a listener may register
    /// further listeners without deadlocking.
    pub fn emit(&self, event: SyncEvent) {
        self.inner.events_emitted.fetch_add(1, Ordering::SeqCst);
        match event {
            SyncEvent::Change(change) => {
                let listeners = self.inner.change_listeners.read().clone();
                for listener in listeners {
                    (*listener)(&change);
                }
            }
            SyncEvent::Error(error) => {
                let listeners = self.inner.error_listeners.read().clone();
                for listener in listeners {
                    (*listener)(&error);
                }
            }
        }
    }

    /// Emits a change event.
    pub fn emit_change(&self, change: SyncChange) {
        self.emit(SyncEvent::Change(change));
    }

    /// Emits an error event.
    pub fn emit_error(&self, error: StoreError) {
        self.emit(SyncEvent::Error(error));
    }

    /// Number of registered change listeners.
    pub fn change_listener_count(&self) -> usize {
        self.inner.change_listeners.read().len()
    }

    /// Number of registered error listeners.
    pub fn error_listener_count(&self) -> usize {
        self.inner.error_listeners.read().len()
    }

    /// Number of events emitted so far.
    pub fn events_emitted(&self) -> u64 {
        self.inner.events_emitted.load(Ordering::SeqCst)
    }

    /// Returns true if both handles refer to the same session.
    pub fn same_session(&self, other: &SyncHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for SyncHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncHandle")
            .field("id", &self.inner.id)
            .field("options", &self.inner.options)
            .field("change_listeners", &self.change_listener_count())
            .field("error_listeners", &self.error_listener_count())
            .field("events_emitted", &self.events_emitted())
            .finish()
    }
}

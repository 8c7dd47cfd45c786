//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up local/remote store pairs
//! and common fallback scenarios.

use couchfall_core::{Document, MockStore, StoreError};

/// Name given to the local store of a [`StorePair`].
pub const LOCAL_NAME: &str = "local";

/// Name given to the remote store of a [`StorePair`].
pub const REMOTE_NAME: &str = "remote";

/// A local and a remote mock store.
#[derive(Debug)]
pub struct StorePair {
    /// The local (fallback) store.
    pub local: MockStore,
    /// The remote (primary) store.
    pub remote: MockStore,
}

impl StorePair {
    /// Creates two empty, healthy stores.
    pub fn new() -> Self {
        Self {
            local: MockStore::new(LOCAL_NAME),
            remote: MockStore::new(REMOTE_NAME),
        }
    }

    /// Creates a pair whose remote store is unreachable.
    pub fn remote_offline() -> Self {
        let pair = Self::new();
        pair.remote
            .fail_with(StoreError::transport_retryable("connection refused"));
        pair
    }

    /// Creates a pair where both stores fail.
    pub fn both_offline() -> Self {
        let pair = Self::remote_offline();
        pair.local.fail_with(StoreError::Closed);
        pair
    }

    /// Seeds both stores with the same documents.
    pub fn seed_both(&self, docs: &[Document]) {
        self.local.insert_all(docs.iter().cloned());
        self.remote.insert_all(docs.iter().cloned());
    }
}

impl Default for StorePair {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a test with a fresh healthy store pair.
///
/// # Example
///
/// ```rust
/// use couchfall_core::DocumentStore;
/// use couchfall_testkit::with_store_pair;
///
/// with_store_pair(|local, remote| {
///     assert_eq!(local.name(), "local");
///     assert_eq!(remote.name(), "remote");
/// });
/// ```
pub fn with_store_pair<F, R>(f: F) -> R
where
    F: FnOnce(&MockStore, &MockStore) -> R,
{
    let pair = StorePair::new();
    f(&pair.local, &pair.remote)
}

/// Creates a bare document.
pub fn doc(id: &str) -> Document {
    Document::new(id)
}

/// Creates bare documents for each id.
pub fn docs(ids: &[&str]) -> Vec<Document> {
    ids.iter().map(|id| doc(id)).collect()
}

/// Returns the ids of `docs` in order.
pub fn ids(docs: &[Document]) -> Vec<String> {
    docs.iter().map(|doc| doc.id.clone()).collect()
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// A note document as an application would store it.
    pub fn note(id: &str, title: &str) -> Document {
        Document::new(id)
            .with_rev("1-967a00dff5e02add41819138abb3284d")
            .with_field("type", "note")
            .with_field("title", title)
    }

    /// A design document.
    pub fn design_doc(name: &str) -> Document {
        Document::new(format!("_design/{name}"))
            .with_rev("1-0000")
            .with_field("language", "javascript")
            .with_field("views", serde_json::json!({}))
    }

    /// A database holding `count` notes plus one design and one local
    /// document.
    pub fn notebook(count: usize) -> Vec<Document> {
        let mut docs = vec![design_doc("notes"), Document::new("_local/checkpoint")];
        docs.extend((0..count).map(|n| note(&format!("note-{n:04}"), &format!("Note {n}"))));
        docs
    }
}

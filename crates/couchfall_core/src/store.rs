//! Document store capability.

use crate::document::Document;
use crate::error::StoreResult;
use crate::options::{AllDocsOptions, FindRequest, SyncOptions};
use crate::session::SyncHandle;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A document database the loaders can read from and replicate with.
///
/// This trait abstracts the database client, allowing for different
/// implementations (an HTTP CouchDB client, an embedded store, a mock for
/// testing, etc.). Timeouts, credentials and transport settings belong to
/// the implementation.
pub trait DocumentStore: Send + Sync {
    /// Short name used in diagnostics (e.g. the database URL or path).
    fn name(&self) -> &str;

    /// Lists documents in id order.
    fn list_all(&self, options: &AllDocsOptions) -> StoreResult<AllDocsResponse>;

    /// Runs a selector query.
    fn query(&self, request: &FindRequest) -> StoreResult<FindResponse>;

    /// Fetches a document by id.
    ///
    /// A missing document is an error, not `Ok(None)`.
    fn get(&self, id: &str) -> StoreResult<Document>;

    /// Starts replication between this store and `peer`.
    ///
    /// Returns without waiting for replication. Failures after this point
    /// are reported through the handle's error listeners.
    fn sync(&self, peer: &dyn DocumentStore, options: &SyncOptions) -> SyncHandle;
}

/// One row of a bulk listing.
///
/// Rows for keys the store could not resolve (a `keys` listing asking for
/// a missing id) carry `error` and no `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllDocsRow {
    /// Document id, empty on error rows.
    #[serde(default)]
    pub id: String,
    /// Row key (the id for `_all_docs`).
    pub key: String,
    /// Row value (usually `{"rev": ...}`).
    #[serde(default)]
    pub value: Value,
    /// Full document, present when `include_docs` was set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Document>,
    /// Lookup error reported for this row (e.g. `not_found`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AllDocsRow {
    /// Creates a row carrying a full document.
    pub fn with_doc(doc: Document) -> Self {
        let value = match &doc.rev {
            Some(rev) => serde_json::json!({ "rev": rev }),
            None => Value::Null,
        };
        Self {
            id: doc.id.clone(),
            key: doc.id.clone(),
            value,
            doc: Some(doc),
            error: None,
        }
    }
}

/// Result of a bulk listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AllDocsResponse {
    /// Number of documents in the database.
    #[serde(default)]
    pub total_rows: u64,
    /// Offset of the first row.
    #[serde(default)]
    pub offset: u64,
    /// Returned rows.
    pub rows: Vec<AllDocsRow>,
}

impl AllDocsResponse {
    /// Builds a response whose rows carry the given documents.
    pub fn from_docs(docs: impl IntoIterator<Item = Document>) -> Self {
        let rows: Vec<AllDocsRow> = docs.into_iter().map(AllDocsRow::with_doc).collect();
        Self {
            total_rows: rows.len() as u64,
            offset: 0,
            rows,
        }
    }

    /// Consumes the response and yields the embedded documents in row order.
    pub fn into_docs(self) -> impl Iterator<Item = Document> {
        self.rows.into_iter().filter_map(|row| row.doc)
    }
}

/// Result of a selector query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FindResponse {
    /// Matching documents.
    pub docs: Vec<Document>,
    /// Advisory message from the query planner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Pagination bookmark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<String>,
}

impl FindResponse {
    /// Builds a response with the given documents.
    pub fn from_docs(docs: impl IntoIterator<Item = Document>) -> Self {
        Self {
            docs: docs.into_iter().collect(),
            warning: None,
            bookmark: None,
        }
    }
}

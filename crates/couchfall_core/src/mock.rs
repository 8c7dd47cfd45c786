//! A scriptable in-memory store for testing.

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::options::{AllDocsOptions, FindRequest, SyncOptions};
use crate::session::SyncHandle;
use crate::store::{AllDocsResponse, AllDocsRow, DocumentStore, FindResponse};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A recorded call to [`DocumentStore::sync`].
#[derive(Debug, Clone)]
pub struct SyncCall {
    /// Name of the peer store.
    pub peer: String,
    /// Options passed in.
    pub options: SyncOptions,
    /// Handle returned to the caller.
    pub handle: SyncHandle,
}

/// A mock store for testing.
///
/// Serves documents from an in-memory map unless a response has been
/// scripted, counts every call, and can be switched into a failing state.
#[derive(Debug)]
pub struct MockStore {
    name: String,
    documents: Mutex<BTreeMap<String, Document>>,
    all_docs_response: Mutex<Option<StoreResult<AllDocsResponse>>>,
    find_response: Mutex<Option<StoreResult<FindResponse>>>,
    failure: Mutex<Option<StoreError>>,
    list_all_calls: AtomicUsize,
    query_calls: AtomicUsize,
    get_calls: AtomicUsize,
    seen_all_docs_options: Mutex<Vec<AllDocsOptions>>,
    seen_find_requests: Mutex<Vec<FindRequest>>,
    sync_calls: Mutex<Vec<SyncCall>>,
}

impl MockStore {
    /// Creates an empty mock store.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Mutex::new(BTreeMap::new()),
            all_docs_response: Mutex::new(None),
            find_response: Mutex::new(None),
            failure: Mutex::new(None),
            list_all_calls: AtomicUsize::new(0),
            query_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
            seen_all_docs_options: Mutex::new(Vec::new()),
            seen_find_requests: Mutex::new(Vec::new()),
            sync_calls: Mutex::new(Vec::new()),
        }
    }

    /// Creates a store whose every read fails with `error`.
    pub fn failing(name: impl Into<String>, error: StoreError) -> Self {
        let store = Self::new(name);
        store.fail_with(error);
        store
    }

    /// Stores a document.
    pub fn insert(&self, doc: Document) {
        self.documents.lock().insert(doc.id.clone(), doc);
    }

    /// Stores several documents.
    pub fn insert_all(&self, docs: impl IntoIterator<Item = Document>) {
        let mut documents = self.documents.lock();
        for doc in docs {
            documents.insert(doc.id.clone(), doc);
        }
    }

    /// Sets the bulk listing response, replacing map-backed listing.
    pub fn set_all_docs_response(&self, response: StoreResult<AllDocsResponse>) {
        *self.all_docs_response.lock() = Some(response);
    }

    /// Sets the selector query response.
    pub fn set_find_response(&self, response: StoreResult<FindResponse>) {
        *self.find_response.lock() = Some(response);
    }

    /// Makes every read fail with `error`.
    pub fn fail_with(&self, error: StoreError) {
        *self.failure.lock() = Some(error);
    }

    /// Clears the failing state.
    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    /// Number of `list_all` calls.
    pub fn list_all_calls(&self) -> usize {
        self.list_all_calls.load(Ordering::SeqCst)
    }

    /// Number of `query` calls.
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    /// Number of `get` calls.
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Total number of read calls.
    pub fn read_calls(&self) -> usize {
        self.list_all_calls() + self.query_calls() + self.get_calls()
    }

    /// Options received by `list_all`, in call order.
    pub fn seen_all_docs_options(&self) -> Vec<AllDocsOptions> {
        self.seen_all_docs_options.lock().clone()
    }

    /// Requests received by `query`, in call order.
    pub fn seen_find_requests(&self) -> Vec<FindRequest> {
        self.seen_find_requests.lock().clone()
    }

    /// Calls received by `sync`, in call order.
    pub fn sync_calls(&self) -> Vec<SyncCall> {
        self.sync_calls.lock().clone()
    }

    fn check_failure(&self) -> StoreResult<()> {
        match self.failure.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn list_from_map(&self, options: &AllDocsOptions) -> AllDocsResponse {
        let documents = self.documents.lock();
        let rows = documents
            .values()
            .take(usize::try_from(options.limit).unwrap_or(usize::MAX))
            .cloned()
            .map(|doc| {
                let mut row = AllDocsRow::with_doc(doc);
                if !options.include_docs {
                    row.doc = None;
                }
                row
            })
            .collect();

        AllDocsResponse {
            total_rows: documents.len() as u64,
            offset: 0,
            rows,
        }
    }
}

impl DocumentStore for MockStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_all(&self, options: &AllDocsOptions) -> StoreResult<AllDocsResponse> {
        self.list_all_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_all_docs_options.lock().push(options.clone());
        self.check_failure()?;

        match self.all_docs_response.lock().clone() {
            Some(response) => response,
            None => Ok(self.list_from_map(options)),
        }
    }

    fn query(&self, request: &FindRequest) -> StoreResult<FindResponse> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_find_requests.lock().push(request.clone());
        self.check_failure()?;

        self.find_response
            .lock()
            .clone()
            .unwrap_or_else(|| Err(StoreError::InvalidQuery("no mock find response set".into())))
    }

    fn get(&self, id: &str) -> StoreResult<Document> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        self.documents
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    fn sync(&self, peer: &dyn DocumentStore, options: &SyncOptions) -> SyncHandle {
        let handle = SyncHandle::new(options.clone());
        self.sync_calls.lock().push(SyncCall {
            peer: peer.name().to_string(),
            options: options.clone(),
            handle: handle.clone(),
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serves_documents_from_map() {
        let store = MockStore::new("local");
        store.insert_all([Document::new("b"), Document::new("a")]);

        let ids: Vec<String> = store
            .list_all(&AllDocsOptions::default())
            .unwrap()
            .into_docs()
            .map(|doc| doc.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(store.get("a").unwrap(), Document::new("a"));
        assert!(store.get("zzz").unwrap_err().is_not_found());
    }

    #[test]
    fn map_listing_honors_limit_and_include_docs() {
        let store = MockStore::new("local");
        store.insert_all((0..5).map(|n| Document::new(format!("doc{n}"))));

        let response = store
            .list_all(&AllDocsOptions::default().with_limit(2))
            .unwrap();
        assert_eq!(response.rows.len(), 2);
        assert_eq!(response.total_rows, 5);

        let mut options = AllDocsOptions::default();
        options.include_docs = false;
        let response = store.list_all(&options).unwrap();
        assert!(response.rows.iter().all(|row| row.doc.is_none()));
    }

    #[test]
    fn failing_store_counts_calls() {
        let store = MockStore::failing("remote", StoreError::Timeout);

        assert_eq!(store.list_all(&AllDocsOptions::default()), Err(StoreError::Timeout));
        assert_eq!(store.get("a"), Err(StoreError::Timeout));
        assert_eq!(store.read_calls(), 2);

        store.recover();
        assert!(store.list_all(&AllDocsOptions::default()).is_ok());
    }

    #[test]
    fn query_requires_scripted_response() {
        let store = MockStore::new("remote");
        let request = FindRequest::new(json!({ "type": "note" }));
        assert!(matches!(store.query(&request), Err(StoreError::InvalidQuery(_))));

        store.set_find_response(Ok(FindResponse::from_docs([Document::new("n1")])));
        assert_eq!(store.query(&request).unwrap().docs.len(), 1);
        assert_eq!(store.seen_find_requests(), vec![request.clone(), request]);
    }

    #[test]
    fn sync_records_calls() {
        let local = MockStore::new("local");
        let remote = MockStore::new("remote");

        let handle = local.sync(&remote, &SyncOptions::live());
        let calls = local.sync_calls();

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].peer, "remote");
        assert!(calls[0].options.live);
        assert!(calls[0].handle.same_session(&handle));
        assert!(remote.sync_calls().is_empty());
    }
}

//! Remote-first loading with local fallback.
//!
//! Every load asks the remote store first. Only when that attempt has
//! failed outright is the identical request sent to the local store. Results
//! from the two stores are never merged.
//!
//! Bulk listings and selector queries surface the local error when both
//! stores fail. Single-document gets resolve to `None` instead.

use crate::config::LoaderConfig;
use crate::stats::LoaderStats;
use couchfall_core::{
    AllDocsOptions, DiagnosticSink, Document, DocumentStore, FindRequest, StoreResult,
    TracingSink,
};
use serde_json::{Map, Value};

/// Which store answered a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The remote store.
    Remote,
    /// The local store, after the remote store failed.
    Local,
}

/// A loaded value tagged with the store that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    /// The loaded value.
    pub value: T,
    /// Where it came from.
    pub source: Source,
}

impl<T> Sourced<T> {
    /// Tags a value.
    pub fn new(value: T, source: Source) -> Self {
        Self { value, source }
    }

    /// Returns true if the value came from the local store.
    pub fn is_fallback(&self) -> bool {
        self.source == Source::Local
    }

    /// Maps the value, keeping the source.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            value: f(self.value),
            source: self.source,
        }
    }

    /// Drops the source tag.
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Loads initial documents from a remote store, falling back to a local one.
///
/// The loader borrows both stores for its lifetime and holds no state
/// besides its statistics, so it can be shared between threads.
pub struct InitialLoader<'a, D: DiagnosticSink = TracingSink> {
    pub(crate) local: &'a dyn DocumentStore,
    pub(crate) remote: &'a dyn DocumentStore,
    pub(crate) sink: D,
    pub(crate) config: LoaderConfig,
    pub(crate) stats: LoaderStats,
}

impl<'a> InitialLoader<'a, TracingSink> {
    /// Creates a loader that reports to `tracing`.
    pub fn new(local: &'a dyn DocumentStore, remote: &'a dyn DocumentStore) -> Self {
        Self::with_sink(local, remote, TracingSink)
    }
}

impl<'a, D: DiagnosticSink> InitialLoader<'a, D> {
    /// Creates a loader that reports to `sink`.
    pub fn with_sink(local: &'a dyn DocumentStore, remote: &'a dyn DocumentStore, sink: D) -> Self {
        Self {
            local,
            remote,
            sink,
            config: LoaderConfig::default(),
            stats: LoaderStats::new(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load statistics.
    pub fn stats(&self) -> &LoaderStats {
        &self.stats
    }

    /// The diagnostic sink.
    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// Lists every non-reserved document.
    ///
    /// The base options (`include_docs`, `attachments`, `limit=99999`) are
    /// merged with `overrides` before either store is contacted. A `null`
    /// override restores the base value; a mistyped one fails the call
    /// without touching a store.
    pub fn all_docs(&self, overrides: Option<&Map<String, Value>>) -> StoreResult<Vec<Document>> {
        self.all_docs_sourced(overrides).map(Sourced::into_inner)
    }

    /// Like [`all_docs`](Self::all_docs), tagged with the answering store.
    pub fn all_docs_sourced(
        &self,
        overrides: Option<&Map<String, Value>>,
    ) -> StoreResult<Sourced<Vec<Document>>> {
        let options = match overrides {
            Some(overrides) => AllDocsOptions::default().with_overrides(overrides)?,
            None => AllDocsOptions::default(),
        };

        let Sourced { value, source } =
            self.remote_then_local("list_all", |store| store.list_all(&options))?;

        let prefix = self.config.reserved_prefix;
        let (docs, reserved): (Vec<Document>, Vec<Document>) =
            value.into_docs().partition(|doc| !doc.has_prefix(prefix));
        self.stats.record_reserved_filtered(reserved.len() as u64);

        Ok(Sourced::new(docs, source))
    }

    /// Runs a selector query. The request is forwarded untouched.
    pub fn find_docs(&self, request: &FindRequest) -> StoreResult<Vec<Document>> {
        self.find_docs_sourced(request).map(Sourced::into_inner)
    }

    /// Like [`find_docs`](Self::find_docs), tagged with the answering store.
    pub fn find_docs_sourced(&self, request: &FindRequest) -> StoreResult<Sourced<Vec<Document>>> {
        let response = self.remote_then_local("query", |store| store.query(request))?;
        Ok(response.map(|response| response.docs))
    }

    /// Fetches one document. Returns `None` when neither store has it or
    /// both are unreachable.
    pub fn get_doc(&self, id: &str) -> Option<Document> {
        self.get_doc_sourced(id).map(Sourced::into_inner)
    }

    /// Like [`get_doc`](Self::get_doc), tagged with the answering store.
    pub fn get_doc_sourced(&self, id: &str) -> Option<Sourced<Document>> {
        match self.remote_then_local("get", |store| store.get(id)) {
            Ok(doc) => Some(doc),
            Err(err) => {
                if self.config.warn_on_local_get_failure {
                    self.sink.warn("get", self.local.name(), &err);
                }
                None
            }
        }
    }

    fn remote_then_local<T>(
        &self,
        operation: &str,
        call: impl Fn(&dyn DocumentStore) -> StoreResult<T>,
    ) -> StoreResult<Sourced<T>> {
        let remote_err = match call(self.remote) {
            Ok(value) => {
                self.stats.record_remote_hit();
                return Ok(Sourced::new(value, Source::Remote));
            }
            Err(err) => err,
        };

        self.sink.warn(operation, self.remote.name(), &remote_err);

        match call(self.local) {
            Ok(value) => {
                self.stats.record_local_fallback();
                tracing::debug!(operation, store = self.local.name(), "served from local store");
                Ok(Sourced::new(value, Source::Local))
            }
            Err(err) => {
                self.stats.record_local_failure();
                Err(err)
            }
        }
    }
}

/// Lists the initial documents from `remote`, falling back to `local`.
///
/// Reserved documents (ids starting with `_`) are dropped. Fails with the
/// local error if both stores fail.
pub fn get_initial_all_docs(
    local: &dyn DocumentStore,
    remote: &dyn DocumentStore,
    overrides: Option<&Map<String, Value>>,
) -> StoreResult<Vec<Document>> {
    InitialLoader::new(local, remote).all_docs(overrides)
}

/// Runs a selector query against `remote`, falling back to `local`.
pub fn get_initial_find_docs(
    local: &dyn DocumentStore,
    remote: &dyn DocumentStore,
    request: &FindRequest,
) -> StoreResult<Vec<Document>> {
    InitialLoader::new(local, remote).find_docs(request)
}

/// Fetches a document from `remote`, falling back to `local`.
///
/// Never fails: a document neither store can produce is `None`.
pub fn get_initial_get_doc(
    local: &dyn DocumentStore,
    remote: &dyn DocumentStore,
    id: &str,
) -> Option<Document> {
    InitialLoader::new(local, remote).get_doc(id)
}

//! # couchfall engine
//!
//! Remote-first document loading with local fallback, and live sync setup.
//!
//! This crate provides:
//! - [`get_initial_all_docs`]: bulk listing without reserved documents
//! - [`get_initial_find_docs`]: selector queries
//! - [`get_initial_get_doc`]: single documents, `None` when unavailable
//! - [`initialize_db_sync`]: continuous two-way replication
//! - [`InitialLoader`]: the same operations with an injectable
//!   [`DiagnosticSink`](couchfall_core::DiagnosticSink), configuration and
//!   statistics
//!
//! ## Key Invariants
//!
//! - The local store is contacted only after the remote store has failed
//! - Results from the two stores are never merged
//! - Bulk listings never contain documents with a reserved id prefix
//! - Starting sync never blocks on replication
//!
//! ## Example
//!
//! ```rust
//! use couchfall_core::{Document, MockStore, StoreError};
//! use couchfall_engine::{get_initial_all_docs, get_initial_get_doc};
//!
//! let local = MockStore::new("local");
//! local.insert_all([Document::new("_design/app"), Document::new("note-1")]);
//! let remote = MockStore::failing("remote", StoreError::transport_retryable("offline"));
//!
//! let docs = get_initial_all_docs(&local, &remote, None).unwrap();
//! assert_eq!(docs, vec![Document::new("note-1")]);
//! assert_eq!(get_initial_get_doc(&local, &remote, "missing"), None);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod fallback;
mod stats;
mod sync;

pub use config::LoaderConfig;
pub use fallback::{
    get_initial_all_docs, get_initial_find_docs, get_initial_get_doc, InitialLoader, Source,
    Sourced,
};
pub use stats::{LoaderStats, LoaderStatsSnapshot};
pub use sync::initialize_db_sync;

//! # couchfall core
//!
//! Document model and store capability for couchfall.
//!
//! This crate provides:
//! - The [`Document`] model and the reserved id prefix
//! - Request options ([`AllDocsOptions`], [`FindRequest`], [`SyncOptions`])
//! - The [`DocumentStore`] trait every concrete database client implements
//! - [`SyncHandle`], the event emitter for live replication sessions
//! - The [`DiagnosticSink`] capability used for warnings and errors
//! - [`MockStore`], a scriptable store for tests
//!
//! ## Design Principles
//!
//! - Stores are external: this crate defines what a store must do, not how
//! - Stores are borrowed, never owned, by the code that reads from them
//! - Must be `Send + Sync` so replication can emit from its own thread
//! - No replication protocol, conflict handling or query language here

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod diagnostics;
mod document;
mod error;
mod mock;
mod options;
mod session;
mod store;

pub use diagnostics::{DiagnosticSink, TracingSink};
pub use document::{Document, RESERVED_ID_PREFIX};
pub use error::{StoreError, StoreResult};
pub use mock::{MockStore, SyncCall};
pub use options::{AllDocsOptions, FindRequest, SyncOptions, DEFAULT_ROW_LIMIT};
pub use session::{ChangeListener, ErrorListener, SyncChange, SyncDirection, SyncEvent, SyncHandle};
pub use store::{AllDocsResponse, AllDocsRow, DocumentStore, FindResponse};

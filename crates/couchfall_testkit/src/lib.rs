//! # couchfall testkit
//!
//! Test utilities for couchfall.
//!
//! This crate provides:
//! - Local/remote store pairs and document fixtures
//! - Property-based test generators using proptest
//! - A recording diagnostic sink for asserting on warnings and errors
//! - Test logging setup
//!
//! ## Usage
//!
//! ```rust
//! use couchfall_core::{DiagnosticSink, DocumentStore};
//! use couchfall_testkit::prelude::*;
//!
//! let pair = StorePair::remote_offline();
//! pair.local.insert_all(docs(&["a", "b"]));
//!
//! let sink = RecordingSink::new();
//! let err = pair.remote.get("a").unwrap_err();
//! sink.warn("get", pair.remote.name(), &err);
//!
//! assert_eq!(pair.local.get("a").unwrap(), doc("a"));
//! assert_eq!(sink.warnings().len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod logging;
pub mod sink;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::logging::*;
    pub use crate::sink::*;
}

pub use fixtures::*;
pub use generators::*;
pub use logging::*;
pub use sink::*;

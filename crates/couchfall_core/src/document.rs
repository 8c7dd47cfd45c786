//! Document model.
//!
//! A [`Document`] is an arbitrarily-shaped JSON record keyed by a unique
//! string id. The id and revision use the CouchDB field names (`_id`,
//! `_rev`); every other field is kept as-is.

use crate::error::StoreResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Leading character of ids that belong to internal/system documents
/// (`_design/...`, `_local/...`).
pub const RESERVED_ID_PREFIX: char = '_';

/// A single stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Revision, if the store tracks one.
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    /// Every other field of the document.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Creates an empty document with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rev: None,
            fields: Map::new(),
        }
    }

    /// Sets the revision.
    pub fn with_rev(mut self, rev: impl Into<String>) -> Self {
        self.rev = Some(rev.into());
        self
    }

    /// Sets a field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Returns a field value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns true if the id starts with [`RESERVED_ID_PREFIX`].
    pub fn is_reserved(&self) -> bool {
        self.has_prefix(RESERVED_ID_PREFIX)
    }

    /// Returns true if the id starts with `prefix`.
    pub fn has_prefix(&self, prefix: char) -> bool {
        self.id.starts_with(prefix)
    }

    /// Parses a document from a JSON value.
    pub fn from_value(value: Value) -> StoreResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Converts the document into a JSON value.
    pub fn to_value(&self) -> StoreResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_couch_fields() {
        let doc = Document::from_value(json!({
            "_id": "doc1",
            "_rev": "1-abc",
            "title": "hello",
            "tags": ["a", "b"],
        }))
        .unwrap();

        assert_eq!(doc.id, "doc1");
        assert_eq!(doc.rev.as_deref(), Some("1-abc"));
        assert_eq!(doc.field("title"), Some(&json!("hello")));
        assert_eq!(doc.fields.len(), 2);
    }

    #[test]
    fn missing_id_is_rejected() {
        let result = Document::from_value(json!({ "title": "orphan" }));
        assert!(result.is_err());
    }

    #[test]
    fn rev_is_omitted_when_absent() {
        let value = Document::new("doc1").with_field("n", 1).to_value().unwrap();
        assert_eq!(value, json!({ "_id": "doc1", "n": 1 }));
    }

    #[test]
    fn reserved_ids() {
        assert!(Document::new("_design/views").is_reserved());
        assert!(Document::new("_local/checkpoint").is_reserved());
        assert!(!Document::new("doc_1").is_reserved());
        assert!(!Document::new("").is_reserved());
        assert!(Document::new("$meta").has_prefix('$'));
    }
}

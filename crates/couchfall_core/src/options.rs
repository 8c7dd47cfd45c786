//! Request options passed through to a document store.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Row limit used by a bulk listing unless overridden.
pub const DEFAULT_ROW_LIMIT: u64 = 99999;

/// Options for a bulk listing (`_all_docs`).
///
/// Field names follow the CouchDB query parameters. Keys the struct does
/// not model (`startkey`, `keys`, `descending`, ...) are kept in `extra`
/// and passed to the store untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllDocsOptions {
    /// Include the full document in each row.
    pub include_docs: bool,
    /// Include attachment bodies.
    pub attachments: bool,
    /// Maximum number of rows.
    pub limit: u64,
    /// Any other option.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AllDocsOptions {
    /// Merges `overrides` on top of these options, key by key.
    ///
    /// A `null` override resets a recognized key to its default. Recognized
    /// keys must otherwise carry the right JSON type; anything else is
    /// stored in `extra`.
    pub fn with_overrides(self, overrides: &Map<String, Value>) -> StoreResult<Self> {
        let mut merged = self.into_map();
        for (name, value) in overrides {
            merged.insert(name.clone(), value.clone());
        }
        Self::from_map(merged)
    }

    /// Builds options from a flat map, falling back to the defaults for
    /// missing or `null` recognized keys.
    pub fn from_map(mut map: Map<String, Value>) -> StoreResult<Self> {
        let include_docs = take_bool(&mut map, "include_docs", true)?;
        let attachments = take_bool(&mut map, "attachments", true)?;
        let limit = match map.remove("limit") {
            None | Some(Value::Null) => DEFAULT_ROW_LIMIT,
            Some(value) => row_limit(&value)
                .ok_or_else(|| StoreError::invalid_option("limit", "expected an unsigned integer"))?,
        };

        Ok(Self {
            include_docs,
            attachments,
            limit,
            extra: map,
        })
    }

    /// Flattens the options into a single map.
    pub fn into_map(self) -> Map<String, Value> {
        let mut map = self.extra;
        map.insert("include_docs".into(), Value::Bool(self.include_docs));
        map.insert("attachments".into(), Value::Bool(self.attachments));
        map.insert("limit".into(), Value::from(self.limit));
        map
    }

    /// Sets the row limit.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Sets an extra option.
    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

impl Default for AllDocsOptions {
    fn default() -> Self {
        Self {
            include_docs: true,
            attachments: true,
            limit: DEFAULT_ROW_LIMIT,
            extra: Map::new(),
        }
    }
}

fn take_bool(map: &mut Map<String, Value>, name: &str, default: bool) -> StoreResult<bool> {
    match map.remove(name) {
        Some(Value::Bool(value)) => Ok(value),
        None | Some(Value::Null) => Ok(default),
        Some(_) => Err(StoreError::invalid_option(name, "expected a boolean")),
    }
}

/// Reads a row limit, accepting whole-valued floats such as `10.0`.
fn row_limit(value: &Value) -> Option<u64> {
    if let Some(limit) = value.as_u64() {
        return Some(limit);
    }
    let limit = value.as_f64()?;
    let whole = limit.is_finite() && limit >= 0.0 && limit.fract() == 0.0 && limit <= u64::MAX as f64;
    whole.then_some(limit as u64)
}

/// A selector query (`_find`).
///
/// The request is opaque to the loader and reaches the store verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindRequest {
    /// Mango selector.
    pub selector: Value,
    /// Fields to project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    /// Sort specification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<Value>>,
    /// Maximum number of documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Number of documents to skip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    /// Index hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_index: Option<Value>,
    /// Any other option.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FindRequest {
    /// Creates a request for the given selector.
    pub fn new(selector: Value) -> Self {
        Self {
            selector,
            fields: None,
            sort: None,
            limit: None,
            skip: None,
            use_index: None,
            extra: Map::new(),
        }
    }

    /// Parses a request from its JSON form.
    pub fn from_value(value: Value) -> StoreResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Sets the projected fields.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the sort specification.
    pub fn with_sort(mut self, sort: Vec<Value>) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Sets the limit.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the skip count.
    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Sets the index hint.
    pub fn with_use_index(mut self, index: impl Into<Value>) -> Self {
        self.use_index = Some(index.into());
        self
    }
}

/// Options for a replication session.
///
/// `None` leaves the value at whatever the store defaults to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncOptions {
    /// Keep replicating after catching up.
    pub live: bool,
    /// Reconnect after transport failures.
    pub retry: bool,
    /// Documents per batch.
    pub batch_size: Option<u32>,
    /// Batches buffered in flight.
    pub batches_limit: Option<u32>,
    /// Change-feed heartbeat.
    pub heartbeat: Option<Duration>,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
}

impl SyncOptions {
    /// Continuous replication with store defaults for everything else.
    pub fn live() -> Self {
        Self {
            live: true,
            ..Self::default()
        }
    }

    /// Sets the retry flag.
    pub fn with_retry(mut self, retry: bool) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the batch size.
    pub fn with_batch_size(mut self, size: u32) -> Self {
        self.batch_size = Some(size);
        self
    }

    /// Sets the number of in-flight batches.
    pub fn with_batches_limit(mut self, limit: u32) -> Self {
        self.batches_limit = Some(limit);
        self
    }

    /// Sets the heartbeat interval.
    pub fn with_heartbeat(mut self, heartbeat: Duration) -> Self {
        self.heartbeat = Some(heartbeat);
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn overrides(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn all_docs_defaults() {
        let options = AllDocsOptions::default();
        assert!(options.include_docs);
        assert!(options.attachments);
        assert_eq!(options.limit, 99999);
        assert!(options.extra.is_empty());
    }

    #[test]
    fn overrides_replace_base_options() {
        let options = AllDocsOptions::default()
            .with_overrides(&overrides(json!({ "limit": 10, "attachments": false })))
            .unwrap();

        assert!(options.include_docs);
        assert!(!options.attachments);
        assert_eq!(options.limit, 10);
    }

    #[test]
    fn unknown_overrides_land_in_extra() {
        let options = AllDocsOptions::default()
            .with_overrides(&overrides(json!({ "startkey": "a", "descending": true })))
            .unwrap();

        assert_eq!(options.extra.get("startkey"), Some(&json!("a")));
        assert_eq!(options.extra.get("descending"), Some(&json!(true)));
        assert_eq!(options.limit, DEFAULT_ROW_LIMIT);
    }

    #[test]
    fn mistyped_override_is_rejected() {
        let err = AllDocsOptions::default()
            .with_overrides(&overrides(json!({ "limit": "ten" })))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidOption { ref name, .. } if name == "limit"));

        let err = AllDocsOptions::default()
            .with_overrides(&overrides(json!({ "include_docs": 1 })))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidOption { ref name, .. } if name == "include_docs"));
    }

    #[test]
    fn null_override_restores_default() {
        let options = AllDocsOptions::default()
            .with_limit(10)
            .with_overrides(&overrides(json!({ "limit": null, "include_docs": null })))
            .unwrap();

        assert_eq!(options.limit, DEFAULT_ROW_LIMIT);
        assert!(options.include_docs);
        assert!(!options.extra.contains_key("limit"));
    }

    #[test]
    fn whole_float_limit_is_accepted() {
        let options = AllDocsOptions::default()
            .with_overrides(&overrides(json!({ "limit": 10.0 })))
            .unwrap();
        assert_eq!(options.limit, 10);

        let err = AllDocsOptions::default()
            .with_overrides(&overrides(json!({ "limit": 2.5 })))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidOption { ref name, .. } if name == "limit"));
    }

    #[test]
    fn all_docs_serializes_flat() {
        let value = serde_json::to_value(AllDocsOptions::default().with_extra("skip", 5)).unwrap();
        assert_eq!(
            value,
            json!({ "include_docs": true, "attachments": true, "limit": 99999, "skip": 5 })
        );
    }

    #[test]
    fn find_request_round_trips_unknown_keys() {
        let raw = json!({
            "selector": { "type": "note" },
            "limit": 20,
            "execution_stats": true,
        });
        let request = FindRequest::from_value(raw.clone()).unwrap();

        assert_eq!(request.limit, Some(20));
        assert_eq!(request.extra.get("execution_stats"), Some(&json!(true)));
        assert_eq!(serde_json::to_value(&request).unwrap(), raw);
    }

    #[test]
    fn sync_options_builder() {
        let options = SyncOptions::live()
            .with_retry(true)
            .with_batch_size(50)
            .with_heartbeat(Duration::from_secs(10));

        assert!(options.live);
        assert!(options.retry);
        assert_eq!(options.batch_size, Some(50));
        assert_eq!(options.batches_limit, None);
        assert_eq!(options.heartbeat, Some(Duration::from_secs(10)));
        assert!(!SyncOptions::default().live);
    }
}

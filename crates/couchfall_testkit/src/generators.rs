//! Property-based test generators using proptest.
//!
//! Provides strategies for generating documents, ids and listing options.

use couchfall_core::Document;
use proptest::prelude::*;
use serde_json::{Map, Value};

/// Strategy for generating user document ids.
pub fn doc_id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9][a-z0-9_:-]{0,23}").expect("Invalid regex")
}

/// Strategy for generating reserved (system) document ids.
pub fn reserved_id_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("_design/[a-z]{1,12}").expect("Invalid regex"),
        prop::string::string_regex("_local/[a-z0-9]{1,12}").expect("Invalid regex"),
        prop::string::string_regex("_[a-z]{1,8}").expect("Invalid regex"),
    ]
}

/// Strategy for generating user or reserved ids (mostly user).
pub fn any_id_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => doc_id_strategy(),
        1 => reserved_id_strategy(),
    ]
}

/// Strategy for generating a simple JSON field value.
pub fn field_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z ]{0,16}".prop_map(Value::from),
        Just(Value::Null),
    ]
}

/// Strategy for generating a document with the given id strategy.
pub fn document_strategy(
    ids: impl Strategy<Value = String>,
) -> impl Strategy<Value = Document> {
    (
        ids,
        prop::collection::btree_map("[a-z]{1,8}", field_value_strategy(), 0..4),
    )
        .prop_map(|(id, fields)| {
            let mut doc = Document::new(id);
            doc.fields = fields.into_iter().collect();
            doc
        })
}

/// Strategy for generating a batch of user and reserved documents.
pub fn mixed_documents_strategy(max: usize) -> impl Strategy<Value = Vec<Document>> {
    prop::collection::vec(document_strategy(any_id_strategy()), 0..max)
}

/// Strategy for generating a `limit` override as a caller might write it.
pub fn limit_override_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => (0u64..200).prop_map(Value::from),
        1 => (0u32..200).prop_map(|limit| Value::from(f64::from(limit))),
        1 => Just(Value::Null),
    ]
}

/// Strategy for generating well-typed bulk listing overrides.
pub fn all_docs_overrides_strategy() -> impl Strategy<Value = Map<String, Value>> {
    (
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
        prop::option::of(limit_override_strategy()),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(include_docs, attachments, limit, descending)| {
            let mut overrides = Map::new();
            if let Some(value) = include_docs {
                overrides.insert("include_docs".into(), Value::from(value));
            }
            if let Some(value) = attachments {
                overrides.insert("attachments".into(), Value::from(value));
            }
            if let Some(value) = limit {
                overrides.insert("limit".into(), value);
            }
            if let Some(value) = descending {
                overrides.insert("descending".into(), Value::from(value));
            }
            overrides
        })
}

/// Cases per property for suites that run on every `cargo test`.
pub const QUICK_CASES: u32 = 32;

/// proptest settings for store-level properties running `cases` cases.
///
/// The shrink budget grows with `cases`.
pub fn store_proptest_config(cases: u32) -> ProptestConfig {
    ProptestConfig {
        cases,
        max_shrink_iters: cases.saturating_mul(4),
        ..ProptestConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use couchfall_core::AllDocsOptions;

    proptest! {
        #![proptest_config(store_proptest_config(QUICK_CASES))]

        #[test]
        fn user_ids_are_not_reserved(id in doc_id_strategy()) {
            prop_assert!(!Document::new(id).is_reserved());
        }

        #[test]
        fn reserved_ids_are_reserved(id in reserved_id_strategy()) {
            prop_assert!(Document::new(id).is_reserved());
        }

        #[test]
        fn generated_overrides_are_accepted(overrides in all_docs_overrides_strategy()) {
            let options = AllDocsOptions::default().with_overrides(&overrides).unwrap();
            prop_assert!(options.extra.len() <= 1);
        }
    }
}

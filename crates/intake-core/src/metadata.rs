//! Field metadata building and profile pruning
//!
//! The extraction stage does not report per-field confidence, so metadata is
//! derived from the populated document itself: every populated leaf gets
//! confidence `1.0`, every empty leaf `0.0`.

use crate::node::{for_each_leaf, is_empty_value};
use crate::types::{FieldMetadata, FieldMetadataMap};
use serde_json::Value;

/// Flatten a populated document into per-field metadata
///
/// Objects are recursed into; arrays and everything below them contribute no
/// entries.
pub fn build_field_metadata(populated: &Value) -> FieldMetadataMap {
    let mut metadata = FieldMetadataMap::new();
    for_each_leaf(populated, |path, value| {
        let meta = if is_empty_value(value) {
            FieldMetadata::absent()
        } else {
            FieldMetadata::present(1.0)
        };
        metadata.insert(path.clone(), meta);
    });
    metadata
}

/// Recursively drop empty values from objects and arrays
///
/// Pruning is bottom-up: a container that becomes empty once its children
/// are pruned is dropped as well. The top-level value itself is returned even
/// when it ends up empty.
pub fn prune_empty(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, child)| (key.clone(), prune_empty(child)))
                .filter(|(_, child)| !is_empty_value(child))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(prune_empty)
                .filter(|child| !is_empty_value(child))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::FieldPath;
    use serde_json::json;

    #[test]
    fn test_build_metadata_flattens_objects() {
        let doc = json!({
            "general_information": {"client_1": {"first_name": "Ada", "middle_name": ""}},
            "employment_data": {"client_1": {"annual_income": 0}},
            "notes": null
        });
        let metadata = build_field_metadata(&doc);

        assert_eq!(metadata.len(), 4);
        assert_eq!(
            metadata[&FieldPath::parse("general_information.client_1.first_name")],
            FieldMetadata::present(1.0)
        );
        assert_eq!(
            metadata[&FieldPath::parse("general_information.client_1.middle_name")],
            FieldMetadata::absent()
        );
        assert!(metadata[&FieldPath::parse("employment_data.client_1.annual_income")].has_value);
        assert!(!metadata[&FieldPath::parse("notes")].has_value);
    }

    #[test]
    fn test_build_metadata_skips_arrays() {
        let doc = json!({"non_retirement_assets": [{"type": "brokerage"}], "name": "x"});
        let metadata = build_field_metadata(&doc);
        assert_eq!(metadata.len(), 1);
        assert!(metadata.contains_key(&FieldPath::parse("name")));
    }

    #[test]
    fn test_build_metadata_of_non_object_root_is_empty() {
        assert!(build_field_metadata(&json!("abc")).is_empty());
        assert!(build_field_metadata(&json!(42)).is_empty());
        assert!(build_field_metadata(&json!([1, 2])).is_empty());
    }

    #[test]
    fn test_prune_empty_is_bottom_up() {
        let doc = json!({
            "a": {"b": "", "c": null},
            "d": [[], {}, "", 0, false],
            "e": "kept",
            "f": {"g": {"h": []}}
        });
        assert_eq!(
            prune_empty(&doc),
            json!({"d": [0, false], "e": "kept"})
        );
    }
}

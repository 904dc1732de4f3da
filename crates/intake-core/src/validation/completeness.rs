//! Completeness scan: which target fields are missing or empty

use crate::node::{is_empty_value, NodeKind};
use crate::path::FieldPath;
use crate::types::{Issue, IssueKind, Severity};
use serde_json::Value;

/// Walk the target shape and report missing and empty leaves
pub fn check_completeness(populated: &Value, target: &Value) -> Vec<Issue> {
    let mut issues = Vec::new();
    scan_node(populated, target, &FieldPath::root(), &mut issues);
    issues
}

fn scan_node(populated: &Value, target: &Value, path: &FieldPath, issues: &mut Vec<Issue>) {
    let Value::Object(target_map) = target else {
        return;
    };
    // A populated node that is not an object has none of the target's keys.
    let populated_map = populated.as_object();

    for (key, target_value) in target_map {
        let field_path = path.child(key);

        let Some(value) = populated_map.and_then(|map| map.get(key)) else {
            issues.push(Issue::new(
                IssueKind::MissingField,
                &field_path,
                format!("Field '{}' is missing", field_path),
                Severity::Medium,
            ));
            continue;
        };

        if NodeKind::of(target_value).is_container() {
            scan_node(value, target_value, &field_path, issues);
        } else if is_empty_value(value) {
            issues.push(Issue::new(
                IssueKind::EmptyField,
                &field_path,
                format!("Field '{}' is empty", field_path),
                Severity::Low,
            ));
        }
    }
}

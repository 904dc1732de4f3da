//! Structural comparison of a populated document against the target shape
//!
//! Only container types are checked here. Keys the target expects but the
//! populated document lacks are left to the completeness scanner, so that a
//! wrongly-shaped value and a missing value are reported as different issues.

use crate::node::{type_name, NodeKind};
use crate::path::FieldPath;
use crate::types::{Issue, IssueKind, Severity};
use serde_json::Value;

/// Compare the populated document's shape against the target's shape
pub fn compare(populated: &Value, target: &Value) -> Vec<Issue> {
    let mut issues = Vec::new();
    compare_node(populated, target, &FieldPath::root(), &mut issues);
    issues
}

fn compare_node(populated: &Value, target: &Value, path: &FieldPath, issues: &mut Vec<Issue>) {
    match NodeKind::of(target) {
        NodeKind::Object => {
            let (Value::Object(target_map), Value::Object(populated_map)) = (target, populated)
            else {
                issues.push(mismatch(path, NodeKind::Object, populated));
                return;
            };

            for (key, target_child) in target_map {
                if let Some(populated_child) = populated_map.get(key) {
                    compare_node(populated_child, target_child, &path.child(key), issues);
                }
            }
        }
        NodeKind::Array => {
            if NodeKind::of(populated) != NodeKind::Array {
                issues.push(mismatch(path, NodeKind::Array, populated));
            }
        }
        NodeKind::Scalar => {}
    }
}

fn mismatch(path: &FieldPath, expected: NodeKind, found: &Value) -> Issue {
    Issue::new(
        IssueKind::StructureError,
        path,
        format!(
            "{}: Expected {}, got {}",
            path.display_name(),
            expected.name(),
            type_name(found)
        ),
        Severity::Medium,
    )
}

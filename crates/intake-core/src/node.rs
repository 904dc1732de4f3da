//! Node classification and tree walking over JSON documents
//!
//! Every validation pass dispatches on [`NodeKind`] instead of inspecting
//! `serde_json::Value` variants ad hoc.

use crate::path::FieldPath;
use serde_json::Value;

/// Closed classification of a document node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Mapping of keys to nodes
    Object,
    /// Ordered sequence of nodes, treated as opaque by every pass
    Array,
    /// String, number, boolean or null
    Scalar,
}

impl NodeKind {
    /// Classify a node
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => NodeKind::Object,
            Value::Array(_) => NodeKind::Array,
            _ => NodeKind::Scalar,
        }
    }

    /// Objects and arrays are containers
    pub fn is_container(self) -> bool {
        !matches!(self, NodeKind::Scalar)
    }

    /// Name used in messages
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Object => "object",
            NodeKind::Array => "array",
            NodeKind::Scalar => "scalar",
        }
    }
}

/// Runtime type name of a node, as reported in issue messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Whether a value counts as empty
///
/// `null`, `""`, `[]` and `{}` are empty. Numbers (including `0`) and booleans
/// (including `false`) never are.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Render a scalar as plain text (strings without quotes)
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Visit every non-container leaf reachable through objects
///
/// Arrays are skipped entirely, together with anything nested inside them.
/// A scalar root is not a field and is never visited.
pub fn for_each_leaf<F>(document: &Value, mut visit: F)
where
    F: FnMut(&FieldPath, &Value),
{
    walk_leaves(document, &FieldPath::root(), &mut visit);
}

fn walk_leaves<F>(node: &Value, path: &FieldPath, visit: &mut F)
where
    F: FnMut(&FieldPath, &Value),
{
    match NodeKind::of(node) {
        NodeKind::Object => {
            if let Value::Object(map) = node {
                for (key, child) in map {
                    walk_leaves(child, &path.child(key), visit);
                }
            }
        }
        NodeKind::Array => {}
        NodeKind::Scalar if path.is_root() => {}
        NodeKind::Scalar => visit(path, node),
    }
}

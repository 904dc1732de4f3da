//! Intake Core - Validation engine for populated client profiles
//!
//! This crate compares a loosely-structured populated document against a
//! target schema and a flat per-field confidence map, and produces a
//! deterministic report of typed, severity-ranked issues plus completeness and
//! confidence statistics.
//!
//! # Main Components
//!
//! - **Path Model**: [`FieldPath`] and node classification over JSON documents
//! - **Validation**: structural comparison, field rules, completeness and
//!   confidence passes composed by [`Validator`]
//! - **Metadata**: building the flat confidence map from a populated document
//! - **Results**: the final processing document and a text summary
//!
//! # Example
//!
//! ```
//! use intake_core::{build_field_metadata, ValidationConfig, Validator};
//! use serde_json::json;
//!
//! let target = json!({"x": {"y": "", "z": 5}});
//! let populated = json!({"x": {"z": 0}});
//! let metadata = build_field_metadata(&populated);
//!
//! let validator = Validator::new(ValidationConfig::default())?;
//! let report = validator.validate(&populated, &target, &metadata, &[])?;
//!
//! assert!(report.is_valid);
//! assert_eq!(report.all_issues.len(), 1);
//! # Ok::<(), intake_core::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod metadata;
pub mod node;
pub mod path;
pub mod reporting;
pub mod result;
pub mod types;
pub mod validation;

// Re-export main types for convenience
pub use config::ValidationConfig;
pub use error::{Error, Result, Severity};
pub use metadata::{build_field_metadata, prune_empty};
pub use node::NodeKind;
pub use path::FieldPath;
pub use reporting::{render_summary, DEFAULT_SUMMARY_ISSUES};
pub use result::{ProcessingInfo, ProcessingResult, ValidationSummary};
pub use types::{
    FieldMetadata, FieldMetadataMap, Issue, IssueKind, Statistics, ValidationReport,
};
pub use validation::{
    aggregate, apply_rules, check_completeness, compare, flag_low_confidence, FieldRule,
    RuleCheck, RuleRegistry, Validator,
};

use serde_json::Value;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Validate with the standard rule set and an explicit review threshold
pub fn validate(
    populated: &Value,
    target: &Value,
    metadata: &FieldMetadataMap,
    existing_issues: &[Issue],
    threshold: f64,
) -> Result<ValidationReport> {
    let config = ValidationConfig::default().with_review_threshold(threshold);
    Validator::new(config)?.validate(populated, target, metadata, existing_issues)
}

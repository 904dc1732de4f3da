//! Schema validation and issue aggregation
//!
//! This module turns a populated document, its target shape and a flat
//! confidence map into a single [`ValidationReport`](crate::types::ValidationReport).
//!
//! The validator is organized into focused modules:
//! - `structure`: container-type comparison against the target shape
//! - `rules`: declarative, path-scoped type and format rules
//! - `completeness`: missing and empty field detection
//! - `confidence`: low-confidence flagging against the review threshold
//! - `statistics`: summary counts and rates
//! - `core`: the `Validator` that runs the passes and assembles the report

pub mod completeness;
pub mod confidence;
pub mod core;
pub mod rules;
pub mod statistics;
pub mod structure;


// Re-export public API
pub use self::core::Validator;
pub use completeness::check_completeness;
pub use confidence::flag_low_confidence;
pub use rules::{apply_rules, FieldRule, RuleCheck, RuleRegistry};
pub use statistics::aggregate;
pub use structure::compare;

//! Core data structures for Intake
//!
//! This module defines the issue model, the per-field confidence metadata,
//! the aggregated statistics and the validation report returned by the engine.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

pub use crate::error::Severity;
pub use crate::path::FieldPath;

/// Flat mapping of field paths to their metadata, iterated in path order
pub type FieldMetadataMap = BTreeMap<FieldPath, FieldMetadata>;

/// Bucket used for issues that carry no kind
pub const UNKNOWN_KIND: &str = "unknown";

/// Kind of a reported issue
///
/// The set is open: kinds produced by upstream stages that the engine does
/// not know are preserved verbatim in [`IssueKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IssueKind {
    /// Populated node has the wrong container type
    StructureError,
    /// Field value has the wrong type
    TypeError,
    /// Field value has the wrong textual format
    FormatError,
    /// Field is present but extracted with low confidence
    LowConfidence,
    /// Field expected by the target is absent
    MissingField,
    /// Field is present but empty
    EmptyField,
    /// Issue raised by the upstream extraction model
    LlmFlag,
    /// Processing could not complete
    FatalError,
    /// Any other kind supplied by the caller
    Other(String),
}

impl IssueKind {
    /// Wire name of this kind
    pub fn as_str(&self) -> &str {
        match self {
            IssueKind::StructureError => "structure_error",
            IssueKind::TypeError => "type_error",
            IssueKind::FormatError => "format_error",
            IssueKind::LowConfidence => "low_confidence",
            IssueKind::MissingField => "missing_field",
            IssueKind::EmptyField => "empty_field",
            IssueKind::LlmFlag => "llm_flag",
            IssueKind::FatalError => "fatal_error",
            IssueKind::Other(name) => name,
        }
    }

    /// Parse a wire name; unknown names become [`IssueKind::Other`]
    pub fn parse(name: &str) -> Self {
        match name {
            "structure_error" => IssueKind::StructureError,
            "type_error" => IssueKind::TypeError,
            "format_error" => IssueKind::FormatError,
            "low_confidence" => IssueKind::LowConfidence,
            "missing_field" => IssueKind::MissingField,
            "empty_field" => IssueKind::EmptyField,
            "llm_flag" => IssueKind::LlmFlag,
            "fatal_error" => IssueKind::FatalError,
            other => IssueKind::Other(other.to_string()),
        }
    }

    /// Whether issues of this kind make a document invalid
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            IssueKind::StructureError | IssueKind::TypeError | IssueKind::FormatError
        )
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for IssueKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for IssueKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(IssueKind::parse(&name))
    }
}

/// A single typed, severity-ranked validation finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue kind (absent on some upstream issues)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<IssueKind>,

    /// Path of the affected field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldPath>,

    /// Human-readable description
    #[serde(default)]
    pub message: String,

    /// Severity (absent counts as medium)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    /// Confidence of the affected field, for confidence issues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Issue {
    /// Create an issue at a field path
    ///
    /// The root path is recorded as an absent field.
    pub fn new(
        kind: IssueKind,
        field: &FieldPath,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            kind: Some(kind),
            field: (!field.is_root()).then(|| field.clone()),
            message: message.into(),
            severity: Some(severity),
            confidence: None,
        }
    }

    /// Attach a confidence value
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Issue flagged by the upstream extraction model
    pub fn llm_flag(message: impl Into<String>) -> Self {
        Self {
            kind: Some(IssueKind::LlmFlag),
            field: None,
            message: message.into(),
            severity: Some(Severity::Medium),
            confidence: None,
        }
    }

    /// Issue recording that processing failed outright
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            kind: Some(IssueKind::FatalError),
            field: None,
            message: message.into(),
            severity: Some(Severity::Critical),
            confidence: None,
        }
    }

    /// Kind name used for grouping, `unknown` when absent
    pub fn kind_name(&self) -> &str {
        self.kind.as_ref().map(IssueKind::as_str).unwrap_or(UNKNOWN_KIND)
    }

    /// Severity with the medium default applied
    pub fn effective_severity(&self) -> Severity {
        self.severity.unwrap_or(Severity::Medium)
    }
}

/// Presence and confidence of one extracted field
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Whether the field holds a non-empty value
    #[serde(default)]
    pub has_value: bool,

    /// Trust in the extracted value, in `[0, 1]`
    #[serde(default)]
    pub confidence: f64,
}

impl FieldMetadata {
    /// Metadata for a populated field
    pub fn present(confidence: f64) -> Self {
        Self {
            has_value: true,
            confidence,
        }
    }

    /// Metadata for a field without a value
    pub fn absent() -> Self {
        Self {
            has_value: false,
            confidence: 0.0,
        }
    }
}

/// Summary counts and rates over one validation run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub total_fields: usize,
    pub populated_fields: usize,
    pub empty_fields: usize,
    pub population_rate: f64,
    pub total_issues: usize,
    /// Issue counts by kind name
    pub issue_types: BTreeMap<String, usize>,
    /// Issue counts by severity name
    pub severity_counts: BTreeMap<String, usize>,
    pub average_confidence: f64,
}

/// Result of validating one populated document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True iff there are no structural, type or format errors
    pub is_valid: bool,

    /// Structural, type and format errors
    pub validation_errors: Vec<Issue>,

    /// Upstream issues, then validation errors, then advisory issues
    pub all_issues: Vec<Issue>,

    /// Aggregated statistics
    pub statistics: Statistics,
}

impl ValidationReport {
    /// Issues that do not affect validity (completeness, confidence, upstream)
    pub fn advisory_issues(&self) -> impl Iterator<Item = &Issue> {
        self.all_issues
            .iter()
            .filter(|issue| !issue.kind.as_ref().is_some_and(IssueKind::is_blocking))
    }

    /// Issues of a given kind, in report order
    pub fn issues_of_kind<'a>(&'a self, kind: &'a IssueKind) -> impl Iterator<Item = &'a Issue> {
        self.all_issues
            .iter()
            .filter(move |issue| issue.kind.as_ref() == Some(kind))
    }
}

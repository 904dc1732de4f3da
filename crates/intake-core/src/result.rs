//! Final processing result document
//!
//! Embeds a validation report together with the (pruned) client profile, the
//! field metadata it was computed from and some processing information.

use crate::metadata::prune_empty;
use crate::types::{FieldMetadataMap, Issue, Statistics, ValidationReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Output document of one processing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// Populated profile with empty values removed
    pub client_profile: Value,

    /// Per-field metadata used for validation
    pub field_metadata: FieldMetadataMap,

    /// Every issue of the report, in report order
    pub issues_for_review: Vec<Issue>,

    /// Validity and statistics
    pub validation: ValidationSummary,

    /// When and how the result was produced
    pub processing_info: ProcessingInfo,
}

/// Validation outcome embedded in a [`ProcessingResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub is_valid: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
}

/// Processing details embedded in a [`ProcessingResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingInfo {
    pub timestamp: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_seconds: Option<f64>,

    /// Where the populated document came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessingResult {
    /// Build the result of a completed validation run
    pub fn from_report(
        populated: &Value,
        field_metadata: FieldMetadataMap,
        report: ValidationReport,
        elapsed: Duration,
        source: Option<String>,
    ) -> Self {
        Self {
            client_profile: prune_empty(populated),
            field_metadata,
            issues_for_review: report.all_issues,
            validation: ValidationSummary {
                is_valid: report.is_valid,
                statistics: Some(report.statistics),
            },
            processing_info: ProcessingInfo {
                timestamp: Utc::now(),
                processing_time_seconds: Some(round_centis(elapsed.as_secs_f64())),
                source,
                error: None,
            },
        }
    }

    /// Build the result of a run that could not complete
    ///
    /// The profile falls back to the target schema and the only issue is a
    /// critical `fatal_error`.
    pub fn failure(message: impl Into<String>, target: &Value) -> Self {
        let message = message.into();
        Self {
            client_profile: target.clone(),
            field_metadata: FieldMetadataMap::new(),
            issues_for_review: vec![Issue::fatal(message.clone())],
            validation: ValidationSummary {
                is_valid: false,
                statistics: None,
            },
            processing_info: ProcessingInfo {
                timestamp: Utc::now(),
                processing_time_seconds: None,
                source: None,
                error: Some(message),
            },
        }
    }

    /// Convert to pretty-printed JSON
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn round_centis(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationConfig;
    use crate::metadata::build_field_metadata;
    use crate::types::{IssueKind, Severity};
    use crate::validation::Validator;
    use serde_json::json;

    #[test]
    fn test_from_report_prunes_profile() {
        let target = json!({"name": "", "dob": ""});
        let populated = json!({"name": "Ada", "dob": ""});
        let metadata = build_field_metadata(&populated);
        let report = Validator::new(ValidationConfig::default())
            .unwrap()
            .validate(&populated, &target, &metadata, &[])
            .unwrap();

        let result = ProcessingResult::from_report(
            &populated,
            metadata,
            report,
            Duration::from_millis(1234),
            Some("intake.json".to_string()),
        );

        assert_eq!(result.client_profile, json!({"name": "Ada"}));
        assert!(result.validation.is_valid);
        assert_eq!(result.issues_for_review.len(), 1);
        assert_eq!(result.issues_for_review[0].kind, Some(IssueKind::EmptyField));
        assert_eq!(result.processing_info.processing_time_seconds, Some(1.23));
        assert_eq!(result.field_metadata.len(), 2);
    }

    #[test]
    fn test_failure_result() {
        let target = json!({"name": ""});
        let result = ProcessingResult::failure("No valid documents found", &target);

        assert!(!result.validation.is_valid);
        assert_eq!(result.client_profile, target);
        assert_eq!(result.issues_for_review.len(), 1);
        assert_eq!(result.issues_for_review[0].severity, Some(Severity::Critical));
        assert_eq!(
            result.processing_info.error.as_deref(),
            Some("No valid documents found")
        );

        let value = serde_json::to_value(&result).unwrap();
        assert!(value["validation"].get("statistics").is_none());
    }
}

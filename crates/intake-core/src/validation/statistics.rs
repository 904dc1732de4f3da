//! Summary statistics over metadata and issues

use crate::types::{FieldMetadataMap, Issue, Severity, Statistics};
use std::collections::BTreeMap;

/// Reduce the metadata map and the combined issue list to summary counts
pub fn aggregate(metadata: &FieldMetadataMap, all_issues: &[Issue]) -> Statistics {
    let total_fields = metadata.len();
    let populated_fields = metadata.values().filter(|meta| meta.has_value).count();

    let mut issue_types: BTreeMap<String, usize> = BTreeMap::new();
    let mut severity_counts: BTreeMap<String, usize> = [Severity::High, Severity::Medium, Severity::Low]
        .iter()
        .map(|severity| (severity.to_string(), 0))
        .collect();

    for issue in all_issues {
        *issue_types.entry(issue.kind_name().to_string()).or_insert(0) += 1;
        *severity_counts
            .entry(issue.effective_severity().to_string())
            .or_insert(0) += 1;
    }

    let confidence_sum: f64 = metadata.values().map(|meta| meta.confidence).sum();

    Statistics {
        total_fields,
        populated_fields,
        empty_fields: total_fields - populated_fields,
        population_rate: ratio(populated_fields as f64, total_fields),
        total_issues: all_issues.len(),
        issue_types,
        severity_counts,
        average_confidence: ratio(confidence_sum, total_fields),
    }
}

fn ratio(numerator: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        numerator / count as f64
    }
}

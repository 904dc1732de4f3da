//! Human-readable rendering of validation reports

use crate::types::{Severity, ValidationReport};

/// Number of issues listed by default in a summary
pub const DEFAULT_SUMMARY_ISSUES: usize = 5;

/// Generate a plain-text summary of a report
pub fn render_summary(report: &ValidationReport, max_issues: usize) -> String {
    let stats = &report.statistics;
    let mut summary = String::new();

    summary.push_str("=== Validation Summary ===\n\n");
    summary.push_str(&format!(
        "Status: {}\n",
        if report.is_valid { "PASSED" } else { "FAILED" }
    ));
    summary.push_str(&format!(
        "Population Rate: {:.1}% ({} of {} fields)\n",
        stats.population_rate * 100.0,
        stats.populated_fields,
        stats.total_fields
    ));
    summary.push_str(&format!("Average Confidence: {:.2}\n", stats.average_confidence));
    summary.push_str(&format!("Total Issues: {}\n", stats.total_issues));

    // Fixed severities first, then anything else in name order.
    let fixed = [Severity::High, Severity::Medium, Severity::Low].map(|s| s.as_str());
    let mut severity_line: Vec<String> = fixed
        .iter()
        .map(|name| format!("{} {}", stats.severity_counts.get(*name).copied().unwrap_or(0), name))
        .collect();
    severity_line.extend(
        stats
            .severity_counts
            .iter()
            .filter(|(name, _)| !fixed.contains(&name.as_str()))
            .map(|(name, count)| format!("{} {}", count, name)),
    );
    summary.push_str(&format!("Severity: {}\n", severity_line.join(", ")));

    if !report.all_issues.is_empty() {
        summary.push_str("\nKey Issues:\n");
        for issue in report.all_issues.iter().take(max_issues) {
            summary.push_str(&format!(
                "  - [{}] {}\n",
                issue.effective_severity(),
                issue.message
            ));
        }
        if report.all_issues.len() > max_issues {
            summary.push_str(&format!(
                "  ... and {} more\n",
                report.all_issues.len() - max_issues
            ));
        }
    }

    summary
}

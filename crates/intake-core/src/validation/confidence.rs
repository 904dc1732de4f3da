//! Low-confidence flagging over the flat metadata map

use crate::types::{FieldMetadataMap, Issue, IssueKind, Severity};

/// Flag populated fields whose confidence is below `threshold`
///
/// Fields without a value are never flagged here; their absence is reported
/// by the completeness scan.
pub fn flag_low_confidence(metadata: &FieldMetadataMap, threshold: f64) -> Vec<Issue> {
    metadata
        .iter()
        .filter(|(_, meta)| meta.has_value && meta.confidence < threshold)
        .map(|(path, meta)| {
            Issue::new(
                IssueKind::LowConfidence,
                path,
                format!(
                    "Confidence {:.2} below threshold {:?}",
                    meta.confidence, threshold
                ),
                Severity::Medium,
            )
            .with_confidence(meta.confidence)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::FieldPath;
    use crate::types::FieldMetadata;

    fn metadata(entries: &[(&str, FieldMetadata)]) -> FieldMetadataMap {
        entries
            .iter()
            .map(|(path, meta)| (FieldPath::parse(path), *meta))
            .collect()
    }

    #[test]
    fn test_flags_low_confidence_value() {
        let meta = metadata(&[("f", FieldMetadata::present(0.3))]);
        let issues = flag_low_confidence(&meta, 0.5);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, Some(IssueKind::LowConfidence));
        assert_eq!(issues[0].field, Some(FieldPath::parse("f")));
        assert_eq!(issues[0].confidence, Some(0.3));
        assert_eq!(issues[0].message, "Confidence 0.30 below threshold 0.5");
    }

    #[test]
    fn test_whole_threshold_keeps_decimal() {
        let meta = metadata(&[("f", FieldMetadata::present(0.75))]);
        let issues = flag_low_confidence(&meta, 1.0);
        assert_eq!(issues[0].message, "Confidence 0.75 below threshold 1.0");
    }

    #[test]
    fn test_ignores_fields_without_value() {
        let meta = metadata(&[("g", FieldMetadata::absent())]);
        assert!(flag_low_confidence(&meta, 0.5).is_empty());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let meta = metadata(&[("f", FieldMetadata::present(0.5))]);
        assert!(flag_low_confidence(&meta, 0.5).is_empty());
    }

    #[test]
    fn test_output_follows_path_order() {
        let meta = metadata(&[
            ("b.z", FieldMetadata::present(0.1)),
            ("a", FieldMetadata::present(0.2)),
            ("b.a", FieldMetadata::present(0.9)),
        ]);
        let fields: Vec<_> = flag_low_confidence(&meta, 0.5)
            .into_iter()
            .map(|issue| issue.field.unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["a", "b.z"]);
    }
}

//! Report assembly and the Validator entry point
//!
//! The [`Validator`] runs the four independent passes over the same inputs
//! and merges their results in a fixed order:
//!
//! ```text
//! all_issues = existing_issues ++ (structure ++ rules) ++ (confidence ++ completeness)
//! ```
//!
//! The passes share no state, so they may also run on scoped worker threads
//! ([`Validator::validate_concurrent`]); the merged report is identical.

use crate::config::{check_unit_interval, ValidationConfig};
use crate::error::{Error, Result};
use crate::types::{FieldMetadataMap, Issue, ValidationReport};
use super::completeness::check_completeness;
use super::confidence::flag_low_confidence;
use super::rules::{apply_rules, RuleRegistry};
use super::statistics::aggregate;
use super::structure::compare;
use serde_json::Value;
use std::thread;
use tracing::{debug, info, instrument};

/// Validates populated documents against a target shape
///
/// A validator holds only its configuration and rule registry; it can be
/// shared across threads and called concurrently for different documents.
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
    rules: RuleRegistry,
}

/// Issue lists produced by the individual passes
struct PassResults {
    structure: Vec<Issue>,
    rules: Vec<Issue>,
    confidence: Vec<Issue>,
    completeness: Vec<Issue>,
}

impl Validator {
    /// Create a validator with the standard client-profile rules
    pub fn new(config: ValidationConfig) -> Result<Self> {
        Self::with_rules(config, RuleRegistry::standard()?)
    }

    /// Create a validator with a custom rule registry
    pub fn with_rules(config: ValidationConfig, rules: RuleRegistry) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, rules })
    }

    /// Manual review threshold applied by the confidence pass
    pub fn threshold(&self) -> f64 {
        self.config.require_manual_review_threshold
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    /// Validate a populated document and build the report
    #[instrument(skip_all, fields(fields = metadata.len(), existing = existing_issues.len()))]
    pub fn validate(
        &self,
        populated: &Value,
        target: &Value,
        metadata: &FieldMetadataMap,
        existing_issues: &[Issue],
    ) -> Result<ValidationReport> {
        check_metadata(metadata)?;

        let results = PassResults {
            structure: compare(populated, target),
            rules: apply_rules(populated, &self.rules),
            confidence: flag_low_confidence(metadata, self.threshold()),
            completeness: check_completeness(populated, target),
        };

        Ok(assemble(results, metadata, existing_issues))
    }

    /// Validate with each pass on its own scoped thread
    ///
    /// Produces the same report as [`Validator::validate`].
    #[instrument(skip_all, fields(fields = metadata.len(), existing = existing_issues.len()))]
    pub fn validate_concurrent(
        &self,
        populated: &Value,
        target: &Value,
        metadata: &FieldMetadataMap,
        existing_issues: &[Issue],
    ) -> Result<ValidationReport> {
        check_metadata(metadata)?;
        let threshold = self.threshold();

        let results = thread::scope(|scope| {
            let structure = scope.spawn(|| compare(populated, target));
            let rules = scope.spawn(|| apply_rules(populated, &self.rules));
            let confidence = scope.spawn(|| flag_low_confidence(metadata, threshold));
            let completeness = scope.spawn(|| check_completeness(populated, target));

            // Every handle is joined before any error is returned.
            let structure = join_pass("structure", structure);
            let rules = join_pass("rules", rules);
            let confidence = join_pass("confidence", confidence);
            let completeness = join_pass("completeness", completeness);

            Ok::<_, Error>(PassResults {
                structure: structure?,
                rules: rules?,
                confidence: confidence?,
                completeness: completeness?,
            })
        })?;

        Ok(assemble(results, metadata, existing_issues))
    }
}

fn join_pass(name: &str, handle: thread::ScopedJoinHandle<'_, Vec<Issue>>) -> Result<Vec<Issue>> {
    handle.join().map_err(|_| Error::Internal {
        message: format!("{} pass panicked", name),
        source: anyhow::anyhow!("worker thread for the {} pass did not complete", name),
    })
}

/// Reject confidence values outside `[0, 1]`
fn check_metadata(metadata: &FieldMetadataMap) -> Result<()> {
    for (path, meta) in metadata {
        check_unit_interval(&format!("metadata.{}.confidence", path), meta.confidence)?;
    }
    Ok(())
}

fn assemble(
    results: PassResults,
    metadata: &FieldMetadataMap,
    existing_issues: &[Issue],
) -> ValidationReport {
    debug!(
        structure = results.structure.len(),
        rules = results.rules.len(),
        confidence = results.confidence.len(),
        completeness = results.completeness.len(),
        "Validation passes finished"
    );

    let mut validation_errors = results.structure;
    validation_errors.extend(results.rules);

    let mut additional_issues = results.confidence;
    additional_issues.extend(results.completeness);

    let mut all_issues =
        Vec::with_capacity(existing_issues.len() + validation_errors.len() + additional_issues.len());
    all_issues.extend_from_slice(existing_issues);
    all_issues.extend(validation_errors.iter().cloned());
    all_issues.extend(additional_issues);

    let statistics = aggregate(metadata, &all_issues);
    let is_valid = validation_errors.is_empty();

    info!(
        "Validation complete: {} ({} total issues)",
        if is_valid { "PASSED" } else { "FAILED" },
        all_issues.len()
    );

    ValidationReport {
        is_valid,
        validation_errors,
        all_issues,
        statistics,
    }
}

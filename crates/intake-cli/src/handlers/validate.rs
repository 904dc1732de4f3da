//! Validation command handler

use super::utils::{load_file, load_issues, load_metadata, to_file_content};
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::{redaction, timing::Timer};
use crate::output::OutputWriter;
use intake_core::{
    build_field_metadata, FieldMetadataMap, Issue, ProcessingResult, ValidationReport, Validator,
};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Handle the validate command
#[instrument(skip(config, output), fields(file = %args.populated.display(), schema = %args.schema.display()))]
pub async fn handle_validate(
    args: ValidateArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let timer = Timer::with_details(
        "validate_command",
        &format!("file: {}", args.populated.display()),
    );
    output.info(&format!("Validating profile: {}", args.populated.display()))?;

    let populated: Value = load_file(&args.populated).await?;
    let target: Value = load_file(&args.schema).await?;
    debug!(profile = %redaction::redacted_json(&populated), "Loaded populated profile");

    let metadata = match &args.metadata {
        Some(path) => load_metadata(path).await?,
        None => {
            debug!("No metadata file given, building metadata from the profile");
            build_field_metadata(&populated)
        }
    };
    let existing_issues = match &args.issues {
        Some(path) => load_issues(path).await?,
        None => Vec::new(),
    };

    let mut validation_config = config.validation.clone();
    if let Some(threshold) = args.threshold {
        validation_config = validation_config.with_review_threshold(threshold);
    }
    let validator = Validator::new(validation_config)?;
    info!(
        threshold = validator.threshold(),
        fields = metadata.len(),
        existing_issues = existing_issues.len(),
        concurrent = args.concurrent,
        "Starting validation"
    );

    let spinner = output.spinner("Validating profile...");
    let run = run_validation(
        validator,
        populated,
        target,
        metadata,
        existing_issues,
        args.concurrent,
    )
    .await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let (report, populated, metadata) = run?;

    output.report(&report, config.output.summary_issues)?;
    if !report.statistics.issue_types.is_empty() {
        output.section("Issues by Type")?;
        let rows = report
            .statistics
            .issue_types
            .iter()
            .map(|(kind, count)| vec![kind.clone(), count.to_string()])
            .collect();
        output.table(&["Type", "Count"], rows)?;
    }

    if let Some(path) = &args.save_to {
        let result = ProcessingResult::from_report(
            &populated,
            metadata,
            report.clone(),
            timer.elapsed(),
            Some(args.populated.display().to_string()),
        );
        tokio::fs::write(path, to_file_content(path, &result)?).await?;
        output.success(&format!("✓ Result saved to {}", path.display()))?;
    }

    if report.is_valid {
        output.success("✓ Profile is valid")?;
        Ok(())
    } else {
        warn!(
            errors = report.validation_errors.len(),
            "Validation failed"
        );
        Err(Error::ValidationFailed {
            count: report.validation_errors.len(),
        })
    }
}

/// Run the validator off the async runtime
///
/// The inputs are handed back so the caller can build a processing result.
async fn run_validation(
    validator: Validator,
    populated: Value,
    target: Value,
    metadata: FieldMetadataMap,
    existing_issues: Vec<Issue>,
    concurrent: bool,
) -> Result<(ValidationReport, Value, FieldMetadataMap)> {
    let _timer = Timer::new("validation");

    let joined = tokio::task::spawn_blocking(move || {
        let report = if concurrent {
            validator.validate_concurrent(&populated, &target, &metadata, &existing_issues)
        } else {
            validator.validate(&populated, &target, &metadata, &existing_issues)
        };
        report.map(|report| (report, populated, metadata))
    })
    .await
    .map_err(|e| Error::other(format!("Validation task failed: {}", e)))?;

    Ok(joined?)
}

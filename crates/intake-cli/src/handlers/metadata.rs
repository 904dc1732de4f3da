//! Metadata command handler

use super::utils::load_file;
use crate::cli::MetadataArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use intake_core::build_field_metadata;
use serde_json::Value;
use tracing::{info, instrument};

/// Handle the metadata command
#[instrument(skip(output), fields(file = %args.populated.display()))]
pub async fn handle_metadata(args: MetadataArgs, output: &mut OutputWriter) -> Result<()> {
    let populated: Value = load_file(&args.populated).await?;
    let mut metadata = build_field_metadata(&populated);

    if args.empty_only {
        metadata.retain(|_, meta| !meta.has_value);
    }
    info!(fields = metadata.len(), "Built field metadata");

    output.metadata(&metadata)?;
    Ok(())
}

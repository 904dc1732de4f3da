//! Shared utilities for command handlers

use crate::error::{Error, Result};
use intake_core::{FieldMetadataMap, Issue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Whether a path names a YAML file
pub fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false)
}

/// Read and parse a JSON or YAML file, chosen by extension
pub async fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = tokio::fs::read_to_string(path).await?;
    debug!(path = %path.display(), bytes = content.len(), "Read input file");

    if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
            reason: e.to_string(),
        })
    } else {
        serde_json::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
            reason: e.to_string(),
        })
    }
}

/// Upstream issue entry: a full issue object or a bare message
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IssueEntry {
    Message(String),
    Issue(Issue),
}

impl From<IssueEntry> for Issue {
    fn from(entry: IssueEntry) -> Self {
        match entry {
            IssueEntry::Message(message) => Issue::llm_flag(message),
            IssueEntry::Issue(issue) => issue,
        }
    }
}

/// Load upstream issues; bare messages become medium `llm_flag` issues
pub async fn load_issues(path: &Path) -> Result<Vec<Issue>> {
    let entries: Vec<IssueEntry> = load_file(path).await?;
    Ok(entries.into_iter().map(Issue::from).collect())
}

/// Load a per-field metadata map
pub async fn load_metadata(path: &Path) -> Result<FieldMetadataMap> {
    load_file(path).await
}

/// Serialize a value for a file, as YAML or pretty JSON by extension
pub fn to_file_content<T: serde::Serialize>(path: &Path, value: &T) -> Result<String> {
    if is_yaml(path) {
        Ok(serde_yaml::to_string(value)?)
    } else {
        Ok(serde_json::to_string_pretty(value)?)
    }
}

//! Logging utilities for the Intake CLI
//!
//! This module provides:
//! - Request ID generation and tracking
//! - Redaction of sensitive client data
//! - Performance timing spans
//! - Structured logging setup

use crate::config::LoggingOptions;
use crate::error::{Error, Result};
use is_terminal::IsTerminal;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{field, Span};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Global request ID for the current session
static REQUEST_ID: OnceLock<String> = OnceLock::new();

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter
    pub level: String,
    /// Output format: compact, full, json
    pub format: LogFormat,
    /// Enable console output
    pub console: bool,
    /// Optional file output path
    pub file: Option<PathBuf>,
    /// Include thread IDs
    pub thread_ids: bool,
    /// Include file and line numbers
    pub source_location: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact format for production
    Compact,
    /// Full format with all details
    Full,
    /// JSON structured format
    Json,
}

impl LogFormat {
    /// Parse a format name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "compact" => Some(LogFormat::Compact),
            "full" => Some(LogFormat::Full),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            console: true,
            file: None,
            thread_ids: false,
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Create logging config from verbosity level
    pub fn from_verbosity(verbosity: u8) -> Self {
        let mut config = Self::default();

        match verbosity {
            0 => {
                config.level = "warn".to_string();
            }
            1 => {
                config.level = "info".to_string();
            }
            2 => {
                config.level = "debug".to_string();
                config.source_location = true;
            }
            _ => {
                config.level = "trace".to_string();
                config.format = LogFormat::Full;
                config.source_location = true;
                config.thread_ids = true;
            }
        }

        config
    }

    /// Apply settings from the configuration file
    pub fn merge_with_options(&mut self, options: &LoggingOptions) {
        if let Some(format) = LogFormat::parse(&options.format) {
            self.format = format;
        }
        if options.file.is_some() {
            self.file = options.file.clone();
        }
    }

    /// Apply environment overrides
    pub fn merge_with_env(&mut self) {
        // RUST_LOG takes precedence
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            self.level = rust_log;
        }

        if let Ok(format) = std::env::var("INTAKE_LOG_FORMAT") {
            match LogFormat::parse(&format) {
                Some(format) => self.format = format,
                None => eprintln!("Invalid log format: {}, using default", format),
            }
        }

        if let Ok(file) = std::env::var("INTAKE_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }

        if let Ok(console) = std::env::var("INTAKE_LOG_CONSOLE") {
            self.console = console.to_lowercase() == "true" || console == "1";
        }
    }

    /// Writer for log events: the log file when configured, stderr otherwise
    fn make_writer(&self) -> Result<BoxMakeWriter> {
        let Some(path) = &self.file else {
            return Ok(BoxMakeWriter::new(std::io::stderr));
        };

        let file_name = path
            .file_name()
            .ok_or_else(|| Error::config(format!("Invalid log file path: {}", path.display())))?;
        let directory = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name.to_string_lossy())
            .build(&directory)
            .map_err(|e| Error::config(format!("Cannot open log file {}: {}", path.display(), e)))?;

        Ok(BoxMakeWriter::new(appender))
    }

    fn use_ansi(&self) -> bool {
        self.console && self.file.is_none() && std::io::stderr().is_terminal()
    }
}

/// Initialize the global logging system
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let env_filter = create_env_filter(&config);
    let writer = config.make_writer()?;

    // Each format yields a different subscriber type.
    match config.format {
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .with_target(true)
                .with_ansi(config.use_ansi())
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .compact()
                .finish();

            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;
        }
        LogFormat::Json => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .json()
                .finish();

            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;
        }
        LogFormat::Full => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .with_target(true)
                .with_ansi(config.use_ansi())
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .finish();

            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;
        }
    }

    let request_id = generate_request_id();
    REQUEST_ID.set(request_id.clone()).map_err(|_| {
        Error::other("Failed to set request ID - request tracking may not work correctly")
    })?;

    tracing::info!(
        request_id = %request_id,
        config = ?config,
        "Logging system initialized"
    );

    Ok(())
}

/// Create environment filter based on configuration
fn create_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Generate a unique request ID for this session
pub fn generate_request_id() -> String {
    format!("req_{}", Uuid::new_v4().simple())
}

/// Get the current request ID
pub fn current_request_id() -> Option<&'static str> {
    REQUEST_ID.get().map(|s| s.as_str())
}

/// Create a span with request ID and timing
pub fn create_operation_span(operation: &str, details: Option<&str>) -> Span {
    tracing::info_span!(
        "operation",
        operation = operation,
        request_id = current_request_id().unwrap_or("unknown"),
        details = details.unwrap_or(""),
        duration_ms = field::Empty,
    )
}

/// Redaction of client data before it reaches the logs
pub mod redaction {
    use regex::Regex;
    use serde_json::Value;
    use std::sync::OnceLock;

    const MASK: &str = "***";

    /// Key fragments that mark a profile field as sensitive
    const SENSITIVE_KEY_FRAGMENTS: &[&str] = &[
        "ssn",
        "social_security",
        "tax_id",
        "taxpayer",
        "account_number",
        "routing_number",
        "password",
        "passwd",
        "secret",
        "token",
        "api_key",
    ];

    static SSN_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    static ACCOUNT_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

    fn ssn_regex() -> Option<&'static Regex> {
        SSN_REGEX
            .get_or_init(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").ok())
            .as_ref()
    }

    fn account_regex() -> Option<&'static Regex> {
        ACCOUNT_REGEX
            .get_or_init(|| Regex::new(r"\b\d{9,17}\b").ok())
            .as_ref()
    }

    /// Redact identifiers embedded in free text
    ///
    /// Social security numbers and long digit runs (account and routing
    /// numbers) are masked.
    pub fn redact_sensitive(input: &str) -> String {
        let mut result = input.to_string();

        if let Some(regex) = ssn_regex() {
            result = regex.replace_all(&result, "***-**-****").to_string();
        }
        if let Some(regex) = account_regex() {
            result = regex.replace_all(&result, MASK).to_string();
        }

        result
    }

    /// Redact sensitive fields of a profile document in place
    pub fn redact_json_value(value: &mut Value) {
        match value {
            Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    if is_sensitive_key(key) && !val.is_null() {
                        *val = Value::String(MASK.to_string());
                    } else {
                        redact_json_value(val);
                    }
                }
            }
            Value::Array(items) => {
                for item in items.iter_mut() {
                    redact_json_value(item);
                }
            }
            Value::String(s) => {
                *s = redact_sensitive(s);
            }
            _ => {}
        }
    }

    /// Redacted copy of any serializable value, for tracing
    pub fn redacted_json<T: serde::Serialize>(value: &T) -> String {
        match serde_json::to_value(value) {
            Ok(mut json) => {
                redact_json_value(&mut json);
                json.to_string()
            }
            Err(_) => "[failed to serialize]".to_string(),
        }
    }

    fn is_sensitive_key(key: &str) -> bool {
        let key_lower = key.to_lowercase();
        SENSITIVE_KEY_FRAGMENTS
            .iter()
            .any(|fragment| key_lower.contains(fragment))
    }
}

/// Performance timing utilities
pub mod timing {
    use std::time::{Duration, Instant};
    use tracing::Span;

    /// A timer that automatically logs duration when dropped
    pub struct Timer {
        start: Instant,
        span: Span,
        operation: String,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation, None),
                operation: operation.to_string(),
            }
        }

        pub fn with_details(operation: &str, details: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation, Some(details)),
                operation: operation.to_string(),
            }
        }

        /// Get elapsed time without finishing the timer
        pub fn elapsed(&self) -> Duration {
            self.start.elapsed()
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let duration = self.start.elapsed();
            self.span.record("duration_ms", duration.as_millis() as u64);

            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration.as_millis(),
                "Operation completed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_redaction() {
        let input = "SSN 123-45-6789 on file, account 000123456789 at branch 42";
        let redacted = redaction::redact_sensitive(input);
        assert!(redacted.contains("***-**-****"));
        assert!(!redacted.contains("123-45-6789"));
        assert!(!redacted.contains("000123456789"));
        assert!(redacted.contains("branch 42"));
    }

    #[test]
    fn test_profile_redaction() {
        let mut value = json!({
            "general_information": {
                "client_1": {"first_name": "Ada", "ssn": "123456789", "tax_id_number": ""},
            },
            "accounts": [{"Account_Number": "9876", "type": "checking"}],
            "notes": "spouse SSN 987-65-4321"
        });

        redaction::redact_json_value(&mut value);

        assert_eq!(value["general_information"]["client_1"]["first_name"], "Ada");
        assert_eq!(value["general_information"]["client_1"]["ssn"], "***");
        assert_eq!(value["general_information"]["client_1"]["tax_id_number"], "***");
        assert_eq!(value["accounts"][0]["Account_Number"], "***");
        assert_eq!(value["accounts"][0]["type"], "checking");
        assert_eq!(value["notes"], "spouse SSN ***-**-****");
    }

    #[test]
    fn test_null_sensitive_fields_stay_null() {
        let mut value = json!({"ssn": null});
        redaction::redact_json_value(&mut value);
        assert!(value["ssn"].is_null());
    }

    #[test]
    fn test_logging_config_from_verbosity() {
        let config = LoggingConfig::from_verbosity(0);
        assert_eq!(config.level, "warn");
        assert!(!config.source_location);

        let config = LoggingConfig::from_verbosity(2);
        assert_eq!(config.level, "debug");
        assert!(config.source_location);

        let config = LoggingConfig::from_verbosity(3);
        assert_eq!(config.level, "trace");
        assert_eq!(config.format, LogFormat::Full);
        assert!(config.thread_ids);
    }

    #[test]
    fn test_merge_with_options() {
        let mut config = LoggingConfig::default();
        config.merge_with_options(&LoggingOptions {
            format: "JSON".to_string(),
            file: Some(PathBuf::from("logs/intake.log")),
        });
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file, Some(PathBuf::from("logs/intake.log")));
        assert!(!config.use_ansi());
    }

    #[test]
    fn test_request_id_format() {
        let id = generate_request_id();
        assert!(id.starts_with("req_"));
        assert_eq!(id.len(), 4 + 32);
    }
}

//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialized
//! support for validation reports and field metadata.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use intake_core::{render_summary, FieldMetadataMap, Severity, ValidationReport};
use is_terminal::IsTerminal;
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, trace};

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a validation report, listing at most `max_issues` issues
    /// in the human-readable form
    fn format_report(&self, report: &ValidationReport, max_issues: usize) -> Result<String>;

    /// Format a field metadata map
    fn format_metadata(&self, metadata: &FieldMetadataMap) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // Human output falls back to pretty JSON for arbitrary data
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_report(&self, report: &ValidationReport, max_issues: usize) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(render_summary(report, max_issues)),
            _ => self.format(report),
        }
    }

    fn format_metadata(&self, metadata: &FieldMetadataMap) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_metadata_human(metadata)),
            _ => self.format(metadata),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && io::stdout().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[allow(dead_code)]
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false,
            quiet,
            writer,
        }
    }

    /// Turn progress indicators off regardless of the terminal
    pub fn disable_progress(&mut self) {
        self.show_progress = false;
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write a validation report
    ///
    /// The human form colors the status line and each issue by severity.
    pub fn report(&mut self, report: &ValidationReport, max_issues: usize) -> Result<()> {
        trace!("Outputting report: {}", redaction::redacted_json(report));
        let formatted = self.format.format_report(report, max_issues)?;

        if self.format == OutputFormat::Human && self.use_color {
            let colored = formatted
                .lines()
                .map(colorize_summary_line)
                .collect::<Vec<_>>()
                .join("\n");
            return self.writeln(&colored);
        }

        self.emit(&formatted)
    }

    /// Write a field metadata map
    pub fn metadata(&mut self, metadata: &FieldMetadataMap) -> Result<()> {
        let formatted = self.format.format_metadata(metadata)?;
        self.emit(&formatted)
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(&header_row)?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| match widths.get(i) {
                    Some(width) => format!("{:width$}", cell, width = width),
                    None => cell.clone(),
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(row_str.trim_end())?;
        }

        Ok(())
    }

    /// Human output ends with a newline, machine formats are written as-is
    fn emit(&mut self, formatted: &str) -> Result<()> {
        if self.format == OutputFormat::Human {
            self.writeln(formatted.trim_end())
        } else {
            self.write(formatted)
        }
    }
}

/// Helper function to create a spinner style
pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Format field metadata as one line per field
fn format_metadata_human(metadata: &FieldMetadataMap) -> String {
    if metadata.is_empty() {
        return "No fields found\n".to_string();
    }

    let width = metadata
        .keys()
        .map(|path| path.to_string().chars().count())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for (path, meta) in metadata {
        output.push_str(&format!(
            "{:width$}  {}  {:.2}\n",
            path.to_string(),
            if meta.has_value { "present" } else { "empty  " },
            meta.confidence,
            width = width
        ));
    }
    output.push_str(&format!(
        "\n{} of {} fields populated\n",
        metadata.values().filter(|meta| meta.has_value).count(),
        metadata.len()
    ));
    output
}

/// Color one line of a rendered summary
fn colorize_summary_line(line: &str) -> String {
    if line.starts_with("Status: PASSED") {
        return line.green().bold().to_string();
    }
    if line.starts_with("Status: FAILED") {
        return line.red().bold().to_string();
    }
    if line.starts_with("===") {
        return line.bright_blue().to_string();
    }

    let tagged = |severity: Severity| format!("  - [{}]", severity);
    if line.starts_with(&tagged(Severity::Critical)) || line.starts_with(&tagged(Severity::High)) {
        line.red().to_string()
    } else if line.starts_with(&tagged(Severity::Medium)) {
        line.yellow().to_string()
    } else if line.starts_with(&tagged(Severity::Low)) {
        line.dimmed().to_string()
    } else {
        line.to_string()
    }
}

// Tests for output formatting
//
// These tests capture what the writer produces for validation reports and
// field metadata in each output format.

use super::*;
use intake_core::{build_field_metadata, ValidationConfig, Validator};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

/// Writer that keeps everything written to it
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let writer = OutputWriter::with_writer(format, false, quiet, Box::new(buffer.clone()));
    (writer, buffer)
}

fn sample_report() -> ValidationReport {
    let target = json!({"name": "", "address": {"zip": ""}});
    let populated = json!({"name": "", "address": {"zip": "12345"}});
    Validator::new(ValidationConfig::default())
        .unwrap()
        .validate(&populated, &target, &build_field_metadata(&populated), &[])
        .unwrap()
}

#[test]
fn test_report_human() {
    let (mut output, buffer) = writer(OutputFormat::Human, false);
    output.report(&sample_report(), 5).unwrap();

    let text = buffer.contents();
    assert!(text.contains("=== Validation Summary ==="));
    assert!(text.contains("Status: PASSED"));
    assert!(text.contains("  - [low] Field 'name' is empty"));
    assert!(text.ends_with('\n'));
}

#[test]
fn test_report_json_is_machine_readable() {
    let (mut output, buffer) = writer(OutputFormat::Json, false);
    output.report(&sample_report(), 5).unwrap();

    let value: serde_json::Value = serde_json::from_str(&buffer.contents()).unwrap();
    assert_eq!(value["is_valid"], json!(true));
    assert_eq!(value["all_issues"][0]["type"], json!("empty_field"));
    assert_eq!(value["statistics"]["total_fields"], json!(2));
}

#[test]
fn test_report_yaml() {
    let (mut output, buffer) = writer(OutputFormat::Yaml, false);
    output.report(&sample_report(), 5).unwrap();

    let text = buffer.contents();
    assert!(text.contains("is_valid: true"));
    assert!(text.contains("type: empty_field"));
}

#[test]
fn test_metadata_human() {
    let (mut output, buffer) = writer(OutputFormat::Human, false);
    let metadata = build_field_metadata(&json!({"name": "Ada", "address": {"zip": ""}}));
    output.metadata(&metadata).unwrap();

    let text = buffer.contents();
    assert!(text.contains("address.zip  empty    0.00"));
    assert!(text.contains("name         present  1.00"));
    assert!(text.contains("1 of 2 fields populated"));
}

#[test]
fn test_metadata_json_pretty() {
    let (mut output, buffer) = writer(OutputFormat::JsonPretty, false);
    let metadata = build_field_metadata(&json!({"name": "Ada"}));
    output.metadata(&metadata).unwrap();

    let value: serde_json::Value = serde_json::from_str(&buffer.contents()).unwrap();
    assert_eq!(value["name"]["has_value"], json!(true));
    assert_eq!(value["name"]["confidence"], json!(1.0));
}

#[test]
fn test_messages_suppressed_outside_human_format() {
    let (mut output, buffer) = writer(OutputFormat::Json, false);
    output.info("loading").unwrap();
    output.success("done").unwrap();
    output.warning("careful").unwrap();
    output.section("Details").unwrap();
    assert!(buffer.contents().is_empty());
}

#[test]
fn test_quiet_keeps_warnings() {
    let (mut output, buffer) = writer(OutputFormat::Human, true);
    output.info("loading").unwrap();
    output.success("done").unwrap();
    output.warning("careful").unwrap();
    assert_eq!(buffer.contents(), "WARNING: careful\n");
}

#[test]
fn test_table_alignment() {
    let (mut output, buffer) = writer(OutputFormat::Human, false);
    output
        .table(
            &["Kind", "Count"],
            vec![
                vec!["missing_field".to_string(), "3".to_string()],
                vec!["low_confidence".to_string(), "12".to_string()],
            ],
        )
        .unwrap();

    let lines: Vec<String> = buffer.contents().lines().map(str::to_string).collect();
    assert_eq!(lines[0], "Kind           │ Count");
    assert_eq!(lines[2], "missing_field  │ 3");
    assert_eq!(lines[3], "low_confidence │ 12");
}

#[test]
fn test_no_spinner_with_custom_writer() {
    let (output, _) = writer(OutputFormat::Human, false);
    assert!(output.spinner("validating").is_none());
}

#[test]
fn test_colorize_summary_line() {
    colored::control::set_override(false);
    assert_eq!(colorize_summary_line("Status: FAILED"), "Status: FAILED");
    assert_eq!(
        colorize_summary_line("  - [medium] a: Expected object, got array"),
        "  - [medium] a: Expected object, got array"
    );
    colored::control::unset_override();
}

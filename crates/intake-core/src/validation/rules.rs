//! Path-scoped field rules
//!
//! Rules are data: each [`FieldRule`] names a field path, a check, the issue
//! kind and severity to report, and a message template. Adding a rule is a
//! registry edit and never touches the other passes.
//!
//! A rule only fires when its path resolves in the populated document.
//! Message templates may use `{field}`, `{value}` and `{type}` placeholders.

use crate::error::{Error, Result};
use crate::node::{is_empty_value, scalar_text, type_name};
use crate::path::FieldPath;
use crate::types::{Issue, IssueKind, Severity};
use regex::Regex;
use serde_json::Value;

/// Four-digit year, two-digit month, two-digit day
pub const ISO_DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

/// US ZIP or ZIP+4
pub const US_ZIP_PATTERN: &str = r"^\d{5}(-\d{4})?$";

/// Predicate applied to the value at a rule's path
#[derive(Debug, Clone)]
pub enum RuleCheck {
    /// Value must be numeric; `null` is skipped
    Numeric,
    /// Value must be an array
    Array,
    /// Non-empty value, rendered as text, must match the pattern
    Pattern(Regex),
}

impl RuleCheck {
    /// Whether the check applies to the value at all
    fn applies_to(&self, value: &Value) -> bool {
        match self {
            RuleCheck::Numeric => !value.is_null(),
            RuleCheck::Array => true,
            RuleCheck::Pattern(_) => !is_empty_value(value),
        }
    }

    /// Whether the value satisfies the check
    fn accepts(&self, value: &Value) -> bool {
        match self {
            RuleCheck::Numeric => value.is_number(),
            RuleCheck::Array => value.is_array(),
            RuleCheck::Pattern(regex) => regex.is_match(&scalar_text(value)),
        }
    }
}

/// One declarative field rule
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub path: FieldPath,
    pub check: RuleCheck,
    pub kind: IssueKind,
    pub message: String,
    pub severity: Severity,
}

impl FieldRule {
    /// Value at `path` must be a number (or null)
    pub fn numeric(path: &str, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            path: FieldPath::parse(path),
            check: RuleCheck::Numeric,
            kind: IssueKind::TypeError,
            message: message.into(),
            severity,
        }
    }

    /// Value at `path` must be an array
    pub fn array(path: &str, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            path: FieldPath::parse(path),
            check: RuleCheck::Array,
            kind: IssueKind::TypeError,
            message: message.into(),
            severity,
        }
    }

    /// Non-empty value at `path` must match `pattern`
    pub fn pattern(
        path: &str,
        pattern: &str,
        message: impl Into<String>,
        severity: Severity,
    ) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| Error::Configuration {
            message: format!("invalid pattern for rule at '{}': {}", path, pattern),
            source: Some(e.into()),
        })?;

        Ok(Self {
            path: FieldPath::parse(path),
            check: RuleCheck::Pattern(regex),
            kind: IssueKind::FormatError,
            message: message.into(),
            severity,
        })
    }

    /// Evaluate the rule against a populated document
    pub fn evaluate(&self, populated: &Value) -> Option<Issue> {
        let value = self.path.resolve(populated)?;

        if !self.check.applies_to(value) || self.check.accepts(value) {
            return None;
        }

        Some(Issue::new(
            self.kind.clone(),
            &self.path,
            self.render_message(value),
            self.severity,
        ))
    }

    fn render_message(&self, value: &Value) -> String {
        self.message
            .replace("{field}", &self.path.to_string())
            .replace("{value}", &scalar_text(value))
            .replace("{type}", type_name(value))
    }
}

/// Ordered collection of field rules
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<FieldRule>,
}

impl RuleRegistry {
    /// Registry with no rules
    pub fn empty() -> Self {
        Self::default()
    }

    /// The client-profile rule set
    pub fn standard() -> Result<Self> {
        Ok(Self::empty()
            .with_rule(FieldRule::numeric(
                "employment_data.client_1.annual_income",
                "annual_income must be numeric, got {type}",
                Severity::High,
            ))
            .with_rule(FieldRule::array(
                "non_retirement_assets",
                "non_retirement_assets must be a list, got {type}",
                Severity::High,
            ))
            .with_rule(FieldRule::pattern(
                "general_information.client_1.dob",
                ISO_DATE_PATTERN,
                "Invalid date format: {value} (expected YYYY-MM-DD)",
                Severity::Medium,
            )?)
            .with_rule(FieldRule::pattern(
                "general_information.home_address.zip",
                US_ZIP_PATTERN,
                "Invalid ZIP code format: {value}",
                Severity::Low,
            )?))
    }

    /// Append a rule
    pub fn with_rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append a rule in place
    pub fn push(&mut self, rule: FieldRule) {
        self.rules.push(rule);
    }

    /// Registered rules, in evaluation order
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Apply every rule of the registry to the populated document, in order
pub fn apply_rules(populated: &Value, registry: &RuleRegistry) -> Vec<Issue> {
    registry
        .rules()
        .iter()
        .filter_map(|rule| rule.evaluate(populated))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn standard() -> RuleRegistry {
        RuleRegistry::standard().unwrap()
    }

    #[test]
    fn test_income_must_be_numeric() {
        let doc = json!({"employment_data": {"client_1": {"annual_income": "fifty-thousand"}}});
        let issues = apply_rules(&doc, &standard());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, Some(IssueKind::TypeError));
        assert_eq!(issues[0].severity, Some(Severity::High));
        assert_eq!(
            issues[0].field,
            Some(FieldPath::parse("employment_data.client_1.annual_income"))
        );
        assert_eq!(issues[0].message, "annual_income must be numeric, got string");
    }

    #[test]
    fn test_income_null_or_number_passes() {
        for income in [json!(null), json!(50000), json!(50000.5), json!(0)] {
            let doc = json!({"employment_data": {"client_1": {"annual_income": income}}});
            assert!(apply_rules(&doc, &standard()).is_empty());
        }
    }

    #[test]
    fn test_assets_must_be_list() {
        let doc = json!({"non_retirement_assets": {"account": "x"}});
        let issues = apply_rules(&doc, &standard());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "non_retirement_assets must be a list, got object");

        let doc = json!({"non_retirement_assets": null});
        assert_eq!(apply_rules(&doc, &standard()).len(), 1);

        let doc = json!({"non_retirement_assets": []});
        assert!(apply_rules(&doc, &standard()).is_empty());
    }

    #[test]
    fn test_dob_format() {
        let bad = json!({"general_information": {"client_1": {"dob": "10/29/1990"}}});
        let issues = apply_rules(&bad, &standard());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, Some(IssueKind::FormatError));
        assert_eq!(issues[0].severity, Some(Severity::Medium));
        assert_eq!(
            issues[0].message,
            "Invalid date format: 10/29/1990 (expected YYYY-MM-DD)"
        );

        let good = json!({"general_information": {"client_1": {"dob": "1990-10-29"}}});
        assert!(apply_rules(&good, &standard()).is_empty());

        let empty = json!({"general_information": {"client_1": {"dob": ""}}});
        assert!(apply_rules(&empty, &standard()).is_empty());
    }

    #[test]
    fn test_zip_format() {
        for zip in [json!("12345"), json!("12345-6789"), json!(12345), json!("")] {
            let doc = json!({"general_information": {"home_address": {"zip": zip}}});
            assert!(apply_rules(&doc, &standard()).is_empty(), "zip {} should pass", zip);
        }

        let doc = json!({"general_information": {"home_address": {"zip": "1234"}}});
        let issues = apply_rules(&doc, &standard());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Some(Severity::Low));
        assert_eq!(issues[0].message, "Invalid ZIP code format: 1234");
    }

    #[test]
    fn test_rules_skip_unresolvable_paths() {
        let doc = json!({
            "general_information": {"home_address": "12 Main St"},
            "employment_data": []
        });
        assert!(apply_rules(&doc, &standard()).is_empty());
    }

    #[test]
    fn test_custom_rule_extends_registry() {
        let registry = RuleRegistry::empty().with_rule(
            FieldRule::pattern(
                "contact.email",
                r"^[^@\s]+@[^@\s]+$",
                "{field} is not an email address: {value}",
                Severity::Low,
            )
            .unwrap(),
        );
        let doc = json!({"contact": {"email": "nobody"}});
        let issues = apply_rules(&doc, &registry);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "contact.email is not an email address: nobody");
    }

    #[test]
    fn test_invalid_pattern_is_configuration_error() {
        let result = FieldRule::pattern("a", "(", "bad", Severity::Low);
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_rules_fire_in_registry_order() {
        let doc = json!({
            "employment_data": {"client_1": {"annual_income": "n/a"}},
            "non_retirement_assets": "none",
            "general_information": {
                "client_1": {"dob": "yesterday"},
                "home_address": {"zip": "abc"}
            }
        });
        let kinds: Vec<_> = apply_rules(&doc, &standard())
            .into_iter()
            .map(|issue| issue.field.unwrap().to_string())
            .collect();
        assert_eq!(
            kinds,
            vec![
                "employment_data.client_1.annual_income",
                "non_retirement_assets",
                "general_information.client_1.dob",
                "general_information.home_address.zip",
            ]
        );
    }
}

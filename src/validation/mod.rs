//! Validation System - Findings and Policy Separation
//!
//! Validators produce findings; they never fail and never stop early.
//! Policy decides what a set of findings means for the caller.

mod document;
mod element;
mod registry;
mod slide;

pub use document::{CanvasRule, DocumentRule, MetadataRule, StructureRule, ThemeRule, Validator};
pub use element::{validate_element, ElementOutcome};
pub use registry::{IdentityRegistry, Registration};
pub use slide::{validate_slide, SlideOutcome};

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, serde::Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, serde::Serialize, Deserialize, PartialEq, Eq)]
pub struct Finding {
    pub rule: String,
    pub severity: Severity,
    pub message: String,
}

/// How warnings are treated when deciding pass/fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Only errors fail.
    #[default]
    Lenient,
    /// Any warning fails too.
    Strict,
}

/// Ordered findings of one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, rule: &str, message: impl Into<String>) {
        self.push(rule, Severity::Error, message.into());
    }

    pub fn warning(&mut self, rule: &str, message: impl Into<String>) {
        self.push(rule, Severity::Warning, message.into());
    }

    fn push(&mut self, rule: &str, severity: Severity, message: String) {
        self.findings.push(Finding {
            rule: rule.to_string(),
            severity,
            message,
        });
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn errors(&self) -> Vec<&str> {
        self.messages(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.messages(Severity::Warning)
    }

    fn messages(&self, severity: Severity) -> Vec<&str> {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .map(|f| f.message.as_str())
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Warning)
    }

    /// Structurally valid: no errors. Warnings may still be present.
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn passes(&self, policy: ValidationPolicy) -> bool {
        match policy {
            ValidationPolicy::Lenient => self.is_valid(),
            ValidationPolicy::Strict => self.findings.is_empty(),
        }
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationReport", 4)?;
        state.serialize_field("valid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors())?;
        state.serialize_field("warnings", &self.warnings())?;
        state.serialize_field("findings", &self.findings)?;
        state.end()
    }
}

/// "Missing or empty": absent, null, false, zero, empty string or collection.
pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// Renders a field value for messages; strings appear without quotes.
pub(crate) fn display_value(value: Option<&Value>) -> String {
    match value {
        None => "<missing>".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

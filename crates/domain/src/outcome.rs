//! Validation results for single fields and the whole form.

use serde::{Deserialize, Serialize};

/// Outcome of validating one field. Built fresh per call, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the value satisfied its rule.
    pub valid: bool,
    /// Failure message; absent on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Box<str>>,
}

impl ValidationResult {
    /// Successful result.
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    /// Failed result carrying `message`.
    #[must_use]
    pub fn fail(message: impl Into<Box<str>>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }

    /// Failure message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Result for a named field inside a form report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldReport {
    /// Field wire name.
    pub field: Box<str>,
    /// Field outcome.
    #[serde(flatten)]
    pub result: ValidationResult,
}

/// Whole-form outcome: every field evaluated, valid iff all are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormReport {
    /// True when every field passed.
    pub valid: bool,
    /// Per-field results in form order.
    pub fields: Vec<FieldReport>,
}

impl FormReport {
    /// Build a report; `valid` is derived from the field results.
    #[must_use]
    pub fn from_fields(fields: Vec<FieldReport>) -> Self {
        let valid = fields.iter().all(|report| report.result.valid);
        Self { valid, fields }
    }

    /// Result for `field`, if present.
    #[must_use]
    pub fn result_for(&self, field: &str) -> Option<&ValidationResult> {
        self.fields
            .iter()
            .find(|report| report.field.as_ref() == field)
            .map(|report| &report.result)
    }

    /// Failing fields with their messages, in form order.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().filter_map(|report| {
            report
                .result
                .message()
                .filter(|_| !report.result.valid)
                .map(|message| (report.field.as_ref(), message))
        })
    }
}

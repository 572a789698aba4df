//! Rule evaluation for single fields and the whole contact form.

use folio_domain::{
    ContactSubmission, FieldName, FieldReport, FormReport, RuleTable, ValidationResult,
    capitalize_first,
};

/// Validate one trimmed `value` against the rule for `field`.
///
/// Checks run in order and the first failure wins: required, empty-optional,
/// minimum length, maximum length, pattern. Fields without a rule pass.
#[must_use]
pub fn validate(field: &str, value: &str, rules: &RuleTable) -> ValidationResult {
    let Some(rule) = rules.get(field) else {
        return ValidationResult::pass();
    };

    if value.is_empty() {
        return if rule.required {
            ValidationResult::fail(format!("{} is required", capitalize_first(field)))
        } else {
            ValidationResult::pass()
        };
    }

    let length = value.chars().count();
    if rule.min_length.is_some_and(|min| length < min)
        || rule.max_length.is_some_and(|max| length > max)
        || rule
            .pattern
            .as_ref()
            .is_some_and(|pattern| !pattern.is_match(value))
    {
        return ValidationResult::fail(rule.message.clone());
    }

    ValidationResult::pass()
}

/// Validate every contact field; no short-circuit.
#[must_use]
pub fn validate_form(submission: &ContactSubmission, rules: &RuleTable) -> FormReport {
    FormReport::from_fields(
        FieldName::ALL
            .into_iter()
            .map(|field| FieldReport {
                field: field.as_str().into(),
                result: validate(field.as_str(), submission.value(field).as_str(), rules),
            })
            .collect(),
    )
}

/// Validator bound to an immutable rule table.
#[derive(Debug, Clone)]
pub struct FormValidator {
    rules: RuleTable,
}

impl FormValidator {
    /// Bind `rules`.
    #[must_use]
    pub const fn new(rules: RuleTable) -> Self {
        Self { rules }
    }

    /// The bound rule table.
    #[must_use]
    pub const fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// See [`validate`].
    #[must_use]
    pub fn validate_field(&self, field: FieldName, value: &str) -> ValidationResult {
        validate(field.as_str(), value, &self.rules)
    }

    /// See [`validate_form`].
    #[must_use]
    pub fn validate_form(&self, submission: &ContactSubmission) -> FormReport {
        validate_form(submission, &self.rules)
    }
}

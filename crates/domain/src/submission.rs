//! Contact submissions, raw form input, and stored drafts.

use crate::field::{FieldName, FieldValue};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Raw form input as it arrives from a caller. Missing fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContactFormInput {
    /// Sender name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Sender email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Subject line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Message body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ContactFormInput {
    /// Fill fields that are unset here from `other`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self {
            name: self.name.or(other.name),
            email: self.email.or(other.email),
            subject: self.subject.or(other.subject),
            message: self.message.or(other.message),
        }
    }
}

/// A trimmed snapshot of the four contact fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    /// Sender name.
    pub name: FieldValue,
    /// Sender email.
    pub email: FieldValue,
    /// Subject line.
    pub subject: FieldValue,
    /// Message body.
    pub message: FieldValue,
}

impl ContactSubmission {
    /// Value for `field`.
    #[must_use]
    pub const fn value(&self, field: FieldName) -> &FieldValue {
        match field {
            FieldName::Name => &self.name,
            FieldName::Email => &self.email,
            FieldName::Subject => &self.subject,
            FieldName::Message => &self.message,
        }
    }

    /// Replace the value for `field` (trimming `raw`).
    pub fn set(&mut self, field: FieldName, raw: &str) {
        let value = FieldValue::new(raw);
        match field {
            FieldName::Name => self.name = value,
            FieldName::Email => self.email = value,
            FieldName::Subject => self.subject = value,
            FieldName::Message => self.message = value,
        }
    }
}

impl From<&ContactFormInput> for ContactSubmission {
    fn from(input: &ContactFormInput) -> Self {
        let trimmed = |raw: &Option<String>| FieldValue::new(raw.as_deref().unwrap_or_default());
        Self {
            name: trimmed(&input.name),
            email: trimmed(&input.email),
            subject: trimmed(&input.subject),
            message: trimmed(&input.message),
        }
    }
}

/// Default key drafts are stored under.
pub const DEFAULT_DRAFT_KEY: &str = "portfolioContactForm";

/// Draft keys double as file stems: non-empty ASCII letters, digits, `-`, `_`.
pub fn is_valid_draft_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

/// Saved, partially completed form. Only non-empty trimmed fields are kept.
///
/// Loading skips keys that are not form fields and blank or null values, so a
/// draft written by another version still restores what it can.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormDraft {
    fields: BTreeMap<FieldName, Box<str>>,
}

impl<'de> Deserialize<'de> for FormDraft {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Option<String>>::deserialize(deserializer)?;
        let fields = raw
            .into_iter()
            .filter_map(|(name, value)| {
                let field = FieldName::parse(&name)?;
                let value = value?;
                let value = value.trim();
                (!value.is_empty()).then(|| (field, value.to_owned().into_boxed_str()))
            })
            .collect();
        Ok(Self { fields })
    }
}

impl FormDraft {
    /// Capture the non-empty fields of a submission.
    #[must_use]
    pub fn from_submission(submission: &ContactSubmission) -> Self {
        let fields = FieldName::ALL
            .into_iter()
            .filter_map(|field| {
                let value = submission.value(field);
                (!value.is_empty()).then(|| (field, value.as_str().to_owned().into_boxed_str()))
            })
            .collect();
        Self { fields }
    }

    /// Stored value for `field`.
    #[must_use]
    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.fields.get(&field).map(AsRef::as_ref)
    }

    /// True when nothing worth saving was entered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of saved fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Restore as a submission; absent fields become empty.
    #[must_use]
    pub fn to_submission(&self) -> ContactSubmission {
        let mut submission = ContactSubmission::default();
        for (field, value) in &self.fields {
            submission.set(*field, value);
        }
        submission
    }

    /// Restore as raw input so explicit caller values can take precedence.
    #[must_use]
    pub fn to_input(&self) -> ContactFormInput {
        let owned = |field| self.get(field).map(str::to_owned);
        ContactFormInput {
            name: owned(FieldName::Name),
            email: owned(FieldName::Email),
            subject: owned(FieldName::Subject),
            message: owned(FieldName::Message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, email: &str, subject: &str, message: &str) -> ContactFormInput {
        ContactFormInput {
            name: Some(name.to_owned()),
            email: Some(email.to_owned()),
            subject: Some(subject.to_owned()),
            message: Some(message.to_owned()),
        }
    }

    #[test]
    fn submission_trims_and_defaults_missing_fields() {
        let raw = ContactFormInput {
            name: Some("  Ada ".to_owned()),
            ..ContactFormInput::default()
        };
        let submission = ContactSubmission::from(&raw);
        assert_eq!(submission.name.as_str(), "Ada");
        assert!(submission.email.is_empty());
        assert!(submission.message.is_empty());
    }

    #[test]
    fn draft_keeps_only_non_empty_fields() {
        let submission = ContactSubmission::from(&input("Ada", "   ", "Hello", ""));
        let draft = FormDraft::from_submission(&submission);
        assert_eq!(draft.len(), 2);
        assert_eq!(draft.get(FieldName::Name), Some("Ada"));
        assert_eq!(draft.get(FieldName::Email), None);
        assert_eq!(draft.to_submission().subject.as_str(), "Hello");
    }

    #[test]
    fn draft_serializes_as_flat_object() -> Result<(), Box<dyn std::error::Error>> {
        let submission = ContactSubmission::from(&input("Ada", "ada@example.com", "", ""));
        let draft = FormDraft::from_submission(&submission);
        let json = serde_json::to_string(&draft)?;
        assert_eq!(json, r#"{"name":"Ada","email":"ada@example.com"}"#);

        let parsed: FormDraft = serde_json::from_str(&json)?;
        assert_eq!(parsed, draft);
        Ok(())
    }

    #[test]
    fn explicit_input_wins_over_draft() {
        let draft = FormDraft::from_submission(&ContactSubmission::from(&input(
            "Ada", "ada@example.com", "Old", "draft body",
        )));
        let explicit = ContactFormInput {
            subject: Some("New".to_owned()),
            ..ContactFormInput::default()
        };
        let merged = explicit.or(draft.to_input());
        assert_eq!(merged.subject.as_deref(), Some("New"));
        assert_eq!(merged.name.as_deref(), Some("Ada"));
    }

    #[test]
    fn unknown_input_fields_are_rejected() {
        let parsed = serde_json::from_str::<ContactFormInput>(r#"{"phone":"123"}"#);
        assert!(parsed.is_err());
    }
}

//! Contact form field names and trimmed field values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of fields on the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldName {
    /// Sender name.
    Name,
    /// Sender email address.
    Email,
    /// Message subject line.
    Subject,
    /// Message body.
    Message,
}

impl FieldName {
    /// All fields in form order.
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Subject, Self::Message];

    /// Stable wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }

    /// Parse a wire name (exact, lowercase).
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == input)
    }

    /// Human label: the wire name with its first character uppercased.
    #[must_use]
    pub fn label(self) -> String {
        capitalize_first(self.as_str())
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Uppercase the first character of `input`, leaving the rest untouched.
#[must_use]
pub fn capitalize_first(input: &str) -> String {
    let mut chars = input.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// A field value with surrounding whitespace removed. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValue(Box<str>);

impl FieldValue {
    /// Trim `raw` and wrap it.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_owned().into_boxed_str())
    }

    /// Borrow the trimmed value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when nothing remains after trimming.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in characters (Unicode scalar values).
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl From<&str> for FieldValue {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for FieldValue {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

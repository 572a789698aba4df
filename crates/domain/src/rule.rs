//! Declarative field rules and the rule table consulted by the validator.

use crate::field::FieldName;
use folio_shared::{ErrorCode, ErrorEnvelope};
use regex::Regex;
use std::fmt;

/// Letters and whitespace only.
pub const NAME_PATTERN: &str = r"^[a-zA-Z\s]+$";
/// Something@something.something, no whitespace, single `@` per side.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Source values of a built-in rule, shared by [`RuleTable::contact_form`]
/// and the config defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDefaults {
    /// Field the rule applies to.
    pub field: FieldName,
    /// Empty values fail when set.
    pub required: bool,
    /// Inclusive minimum length in characters.
    pub min_length: Option<u16>,
    /// Inclusive maximum length in characters.
    pub max_length: Option<u16>,
    /// Pattern source.
    pub pattern: Option<&'static str>,
    /// Failure message.
    pub message: &'static str,
}

impl RuleDefaults {
    /// Compile into a [`FieldRule`].
    pub fn compile(&self) -> Result<FieldRule, RuleError> {
        let mut rule = FieldRule::new(self.message);
        rule.required = self.required;
        rule.min_length = self.min_length.map(usize::from);
        rule.max_length = self.max_length.map(usize::from);
        rule.pattern = self.pattern.map(FieldPattern::new).transpose()?;
        Ok(rule)
    }
}

/// The portfolio contact form's rules.
pub const CONTACT_FORM_RULES: [RuleDefaults; 4] = [
    RuleDefaults {
        field: FieldName::Name,
        required: true,
        min_length: Some(2),
        max_length: None,
        pattern: Some(NAME_PATTERN),
        message: "Please enter a valid name (letters only, min 2 characters)",
    },
    RuleDefaults {
        field: FieldName::Email,
        required: true,
        min_length: None,
        max_length: None,
        pattern: Some(EMAIL_PATTERN),
        message: "Please enter a valid email address",
    },
    RuleDefaults {
        field: FieldName::Subject,
        required: true,
        min_length: Some(3),
        max_length: None,
        pattern: None,
        message: "Subject must be at least 3 characters long",
    },
    RuleDefaults {
        field: FieldName::Message,
        required: true,
        min_length: Some(10),
        max_length: Some(1000),
        pattern: None,
        message: "Message must be between 10 and 1000 characters",
    },
];

/// Failures while building rules from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A pattern did not compile.
    InvalidPattern {
        /// Pattern source as provided.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },
}

impl RuleError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidPattern { .. } => ErrorCode::new("rules", "invalid_pattern"),
        }
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern { reason, .. } => {
                write!(formatter, "pattern does not compile: {reason}")
            },
        }
    }
}

impl std::error::Error for RuleError {}

impl From<RuleError> for ErrorEnvelope {
    fn from(error: RuleError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        match error {
            RuleError::InvalidPattern { pattern, .. } => {
                Self::expected(code, message).with_metadata("pattern", pattern)
            },
        }
    }
}

/// A compiled regular expression that remembers its source text.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    source: Box<str>,
    regex: Regex,
}

impl FieldPattern {
    /// Compile `source`.
    pub fn new(source: &str) -> Result<Self, RuleError> {
        let regex = Regex::new(source).map_err(|error| RuleError::InvalidPattern {
            pattern: source.to_owned(),
            reason: error.to_string(),
        })?;
        Ok(Self {
            source: source.to_owned().into_boxed_str(),
            regex,
        })
    }

    /// Pattern source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when the pattern matches anywhere in `value`.
    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for FieldPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for FieldPattern {}

/// Constraints for one field. Length bounds are checked before the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    /// Empty values fail when set.
    pub required: bool,
    /// Inclusive minimum length in characters.
    pub min_length: Option<usize>,
    /// Inclusive maximum length in characters.
    pub max_length: Option<usize>,
    /// Optional pattern the value must match.
    pub pattern: Option<FieldPattern>,
    /// Message reported for length and pattern failures.
    pub message: Box<str>,
}

impl FieldRule {
    /// Optional rule with no constraints besides the message.
    #[must_use]
    pub fn new(message: impl Into<Box<str>>) -> Self {
        Self {
            required: false,
            min_length: None,
            max_length: None,
            pattern: None,
            message: message.into(),
        }
    }

    /// Mark the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the minimum length.
    #[must_use]
    pub const fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Set the maximum length.
    #[must_use]
    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Attach a compiled pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: FieldPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

/// Ordered field-name to rule mapping. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    entries: Vec<(Box<str>, FieldRule)>,
}

impl RuleTable {
    /// Empty table: every field passes.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The rules used by the portfolio contact form.
    pub fn contact_form() -> Result<Self, RuleError> {
        CONTACT_FORM_RULES.iter().try_fold(Self::empty(), |table, defaults| {
            Ok(table.with_rule(defaults.field.as_str(), defaults.compile()?))
        })
    }

    /// Add or replace the rule for `field`, keeping first-insertion order.
    #[must_use]
    pub fn with_rule(mut self, field: &str, rule: FieldRule) -> Self {
        if let Some(slot) = self
            .entries
            .iter_mut()
            .find(|(name, _)| name.as_ref() == field)
        {
            slot.1 = rule;
        } else {
            self.entries.push((field.to_owned().into_boxed_str(), rule));
        }
        self
    }

    /// Rule for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldRule> {
        self.entries
            .iter()
            .find(|(name, _)| name.as_ref() == field)
            .map(|(_, rule)| rule)
    }

    /// Iterate rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.entries.iter().map(|(name, rule)| (name.as_ref(), rule))
    }

    /// Number of fields with rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no field has a rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

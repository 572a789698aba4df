//! The set of engine components a contact form session works with.

use folio_domain::{FieldName, KnownDomains, RuleTable, Suggestion, ValidationResult};
use folio_engine::{CounterThresholds, DomainSuggester, FormValidator, SpamDetector};

/// Immutable engine components bound to one configuration.
///
/// Suggestions and spam detection are optional; a `None` means the feature
/// is switched off.
#[derive(Debug, Clone)]
pub struct ContactToolkit {
    /// Rule engine.
    pub validator: FormValidator,
    /// Email domain suggester.
    pub suggester: Option<DomainSuggester>,
    /// Spam keyword detector.
    pub spam: Option<SpamDetector>,
    /// Message counter thresholds.
    pub counter: CounterThresholds,
}

impl ContactToolkit {
    /// Toolkit with every feature enabled and default settings.
    #[must_use]
    pub fn with_rules(rules: RuleTable) -> Self {
        Self {
            validator: FormValidator::new(rules),
            suggester: Some(DomainSuggester::new(KnownDomains::default())),
            spam: Some(SpamDetector::default()),
            counter: CounterThresholds::default(),
        }
    }

    /// Validate a single field value.
    #[must_use]
    pub fn validate_field(&self, field: FieldName, value: &str) -> ValidationResult {
        self.validator.validate_field(field, value.trim())
    }

    /// Suggest a domain correction when suggestions are enabled.
    #[must_use]
    pub fn suggest(&self, email: &str) -> Option<Suggestion> {
        self.suggester
            .as_ref()
            .and_then(|suggester| suggester.suggest(email.trim()))
    }
}

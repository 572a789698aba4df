//! # folio-domain
//!
//! Value objects for the portfolio contact form.
//!
//! - **Fields** - `FieldName`, `FieldValue`
//! - **Rules** - `FieldRule`, `FieldPattern`, `RuleTable`
//! - **Outcomes** - `ValidationResult`, `FormReport`
//! - **Suggestions** - `KnownDomains`, `Suggestion`
//! - **Submissions** - `ContactFormInput`, `ContactSubmission`, `FormDraft`
//! - **Delivery** - `OutgoingMessage`, `DeliveryReceipt`
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate
//! - No infrastructure or adapter dependencies
//! - Pure data with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub use folio_shared::shared_crate_version;

// =============================================================================
// DOMAIN MODULES
// =============================================================================

pub mod delivery;
pub mod field;
pub mod outcome;
pub mod rule;
pub mod submission;
pub mod suggestion;

pub use delivery::{DeliveryReceipt, OutgoingMessage};
pub use field::{FieldName, FieldValue, capitalize_first};
pub use outcome::{FieldReport, FormReport, ValidationResult};
pub use rule::{
    CONTACT_FORM_RULES, EMAIL_PATTERN, FieldPattern, FieldRule, NAME_PATTERN, RuleDefaults,
    RuleError, RuleTable,
};
pub use submission::{
    ContactFormInput, ContactSubmission, DEFAULT_DRAFT_KEY, FormDraft, is_valid_draft_key,
};
pub use suggestion::{COMMON_EMAIL_DOMAINS, DomainCandidate, KnownDomains, Suggestion};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_crate_compiles() {
        let version = domain_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn domain_depends_on_shared() {
        assert!(!shared_crate_version().is_empty());
    }
}

//! # folio-engine
//!
//! Pure contact form algorithms. Nothing here performs I/O or holds state
//! between calls; every function returns a well-formed result for any input.
//!
//! - [`rules`] - per-field and whole-form validation against a `RuleTable`
//! - [`similarity`] - Levenshtein distance and normalized similarity
//! - [`suggest`] - "did you mean" email domain corrections
//! - [`spam`] - advisory keyword detection
//! - [`counter`] - remaining-character counter

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod counter;
pub mod rules;
pub mod similarity;
pub mod spam;
pub mod suggest;

pub use counter::{CharacterCount, CounterLevel, CounterThresholds, count};
pub use rules::{FormValidator, validate, validate_form};
pub use similarity::{edit_distance, similarity};
pub use spam::{DEFAULT_MAX_KEYWORD_HITS, DEFAULT_SPAM_KEYWORDS, SPAM_WARNING, SpamCheck, SpamDetector};
pub use suggest::{DomainSuggester, SIMILARITY_THRESHOLD};

/// Returns the engine crate version.
#[must_use]
pub const fn engine_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

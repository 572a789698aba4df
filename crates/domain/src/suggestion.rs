//! Known email domains and "did you mean" suggestions.

use serde::{Deserialize, Serialize};

/// A known-good email domain.
pub type DomainCandidate = Box<str>;

/// Domains offered as corrections, in the order they were configured.
pub const COMMON_EMAIL_DOMAINS: [&str; 8] = [
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "live.com",
    "aol.com",
    "icloud.com",
    "protonmail.com",
];

/// Ordered, immutable list of candidate domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnownDomains(Vec<DomainCandidate>);

impl KnownDomains {
    /// Build from candidates, keeping the given order.
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            candidates
                .into_iter()
                .map(|candidate| candidate.as_ref().to_owned().into_boxed_str())
                .collect(),
        )
    }

    /// Iterate candidates in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(AsRef::as_ref)
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no candidates are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for KnownDomains {
    fn default() -> Self {
        Self::new(COMMON_EMAIL_DOMAINS)
    }
}

/// A proposed correction for a mistyped email domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Everything before the `@`, unchanged.
    pub local_part: Box<str>,
    /// The known domain the user probably meant.
    pub suggested_domain: Box<str>,
}

impl Suggestion {
    /// The address with the suggested domain applied.
    #[must_use]
    pub fn corrected_address(&self) -> String {
        format!("{}@{}", self.local_part, self.suggested_domain)
    }

    /// Prompt text shown to the user.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!("Did you mean {}?", self.corrected_address())
    }
}

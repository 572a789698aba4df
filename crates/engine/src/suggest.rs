//! "Did you mean" corrections for mistyped email domains.

use crate::similarity::similarity;
use folio_domain::{KnownDomains, Suggestion};

/// Candidates must score strictly above this to qualify.
pub const SIMILARITY_THRESHOLD: f64 = 0.6;

/// Suggests known domains for close-but-not-exact email domains.
#[derive(Debug, Clone, Default)]
pub struct DomainSuggester {
    domains: KnownDomains,
}

impl DomainSuggester {
    /// Bind an ordered candidate list.
    #[must_use]
    pub const fn new(domains: KnownDomains) -> Self {
        Self { domains }
    }

    /// Candidate domains in order.
    #[must_use]
    pub const fn domains(&self) -> &KnownDomains {
        &self.domains
    }

    /// First candidate in list order that is similar to, but not equal to,
    /// the entered domain. `email` is expected to be trimmed.
    ///
    /// The domain is the text between the first and second `@`.
    #[must_use]
    pub fn suggest(&self, email: &str) -> Option<Suggestion> {
        if !email.contains('@') || email.chars().any(char::is_whitespace) {
            return None;
        }

        let mut parts = email.split('@');
        let local_part = parts.next()?;
        let domain = parts.next().filter(|domain| !domain.is_empty())?;

        self.domains
            .iter()
            .find(|candidate| {
                *candidate != domain && similarity(domain, candidate) > SIMILARITY_THRESHOLD
            })
            .map(|candidate| Suggestion {
                local_part: local_part.into(),
                suggested_domain: candidate.into(),
            })
    }
}

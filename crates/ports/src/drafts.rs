//! Draft persistence boundary contract.

use crate::BoxFuture;
use folio_domain::{FormDraft, is_valid_draft_key};
use folio_shared::{ErrorCode, ErrorEnvelope, Result};
use std::fmt;

pub use folio_domain::DEFAULT_DRAFT_KEY;

/// A validated storage key: ASCII letters, digits, `-` and `_` only.
///
/// Adapters may use the key as a file stem, so separators and dots are rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DraftKey(Box<str>);

impl DraftKey {
    /// Validate an untrusted key.
    pub fn new(input: &str) -> Result<Self> {
        let key = input.trim();
        if key.is_empty() {
            return Err(invalid_key("draft key must not be empty", input));
        }
        if !is_valid_draft_key(key) {
            return Err(invalid_key(
                "draft key may only contain letters, digits, '-' and '_'",
                input,
            ));
        }
        Ok(Self(key.to_owned().into_boxed_str()))
    }

    /// Borrow the key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DraftKey {
    fn default() -> Self {
        Self(DEFAULT_DRAFT_KEY.into())
    }
}

impl fmt::Display for DraftKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

fn invalid_key(message: &str, input: &str) -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::new("drafts", "invalid_key"), message)
        .with_metadata("key", input.to_owned())
}

/// Boundary contract for saving partially completed forms.
pub trait DraftStorePort: Send + Sync {
    /// Load the draft for `key`; `None` when nothing is stored.
    fn load(&self, key: DraftKey) -> BoxFuture<'_, Result<Option<FormDraft>>>;

    /// Replace the draft for `key`.
    fn save(&self, key: DraftKey, draft: FormDraft) -> BoxFuture<'_, Result<()>>;

    /// Remove the draft for `key`; returns whether one existed.
    fn clear(&self, key: DraftKey) -> BoxFuture<'_, Result<bool>>;
}

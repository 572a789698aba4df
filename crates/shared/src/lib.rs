//! # folio-shared
//!
//! Error handling and redaction shared by every folio crate.
//!
//! - [`ErrorEnvelope`] with its kind, retry class, and `namespace:code`
//! - [`Result`] alias defaulting to the envelope
//! - Key-based redaction for secrets and contact-form personal data
//!
//! This crate has no workspace dependencies.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;
pub mod redaction;
pub mod result;

pub use errors::{ErrorClass, ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata};
pub use redaction::{REDACTED, is_personal_key, is_secret_key, is_sensitive_key, redact_if_sensitive};
pub use result::Result;

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

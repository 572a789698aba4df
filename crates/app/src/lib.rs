//! # folio-app
//!
//! Contact form use cases composing the engine with the boundary ports.
//! This crate depends on `ports`, `domain`, `engine`, and `shared`.
//!
//! Log fields never carry message bodies or full email addresses; senders are
//! identified by domain only.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod drafts;
pub mod review;
pub mod submit;
pub mod toolkit;

pub use drafts::{DraftDeps, clear_draft, load_draft, save_draft};
pub use review::{ContactReview, ReviewDeps, review_contact};
pub use submit::{
    SUBMIT_FAILURE_NOTICE, SUBMIT_SUCCESS_NOTICE, SubmissionGuard, SubmissionPermit, SubmitDeps,
    SubmitOutcome, submit_contact,
};
pub use toolkit::ContactToolkit;

/// Version of the app crate.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

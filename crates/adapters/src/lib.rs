//! # folio-adapters
//!
//! Concrete implementations of the `folio-ports` contracts: file and
//! in-memory draft stores, the demo mailer, and structured loggers.
//! This crate depends on `ports`, `domain`, and `shared` only.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod drafts;
pub mod log_sink;
pub mod logger;
pub mod mailer;

pub use drafts::{FileDraftStore, InMemoryDraftStore};
pub use log_sink::{LogSink, MemoryLogSink, StderrLogSink};
pub use logger::{JsonLogger, TracingLogger};
pub use mailer::DemoMailer;

/// Version of the adapters crate.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

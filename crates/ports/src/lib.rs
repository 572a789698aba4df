//! # folio-ports
//!
//! Boundary traits between the contact form use-cases and the outside world.
//! Depends only on `domain` and `shared`.

use std::future::Future;
use std::pin::Pin;

/// Boxed future used by port traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod drafts;
pub mod logger;
pub mod mailer;

pub use drafts::*;
pub use logger::*;
pub use mailer::*;

// Re-export domain types used in port signatures so adapters can implement
// ports without depending on `folio-domain` directly.
pub use folio_domain::{DeliveryReceipt, FormDraft, OutgoingMessage};

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::domain_crate_version;
    use folio_shared::shared_crate_version;

    fn workspace_deps() -> Vec<String> {
        let cargo_toml = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"));
        let mut in_deps = false;
        let mut deps = Vec::new();

        for raw_line in cargo_toml.lines() {
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.starts_with('[') {
                in_deps = line.ends_with("dependencies]");
                continue;
            }
            if in_deps && line.starts_with("folio-") {
                let key = line.split(['=', '.']).next().unwrap_or("").trim();
                deps.push(key.to_string());
            }
        }

        deps
    }

    #[test]
    fn ports_depend_only_on_domain_and_shared() {
        let deps = workspace_deps();
        let allowed = ["folio-domain", "folio-shared"];

        for dep in &deps {
            assert!(allowed.contains(&dep.as_str()), "unexpected dependency: {dep}");
        }
        for expected in allowed {
            assert!(deps.iter().any(|dep| dep == expected), "missing: {expected}");
        }
    }

    #[test]
    fn ports_can_use_domain_and_shared() {
        assert!(!ports_crate_version().is_empty());
        assert!(!domain_crate_version().is_empty());
        assert!(!shared_crate_version().is_empty());
    }
}

//! # folio-config
//!
//! Configuration schema, validation, and loading for the contact form.
//! This crate depends on `domain` and `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (env + file + overrides).
pub mod load;
/// Configuration schema types and helpers.
pub mod schema;

pub use env::{ContactEnv, EnvParseError, apply_env_overrides};
pub use load::{
    ConfigFormat, load_contact_config_from_path, load_contact_config_from_sources,
    load_contact_config_std_env, to_pretty_json, to_pretty_toml,
};
pub use schema::{
    CURRENT_CONFIG_VERSION, ConfigSchemaError, ContactConfig, CounterConfig, DEFAULT_STORAGE_KEY,
    DraftsConfig, FieldRuleConfig, FormConfig, MailerConfig, SpamConfig, SuggestionsConfig,
    ValidatedContactConfig, parse_contact_config_json, parse_contact_config_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::domain_crate_version;
    use folio_shared::shared_crate_version;

    #[test]
    fn config_crate_compiles() {
        assert!(!config_crate_version().is_empty());
        assert!(!domain_crate_version().is_empty());
        assert!(!shared_crate_version().is_empty());
    }
}

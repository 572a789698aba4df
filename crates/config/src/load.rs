//! Config loading helpers (env + file + overrides).
//!
//! The loader owns the merge order and surfaces user-facing errors as typed
//! `ErrorEnvelope`s.

use crate::env::{ContactEnv, apply_env_overrides};
use crate::schema::{ContactConfig, FieldRuleConfig, ValidatedContactConfig};
use folio_domain::FieldName;
use folio_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// On-disk config formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.json` (also the default for extension-less paths).
    Json,
    /// `.toml`.
    Toml,
}

impl ConfigFormat {
    /// Pick a format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self, ErrorEnvelope> {
        let ext = path
            .extension()
            .and_then(|value| value.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            None | Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            Some(other) => Err(ErrorEnvelope::expected(
                ErrorCode::new("config", "unsupported_format"),
                "unsupported config format; use .json or .toml",
            )
            .with_metadata("extension", other.to_string())),
        }
    }
}

/// Load the contact config from sources using a fixed precedence order.
///
/// Precedence (highest wins):
/// - env overrides (`ContactEnv`)
/// - overrides JSON (partial config)
/// - config text (file content)
/// - defaults (`ContactConfig::default()`)
pub fn load_contact_config_from_sources(
    config_text: Option<(&str, ConfigFormat)>,
    overrides_json: Option<&str>,
    env: &ContactEnv,
) -> Result<ValidatedContactConfig, ErrorEnvelope> {
    let mut config = match config_text {
        None => ContactConfig::default(),
        Some((input, format)) => parse_config_unvalidated(input, format)?,
    };

    if let Some(input) = overrides_json {
        parse_overrides_json(input)?.apply(&mut config);
    }

    // env is applied last and also validates/normalizes the resulting config.
    apply_env_overrides(config, env)
}

/// Load the contact config from an optional file path.
pub fn load_contact_config_from_path(
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
    env: &ContactEnv,
) -> Result<ValidatedContactConfig, ErrorEnvelope> {
    match config_path {
        None => load_contact_config_from_sources(None, overrides_json, env),
        Some(path) => {
            let format = ConfigFormat::from_path(path)?;
            let text = read_config_file(path)?;
            load_contact_config_from_sources(Some((&text, format)), overrides_json, env)
        },
    }
}

/// Load the contact config from std env and an optional file path.
pub fn load_contact_config_std_env(
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<ValidatedContactConfig, ErrorEnvelope> {
    let env = ContactEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    load_contact_config_from_path(config_path, overrides_json, &env)
}

/// Serialize the config as pretty JSON (with trailing newline).
pub fn to_pretty_json(config: &ContactConfig) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize config: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// Serialize the config as pretty TOML (with trailing newline).
pub fn to_pretty_toml(config: &ContactConfig) -> Result<String, ErrorEnvelope> {
    let mut output = toml::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize config TOML: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

fn parse_config_unvalidated(
    input: &str,
    format: ConfigFormat,
) -> Result<ContactConfig, ErrorEnvelope> {
    match format {
        ConfigFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid config JSON: {error}"),
            )
            .with_metadata("source", "config")
        }),
        ConfigFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid config TOML: {error}"),
            )
            .with_metadata("source", "config")
        }),
    }
}

fn parse_overrides_json(input: &str) -> Result<ContactConfigOverrides, ErrorEnvelope> {
    serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid overrides JSON: {error}"),
        )
        .with_metadata("source", "overrides")
    })
}

fn read_config_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("config", "config_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("config", "config_file_permission_denied")
            },
            _ => ErrorCode::new("config", "config_file_io"),
        };

        ErrorEnvelope::io(code, "read config file", path, &error)
    })
}

/// Partial config; every present value replaces the base value.
/// `form.rules` entries replace rules per field and leave other fields alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct ContactConfigOverrides {
    version: Option<u32>,
    form: FormOverrides,
    suggestions: SuggestionsOverrides,
    spam: SpamOverrides,
    counter: CounterOverrides,
    drafts: DraftsOverrides,
    mailer: MailerOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct FormOverrides {
    rules: BTreeMap<FieldName, FieldRuleConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct SuggestionsOverrides {
    enabled: Option<bool>,
    known_domains: Option<Vec<Box<str>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct SpamOverrides {
    enabled: Option<bool>,
    keywords: Option<Vec<Box<str>>>,
    max_keyword_hits: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct CounterOverrides {
    max_length: Option<u32>,
    caution_below: Option<u32>,
    critical_below: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct DraftsOverrides {
    enabled: Option<bool>,
    storage_key: Option<Box<str>>,
    directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct MailerOverrides {
    latency_ms: Option<u64>,
    failure_rate_pct: Option<u32>,
    recipient: Option<Box<str>>,
}

impl ContactConfigOverrides {
    fn apply(self, config: &mut ContactConfig) {
        replace(&mut config.version, self.version);
        config.form.rules.extend(self.form.rules);

        replace(&mut config.suggestions.enabled, self.suggestions.enabled);
        replace(
            &mut config.suggestions.known_domains,
            self.suggestions.known_domains,
        );

        replace(&mut config.spam.enabled, self.spam.enabled);
        replace(&mut config.spam.keywords, self.spam.keywords);
        replace(&mut config.spam.max_keyword_hits, self.spam.max_keyword_hits);

        replace(&mut config.counter.max_length, self.counter.max_length);
        replace(&mut config.counter.caution_below, self.counter.caution_below);
        replace(&mut config.counter.critical_below, self.counter.critical_below);

        replace(&mut config.drafts.enabled, self.drafts.enabled);
        replace(&mut config.drafts.storage_key, self.drafts.storage_key);
        replace(&mut config.drafts.directory, self.drafts.directory);

        replace(&mut config.mailer.latency_ms, self.mailer.latency_ms);
        replace(
            &mut config.mailer.failure_rate_pct,
            self.mailer.failure_rate_pct,
        );
        replace(&mut config.mailer.recipient, self.mailer.recipient);
    }
}

fn replace<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

//! Environment variable parsing and env-to-config merging.
//!
//! Env parsing is strict (invalid values fail fast) and deterministic (CSV
//! lists keep first-seen order with duplicates removed).

use crate::schema::{ContactConfig, ValidatedContactConfig};
use folio_shared::{ErrorCode, ErrorEnvelope, redact_if_sensitive};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Env var: enable email domain suggestions.
pub const ENV_SUGGESTIONS_ENABLED: &str = "FOLIO_SUGGESTIONS_ENABLED";
/// Env var: comma-separated known domains.
pub const ENV_SUGGESTIONS_KNOWN_DOMAINS: &str = "FOLIO_SUGGESTIONS_KNOWN_DOMAINS";
/// Env var: enable spam keyword detection.
pub const ENV_SPAM_ENABLED: &str = "FOLIO_SPAM_ENABLED";
/// Env var: comma-separated spam keywords.
pub const ENV_SPAM_KEYWORDS: &str = "FOLIO_SPAM_KEYWORDS";
/// Env var: keyword hits tolerated before flagging.
pub const ENV_SPAM_MAX_KEYWORD_HITS: &str = "FOLIO_SPAM_MAX_KEYWORD_HITS";
/// Env var: counter limit.
pub const ENV_COUNTER_MAX_LENGTH: &str = "FOLIO_COUNTER_MAX_LENGTH";
/// Env var: enable draft persistence.
pub const ENV_DRAFTS_ENABLED: &str = "FOLIO_DRAFTS_ENABLED";
/// Env var: draft storage key.
pub const ENV_DRAFTS_STORAGE_KEY: &str = "FOLIO_DRAFTS_STORAGE_KEY";
/// Env var: draft directory.
pub const ENV_DRAFTS_DIRECTORY: &str = "FOLIO_DRAFTS_DIRECTORY";
/// Env var: simulated delivery latency.
pub const ENV_MAILER_LATENCY_MS: &str = "FOLIO_MAILER_LATENCY_MS";
/// Env var: simulated delivery failure rate.
pub const ENV_MAILER_FAILURE_RATE_PCT: &str = "FOLIO_MAILER_FAILURE_RATE_PCT";
/// Env var: delivery recipient.
pub const ENV_MAILER_RECIPIENT: &str = "FOLIO_MAILER_RECIPIENT";

const ALL_ENV_VARS: [&str; 12] = [
    ENV_SUGGESTIONS_ENABLED,
    ENV_SUGGESTIONS_KNOWN_DOMAINS,
    ENV_SPAM_ENABLED,
    ENV_SPAM_KEYWORDS,
    ENV_SPAM_MAX_KEYWORD_HITS,
    ENV_COUNTER_MAX_LENGTH,
    ENV_DRAFTS_ENABLED,
    ENV_DRAFTS_STORAGE_KEY,
    ENV_DRAFTS_DIRECTORY,
    ENV_MAILER_LATENCY_MS,
    ENV_MAILER_FAILURE_RATE_PCT,
    ENV_MAILER_RECIPIENT,
];

const CSV_MAX_ITEMS: usize = 256;

/// Parsed env overrides. `None` means the variable was not set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactEnv {
    /// `FOLIO_SUGGESTIONS_ENABLED`.
    pub suggestions_enabled: Option<bool>,
    /// `FOLIO_SUGGESTIONS_KNOWN_DOMAINS`.
    pub suggestions_known_domains: Option<Vec<Box<str>>>,
    /// `FOLIO_SPAM_ENABLED`.
    pub spam_enabled: Option<bool>,
    /// `FOLIO_SPAM_KEYWORDS`.
    pub spam_keywords: Option<Vec<Box<str>>>,
    /// `FOLIO_SPAM_MAX_KEYWORD_HITS`.
    pub spam_max_keyword_hits: Option<u32>,
    /// `FOLIO_COUNTER_MAX_LENGTH`.
    pub counter_max_length: Option<u32>,
    /// `FOLIO_DRAFTS_ENABLED`.
    pub drafts_enabled: Option<bool>,
    /// `FOLIO_DRAFTS_STORAGE_KEY`.
    pub drafts_storage_key: Option<Box<str>>,
    /// `FOLIO_DRAFTS_DIRECTORY`.
    pub drafts_directory: Option<PathBuf>,
    /// `FOLIO_MAILER_LATENCY_MS`.
    pub mailer_latency_ms: Option<u64>,
    /// `FOLIO_MAILER_FAILURE_RATE_PCT`.
    pub mailer_failure_rate_pct: Option<u32>,
    /// `FOLIO_MAILER_RECIPIENT`.
    pub mailer_recipient: Option<Box<str>>,
}

impl ContactEnv {
    /// Parse env overrides from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            suggestions_enabled: parse_optional_bool(map, ENV_SUGGESTIONS_ENABLED)?,
            suggestions_known_domains: parse_optional_csv(map, ENV_SUGGESTIONS_KNOWN_DOMAINS)?,
            spam_enabled: parse_optional_bool(map, ENV_SPAM_ENABLED)?,
            spam_keywords: parse_optional_csv(map, ENV_SPAM_KEYWORDS)?,
            spam_max_keyword_hits: parse_optional_u32(map, ENV_SPAM_MAX_KEYWORD_HITS)?,
            counter_max_length: parse_optional_u32(map, ENV_COUNTER_MAX_LENGTH)?,
            drafts_enabled: parse_optional_bool(map, ENV_DRAFTS_ENABLED)?,
            drafts_storage_key: parse_optional_trimmed_string(map, ENV_DRAFTS_STORAGE_KEY)?,
            drafts_directory: parse_optional_trimmed_string(map, ENV_DRAFTS_DIRECTORY)?
                .map(|value| PathBuf::from(value.as_ref())),
            mailer_latency_ms: parse_optional_u64(map, ENV_MAILER_LATENCY_MS)?,
            mailer_failure_rate_pct: parse_optional_u32(map, ENV_MAILER_FAILURE_RATE_PCT)?,
            mailer_recipient: parse_optional_trimmed_string(map, ENV_MAILER_RECIPIENT)?,
        })
    }

    /// Parse env overrides from the current process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let map = ALL_ENV_VARS
            .into_iter()
            .filter_map(|name| std::env::var(name).ok().map(|value| (name.to_owned(), value)))
            .collect();
        Self::from_map(&map)
    }
}

/// Apply env overrides to a base config (env wins over file/default values).
pub fn apply_env_overrides(
    base: ContactConfig,
    env: &ContactEnv,
) -> Result<ValidatedContactConfig, ErrorEnvelope> {
    let mut config = base;
    set(&mut config.suggestions.enabled, env.suggestions_enabled);
    set_clone(
        &mut config.suggestions.known_domains,
        env.suggestions_known_domains.as_ref(),
    );
    set(&mut config.spam.enabled, env.spam_enabled);
    set_clone(&mut config.spam.keywords, env.spam_keywords.as_ref());
    set(&mut config.spam.max_keyword_hits, env.spam_max_keyword_hits);
    set(&mut config.counter.max_length, env.counter_max_length);
    set(&mut config.drafts.enabled, env.drafts_enabled);
    set_clone(
        &mut config.drafts.storage_key,
        env.drafts_storage_key.as_ref(),
    );
    set_clone(&mut config.drafts.directory, env.drafts_directory.as_ref());
    set(&mut config.mailer.latency_ms, env.mailer_latency_ms);
    set(
        &mut config.mailer.failure_rate_pct,
        env.mailer_failure_rate_pct,
    );
    set_clone(&mut config.mailer.recipient, env.mailer_recipient.as_ref());

    config.validate_and_normalize().map_err(Into::into)
}

fn set<T: Copy>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn set_clone<T: Clone>(field: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        field.clone_from(value);
    }
}

/// Validation failures when parsing env variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// Env var was set but empty.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Integer env var had an invalid value.
    InvalidInt {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// CSV list exceeds a safety limit.
    CsvTooLarge {
        /// Env var name.
        var: &'static str,
        /// Number of parsed items.
        len: usize,
        /// Maximum allowed.
        max: usize,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidBool { .. } => ErrorCode::new("config", "invalid_env_bool"),
            Self::InvalidInt { .. } => ErrorCode::new("config", "invalid_env_int"),
            Self::CsvTooLarge { .. } => ErrorCode::new("config", "invalid_env_csv"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidBool { var, .. } => write!(formatter, "{var} must be a boolean"),
            Self::InvalidInt { var, .. } => write!(formatter, "{var} must be an integer"),
            Self::CsvTooLarge { var, len, max } => {
                write!(formatter, "{var} is too large ({len} items, max {max})")
            },
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidBool { var, value } | EnvParseError::InvalidInt { var, value } => {
                envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", redact_if_sensitive(var, &value))
            },
            EnvParseError::CsvTooLarge { var, len, max } => envelope
                .with_metadata("env_var", var)
                .with_metadata("len", len.to_string())
                .with_metadata("max", max.to_string()),
        }
    }
}

fn non_empty<'a>(
    map: &'a BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<&'a str>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }
    Ok(Some(trimmed))
}

fn parse_optional_trimmed_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Box<str>>, EnvParseError> {
    Ok(non_empty(map, var)?.map(Into::into))
}

fn parse_optional_u64(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u64>, EnvParseError> {
    non_empty(map, var)?
        .map(|value| {
            value.parse::<u64>().map_err(|_| EnvParseError::InvalidInt {
                var,
                value: value.to_owned(),
            })
        })
        .transpose()
}

fn parse_optional_u32(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u32>, EnvParseError> {
    non_empty(map, var)?
        .map(|value| {
            value.parse::<u32>().map_err(|_| EnvParseError::InvalidInt {
                var,
                value: value.to_owned(),
            })
        })
        .transpose()
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(value) = non_empty(map, var)? else {
        return Ok(None);
    };
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: value.to_owned(),
        }),
    }
}

fn parse_optional_csv(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Vec<Box<str>>>, EnvParseError> {
    let Some(value) = non_empty(map, var)? else {
        return Ok(None);
    };
    let mut items: Vec<Box<str>> = Vec::new();
    for part in value.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        if !items.iter().any(|seen| seen.as_ref() == part) {
            items.push(part.into());
        }
    }
    if items.len() > CSV_MAX_ITEMS {
        return Err(EnvParseError::CsvTooLarge {
            var,
            len: items.len(),
            max: CSV_MAX_ITEMS,
        });
    }
    Ok(Some(items))
}

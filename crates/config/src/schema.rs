//! Contact form configuration schema, defaults, validation, and normalization.
//!
//! Deserialization uses `serde` (JSON or TOML). Validation is manual and
//! returns typed errors mapped to `ErrorEnvelope`. Defaults reproduce the
//! contact form as shipped on the portfolio site.

use folio_domain::{
    COMMON_EMAIL_DOMAINS, CONTACT_FORM_RULES, DEFAULT_DRAFT_KEY, EMAIL_PATTERN, FieldName,
    FieldPattern, FieldRule, KnownDomains, RuleDefaults, RuleTable, is_valid_draft_key,
};
use folio_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Current supported configuration schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Default draft storage key.
pub const DEFAULT_STORAGE_KEY: &str = DEFAULT_DRAFT_KEY;

const FIELD_LENGTH_MAX: u32 = 100_000;
const KNOWN_DOMAINS_MAX: usize = 64;
const SPAM_KEYWORDS_MAX: usize = 256;
const SPAM_MAX_HITS_MAX: u32 = 64;
const MAILER_LATENCY_MAX_MS: u64 = 60_000;
const MAILER_FAILURE_RATE_MAX_PCT: u32 = 100;

/// Top-level contact form configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ContactConfig {
    /// Schema version for forward-compatible migrations.
    pub version: u32,
    /// Field rules.
    pub form: FormConfig,
    /// Email domain suggestions.
    pub suggestions: SuggestionsConfig,
    /// Spam keyword detection.
    pub spam: SpamConfig,
    /// Message character counter.
    pub counter: CounterConfig,
    /// Draft persistence.
    pub drafts: DraftsConfig,
    /// Demo delivery.
    pub mailer: MailerConfig,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            form: FormConfig::default(),
            suggestions: SuggestionsConfig::default(),
            spam: SpamConfig::default(),
            counter: CounterConfig::default(),
            drafts: DraftsConfig::default(),
            mailer: MailerConfig::default(),
        }
    }
}

impl ContactConfig {
    /// Validate and normalize the config.
    pub fn validate_and_normalize(mut self) -> Result<ValidatedContactConfig, ConfigSchemaError> {
        self.validate_version()?;

        let rules = self.form.compile_rules()?;
        self.suggestions.normalize_and_validate()?;
        self.spam.normalize_and_validate()?;
        self.counter.validate()?;
        self.drafts.normalize_and_validate()?;
        self.mailer.normalize_and_validate()?;

        let domains = if self.suggestions.enabled {
            KnownDomains::new(&self.suggestions.known_domains)
        } else {
            KnownDomains::new(Vec::<&str>::new())
        };

        Ok(ValidatedContactConfig {
            raw: self,
            rules,
            domains,
        })
    }

    const fn validate_version(&self) -> Result<(), ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }
        Ok(())
    }
}

/// Validated config carrying the compiled rule table and domain list.
#[derive(Debug, Clone)]
pub struct ValidatedContactConfig {
    raw: ContactConfig,
    rules: RuleTable,
    domains: KnownDomains,
}

impl ValidatedContactConfig {
    /// Compiled field rules.
    #[must_use]
    pub const fn rule_table(&self) -> &RuleTable {
        &self.rules
    }

    /// Suggestion candidates; empty when suggestions are disabled.
    #[must_use]
    pub const fn known_domains(&self) -> &KnownDomains {
        &self.domains
    }

    /// Borrow the raw config.
    #[must_use]
    pub const fn as_ref(&self) -> &ContactConfig {
        &self.raw
    }

    /// Consume the wrapper and return the raw config.
    #[must_use]
    pub fn into_inner(self) -> ContactConfig {
        self.raw
    }
}

impl AsRef<ContactConfig> for ValidatedContactConfig {
    fn as_ref(&self) -> &ContactConfig {
        &self.raw
    }
}

impl std::ops::Deref for ValidatedContactConfig {
    type Target = ContactConfig;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

/// Parse a contact config from a JSON string, applying validation and normalization.
pub fn parse_contact_config_json(input: &str) -> Result<ValidatedContactConfig, ErrorEnvelope> {
    let config: ContactConfig = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Parse a contact config from a TOML string, applying validation and normalization.
pub fn parse_contact_config_toml(input: &str) -> Result<ValidatedContactConfig, ErrorEnvelope> {
    let config: ContactConfig = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Field rules keyed by field. Fields absent from the map have no rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct FormConfig {
    /// Rule per field.
    pub rules: BTreeMap<FieldName, FieldRuleConfig>,
}

impl Default for FormConfig {
    fn default() -> Self {
        let rules = CONTACT_FORM_RULES
            .iter()
            .map(|defaults| (defaults.field, FieldRuleConfig::from(defaults)))
            .collect();
        Self { rules }
    }
}

impl FormConfig {
    fn compile_rules(&mut self) -> Result<RuleTable, ConfigSchemaError> {
        let mut table = RuleTable::empty();
        for (field, rule) in &mut self.rules {
            rule.normalize();
            table = table.with_rule(field.as_str(), rule.compile(*field)?);
        }
        Ok(table)
    }
}

/// Declarative rule for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FieldRuleConfig {
    /// Empty values fail when set.
    #[serde(default)]
    pub required: bool,
    /// Inclusive minimum length in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    /// Inclusive maximum length in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Regular expression the value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Box<str>>,
    /// Message reported for length and pattern failures.
    pub message: Box<str>,
}

impl From<&RuleDefaults> for FieldRuleConfig {
    fn from(defaults: &RuleDefaults) -> Self {
        Self {
            required: defaults.required,
            min_length: defaults.min_length.map(u32::from),
            max_length: defaults.max_length.map(u32::from),
            pattern: defaults.pattern.map(Into::into),
            message: defaults.message.into(),
        }
    }
}

impl FieldRuleConfig {
    fn normalize(&mut self) {
        normalize_boxed_str(&mut self.message);
        normalize_optional_trimmed(&mut self.pattern);
    }

    fn compile(&self, field: FieldName) -> Result<FieldRule, ConfigSchemaError> {
        if self.message.is_empty() {
            return Err(ConfigSchemaError::InvalidRule {
                field,
                reason: "message must be non-empty".to_owned(),
            });
        }
        for (name, bound) in [("minLength", self.min_length), ("maxLength", self.max_length)] {
            if let Some(value) = bound {
                validate_limit_u32("form.rules", name, value, 0, FIELD_LENGTH_MAX)?;
            }
        }
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(ConfigSchemaError::InvalidRule {
                    field,
                    reason: format!("minLength {min} exceeds maxLength {max}"),
                });
            }
        }

        let mut rule = FieldRule::new(self.message.clone());
        if self.required {
            rule = rule.required();
        }
        if let Some(min) = self.min_length {
            rule = rule.min_length(widen(min));
        }
        if let Some(max) = self.max_length {
            rule = rule.max_length(widen(max));
        }
        if let Some(source) = self.pattern.as_deref() {
            let pattern =
                FieldPattern::new(source).map_err(|error| ConfigSchemaError::InvalidRule {
                    field,
                    reason: error.to_string(),
                })?;
            rule = rule.pattern(pattern);
        }
        Ok(rule)
    }
}

/// Email domain suggestion settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SuggestionsConfig {
    /// Offer corrections at all.
    pub enabled: bool,
    /// Candidates in priority order.
    pub known_domains: Vec<Box<str>>,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            known_domains: COMMON_EMAIL_DOMAINS.iter().map(|&domain| domain.into()).collect(),
        }
    }
}

impl SuggestionsConfig {
    fn normalize_and_validate(&mut self) -> Result<(), ConfigSchemaError> {
        let mut normalized: Vec<Box<str>> = Vec::with_capacity(self.known_domains.len());
        for raw in &self.known_domains {
            let domain = raw.trim().to_ascii_lowercase();
            let well_formed = !domain.is_empty()
                && domain.contains('.')
                && !domain.contains('@')
                && !domain.chars().any(char::is_whitespace);
            if !well_formed {
                return Err(ConfigSchemaError::InvalidDomain {
                    domain: raw.to_string(),
                });
            }
            if !normalized.iter().any(|seen| seen.as_ref() == domain) {
                normalized.push(domain.into_boxed_str());
            }
        }
        validate_list_len(
            "suggestions",
            "knownDomains",
            normalized.len(),
            KNOWN_DOMAINS_MAX,
        )?;
        self.known_domains = normalized;
        Ok(())
    }
}

/// Spam keyword settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SpamConfig {
    /// Check messages at all.
    pub enabled: bool,
    /// Case-insensitive phrases.
    pub keywords: Vec<Box<str>>,
    /// Hits tolerated before a message is flagged.
    pub max_keyword_hits: u32,
}

impl Default for SpamConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            keywords: [
                "free money",
                "click here",
                "guaranteed",
                "act now",
                "limited time",
                "make money",
                "work from home",
            ]
            .into_iter()
            .map(Into::into)
            .collect(),
            max_keyword_hits: 2,
        }
    }
}

impl SpamConfig {
    fn normalize_and_validate(&mut self) -> Result<(), ConfigSchemaError> {
        let mut normalized: Vec<Box<str>> = Vec::with_capacity(self.keywords.len());
        for raw in &self.keywords {
            let keyword = raw.trim().to_lowercase();
            if keyword.is_empty() {
                return Err(ConfigSchemaError::InvalidValue {
                    section: "spam",
                    field: "keywords",
                    reason: "keywords must be non-empty".to_owned(),
                });
            }
            if !normalized.iter().any(|seen| seen.as_ref() == keyword) {
                normalized.push(keyword.into_boxed_str());
            }
        }
        validate_list_len("spam", "keywords", normalized.len(), SPAM_KEYWORDS_MAX)?;
        validate_limit_u32(
            "spam",
            "maxKeywordHits",
            self.max_keyword_hits,
            0,
            SPAM_MAX_HITS_MAX,
        )?;
        self.keywords = normalized;
        Ok(())
    }
}

/// Character counter thresholds for the message field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct CounterConfig {
    /// Limit the counter measures against.
    pub max_length: u32,
    /// Caution when fewer than this many remain.
    pub caution_below: u32,
    /// Critical when fewer than this many remain.
    pub critical_below: u32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            max_length: 1000,
            caution_below: 100,
            critical_below: 50,
        }
    }
}

impl CounterConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        validate_limit_u32("counter", "maxLength", self.max_length, 1, FIELD_LENGTH_MAX)?;
        validate_limit_u32(
            "counter",
            "cautionBelow",
            self.caution_below,
            0,
            self.max_length,
        )?;
        validate_limit_u32(
            "counter",
            "criticalBelow",
            self.critical_below,
            0,
            self.caution_below,
        )
    }
}

/// Draft persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct DraftsConfig {
    /// Persist drafts at all.
    pub enabled: bool,
    /// Key (file stem) drafts are stored under.
    pub storage_key: Box<str>,
    /// Directory holding draft files.
    pub directory: PathBuf,
}

impl Default for DraftsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            storage_key: DEFAULT_STORAGE_KEY.into(),
            directory: PathBuf::from(".folio").join("drafts"),
        }
    }
}

impl DraftsConfig {
    fn normalize_and_validate(&mut self) -> Result<(), ConfigSchemaError> {
        normalize_boxed_str(&mut self.storage_key);
        if !is_valid_draft_key(&self.storage_key) {
            return Err(ConfigSchemaError::InvalidValue {
                section: "drafts",
                field: "storageKey",
                reason: "use letters, digits, '-' or '_'".to_owned(),
            });
        }
        if self.directory.as_os_str().is_empty() {
            return Err(ConfigSchemaError::InvalidValue {
                section: "drafts",
                field: "directory",
                reason: "directory must be non-empty".to_owned(),
            });
        }
        Ok(())
    }
}

/// Demo delivery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct MailerConfig {
    /// Simulated network latency.
    pub latency_ms: u64,
    /// Share of sends that fail, in percent.
    pub failure_rate_pct: u32,
    /// Inbox messages are addressed to.
    pub recipient: Box<str>,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            latency_ms: 2_000,
            failure_rate_pct: 10,
            recipient: "owner@example.com".into(),
        }
    }
}

impl MailerConfig {
    fn normalize_and_validate(&mut self) -> Result<(), ConfigSchemaError> {
        normalize_boxed_str(&mut self.recipient);
        validate_limit_u64("mailer", "latencyMs", self.latency_ms, 0, MAILER_LATENCY_MAX_MS)?;
        validate_limit_u32(
            "mailer",
            "failureRatePct",
            self.failure_rate_pct,
            0,
            MAILER_FAILURE_RATE_MAX_PCT,
        )?;
        let well_formed = FieldPattern::new(EMAIL_PATTERN)
            .is_ok_and(|pattern| pattern.is_match(&self.recipient));
        if !well_formed {
            return Err(ConfigSchemaError::InvalidValue {
                section: "mailer",
                field: "recipient",
                reason: "recipient must be an email address".to_owned(),
            });
        }
        Ok(())
    }
}

/// Typed validation errors for the configuration schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// The config version is not supported by this binary.
    UnsupportedVersion {
        /// Version found in the config.
        found: u32,
        /// Version supported by this crate.
        supported: u32,
    },
    /// A numeric limit is out of bounds.
    LimitOutOfRange {
        /// Schema section (e.g. `mailer`).
        section: &'static str,
        /// Field name in the config file (e.g. `latencyMs`).
        field: &'static str,
        /// Value provided.
        value: u64,
        /// Minimum allowed value.
        min: u64,
        /// Maximum allowed value.
        max: u64,
    },
    /// A list field exceeds the maximum allowed size.
    ListTooLarge {
        /// Schema section.
        section: &'static str,
        /// Field name in the config file.
        field: &'static str,
        /// Number of entries after deduplication.
        len: usize,
        /// Maximum allowed number of entries.
        max: usize,
    },
    /// A field rule is inconsistent or its pattern does not compile.
    InvalidRule {
        /// Field the rule belongs to.
        field: FieldName,
        /// Human readable reason.
        reason: String,
    },
    /// A known-domain entry is malformed.
    InvalidDomain {
        /// Offending entry.
        domain: String,
    },
    /// Any other invalid value.
    InvalidValue {
        /// Schema section.
        section: &'static str,
        /// Field name in the config file.
        field: &'static str,
        /// Human readable reason.
        reason: String,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::LimitOutOfRange { .. } => ErrorCode::new("config", "invalid_limit"),
            Self::ListTooLarge { .. } => ErrorCode::new("config", "list_too_large"),
            Self::InvalidRule { .. } => ErrorCode::new("config", "invalid_rule"),
            Self::InvalidDomain { .. } => ErrorCode::new("config", "invalid_domain"),
            Self::InvalidValue { .. } => ErrorCode::new("config", "invalid_value"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => {
                write!(
                    formatter,
                    "unsupported config version: {found} (supported: {supported})"
                )
            },
            Self::LimitOutOfRange {
                section,
                field,
                value,
                min,
                max,
            } => write!(
                formatter,
                "{section}.{field} must be within [{min}, {max}] (got {value})"
            ),
            Self::ListTooLarge {
                section,
                field,
                len,
                max,
            } => write!(
                formatter,
                "{section}.{field} must have at most {max} entries (got {len})"
            ),
            Self::InvalidRule { field, reason } => {
                write!(formatter, "invalid rule for form.rules.{field}: {reason}")
            },
            Self::InvalidDomain { domain } => {
                write!(formatter, "invalid known domain entry: {domain}")
            },
            Self::InvalidValue {
                section,
                field,
                reason,
            } => write!(formatter, "invalid {section}.{field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => envelope
                .with_metadata("found", found.to_string())
                .with_metadata("supported", supported.to_string()),
            ConfigSchemaError::LimitOutOfRange {
                section,
                field,
                value,
                min,
                max,
            } => envelope
                .with_metadata("section", section)
                .with_metadata("field", field)
                .with_metadata("value", value.to_string())
                .with_metadata("min", min.to_string())
                .with_metadata("max", max.to_string()),
            ConfigSchemaError::ListTooLarge {
                section,
                field,
                len,
                max,
            } => envelope
                .with_metadata("section", section)
                .with_metadata("field", field)
                .with_metadata("len", len.to_string())
                .with_metadata("max", max.to_string()),
            ConfigSchemaError::InvalidRule { field, reason } => envelope
                .with_metadata("field", field.as_str())
                .with_metadata("reason", reason),
            ConfigSchemaError::InvalidDomain { domain } => envelope.with_metadata("domain", domain),
            ConfigSchemaError::InvalidValue {
                section,
                field,
                reason,
            } => envelope
                .with_metadata("section", section)
                .with_metadata("field", field)
                .with_metadata("reason", reason),
        }
    }
}

fn validate_limit_u32(
    section: &'static str,
    field: &'static str,
    value: u32,
    min: u32,
    max: u32,
) -> Result<(), ConfigSchemaError> {
    validate_limit_u64(section, field, u64::from(value), u64::from(min), u64::from(max))
}

const fn validate_limit_u64(
    section: &'static str,
    field: &'static str,
    value: u64,
    min: u64,
    max: u64,
) -> Result<(), ConfigSchemaError> {
    if value < min || value > max {
        return Err(ConfigSchemaError::LimitOutOfRange {
            section,
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

const fn validate_list_len(
    section: &'static str,
    field: &'static str,
    len: usize,
    max: usize,
) -> Result<(), ConfigSchemaError> {
    if len > max {
        return Err(ConfigSchemaError::ListTooLarge {
            section,
            field,
            len,
            max,
        });
    }
    Ok(())
}

fn normalize_optional_trimmed(value: &mut Option<Box<str>>) {
    let Some(raw) = value.take() else {
        return;
    };
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        *value = Some(trimmed.to_owned().into_boxed_str());
    }
}

fn normalize_boxed_str(value: &mut Box<str>) {
    let trimmed = value.trim();
    if trimmed == value.as_ref() {
        return;
    }
    *value = trimmed.to_owned().into_boxed_str();
}

fn widen(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

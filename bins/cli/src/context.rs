//! Wiring from validated configuration to use-case dependencies.

use folio_adapters::{DemoMailer, FileDraftStore, JsonLogger, StderrLogSink, TracingLogger};
use folio_app::{ContactToolkit, DraftDeps, ReviewDeps, SubmissionGuard, SubmitDeps};
use folio_config::{ValidatedContactConfig, load_contact_config_std_env};
use folio_engine::{CounterThresholds, DomainSuggester, FormValidator, SpamDetector};
use folio_ports::{DraftKey, LogLevel, LoggerPort, log_fields};
use folio_shared::{ErrorCode, ErrorEnvelope, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Global configuration flags shared by every command.
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    /// Config file (JSON or TOML).
    #[arg(long = "config", visible_alias = "path", global = true)]
    pub config: Option<PathBuf>,
    /// Partial config JSON applied over the file.
    #[arg(long, global = true)]
    pub overrides_json: Option<String>,
    /// Emit structured JSON log lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Everything a command needs, built once per invocation.
pub struct CliContext {
    pub config: ValidatedContactConfig,
    pub config_path: Option<PathBuf>,
    pub toolkit: Arc<ContactToolkit>,
    pub logger: Option<Arc<dyn LoggerPort>>,
}

impl CliContext {
    /// Load configuration from env, overrides, and the optional file.
    pub fn load(args: &ConfigArgs, command: &str) -> Result<Self> {
        let config =
            load_contact_config_std_env(args.config.as_deref(), args.overrides_json.as_deref())?;
        let toolkit = Arc::new(toolkit_from_config(&config)?);
        let logger = build_logger(args.log_json, command);
        Ok(Self {
            config,
            config_path: args.config.clone(),
            toolkit,
            logger,
        })
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn review_deps(&self) -> ReviewDeps {
        ReviewDeps {
            toolkit: Arc::clone(&self.toolkit),
            logger: self.logger.clone(),
        }
    }

    /// Draft dependencies, or a `drafts:disabled` error.
    pub fn draft_deps(&self) -> Result<DraftDeps> {
        self.optional_draft_deps()?.ok_or_else(|| {
            ErrorEnvelope::expected(
                ErrorCode::new("drafts", "disabled"),
                "draft persistence is disabled in configuration",
            )
        })
    }

    fn optional_draft_deps(&self) -> Result<Option<DraftDeps>> {
        let drafts = &self.config.drafts;
        if !drafts.enabled {
            return Ok(None);
        }
        Ok(Some(DraftDeps {
            store: Arc::new(FileDraftStore::new(drafts.directory.clone())),
            key: DraftKey::new(&drafts.storage_key)?,
            logger: self.logger.clone(),
        }))
    }

    pub fn submit_deps(&self) -> Result<SubmitDeps> {
        let mailer = &self.config.mailer;
        Ok(SubmitDeps {
            validator: self.toolkit.validator.clone(),
            mailer: Arc::new(DemoMailer::new(
                Duration::from_millis(mailer.latency_ms),
                mailer.failure_rate_pct,
            )),
            recipient: mailer.recipient.clone(),
            guard: Arc::new(SubmissionGuard::new()),
            drafts: self.optional_draft_deps()?,
            logger: self.logger.clone(),
        })
    }
}

/// Bind engine components to the configured rules and limits.
pub fn toolkit_from_config(config: &ValidatedContactConfig) -> Result<ContactToolkit> {
    let suggester = config
        .suggestions
        .enabled
        .then(|| DomainSuggester::new(config.known_domains().clone()));
    let spam = if config.spam.enabled {
        Some(SpamDetector::new(
            config.spam.keywords.iter(),
            to_usize(config.spam.max_keyword_hits, "spam.maxKeywordHits")?,
        ))
    } else {
        None
    };
    let counter = CounterThresholds {
        max_length: to_usize(config.counter.max_length, "counter.maxLength")?,
        caution_below: to_usize(config.counter.caution_below, "counter.cautionBelow")?,
        critical_below: to_usize(config.counter.critical_below, "counter.criticalBelow")?,
    };

    Ok(ContactToolkit {
        validator: FormValidator::new(config.rule_table().clone()),
        suggester,
        spam,
        counter,
    })
}

fn to_usize(value: u32, field: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| {
        ErrorEnvelope::invariant(ErrorCode::internal(), "config value does not fit in usize")
            .with_metadata("field", field)
    })
}

fn build_logger(log_json: bool, command: &str) -> Option<Arc<dyn LoggerPort>> {
    let fields = log_fields([("command", command)]);
    if log_json {
        let logger = JsonLogger::new(Arc::new(StderrLogSink))
            .with_min_level(min_level_from_env())
            .with_base_fields(fields);
        return Some(Arc::new(logger));
    }
    Some(Arc::from(TracingLogger::new().child(fields)))
}

fn min_level_from_env() -> LogLevel {
    std::env::var("FOLIO_LOG")
        .ok()
        .and_then(|value| LogLevel::parse(&value))
        .unwrap_or(LogLevel::Info)
}

//! Submit a contact form: guard, validate, deliver, clear the draft.

use crate::drafts::{DraftDeps, clear_draft};
use crate::review::email_domain;
use folio_domain::{ContactSubmission, DeliveryReceipt, FormReport, OutgoingMessage};
use folio_engine::FormValidator;
use folio_ports::{LogFields, LoggerPort, MailerPort};
use folio_shared::{ErrorCode, ErrorEnvelope, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Notice shown after a successful delivery.
pub const SUBMIT_SUCCESS_NOTICE: &str = "Message sent successfully! I'll get back to you soon.";

/// Message carried by the error returned when delivery fails.
pub const SUBMIT_FAILURE_NOTICE: &str = "Failed to send message. Please try again.";

/// Single-flight flag shared by every submission of one form.
#[derive(Debug, Default)]
pub struct SubmissionGuard {
    busy: AtomicBool,
}

impl SubmissionGuard {
    /// Fresh, idle guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a submission is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Mark a submission as in flight, or `None` when one already is.
    /// The flag is released when the returned permit drops.
    #[must_use]
    pub fn try_begin(&self) -> Option<SubmissionPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionPermit { guard: self })
    }
}

/// Held for the duration of one submission.
#[derive(Debug)]
pub struct SubmissionPermit<'a> {
    guard: &'a SubmissionGuard,
}

impl Drop for SubmissionPermit<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}

/// Dependencies required by submit.
#[derive(Clone)]
pub struct SubmitDeps {
    /// Rule engine used for the final check.
    pub validator: FormValidator,
    /// Delivery adapter.
    pub mailer: Arc<dyn MailerPort>,
    /// Address that receives contact messages.
    pub recipient: Box<str>,
    /// Overlap guard.
    pub guard: Arc<SubmissionGuard>,
    /// Draft to clear after delivery, when drafts are enabled.
    pub drafts: Option<DraftDeps>,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// How a submission attempt ended, short of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SubmitOutcome {
    /// Another submission was in flight; nothing was done.
    Busy,
    /// The form failed validation; nothing was sent.
    Rejected {
        /// Failing report.
        report: FormReport,
    },
    /// The message was accepted by the mailer.
    Delivered {
        /// Delivery receipt.
        receipt: DeliveryReceipt,
    },
}

impl SubmitOutcome {
    /// Visitor-facing notice for this outcome, if any.
    #[must_use]
    pub const fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Delivered { .. } => Some(SUBMIT_SUCCESS_NOTICE),
            Self::Busy | Self::Rejected { .. } => None,
        }
    }
}

/// Validate and deliver a submission.
///
/// # Errors
///
/// Delivery failures map to an expected `mailer:delivery_failed` error that
/// keeps the mailer's retry class; the underlying code is kept as `cause`.
#[tracing::instrument(skip_all, fields(provider = deps.mailer.provider()))]
pub async fn submit_contact(
    deps: &SubmitDeps,
    submission: &ContactSubmission,
) -> Result<SubmitOutcome> {
    let Some(_permit) = deps.guard.try_begin() else {
        log_event(deps, "contact.submit.busy", "Submission already in flight", LogFields::new());
        return Ok(SubmitOutcome::Busy);
    };

    let report = deps.validator.validate_form(submission);
    if !report.valid {
        let invalid: Vec<Value> = report.errors().map(|(field, _)| Value::from(field)).collect();
        let mut fields = LogFields::new();
        fields.insert("invalidFields".into(), Value::Array(invalid));
        log_event(deps, "contact.submit.rejected", "Submission rejected", fields);
        return Ok(SubmitOutcome::Rejected { report });
    }

    let started_at = Instant::now();
    let message = OutgoingMessage::from_submission(submission, &deps.recipient);
    let sender_domain = email_domain(submission.email.as_str()).to_owned();

    let receipt = match deps.mailer.send(message).await {
        Ok(receipt) => receipt,
        Err(error) => {
            if let Some(logger) = deps.logger.as_ref() {
                let mut fields = delivery_fields(&sender_domain, started_at);
                fields.insert("errorCode".into(), Value::from(error.code.to_string()));
                fields.insert("retriable".into(), Value::from(error.is_retriable()));
                logger.error("contact.submit.failed", "Delivery failed", Some(fields));
            }
            tracing::warn!(code = %error.code, "contact delivery failed");
            return Err(delivery_failed(&error));
        },
    };

    if let Some(drafts) = deps.drafts.as_ref() {
        if let Err(error) = clear_draft(drafts).await {
            tracing::warn!(code = %error.code, "draft not cleared after delivery");
        }
    }

    let mut fields = delivery_fields(&sender_domain, started_at);
    fields.insert("receiptId".into(), Value::from(&*receipt.message_id));
    if let Some(logger) = deps.logger.as_ref() {
        logger.info("contact.submit.delivered", "Message delivered", Some(fields));
    }

    Ok(SubmitOutcome::Delivered { receipt })
}

fn delivery_failed(cause: &ErrorEnvelope) -> ErrorEnvelope {
    ErrorEnvelope::expected_with_class(
        ErrorCode::new("mailer", "delivery_failed"),
        SUBMIT_FAILURE_NOTICE,
        cause.class,
    )
    .with_metadata("cause", cause.code.to_string())
}

fn delivery_fields(sender_domain: &str, started_at: Instant) -> LogFields {
    let mut fields = LogFields::new();
    fields.insert("emailDomain".into(), Value::from(sender_domain));
    fields.insert(
        "durationMs".into(),
        Value::from(u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX)),
    );
    fields
}

fn log_event(deps: &SubmitDeps, event: &str, message: &str, fields: LogFields) {
    if let Some(logger) = deps.logger.as_ref() {
        logger.info(event, message, Some(fields));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drafts::{load_draft, save_draft};
    use folio_adapters::{DemoMailer, InMemoryDraftStore};
    use folio_domain::{ContactFormInput, RuleTable};
    use folio_ports::DraftKey;
    use std::time::Duration;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn valid_submission() -> ContactSubmission {
        ContactSubmission::from(&ContactFormInput {
            name: Some("Ada Lovelace".to_owned()),
            email: Some("ada@example.com".to_owned()),
            subject: Some("Analytical engine".to_owned()),
            message: Some("I would like to discuss a commission.".to_owned()),
        })
    }

    fn deps(failure_rate_pct: u32) -> std::result::Result<SubmitDeps, Box<dyn std::error::Error>> {
        Ok(SubmitDeps {
            validator: FormValidator::new(RuleTable::contact_form()?),
            mailer: Arc::new(DemoMailer::new(Duration::ZERO, failure_rate_pct)),
            recipient: "owner@example.com".into(),
            guard: Arc::new(SubmissionGuard::new()),
            drafts: Some(DraftDeps {
                store: Arc::new(InMemoryDraftStore::new()),
                key: DraftKey::default(),
                logger: None,
            }),
            logger: None,
        })
    }

    #[tokio::test]
    async fn delivery_clears_the_draft() -> TestResult {
        let deps = deps(0)?;
        let drafts = deps.drafts.clone().ok_or("drafts enabled")?;
        save_draft(&drafts, &valid_submission()).await?;

        let outcome = submit_contact(&deps, &valid_submission()).await?;
        assert!(matches!(outcome, SubmitOutcome::Delivered { .. }));
        assert_eq!(outcome.notice(), Some(SUBMIT_SUCCESS_NOTICE));
        assert_eq!(load_draft(&drafts).await?, None);
        assert!(!deps.guard.is_busy());
        Ok(())
    }

    #[tokio::test]
    async fn invalid_form_is_rejected_without_sending() -> TestResult {
        let deps = deps(0)?;
        let mut submission = valid_submission();
        submission.set(folio_domain::FieldName::Email, "ada@nowhere");

        let outcome = submit_contact(&deps, &submission).await?;
        let SubmitOutcome::Rejected { report } = outcome else {
            return Err("expected rejection".into());
        };
        assert!(report.result_for("email").is_some_and(|result| !result.valid));
        Ok(())
    }

    #[tokio::test]
    async fn overlapping_submission_is_busy() -> TestResult {
        let deps = deps(0)?;
        let permit = deps.guard.try_begin().ok_or("guard idle")?;
        assert_eq!(
            submit_contact(&deps, &valid_submission()).await?,
            SubmitOutcome::Busy
        );
        drop(permit);
        assert!(!deps.guard.is_busy());
        Ok(())
    }

    #[tokio::test]
    async fn failed_delivery_keeps_draft_and_reports_notice() -> TestResult {
        let deps = deps(100)?;
        let drafts = deps.drafts.clone().ok_or("drafts enabled")?;
        save_draft(&drafts, &valid_submission()).await?;

        let error = submit_contact(&deps, &valid_submission())
            .await
            .err()
            .ok_or("expected delivery failure")?;
        assert_eq!(error.code, ErrorCode::new("mailer", "delivery_failed"));
        assert_eq!(error.message, SUBMIT_FAILURE_NOTICE);
        assert!(error.is_retriable());
        assert_eq!(
            error.metadata.get("cause").map(String::as_str),
            Some("mailer:network")
        );
        assert!(load_draft(&drafts).await?.is_some());
        assert!(!deps.guard.is_busy());
        Ok(())
    }
}

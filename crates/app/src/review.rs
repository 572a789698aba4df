//! Review a contact form before sending: validation, suggestion, spam, counter.

use crate::toolkit::ContactToolkit;
use folio_domain::{ContactSubmission, FormReport, Suggestion};
use folio_engine::{CharacterCount, SpamCheck, count};
use folio_ports::{LogFields, LoggerPort};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Dependencies required by review.
#[derive(Clone)]
pub struct ReviewDeps {
    /// Engine components.
    pub toolkit: Arc<ContactToolkit>,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// Everything the form shows the visitor for the current input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactReview {
    /// Whole-form validation.
    pub report: FormReport,
    /// Email domain correction, when one applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
    /// Spam keyword check, when detection is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spam: Option<SpamCheck>,
    /// Message character counter.
    pub counter: CharacterCount,
}

impl ContactReview {
    /// True when the form may be submitted. Spam flags are advisory.
    #[must_use]
    pub const fn is_submittable(&self) -> bool {
        self.report.valid
    }
}

/// Review a submission. Never fails.
#[must_use]
pub fn review_contact(deps: &ReviewDeps, submission: &ContactSubmission) -> ContactReview {
    let toolkit = &deps.toolkit;
    let report = toolkit.validator.validate_form(submission);
    let suggestion = toolkit.suggest(submission.email.as_str());
    let spam = toolkit
        .spam
        .as_ref()
        .map(|detector| detector.check(submission.message.as_str()));
    let counter = count(submission.message.as_str(), toolkit.counter);

    let review = ContactReview {
        report,
        suggestion,
        spam,
        counter,
    };

    if let Some(logger) = deps.logger.as_ref() {
        logger.debug(
            "contact.review.completed",
            "Contact form reviewed",
            Some(log_fields_review(submission, &review)),
        );
    }
    tracing::debug!(
        valid = review.report.valid,
        suggested = review.suggestion.is_some(),
        "contact form reviewed"
    );

    review
}

fn log_fields_review(submission: &ContactSubmission, review: &ContactReview) -> LogFields {
    let invalid: Vec<Value> = review
        .report
        .errors()
        .map(|(field, _)| Value::from(field))
        .collect();

    let mut fields = LogFields::new();
    fields.insert("valid".into(), Value::from(review.report.valid));
    fields.insert("invalidFields".into(), Value::Array(invalid));
    fields.insert(
        "emailDomain".into(),
        Value::from(email_domain(submission.email.as_str())),
    );
    fields.insert("charactersUsed".into(), Value::from(review.counter.used));
    fields.insert(
        "spamFlagged".into(),
        Value::from(review.spam.as_ref().is_some_and(|check| check.flagged)),
    );
    fields
}

pub(crate) fn email_domain(email: &str) -> &str {
    email.split_once('@').map_or("", |(_, domain)| domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_adapters::{JsonLogger, MemoryLogSink};
    use folio_domain::{ContactFormInput, RuleTable};
    use folio_engine::CounterLevel;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn deps(logger: Option<Arc<dyn LoggerPort>>) -> Result<ReviewDeps, Box<dyn std::error::Error>> {
        Ok(ReviewDeps {
            toolkit: Arc::new(ContactToolkit::with_rules(RuleTable::contact_form()?)),
            logger,
        })
    }

    fn submission(email: &str, message: &str) -> ContactSubmission {
        ContactSubmission::from(&ContactFormInput {
            name: Some("Ada Lovelace".to_owned()),
            email: Some(email.to_owned()),
            subject: Some("Engines".to_owned()),
            message: Some(message.to_owned()),
        })
    }

    #[test]
    fn valid_form_with_typo_domain_gets_suggestion() -> TestResult {
        let review = review_contact(
            &deps(None)?,
            &submission("ada@gmial.com", "I would like to talk about engines."),
        );
        assert!(review.is_submittable());
        let suggestion = review.suggestion.ok_or("expected suggestion")?;
        assert_eq!(suggestion.corrected_address(), "ada@gmail.com");
        assert_eq!(review.counter.level, CounterLevel::Normal);
        Ok(())
    }

    #[test]
    fn spam_is_flagged_but_does_not_block() -> TestResult {
        let review = review_contact(
            &deps(None)?,
            &submission(
                "ada@example.com",
                "Click here for free money, guaranteed results for everyone!",
            ),
        );
        assert!(review.is_submittable());
        assert!(review.spam.as_ref().is_some_and(|check| check.flagged));
        Ok(())
    }

    #[test]
    fn review_log_omits_personal_data() -> TestResult {
        let sink = Arc::new(MemoryLogSink::default());
        let logger: Arc<dyn LoggerPort> = Arc::new(
            JsonLogger::new(sink.clone()).with_min_level(folio_ports::LogLevel::Debug),
        );
        let body = "A private message that must stay out of logs.";
        let _review = review_contact(&deps(Some(logger))?, &submission("ada@example.com", body));

        let lines = sink.take().concat();
        assert!(lines.contains("\"emailDomain\":\"example.com\""));
        assert!(!lines.contains("ada@example.com"));
        assert!(!lines.contains(body));
        Ok(())
    }
}

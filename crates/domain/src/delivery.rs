//! Outgoing contact messages and delivery receipts.

use crate::submission::ContactSubmission;
use serde::{Deserialize, Serialize};

/// Message handed to a mailer, shaped like the site's email template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    /// Sender display name.
    pub from_name: Box<str>,
    /// Sender reply-to address.
    pub from_email: Box<str>,
    /// Subject line.
    pub subject: Box<str>,
    /// Message body.
    pub message: Box<str>,
    /// Site owner's inbox.
    pub to_email: Box<str>,
}

impl OutgoingMessage {
    /// Address a validated submission to `to_email`.
    #[must_use]
    pub fn from_submission(submission: &ContactSubmission, to_email: &str) -> Self {
        Self {
            from_name: submission.name.as_str().into(),
            from_email: submission.email.as_str().into(),
            subject: submission.subject.as_str().into(),
            message: submission.message.as_str().into(),
            to_email: to_email.into(),
        }
    }

    /// Domain part of the sender address, for logs.
    #[must_use]
    pub fn sender_domain(&self) -> &str {
        self.from_email
            .split_once('@')
            .map_or("", |(_, domain)| domain)
    }
}

/// Confirmation returned by a mailer after accepting a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
    /// Mailer-assigned message id.
    pub message_id: Box<str>,
    /// Acceptance time (ms since Unix epoch).
    pub accepted_at_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::ContactFormInput;

    #[test]
    fn outgoing_message_copies_trimmed_fields() {
        let submission = ContactSubmission::from(&ContactFormInput {
            name: Some(" Ada ".to_owned()),
            email: Some("ada@example.com".to_owned()),
            subject: Some("Hi".to_owned()),
            message: Some("Hello there, friend".to_owned()),
        });
        let message = OutgoingMessage::from_submission(&submission, "owner@example.com");
        assert_eq!(message.from_name.as_ref(), "Ada");
        assert_eq!(message.to_email.as_ref(), "owner@example.com");
        assert_eq!(message.sender_domain(), "example.com");
    }
}

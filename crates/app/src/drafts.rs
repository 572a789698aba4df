//! Save, restore, and discard an in-progress contact form.

use folio_domain::{ContactSubmission, FormDraft};
use folio_ports::{DraftKey, DraftStorePort, LogFields, LoggerPort};
use folio_shared::{ErrorEnvelope, Result};
use serde_json::Value;
use std::sync::Arc;

/// Dependencies required by the draft use-cases.
#[derive(Clone)]
pub struct DraftDeps {
    /// Draft storage.
    pub store: Arc<dyn DraftStorePort>,
    /// Storage key for this form.
    pub key: DraftKey,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// Persist the non-empty fields of `submission`. Returns what was stored.
///
/// A submission with every field blank removes any stored draft.
#[tracing::instrument(skip_all, fields(key = %deps.key))]
pub async fn save_draft(deps: &DraftDeps, submission: &ContactSubmission) -> Result<FormDraft> {
    let draft = FormDraft::from_submission(submission);
    let result = deps.store.save(deps.key.clone(), draft.clone()).await;
    log_outcome(deps, "contact.draft.saved", "Draft saved", &result, draft.len());
    result.map(|()| draft)
}

/// Restore the stored draft, if any.
#[tracing::instrument(skip_all, fields(key = %deps.key))]
pub async fn load_draft(deps: &DraftDeps) -> Result<Option<FormDraft>> {
    let result = deps.store.load(deps.key.clone()).await;
    let stored = result.as_ref().map_or(0, |draft| draft.as_ref().map_or(0, FormDraft::len));
    log_outcome(deps, "contact.draft.loaded", "Draft loaded", &result, stored);
    result
}

/// Discard the stored draft. Returns whether one existed.
#[tracing::instrument(skip_all, fields(key = %deps.key))]
pub async fn clear_draft(deps: &DraftDeps) -> Result<bool> {
    let result = deps.store.clear(deps.key.clone()).await;
    log_outcome(deps, "contact.draft.cleared", "Draft cleared", &result, 0);
    result
}

fn log_outcome<T>(
    deps: &DraftDeps,
    event: &str,
    message: &str,
    result: &Result<T>,
    field_count: usize,
) {
    let Some(logger) = deps.logger.as_ref() else {
        return;
    };
    let mut fields = LogFields::new();
    fields.insert("storageKey".into(), Value::from(deps.key.as_str()));
    match result {
        Ok(_) => {
            fields.insert("fieldCount".into(), Value::from(field_count));
            logger.debug(event, message, Some(fields));
        },
        Err(error) => {
            fields.insert("errorCode".into(), Value::from(error.code.to_string()));
            logger.warn("contact.draft.failed", &error_message(error), Some(fields));
        },
    }
}

fn error_message(error: &ErrorEnvelope) -> String {
    format!("Draft storage failed: {}", error.message)
}

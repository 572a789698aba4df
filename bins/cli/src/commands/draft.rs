//! Draft command handlers: save, show, clear.

use crate::CliOutput;
use crate::context::CliContext;
use crate::error::{CliError, ExitCode};
use crate::format::{
    OutputMode, format_error_output, log_info, ndjson_record, ndjson_summary, pretty_json,
};
use folio_app::{clear_draft, load_draft, save_draft};
use folio_domain::{ContactFormInput, ContactSubmission, FieldName, FormDraft};
use serde_json::json;

/// Run `draft save`.
pub fn run_draft_save(
    mode: OutputMode,
    ctx: &CliContext,
    input: &ContactFormInput,
) -> Result<CliOutput, CliError> {
    let deps = match ctx.draft_deps() {
        Ok(deps) => deps,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };
    let submission = ContactSubmission::from(input);
    let draft = match super::block_on(save_draft(&deps, &submission))? {
        Ok(draft) => draft,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let mut stderr = String::new();
    log_info(&mut stderr, "draft saved", mode.no_progress);
    let stored = !draft.is_empty();

    let stdout = if mode.is_ndjson() {
        ndjson_summary(
            "ok",
            "draftSave",
            Some(json!({ "stored": stored, "fields": draft.len(), "key": deps.key.as_str() })),
        )
    } else if mode.is_json() {
        pretty_json(&json!({
            "status": "ok",
            "key": deps.key.as_str(),
            "stored": stored,
            "draft": draft,
        }))?
    } else if stored {
        format!("status: ok\nkey: {}\nfields: {}\n", deps.key, draft.len())
    } else {
        format!("status: ok\nkey: {}\nfields: 0 (draft removed)\n", deps.key)
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

/// Run `draft show`.
pub fn run_draft_show(mode: OutputMode, ctx: &CliContext) -> Result<CliOutput, CliError> {
    let deps = match ctx.draft_deps() {
        Ok(deps) => deps,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };
    let draft = match super::block_on(load_draft(&deps))? {
        Ok(draft) => draft,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let stdout = if mode.is_ndjson() {
        let mut out = String::new();
        if let Some(draft) = draft.as_ref() {
            out.push_str(&ndjson_record("draft", draft)?);
        }
        out.push_str(&ndjson_summary(
            "ok",
            "draftShow",
            Some(json!({ "found": draft.is_some() })),
        ));
        out
    } else if mode.is_json() {
        pretty_json(&json!({
            "status": "ok",
            "key": deps.key.as_str(),
            "draft": draft,
        }))?
    } else {
        format_draft_text(deps.key.as_str(), draft.as_ref())
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

/// Run `draft clear`.
pub fn run_draft_clear(mode: OutputMode, ctx: &CliContext) -> Result<CliOutput, CliError> {
    let deps = match ctx.draft_deps() {
        Ok(deps) => deps,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };
    let removed = match super::block_on(clear_draft(&deps))? {
        Ok(removed) => removed,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let stdout = if mode.is_ndjson() {
        ndjson_summary("ok", "draftClear", Some(json!({ "removed": removed })))
    } else if mode.is_json() {
        pretty_json(&json!({
            "status": "ok",
            "key": deps.key.as_str(),
            "removed": removed,
        }))?
    } else {
        format!("status: ok\nkey: {}\nremoved: {removed}\n", deps.key)
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

fn format_draft_text(key: &str, draft: Option<&FormDraft>) -> String {
    let Some(draft) = draft else {
        return format!("status: ok\nkey: {key}\ndraft: none\n");
    };
    let mut out = format!("status: ok\nkey: {key}\n");
    for field in FieldName::ALL {
        if let Some(value) = draft.get(field) {
            out.push_str(&format!("{field}: {value}\n"));
        }
    }
    out
}

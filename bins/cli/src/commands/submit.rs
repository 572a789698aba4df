//! Submit command handler.

use crate::CliOutput;
use crate::commands::form::{format_review_text, report_status, review_json};
use crate::context::CliContext;
use crate::error::{CliError, ExitCode};
use crate::format::{
    OutputMode, format_error_output, log_info, ndjson_record, ndjson_summary, pretty_json,
};
use folio_app::{ContactReview, SubmitOutcome, review_contact, submit_contact};
use folio_domain::{ContactFormInput, ContactSubmission};
use serde_json::json;

/// Run `submit`: review the form, then deliver it through the demo mailer.
pub fn run_submit(
    mode: OutputMode,
    ctx: &CliContext,
    input: &ContactFormInput,
) -> Result<CliOutput, CliError> {
    let submission = ContactSubmission::from(input);
    let review = review_contact(&ctx.review_deps(), &submission);
    let deps = match ctx.submit_deps() {
        Ok(deps) => deps,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let mut stderr = String::new();
    if review.is_submittable() {
        log_info(&mut stderr, "sending message", mode.no_progress);
    }

    let outcome = match super::block_on(submit_contact(&deps, &submission))? {
        Ok(outcome) => outcome,
        Err(error) => {
            let mut output = format_error_output(mode, &error);
            output.stderr = stderr;
            return Ok(output);
        },
    };

    let (status, exit_code) = match &outcome {
        SubmitOutcome::Delivered { .. } => ("delivered", ExitCode::Ok),
        SubmitOutcome::Rejected { .. } => ("rejected", ExitCode::InvalidInput),
        SubmitOutcome::Busy => ("busy", ExitCode::Io),
    };

    let stdout = if mode.is_ndjson() {
        let mut out = ndjson_record("review", &review_json(&review))?;
        out.push_str(&ndjson_record("outcome", &outcome)?);
        out.push_str(&ndjson_summary(
            status,
            "submit",
            Some(json!({ "notice": outcome.notice() })),
        ));
        out
    } else if mode.is_json() {
        pretty_json(&json!({
            "status": status,
            "review": review_json(&review),
            "outcome": outcome,
            "notice": outcome.notice(),
        }))?
    } else {
        format_submit_text(&review, &outcome)
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code,
    })
}

fn format_submit_text(review: &ContactReview, outcome: &SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Delivered { receipt } => {
            let mut out = String::from("status: delivered\n");
            if let Some(notice) = outcome.notice() {
                out.push_str(&format!("notice: {notice}\n"));
            }
            out.push_str(&format!("messageId: {}\n", receipt.message_id));
            if let Some(warning) = review.spam.as_ref().and_then(|check| check.warning()) {
                out.push_str(&format!("warning: {warning}\n"));
            }
            out
        },
        SubmitOutcome::Rejected { report } => {
            let review_text = format_review_text(review);
            format!(
                "status: rejected\nreport: {}\n{review_text}",
                report_status(report)
            )
        },
        SubmitOutcome::Busy => "status: busy\nmessage: a submission is already in flight\n".to_owned(),
    }
}

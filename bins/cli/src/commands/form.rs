//! Form commands: validate, validate-field, suggest, review.

use crate::CliOutput;
use crate::context::CliContext;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, log_info, ndjson_record, ndjson_summary, pretty_json};
use folio_app::{ContactReview, review_contact};
use folio_domain::{ContactFormInput, ContactSubmission, FormReport, Suggestion, ValidationResult};
use folio_shared::{ErrorCode, ErrorEnvelope};
use serde_json::json;

/// Form field flags shared by form commands.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FormArgs {
    /// Sender name.
    #[arg(long)]
    pub name: Option<String>,
    /// Sender email address.
    #[arg(long)]
    pub email: Option<String>,
    /// Message subject.
    #[arg(long)]
    pub subject: Option<String>,
    /// Message body.
    #[arg(long)]
    pub message: Option<String>,
    /// Fields as a JSON object; explicit flags win over it.
    #[arg(long)]
    pub input_json: Option<String>,
}

impl FormArgs {
    /// Raw form input from flags and `--input-json`.
    pub fn to_input(&self) -> Result<ContactFormInput, ErrorEnvelope> {
        let explicit = ContactFormInput {
            name: self.name.clone(),
            email: self.email.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
        };
        let Some(input_json) = self.input_json.as_deref() else {
            return Ok(explicit);
        };
        let parsed: ContactFormInput = serde_json::from_str(input_json).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("input", "invalid_json"),
                format!("invalid --input-json: {error}"),
            )
        })?;
        Ok(explicit.or(parsed))
    }
}

/// Run `validate`: whole-form report, exit 2 when invalid.
pub fn run_validate(
    mode: OutputMode,
    ctx: &CliContext,
    input: &ContactFormInput,
) -> Result<CliOutput, CliError> {
    let submission = ContactSubmission::from(input);
    let report = ctx.toolkit.validator.validate_form(&submission);

    let mut stderr = String::new();
    log_info(&mut stderr, "form validation completed", mode.no_progress);

    let stdout = if mode.is_ndjson() {
        let mut out = String::new();
        for field in &report.fields {
            out.push_str(&ndjson_record("field", field)?);
        }
        out.push_str(&ndjson_summary(
            report_status(&report),
            "validate",
            Some(json!({ "valid": report.valid })),
        ));
        out
    } else if mode.is_json() {
        pretty_json(&json!({
            "status": report_status(&report),
            "report": report,
        }))?
    } else {
        format_report_text(&report)
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: report_exit_code(report.valid),
    })
}

/// Run `validate-field`: one field against its rule.
pub fn run_validate_field(
    mode: OutputMode,
    ctx: &CliContext,
    field: &str,
    value: &str,
) -> Result<CliOutput, CliError> {
    let field = field.trim();
    let result = folio_engine::validate(field, value.trim(), ctx.toolkit.validator.rules());
    let status = if result.valid { "valid" } else { "invalid" };

    let stdout = if mode.is_ndjson() {
        let mut out = ndjson_record("field", &json!({ "field": field, "result": result }))?;
        out.push_str(&ndjson_summary(status, "validateField", None));
        out
    } else if mode.is_json() {
        pretty_json(&json!({
            "status": status,
            "field": field,
            "result": result,
        }))?
    } else {
        format!("status: {status}\n{}", format_field_line(field, &result))
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: report_exit_code(result.valid),
    })
}

/// Run `suggest`: a domain correction for one email address.
pub fn run_suggest(mode: OutputMode, ctx: &CliContext, email: &str) -> Result<CliOutput, CliError> {
    let suggestion = ctx.toolkit.suggest(email);

    let stdout = if mode.is_ndjson() {
        let mut out = String::new();
        if let Some(suggestion) = suggestion.as_ref() {
            out.push_str(&ndjson_record("suggestion", &suggestion_json(suggestion))?);
        }
        out.push_str(&ndjson_summary(
            "ok",
            "suggest",
            Some(json!({ "suggested": suggestion.is_some() })),
        ));
        out
    } else if mode.is_json() {
        pretty_json(&json!({
            "status": "ok",
            "suggestion": suggestion.as_ref().map(suggestion_json),
        }))?
    } else {
        match suggestion.as_ref() {
            Some(suggestion) => format!(
                "status: ok\nsuggestion: {}\nprompt: {}\n",
                suggestion.corrected_address(),
                suggestion.prompt()
            ),
            None => "status: ok\nsuggestion: none\n".to_owned(),
        }
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

/// Run `review`: report, suggestion, spam check, and counter.
pub fn run_review(
    mode: OutputMode,
    ctx: &CliContext,
    input: &ContactFormInput,
) -> Result<CliOutput, CliError> {
    let submission = ContactSubmission::from(input);
    let review = review_contact(&ctx.review_deps(), &submission);

    let mut stderr = String::new();
    log_info(&mut stderr, "form review completed", mode.no_progress);

    let stdout = if mode.is_ndjson() {
        format_review_ndjson(&review)?
    } else if mode.is_json() {
        pretty_json(&json!({
            "status": report_status(&review.report),
            "review": review_json(&review),
        }))?
    } else {
        format_review_text(&review)
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: report_exit_code(review.is_submittable()),
    })
}

pub const fn report_status(report: &FormReport) -> &'static str {
    if report.valid { "valid" } else { "invalid" }
}

pub const fn report_exit_code(valid: bool) -> ExitCode {
    if valid {
        ExitCode::Ok
    } else {
        ExitCode::InvalidInput
    }
}

pub fn format_report_text(report: &FormReport) -> String {
    let mut out = format!("status: {}\n", report_status(report));
    for field in &report.fields {
        out.push_str(&format_field_line(&field.field, &field.result));
    }
    out
}

fn format_field_line(field: &str, result: &ValidationResult) -> String {
    if result.valid {
        return format!("{field}: ok\n");
    }
    result.message().map_or_else(
        || format!("{field}: error\n"),
        |message| format!("{field}: error: {message}\n"),
    )
}

fn suggestion_json(suggestion: &Suggestion) -> serde_json::Value {
    json!({
        "localPart": suggestion.local_part,
        "suggestedDomain": suggestion.suggested_domain,
        "correctedAddress": suggestion.corrected_address(),
        "prompt": suggestion.prompt(),
    })
}

pub fn review_json(review: &ContactReview) -> serde_json::Value {
    json!({
        "report": review.report,
        "suggestion": review.suggestion.as_ref().map(suggestion_json),
        "spam": review.spam.as_ref().map(|check| json!({
            "flagged": check.flagged,
            "matched": check.matched,
            "warning": check.warning(),
        })),
        "counter": {
            "used": review.counter.used,
            "remaining": review.counter.remaining,
            "level": review.counter.level,
            "text": review.counter.to_string(),
        },
    })
}

pub fn format_review_text(review: &ContactReview) -> String {
    let mut out = format_report_text(&review.report);
    if let Some(suggestion) = review.suggestion.as_ref() {
        out.push_str(&format!("suggestion: {}\n", suggestion.prompt()));
    }
    if let Some(warning) = review.spam.as_ref().and_then(|check| check.warning()) {
        out.push_str(&format!("warning: {warning}\n"));
    }
    out.push_str(&format!(
        "counter: {} ({})\n",
        review.counter,
        review.counter.level.as_str()
    ));
    out
}

fn format_review_ndjson(review: &ContactReview) -> Result<String, CliError> {
    let mut out = String::new();
    for field in &review.report.fields {
        out.push_str(&ndjson_record("field", field)?);
    }
    if let Some(suggestion) = review.suggestion.as_ref() {
        out.push_str(&ndjson_record("suggestion", &suggestion_json(suggestion))?);
    }
    if let Some(check) = review.spam.as_ref() {
        out.push_str(&ndjson_record("spam", check)?);
    }
    out.push_str(&ndjson_record("counter", &review.counter)?);
    out.push_str(&ndjson_summary(
        report_status(&review.report),
        "review",
        Some(json!({ "valid": review.report.valid })),
    ));
    Ok(out)
}

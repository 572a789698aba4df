//! Output format helpers for CLI commands.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use clap::{Args, ValueEnum};
use folio_shared::{ErrorEnvelope, redact_if_sensitive};
use serde::Serialize;
use serde_json::Value;

/// Output format choices for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-friendly text output.
    Text,
    /// Machine-friendly JSON output.
    Json,
    /// Line-delimited JSON (NDJSON) output.
    Ndjson,
}

/// Output-related CLI flags.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output format for command responses.
    #[arg(long, global = true, value_enum)]
    pub output: Option<OutputFormat>,
    /// Emit machine-friendly defaults (NDJSON output, no progress).
    #[arg(long, global = true)]
    pub agent: bool,
    /// Suppress progress output on stderr.
    #[arg(long, global = true)]
    pub no_progress: bool,
    /// Emit machine-readable JSON output (alias for `--output json`).
    #[arg(long, global = true)]
    pub json: bool,
}

/// Output mode derived from CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct OutputMode {
    pub format: OutputFormat,
    pub no_progress: bool,
}

impl OutputMode {
    /// Build output mode from CLI flags.
    #[must_use]
    pub const fn from_args(args: &OutputArgs) -> Self {
        let format = match (args.output, args.json, args.agent) {
            (Some(value), _, _) => value,
            (None, true, _) => OutputFormat::Json,
            (None, false, true) => OutputFormat::Ndjson,
            (None, false, false) => OutputFormat::Text,
        };

        Self {
            format,
            no_progress: args.agent || args.no_progress,
        }
    }

    /// Returns true when JSON output is requested.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Returns true when NDJSON output is requested.
    #[must_use]
    pub const fn is_ndjson(self) -> bool {
        matches!(self.format, OutputFormat::Ndjson)
    }
}

/// Pretty JSON with a trailing newline.
pub fn pretty_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    let mut output = serde_json::to_string_pretty(value)?;
    output.push('\n');
    Ok(output)
}

/// One NDJSON record: `{"type": record_type, ...value}`.
pub fn ndjson_record<T: Serialize>(record_type: &str, value: &T) -> Result<String, CliError> {
    let mut payload = serde_json::Map::new();
    payload.insert("type".to_owned(), Value::from(record_type));
    match serde_json::to_value(value)? {
        Value::Object(map) => payload.extend(map),
        Value::Null => {},
        other => {
            payload.insert("value".to_owned(), other);
        },
    }
    let mut output = serde_json::to_string(&Value::Object(payload))?;
    output.push('\n');
    Ok(output)
}

/// Closing NDJSON summary line.
pub fn ndjson_summary(status: &str, kind: &str, extra: Option<Value>) -> String {
    let mut payload = serde_json::Map::new();
    payload.insert("type".to_owned(), Value::from("summary"));
    payload.insert("status".to_owned(), Value::from(status));
    payload.insert("kind".to_owned(), Value::from(kind));
    if let Some(Value::Object(map)) = extra {
        payload.extend(map);
    }
    let mut out = serde_json::to_string(&Value::Object(payload)).unwrap_or_else(|_| {
        "{\"type\":\"summary\",\"status\":\"error\",\"kind\":\"internal\"}".to_owned()
    });
    out.push('\n');
    out
}

/// Append a progress line unless progress output is suppressed.
pub fn log_info(stderr: &mut String, message: &str, no_progress: bool) {
    if no_progress {
        return;
    }
    stderr.push_str("info: ");
    stderr.push_str(message);
    stderr.push('\n');
}

/// Render a library error in the requested format, with sensitive metadata
/// redacted.
#[must_use]
pub fn format_error_output(mode: OutputMode, error: &ErrorEnvelope) -> CliOutput {
    let error = sanitize_error(error);
    let exit_code = ExitCode::for_envelope(&error);

    let stdout = if mode.is_ndjson() {
        let payload = serde_json::json!({
            "type": "error",
            "status": "error",
            "error": error,
        });
        serde_json::to_string(&payload).map_or_else(
            |_| fallback_error_json(),
            |mut out| {
                out.push('\n');
                out
            },
        )
    } else if mode.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "error": error,
        });
        pretty_json(&payload).unwrap_or_else(|_| fallback_error_json())
    } else {
        format_error_text(&error)
    };

    CliOutput {
        stdout,
        stderr: String::new(),
        exit_code,
    }
}

fn sanitize_error(error: &ErrorEnvelope) -> ErrorEnvelope {
    let mut error = error.clone();
    for (key, value) in &mut error.metadata {
        *value = redact_if_sensitive(key, value);
    }
    error
}

fn fallback_error_json() -> String {
    "{\"status\":\"error\",\"error\":{\"code\":\"core:internal\",\"message\":\"internal error\"}}\n"
        .to_owned()
}

fn format_error_text(error: &ErrorEnvelope) -> String {
    let mut out = format!(
        "status: error\ncode: {}\nmessage: {}\nkind: {}\n",
        error.code, error.message, error.kind
    );
    if !error.metadata.is_empty() {
        out.push_str("meta:\n");
        for (key, value) in &error.metadata {
            out.push_str(&format!("  {key}: {value}\n"));
        }
    }
    out
}

//! Draft persistence and demo delivery through the CLI.

use serde_json::{Value, json};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> io::Result<PathBuf> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(io::Error::other)?
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("folio-{prefix}-{nanos}"));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Overrides pointing drafts at `dir` with an instant mailer.
fn overrides(dir: &Path, failure_rate_pct: u32) -> String {
    json!({
        "drafts": { "directory": dir.join("drafts") },
        "mailer": { "latencyMs": 0, "failureRatePct": failure_rate_pct },
    })
    .to_string()
}

fn run_cli(overrides: &str, args: &[&str]) -> io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_folio"));
    for (key, _) in std::env::vars() {
        if key.starts_with("FOLIO_") {
            command.env_remove(key);
        }
    }
    command
        .arg("--overrides-json")
        .arg(overrides)
        .args(args)
        .output()
}

fn json_stdout(output: &Output) -> io::Result<Value> {
    serde_json::from_slice(&output.stdout).map_err(io::Error::other)
}

const VALID_FORM: [&str; 8] = [
    "--name",
    "Ada Lovelace",
    "--email",
    "ada@example.com",
    "--subject",
    "Analytical engine",
    "--message",
    "I would like to discuss a commission.",
];

fn args<'a>(prefix: &[&'a str], rest: &[&'a str]) -> Vec<&'a str> {
    let mut all = prefix.to_vec();
    all.extend_from_slice(rest);
    all
}

#[test]
fn draft_save_show_clear() -> io::Result<()> {
    let dir = temp_dir("drafts")?;
    let overrides = overrides(&dir, 0);

    let output = run_cli(
        &overrides,
        &["--json", "draft", "save", "--name", "Ada", "--subject", "  "],
    )?;
    assert!(output.status.success());
    let value = json_stdout(&output)?;
    assert_eq!(value["stored"], true);
    assert_eq!(value["draft"], json!({ "name": "Ada" }));
    assert!(dir.join("drafts").join("portfolioContactForm.json").exists());

    let output = run_cli(&overrides, &["--json", "draft", "show"])?;
    assert!(output.status.success());
    let value = json_stdout(&output)?;
    assert_eq!(value["draft"]["name"], "Ada");

    let output = run_cli(&overrides, &["draft", "show"])?;
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "status: ok\nkey: portfolioContactForm\nname: Ada\n"
    );

    let output = run_cli(&overrides, &["--json", "draft", "clear"])?;
    assert_eq!(json_stdout(&output)?["removed"], true);

    let output = run_cli(&overrides, &["--json", "draft", "clear"])?;
    assert_eq!(json_stdout(&output)?["removed"], false);

    let output = run_cli(&overrides, &["--json", "draft", "show"])?;
    assert!(json_stdout(&output)?["draft"].is_null());

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn corrupt_draft_is_io_error() -> io::Result<()> {
    let dir = temp_dir("drafts-corrupt")?;
    std::fs::create_dir_all(dir.join("drafts"))?;
    std::fs::write(dir.join("drafts").join("portfolioContactForm.json"), "{not json")?;

    let output = run_cli(&overrides(&dir, 0), &["--json", "draft", "show"])?;
    assert_eq!(output.status.code(), Some(3));
    let value = json_stdout(&output)?;
    assert_eq!(value["error"]["code"]["namespace"], "drafts");
    assert_eq!(value["error"]["code"]["code"], "corrupt");

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn disabled_drafts_are_rejected() -> io::Result<()> {
    let overrides = json!({ "drafts": { "enabled": false } }).to_string();
    let output = run_cli(&overrides, &["--json", "draft", "show"])?;
    assert_eq!(output.status.code(), Some(2));
    let value = json_stdout(&output)?;
    assert_eq!(value["error"]["code"]["code"], "disabled");
    Ok(())
}

#[test]
fn submit_delivers_and_clears_draft() -> io::Result<()> {
    let dir = temp_dir("submit")?;
    let overrides = overrides(&dir, 0);

    let output = run_cli(&overrides, &["draft", "save", "--name", "Ada Lovelace"])?;
    assert!(output.status.success());

    let output = run_cli(&overrides, &args(&["--json", "submit"], &VALID_FORM))?;
    assert!(output.status.success());
    let value = json_stdout(&output)?;
    assert_eq!(value["status"], "delivered");
    assert_eq!(value["outcome"]["status"], "delivered");
    assert_eq!(
        value["notice"],
        "Message sent successfully! I'll get back to you soon."
    );
    let message_id = value["outcome"]["receipt"]["messageId"]
        .as_str()
        .unwrap_or_default();
    assert!(message_id.starts_with("demo-"));

    let output = run_cli(&overrides, &["--json", "draft", "show"])?;
    assert!(json_stdout(&output)?["draft"].is_null());

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn submit_text_reports_notice() -> io::Result<()> {
    let dir = temp_dir("submit-text")?;
    let output = run_cli(&overrides(&dir, 0), &args(&["submit"], &VALID_FORM))?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with(
        "status: delivered\nnotice: Message sent successfully! I'll get back to you soon.\n"
    ));
    assert!(stdout.contains("messageId: demo-"));

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn failed_delivery_keeps_draft() -> io::Result<()> {
    let dir = temp_dir("submit-fail")?;
    let overrides = overrides(&dir, 100);

    let output = run_cli(&overrides, &["draft", "save", "--name", "Ada Lovelace"])?;
    assert!(output.status.success());

    let output = run_cli(&overrides, &args(&["--json", "submit"], &VALID_FORM))?;
    assert_eq!(output.status.code(), Some(3));
    let value = json_stdout(&output)?;
    assert_eq!(value["status"], "error");
    assert_eq!(value["error"]["code"]["code"], "delivery_failed");
    assert_eq!(
        value["error"]["message"],
        "Failed to send message. Please try again."
    );
    assert_eq!(value["error"]["class"], "Retriable");
    assert_eq!(value["error"]["metadata"]["cause"], "mailer:network");

    let output = run_cli(&overrides, &["--json", "draft", "show"])?;
    assert_eq!(json_stdout(&output)?["draft"]["name"], "Ada Lovelace");

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn invalid_form_is_rejected_without_sending() -> io::Result<()> {
    let dir = temp_dir("submit-reject")?;
    let output = run_cli(
        &overrides(&dir, 100),
        &["--json", "submit", "--name", "A", "--email", "ada@example.com"],
    )?;
    assert_eq!(output.status.code(), Some(2));
    let value = json_stdout(&output)?;
    assert_eq!(value["status"], "rejected");
    assert_eq!(value["outcome"]["report"]["valid"], false);
    assert!(value["notice"].is_null());

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn use_draft_fills_missing_fields() -> io::Result<()> {
    let dir = temp_dir("submit-draft")?;
    let overrides = overrides(&dir, 0);

    let output = run_cli(
        &overrides,
        &[
            "draft",
            "save",
            "--name",
            "Ada Lovelace",
            "--email",
            "ada@example.com",
            "--subject",
            "Draft subject",
        ],
    )?;
    assert!(output.status.success());

    let output = run_cli(
        &overrides,
        &[
            "--json",
            "review",
            "--use-draft",
            "--message",
            "Completing the saved draft now.",
        ],
    )?;
    assert!(output.status.success());
    let value = json_stdout(&output)?;
    assert_eq!(value["status"], "valid");

    let output = run_cli(
        &overrides,
        &["--json", "review", "--message", "Completing the saved draft now."],
    )?;
    assert_eq!(output.status.code(), Some(2));

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn partial_failure_rate_fails_some_runs() -> io::Result<()> {
    let dir = temp_dir("submit-partial")?;
    let overrides = overrides(&dir, 50);

    let mut codes = Vec::new();
    for _ in 0..24 {
        let output = run_cli(&overrides, &args(&["--json", "submit"], &VALID_FORM))?;
        codes.push(output.status.code());
    }
    assert!(codes.contains(&Some(0)), "no delivery succeeded: {codes:?}");
    assert!(codes.contains(&Some(3)), "no delivery failed: {codes:?}");

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn draft_with_extra_keys_still_loads() -> io::Result<()> {
    let dir = temp_dir("drafts-extra")?;
    std::fs::create_dir_all(dir.join("drafts"))?;
    std::fs::write(
        dir.join("drafts").join("portfolioContactForm.json"),
        r#"{"name":"Ada","phone":"555-0100","subject":""}"#,
    )?;

    let output = run_cli(&overrides(&dir, 0), &["--json", "draft", "show"])?;
    assert!(output.status.success());
    let value = json_stdout(&output)?;
    assert_eq!(value["draft"], json!({ "name": "Ada" }));

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

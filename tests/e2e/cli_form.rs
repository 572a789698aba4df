//! Form validation, suggestion, and review through the CLI.

use serde_json::Value;
use std::io;
use std::process::{Command, Output};

fn run_cli(args: &[&str]) -> io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_folio"));
    for (key, _) in std::env::vars() {
        if key.starts_with("FOLIO_") {
            command.env_remove(key);
        }
    }
    command.args(args).output()
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

fn with_form<'a>(prefix: &[&'a str], overrides: &[(&'a str, &'a str)]) -> Vec<&'a str> {
    let mut args: Vec<&str> = prefix.to_vec();
    let mut form = VALID_FORM.to_vec();
    for (flag, value) in overrides {
        if let Some(position) = form.iter().position(|arg| arg == flag) {
            if let Some(slot) = form.get_mut(position + 1) {
                *slot = *value;
            }
        }
    }
    args.extend(form);
    args
}

#[test]
fn valid_form_passes() -> io::Result<()> {
    let output = run_cli(&with_form(&["--json", "validate"], &[]))?;
    assert!(output.status.success());
    let value = json_stdout(&output)?;
    assert_eq!(value["status"], "valid");
    assert_eq!(value["report"]["fields"].as_array().map(Vec::len), Some(4));
    Ok(())
}

#[test]
fn invalid_email_exits_with_invalid_input() -> io::Result<()> {
    let output = run_cli(&with_form(&["--json", "validate"], &[("--email", "foo@bar")]))?;
    assert_eq!(output.status.code(), Some(2));
    let value = json_stdout(&output)?;
    assert_eq!(value["status"], "invalid");
    let email = value["report"]["fields"]
        .as_array()
        .and_then(|fields| fields.iter().find(|field| field["field"] == "email"))
        .cloned()
        .ok_or_else(|| io::Error::other("missing email result"))?;
    assert_eq!(email["valid"], false);
    assert_eq!(email["message"], "Please enter a valid email address");
    Ok(())
}

#[test]
fn text_report_lists_every_field() -> io::Result<()> {
    let output = run_cli(&["--no-progress", "validate", "--name", "Ada"])?;
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "status: invalid\n\
         name: ok\n\
         email: error: Email is required\n\
         subject: error: Subject is required\n\
         message: error: Message is required\n"
    );
    assert!(output.stderr.is_empty());
    Ok(())
}

#[test]
fn message_length_bounds() -> io::Result<()> {
    let too_long = "a".repeat(1001);
    let fits = "a".repeat(500);

    let output = run_cli(&["validate-field", "message", "short"])?;
    assert_eq!(output.status.code(), Some(2));
    let output = run_cli(&["validate-field", "message", &too_long])?;
    assert_eq!(output.status.code(), Some(2));
    let output = run_cli(&["validate-field", "message", &fits])?;
    assert!(output.status.success());
    Ok(())
}

#[test]
fn input_json_is_accepted_and_flags_win() -> io::Result<()> {
    let input = r#"{"name":"Ada","email":"bad","subject":"Hello there","message":"A long enough message."}"#;
    let output = run_cli(&[
        "--json",
        "validate",
        "--input-json",
        input,
        "--email",
        "ada@example.com",
    ])?;
    assert!(output.status.success());

    let output = run_cli(&["--json", "validate", "--input-json", "{not json"])?;
    assert_eq!(output.status.code(), Some(2));
    let value = json_stdout(&output)?;
    assert_eq!(value["error"]["code"]["namespace"], "input");
    Ok(())
}

#[test]
fn suggest_corrects_close_domains_only() -> io::Result<()> {
    let output = run_cli(&["--json", "suggest", "user@gmial.com"])?;
    assert!(output.status.success());
    let value = json_stdout(&output)?;
    assert_eq!(value["suggestion"]["localPart"], "user");
    assert_eq!(value["suggestion"]["suggestedDomain"], "gmail.com");
    assert_eq!(value["suggestion"]["prompt"], "Did you mean user@gmail.com?");

    for email in ["user@gmail.com", "not-an-email", "user@"] {
        let output = run_cli(&["--json", "suggest", email])?;
        assert!(output.status.success());
        assert_eq!(json_stdout(&output)?["suggestion"], Value::Null, "{email}");
    }
    Ok(())
}

#[test]
fn review_reports_suggestion_spam_and_counter() -> io::Result<()> {
    let message = "Click here for free money, guaranteed!";
    let output = run_cli(&with_form(
        &["--json", "review"],
        &[("--email", "ada@yahooo.com"), ("--message", message)],
    ))?;
    assert!(output.status.success());
    let review = json_stdout(&output)?["review"].clone();
    assert_eq!(review["suggestion"]["suggestedDomain"], "yahoo.com");
    assert_eq!(review["spam"]["flagged"], true);
    assert_eq!(
        review["spam"]["warning"],
        "Your message may be flagged as spam. Please use professional language."
    );
    let remaining = 1000 - message.chars().count();
    assert_eq!(review["counter"]["remaining"], remaining);
    assert_eq!(
        review["counter"]["text"],
        format!("{remaining} characters remaining")
    );
    Ok(())
}

#[test]
fn review_ndjson_ends_with_summary() -> io::Result<()> {
    let output = run_cli(&with_form(&["--agent", "review"], &[]))?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let records: Vec<Value> = stdout
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()
        .map_err(io::Error::other)?;
    let types: Vec<&str> = records
        .iter()
        .filter_map(|record| record["type"].as_str())
        .collect();
    assert_eq!(
        types,
        ["field", "field", "field", "field", "spam", "counter", "summary"]
    );
    assert!(output.stderr.is_empty());
    Ok(())
}

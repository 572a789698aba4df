//! Config loading and validation through the CLI.

use serde_json::Value;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn cli_command() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_folio"));
    for (key, _) in std::env::vars() {
        if key.starts_with("FOLIO_") {
            command.env_remove(key);
        }
    }
    command
}

fn run_cli(args: &[&str]) -> io::Result<Output> {
    cli_command().args(args).output()
}

fn json_stdout(output: &Output) -> io::Result<Value> {
    serde_json::from_slice(&output.stdout).map_err(io::Error::other)
}

fn temp_dir(prefix: &str) -> io::Result<PathBuf> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(io::Error::other)?
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("folio-{prefix}-{nanos}"));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[test]
fn config_show_prints_defaults() -> io::Result<()> {
    let output = run_cli(&["--json", "config", "show"])?;
    assert!(output.status.success());
    let value = json_stdout(&output)?;
    let config = &value["effectiveConfig"];
    assert_eq!(value["status"], "ok");
    assert_eq!(config["version"], 1);
    assert_eq!(config["counter"]["maxLength"], 1000);
    assert_eq!(config["mailer"]["failureRatePct"], 10);
    assert_eq!(config["suggestions"]["knownDomains"][0], "gmail.com");
    assert_eq!(
        config["form"]["rules"]["subject"]["message"],
        "Subject must be at least 3 characters long"
    );
    Ok(())
}

#[test]
fn config_show_text_defaults_to_toml() -> io::Result<()> {
    let output = run_cli(&["config", "show"])?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("status: ok\nconfig:\n"));
    assert!(stdout.contains("[counter]"));
    assert!(stdout.contains("maxLength = 1000"));
    Ok(())
}

#[test]
fn toml_file_replaces_rules() -> io::Result<()> {
    let dir = temp_dir("config-toml")?;
    let path = dir.join("folio.toml");
    std::fs::write(
        &path,
        r#"version = 1

[form.rules.email]
required = true
message = "Email please"

[counter]
maxLength = 500
cautionBelow = 50
criticalBelow = 10
"#,
    )?;
    let path_arg = path.to_string_lossy().into_owned();

    let output = run_cli(&["--json", "config", "validate", "--config", &path_arg])?;
    assert!(output.status.success());
    let value = json_stdout(&output)?;
    assert_eq!(value["rules"], 1);
    assert_eq!(value["configPath"], path_arg.as_str());

    // Only the email rule survives, so an empty name passes.
    let output = run_cli(&[
        "--json",
        "--config",
        &path_arg,
        "validate-field",
        "name",
        "",
    ])?;
    assert!(output.status.success());

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn unsupported_version_is_invalid_input() -> io::Result<()> {
    let dir = temp_dir("config-version")?;
    let path = dir.join("folio.json");
    std::fs::write(&path, r#"{"version":2}"#)?;
    let path_arg = path.to_string_lossy().into_owned();

    let output = run_cli(&["--json", "config", "validate", "--path", &path_arg])?;
    assert_eq!(output.status.code(), Some(2));
    let value = json_stdout(&output)?;
    assert_eq!(value["status"], "error");
    assert_eq!(value["error"]["code"]["code"], "unsupported_version");

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn missing_config_file_is_io_error() -> io::Result<()> {
    let dir = temp_dir("config-missing")?;
    let path = dir.join("absent.toml");
    let path_arg = path.to_string_lossy().into_owned();

    let output = run_cli(&["--json", "config", "show", "--config", &path_arg])?;
    assert_eq!(output.status.code(), Some(3));
    let value = json_stdout(&output)?;
    assert_eq!(value["error"]["code"]["namespace"], "config");
    assert_eq!(value["error"]["code"]["code"], "config_file_not_found");

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn unknown_keys_in_overrides_are_rejected() -> io::Result<()> {
    let output = run_cli(&[
        "--json",
        "--overrides-json",
        r#"{"theme":"dark"}"#,
        "config",
        "validate",
    ])?;
    assert_eq!(output.status.code(), Some(2));
    let value = json_stdout(&output)?;
    assert_eq!(value["error"]["code"]["code"], "invalid_json");
    Ok(())
}

#[test]
fn env_can_disable_suggestions() -> io::Result<()> {
    let output = cli_command()
        .env("FOLIO_SUGGESTIONS_ENABLED", "false")
        .args(["--json", "suggest", "user@gmial.com"])
        .output()?;
    assert!(output.status.success());
    let value = json_stdout(&output)?;
    assert!(value["suggestion"].is_null());
    Ok(())
}

#[test]
fn env_overrides_counter_limit() -> io::Result<()> {
    let output = cli_command()
        .env("FOLIO_COUNTER_MAX_LENGTH", "200")
        .args([
            "--json",
            "review",
            "--name",
            "Ada Lovelace",
            "--email",
            "ada@example.com",
            "--subject",
            "Hello",
            "--message",
            "Fifteen chars!!",
        ])
        .output()?;
    let value = json_stdout(&output)?;
    assert_eq!(value["review"]["counter"]["used"], 15);
    assert_eq!(value["review"]["counter"]["remaining"], 185);
    assert_eq!(value["review"]["counter"]["text"], "185 characters remaining");
    Ok(())
}

#[test]
fn bad_env_value_is_invalid_input() -> io::Result<()> {
    let output = cli_command()
        .env("FOLIO_MAILER_LATENCY_MS", "soon")
        .args(["--json", "config", "show"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    let value = json_stdout(&output)?;
    assert_eq!(value["error"]["code"]["code"], "invalid_env_int");
    Ok(())
}

//! CLI smoke tests: binary starts, reports its version, rejects bad usage.

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

#[test]
fn info_reports_version_in_text_and_json() -> io::Result<()> {
    let output = run_cli(&["info"])?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("status: ok\nname: folio\n"));
    assert!(stdout.contains(&format!("version: {}", env!("CARGO_PKG_VERSION"))));

    let output = run_cli(&["--json", "info"])?;
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    assert_eq!(value["build"]["name"], "folio");
    assert_eq!(value["build"]["components"]["engine"], env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[test]
fn agent_mode_emits_single_ndjson_summary() -> io::Result<()> {
    let output = run_cli(&["--agent", "info"])?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    let value: serde_json::Value =
        serde_json::from_str(lines.first().copied().unwrap_or_default())
            .map_err(io::Error::other)?;
    assert_eq!(value["type"], "summary");
    assert_eq!(value["kind"], "info");
    Ok(())
}

#[test]
fn unknown_subcommand_is_a_usage_error() -> io::Result<()> {
    let output = run_cli(&["frobnicate"])?;
    assert_eq!(output.status.code(), Some(2));
    Ok(())
}

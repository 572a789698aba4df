//! Info command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, ndjson_summary, pretty_json};
use serde_json::json;

/// Run the info command.
pub fn run_info(mode: OutputMode) -> Result<CliOutput, CliError> {
    let build = json!({
        "name": env!("CARGO_BIN_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "components": components(),
    });

    let stdout = if mode.is_ndjson() {
        ndjson_summary("ok", "info", Some(json!({ "build": build })))
    } else if mode.is_json() {
        pretty_json(&json!({ "status": "ok", "build": build }))?
    } else {
        let mut out = format!(
            "status: ok\nname: {}\nversion: {}\n",
            env!("CARGO_BIN_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        for (name, version) in components() {
            out.push_str(&format!("{name}: {version}\n"));
        }
        out
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

fn components() -> std::collections::BTreeMap<&'static str, &'static str> {
    [
        ("shared", folio_shared::shared_crate_version()),
        ("domain", folio_domain::domain_crate_version()),
        ("engine", folio_engine::engine_crate_version()),
        ("ports", folio_ports::ports_crate_version()),
        ("config", folio_config::config_crate_version()),
        ("adapters", folio_adapters::adapters_crate_version()),
        ("app", folio_app::app_crate_version()),
    ]
    .into_iter()
    .collect()
}

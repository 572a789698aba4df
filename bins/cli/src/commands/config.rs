//! Config command handlers: show, validate.

use crate::CliOutput;
use crate::context::CliContext;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, format_error_output, log_info, ndjson_summary, pretty_json};
use folio_config::{to_pretty_json, to_pretty_toml};
use serde_json::json;

/// Serialization used for `config show` in text mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigShowFormat {
    /// TOML document.
    #[default]
    Toml,
    /// Pretty JSON document.
    Json,
}

/// Run `config show`: print the effective configuration.
pub fn run_config_show(
    mode: OutputMode,
    ctx: &CliContext,
    format: ConfigShowFormat,
) -> Result<CliOutput, CliError> {
    let config_path = ctx
        .config_path()
        .map(|path| path.to_string_lossy().into_owned());

    let mut stderr = String::new();
    log_info(&mut stderr, "config show completed", mode.no_progress);

    let stdout = if mode.is_ndjson() {
        ndjson_summary(
            "ok",
            "config",
            Some(json!({
                "configPath": config_path,
                "effectiveConfig": ctx.config.as_ref(),
            })),
        )
    } else if mode.is_json() {
        pretty_json(&json!({
            "status": "ok",
            "configPath": config_path,
            "effectiveConfig": ctx.config.as_ref(),
        }))?
    } else {
        let rendered = match format {
            ConfigShowFormat::Toml => to_pretty_toml(ctx.config.as_ref()),
            ConfigShowFormat::Json => to_pretty_json(ctx.config.as_ref()),
        };
        match rendered {
            Ok(text) => format!("status: ok\nconfig:\n{text}"),
            Err(error) => return Ok(format_error_output(mode, &error)),
        }
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

/// Run `config validate`. Loading already validated the config, so reaching
/// this point means it is valid.
pub fn run_config_validate(mode: OutputMode, ctx: &CliContext) -> Result<CliOutput, CliError> {
    let config_path = ctx
        .config_path()
        .map(|path| path.to_string_lossy().into_owned());
    let rules = ctx.config.rule_table().len();

    let mut stderr = String::new();
    log_info(&mut stderr, "config validate completed", mode.no_progress);

    let stdout = if mode.is_ndjson() {
        ndjson_summary(
            "ok",
            "config",
            Some(json!({ "configPath": config_path, "rules": rules })),
        )
    } else if mode.is_json() {
        pretty_json(&json!({
            "status": "ok",
            "configPath": config_path,
            "rules": rules,
        }))?
    } else {
        format!(
            "status: ok\nconfig: {}\nrules: {rules}\n",
            config_path.as_deref().unwrap_or("(defaults)")
        )
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

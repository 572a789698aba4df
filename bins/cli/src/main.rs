//! CLI binary entrypoint.

mod commands;
mod context;
mod error;
mod format;

use clap::{Parser, Subcommand};
use commands::{
    ConfigShowFormat, FormArgs, run_config_show, run_config_validate, run_draft_clear,
    run_draft_save, run_draft_show, run_info, run_review, run_submit, run_suggest, run_validate,
    run_validate_field,
};
use context::{CliContext, ConfigArgs};
use error::{CliError, ExitCode};
use folio_app::load_draft;
use folio_domain::ContactFormInput;
use folio_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use format::{OutputArgs, OutputMode, format_error_output};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "folio",
    version,
    about = "Portfolio contact form: validation, suggestions, drafts, delivery",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    settings: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show build and version details.
    Info,
    /// Validate the whole form (exit 2 when invalid).
    Validate {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Validate a single field value.
    ValidateField {
        /// Field name (name, email, subject, message).
        field: String,
        /// Field value.
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Suggest a correction for a mistyped email domain.
    Suggest {
        /// Email address to check.
        email: String,
    },
    /// Validation, domain suggestion, spam check, and character count.
    Review {
        #[command(flatten)]
        form: FormArgs,
        /// Fill fields missing from the flags with the stored draft.
        #[arg(long)]
        use_draft: bool,
    },
    /// Review, then deliver through the demo mailer.
    Submit {
        #[command(flatten)]
        form: FormArgs,
        /// Fill fields missing from the flags with the stored draft.
        #[arg(long)]
        use_draft: bool,
    },
    /// Draft persistence commands.
    Draft {
        #[command(subcommand)]
        command: DraftCommands,
    },
    /// Config-related commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Validate { .. } => "validate",
            Self::ValidateField { .. } => "validate-field",
            Self::Suggest { .. } => "suggest",
            Self::Review { .. } => "review",
            Self::Submit { .. } => "submit",
            Self::Draft { .. } => "draft",
            Self::Config { .. } => "config",
        }
    }
}

#[derive(Debug, Subcommand)]
enum DraftCommands {
    /// Store the non-empty fields.
    Save {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Print the stored draft.
    Show,
    /// Discard the stored draft.
    Clear,
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Print the effective config after env, overrides, and file merging.
    Show {
        /// Text-mode serialization.
        #[arg(long, value_enum, default_value_t)]
        format: ConfigShowFormat,
    },
    /// Validate the effective config.
    Validate,
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

type InputHandler = fn(OutputMode, &CliContext, &ContactFormInput) -> Result<CliOutput, CliError>;

fn main() -> std::process::ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let mode = OutputMode::from_args(&cli.output);

    match run(&cli, mode) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(cli: &Cli, mode: OutputMode) -> Result<CliOutput, CliError> {
    if matches!(cli.command, Commands::Info) {
        return run_info(mode);
    }

    let ctx = match CliContext::load(&cli.settings, cli.command.name()) {
        Ok(ctx) => ctx,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    match &cli.command {
        Commands::Info => run_info(mode),
        Commands::Validate { form } => with_input(mode, &ctx, form, false, run_validate),
        Commands::ValidateField { field, value } => run_validate_field(mode, &ctx, field, value),
        Commands::Suggest { email } => run_suggest(mode, &ctx, email),
        Commands::Review { form, use_draft } => {
            with_input(mode, &ctx, form, *use_draft, run_review)
        },
        Commands::Submit { form, use_draft } => {
            with_input(mode, &ctx, form, *use_draft, run_submit)
        },
        Commands::Draft { command } => match command {
            DraftCommands::Save { form } => with_input(mode, &ctx, form, false, run_draft_save),
            DraftCommands::Show => run_draft_show(mode, &ctx),
            DraftCommands::Clear => run_draft_clear(mode, &ctx),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show { format } => run_config_show(mode, &ctx, *format),
            ConfigCommands::Validate => run_config_validate(mode, &ctx),
        },
    }
}

fn with_input(
    mode: OutputMode,
    ctx: &CliContext,
    form: &FormArgs,
    use_draft: bool,
    handler: InputHandler,
) -> Result<CliOutput, CliError> {
    match resolve_input(ctx, form, use_draft) {
        Ok(input) => handler(mode, ctx, &input),
        Err(error) => Ok(format_error_output(mode, &error)),
    }
}

/// Form input from flags, optionally completed from the stored draft.
fn resolve_input(
    ctx: &CliContext,
    form: &FormArgs,
    use_draft: bool,
) -> Result<ContactFormInput, ErrorEnvelope> {
    let input = form.to_input()?;
    if !use_draft {
        return Ok(input);
    }
    let deps = ctx.draft_deps()?;
    let draft = commands::block_on(load_draft(&deps)).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to start runtime: {error}"),
            ErrorClass::NonRetriable,
        )
    })??;
    Ok(match draft {
        Some(draft) => input.or(draft.to_input()),
        None => input,
    })
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}

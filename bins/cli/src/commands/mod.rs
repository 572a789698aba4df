//! CLI command handlers.

pub mod config;
pub mod draft;
pub mod form;
pub mod info;
pub mod submit;

pub use config::{ConfigShowFormat, run_config_show, run_config_validate};
pub use draft::{run_draft_clear, run_draft_save, run_draft_show};
pub use form::{FormArgs, run_review, run_suggest, run_validate, run_validate_field};
pub use info::run_info;
pub use submit::run_submit;

use crate::error::CliError;
use std::future::Future;

/// Drive a use-case future on a single-threaded runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

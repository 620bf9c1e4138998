pub mod completions;
pub mod create;
pub mod dashboard;
pub mod delete;
pub mod init;
pub mod list;
pub mod open;
pub mod session;
pub mod show;
pub mod status;
pub mod update;

use crate::output::{CliError, OutputMode, fail};
use std::path::Path;
use ticketflow_core::config::load_project_config;
use ticketflow_core::validate::{FormErrors, ValidationError};
use ticketflow_core::{App, FileStorage, TicketflowError};

/// Open the application state stored under `project_dir`.
pub fn open_app(project_dir: &Path, output: OutputMode) -> anyhow::Result<App<FileStorage>> {
    let config = load_project_config(project_dir)?;
    App::open(FileStorage::in_dir(project_dir), &config)
        .or_else(|err| report(output, &TicketflowError::from(err)))
}

/// Render a domain error and fail the command with it.
pub fn report<T>(output: OutputMode, err: &TicketflowError) -> anyhow::Result<T> {
    fail(output, &CliError::from(err))
}

/// Render a rejected form with one line per field.
pub fn reject_form<T>(output: OutputMode, errors: &FormErrors) -> anyhow::Result<T> {
    fail(output, &CliError::from(errors))
}

/// Render a single rejected argument value.
pub fn reject_value<T>(output: OutputMode, err: &ValidationError) -> anyhow::Result<T> {
    fail(output, &CliError::from(err))
}

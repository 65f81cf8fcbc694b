//! dev-setup CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Missing required file
//! - 4: Template error
//! - 5: Manifest error
//! - 6: Config error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use devsetup_core::CoreError;
use devsetup_templates::TemplateError;

mod cli;
mod prompt;
mod setup;

use cli::Cli;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const MISSING_FILE: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
    pub const MANIFEST_ERROR: u8 = 5;
    pub const CONFIG_ERROR: u8 = 6;
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(ExitCodes::INVALID_ARGS)
            } else {
                ExitCode::from(ExitCodes::SUCCESS)
            };
        }
    };

    // Logs go to stderr so --show-config output stays clean
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())))
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    match setup::execute(cli) {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(categorize_error(&e))
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    let Some(core) = e.downcast_ref::<CoreError>() else {
        return match e.downcast_ref::<TemplateError>() {
            Some(_) => ExitCodes::TEMPLATE_ERROR,
            None => ExitCodes::GENERAL_ERROR,
        };
    };

    if core.is_missing_file() {
        return ExitCodes::MISSING_FILE;
    }
    match core {
        CoreError::ManifestMissingName(_) | CoreError::ManifestParse { .. } => ExitCodes::MANIFEST_ERROR,
        CoreError::SchemaViolation { .. }
        | CoreError::UnknownEnvironment(_)
        | CoreError::Template(TemplateError::Malformed { .. }) => ExitCodes::CONFIG_ERROR,
        CoreError::Template(_) => ExitCodes::TEMPLATE_ERROR,
        _ => ExitCodes::GENERAL_ERROR,
    }
}

mod cli;
mod commands;
mod error;
mod output;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let envelope = commands::run(cli).await?;
    output::render(&envelope, cli.format, cli.pretty)?;

    if cli.strict && (!envelope.meta.warnings.is_empty() || !envelope.errors.is_empty()) {
        return Err(CliError::StrictModeViolation {
            warning_count: envelope.meta.warnings.len(),
            error_count: envelope.errors.len(),
        });
    }

    if !envelope.errors.is_empty() {
        return Ok(ExitCode::from(3));
    }

    Ok(ExitCode::SUCCESS)
}

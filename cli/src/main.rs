#![deny(missing_docs)]

//! # CDG CLI
//!
//! Command line front end of the data class generator.
//!
//! Supported Commands:
//! - `generate`: Description -> declaration and definition artifacts.
//! - `check`: Parses and validates a description, optionally dumping the model.
//! - `syntax`: Prints the grammar of the description language.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod check;
mod error;
mod generate;
mod syntax;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Data class generator")]
struct Cli {
    /// Log filter, e.g. `debug` or `cdg_core=trace`.
    #[clap(long, global = true, env = "CDG_LOG")]
    log_level: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the declaration and definition files of a description.
    Generate(generate::GenerateArgs),
    /// Parse and validate a description without generating anything.
    Check(check::CheckArgs),
    /// Print the grammar of the description language.
    Syntax(syntax::SyntaxArgs),
}

const DEFAULT_LOG_FILTER: &str = "warn";

/// Builds the log filter, falling back to the default on an invalid one.
/// The second value describes the rejected filter.
fn log_filter(level: Option<&str>) -> (EnvFilter, Option<String>) {
    match level {
        None => (EnvFilter::new(DEFAULT_LOG_FILTER), None),
        Some(level) => match EnvFilter::try_new(level) {
            Ok(filter) => (filter, None),
            Err(err) => (
                EnvFilter::new(DEFAULT_LOG_FILTER),
                Some(format!(
                    "invalid log filter \"{}\" ({}), using \"{}\"",
                    level, err, DEFAULT_LOG_FILTER
                )),
            ),
        },
    }
}

/// Logs go to stderr so that `check --dump` output stays clean.
fn init_logging(level: Option<&str>) {
    let (filter, rejected) = log_filter(level);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    if let Some(message) = rejected {
        warn!("{}", message);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let result = match &cli.command {
        Commands::Generate(args) => generate::execute(args),
        Commands::Check(args) => check::execute(args),
        Commands::Syntax(args) => syntax::execute(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("command failed");
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

//! Command-line interface for the scenic route engine.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod select;

pub use error::CliError;

use select::{SelectArgs, run_select};

const ARG_ORIGIN: &str = "origin";
const ARG_DESTINATION: &str = "destination";
const ARG_BASE_URL: &str = "base-url";
const ARG_SERVICE_PATH: &str = "service-path";
const ARG_ACCESS_TOKEN: &str = "access-token";
const ARG_DIALECT: &str = "dialect";
const ARG_CANONICAL_PROFILE: &str = "canonical-profile";
const ARG_PROFILES: &str = "profiles";
const ARG_AVOID_MOTORWAYS: &str = "avoid-motorways";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ENV_ORIGIN: &str = "SCENIC_CMDS_SELECT_ORIGIN";
const ENV_DESTINATION: &str = "SCENIC_CMDS_SELECT_DESTINATION";

/// Run the scenic CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging(cli.verbose);
    match cli.command {
        Command::Select(args) => run_select(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing_subscriber::filter::LevelFilter::DEBUG
    } else {
        tracing_subscriber::filter::LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Parser)]
#[command(
    name = "scenic",
    about = "Pick the most scenic route between two points",
    version
)]
struct Cli {
    /// Log orchestration and scoring decisions to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Request candidates under several profiles and print the winner.
    Select(SelectArgs),
}

#[cfg(test)]
mod tests;

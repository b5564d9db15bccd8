//! # peach CLI entry point
//!
//! Parses command-line arguments, resolves configuration, and dispatches to
//! the subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use peach_cli::config::CliConfig;
use peach_cli::summarize::{run_summarize, SummarizeArgs};
use peach_cli::validate::{run_validate, ValidateArgs};

/// PEACH feed interpreter.
///
/// Summarizes PIES permit-record feeds into current stage, state, and
/// milestone dates, and validates feeds against the PIES record invariants.
#[derive(Parser, Debug)]
#[command(name = "peach", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write logs to stderr as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize a feed into a map keyed by system_id + record_id.
    Summarize(SummarizeArgs),

    /// Check every record of a feed against the PIES invariants.
    Validate(ValidateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so stdout carries only the JSON output.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(2);
        }
    };
    tracing::debug!(?config, "resolved configuration");

    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Commands::Summarize(args) => run_summarize(&args, &config, &mut stdout),
        Commands::Validate(args) => run_validate(&args, &mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

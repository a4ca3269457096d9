//! # docguard CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Tracing goes to stderr so stdout carries only the report.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod samples;
mod validate;

use samples::{run_samples, SamplesArgs};
use validate::{run_validate, ValidateArgs};

/// Exit code for unreadable input or bad configuration.
const EXIT_OPERATIONAL: u8 = 2;

/// Validate JSON documents against a JSON Schema and natural-language rules.
#[derive(Parser, Debug)]
#[command(name = "docguard", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a document structurally, then semantically.
    Validate(ValidateArgs),

    /// Print the bundled sample schema, documents and rule sets.
    Samples(SamplesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(cli.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("docguard CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Samples(args) => run_samples(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_OPERATIONAL)
        }
    }
}

/// `RUST_LOG` wins when set; otherwise the `-v` count picks the level.
fn env_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    })
}

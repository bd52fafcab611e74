// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Covgate CLI - resilient Codecov configuration fetching from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Fetch the upload token for one repository
//! covgate get acme/widget
//!
//! # Fetch several repositories, paced through one shared rate gate
//! covgate get acme/widget acme/gadget
//!
//! # JSON output with the token revealed
//! covgate get acme/widget --format json --reveal
//!
//! # Tune the retry envelope
//! covgate get acme/widget --max-retries 3 --base-backoff 0.5
//!
//! # Describe the data sources
//! covgate schema
//!
//! # Manage the settings file
//! covgate config show
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{config, get, schema};

// ============================================================================
// CLI Definition
// ============================================================================

/// Covgate CLI - Codecov repository configuration fetching.
#[derive(Parser)]
#[command(name = "covgate")]
#[command(about = "Resilient Codecov repository configuration CLI")]
#[command(long_about = r#"
Covgate fetches repository configuration, including upload tokens, from
the Codecov v2 API, retrying transient failures with doubling backoff.

The API token is read from the CODECOV_API_V2_TOKEN environment variable
(rename the variable in the settings file, or pass --token).

Examples:
  covgate get acme/widget                  # Fetch one repository
  covgate get acme/widget acme/gadget      # Fetch several, paced
  covgate get gitlab/acme/widget           # Non-default service
  covgate get acme/widget --format json    # JSON output
  covgate schema                           # Describe data sources
  covgate config show                      # Show settings
"#)]
#[command(version)]
#[command(author = "Covgate Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch repository configuration.
    #[command(visible_alias = "g")]
    Get(get::GetArgs),

    /// Describe the available data sources.
    #[command(visible_alias = "s")]
    Schema(schema::SchemaArgs),

    /// Manage the settings file.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Bad inputs, settings or credentials.
    ConfigError = 2,
    /// The API rejected the request for good.
    Fatal = 3,
    /// The retry budget ran out on a transient failure.
    RetriesExhausted = 4,
}

// ============================================================================
// Logging Setup
// ============================================================================

/// Filter directives for the workspace crates, which log under their
/// underscored target names.
fn log_directives(verbose: bool) -> &'static str {
    if verbose {
        "covgate_fetch=debug,covgate_provider=debug,covgate_cli=debug,info"
    } else {
        "covgate_fetch=warn,covgate_provider=warn,covgate_cli=warn"
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::new(log_directives(verbose)))
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Get(args) => get::run(args, &cli).await,
        Commands::Schema(args) => schema::run(args, &cli),
        Commands::Config(args) => config::run(args, &cli),
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {}", e);
        }
        let code = e
            .downcast_ref::<covgate_provider::ProviderError>()
            .map_or(ExitCode::Error, get::exit_code_for);
        std::process::exit(code as i32);
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

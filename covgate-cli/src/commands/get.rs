//! Get command - fetch repository configuration.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use covgate_fetch::{ErrorKind, FetchOptions};
use covgate_provider::{
    DataSource, ProviderError, ProviderSettings, ReadContext, SettingsFile, SourceOutput,
    SourceRegistry,
};
use tracing::{info, warn};

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the get command.
#[derive(Args)]
pub struct GetArgs {
    /// Repositories to fetch, as OWNER/REPO or SERVICE/OWNER/REPO.
    #[arg(required = true)]
    pub repos: Vec<String>,

    /// Git hosting service for specs that do not name one.
    #[arg(long, default_value = "github")]
    pub service: String,

    /// Override the endpoint base URL.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// API token (overrides the environment variable).
    #[arg(long)]
    pub token: Option<String>,

    /// Seconds between outbound API calls; 0 disables pacing.
    #[arg(long)]
    pub interval: Option<f64>,

    /// Retries allowed after the first failed attempt.
    #[arg(long, default_value = "6")]
    pub max_retries: u32,

    /// Base backoff in seconds; doubles per failed attempt.
    #[arg(long, default_value = "1")]
    pub base_backoff: f64,

    /// Settle pause in seconds after a redirect response.
    #[arg(long, default_value = "1")]
    pub redirect_settle: f64,

    /// Overall deadline in seconds for each fetch.
    #[arg(long)]
    pub timeout: Option<f64>,

    /// Print upload tokens unmasked.
    #[arg(long)]
    pub reveal: bool,
}

/// One repository selector.
#[derive(Debug, Clone)]
pub struct RepoSpec {
    /// Git hosting service.
    pub service: String,
    /// Account owning the repository.
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

impl fmt::Display for RepoSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.service, self.owner, self.repo)
    }
}

/// Runs the get command.
pub async fn run(args: &GetArgs, cli: &Cli) -> Result<()> {
    let specs = parse_repo_specs(&args.repos, &args.service)?;
    let settings = resolve_settings(args)?;
    let options = build_options(args, &settings)?;

    info!(repos = specs.len(), "Fetching repository configuration");

    let source = SourceRegistry::get("codecov_settings")
        .ok_or_else(|| ProviderError::UnknownSource("codecov_settings".to_string()))?;

    let results = fetch_all(source, &settings, &options, &specs).await;

    output_results(&results, args, cli)?;

    let code = batch_exit_code(&results);
    if !matches!(code, ExitCode::Success) {
        std::process::exit(code as i32);
    }

    Ok(())
}

/// Resolves settings, applying command-line overrides.
fn resolve_settings(args: &GetArgs) -> Result<ProviderSettings> {
    let mut file = SettingsFile::load()?;
    if let Some(endpoint) = &args.endpoint {
        file.endpoint_base = Some(endpoint.clone());
    }
    if let Some(interval) = args.interval {
        file.api_interval_secs = Some(interval);
    }

    let token_override = args.token.clone();
    let settings = ProviderSettings::resolve(&file, |name| {
        token_override.clone().or_else(|| std::env::var(name).ok())
    })?;

    Ok(settings)
}

/// Builds the engine tuning from the arguments and settings.
fn build_options(args: &GetArgs, settings: &ProviderSettings) -> Result<FetchOptions> {
    let base_backoff = Duration::try_from_secs_f64(args.base_backoff)
        .with_context(|| format!("Invalid base backoff: {}", args.base_backoff))?;
    let redirect_settle = Duration::try_from_secs_f64(args.redirect_settle)
        .with_context(|| format!("Invalid redirect settle: {}", args.redirect_settle))?;

    let mut options = FetchOptions::new()
        .with_max_retries(args.max_retries)
        .with_base_backoff(base_backoff)
        .with_redirect_settle(redirect_settle);

    if let Some(secs) = args.timeout {
        let deadline =
            Duration::try_from_secs_f64(secs).with_context(|| format!("Invalid timeout: {secs}"))?;
        options = options.with_deadline(deadline);
    }

    // Every repository in the batch shares one gate.
    if let Some(gate) = settings.rate_gate() {
        options = options.with_rate_gate(gate);
    }

    Ok(options)
}

/// Parses OWNER/REPO and SERVICE/OWNER/REPO specs.
fn parse_repo_specs(specs: &[String], default_service: &str) -> Result<Vec<RepoSpec>> {
    let mut parsed = Vec::new();
    for spec in specs {
        let parts: Vec<&str> = spec.split('/').collect();
        let repo_spec = match parts.as_slice() {
            [owner, repo] => RepoSpec {
                service: default_service.to_string(),
                owner: (*owner).to_string(),
                repo: (*repo).to_string(),
            },
            [service, owner, repo] => RepoSpec {
                service: (*service).to_string(),
                owner: (*owner).to_string(),
                repo: (*repo).to_string(),
            },
            _ => anyhow::bail!(
                "Invalid repository spec: {}. Use OWNER/REPO or SERVICE/OWNER/REPO",
                spec
            ),
        };
        parsed.push(repo_spec);
    }
    Ok(parsed)
}

/// Fetches all repositories concurrently through one source.
async fn fetch_all(
    source: &'static dyn DataSource,
    settings: &ProviderSettings,
    options: &FetchOptions,
    specs: &[RepoSpec],
) -> Vec<(RepoSpec, Result<SourceOutput, ProviderError>)> {
    let fetches = specs.iter().map(|spec| {
        let ctx = ReadContext::new(settings)
            .with_options(options.clone())
            .input("service", spec.service.as_str())
            .input("owner", spec.owner.as_str())
            .input("repo", spec.repo.as_str());

        async move {
            let result = source.read(&ctx).await;
            if let Err(err) = &result {
                warn!(repo = %spec, error = %err, "Fetch failed");
            }
            (spec.clone(), result)
        }
    });

    futures::future::join_all(fetches).await
}

/// Outputs results in the appropriate format.
fn output_results(
    results: &[(RepoSpec, Result<SourceOutput, ProviderError>)],
    args: &GetArgs,
    cli: &Cli,
) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            let mut first = true;
            for (spec, result) in results {
                if !first {
                    println!(); // Blank line between repositories
                }
                first = false;

                let repo = format!("{}/{}", spec.owner, spec.repo);
                match result {
                    Ok(output) => {
                        println!(
                            "{}",
                            formatter.format_fetch(&repo, &spec.service, output, args.reveal)
                        );
                    }
                    Err(err) => {
                        println!("{}", formatter.format_error(&repo, err));
                    }
                }
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            let outputs: Vec<_> = results
                .iter()
                .map(|(spec, result)| {
                    formatter.fetch_output(
                        &format!("{}/{}", spec.owner, spec.repo),
                        &spec.service,
                        result,
                        args.reveal,
                    )
                })
                .collect();
            println!("{}", formatter.format_fetch_results(&outputs)?);
        }
    }

    Ok(())
}

/// Exit code for a batch: success only when every fetch succeeded.
fn batch_exit_code(results: &[(RepoSpec, Result<SourceOutput, ProviderError>)]) -> ExitCode {
    for (_, result) in results {
        if let Err(err) = result {
            return exit_code_for(err);
        }
    }
    ExitCode::Success
}

/// Maps a provider error to the process exit code.
pub fn exit_code_for(err: &ProviderError) -> ExitCode {
    match err {
        ProviderError::Fetch(fetch) => match fetch.kind() {
            ErrorKind::Fatal => ExitCode::Fatal,
            ErrorKind::Temporary | ErrorKind::Timeout => ExitCode::RetriesExhausted,
            // A retryable error that still surfaced ran out of attempts.
            ErrorKind::NetworkFailure if fetch.should_retry() => ExitCode::RetriesExhausted,
            ErrorKind::NetworkFailure | ErrorKind::Cancelled => ExitCode::Error,
        },
        ProviderError::Core(_)
        | ProviderError::InvalidEndpoint { .. }
        | ProviderError::InvalidInterval(_)
        | ProviderError::SettingsIo { .. }
        | ProviderError::SettingsFormat { .. }
        | ProviderError::UnknownSource(_) => ExitCode::ConfigError,
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Config command - manage the settings file.

use anyhow::Result;
use clap::{Args, Subcommand};
use covgate_provider::{SettingsFile, DEFAULT_API_INTERVAL_SECS, DEFAULT_ENDPOINT, TOKEN_ENV};

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective settings.
    Show,

    /// Show the settings file path.
    Path,

    /// Write a settings file with the defaults filled in.
    Init,
}

/// Runs the config command.
pub fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_settings(cli),
        ConfigAction::Path => show_path(cli),
        ConfigAction::Init => init_settings(cli),
    }
}

fn show_settings(cli: &Cli) -> Result<()> {
    let file = SettingsFile::load()?;
    let endpoint = file.endpoint_base.as_deref().unwrap_or(DEFAULT_ENDPOINT);
    let interval = file.api_interval_secs.unwrap_or(DEFAULT_API_INTERVAL_SECS);
    let token_env = file.token_env.as_deref().unwrap_or(TOKEN_ENV);
    let token_present = std::env::var(token_env).is_ok_and(|v| !v.trim().is_empty());

    match cli.format {
        OutputFormat::Text => {
            println!("Covgate Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Endpoint base:  {}", endpoint);
            println!("API interval:   {}s", interval);
            println!("Token variable: {}", token_env);
            println!("Token present:  {}", if token_present { "yes" } else { "no" });
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "endpointBase": endpoint,
                "apiIntervalSecs": interval,
                "tokenEnv": token_env,
                "tokenPresent": token_present,
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&value)?);
        }
    }

    Ok(())
}

fn show_path(cli: &Cli) -> Result<()> {
    let path = SettingsFile::default_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Settings file: {}", path.display());
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "settingsFile": path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&value)?);
        }
    }

    Ok(())
}

fn init_settings(_cli: &Cli) -> Result<()> {
    let path = SettingsFile::default_path();

    if path.exists() {
        println!("Settings file already exists: {}", path.display());
        return Ok(());
    }

    let file = SettingsFile {
        endpoint_base: Some(DEFAULT_ENDPOINT.to_string()),
        api_interval_secs: Some(DEFAULT_API_INTERVAL_SECS),
        token_env: Some(TOKEN_ENV.to_string()),
    };
    file.save_to(&path)?;

    println!("Wrote settings file: {}", path.display());
    Ok(())
}

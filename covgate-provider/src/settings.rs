//! Process-level settings for the provider layer.
//!
//! Settings come from two layers: an optional JSON file with overrides
//! ([`SettingsFile`]) and the environment, which supplies the API token.
//! [`ProviderSettings::resolve`] merges the two into a validated value
//! that the rest of the crate consumes. Credentials are checked here,
//! before any network activity happens.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use covgate_core::{ApiToken, CoreError};
use covgate_fetch::RateGate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::ProviderError;

/// Environment variable the API token is read from by default.
pub const TOKEN_ENV: &str = "CODECOV_API_V2_TOKEN";

/// Default base URL of the production API host.
pub const DEFAULT_ENDPOINT: &str = "https://codecov.io";

/// Default seconds between outbound API calls.
pub const DEFAULT_API_INTERVAL_SECS: f64 = 1.0;

// ============================================================================
// Settings File
// ============================================================================

/// Optional on-disk overrides for provider settings.
///
/// Every field is optional; missing fields fall back to the defaults
/// documented on the constants in this module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    /// Base URL of the API host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_base: Option<String>,

    /// Seconds between outbound API calls; `0` disables pacing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_interval_secs: Option<f64>,

    /// Name of the environment variable holding the API token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
}

impl SettingsFile {
    /// Returns the default settings file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("covgate")
            .join("config.json")
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ProviderError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads settings from a specific path.
    ///
    /// A missing file is not an error; it yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::SettingsIo`] when the file cannot be read
    /// and [`ProviderError::SettingsFormat`] when it is not valid JSON.
    pub fn load_from(path: &Path) -> Result<Self, ProviderError> {
        if !path.exists() {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).map_err(|source| ProviderError::SettingsIo {
                path: path.to_path_buf(),
                source,
            })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|source| ProviderError::SettingsFormat {
                path: path.to_path_buf(),
                source,
            })?;

        info!(path = %path.display(), "Loaded settings file");
        Ok(settings)
    }

    /// Saves settings to a specific path, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::SettingsIo`] when a directory or the file
    /// itself cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ProviderError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ProviderError::SettingsIo {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let content =
            serde_json::to_string_pretty(self).map_err(|source| ProviderError::SettingsFormat {
                path: path.to_path_buf(),
                source,
            })?;

        std::fs::write(path, content).map_err(|source| ProviderError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "Saved settings file");
        Ok(())
    }
}

// ============================================================================
// Resolved Settings
// ============================================================================

/// Fully resolved, validated settings for talking to the API.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Bearer credential for the API.
    pub token: ApiToken,
    /// Base URL of the API host.
    pub endpoint_base: Url,
    /// Pause between outbound API calls; zero disables pacing.
    pub api_interval: Duration,
}

impl ProviderSettings {
    /// Resolves settings from a file layer and an environment lookup.
    ///
    /// The token comes from the environment variable named by
    /// `file.token_env` (default [`TOKEN_ENV`]) and must be present and
    /// non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingToken`] (wrapped) when the token
    /// variable is unset or blank, [`ProviderError::InvalidEndpoint`] when
    /// the endpoint override does not parse, and
    /// [`ProviderError::InvalidInterval`] when the interval override is
    /// negative or not finite.
    pub fn resolve(
        file: &SettingsFile,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ProviderError> {
        let token_env = file.token_env.as_deref().unwrap_or(TOKEN_ENV);
        let raw_token = lookup(token_env).ok_or(CoreError::MissingToken)?;
        let token = ApiToken::new(raw_token)?;

        let endpoint = file.endpoint_base.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let endpoint_base =
            Url::parse(endpoint).map_err(|source| ProviderError::InvalidEndpoint {
                url: endpoint.to_string(),
                source,
            })?;

        let interval_secs = file.api_interval_secs.unwrap_or(DEFAULT_API_INTERVAL_SECS);
        let api_interval = Duration::try_from_secs_f64(interval_secs)
            .map_err(|_| ProviderError::InvalidInterval(interval_secs))?;

        Ok(Self {
            token,
            endpoint_base,
            api_interval,
        })
    }

    /// Builds the shared rate gate for these settings.
    ///
    /// Returns `None` when the interval is zero, meaning calls go out
    /// unpaced. Callers share the returned gate across every fetch that
    /// should count against the same pacing budget.
    pub fn rate_gate(&self) -> Option<Arc<RateGate>> {
        if self.api_interval.is_zero() {
            None
        } else {
            Some(Arc::new(RateGate::new(self.api_interval)))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

//! The data source abstraction and the codecov implementation.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use covgate_core::{CoreError, RepoQuery};
use covgate_fetch::{fetch_repo_config, ApiClient, FetchOptions};
use tracing::debug;

use crate::error::ProviderError;
use crate::schema::{FieldMode, FieldSchema, SourceSchema};
use crate::settings::ProviderSettings;

// ============================================================================
// Read Context
// ============================================================================

/// Everything a data source needs for one read.
///
/// Carries the resolved process settings, the engine tuning for this
/// read, and the caller-supplied input fields.
#[derive(Debug)]
pub struct ReadContext<'a> {
    /// Resolved process-level settings.
    pub settings: &'a ProviderSettings,
    /// Engine tuning (retries, backoff, rate gate, deadline).
    pub options: FetchOptions,
    inputs: HashMap<String, String>,
}

impl<'a> ReadContext<'a> {
    /// Creates a context with default engine tuning and no inputs.
    pub fn new(settings: &'a ProviderSettings) -> Self {
        Self {
            settings,
            options: FetchOptions::new(),
            inputs: HashMap::new(),
        }
    }

    /// Replaces the engine tuning for this read.
    #[must_use]
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// Adds an input field.
    #[must_use]
    pub fn input(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inputs.insert(name.into(), value.into());
        self
    }

    /// Returns an input field value, if set.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inputs.get(name).map(String::as_str)
    }
}

// ============================================================================
// Source Output
// ============================================================================

/// The result of one data source read.
#[derive(Debug, Clone)]
pub struct SourceOutput {
    /// Read identifier, the `service/owner/repo` triple.
    pub id: String,
    /// Output fields, keyed by schema field name.
    pub fields: BTreeMap<String, String>,
}

impl SourceOutput {
    /// Returns an output field value, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

// ============================================================================
// Data Source Trait
// ============================================================================

/// A named, schema-described read against the API.
///
/// Implementations validate their inputs against their schema before
/// any network activity, then produce a [`SourceOutput`] whose fields
/// match the schema's computed entries.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// The schema describing this source's fields.
    fn schema(&self) -> &SourceSchema;

    /// Performs one read with the given context.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when required inputs are missing or
    /// blank, and propagates classified fetch errors from the engine.
    async fn read(&self, ctx: &ReadContext<'_>) -> Result<SourceOutput, ProviderError>;
}

// ============================================================================
// Codecov Settings Source
// ============================================================================

fn settings_schema() -> SourceSchema {
    SourceSchema {
        name: "codecov_settings",
        description: "Repository configuration from the Codecov v2 API",
        fields: vec![
            FieldSchema::required("service", "Git hosting service, e.g. github"),
            FieldSchema::required("owner", "Account owning the repository"),
            FieldSchema::required("repo", "Repository name"),
            FieldSchema::computed("upload_token", "Token for uploading coverage reports")
                .sensitive(),
        ],
    }
}

/// Reads a repository's configuration, including its upload token.
pub struct CodecovSettingsSource {
    schema: SourceSchema,
}

impl CodecovSettingsSource {
    /// Creates the source.
    pub fn new() -> Self {
        Self {
            schema: settings_schema(),
        }
    }
}

impl Default for CodecovSettingsSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSource for CodecovSettingsSource {
    fn schema(&self) -> &SourceSchema {
        &self.schema
    }

    async fn read(&self, ctx: &ReadContext<'_>) -> Result<SourceOutput, ProviderError> {
        for field in self.schema.inputs() {
            if field.mode == FieldMode::Required
                && ctx.get(field.name).is_none_or(|value| value.trim().is_empty())
            {
                return Err(CoreError::MissingField(field.name).into());
            }
        }

        let query = RepoQuery::new(
            ctx.get("service").unwrap_or_default(),
            ctx.get("owner").unwrap_or_default(),
            ctx.get("repo").unwrap_or_default(),
        )?;

        let client = ApiClient::new(
            ctx.settings.endpoint_base.clone(),
            ctx.settings.token.clone(),
        )?;
        debug!(repo = %query, endpoint = %client.base(), "Reading codecov_settings");

        let config = fetch_repo_config(&client, &query, &ctx.options).await?;

        let mut fields = BTreeMap::new();
        fields.insert("service".to_string(), query.service.clone());
        fields.insert("owner".to_string(), query.owner.clone());
        fields.insert("repo".to_string(), query.repo.clone());
        fields.insert("upload_token".to_string(), config.upload_token);

        Ok(SourceOutput {
            // The id is the query triple, same as the API path identifies it.
            id: query.to_string(),
            fields,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Domain models for repository configuration fetching.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one repository on a hosting service.
///
/// Immutable once constructed; every segment is validated non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoQuery {
    /// Hosting service slug, e.g. "github", "gitlab" or "bitbucket".
    pub service: String,
    /// Account or organization owning the repository.
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

impl RepoQuery {
    /// Builds a query from its three segments.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingField`] when a segment is empty or blank.
    pub fn new(
        service: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let query = Self {
            service: service.into(),
            owner: owner.into(),
            repo: repo.into(),
        };
        for (name, value) in [
            ("service", &query.service),
            ("owner", &query.owner),
            ("repo", &query.repo),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::MissingField(name));
            }
        }
        Ok(query)
    }

    /// Relative API path of the configuration endpoint for this query.
    pub fn api_path(&self) -> String {
        format!(
            "api/v2/{}/{}/repos/{}/config/",
            self.service, self.owner, self.repo
        )
    }
}

impl fmt::Display for RepoQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.service, self.owner, self.repo)
    }
}

/// An opaque bearer credential for the configuration API.
///
/// Construction rejects empty input, so any held token is usable and the
/// fetch engine never has to re-check credentials. `Debug` output is
/// redacted to keep tokens out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wraps a raw token string.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingToken`] when the input is empty or blank.
    pub fn new(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(CoreError::MissingToken);
        }
        Ok(Self(raw))
    }

    /// The raw token value, for building the authorization header.
    pub fn reveal(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(redacted)")
    }
}

/// Repository configuration returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Token used to upload coverage reports for this repository.
    pub upload_token: String,
}

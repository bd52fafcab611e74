//! HTTP client and the single-attempt configuration fetcher.

use std::time::Duration;

use covgate_core::{ApiToken, RepoConfig, RepoQuery};
use reqwest::header::AUTHORIZATION;
use reqwest::redirect::Policy;
use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::classify::{classify_status, StatusClass};
use crate::error::FetchError;

/// User agent reported on every API request.
pub(crate) const USER_AGENT: &str = concat!("covgate/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Api Client
// ============================================================================

/// Client for the repository configuration API.
///
/// Holds the HTTP client, the endpoint base and the bearer token. Redirect
/// following is disabled so 3xx statuses surface to the retry layer, and
/// no client-level timeout is set; the deadline in
/// [`FetchOptions`](crate::FetchOptions) governs the whole invocation.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    token: ApiToken,
}

impl ApiClient {
    /// Creates a client for the given endpoint base.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] when the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base: Url, token: ApiToken) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()?;
        Ok(Self { http, base, token })
    }

    /// The endpoint base this client talks to.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Issues exactly one GET for the repository configuration.
    ///
    /// On 302/307 this sleeps `redirect_settle` before returning
    /// [`FetchError::Redirected`], giving the server-side race time to
    /// settle; the delay is separate from the orchestrator's backoff.
    ///
    /// # Errors
    ///
    /// Any non-200 status or transport/decode failure, classified per
    /// [`FetchError`].
    #[instrument(skip(self, query), fields(repo = %query))]
    pub async fn fetch_config_once(
        &self,
        query: &RepoQuery,
        redirect_settle: Duration,
    ) -> Result<RepoConfig, FetchError> {
        let url = self.config_url(query);
        debug!(url = %url, "Requesting repository configuration");

        let bearer = format!("bearer {}", self.token.reveal());
        let response = self
            .http
            .get(url.as_str())
            .header(AUTHORIZATION, bearer)
            .send()
            .await?;

        let status = response.status();
        match classify_status(status) {
            StatusClass::Ok => {
                let body = response.bytes().await?;
                let config: RepoConfig = serde_json::from_slice(&body)?;
                debug!("Decoded repository configuration");
                Ok(config)
            }
            StatusClass::Unavailable => {
                // The body is discarded; dropping the response releases
                // the connection.
                drop(response);
                warn!(status = %status, "Service unavailable");
                Err(FetchError::Unavailable(status))
            }
            StatusClass::Redirect => {
                drop(response);
                warn!(
                    status = %status,
                    settle = ?redirect_settle,
                    "API redirected an authenticated call; letting the server settle"
                );
                tokio::time::sleep(redirect_settle).await;
                Err(FetchError::Redirected(status))
            }
            StatusClass::Unexpected => {
                drop(response);
                warn!(status = %status, "Unexpected API status");
                Err(FetchError::UnexpectedStatus(status))
            }
        }
    }

    /// Absolute URL of the configuration endpoint for `query`.
    fn config_url(&self, query: &RepoQuery) -> String {
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            query.api_path()
        )
    }
}

//! HTTP connector.

use std::time::Duration;

use tracing::debug;

use tabula_core::traits::Connector;
use tabula_core::{ApiUrl, Credentials, Result};

use crate::api::HttpTableApi;
use crate::client::{RestClient, RetryPolicy};

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds [`HttpTableApi`] clients.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tabula_core::{Connector, Credentials};
/// use tabula_http::{HttpConnector, RetryPolicy};
///
/// let connector = HttpConnector::new()
///     .with_timeout(Duration::from_secs(10))
///     .with_retry(RetryPolicy::none());
/// let api = connector.connect(&Credentials::new("patXXXX").unwrap()).unwrap();
/// assert_eq!(api.api_url().host(), Some("api.airtable.com"));
/// ```
#[derive(Debug, Clone)]
pub struct HttpConnector {
    api_url: ApiUrl,
    timeout: Option<Duration>,
    retry: RetryPolicy,
    user_agent: String,
}

impl HttpConnector {
    /// Create a connector for the public API endpoint.
    pub fn new() -> Self {
        Self {
            api_url: ApiUrl::default(),
            timeout: Some(DEFAULT_TIMEOUT),
            retry: RetryPolicy::default(),
            user_agent: concat!("tabula/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Use a different API base URL.
    pub fn with_api_url(mut self, api_url: ApiUrl) -> Self {
        self.api_url = api_url;
        self
    }

    /// Set the per-request timeout; `None` disables it.
    pub fn with_timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.timeout = timeout.into();
        self
    }

    /// Set the rate-limit retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the configured API URL.
    pub fn api_url(&self) -> &ApiUrl {
        &self.api_url
    }
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for HttpConnector {
    type Api = HttpTableApi;

    fn connect(&self, credentials: &Credentials) -> Result<HttpTableApi> {
        debug!(api = %self.api_url, "Building HTTP client");
        let client = RestClient::new(
            self.api_url.clone(),
            credentials.token().clone(),
            self.timeout,
            self.retry,
            &self.user_agent,
        )?;
        Ok(HttpTableApi::new(client))
    }
}

//! REST HTTP client implementation.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace, warn};

use tabula_core::error::{ApiError, Error, TransportError};
use tabula_core::{AccessToken, ApiUrl, Result};

use crate::endpoints::ErrorResponse;

/// Longest pause between two attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Retry behaviour for rate-limited (HTTP 429) responses.
///
/// Other failures are never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each further retry.
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (zero-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(MAX_BACKOFF)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

/// Authenticated HTTP client for the REST API.
#[derive(Debug, Clone)]
pub(crate) struct RestClient {
    client: reqwest::Client,
    api: ApiUrl,
    token: AccessToken,
    retry: RetryPolicy,
}

impl RestClient {
    /// Build a client. No request is sent.
    pub(crate) fn new(
        api: ApiUrl,
        token: AccessToken,
        timeout: Option<Duration>,
        retry: RetryPolicy,
        user_agent: &str,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(transport_error)?;

        Ok(Self {
            client,
            api,
            token,
            retry,
        })
    }

    /// Returns the API URL this client is configured for.
    pub(crate) fn api(&self) -> &ApiUrl {
        &self.api
    }

    /// Make an authenticated GET request.
    #[instrument(skip(self, query), fields(api = %self.api))]
    pub(crate) async fn get<R>(&self, segments: &[&str], query: &[(String, String)]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.api.endpoint(segments);
        debug!(path = url.path(), "GET");
        trace!(?query, "query parameters");

        let mut attempt = 0;
        loop {
            let response = self
                .client
                .get(url.clone())
                .query(query)
                .bearer_auth(self.token.as_str())
                .send()
                .await
                .map_err(transport_error)?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS
                && attempt < self.retry.max_retries
            {
                let delay = self.retry.backoff(attempt);
                warn!(attempt, ?delay, "Rate limited, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            return self.handle_response(response).await;
        }
    }

    /// Handle a response, parsing the body or error.
    async fn handle_response<R: DeserializeOwned>(&self, response: reqwest::Response) -> Result<R> {
        let status = response.status();
        trace!(status = %status, "response");

        if status.is_success() {
            response.json::<R>().await.map_err(transport_error)
        } else {
            Err(Error::Api(self.parse_error_response(response).await))
        }
    }

    /// Parse an error response.
    async fn parse_error_response(&self, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();

        match response.json::<ErrorResponse>().await {
            Ok(body) => {
                let (error_type, message) = body.into_parts();
                ApiError::new(status, Some(error_type), message)
            }
            Err(_) => ApiError::new(status, None, None),
        }
    }
}

/// Map a reqwest failure onto the transport error taxonomy.
fn transport_error(err: reqwest::Error) -> Error {
    let err = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() {
        TransportError::Decode {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(err)
}

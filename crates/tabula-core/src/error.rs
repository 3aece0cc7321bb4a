//! Error types for tabula.
//!
//! This module provides a unified error type with explicit variants for
//! configuration, transport, remote API, and input validation errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for tabula operations.
///
/// Configuration errors are raised locally before any remote call is made.
/// Remote failures are surfaced unchanged as [`Error::Api`] or
/// [`Error::Transport`].
#[derive(Debug, Error)]
pub enum Error {
    /// A required credential or identifier is missing.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Network transport errors (connection, timeout, decoding).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The remote API rejected the request.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Input validation errors (identifiers, URLs, query parameters).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true if this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

/// Missing or unreadable configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No personal access token was supplied.
    #[error("personal_access_token must be set in secrets")]
    MissingToken,

    /// No base id was passed and the connection has no default.
    #[error("base_id must be provided or set in secrets")]
    MissingBaseId,

    /// No table id was passed and the connection has no default.
    #[error("table_id must be provided or set in secrets")]
    MissingTableId,

    /// The secret store could not be read.
    #[error("invalid secrets: {message}")]
    Secrets { message: String },
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Response body could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// An error response from the remote table API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Error type reported by the API (e.g. `NOT_FOUND`).
    pub error_type: Option<String>,
    /// Error message from the server.
    pub message: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error_type) = self.error_type {
            write!(f, " [{}]", error_type)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, error_type: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error_type,
            message,
        }
    }

    /// Check if the token was rejected or lacks access.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401
            || self.status == 403
            || self.error_type.as_deref() == Some("AUTHENTICATION_REQUIRED")
            || self.error_type.as_deref() == Some("INVALID_PERMISSIONS_OR_MODEL_NOT_FOUND")
    }

    /// Check if the requested base, table, or view does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status == 404 || self.error_type.as_deref() == Some("NOT_FOUND")
    }

    /// Check if the request was rate limited.
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid base id.
    #[error("invalid base id '{value}': {reason}")]
    BaseId { value: String, reason: String },

    /// Invalid table id or name.
    #[error("invalid table '{value}': {reason}")]
    TableId { value: String, reason: String },

    /// Invalid API URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Inconsistent query parameters.
    #[error("invalid query parameters: {reason}")]
    QueryParams { reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

//! Connector trait.

use crate::{Credentials, Result};

use super::TableApi;

/// Builds a [`TableApi`] client from credentials.
///
/// `connect` must not perform I/O. Token validity is only discovered by the
/// first real request.
pub trait Connector: Send + Sync {
    /// Client type produced by this connector.
    type Api: TableApi + 'static;

    /// Build a client for the given credentials.
    fn connect(&self, credentials: &Credentials) -> Result<Self::Api>;
}

//! Effective identifier resolution.
//!
//! An explicit argument wins over the connection default. When neither is
//! present the call fails with a [`ConfigurationError`] naming the missing
//! identifier. Base and table are resolved independently of each other.

use tabula_core::error::ConfigurationError;
use tabula_core::{BaseId, Credentials, Result, TableId};

fn resolve<T: Clone>(explicit: Option<&T>, default: Option<&T>, missing: ConfigurationError) -> Result<T> {
    explicit
        .or(default)
        .cloned()
        .ok_or_else(|| missing.into())
}

/// Resolve the base id for an operation.
pub fn resolve_base_id(explicit: Option<&BaseId>, credentials: &Credentials) -> Result<BaseId> {
    resolve(
        explicit,
        credentials.default_base_id(),
        ConfigurationError::MissingBaseId,
    )
}

/// Resolve the table id or name for an operation.
pub fn resolve_table_id(explicit: Option<&TableId>, credentials: &Credentials) -> Result<TableId> {
    resolve(
        explicit,
        credentials.default_table_id(),
        ConfigurationError::MissingTableId,
    )
}

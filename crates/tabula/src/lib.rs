//! tabula - Cached, read-only access to a remote table API.
//!
//! A [`Connection`] wraps a lazily built client and exposes three cached
//! operations:
//!
//! - [`Connection::list_bases`] lists the bases visible to the token.
//! - [`Connection::get_base_schema`] returns a base's tables, fields and views.
//! - [`Connection::query`] lists records and flattens them into a
//!   [`RecordTable`].
//!
//! Base and table identifiers fall back to the connection defaults when not
//! passed explicitly. Results are kept in a [`CacheService`] for a TTL
//! ([`DEFAULT_TTL`] unless overridden per call); failures are never cached.

pub mod cache;
pub mod connection;
pub mod resolver;
pub mod table;

pub use cache::{CacheKey, CacheService, CacheStats, DEFAULT_TTL};
pub use connection::{Connection, ConnectionState};
pub use table::RecordTable;

pub use tabula_core::error;
pub use tabula_core::{
    ApiUrl, BaseId, BaseList, BaseSchema, BaseSummary, CellFormat, Connector, Credentials, Error,
    FieldSchema, FieldType, QueryParams, Record, Result, Secrets, SortDirection, SortSpec,
    TableApi, TableId, TableLink, TableSchema, ViewSchema,
};
pub use tabula_http::{HttpConnector, RetryPolicy};

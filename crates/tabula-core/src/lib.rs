//! tabula-core - Core types and traits for remote table APIs.

pub mod credentials;
pub mod error;
pub mod query;
pub mod record;
pub mod schema;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::{Credentials, Secrets};
pub use error::Error;
pub use query::{CellFormat, QueryParams, SortDirection, SortSpec};
pub use record::Record;
pub use schema::{
    BaseList, BaseSchema, BaseSummary, FieldSchema, FieldType, PermissionLevel, TableLink,
    TableSchema, ViewSchema,
};
pub use tokens::AccessToken;
pub use traits::{Connector, TableApi};
pub use types::{ApiUrl, BaseId, TableId};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

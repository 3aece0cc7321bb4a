//! Core identifier types.
//!
//! These types enforce their invariants at construction time,
//! ensuring invalid identifiers never reach the remote API.

mod api_url;
mod base_id;
mod table_id;

pub use api_url::ApiUrl;
pub use base_id::BaseId;
pub use table_id::TableId;

//! Boundary traits for the remote table API.

mod api;
mod connector;

pub use api::TableApi;
pub use connector::Connector;

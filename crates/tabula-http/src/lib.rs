//! tabula-http - HTTP implementation of the remote table API.
//!
//! [`HttpConnector`] turns [`Credentials`](tabula_core::Credentials) into an
//! [`HttpTableApi`], which speaks the JSON REST contract and follows
//! pagination offsets until every page has been read.

mod api;
mod client;
mod connector;
mod endpoints;

pub use api::HttpTableApi;
pub use client::RetryPolicy;
pub use connector::HttpConnector;

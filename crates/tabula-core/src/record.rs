//! Record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record from a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// The record id (`rec…`).
    pub id: String,

    /// When the record was created. Some payloads (webhooks, partial
    /// projections) leave it out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,

    /// Cell values keyed by field name (or field id when requested).
    ///
    /// Empty cells are omitted by the API. Values are left as returned:
    /// strings, numbers, arrays, or nested objects.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

//! REST endpoint definitions and request/response types.

use serde::Deserialize;
use serde_json::Value;

use tabula_core::{BaseSummary, QueryParams, Record};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// `GET meta/bases`
pub(crate) const LIST_BASES: &[&str] = &["meta", "bases"];

/// `GET meta/bases/{baseId}/tables`
pub(crate) fn base_schema(base_id: &str) -> [&str; 4] {
    ["meta", "bases", base_id, "tables"]
}

/// `GET {baseId}/{tableIdOrName}`
pub(crate) fn list_records<'a>(base_id: &'a str, table: &'a str) -> [&'a str; 2] {
    [base_id, table]
}

/// Pagination cursor parameter.
pub(crate) const OFFSET: &str = "offset";

// ============================================================================
// Response Types
// ============================================================================

/// One page of `meta/bases`.
#[derive(Debug, Deserialize)]
pub(crate) struct ListBasesResponse {
    pub bases: Vec<BaseSummary>,
    #[serde(default)]
    pub offset: Option<String>,
}

/// One page of list records.
#[derive(Debug, Deserialize)]
pub(crate) struct ListRecordsResponse {
    pub records: Vec<Record>,
    #[serde(default)]
    pub offset: Option<String>,
}

/// Error response format.
///
/// The API reports errors either as `{"error": "TYPE"}` or as
/// `{"error": {"type": "TYPE", "message": "..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed {
        #[serde(rename = "type")]
        error_type: String,
        #[serde(default)]
        message: Option<String>,
    },
    Code(String),
}

impl ErrorResponse {
    /// Split into error type and optional message.
    pub(crate) fn into_parts(self) -> (String, Option<String>) {
        match self.error {
            ErrorBody::Detailed {
                error_type,
                message,
            } => (error_type, message),
            ErrorBody::Code(code) => (code, None),
        }
    }
}

// ============================================================================
// Query Encoding
// ============================================================================

/// Encode list-records parameters as URL query pairs.
pub(crate) fn query_pairs(params: &QueryParams) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    if let Some(n) = params.max_records {
        pairs.push(("maxRecords".to_string(), n.to_string()));
    }
    if let Some(n) = params.page_size {
        pairs.push(("pageSize".to_string(), n.to_string()));
    }
    if let Some(view) = &params.view {
        pairs.push(("view".to_string(), view.clone()));
    }
    for (i, sort) in params.sort.iter().enumerate() {
        pairs.push((format!("sort[{}][field]", i), sort.field.clone()));
        pairs.push((
            format!("sort[{}][direction]", i),
            sort.direction.as_str().to_string(),
        ));
    }
    if let Some(formula) = &params.formula {
        pairs.push(("filterByFormula".to_string(), formula.clone()));
    }
    for field in &params.fields {
        pairs.push(("fields[]".to_string(), field.clone()));
    }
    if let Some(format) = params.cell_format {
        pairs.push(("cellFormat".to_string(), format.as_str().to_string()));
    }
    if let Some(tz) = &params.time_zone {
        pairs.push(("timeZone".to_string(), tz.clone()));
    }
    if let Some(locale) = &params.user_locale {
        pairs.push(("userLocale".to_string(), locale.clone()));
    }
    if let Some(by_id) = params.return_fields_by_field_id {
        pairs.push(("returnFieldsByFieldId".to_string(), by_id.to_string()));
    }
    for (name, value) in &params.extra {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        pairs.push((name.clone(), value));
    }

    pairs
}

//! Record query parameters.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Wire names produced by the named fields, plus the pagination cursor.
const RESERVED_PARAMS: &[&str] = &[
    "maxRecords",
    "pageSize",
    "view",
    "sort",
    "filterByFormula",
    "fields",
    "fields[]",
    "cellFormat",
    "timeZone",
    "userLocale",
    "returnFieldsByFieldId",
    "offset",
];

fn is_reserved(name: &str) -> bool {
    RESERVED_PARAMS.contains(&name) || name.starts_with("sort[") || name.starts_with("fields[")
}

/// Parameters forwarded to the remote list-records call.
///
/// Named fields cover the documented parameters. Anything else can be
/// passed through [`QueryParams::param`]; extra parameters keep their
/// insertion order so that equal queries always serialize identically.
///
/// # Example
///
/// ```
/// use tabula_core::{CellFormat, QueryParams};
///
/// let params = QueryParams::new()
///     .max_records(10)
///     .cell_format(CellFormat::String)
///     .time_zone("America/Los_Angeles")
///     .user_locale("en-us");
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_records: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortSpec>,
    /// A formula; only records for which it is truthy are returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// Only return these fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_format: Option<CellFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_fields_by_field_id: Option<bool>,
    /// Additional parameters passed through verbatim, in insertion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<(String, Value)>,
}

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_records(mut self, n: u32) -> Self {
        self.max_records = Some(n);
        self
    }

    pub fn page_size(mut self, n: u32) -> Self {
        self.page_size = Some(n);
        self
    }

    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    /// Append a sort key. Earlier keys take precedence.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push(SortSpec {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    pub fn cell_format(mut self, format: CellFormat) -> Self {
        self.cell_format = Some(format);
        self
    }

    pub fn time_zone(mut self, tz: impl Into<String>) -> Self {
        self.time_zone = Some(tz.into());
        self
    }

    pub fn user_locale(mut self, locale: impl Into<String>) -> Self {
        self.user_locale = Some(locale.into());
        self
    }

    pub fn return_fields_by_field_id(mut self, enabled: bool) -> Self {
        self.return_fields_by_field_id = Some(enabled);
        self
    }

    /// Add a parameter with no named field.
    ///
    /// Setting the same name twice replaces the earlier value in place.
    /// Names that a named field already sends (`maxRecords`, `sort[0][field]`,
    /// ...) are rejected by [`QueryParams::validate`].
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.extra.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.extra.push((name, value)),
        }
        self
    }

    /// Check that the parameters are consistent.
    ///
    /// # Errors
    ///
    /// The `string` cell format requires both `time_zone` and `user_locale`.
    /// Extra parameters may not reuse a wire name owned by a named field.
    pub fn validate(&self) -> Result<(), Error> {
        if self.cell_format == Some(CellFormat::String) {
            let mut missing = Vec::new();
            if self.time_zone.is_none() {
                missing.push("time_zone");
            }
            if self.user_locale.is_none() {
                missing.push("user_locale");
            }
            if !missing.is_empty() {
                return Err(InvalidInputError::QueryParams {
                    reason: format!("cell_format=string requires {}", missing.join(" and ")),
                }
                .into());
            }
        }

        if self.page_size == Some(0) || self.page_size.is_some_and(|n| n > 100) {
            return Err(InvalidInputError::QueryParams {
                reason: "page_size must be between 1 and 100".to_string(),
            }
            .into());
        }

        if let Some((name, _)) = self.extra.iter().find(|(name, _)| is_reserved(name)) {
            return Err(InvalidInputError::QueryParams {
                reason: format!("'{}' must be set through its named parameter", name),
            }
            .into());
        }

        Ok(())
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl FromStr for SortSpec {
    type Err = Error;

    /// Parse `field`, `field:asc`, `field:desc`, or `-field`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = if let Some(field) = s.strip_prefix('-') {
            (field, SortDirection::Desc)
        } else {
            match s.rsplit_once(':') {
                Some((field, dir)) => (field, dir.parse()?),
                None => (s, SortDirection::Asc),
            }
        };

        if field.is_empty() {
            return Err(InvalidInputError::QueryParams {
                reason: format!("sort key '{}' has no field name", s),
            }
            .into());
        }

        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(InvalidInputError::QueryParams {
                reason: format!("unknown sort direction '{}'", s),
            }
            .into()),
        }
    }
}

/// How cell values are rendered by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellFormat {
    /// Structured JSON values (the API default).
    Json,
    /// Values as displayed in the web UI.
    String,
}

impl CellFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellFormat::Json => "json",
            CellFormat::String => "string",
        }
    }
}

impl fmt::Display for CellFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(CellFormat::Json),
            "string" => Ok(CellFormat::String),
            _ => Err(InvalidInputError::QueryParams {
                reason: format!("unknown cell format '{}'", s),
            }
            .into()),
        }
    }
}

//! Base and table schema types.
//!
//! Schema trees are passed through from the remote API as-is. The typed
//! view keeps the attributes callers commonly need; every other key lands
//! in an `extra` map and is written back unchanged on serialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::types::{BaseId, TableId};

/// Web UI origin used for deep links.
pub const WEB_URL: &str = "https://airtable.com";

/// The bases visible to a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseList {
    pub bases: Vec<BaseSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BaseList {
    /// Find a base by id.
    pub fn get(&self, id: &str) -> Option<&BaseSummary> {
        self.bases.iter().find(|b| b.id == id)
    }
}

/// One entry of [`BaseList`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseSummary {
    pub id: String,
    pub name: String,
    pub permission_level: PermissionLevel,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The token's permission level on a base.
///
/// Levels not listed here are preserved verbatim in [`PermissionLevel::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionLevel {
    None,
    Read,
    Comment,
    Edit,
    Create,
    Other(String),
}

impl PermissionLevel {
    /// Parse a wire level name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "none" => PermissionLevel::None,
            "read" => PermissionLevel::Read,
            "comment" => PermissionLevel::Comment,
            "edit" => PermissionLevel::Edit,
            "create" => PermissionLevel::Create,
            other => PermissionLevel::Other(other.to_string()),
        }
    }

    /// Returns the wire level name.
    pub fn as_str(&self) -> &str {
        match self {
            PermissionLevel::None => "none",
            PermissionLevel::Read => "read",
            PermissionLevel::Comment => "comment",
            PermissionLevel::Edit => "edit",
            PermissionLevel::Create => "create",
            PermissionLevel::Other(name) => name,
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PermissionLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PermissionLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(PermissionLevel::from_name(&s))
    }
}

/// The schema of one base: its tables in server order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseSchema {
    pub tables: Vec<TableSchema>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BaseSchema {
    /// Find a table by id or name.
    pub fn table(&self, id_or_name: &str) -> Option<&TableSchema> {
        self.tables
            .iter()
            .find(|t| t.id == id_or_name)
            .or_else(|| self.tables.iter().find(|t| t.name == id_or_name))
    }

    /// Collect the relationships formed by linked-record fields.
    ///
    /// Links are grouped by `(from_table, to_table)` in first-seen order.
    /// A reversed link field points from its own table to the linked table;
    /// otherwise the direction is from the linked table to its own table.
    pub fn links(&self) -> Vec<TableLink> {
        let mut links: Vec<TableLink> = Vec::new();

        for table in &self.tables {
            for field in &table.fields {
                let Some(linked) = field.linked_table_id() else {
                    continue;
                };
                let (from_table, to_table) = if field.is_reversed() {
                    (table.id.clone(), linked.to_string())
                } else {
                    (linked.to_string(), table.id.clone())
                };

                match links
                    .iter_mut()
                    .find(|l| l.from_table == from_table && l.to_table == to_table)
                {
                    Some(link) => link.field_ids.push(field.id.clone()),
                    None => links.push(TableLink {
                        from_table,
                        to_table,
                        field_ids: vec![field.id.clone()],
                    }),
                }
            }
        }

        links
    }
}

/// A relationship between two tables created by link fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLink {
    pub from_table: String,
    pub to_table: String,
    /// Ids of the link fields forming this relationship.
    pub field_ids: Vec<String>,
}

/// The schema of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_field_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldSchema>,
    #[serde(default)]
    pub views: Vec<ViewSchema>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TableSchema {
    /// Find a field by id or name.
    pub fn field(&self, id_or_name: &str) -> Option<&FieldSchema> {
        self.fields
            .iter()
            .find(|f| f.id == id_or_name)
            .or_else(|| self.fields.iter().find(|f| f.name == id_or_name))
    }

    /// Returns a reference usable for record queries.
    pub fn table_id(&self) -> Option<TableId> {
        TableId::new(self.id.as_str()).ok()
    }

    /// Deep link to this table in the web UI.
    pub fn web_url(&self, base: &BaseId) -> String {
        format!("{}/{}/{}", WEB_URL, base, self.id)
    }
}

/// The schema of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Type-dependent options (choices, linked table, precision, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldSchema {
    /// A single type-dependent option.
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.as_ref()?.get(name)
    }

    /// Names of the choices of a select field.
    ///
    /// Returns an empty list for non-select fields.
    pub fn choices(&self) -> Vec<&str> {
        if !matches!(
            self.field_type,
            FieldType::SingleSelect | FieldType::MultipleSelects
        ) {
            return Vec::new();
        }

        self.option("choices")
            .and_then(Value::as_array)
            .map(|choices| {
                choices
                    .iter()
                    .filter_map(|c| c.get("name").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The table a linked-record field points to.
    pub fn linked_table_id(&self) -> Option<&str> {
        if self.field_type != FieldType::MultipleRecordLinks {
            return None;
        }
        self.option("linkedTableId").and_then(Value::as_str)
    }

    /// Whether a linked-record field is the reverse side of a link.
    pub fn is_reversed(&self) -> bool {
        self.option("isReversed")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Deep link to this field in the web UI.
    pub fn web_url(&self, base: &BaseId, table: &TableSchema) -> String {
        format!("{}/{}", table.web_url(base), self.id)
    }
}

/// The schema of one view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSchema {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub view_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A field type.
///
/// Types not listed here are preserved verbatim in [`FieldType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    SingleLineText,
    MultilineText,
    RichText,
    Email,
    Url,
    PhoneNumber,
    Number,
    Currency,
    Percent,
    Duration,
    Rating,
    Checkbox,
    Date,
    DateTime,
    SingleSelect,
    MultipleSelects,
    MultipleRecordLinks,
    MultipleLookupValues,
    Rollup,
    Count,
    Formula,
    MultipleAttachments,
    Barcode,
    Button,
    AutoNumber,
    CreatedTime,
    LastModifiedTime,
    CreatedBy,
    LastModifiedBy,
    SingleCollaborator,
    MultipleCollaborators,
    ExternalSyncSource,
    Other(String),
}

impl FieldType {
    /// Parse a wire type name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "singleLineText" => FieldType::SingleLineText,
            "multilineText" => FieldType::MultilineText,
            "richText" => FieldType::RichText,
            "email" => FieldType::Email,
            "url" => FieldType::Url,
            "phoneNumber" => FieldType::PhoneNumber,
            "number" => FieldType::Number,
            "currency" => FieldType::Currency,
            "percent" => FieldType::Percent,
            "duration" => FieldType::Duration,
            "rating" => FieldType::Rating,
            "checkbox" => FieldType::Checkbox,
            "date" => FieldType::Date,
            "dateTime" => FieldType::DateTime,
            "singleSelect" => FieldType::SingleSelect,
            "multipleSelects" => FieldType::MultipleSelects,
            "multipleRecordLinks" => FieldType::MultipleRecordLinks,
            "multipleLookupValues" => FieldType::MultipleLookupValues,
            "rollup" => FieldType::Rollup,
            "count" => FieldType::Count,
            "formula" => FieldType::Formula,
            "multipleAttachments" => FieldType::MultipleAttachments,
            "barcode" => FieldType::Barcode,
            "button" => FieldType::Button,
            "autoNumber" => FieldType::AutoNumber,
            "createdTime" => FieldType::CreatedTime,
            "lastModifiedTime" => FieldType::LastModifiedTime,
            "createdBy" => FieldType::CreatedBy,
            "lastModifiedBy" => FieldType::LastModifiedBy,
            "singleCollaborator" => FieldType::SingleCollaborator,
            "multipleCollaborators" => FieldType::MultipleCollaborators,
            "externalSyncSource" => FieldType::ExternalSyncSource,
            other => FieldType::Other(other.to_string()),
        }
    }

    /// Returns the wire type name.
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::SingleLineText => "singleLineText",
            FieldType::MultilineText => "multilineText",
            FieldType::RichText => "richText",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::PhoneNumber => "phoneNumber",
            FieldType::Number => "number",
            FieldType::Currency => "currency",
            FieldType::Percent => "percent",
            FieldType::Duration => "duration",
            FieldType::Rating => "rating",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
            FieldType::DateTime => "dateTime",
            FieldType::SingleSelect => "singleSelect",
            FieldType::MultipleSelects => "multipleSelects",
            FieldType::MultipleRecordLinks => "multipleRecordLinks",
            FieldType::MultipleLookupValues => "multipleLookupValues",
            FieldType::Rollup => "rollup",
            FieldType::Count => "count",
            FieldType::Formula => "formula",
            FieldType::MultipleAttachments => "multipleAttachments",
            FieldType::Barcode => "barcode",
            FieldType::Button => "button",
            FieldType::AutoNumber => "autoNumber",
            FieldType::CreatedTime => "createdTime",
            FieldType::LastModifiedTime => "lastModifiedTime",
            FieldType::CreatedBy => "createdBy",
            FieldType::LastModifiedBy => "lastModifiedBy",
            FieldType::SingleCollaborator => "singleCollaborator",
            FieldType::MultipleCollaborators => "multipleCollaborators",
            FieldType::ExternalSyncSource => "externalSyncSource",
            FieldType::Other(name) => name,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(FieldType::from_name(&s))
    }
}

//! Flat tabular view of a record set.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use tabula_core::Record;

/// Records flattened into rows and columns.
///
/// Columns are the union of field names across all records, in the order
/// they were first seen. Rows keep server order. A record without a given
/// field has `null` in that column. Cell values are never coerced.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tabula::{Record, RecordTable};
///
/// let records: Vec<Record> = serde_json::from_value(json!([
///     {"id": "rec1", "createdTime": "2024-01-01T00:00:00Z", "fields": {"a": 1, "b": 2}},
///     {"id": "rec2", "createdTime": "2024-01-01T00:00:00Z", "fields": {"a": 3}},
/// ]))
/// .unwrap();
/// let table = RecordTable::from_records(&records);
///
/// assert_eq!(table.columns(), ["a", "b"]);
/// assert_eq!(table.get(1, "b"), Some(&json!(null)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RecordTable {
    /// Normalize records into a table. Record ids and metadata are dropped.
    pub fn from_records(records: &[Record]) -> Self {
        let columns: Vec<String> = records
            .iter()
            .flat_map(|record| record.fields.keys())
            .collect::<IndexSet<_>>()
            .into_iter()
            .cloned()
            .collect();

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|c| record.fields.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in server order; each has one cell per column.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` in column `name`.
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let col = self.column_index(name)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// All cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[col]).collect())
    }

    /// Rows as JSON objects keyed by column name, columns in table order.
    pub fn row_objects(&self) -> impl Iterator<Item = Map<String, Value>> + '_ {
        self.rows.iter().map(|row| {
            self.columns
                .iter()
                .cloned()
                .zip(row.iter().cloned())
                .collect()
        })
    }
}

impl From<&[Record]> for RecordTable {
    fn from(records: &[Record]) -> Self {
        Self::from_records(records)
    }
}

//! Query records command implementation.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use tabula::{BaseId, CellFormat, Connection, QueryParams, SortSpec, TableId};

use crate::output;

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Table id or name (defaults to table_id from secrets)
    #[arg(long)]
    pub table: Option<TableId>,

    /// Base id (defaults to base_id from secrets)
    #[arg(long)]
    pub base: Option<BaseId>,

    /// Maximum number of records to return
    #[arg(long)]
    pub max_records: Option<u32>,

    /// Records per page (1-100)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// View name or id
    #[arg(long)]
    pub view: Option<String>,

    /// Sort key as FIELD, FIELD:asc or FIELD:desc (repeatable)
    #[arg(long)]
    pub sort: Vec<SortSpec>,

    /// Only return records matching this formula
    #[arg(long)]
    pub formula: Option<String>,

    /// Only return this field (repeatable)
    #[arg(long = "field")]
    pub fields: Vec<String>,

    /// Cell format: json or string
    #[arg(long)]
    pub cell_format: Option<CellFormat>,

    /// Time zone, required with --cell-format string
    #[arg(long)]
    pub time_zone: Option<String>,

    /// Locale, required with --cell-format string
    #[arg(long)]
    pub user_locale: Option<String>,

    /// Extra parameter as KEY=VALUE; JSON values are sent as JSON (repeatable)
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, Value)>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl QueryArgs {
    fn query_params(&self) -> QueryParams {
        let mut params = QueryParams {
            max_records: self.max_records,
            page_size: self.page_size,
            view: self.view.clone(),
            sort: self.sort.clone(),
            formula: self.formula.clone(),
            fields: self.fields.clone(),
            cell_format: self.cell_format,
            time_zone: self.time_zone.clone(),
            user_locale: self.user_locale.clone(),
            ..QueryParams::default()
        };
        for (name, value) in &self.params {
            params = params.param(name.clone(), value.clone());
        }
        params
    }
}

fn parse_param(s: &str) -> Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", s))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in {:?}", s));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

pub async fn run(args: QueryArgs, conn: &Connection) -> Result<()> {
    let params = args.query_params();

    let table = conn
        .query(args.table.as_ref(), args.base.as_ref(), None, &params)
        .await
        .context("Failed to query records")?;

    if table.is_empty() {
        output::notice("No records found.");
        return Ok(());
    }

    for row in table.row_objects() {
        output::emit(&row, args.pretty)?;
    }
    output::field("Rows", &table.len().to_string());

    Ok(())
}

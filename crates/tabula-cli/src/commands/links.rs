//! Table links command implementation.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use tabula::{BaseId, BaseSchema, Connection};

use crate::output;

#[derive(Args, Debug)]
pub struct LinksArgs {
    /// Base id (defaults to base_id from secrets)
    #[arg(long)]
    pub base: Option<BaseId>,
}

pub async fn run(args: LinksArgs, conn: &Connection) -> Result<()> {
    let schema = conn
        .get_base_schema(args.base.as_ref(), None)
        .await
        .context("Failed to fetch base schema")?;

    let links = schema.links();
    if links.is_empty() {
        output::notice("No links between tables.");
        return Ok(());
    }

    for link in &links {
        let fields: Vec<&str> = link
            .field_ids
            .iter()
            .map(|id| field_name(&schema, id))
            .collect();

        output::json(&json!({
            "from": table_name(&schema, &link.from_table),
            "to": table_name(&schema, &link.to_table),
            "fields": fields,
        }))?;
    }

    Ok(())
}

fn table_name<'a>(schema: &'a BaseSchema, id: &'a str) -> &'a str {
    schema.table(id).map_or(id, |t| t.name.as_str())
}

fn field_name<'a>(schema: &'a BaseSchema, id: &'a str) -> &'a str {
    schema
        .tables
        .iter()
        .find_map(|t| t.field(id))
        .map_or(id, |f| f.name.as_str())
}

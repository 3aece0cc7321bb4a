//! Base schema command implementation.

use anyhow::{Context, Result};
use clap::Args;

use tabula::{BaseId, Connection};

use crate::output;

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Base id (defaults to base_id from secrets)
    #[arg(long)]
    pub base: Option<BaseId>,

    /// Only show this table (id or name)
    #[arg(long)]
    pub table: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: SchemaArgs, conn: &Connection) -> Result<()> {
    let schema = conn
        .get_base_schema(args.base.as_ref(), None)
        .await
        .context("Failed to fetch base schema")?;

    match &args.table {
        Some(name) => {
            let table = schema
                .table(name)
                .with_context(|| format!("No table named {:?} in base", name))?;
            output::emit(table, args.pretty)
        }
        None => output::emit(&*schema, args.pretty),
    }
}

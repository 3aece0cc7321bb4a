//! List bases command implementation.

use anyhow::{Context, Result};
use clap::Args;

use tabula::Connection;

use crate::output;

#[derive(Args, Debug)]
pub struct BasesArgs {
    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: BasesArgs, conn: &Connection) -> Result<()> {
    let list = conn
        .list_bases(None)
        .await
        .context("Failed to list bases")?;

    if list.bases.is_empty() {
        output::notice("No bases found.");
        return Ok(());
    }

    for base in &list.bases {
        output::emit(base, args.pretty)?;
    }

    Ok(())
}

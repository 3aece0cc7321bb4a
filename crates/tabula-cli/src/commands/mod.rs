//! Subcommand implementations.

mod bases;
mod links;
mod query;
mod schema;

use anyhow::Result;
use clap::Subcommand;

use tabula::Connection;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the bases visible to the token
    Bases(bases::BasesArgs),

    /// Show the schema of a base
    Schema(schema::SchemaArgs),

    /// List the links between tables of a base
    Links(links::LinksArgs),

    /// List the records of a table
    Query(query::QueryArgs),
}

pub async fn handle(cmd: Commands, conn: &Connection) -> Result<()> {
    match cmd {
        Commands::Bases(args) => bases::run(args, conn).await,
        Commands::Schema(args) => schema::run(args, conn).await,
        Commands::Links(args) => links::run(args, conn).await,
        Commands::Query(args) => query::run(args, conn).await,
    }
}

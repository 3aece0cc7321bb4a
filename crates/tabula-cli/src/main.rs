//! tabula - CLI tool for exploring remote table bases.
//!
//! This is a thin wrapper over the `tabula` library: every command builds a
//! connection from the secret store and runs one cached operation.

mod cli;
mod commands;
mod output;
mod secrets;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tabula::{Connection, Credentials, HttpConnector};

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let secrets = secrets::load(cli.secrets.as_deref())?;
    let credentials = Credentials::try_from(secrets).context("Invalid secrets")?;

    let mut connector = HttpConnector::new();
    if let Some(api_url) = cli.api_url {
        connector = connector.with_api_url(api_url);
    }
    let conn = Connection::with_connector("cli", credentials, connector);

    commands::handle(cli.command, &conn).await
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

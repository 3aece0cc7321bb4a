//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

use tabula::ApiUrl;

use crate::commands::Commands;

/// Explore bases, schemas and records of a remote table API.
#[derive(Parser, Debug)]
#[command(name = "tabula")]
#[command(author, version = env!("TABULA_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Secrets file (defaults to secrets.json in the config directory)
    #[arg(long, global = true)]
    pub secrets: Option<PathBuf>,

    /// API base URL
    #[arg(long, global = true)]
    pub api_url: Option<ApiUrl>,

    #[command(subcommand)]
    pub command: Commands,
}

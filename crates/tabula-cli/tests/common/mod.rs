use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Build a CLI command isolated from the user's config and environment.
pub fn cli_command(args: &[&str], home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tabula"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_CONFIG_HOME", home.join("config"));
    cmd.env_remove("TABULA_PERSONAL_ACCESS_TOKEN");
    cmd.env_remove("TABULA_BASE_ID");
    cmd.env_remove("TABULA_TABLE_ID");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Run the CLI without blocking the async runtime.
pub async fn run_cli(args: Vec<String>, home: PathBuf) -> Output {
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        cli_command(&args, &home)
            .output()
            .expect("Failed to execute CLI")
    })
    .await
    .expect("CLI task panicked")
}

/// Write a secrets file into `dir` and return its path.
pub fn write_secrets(dir: &Path, json: serde_json::Value) -> PathBuf {
    let path = dir.join("secrets.json");
    std::fs::write(&path, json.to_string()).expect("Failed to write secrets");
    path
}

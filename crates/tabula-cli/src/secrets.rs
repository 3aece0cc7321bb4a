//! Secret store loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use tracing::debug;

use tabula::Secrets;

/// Default secrets file path.
fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tabula").map(|dirs| dirs.config_dir().join("secrets.json"))
}

/// Load secrets from a file, then overlay the `TABULA_*` environment.
///
/// An explicit path must exist. The default path is optional, so the
/// environment alone is enough.
pub fn load(path: Option<&Path>) -> Result<Secrets> {
    let file = match path {
        Some(path) => {
            if !path.exists() {
                bail!("Secrets file not found: {}", path.display());
            }
            Some(read(path)?)
        }
        None => match default_path() {
            Some(path) if path.exists() => Some(read(&path)?),
            _ => None,
        },
    };

    Ok(file.unwrap_or_default().overlay(Secrets::from_env()))
}

fn read(path: &Path) -> Result<Secrets> {
    debug!(path = %path.display(), "Reading secrets");
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read secrets file {}", path.display()))?;
    Secrets::from_json(&json).with_context(|| format!("Invalid secrets file {}", path.display()))
}

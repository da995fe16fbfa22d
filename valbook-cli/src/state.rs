use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::Config;

pub fn valbook_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".valbook"))
}

/// Where the store file lives: the config override, or
/// `~/.valbook/records.json`.
pub fn records_path(cfg: &Config) -> Result<PathBuf> {
    if let Some(path) = &cfg.storage.path {
        return Ok(path.clone());
    }
    Ok(valbook_home()?.join("records.json"))
}

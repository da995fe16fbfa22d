use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::valbook_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub export: ExportSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSection {
    /// Overrides the default ~/.valbook/records.json store location.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSection {
    /// Directory used when `export` is run without an explicit path
    /// (default: the current directory).
    pub dir: Option<PathBuf>,
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            dir: None,
            filename_prefix: default_filename_prefix(),
        }
    }
}

fn default_filename_prefix() -> String {
    "valuation_records".to_string()
}

pub fn config_path() -> Result<PathBuf> {
    Ok(valbook_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

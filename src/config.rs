use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Startup configuration for one dashboard process: which spreadsheet to
/// talk to, which named worksheets to edit, and the shaping knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Identifier of the spreadsheet at the remote service.
    pub spreadsheet_id: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,

    /// The named sub-tables this process operates on (two in the usual
    /// deployment, but any number works).
    pub worksheets: Vec<String>,

    /// Columns whose names contain any of these keywords are coerced to
    /// boolean for display and editing.
    #[serde(default = "default_boolean_keywords")]
    pub boolean_keywords: Vec<String>,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("credentials.json")
}

fn default_boolean_keywords() -> Vec<String> {
    ["INICIO", "TERMINACIÓN", "TERMINACION", "CORTE"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_cache_ttl_secs() -> u64 {
    300
}

impl Config {
    /// Load and parse the YAML config at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

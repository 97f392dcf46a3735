use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8001/api";
pub const DEFAULT_STORAGE: &str = "medassist.db";
pub const DEFAULT_LOG_FILTER: &str = "medassist=info,medassist_portal=info,medassist_api=info";
const DEFAULT_TIMEOUT_SECS: &str = "30";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub storage_path: PathBuf,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup("MEDASSIST_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let storage_path = lookup("MEDASSIST_STORAGE").unwrap_or_else(|| DEFAULT_STORAGE.into());
        let timeout_secs: u64 = lookup("MEDASSIST_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_TIMEOUT_SECS.into())
            .trim()
            .parse()
            .context("MEDASSIST_HTTP_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Self {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            storage_path: PathBuf::from(storage_path),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

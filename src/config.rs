use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::handler::DEFAULT_ENDPOINT;

pub const CONFIG_PATH_VAR: &str = "SENTIMENT_CONFIG";
pub const BASE_URL_VAR: &str = "SENTIMENT_BASE_URL";
pub const ENDPOINT_VAR: &str = "SENTIMENT_ENDPOINT";

/// Where the client posts and which page elements it touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,  // origin serving the page, e.g. "http://127.0.0.1:5000"
    pub endpoint: String,  // path on that origin, "/" unless overridden
    pub input_id: String,
    pub result_id: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            input_id: "text".to_string(),
            result_id: "result".to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults, then the YAML file named by `SENTIMENT_CONFIG`, then the
    /// `SENTIMENT_BASE_URL` / `SENTIMENT_ENDPOINT` overrides. A `.env` file
    /// is honored if present.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).context("Failed to parse config YAML")
    }

    /// Applies variable overrides from `lookup`; empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(BASE_URL_VAR).filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
        if let Some(endpoint) = lookup(ENDPOINT_VAR).filter(|v| !v.is_empty()) {
            self.endpoint = endpoint;
        }
    }
}

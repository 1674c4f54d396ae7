//! Runtime configuration.
//!
//! `env.config.json` is fetched before the app boots so one build can be
//! deployed to several environments.  Its content is free-form; the keys the
//! app itself understands are read through [`AppConfig::from_env`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::fetch::{get_json, FetchError, Fetcher};

/// Key holding the base URL static assets are served from.
pub const ASSETS_BASE_URL_KEY: &str = "ASSETS_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to fetch environment variables: {0}")]
    Fetch(#[from] FetchError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvConfig(Map<String, Value>);

impl EnvConfig {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

pub async fn load_env_config(fetcher: &dyn Fetcher, url: &str) -> Result<EnvConfig, ConfigError> {
    Ok(get_json(fetcher, url).await?)
}

/// Where the app loads its assets from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    base_url: String,
}

impl Default for AppConfig {
    /// Relative URLs, resolved against the page.
    fn default() -> Self {
        Self {
            base_url: String::new(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfig from a URL string
    pub fn from_url(url: &str) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env(env: &EnvConfig) -> Self {
        match env.get_str(ASSETS_BASE_URL_KEY) {
            Some(url) => Self::from_url(url),
            None => Self::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an asset path such as `assets/demoTodos.json`.
    pub fn asset_url(&self, path: &str) -> String {
        if self.base_url.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }
}

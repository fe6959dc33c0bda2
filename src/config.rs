//! Configuration Management
//!
//! Settings come from environment variables, with an optional JSON file
//! for the non-secret values.

use crate::azure::auth::DEFAULT_AUTHORITY_HOST;
use crate::azure::client::DEFAULT_MANAGEMENT_ENDPOINT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SUBSCRIPTION_ID_VAR: &str = "AZURE_SUBSCRIPTION_ID";
pub const CONVERSATIONS_ENDPOINT_VAR: &str = "AZURE_CONVERSATIONS_ENDPOINT";
pub const CONVERSATIONS_KEY_VAR: &str = "AZURE_CONVERSATIONS_KEY";
pub const CONVERSATIONS_PROJECT_VAR: &str = "AZURE_CONVERSATIONS_PROJECT_NAME";
pub const CONVERSATIONS_DEPLOYMENT_VAR: &str = "AZURE_CONVERSATIONS_DEPLOYMENT_NAME";
pub const MANAGEMENT_ENDPOINT_VAR: &str = "AZURE_MANAGEMENT_ENDPOINT";
pub const AUTHORITY_HOST_VAR: &str = "AZURE_AUTHORITY_HOST";

/// Optional settings file (never holds the language key)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub conversations_endpoint: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub deployment_name: Option<String>,
    #[serde(default)]
    pub management_endpoint: Option<String>,
    #[serde(default)]
    pub authority_host: Option<String>,
}

impl FileConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("azassist").join("config.json"))
    }

    /// Load configuration from disk; a missing or unreadable file yields defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }
}

/// Resolved runtime settings
#[derive(Clone)]
pub struct Config {
    pub subscription_id: String,
    pub conversations_endpoint: String,
    pub conversations_key: String,
    pub project_name: String,
    pub deployment_name: String,
    pub management_endpoint: String,
    pub authority_host: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("subscription_id", &self.subscription_id)
            .field("conversations_endpoint", &self.conversations_endpoint)
            .field("conversations_key", &"***")
            .field("project_name", &self.project_name)
            .field("deployment_name", &self.deployment_name)
            .field("management_endpoint", &self.management_endpoint)
            .field("authority_host", &self.authority_host)
            .finish()
    }
}

impl Config {
    /// Load from the process environment and the default config file
    pub fn load() -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok(), FileConfig::load())
    }

    /// Environment values win over file values; required values must be non-empty
    pub fn resolve<F>(env: F, file: FileConfig) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str, fallback: Option<String>| -> Option<String> {
            env(key)
                .or(fallback)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str, fallback: Option<String>| -> Result<String> {
            lookup(key, fallback)
                .with_context(|| format!("Missing required environment variable {}", key))
        };

        let conversations_endpoint =
            required(CONVERSATIONS_ENDPOINT_VAR, file.conversations_endpoint)?;
        url::Url::parse(&conversations_endpoint).with_context(|| {
            format!("{} is not a valid URL: {}", CONVERSATIONS_ENDPOINT_VAR, conversations_endpoint)
        })?;

        Ok(Self {
            subscription_id: required(SUBSCRIPTION_ID_VAR, file.subscription_id)?,
            conversations_endpoint,
            conversations_key: required(CONVERSATIONS_KEY_VAR, None)?,
            project_name: required(CONVERSATIONS_PROJECT_VAR, file.project_name)?,
            deployment_name: required(CONVERSATIONS_DEPLOYMENT_VAR, file.deployment_name)?,
            management_endpoint: lookup(MANAGEMENT_ENDPOINT_VAR, file.management_endpoint)
                .unwrap_or_else(|| DEFAULT_MANAGEMENT_ENDPOINT.to_string()),
            authority_host: lookup(AUTHORITY_HOST_VAR, file.authority_host)
                .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string()),
        })
    }
}

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use crate::{http::DEFAULT_TIMEOUT, source::SourceId};

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_source = "forecast"
/// timeout_secs = 5
///
/// [endpoints]
/// forecast = "https://api.ipma.pt/open-data/forecast/meteorology/cities/daily"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default source id, "observations" or "forecast".
    pub default_source: Option<String>,

    /// Per-request timeout; the built-in default applies when absent or zero.
    pub timeout_secs: Option<u64>,

    /// Endpoint overrides keyed by source id.
    #[serde(default)]
    pub endpoints: HashMap<String, String>,
}

impl Config {
    /// Return the default source as a strongly-typed SourceId.
    ///
    /// Falls back to station observations when nothing is configured.
    pub fn default_source_id(&self) -> Result<SourceId> {
        match self.default_source.as_deref() {
            Some(s) => SourceId::try_from(s),
            None => Ok(SourceId::Observations),
        }
    }

    /// Store default source as string.
    pub fn set_default_source(&mut self, id: SourceId) {
        self.default_source = Some(id.as_str().to_string());
    }

    /// Configured endpoint for a source, or its built-in default.
    pub fn endpoint(&self, id: SourceId) -> &str {
        self.endpoints
            .get(id.as_str())
            .map(String::as_str)
            .unwrap_or_else(|| id.default_endpoint())
    }

    /// Override the endpoint for a source. Setting it back to the built-in
    /// default removes the override.
    pub fn set_endpoint(&mut self, id: SourceId, url: String) {
        if url == id.default_endpoint() {
            self.endpoints.remove(id.as_str());
        } else {
            self.endpoints.insert(id.as_str().to_string(), url);
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;

        // Reject typos early rather than on the first `show`.
        cfg.default_source_id()?;
        for key in cfg.endpoints.keys() {
            SourceId::try_from(key.as_str())?;
        }
        if cfg.timeout_secs == Some(0) {
            return Err(anyhow!("timeout_secs must be at least 1 second"));
        }

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "citytemp", "citytemp-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

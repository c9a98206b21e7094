//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: the
//! API base URL, the data source selection, and the last used email.
//!
//! Configuration is stored at `~/.config/opportunet/config.json`. The
//! `OPPORTUNET_API_BASE` environment variable (or a `.env` entry) overrides
//! the configured base URL.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::DataSourceKind;

/// Application name used for config/data directory paths
const APP_NAME: &str = "opportunet";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default backend base URL, matching the platform's development server.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// Environment variable overriding the API base URL.
const API_BASE_ENV: &str = "OPPORTUNET_API_BASE";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base: Option<String>,
    pub data_source: Option<DataSourceKind>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Effective API base URL: environment override, then the config file,
    /// then the default.
    pub fn api_base(&self) -> String {
        std::env::var(API_BASE_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.api_base.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }

    pub fn data_source(&self) -> DataSourceKind {
        self.data_source.unwrap_or_default()
    }

    /// Directory holding the session file.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}

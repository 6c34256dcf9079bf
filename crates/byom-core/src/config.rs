//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: the
//! API base URL, where the session token is kept, the last email used to
//! log in, and the request timeout.
//!
//! Configuration is stored at `~/.config/byom/config.json`. The
//! `BYOM_API_URL` and `BYOM_TOKEN_STORAGE` environment variables override
//! the file.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::auth::{FileTokenStorage, KeyringTokenStorage, MemoryTokenStorage, TokenStorage};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "byom";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_API_URL: &str = "BYOM_API_URL";
pub const ENV_TOKEN_STORAGE: &str = "BYOM_TOKEN_STORAGE";

/// Where the session token is persisted between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorageKind {
    #[default]
    File,
    Keyring,
    Memory,
}

impl FromStr for TokenStorageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(TokenStorageKind::File),
            "keyring" | "keychain" => Ok(TokenStorageKind::Keyring),
            "memory" => Ok(TokenStorageKind::Memory),
            other => Err(anyhow::anyhow!(
                "Unknown token storage '{}' (expected file, keyring or memory)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub token_storage: TokenStorageKind,
    pub last_email: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Load the config file and apply environment overrides
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&Self::config_path()?)?;
        config.with_overrides(
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_TOKEN_STORAGE).ok(),
        )
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply override values (normally from the environment). Empty values
    /// are ignored.
    pub fn with_overrides(mut self, api_url: Option<String>, token_storage: Option<String>) -> Result<Self> {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = Some(url.trim().to_string());
        }
        if let Some(kind) = token_storage.filter(|k| !k.trim().is_empty()) {
            self.token_storage = kind.parse()?;
        }
        Ok(self)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn api_base_url(&self) -> String {
        self.api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    /// Durable slot for the session token, per `token_storage`
    pub fn token_storage(&self) -> Result<Box<dyn TokenStorage>> {
        Ok(match self.token_storage {
            TokenStorageKind::File => Box::new(FileTokenStorage::new(self.cache_dir()?)),
            TokenStorageKind::Keyring => Box::new(KeyringTokenStorage::new()),
            TokenStorageKind::Memory => Box::new(MemoryTokenStorage::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url(), "http://localhost:8000/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.token_storage, TokenStorageKind::File);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("byom").join("config.json");

        let config = Config {
            api_base_url: Some("https://byom.example.com/api".to_string()),
            token_storage: TokenStorageKind::Keyring,
            last_email: Some("a@b.com".to_string()),
            request_timeout_secs: Some(5),
        };
        config.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.api_base_url(), "https://byom.example.com/api");
        assert_eq!(loaded.token_storage, TokenStorageKind::Keyring);
        assert_eq!(loaded.last_email.as_deref(), Some("a@b.com"));
        assert_eq!(loaded.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = Config::load_from(&dir.path().join("nope.json")).expect("load");
        assert!(loaded.api_base_url.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"last_email": "a@b.com"}"#).expect("write");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.token_storage, TokenStorageKind::File);
        assert_eq!(loaded.last_email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::default()
            .with_overrides(Some("http://10.0.0.2:8000/api".to_string()), Some("Memory".to_string()))
            .expect("overrides");
        assert_eq!(config.api_base_url(), "http://10.0.0.2:8000/api");
        assert_eq!(config.token_storage, TokenStorageKind::Memory);

        let untouched = config
            .clone()
            .with_overrides(Some("  ".to_string()), None)
            .expect("blank override");
        assert_eq!(untouched.api_base_url(), "http://10.0.0.2:8000/api");

        assert!(Config::default().with_overrides(None, Some("floppy".to_string())).is_err());
    }
}

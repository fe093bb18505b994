//! Application configuration
//!
//! Read from `podium.toml` in the platform config dir, or from the path in
//! `PODIUM_CONFIG`. A missing file means defaults: local-only mode with the
//! database in the platform data dir.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use podium_net::RemoteConfig;
use serde::Deserialize;

pub const CONFIG_ENV: &str = "PODIUM_CONFIG";
pub const REMOTE_URL_ENV: &str = "PODIUM_REMOTE_URL";
pub const REMOTE_KEY_ENV: &str = "PODIUM_REMOTE_KEY";

const CONFIG_FILE: &str = "podium.toml";
const DB_FILE: &str = "podium.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Could not determine platform directories")]
    NoProjectDirs,
    #[error("{0} is set but {1} is missing")]
    PartialRemote(&'static str, &'static str),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file; defaults to `<data dir>/podium.db`
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    /// Absent means local-only
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("dev", "onyx", "podium").ok_or(ConfigError::NoProjectDirs)
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => project_dirs()?.config_dir().join(CONFIG_FILE),
        };
        let mut config = Self::load_from(&path)?;
        config.apply_env(
            std::env::var(REMOTE_URL_ENV).ok(),
            std::env::var(REMOTE_KEY_ENV).ok(),
        )?;
        Ok(config)
    }

    /// Override the remote endpoint. Both values are needed unless the file
    /// already configures a remote.
    pub fn apply_env(
        &mut self,
        url: Option<String>,
        api_key: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(remote) = self.remote.as_mut() {
            if let Some(url) = url {
                remote.url = url;
            }
            if let Some(api_key) = api_key {
                remote.api_key = api_key;
            }
            return Ok(());
        }

        match (url, api_key) {
            (None, None) => {}
            (Some(url), Some(api_key)) => self.remote = Some(RemoteConfig::new(url, api_key)),
            (Some(_), None) => {
                return Err(ConfigError::PartialRemote(REMOTE_URL_ENV, REMOTE_KEY_ENV))
            }
            (None, Some(_)) => {
                return Err(ConfigError::PartialRemote(REMOTE_KEY_ENV, REMOTE_URL_ENV))
            }
        }
        Ok(())
    }

    /// Configured database path, or the platform default
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.path {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(DB_FILE)),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default presentational threshold for member search.
pub const DEFAULT_SEARCH_MIN_CHARS: usize = 2;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found. Run 'hisab user use <id>' first.")]
    NotFound,
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("No home directory available")]
    NoHomeDir,
    #[error("Not signed in. Run 'hisab user use <id>' first.")]
    NoCurrentUser,
    #[error("search_min_chars must be at least 1")]
    InvalidSearchMinChars,
}

/// Client configuration stored in ~/.hisab/config.json
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Id of the account the client acts as
    #[serde(default)]
    pub current_user: Option<String>,
    /// Data file of the local service (defaults to ~/.hisab/data.json)
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    #[serde(default = "default_search_min_chars")]
    pub search_min_chars: usize,
}

fn default_search_min_chars() -> usize {
    DEFAULT_SEARCH_MIN_CHARS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            current_user: None,
            data_file: None,
            search_min_chars: DEFAULT_SEARCH_MIN_CHARS,
        }
    }
}

impl ClientConfig {
    /// Load config from default path (~/.hisab/config.json)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path()?)
    }

    /// Load config from custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound
            } else {
                ConfigError::Read(e)
            }
        })?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config, falling back to defaults when the file does not exist yet
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load_from(path) {
            Err(ConfigError::NotFound) => Ok(Self::default()),
            other => other,
        }
    }

    /// Save config to default path
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path()?)
    }

    /// Save config to custom path
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&self)?)?;
        Ok(())
    }

    /// Get default config path (~/.hisab/config.json)
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::base_dir()?.join("config.json"))
    }

    /// Data file path: the configured one, or ~/.hisab/data.json
    pub fn data_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::base_dir()?.join("data.json")),
        }
    }

    /// Get the current user id
    pub fn get_current_user(&self) -> Result<&str, ConfigError> {
        self.current_user
            .as_deref()
            .ok_or(ConfigError::NoCurrentUser)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.search_min_chars == 0 {
            return Err(ConfigError::InvalidSearchMinChars);
        }
        Ok(())
    }

    fn base_dir() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|home| home.join(".hisab"))
            .ok_or(ConfigError::NoHomeDir)
    }
}

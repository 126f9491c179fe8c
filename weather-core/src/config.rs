use directories::ProjectDirs;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::error::ConfigError;

/// Environment variable holding the OpenWeather API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// History file, relative to the working directory unless overridden.
pub const DEFAULT_HISTORY_FILE: &str = "weather_history.json";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Optional settings stored on disk.
///
/// Example TOML:
/// ```toml
/// timeout_secs = 5
/// history_file = "/home/me/.weather_history.json"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// "Current weather by city name" endpoint.
    pub endpoint: String,
    pub timeout_secs: u64,
    pub history_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
        }
    }
}

impl Settings {
    /// Load settings from the platform config directory, or defaults if the file doesn't exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

        let settings: Settings = toml::from_str(&contents)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;

        settings.validate()?;
        Ok(settings)
    }

    /// A zero timeout would fail every lookup before it starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Path to the settings file.
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or(ConfigError::NoConfigDir)?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Everything the core needs, built once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    api_key: SecretString,
    pub settings: Settings,
}

impl Config {
    pub fn new(api_key: impl Into<String>, settings: Settings) -> Self {
        Self { api_key: SecretString::from(api_key.into()), settings }
    }

    /// Read the API key from [`API_KEY_ENV`].
    pub fn from_env(settings: Settings) -> Result<Self, ConfigError> {
        Self::from_lookup(settings, |name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(settings: Settings, lookup: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let key = lookup(API_KEY_ENV)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingCredential(API_KEY_ENV))?;

        Ok(Self::new(key, settings))
    }

    pub(crate) fn api_key(&self) -> &SecretString {
        &self.api_key
    }
}

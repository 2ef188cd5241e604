//! Application configuration.
//!
//! Loaded from `config.toml` in the platform data directory. Every section
//! is optional; missing keys fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::workouts::Coords;

/// Default map zoom level used for the initial view and fly-to.
pub const DEFAULT_ZOOM: u8 = 13;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Map settings
    pub map: MapSettings,
    /// Workout storage settings
    pub storage: StorageSettings,
    /// Image proxy settings
    pub proxy: ProxySettings,
}

/// Map-related settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Zoom level for the initial view and recentering
    pub zoom: u8,
    /// Location reported by the desktop geolocation provider
    pub home: Option<Coords>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            home: None,
        }
    }
}

/// Which durable slot backs the workout snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite key/value table
    #[default]
    Sqlite,
    /// One JSON file per key
    File,
}

/// Workout storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Database file name (sqlite) or directory name (file), relative to the data dir
    pub path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            path: "mapty.db".to_string(),
        }
    }
}

/// Image proxy server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Port to listen on (the `PORT` environment variable wins)
    pub port: u16,
    /// Address to bind to
    pub bind: String,
    /// Blob storage account name
    pub storage_account: String,
    /// Blob container holding the images
    pub container: String,
    /// Directory of static files served at `/`
    pub static_dir: PathBuf,
    /// `max-age` for image responses
    pub cache_max_age_secs: u32,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind: "0.0.0.0".to_string(),
            storage_account: "storageaccnt1228545".to_string(),
            container: "quill-imgs".to_string(),
            static_dir: PathBuf::from("public"),
            cache_max_age_secs: 3600,
        }
    }
}

impl ProxySettings {
    /// Apply the `PORT` environment override.
    pub fn with_env_port(mut self) -> Self {
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        self
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "mapty", "Mapty")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&get_config_path(), get_data_dir())
}

/// Load configuration from `path`.
///
/// A missing file yields the defaults, which are written back to `path` so
/// there is a file to edit.
pub fn load_config_from(path: &Path, data_dir: PathBuf) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        let config = AppConfig {
            data_dir,
            ..Default::default()
        };
        match save_config_to(&config, path) {
            Ok(()) => tracing::info!("Wrote default config to {:?}", path),
            Err(e) => tracing::warn!("Failed to write default config to {:?}: {}", path, e),
        }
        return Ok(config);
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.data_dir = data_dir;

    Ok(config)
}

/// Save application configuration to `path`.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

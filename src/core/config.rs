//! Configuration module for embedded_chart
//!
//! Supports loading configuration from a TOML file.
//! Configuration is stored in a standard location:
//! - Windows: %APPDATA%\embedded_chart\config.toml
//! - Linux/macOS: ~/.config/embedded_chart/config.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application name used for config and data directories
const APP_NAME: &str = "embedded_chart";

/// Default config file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Folder created under the user data directory for extracted albums
pub const DEFAULT_ALBUMS_FOLDER: &str = "EmbeddedAlbums";

/// Copy buffer used per extraction task (80KB)
pub const DEFAULT_BUFFER_SIZE: usize = 81920;

/// Get the standard configuration directory for the application.
///
/// Returns:
/// - Windows: %APPDATA%\embedded_chart
/// - Linux/macOS: ~/.config/embedded_chart
pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_NAME))
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config").join(APP_NAME))
    }
}

/// Get the standard configuration file path.
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Ensure the configuration directory exists.
pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let config_dir = get_config_dir().ok_or(ConfigError::ConfigDirNotFound)?;

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .map_err(|e| ConfigError::WriteError(config_dir.clone(), e.to_string()))?;
    }

    Ok(config_dir)
}

/// Write the commented default config to `path` unless a file is already there.
///
/// Returns the path written (or left untouched).
pub fn init_config_at(path: &Path) -> Result<PathBuf, ConfigError> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteError(parent.to_path_buf(), e.to_string()))?;
            }
        }
        fs::write(path, Config::generate_default_config())
            .map_err(|e| ConfigError::WriteError(path.to_path_buf(), e.to_string()))?;
    }

    Ok(path.to_path_buf())
}

/// Initialize the configuration file in the standard location if it doesn't exist.
pub fn init_config() -> Result<PathBuf, ConfigError> {
    let config_dir = ensure_config_dir()?;
    init_config_at(&config_dir.join(CONFIG_FILE_NAME))
}

/// Default user data root when none is configured
///
/// Uses the platform data directory (`%APPDATA%`, `~/.local/share`,
/// `~/Library/Application Support`) with the application name appended.
pub fn default_user_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("./UserData"))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the albums directory lives
    pub paths: PathsConfig,

    /// Where bundled resources come from
    pub resources: ResourcesConfig,

    /// Extraction tuning
    pub extraction: ExtractionConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Host user data root (empty = platform data directory)
    pub user_data_dir: PathBuf,

    /// Name of the albums folder created under the user data root
    pub albums_folder: String,
}

/// Resource source configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    /// Directory holding the bundled payloads (empty = `bundle` next to the executable)
    pub bundle_dir: PathBuf,
}

/// Extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Copy buffer size in bytes
    pub buffer_size: usize,

    /// Worker threads for the extraction pool (0 = one per core)
    pub max_threads: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log to file
    pub log_to_file: bool,

    /// Log file path
    pub log_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            user_data_dir: PathBuf::new(), // Empty = platform default
            albums_folder: DEFAULT_ALBUMS_FOLDER.to_string(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_threads: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
            log_file: PathBuf::from("./embedded_chart.log"),
        }
    }
}

impl Config {
    /// Resolved user data root
    pub fn user_data_dir(&self) -> PathBuf {
        if self.paths.user_data_dir.as_os_str().is_empty() {
            default_user_data_dir()
        } else {
            self.paths.user_data_dir.clone()
        }
    }

    /// Target directory for extracted albums: `<user-data-dir>/<albums_folder>`
    pub fn albums_dir(&self) -> PathBuf {
        let folder = if self.paths.albums_folder.is_empty() {
            DEFAULT_ALBUMS_FOLDER
        } else {
            self.paths.albums_folder.as_str()
        };
        self.user_data_dir().join(folder)
    }

    /// Resolved bundle directory
    pub fn bundle_dir(&self) -> PathBuf {
        if !self.resources.bundle_dir.as_os_str().is_empty() {
            return self.resources.bundle_dir.clone();
        }

        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("bundle")))
            .unwrap_or_else(|| PathBuf::from("./bundle"))
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::ParseError(_, msg) => ConfigError::ParseError(path.to_path_buf(), msg),
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(PathBuf::new(), e.to_string()))
    }

    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./config.toml (current directory - for development/override)
    /// 2. ./embedded_chart.toml (current directory - alternative name)
    /// 3. Standard config location
    ///
    /// If no config file is found, returns default configuration.
    pub fn load_default() -> Result<Self, ConfigError> {
        let local_paths = [
            PathBuf::from("./config.toml"),
            PathBuf::from("./embedded_chart.toml"),
        ];

        for path in &local_paths {
            if path.exists() {
                return Self::load(path);
            }
        }

        if let Some(config_path) = get_config_path() {
            if config_path.exists() {
                return Self::load(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Path of the config file `load_default` would read (or the standard
    /// location when none exists yet)
    pub fn get_active_config_path() -> PathBuf {
        let local_paths = [
            PathBuf::from("./config.toml"),
            PathBuf::from("./embedded_chart.toml"),
        ];

        for path in &local_paths {
            if path.exists() {
                return path.clone();
            }
        }

        get_config_path().unwrap_or_else(|| PathBuf::from("./config.toml"))
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(path.as_ref(), content)
            .map_err(|e| ConfigError::WriteError(path.as_ref().to_path_buf(), e.to_string()))?;

        Ok(())
    }

    /// Generate a default config file with comments
    pub fn generate_default_config() -> String {
        include_str!("../../config.example.toml").to_string()
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path
    FileNotFound(PathBuf),
    /// Failed to read the configuration file
    ReadError(PathBuf, String),
    /// Failed to parse the configuration file (invalid TOML)
    ParseError(PathBuf, String),
    /// Failed to serialize configuration to TOML
    SerializeError(String),
    /// Failed to write configuration file
    WriteError(PathBuf, String),
    /// Could not determine config directory
    ConfigDirNotFound,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ReadError(path, err) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), err)
            }
            ConfigError::ParseError(path, err) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), err)
            }
            ConfigError::SerializeError(err) => {
                write!(f, "Failed to serialize configuration: {}", err)
            }
            ConfigError::WriteError(path, err) => {
                write!(f, "Failed to write config file '{}': {}", path.display(), err)
            }
            ConfigError::ConfigDirNotFound => {
                write!(f, "Could not determine configuration directory")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

use placepicker_core::{Coordinates, RollbackPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Store used when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Base URL of the place store
    pub server_url: ConfigValue<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: ConfigValue<u64>,
    /// Observer location used for ranking; unset means "unavailable"
    pub location: ConfigValue<Option<Coordinates>>,
    /// Restore the list when a removal fails to sync
    pub rollback_on_remove: ConfigValue<bool>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
    location: Option<Coordinates>,
    rollback_on_remove: Option<bool>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut server_url =
            ConfigValue::new(DEFAULT_SERVER_URL.to_string(), ConfigSource::Default);
        let mut request_timeout_secs =
            ConfigValue::new(DEFAULT_TIMEOUT_SECS, ConfigSource::Default);
        let mut location = ConfigValue::new(None, ConfigSource::Default);
        let mut rollback_on_remove = ConfigValue::new(false, ConfigSource::Default);
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(url) = file_config.server_url {
                server_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(secs) = file_config.request_timeout_secs {
                if secs == 0 {
                    return Err(ConfigError::InvalidValue(
                        path,
                        "request_timeout_secs",
                        secs.to_string(),
                    ));
                }
                request_timeout_secs = ConfigValue::new(secs, ConfigSource::File);
            }
            if let Some(coordinates) = file_config.location {
                location = ConfigValue::new(Some(coordinates), ConfigSource::File);
            }
            if let Some(rollback) = file_config.rollback_on_remove {
                rollback_on_remove = ConfigValue::new(rollback, ConfigSource::File);
            }
        }

        // Apply environment variable overrides
        if let Ok(url) = std::env::var("PLACEPICKER_SERVER_URL") {
            server_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Ok(raw) = std::env::var("PLACEPICKER_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidEnv("PLACEPICKER_TIMEOUT_SECS", raw.clone()))?;
            request_timeout_secs = ConfigValue::new(secs, ConfigSource::Environment);
        }
        if let Ok(raw) = std::env::var("PLACEPICKER_LOCATION") {
            let coordinates = parse_location(&raw)
                .ok_or_else(|| ConfigError::InvalidEnv("PLACEPICKER_LOCATION", raw.clone()))?;
            location = ConfigValue::new(Some(coordinates), ConfigSource::Environment);
        }
        if let Ok(raw) = std::env::var("PLACEPICKER_ROLLBACK_ON_REMOVE") {
            let rollback = parse_flag(&raw).ok_or_else(|| {
                ConfigError::InvalidEnv("PLACEPICKER_ROLLBACK_ON_REMOVE", raw.clone())
            })?;
            rollback_on_remove = ConfigValue::new(rollback, ConfigSource::Environment);
        }

        Ok(Self {
            server_url,
            request_timeout_secs,
            location,
            rollback_on_remove,
            config_file,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.value)
    }

    pub fn rollback_policy(&self) -> RollbackPolicy {
        if self.rollback_on_remove.value {
            RollbackPolicy::Always
        } else {
            RollbackPolicy::SelectOnly
        }
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/placepicker/
    /// - macOS: ~/Library/Application Support/placepicker/
    /// - Windows: %APPDATA%/placepicker/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("placepicker")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Parses `"lat,lon"`.
pub fn parse_location(raw: &str) -> Option<Coordinates> {
    let (lat, lon) = raw.split_once(',')?;
    let coordinates = Coordinates::new(lat.trim().parse().ok()?, lon.trim().parse().ok()?);
    coordinates.is_finite().then_some(coordinates)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(PathBuf, &'static str, String),
    InvalidEnv(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(path, key, value) => write!(
                f,
                "Invalid value for {} in config file '{}': '{}'",
                key,
                path.display(),
                value
            ),
            ConfigError::InvalidEnv(name, value) => {
                write!(f, "Invalid value for {}: '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use revisions_core::DEFAULT_API_URL;

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

/// Gist backup settings
#[derive(Debug, Clone, Serialize)]
pub struct GistConfig {
    /// REST API base (e.g., "https://api.github.com" or a GitHub Enterprise URL)
    pub api_url: ConfigValue<String>,
    /// Per-request timeout; unset keeps the HTTP client's default
    pub request_timeout_secs: ConfigValue<Option<u64>>,
}

impl GistConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.value.map(Duration::from_secs)
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the page and privileged tiers
    pub data_dir: ConfigValue<PathBuf>,
    /// Where downloaded exports are written
    pub download_dir: ConfigValue<PathBuf>,
    /// Gist backup settings
    pub gist: GistConfig,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    download_dir: Option<PathBuf>,
    gist: Option<GistFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct GistFile {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut download_dir = ConfigValue::new(PathBuf::from("."), ConfigSource::Default);
        let mut api_url = ConfigValue::new(DEFAULT_API_URL.to_string(), ConfigSource::Default);
        let mut request_timeout_secs = ConfigValue::new(None, ConfigSource::Default);
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            if let Some(dir) = file_config.data_dir {
                data_dir = ConfigValue::new(resolve(&path, dir), ConfigSource::File);
            }
            if let Some(dir) = file_config.download_dir {
                download_dir = ConfigValue::new(resolve(&path, dir), ConfigSource::File);
            }
            if let Some(gist) = file_config.gist {
                if let Some(url) = gist.api_url {
                    api_url = ConfigValue::new(url, ConfigSource::File);
                }
                if let Some(secs) = gist.request_timeout_secs {
                    request_timeout_secs = ConfigValue::new(Some(secs), ConfigSource::File);
                }
            }

            config_file = Some(path);
        }

        // Apply environment variable overrides
        if let Ok(dir) = std::env::var("EXREV_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(dir) = std::env::var("EXREV_DOWNLOAD_DIR") {
            download_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("EXREV_GIST_API_URL") {
            api_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Ok(secs) = std::env::var("EXREV_REQUEST_TIMEOUT_SECS") {
            let parsed = secs
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidEnv("EXREV_REQUEST_TIMEOUT_SECS", secs))?;
            request_timeout_secs = ConfigValue::new(Some(parsed), ConfigSource::Environment);
        }

        Ok(Self {
            data_dir,
            download_dir,
            gist: GistConfig {
                api_url,
                request_timeout_secs,
            },
            config_file,
        })
    }

    /// Page tier directory
    pub fn page_dir(&self) -> PathBuf {
        self.data_dir.value.join("page")
    }

    /// Privileged tier directory
    pub fn privileged_dir(&self) -> PathBuf {
        self.data_dir.value.join("privileged")
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/exrev/
    /// - macOS: ~/Library/Application Support/exrev/
    /// - Windows: %APPDATA%/exrev/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("exrev")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/exrev/
    /// - macOS: ~/Library/Application Support/exrev/
    /// - Windows: %APPDATA%/exrev/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("exrev")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Resolve relative paths against the config file's directory
fn resolve(config_path: &Path, dir: PathBuf) -> PathBuf {
    if dir.is_relative() {
        config_path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
    } else {
        dir
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
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
            ConfigError::InvalidEnv(name, value) => {
                write!(f, "Invalid value for {}: '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

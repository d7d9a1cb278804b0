//! Application settings loaded from `config.toml` plus environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::app_dirs;

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Environment variable selecting the artifact server port.
pub const PORT_ENV: &str = "ARTIFACT_SERVER_PORT";
/// Port used when neither the config file nor the environment sets one.
pub const DEFAULT_ARTIFACT_PORT: u16 = 9000;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The app directory could not be resolved.
    #[error("Config directory unavailable: {0}")]
    Directory(#[from] app_dirs::AppDirError),
    /// Reading the config file failed.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The config file is not valid TOML for [`AppConfig`].
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// The port override is not a valid TCP port.
    #[error("Invalid ARTIFACT_SERVER_PORT value '{value}': expected a port between 1 and 65535")]
    InvalidPort { value: String },
    /// Scheme/host/port do not form a valid base URL.
    #[error("Invalid artifact server URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Settings for the whole dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub artifact_server: ArtifactServerConfig,
    #[serde(default)]
    pub waveform: WaveformSettings,
}

/// Location of the artifact server every view reads from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactServerConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ArtifactServerConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ArtifactServerConfig {
    /// Base URL that artifact paths are resolved against.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = format!("{}://{}:{}/", self.scheme, self.host, self.port);
        Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl { url: raw, source })
    }
}

/// Waveform display and playback preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaveformSettings {
    /// Rendered waveform height in pixels.
    #[serde(default = "default_waveform_height")]
    pub height: u32,
    /// Playback volume (0.0-1.0).
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for WaveformSettings {
    fn default() -> Self {
        Self {
            height: default_waveform_height(),
            volume: default_volume(),
        }
    }
}

/// Load `config.toml` from the app directory and apply `ARTIFACT_SERVER_PORT`.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    let path = app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME);
    load_from_path(&path, std::env::var(PORT_ENV).ok().as_deref())
}

/// Load settings from an explicit path; a missing file yields defaults.
pub fn load_from_path(path: &Path, port_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut config = if path.is_file() {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str::<AppConfig>(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        AppConfig::default()
    };
    if let Some(value) = port_override {
        config.artifact_server.port = parse_port(value)?;
    }
    config.waveform.volume = config.waveform.volume.clamp(0.0, 1.0);
    Ok(config)
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::InvalidPort {
            value: value.to_string(),
        }),
    }
}

fn default_scheme() -> String {
    "http".into()
}

fn default_host() -> String {
    "localhost".into()
}

fn default_port() -> u16 {
    DEFAULT_ARTIFACT_PORT
}

fn default_waveform_height() -> u32 {
    128
}

fn default_volume() -> f32 {
    1.0
}

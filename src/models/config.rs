use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Env var naming an optional YAML config file
pub const CONFIG_FILE_ENV: &str = "LIGHTFRAME_CONFIG";
/// Env var overriding the LightFrame API base URL
pub const API_URL_ENV: &str = "LIGHTFRAME_API_URL";
/// Env var overriding the UI server bind address
pub const BIND_ENV: &str = "LIGHTFRAME_BIND";
/// Env var pointing at a directory with page template/stylesheet overrides
pub const ASSETS_DIR_ENV: &str = "LIGHTFRAME_ASSETS_DIR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Application configuration.
///
/// Built once at startup and handed to the client, dispatcher and server;
/// nothing reads the environment after that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the LightFrame API (`/compress`, `/enhance` live under it)
    pub api_url: String,

    /// Address the local UI server listens on
    pub bind: SocketAddr,

    /// Filename offered when downloading a result
    pub download_filename: String,

    /// Per-request timeout for calls to the API
    pub request_timeout_secs: u64,

    /// Largest image accepted by the UI server upload form
    pub max_upload_bytes: usize,

    /// Optional directory overriding the embedded page assets
    pub assets_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            download_filename: "LightFrame_result.jpg".to_string(),
            request_timeout_secs: 120,
            max_upload_bytes: 25 * 1024 * 1024,
            assets_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Defaults, then the YAML file named by `LIGHTFRAME_CONFIG`, then the
    /// individual env var overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] with an explicit variable lookup
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_FILE_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_env(lookup)?;

        tracing::debug!(
            api_url = %config.api_url,
            bind = %config.bind,
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;
        tracing::info!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply env var overrides on top of the current values
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(bind) = lookup(BIND_ENV) {
            self.bind = bind.parse().map_err(|_| ConfigError::InvalidValue {
                key: BIND_ENV,
                value: bind.clone(),
            })?;
        }
        if let Some(dir) = lookup(ASSETS_DIR_ENV) {
            self.assets_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "https://api.ferdev.my.id/downloader/allinone";
pub const DEFAULT_API_KEY: &str = "key-elfs";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout_secs: 30,
            user_agent: concat!("aiodl/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Applies `AIODL_API_KEY` and `AIODL_API_ENDPOINT` on top of the file values.
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_overrides(
            std::env::var("AIODL_API_KEY").ok(),
            std::env::var("AIODL_API_ENDPOINT").ok(),
        );
        self
    }

    fn apply_overrides(&mut self, api_key: Option<String>, endpoint: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            self.api.api_key = key;
        }
        if let Some(endpoint) = endpoint.filter(|e| !e.is_empty()) {
            self.api.endpoint = endpoint;
        }
    }
}

/// Finds the config file: explicit path, `$CONFIG_FILE`, then the XDG and
/// home config directories.
pub fn find_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var("CONFIG_FILE") {
        return Some(PathBuf::from(path));
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let config_path = Path::new(&xdg_config_home).join("aiodl").join("config.toml");
        if config_path.exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let config_path = home.join(".config").join("aiodl").join("config.toml");
        if config_path.exists() {
            return Some(config_path);
        }
    }

    None
}

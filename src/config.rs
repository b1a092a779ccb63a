use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub max_file_size: Option<u64>,
    pub debug: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_file: Option<String>,
    pub upload_dir: Option<String>,
    pub preview_dir: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
    pub upload_dir: PathBuf,
    pub preview_dir: PathBuf,
    pub max_file_size: u64,
    /// Include error details in 500 responses.
    pub debug: bool,
    pub log_level: String,
}

const DEFAULT_PORT: u16 = 80;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_DATA_FILE: &str = "data.json";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_PREVIEW_DIR: &str = "previews";
const DEFAULT_MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;
const DEFAULT_LOG_LEVEL: &str = "info";

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let base_dir = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."));
        let config_file = read_config_file(&base_dir.join("config.toml"))?;
        Ok(Self::resolve(&base_dir, config_file.as_ref(), |key| std::env::var(key).ok()))
    }

    /// Merge environment overrides, the config file and defaults, in that order.
    fn resolve(
        base_dir: &Path,
        config_file: Option<&ConfigFile>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let server = config_file.map(|c| &c.server);
        let storage = config_file.map(|c| &c.storage);

        let port = env("PORT")
            .and_then(|p| p.parse().ok())
            .or_else(|| server.and_then(|s| s.port))
            .unwrap_or(DEFAULT_PORT);

        let host = env("HOST")
            .or_else(|| server.and_then(|s| s.host.clone()))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let max_file_size = env("MAX_FILE_SIZE")
            .and_then(|v| v.parse().ok())
            .or_else(|| server.and_then(|s| s.max_file_size))
            .unwrap_or(DEFAULT_MAX_FILE_SIZE);

        let debug = env("DEBUG")
            .and_then(|v| parse_bool(&v))
            .or_else(|| server.and_then(|s| s.debug))
            .unwrap_or(true);

        let data_file = env("DATA_FILE")
            .or_else(|| storage.and_then(|s| s.data_file.clone()))
            .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());

        let upload_dir = env("UPLOAD_DIR")
            .or_else(|| storage.and_then(|s| s.upload_dir.clone()))
            .unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string());

        let preview_dir = env("PREVIEW_DIR")
            .or_else(|| storage.and_then(|s| s.preview_dir.clone()))
            .unwrap_or_else(|| DEFAULT_PREVIEW_DIR.to_string());

        let log_level = env("LOG_LEVEL")
            .or_else(|| config_file.and_then(|c| c.logging.log_level.clone()))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Self {
            host,
            port,
            data_file: resolve_path(base_dir, &data_file),
            upload_dir: resolve_path(base_dir, &upload_dir),
            preview_dir: resolve_path(base_dir, &preview_dir),
            max_file_size,
            debug,
            log_level,
        }
    }

    pub fn from_env() -> Self {
        Self::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Layout rooted at `base`, used by tests.
    #[cfg(test)]
    pub fn rooted_at(base: &Path) -> Self {
        Self::resolve(base, None, |_| None)
    }
}

impl Default for Config {
    fn default() -> Self {
        let base_dir = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."));
        Self::resolve(&base_dir, None, |_| None)
    }
}

fn read_config_file(path: &Path) -> anyhow::Result<Option<ConfigFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(toml::from_str::<ConfigFile>(&content)?))
}

fn resolve_path(base_dir: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

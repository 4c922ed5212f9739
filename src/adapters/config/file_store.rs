use crate::ports::{AppConfig, ConfigError, ConfigResult, ConfigStore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// On-disk shape. Every field is optional so partial files still load.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    log_file: Option<PathBuf>,
    log_level: Option<String>,
    cache_ttl_seconds: Option<u64>,
    cache_capacity: Option<u64>,
    default_page_size: Option<usize>,
}

impl From<ConfigFile> for AppConfig {
    fn from(file: ConfigFile) -> Self {
        let defaults = AppConfig::default();
        AppConfig {
            log_file: file.log_file.unwrap_or(defaults.log_file),
            log_level: file.log_level.unwrap_or(defaults.log_level),
            cache_ttl_seconds: file.cache_ttl_seconds.unwrap_or(defaults.cache_ttl_seconds),
            cache_capacity: file.cache_capacity.unwrap_or(defaults.cache_capacity),
            default_page_size: file.default_page_size.unwrap_or(defaults.default_page_size),
        }
    }
}

impl From<&AppConfig> for ConfigFile {
    fn from(config: &AppConfig) -> Self {
        ConfigFile {
            log_file: Some(config.log_file.clone()),
            log_level: Some(config.log_level.clone()),
            cache_ttl_seconds: Some(config.cache_ttl_seconds),
            cache_capacity: Some(config.cache_capacity),
            default_page_size: Some(config.default_page_size),
        }
    }
}

pub struct FileConfigStore {
    config_path: PathBuf,
}

impl FileConfigStore {
    /// Store rooted in the platform config directory.
    pub fn new() -> ConfigResult<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::ReadError("Cannot determine config directory".to_string())
        })?;

        Ok(Self::at(config_dir.join("taskdesk").join("config.json")))
    }

    pub fn at(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    async fn ensure_config_dir(&self) -> ConfigResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load_config(&self) -> ConfigResult<AppConfig> {
        let content = match fs::read_to_string(&self.config_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "No config at {}, using defaults",
                    self.config_path.display()
                );
                return Ok(AppConfig::default());
            }
            Err(e) => return Err(ConfigError::ReadError(e.to_string())),
        };

        let config_file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        Ok(config_file.into())
    }

    async fn save_config(&self, config: &AppConfig) -> ConfigResult<()> {
        self.ensure_config_dir().await?;

        let content = serde_json::to_string_pretty(&ConfigFile::from(config))
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        fs::write(&self.config_path, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }
}

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for folio (config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL media links are built from
    #[serde(default = "default_public_url")]
    pub public_url: String,

    /// Reject every admin mutation
    #[serde(default)]
    pub read_only: bool,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Defaults to the platform data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_bucket")]
    pub bucket: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: default_public_url(),
            read_only: false,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            database: default_database(),
            bucket: default_bucket(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_public_url() -> String {
    format!("http://{}:{}", default_host(), default_port())
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_database() -> String {
    "folio.db".to_string()
}

fn default_bucket() -> String {
    "portfolio-media".to_string()
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, writing the defaults there first if it does not exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Invalid config: {}", path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(path, content)?;
            Ok(config)
        }
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "folio", "folio") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.folio/config.toml")
        }
    }

    /// Directory holding the database and media bucket
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage.data_dir {
            return dir.clone();
        }
        if let Some(dirs) = directories::ProjectDirs::from("com", "folio", "folio") {
            dirs.data_dir().to_path_buf()
        } else {
            PathBuf::from("~/.folio")
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.database)
    }

    /// Root of the media bucket tree, served at `/media`
    pub fn media_root(&self) -> PathBuf {
        self.data_dir().join("media")
    }
}

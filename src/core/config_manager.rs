// src/core/config_manager.rs
//! Configuration from environment variables and an optional config.yaml

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use crate::core::service_client::DEFAULT_TIMEOUT_SECS;
use crate::core::FsOps;

const CONFIG_FILE: &str = "config.yaml";
const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_PORT: u16 = 8001;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    pub data_path: PathBuf,
    pub database_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub analysis_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    File,
    Sqlite,
    Memory,
}

impl FromStr for StorageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" | "json" => Ok(StorageKind::File),
            "sqlite" | "db" => Ok(StorageKind::Sqlite),
            "memory" | "none" => Ok(StorageKind::Memory),
            other => anyhow::bail!("Unknown history backend: {}. Use file, sqlite or memory", other),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl ConfigManager {
    /// Load all configurations from the process environment
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_from(&current_dir, |key| std::env::var(key).ok())
    }

    /// Load with an explicit base directory and variable lookup
    pub fn load_from<F>(base_dir: &Path, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = var("ENVIRONMENT").unwrap_or_else(|| "local".to_string());
        info!("Loading configuration for environment: {}", env);

        let environment = Self::load_environment(base_dir, &env)?;

        let service = ServiceConfig {
            analysis_url: var("ANALYSIS_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string()),
            timeout_seconds: match var("ANALYSIS_TIMEOUT_SECS") {
                Some(value) => value
                    .parse()
                    .context("ANALYSIS_TIMEOUT_SECS must be a number of seconds")?,
                None => DEFAULT_TIMEOUT_SECS,
            },
        };

        let storage = StorageConfig {
            backend: match var("HISTORY_BACKEND") {
                Some(value) => value.parse()?,
                None => StorageKind::File,
            },
        };

        let port = match var("ROCKET_PORT") {
            Some(value) => value
                .parse::<u16>()
                .context("ROCKET_PORT must be a valid port number")?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            environment,
            service,
            storage,
            port,
        })
    }

    /// Paths from config.yaml when present, defaults under `base_dir` otherwise
    fn load_environment(base_dir: &Path, env: &str) -> Result<EnvironmentConfig> {
        let config_path = base_dir.join(CONFIG_FILE);

        let env_config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config_file: ConfigFile = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;

            match env {
                "production" => config_file.production,
                _ => config_file.local,
            }
        } else {
            EnvironmentConfig {
                data_path: PathBuf::from("data"),
                database_path: PathBuf::from("data/career_compass.db"),
            }
        };

        Ok(EnvironmentConfig {
            data_path: FsOps::normalize_path(base_dir, &env_config.data_path),
            database_path: FsOps::normalize_path(base_dir, &env_config.database_path),
        })
    }

    /// Ensure all required directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        FsOps::ensure_dir_exists(&self.environment.data_path).await?;

        if let Some(db_parent) = self.environment.database_path.parent() {
            FsOps::ensure_dir_exists(db_parent).await?;
        }

        Ok(())
    }
}

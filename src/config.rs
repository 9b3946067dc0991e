use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::query::{normalize, Page};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub dbdir: Option<String>,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub paging: PagingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub sqlite: Option<SqliteConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SqliteConfig {
    pub filename: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct PagingConfig {
    #[serde(alias = "defaultPageSize", default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(alias = "maxPageSize", default = "max_page_size")]
    pub max_page_size: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: max_page_size(),
        }
    }
}

impl PagingConfig {
    pub fn normalize(&self, page_number: i64, page_size: i64) -> Page {
        normalize(
            page_number,
            page_size,
            self.default_page_size,
            self.max_page_size,
        )
    }
}

/// Upper bound for `paging.max_page_size`.
pub const MAX_PAGE_SIZE_LIMIT: u32 = 10_000;

fn default_port() -> String {
    "8080".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn max_page_size() -> u32 {
    1000
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        Self::from_yaml(path, &content)
    }

    pub fn from_yaml(path: &str, content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::ParseError(path.to_string(), e))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let paging = &self.paging;
        if paging.max_page_size < 1 || paging.max_page_size > MAX_PAGE_SIZE_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "paging.max_page_size must be between 1 and {}",
                MAX_PAGE_SIZE_LIMIT
            )));
        }
        if paging.default_page_size < 1 || paging.default_page_size > paging.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "paging.default_page_size must be between 1 and {}",
                paging.max_page_size
            )));
        }
        Ok(())
    }

    pub fn get_database_path(&self) -> Option<String> {
        if let Some(ref sqlite) = self.database.sqlite {
            return Some(sqlite.filename.clone());
        }

        if let Some(ref dbdir) = self.dbdir {
            let path = PathBuf::from(dbdir).join("moviedb.db");
            return Some(path.to_string_lossy().to_string());
        }

        None
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

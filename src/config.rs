// src/config.rs

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::search::SearchRules;

pub const CONFIG_PATH_ENV: &str = "PHONE_MARKET_CONFIG";
pub const ADMIN_PASSWORD_ENV: &str = "PHONE_MARKET_ADMIN_PASSWORD";
pub const CRON_SECRET_ENV: &str = "PHONE_MARKET_CRON_SECRET";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::addr")]
    pub addr: String,

    #[serde(default = "defaults::max_workers")]
    pub max_workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "defaults::db_path")]
    pub path: String,

    #[serde(default = "defaults::schema_path")]
    pub schema_path: String,
}

/// Search and listing-page tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Queries with fewer digits than this match nothing.
    #[serde(default = "defaults::min_search_digits")]
    pub min_search_digits: usize,

    /// Queries with at least this many digits must equal the whole number.
    #[serde(default = "defaults::exact_match_digits")]
    pub exact_match_digits: usize,

    #[serde(default = "defaults::page_size")]
    pub page_size: usize,

    #[serde(default = "defaults::max_page_size")]
    pub max_page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Empty disables admin login entirely.
    #[serde(default)]
    pub password: String,

    #[serde(default = "defaults::session_ttl_secs")]
    pub session_ttl_secs: i64,

    /// Bearer token accepted by the monthly reset endpoint.
    #[serde(default)]
    pub cron_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Config file path: `PHONE_MARKET_CONFIG`, else `config.toml`.
    pub fn path_from_env() -> String {
        env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string())
    }

    /// Secrets may come from the environment instead of the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(password) = env::var(ADMIN_PASSWORD_ENV) {
            self.admin.password = password;
        }
        if let Ok(secret) = env::var(CRON_SECRET_ENV) {
            if !secret.trim().is_empty() {
                self.admin.cron_secret = Some(secret);
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.max_workers == 0 {
            return Err(ConfigError::Invalid("server.max_workers must be > 0".into()));
        }
        if self.search.page_size == 0 {
            return Err(ConfigError::Invalid("search.page_size must be > 0".into()));
        }
        if self.search.max_page_size < self.search.page_size {
            return Err(ConfigError::Invalid(
                "search.max_page_size must be >= search.page_size".into(),
            ));
        }
        if self.search.exact_match_digits < self.search.min_search_digits {
            return Err(ConfigError::Invalid(
                "search.exact_match_digits must be >= search.min_search_digits".into(),
            ));
        }
        if self.admin.session_ttl_secs <= 0 {
            return Err(ConfigError::Invalid("admin.session_ttl_secs must be > 0".into()));
        }
        Ok(())
    }

    pub fn search_rules(&self) -> SearchRules {
        SearchRules {
            min_search_digits: self.search.min_search_digits,
            exact_match_digits: self.search.exact_match_digits,
        }
    }

    pub fn admin_enabled(&self) -> bool {
        !self.admin.password.is_empty()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: defaults::addr(),
            max_workers: defaults::max_workers(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: defaults::db_path(),
            schema_path: defaults::schema_path(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_search_digits: defaults::min_search_digits(),
            exact_match_digits: defaults::exact_match_digits(),
            page_size: defaults::page_size(),
            max_page_size: defaults::max_page_size(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: String::new(),
            session_ttl_secs: defaults::session_ttl_secs(),
            cron_secret: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    pub fn addr() -> String {
        "127.0.0.1:3000".to_string()
    }

    pub fn max_workers() -> usize {
        8
    }

    pub fn db_path() -> String {
        "phone_market.sqlite3".to_string()
    }

    pub fn schema_path() -> String {
        "sql/schema.sql".to_string()
    }

    pub fn min_search_digits() -> usize {
        2
    }

    pub fn exact_match_digits() -> usize {
        7
    }

    pub fn page_size() -> usize {
        20
    }

    pub fn max_page_size() -> usize {
        100
    }

    pub fn session_ttl_secs() -> i64 {
        60 * 60 * 24 * 7
    }

    pub fn log_level() -> String {
        "info".to_string()
    }
}

//! Configuration module for newsdesk.

use serde::Deserialize;
use std::path::Path;

use crate::{NewsdeskError, Result};

/// Web server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins. Empty means permissive (any origin).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/newsdesk.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Ingestion and retention configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Seconds between feed ingestion passes.
    #[serde(default = "default_fetch_interval")]
    pub fetch_interval_secs: u64,
    /// Seconds between retention sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    /// Days to keep raw articles before they are swept.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
}

fn default_fetch_interval() -> u64 {
    3600
}

fn default_sweep_interval() -> u64 {
    86400
}

fn default_retention_days() -> i64 {
    30
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            fetch_interval_secs: default_fetch_interval(),
            sweep_interval_secs: default_sweep_interval(),
            retention_days: default_retention_days(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/newsdesk.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Web server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Ingestion settings.
    #[serde(default)]
    pub ingest: IngestConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(NewsdeskError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| NewsdeskError::Config(format!("config parse error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, "data/newsdesk.db");
        assert_eq!(config.ingest.fetch_interval_secs, 3600);
        assert_eq!(config.ingest.sweep_interval_secs, 86400);
        assert_eq!(config.ingest.retention_days, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_empty() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.server.cors_origins.is_empty());
    }

    #[test]
    fn test_parse_partial() {
        let toml = r#"
            [server]
            port = 9090
            cors_origins = ["https://reader.example.com"]

            [ingest]
            retention_days = 14
        "#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.cors_origins.len(), 1);
        assert_eq!(config.ingest.retention_days, 14);
        // Unspecified sections keep defaults
        assert_eq!(config.ingest.fetch_interval_secs, 3600);
        assert_eq!(config.database.path, "data/newsdesk.db");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Config::parse("server = 1").is_err());
    }
}

//! # Server Configuration
//!
//! Environment-driven settings for the API server. Every value has a default
//! suitable for local development so the server starts with no environment
//! at all.

use anyhow::{anyhow, Result};
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:5000",
    "http://localhost:3000",
    "http://localhost:3001",
];

/// Deployment environment, controls error verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(anyhow!("Unknown APP_ENV '{}'", other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }

    /// Whether unexpected error details may be sent to clients
    pub fn exposes_error_details(&self) -> bool {
        !matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub host: IpAddr,
    pub port: u16,
    /// Root directory of the document store
    pub data_dir: PathBuf,
    pub cors_origins: Vec<String>,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_level: String,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV") {
            Some(value) => Environment::parse(&value)?,
            None => Environment::Development,
        };

        let host = match lookup("API_HOST") {
            Some(value) => value
                .parse::<IpAddr>()
                .map_err(|e| anyhow!("Invalid API_HOST '{}': {}", value, e))?,
            None => IpAddr::from([127, 0, 0, 1]),
        };

        let port = match lookup("API_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|e| anyhow!("Invalid API_PORT '{}': {}", value, e))?,
            None => DEFAULT_PORT,
        };

        let data_dir = lookup("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));

        let cors_origins = match lookup("CORS_ORIGIN") {
            Some(value) => value
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            environment,
            host,
            port,
            data_dir,
            cors_origins,
            log_level,
        })
    }

    /// Configuration for tests: store rooted at `data_dir`, verbose errors
    pub fn for_testing(data_dir: PathBuf) -> Self {
        Self {
            environment: Environment::Test,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            data_dir,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            log_level: "debug".to_string(),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.port, 5000);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.cors_origins.len(), 4);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_reads_overrides() {
        let config = config_from(&[
            ("APP_ENV", "production"),
            ("API_PORT", "8081"),
            ("CORS_ORIGIN", "https://a.example, https://b.example,"),
            ("DATA_DIR", "/var/lib/finance"),
        ])
        .unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert!(!config.environment.exposes_error_details());
        assert_eq!(config.port, 8081);
        assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/finance"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(config_from(&[("API_PORT", "not-a-port")]).is_err());
        assert!(config_from(&[("APP_ENV", "staging")]).is_err());
    }
}

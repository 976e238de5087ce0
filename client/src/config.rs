//! # Client Configuration
//!
//! Where the API lives, how long a request may take, and where cache
//! snapshots are written. Read from `FINANCE_*` environment variables.

use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

const DEVELOPMENT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientEnvironment {
    Development,
    Production,
    Test,
}

impl ClientEnvironment {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(ClientEnvironment::Development),
            "production" | "prod" => Ok(ClientEnvironment::Production),
            "test" => Ok(ClientEnvironment::Test),
            other => Err(anyhow!("Unknown FINANCE_APP_ENV '{}'", other)),
        }
    }

    /// Transport-level timeout applied to every request
    pub fn request_timeout(&self) -> Duration {
        match self {
            ClientEnvironment::Development => DEVELOPMENT_TIMEOUT,
            _ => DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: ClientEnvironment,
    /// API root including the `/api` prefix, without a trailing slash
    pub base_url: String,
    pub request_timeout: Duration,
    /// Snapshot directory; `None` keeps the cache in memory only
    pub cache_dir: Option<PathBuf>,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("FINANCE_APP_ENV") {
            Some(value) => ClientEnvironment::parse(&value)?,
            None => ClientEnvironment::Development,
        };

        let base_url = lookup("FINANCE_API_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(anyhow!("FINANCE_API_BASE_URL must be an http(s) URL, got '{}'", base_url));
        }

        let cache_dir = lookup("FINANCE_CACHE_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            base_url,
            request_timeout: environment.request_timeout(),
            cache_dir,
        })
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let environment = ClientEnvironment::Development;
        Self {
            environment,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: environment.request_timeout(),
            cache_dir: None,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_point_at_local_server() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.environment, ClientEnvironment::Development);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn test_production_uses_shorter_timeout() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("FINANCE_APP_ENV", "production"),
            ("FINANCE_API_BASE_URL", "https://finance.example.com/api/"),
            ("FINANCE_CACHE_DIR", "/tmp/finance-cache"),
        ]))
        .unwrap();

        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.base_url, "https://finance.example.com/api");
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/finance-cache")));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ClientConfig::from_lookup(lookup_from(&[("FINANCE_APP_ENV", "staging")])).is_err());
        assert!(ClientConfig::from_lookup(lookup_from(&[("FINANCE_API_BASE_URL", "localhost:5000")])).is_err());
    }
}

//! Process configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first when present.
//! School policy (start time, penalties) is not configured here; it lives in
//! the `settings` table.

use std::net::SocketAddr;

use anyhow::{Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite:poin.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys take their default
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind_addr = value("BIND_ADDR", DEFAULT_BIND_ADDR);
        Ok(Self {
            database_url: value("DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_addr: bind_addr
                .parse()
                .with_context(|| format!("BIND_ADDR is not a socket address: '{}'", bind_addr))?,
            cors_origin: value("CORS_ORIGIN", DEFAULT_CORS_ORIGIN),
            log_filter: value("RUST_LOG", DEFAULT_LOG_FILTER),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.database_url, "sqlite:poin.db");
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.cors_origin, "http://localhost:8080");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_overrides_and_blank_values() {
        let config = config(&[
            ("DATABASE_URL", "sqlite:/var/lib/poin/poin.db"),
            ("BIND_ADDR", "0.0.0.0:8000"),
            ("CORS_ORIGIN", "  "),
        ])
        .unwrap();
        assert_eq!(config.database_url, "sqlite:/var/lib/poin/poin.db");
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.cors_origin, DEFAULT_CORS_ORIGIN);
    }

    #[test]
    fn test_bad_bind_addr() {
        let err = config(&[("BIND_ADDR", "localhost")]).unwrap_err();
        assert!(err.to_string().contains("BIND_ADDR"));
    }
}

//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 8083)
//! - `TAX_RATE` - Flat tax rate applied to the order summary (default: 0.10)
//! - `CATALOG_PATH` - JSON catalog file (default: bundled demo catalog)
//! - `SESSION_CACHE_PATH` - File that keeps the signed-in user across restarts (default: memory only)
//! - `AUTH_MOCK_LATENCY_MS` - Simulated delay for mock login/signup (default: 0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::aggregates::DEFAULT_TAX_RATE;

const DEFAULT_PORT: u16 = 8083;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub tax_rate: Decimal,
    pub catalog_path: Option<PathBuf>,
    pub session_cache_path: Option<PathBuf>,
    pub auth_latency: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            tax_rate: DEFAULT_TAX_RATE,
            catalog_path: None,
            session_cache_path: None,
            auth_latency: Duration::ZERO,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let tax_rate: Decimal = parse_or(get("TAX_RATE"), "TAX_RATE", defaults.tax_rate)?;
        if tax_rate.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar("TAX_RATE".into(), "must not be negative".into()));
        }

        Ok(Self {
            host: parse_or(get("HOST"), "HOST", defaults.host)?,
            port: parse_or(get("PORT"), "PORT", defaults.port)?,
            tax_rate,
            catalog_path: get("CATALOG_PATH").map(PathBuf::from),
            session_cache_path: get("SESSION_CACHE_PATH").map(PathBuf::from),
            auth_latency: Duration::from_millis(parse_or(get("AUTH_MOCK_LATENCY_MS"), "AUTH_MOCK_LATENCY_MS", 0)?),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr { SocketAddr::new(self.host, self.port) }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8083");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("TAX_RATE", "0.075"),
            ("CATALOG_PATH", "/srv/catalog.json"),
            ("SESSION_CACHE_PATH", " "),
            ("AUTH_MOCK_LATENCY_MS", "500"),
        ]))
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.tax_rate, Decimal::new(75, 3));
        assert_eq!(config.catalog_path, Some(PathBuf::from("/srv/catalog.json")));
        assert_eq!(config.session_cache_path, None);
        assert_eq!(config.auth_latency, Duration::from_millis(500));
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "PORT"));
        let err = Config::from_lookup(lookup(&[("TAX_RATE", "-0.1")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "TAX_RATE"));
    }
}

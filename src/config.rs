use serde::Deserialize;
use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
    /// Configuration was installed more than once.
    #[error("Configuration already initialized")]
    AlreadyInitialized,
}

/// Runtime configuration for the student records server.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub server_host: IpAddr,
    /// Optional fixed port. When absent the server scans [`DEFAULT_PORT_RANGE`].
    pub server_port: Option<u16>,
}

/// Ports tried in order when `SERVER_PORT` is not set.
pub const DEFAULT_PORT_RANGE: std::ops::RangeInclusive<u16> = 8080..=8099;

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            server_port: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let load = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            server_host: load("SERVER_HOST")
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_HOST".into()))
                })
                .transpose()?
                .unwrap_or(defaults.server_host),
            server_port: load("SERVER_PORT")
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, falling back to defaults when startup skipped loading.
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        server_host = %config.server_host,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    Ok(get_config())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = Config::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config.server_host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.server_port, None);
    }

    #[test]
    fn parses_host_and_port() {
        let config = Config::from_lookup(lookup(&[
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", " 9000 "),
        ]))
        .expect("config");
        assert_eq!(config.server_host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.server_port, Some(9000));
    }

    #[test]
    fn blank_port_is_treated_as_unset() {
        let config = Config::from_lookup(lookup(&[("SERVER_PORT", "  ")])).expect("config");
        assert_eq!(config.server_port, None);
    }

    #[test]
    fn rejects_invalid_port() {
        let err = Config::from_lookup(lookup(&[("SERVER_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == "SERVER_PORT"));
    }

    #[test]
    fn rejects_invalid_host() {
        let err = Config::from_lookup(lookup(&[("SERVER_HOST", "not-an-ip")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == "SERVER_HOST"));
    }
}

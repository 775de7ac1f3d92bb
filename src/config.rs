use std::net::SocketAddr;

use thiserror::Error;

use crate::service::{EmptyImageUrl, UpdatePolicy};

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/cupcakes";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Mounts the request/response trace layer. Off under `APP_ENV=test`.
    pub debug_trace: bool,
    pub update_policy: UpdatePolicy,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid BIND_ADDR `{0}`")]
    InvalidBindAddr(String),
    #[error("Invalid UPDATE_EMPTY_IMAGE_URL `{0}`, expected `keep` or `default`")]
    InvalidEmptyImageUrl(String),
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenvy::dotenv().ok();
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_addr))?;

        let debug_trace = lookup("APP_ENV").as_deref() != Some("test");

        let empty_image_url = match lookup("UPDATE_EMPTY_IMAGE_URL").as_deref() {
            None | Some("keep") => EmptyImageUrl::Keep,
            Some("default") => EmptyImageUrl::ResetToDefault,
            Some(other) => return Err(ConfigError::InvalidEmptyImageUrl(other.to_owned())),
        };

        Ok(Config {
            database_url,
            bind_addr,
            debug_trace,
            update_policy: UpdatePolicy { empty_image_url },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert!(config.debug_trace);
        assert_eq!(config.update_policy.empty_image_url, EmptyImageUrl::Keep);
    }

    #[test]
    fn test_env_disables_trace() {
        let config = config_from(&[("APP_ENV", "test")]).unwrap();
        assert!(!config.debug_trace);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("UPDATE_EMPTY_IMAGE_URL", "default"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(
            config.update_policy.empty_image_url,
            EmptyImageUrl::ResetToDefault
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            config_from(&[("BIND_ADDR", "nowhere")]).unwrap_err(),
            ConfigError::InvalidBindAddr("nowhere".to_owned())
        );
        assert_eq!(
            config_from(&[("UPDATE_EMPTY_IMAGE_URL", "reset")]).unwrap_err(),
            ConfigError::InvalidEmptyImageUrl("reset".to_owned())
        );
    }
}

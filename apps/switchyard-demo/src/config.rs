//! Demo configuration, driven by environment variables.

use anyhow::{Context, Result};
use switchyard_http::service::DEFAULT_MAX_BODY_SIZE;

/// Runtime configuration for the demo server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Bind address.
    pub listen_addr: String,
    /// Log level filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Largest accepted request body in bytes.
    pub max_body_size: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8000".to_owned(),
            log_level: "info".to_owned(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl DemoConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("LISTEN_ADDR") {
            config.listen_addr = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = lookup("MAX_BODY_SIZE") {
            config.max_body_size = v
                .trim()
                .parse()
                .with_context(|| format!("invalid MAX_BODY_SIZE: {v}"))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_should_create_default_config() {
        let config = DemoConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.listen_addr, "127.0.0.1:8000");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_body_size, 1_048_576);
    }

    #[test]
    fn test_should_override_from_environment() {
        let config = DemoConfig::from_lookup(lookup(&[
            ("LISTEN_ADDR", "0.0.0.0:9000"),
            ("LOG_LEVEL", "debug"),
            ("MAX_BODY_SIZE", "2048"),
        ]))
        .unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:9000");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.max_body_size, 2048);
    }

    #[test]
    fn test_should_reject_invalid_body_size() {
        let err = DemoConfig::from_lookup(lookup(&[("MAX_BODY_SIZE", "lots")])).unwrap_err();
        assert!(err.to_string().contains("invalid MAX_BODY_SIZE"));
    }
}

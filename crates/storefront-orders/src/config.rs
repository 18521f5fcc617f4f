//! Storefront configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults, then handed explicitly to [`Storefront::connect`](crate::Storefront::connect).

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use storefront_core::TransitionPolicy;
use storefront_db::DbConfig;

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file (`:memory:` for a throwaway database)
    pub database_path: PathBuf,

    /// Maximum pooled connections
    pub max_connections: u32,

    /// Forward-only order lifecycle when true, any-to-any when false
    pub strict_status_transitions: bool,

    /// `tracing` filter directive, e.g. `info,storefront_db=debug`
    pub log_filter: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            database_path: PathBuf::from("./storefront.db"),
            max_connections: 5,
            strict_status_transitions: true,
            log_filter: "info".to_string(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key → value source.
    ///
    /// ## Keys
    /// - `STORE_DATABASE_PATH`
    /// - `STORE_DB_MAX_CONNECTIONS`
    /// - `STORE_STRICT_STATUS_TRANSITIONS`
    /// - `RUST_LOG`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = StoreConfig::default();

        let config = StoreConfig {
            database_path: lookup("STORE_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            max_connections: lookup("STORE_DB_MAX_CONNECTIONS")
                .map(|v| v.parse())
                .transpose()
                .map_err(|_| ConfigError::InvalidValue("STORE_DB_MAX_CONNECTIONS".to_string()))?
                .unwrap_or(defaults.max_connections),

            strict_status_transitions: lookup("STORE_STRICT_STATUS_TRANSITIONS")
                .map(|v| v.parse())
                .transpose()
                .map_err(|_| {
                    ConfigError::InvalidValue("STORE_STRICT_STATUS_TRANSITIONS".to_string())
                })?
                .unwrap_or(defaults.strict_status_transitions),

            log_filter: lookup("RUST_LOG").unwrap_or(defaults.log_filter),
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "STORE_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// A throwaway in-memory store (tests, demos).
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            ..StoreConfig::default()
        }
    }

    /// Selects the transition policy.
    pub fn with_strict_status_transitions(mut self, strict: bool) -> Self {
        self.strict_status_transitions = strict;
        self
    }

    /// The order lifecycle policy this config selects.
    pub fn transition_policy(&self) -> TransitionPolicy {
        if self.strict_status_transitions {
            TransitionPolicy::Strict
        } else {
            TransitionPolicy::Permissive
        }
    }

    /// The database-layer config.
    pub fn db_config(&self) -> DbConfig {
        let db = DbConfig::new(self.database_path.clone());
        if db.is_in_memory() {
            DbConfig::in_memory()
        } else {
            db.max_connections(self.max_connections)
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.transition_policy(), TransitionPolicy::Strict);
    }

    #[test]
    fn test_overrides() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("STORE_DATABASE_PATH", "/var/lib/store.db"),
            ("STORE_DB_MAX_CONNECTIONS", "12"),
            ("STORE_STRICT_STATUS_TRANSITIONS", "false"),
            ("RUST_LOG", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/store.db"));
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.transition_policy(), TransitionPolicy::Permissive);
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.db_config().max_connections, 12);
    }

    #[test]
    fn test_invalid_values() {
        let err = StoreConfig::from_lookup(lookup(&[("STORE_DB_MAX_CONNECTIONS", "many")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(key) if key == "STORE_DB_MAX_CONNECTIONS"));

        assert!(StoreConfig::from_lookup(lookup(&[("STORE_DB_MAX_CONNECTIONS", "0")])).is_err());
        assert!(StoreConfig::from_lookup(lookup(&[("STORE_STRICT_STATUS_TRANSITIONS", "yes")])).is_err());
    }

    #[test]
    fn test_in_memory_uses_single_connection() {
        let db = StoreConfig::in_memory().db_config();
        assert!(db.is_in_memory());
        assert_eq!(db.max_connections, 1);
    }
}

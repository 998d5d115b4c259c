//! Application configuration.
//!
//! Read from an optional `quotes.toml` in the working directory. Every
//! field has a default, so a missing file — the common case — just means
//! the SQLite store next to the binary and info-level logging. CLI flags
//! override file values.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use quote_core::db::StoreConfig;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub backend: String,
    pub connection: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        let defaults = StoreConfig::default();
        Self {
            backend: defaults.backend,
            connection: defaults.connection,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads `path` if it exists; defaults otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Failed to parse config '{}'", path.display()))
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            backend: self.store.backend.clone(),
            connection: self.store.connection.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_point_at_the_sqlite_file() {
        let config = AppConfig::default();

        assert_eq!(config.store.backend, "sqlite");
        assert_eq!(config.store.connection, "quotes.db");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn sections_parse_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [store]
            backend = "memory"

            [log]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.store.connection, "quotes.db", "unset keys keep defaults");
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn empty_document_is_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();

        assert_eq!(config, AppConfig::default());
    }
}

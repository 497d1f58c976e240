//! Console settings.
//!
//! [`Settings`] holds the configuration the management tooling and the
//! stores need: debug mode, log level, which record store to open, and
//! where uploaded rule files are written. Defaults are usable for local
//! development without any configuration file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which record store backs the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreEngine {
    /// A SQLite database file (or `:memory:`).
    #[default]
    Sqlite,
    /// A process-local in-memory store. Contents are lost on exit.
    Memory,
}

impl std::str::FromStr for StoreEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "memory" | "locmem" => Ok(Self::Memory),
            other => Err(format!("unknown store engine '{other}'")),
        }
    }
}

/// Database connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// The store engine.
    pub engine: StoreEngine,
    /// The database file path for SQLite; ignored by the memory engine.
    pub name: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            engine: StoreEngine::Sqlite,
            name: "scirius.sqlite3".to_string(),
        }
    }
}

/// The complete set of console settings.
///
/// # Examples
///
/// ```
/// use scirius_core::settings::{Settings, StoreEngine};
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.database.engine, StoreEngine::Sqlite);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,
    /// The log filter directive (e.g. "info", "scirius_rules=debug").
    pub log_level: String,
    /// The record store configuration.
    pub database: DatabaseSettings,
    /// Directory where uploaded rule files are stored, one subdirectory per source.
    pub rules_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            database: DatabaseSettings::default(),
            rules_dir: PathBuf::from("rules"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.debug);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.database.name, "scirius.sqlite3");
        assert_eq!(settings.rules_dir, PathBuf::from("rules"));
    }

    #[test]
    fn test_store_engine_from_str() {
        assert_eq!("sqlite".parse::<StoreEngine>(), Ok(StoreEngine::Sqlite));
        assert_eq!("MEMORY".parse::<StoreEngine>(), Ok(StoreEngine::Memory));
        assert!("postgres".parse::<StoreEngine>().is_err());
    }

    #[test]
    fn test_store_engine_serde_lowercase() {
        let json = serde_json::to_string(&StoreEngine::Memory).unwrap();
        assert_eq!(json, "\"memory\"");
    }
}

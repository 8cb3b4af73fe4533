//! Store configuration loading.
//!
//! # Responsibility
//! - Resolve where the board database lives and how core logging is set up.
//!
//! # Invariants
//! - Loading never fails: missing or unreadable files fall back to defaults.
//! - `MINEFIELD_DATABASE_PATH` wins over the file value.

use crate::logging::default_log_level;
use log::{info, warn};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs};

/// Default location of the JSON configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/minefield.json";
/// Environment variable overriding [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "MINEFIELD_CONFIG_PATH";
/// Environment variable overriding the database path.
pub const DATABASE_PATH_ENV: &str = "MINEFIELD_DATABASE_PATH";
const DEFAULT_DATABASE_PATH: &str = "minefield.sqlite3";

/// Runtime configuration of the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file.
    pub database_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; file logging is off when
    /// unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Loads the configuration file named by [`CONFIG_PATH_ENV`] and applies
    /// environment overrides.
    pub fn load() -> Self {
        let path = env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut config = Self::load_from(&path);
        if let Some(database_path) = env::var_os(DATABASE_PATH_ENV) {
            config.database_path = PathBuf::from(database_path);
        }
        config
    }

    /// Loads `path`, falling back to defaults when it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    info!(
                        "event=config_load module=config status=ok path={}",
                        path.display()
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        "event=config_load module=config status=error path={} error={}",
                        path.display(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=config_load module=config status=default path={}",
                    path.display()
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    "event=config_load module=config status=error path={} error={}",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }
}

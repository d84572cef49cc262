use crate::access::{Database, TableGuard};
use crate::core::{DatabaseCredentials, DbError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Skip the table-existence check before writes
    #[serde(default)]
    pub trust: bool,
    pub database: DatabaseCredentials,
}

impl Config {
    pub fn guard(&self) -> TableGuard {
        if self.trust {
            TableGuard::Trust
        } else {
            TableGuard::Verify
        }
    }

    /// Builds an access object from this configuration.
    pub fn open(&self) -> Result<Database> {
        Database::new(&self.database, self.guard())
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = dbaccess::config::load_config("config.toml").expect("Failed to load config");
/// println!("{:?}", config);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| DbError::Config(e.to_string()))
}

/// `<config dir>/dbaccess/config.toml`, used when no path is given.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dbaccess").join("config.toml"))
}

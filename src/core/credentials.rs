/// Credentials Module
///
/// Describes how to reach and authenticate to a database. The access object
/// reads credentials once, through the [`Credentials`] trait, when it is
/// constructed.

use crate::core::{DbError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Driver-specific connection settings, applied when the connection opens.
pub type ConnectionOptions = BTreeMap<String, String>;

/// Supported database drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverType {
    /// SQLite through the bundled driver
    Sqlite,
    /// MySQL / MariaDB. SQL generation only: no MySQL client is compiled in,
    /// so these credentials cannot back a `Database`.
    Mysql,
}

impl DriverType {
    /// Whether statements can be executed against this driver in this build.
    pub fn is_executable(self) -> bool {
        matches!(self, DriverType::Sqlite)
    }
}

impl FromStr for DriverType {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(DriverType::Sqlite),
            "mysql" | "mariadb" => Ok(DriverType::Mysql),
            other => Err(DbError::Config(format!("Unknown driver type: {}", other))),
        }
    }
}

impl fmt::Display for DriverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverType::Sqlite => write!(f, "sqlite"),
            DriverType::Mysql => write!(f, "mysql"),
        }
    }
}

/// Read access to everything needed to open a connection.
pub trait Credentials {
    fn driver(&self) -> DriverType;
    fn host(&self) -> &str;
    /// Database name; for SQLite this is the database file path.
    fn name(&self) -> &str;
    fn user(&self) -> &str;
    fn pass(&self) -> &str;
    fn charset(&self) -> &str;
    fn options(&self) -> &ConnectionOptions;
}

/// Immutable credential set, usually loaded from the `[database]` table of the
/// configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatabaseCredentials {
    #[serde(rename = "type", deserialize_with = "deserialize_driver")]
    driver: DriverType,
    #[serde(default)]
    host: String,
    name: String,
    #[serde(default)]
    user: String,
    #[serde(default)]
    pass: String,
    #[serde(default)]
    charset: String,
    #[serde(default, deserialize_with = "deserialize_options")]
    options: ConnectionOptions,
}

fn deserialize_driver<'de, D>(deserializer: D) -> std::result::Result<DriverType, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

/// Option values may be written as any TOML scalar; they are kept as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum OptionValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

fn deserialize_options<'de, D>(deserializer: D) -> std::result::Result<ConnectionOptions, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = BTreeMap::<String, OptionValue>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                OptionValue::Text(s) => s,
                OptionValue::Integer(i) => i.to_string(),
                OptionValue::Float(f) => f.to_string(),
                OptionValue::Bool(b) => if b { "1" } else { "0" }.to_string(),
            };
            (key, text)
        })
        .collect())
}

impl DatabaseCredentials {
    pub fn new(driver: DriverType, name: impl Into<String>) -> Self {
        DatabaseCredentials {
            driver,
            host: String::new(),
            name: name.into(),
            user: String::new(),
            pass: String::new(),
            charset: String::new(),
            options: ConnectionOptions::new(),
        }
    }

    /// SQLite credentials for the database file at `path`
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self::new(DriverType::Sqlite, path)
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_login(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.user = user.into();
        self.pass = pass.into();
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

impl Credentials for DatabaseCredentials {
    fn driver(&self) -> DriverType {
        self.driver
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn user(&self) -> &str {
        &self.user
    }

    fn pass(&self) -> &str {
        &self.pass
    }

    fn charset(&self) -> &str {
        &self.charset
    }

    fn options(&self) -> &ConnectionOptions {
        &self.options
    }
}

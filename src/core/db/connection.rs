/// Connection Management Module
///
/// Opens connections from a credential snapshot and tracks the lazily
/// created handle owned by an access object.

use crate::core::credentials::{ConnectionOptions, Credentials, DriverType};
use crate::core::db::statement::validate_identifier;
use crate::core::{DbError, Result};
use rusqlite::Connection;
use tracing::{debug, info};

/// Everything needed to open a connection, copied out of a [`Credentials`]
/// implementation when the access object is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectTarget {
    pub driver: DriverType,
    pub host: String,
    pub name: String,
    pub user: String,
    pub pass: String,
    pub charset: String,
}

impl ConnectTarget {
    pub fn from_credentials(credentials: &dyn Credentials) -> Self {
        ConnectTarget {
            driver: credentials.driver(),
            host: credentials.host().to_string(),
            name: credentials.name().to_string(),
            user: credentials.user().to_string(),
            pass: credentials.pass().to_string(),
            charset: credentials.charset().to_string(),
        }
    }
}

/// Lifecycle of the connection handle
#[derive(Debug, Default)]
pub enum ConnectionState {
    /// No handle yet, or the previous one was discarded
    #[default]
    Unconnected,
    /// Open handle reused by every operation
    Connected(Connection),
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }

    /// Drops the handle; the next [`ConnectionState::connect`] opens a new one.
    pub fn reset(&mut self) {
        if self.is_connected() {
            debug!("discarding cached connection");
        }
        *self = ConnectionState::Unconnected;
    }

    /// Returns the open handle, opening it first if needed.
    pub fn connect(
        &mut self,
        target: &ConnectTarget,
        options: &ConnectionOptions,
    ) -> Result<&Connection> {
        if let ConnectionState::Unconnected = self {
            *self = ConnectionState::Connected(open(target, options)?);
        }
        match self {
            ConnectionState::Connected(conn) => Ok(conn),
            ConnectionState::Unconnected => Err(DbError::Connection(
                "connection was not established".to_string(),
            )),
        }
    }
}

/// Opens a new connection to `target` and applies `options`.
///
/// For SQLite the database name is the file path (`:memory:` is accepted),
/// the charset selects `PRAGMA encoding` and every option is applied as a
/// pragma. Host, user and password are not used by SQLite.
pub fn open(target: &ConnectTarget, options: &ConnectionOptions) -> Result<Connection> {
    match target.driver {
        DriverType::Sqlite => open_sqlite(target, options),
        DriverType::Mysql => Err(DbError::Connection(format!(
            "cannot connect to mysql database {} on {}: no mysql driver is available in this build",
            target.name, target.host
        ))),
    }
}

fn open_sqlite(target: &ConnectTarget, options: &ConnectionOptions) -> Result<Connection> {
    info!("opening sqlite database {}", target.name);
    let conn = Connection::open(&target.name)
        .map_err(|e| DbError::Connection(format!("{}: {}", target.name, e)))?;

    if let Some(encoding) = sqlite_encoding(&target.charset)? {
        conn.pragma_update(None, "encoding", encoding)
            .map_err(|e| DbError::Connection(e.to_string()))?;
    }

    for (key, value) in options {
        let key = validate_identifier(key)?;
        debug!("applying connection option {} = {}", key, value);
        let applied = match value.parse::<i64>() {
            Ok(number) => conn.pragma_update(None, key, number),
            Err(_) => conn.pragma_update(None, key, value),
        };
        applied.map_err(|e| DbError::Connection(format!("option {}: {}", key, e)))?;
    }

    Ok(conn)
}

/// Maps a charset name to the SQLite encoding it selects.
fn sqlite_encoding(charset: &str) -> Result<Option<&'static str>> {
    match charset.trim().to_lowercase().as_str() {
        "" => Ok(None),
        "utf8" | "utf8mb4" | "utf-8" => Ok(Some("UTF-8")),
        "utf16" | "utf-16" => Ok(Some("UTF-16")),
        other => Err(DbError::Connection(format!("Unsupported charset: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::credentials::DatabaseCredentials;
    use tempfile::tempdir;

    fn memory_target() -> ConnectTarget {
        ConnectTarget::from_credentials(&DatabaseCredentials::sqlite(":memory:"))
    }

    #[test]
    fn test_lazy_connect_and_reset() {
        let target = memory_target();
        let options = ConnectionOptions::new();
        let mut state = ConnectionState::default();
        assert!(!state.is_connected());

        state.connect(&target, &options).unwrap();
        assert!(state.is_connected());

        state.reset();
        assert!(!state.is_connected());
    }

    #[test]
    fn test_connection_reused_until_reset() {
        let target = memory_target();
        let options = ConnectionOptions::new();
        let mut state = ConnectionState::default();

        state
            .connect(&target, &options)
            .unwrap()
            .execute_batch("CREATE TABLE t (id INTEGER)")
            .unwrap();
        // Same in-memory handle, so the table is still there
        let count: i64 = state
            .connect(&target, &options)
            .unwrap()
            .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);

        state.reset();
        let fresh = state.connect(&target, &options).unwrap();
        assert!(fresh.prepare("SELECT COUNT(*) FROM t").is_err());
    }

    #[test]
    fn test_options_applied_as_pragmas() {
        let target = memory_target();
        let mut options = ConnectionOptions::new();
        options.insert("foreign_keys".to_string(), "1".to_string());
        options.insert("user_version".to_string(), "42".to_string());

        let conn = open(&target, &options).unwrap();
        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        let fks: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 42);
        assert_eq!(fks, 1);
    }

    #[test]
    fn test_connection_error_handling() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing").join("db.sqlite");
        let target = ConnectTarget::from_credentials(&DatabaseCredentials::sqlite(
            missing.to_string_lossy().to_string(),
        ));

        match open(&target, &ConnectionOptions::new()) {
            Err(DbError::Connection(_)) => {}
            other => panic!("Expected Connection error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_mysql_cannot_connect() {
        let creds = DatabaseCredentials::new(DriverType::Mysql, "shop").with_host("db.local");
        let target = ConnectTarget::from_credentials(&creds);
        let err = open(&target, &ConnectionOptions::new()).unwrap_err();
        assert!(matches!(err, DbError::Connection(ref msg) if msg.contains("shop")));
    }

    #[test]
    fn test_charset_mapping() {
        assert_eq!(sqlite_encoding("").unwrap(), None);
        assert_eq!(sqlite_encoding("utf8mb4").unwrap(), Some("UTF-8"));
        assert_eq!(sqlite_encoding("UTF-16").unwrap(), Some("UTF-16"));
        assert!(matches!(sqlite_encoding("latin1"), Err(DbError::Connection(_))));
    }
}
